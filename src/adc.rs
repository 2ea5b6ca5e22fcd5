//! Analog input: periodic sample window, one-shot averaging, conversions.
//!
//! ```text
//! adc task (10 ms) ──sample()──▶ [s0 s1 .. s31]  ◀── latest() / average()
//! console          ──read_avg(n)──▶ n one-shot reads, blocking
//! ```
//!
//! The hardware is behind [`AdcReader`], so the window logic and the
//! conversions run on host.

use micromath::F32Ext;

use crate::config::{
    ADC_FULL_SCALE, ADC_VREF_MV, ADC_WINDOW_LEN, NTC_BETA, NTC_PULLUP_OHMS, NTC_R0_OHMS,
    NTC_T0_KELVIN,
};

/// Absolute zero, returned by [`thermistor_celsius`] for rail readings.
pub const ABSOLUTE_ZERO_C: f32 = -273.15;

/// ADC error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcError {
    /// Conversion did not complete in time
    Timeout,
    /// Driver returned an error
    ReadFailed,
    /// Average over zero samples requested
    NoSamples,
}

impl AdcError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Timeout => "adc timeout",
            Self::ReadFailed => "adc read failed",
            Self::NoSamples => "adc no samples",
        }
    }
}

impl core::fmt::Display for AdcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// One blocking 12-bit conversion.
pub trait AdcReader {
    fn read_raw(&mut self) -> Result<u16, AdcError>;
}

/// Periodic sampler with a fixed window of recent readings.
pub struct AdcSampler<R, const N: usize = ADC_WINDOW_LEN> {
    reader: R,
    window: [u16; N],
    /// Slots holding real samples (saturates at N)
    filled: usize,
    /// Next slot to write
    next: usize,
    running: bool,
}

impl<R: AdcReader, const N: usize> AdcSampler<R, N> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            window: [0; N],
            filled: 0,
            next: 0,
            running: false,
        }
    }

    /// Start periodic sampling. No-op if already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.filled = 0;
        self.next = 0;
        self.running = true;
    }

    /// Stop periodic sampling. No-op if already stopped.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of samples currently in the window
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Take one sample into the window. Does nothing while stopped.
    pub fn sample(&mut self) -> Result<(), AdcError> {
        if !self.running {
            return Ok(());
        }

        let raw = self.reader.read_raw()?;
        self.window[self.next] = raw;
        self.next = (self.next + 1) % N;
        self.filled = (self.filled + 1).min(N);
        Ok(())
    }

    /// Most recent window sample, 0 when stopped or empty.
    pub fn latest(&self) -> u16 {
        if !self.running || self.filled == 0 {
            return 0;
        }
        self.window[(self.next + N - 1) % N]
    }

    /// Mean of the filled part of the window, 0 when stopped or empty.
    pub fn average(&self) -> u16 {
        if !self.running || self.filled == 0 {
            return 0;
        }

        let sum: u32 = self.window[..self.filled].iter().map(|&s| u32::from(s)).sum();
        (sum / self.filled as u32) as u16
    }

    /// Average of `samples` one-shot reads. Blocks for the duration.
    pub fn read_avg(&mut self, samples: u8) -> Result<u16, AdcError> {
        if samples == 0 {
            return Err(AdcError::NoSamples);
        }

        let mut sum = 0u32;
        for _ in 0..samples {
            sum += u32::from(self.reader.read_raw()?);
        }
        Ok((sum / u32::from(samples)) as u16)
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

/// Raw code to millivolts, rounded down.
pub fn raw_to_millivolts(raw: u16) -> u32 {
    u32::from(raw) * ADC_VREF_MV / u32::from(ADC_FULL_SCALE)
}

fn raw_to_volts(raw: u16) -> f32 {
    let vref = ADC_VREF_MV as f32 / 1000.0;
    f32::from(raw) / f32::from(ADC_FULL_SCALE) * vref
}

/// Resistance of the lower divider leg, `rdiv` being the upper one.
///
/// Rail readings are clamped: 0 gives 1 GΩ, full scale gives 1 Ω.
pub fn ntc_resistance(raw: u16, rdiv: f32) -> f32 {
    if raw == 0 {
        return 1e9;
    }
    if raw >= ADC_FULL_SCALE {
        return 1.0;
    }

    let vref = ADC_VREF_MV as f32 / 1000.0;
    let v = raw_to_volts(raw);
    rdiv * v / (vref - v)
}

/// Beta-model thermistor temperature in °C.
///
/// Rail readings have no meaningful temperature and return
/// [`ABSOLUTE_ZERO_C`]. The result may still be non-finite; callers check.
pub fn thermistor_celsius(raw: u16) -> f32 {
    if raw == 0 || raw >= ADC_FULL_SCALE {
        return ABSOLUTE_ZERO_C;
    }

    let r_ntc = ntc_resistance(raw, NTC_PULLUP_OHMS);
    let inv_t = 1.0 / NTC_T0_KELVIN + F32Ext::ln(r_ntc / NTC_R0_OHMS) / NTC_BETA;

    1.0 / inv_t + ABSOLUTE_ZERO_C
}
