//! Fault latch and fail-stop.
//!
//! Recoverable failures (RX overrun, ADC read, pin I/O) are latched here and
//! shown by `status`; the loop keeps running. A peripheral that cannot be
//! initialized is unrecoverable: the firmware calls [`halt`].
//!
//! A latched fault is an *episode*. Raising the same fault again while it is
//! latched continues the episode, so a task failing every pass logs once.

use core::cell::Cell;

use critical_section::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultCode {
    None,
    /// Producer lapped the console reader. Data: bytes skipped.
    RxOverrun,
    /// Periodic ADC sample failed.
    AdcFault,
    /// GPIO read or write failed. Data: which pin.
    PinFault,
}

impl FaultCode {
    /// Short name for console and log output.
    pub fn as_str(self) -> &'static str {
        match self {
            FaultCode::None => "none",
            FaultCode::RxOverrun => "rx-overrun",
            FaultCode::AdcFault => "adc",
            FaultCode::PinFault => "pin",
        }
    }
}

/// Copy of the latch, as `status` prints it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    /// Episodes since boot.
    pub count: u32,
}

impl FaultSnapshot {
    pub const CLEAR: Self = Self {
        active: false,
        code: FaultCode::None,
        data: 0,
        count: 0,
    };

    fn is(&self, code: FaultCode, data: u32) -> bool {
        self.active && self.code == code && self.data == data
    }
}

/// Last fault, shared between tasks and the `status` command.
pub struct FaultState {
    latch: Mutex<Cell<FaultSnapshot>>,
}

impl FaultState {
    pub const fn new() -> Self {
        Self {
            latch: Mutex::new(Cell::new(FaultSnapshot::CLEAR)),
        }
    }

    /// Latch `code` with `data`.
    ///
    /// Returns `true` when this starts a new episode, `false` when the same
    /// fault (code and data) is already latched.
    pub fn raise(&self, code: FaultCode, data: u32) -> bool {
        critical_section::with(|cs| {
            let cell = self.latch.borrow(cs);
            let mut fault = cell.get();
            if fault.is(code, data) {
                return false;
            }

            fault.active = true;
            fault.code = code;
            fault.data = data;
            fault.count = fault.count.wrapping_add(1);
            cell.set(fault);
            true
        })
    }

    /// End the episode if `code`/`data` is what is latched. The count stays.
    pub fn resolve(&self, code: FaultCode, data: u32) {
        critical_section::with(|cs| {
            let cell = self.latch.borrow(cs);
            let mut fault = cell.get();
            if fault.is(code, data) {
                fault.active = false;
                cell.set(fault);
            }
        })
    }

    pub fn snapshot(&self) -> FaultSnapshot {
        critical_section::with(|cs| self.latch.borrow(cs).get())
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Fail-stop: disable interrupts and spin forever.
///
/// Only for failures during initialization. The critical section is never
/// released.
pub fn halt() -> ! {
    // SAFETY: the matching `release` is never called; nothing runs after this.
    let _ = unsafe { critical_section::acquire() };
    loop {
        core::hint::spin_loop();
    }
}
