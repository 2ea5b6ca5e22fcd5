//! Console error types

use crate::adc::AdcError;

/// Console error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// E01: Unknown command
    UnknownCommand,
    /// E02: Missing argument; carries the usage line
    Usage(&'static str),
    /// E03: `led` argument is not a mode name
    InvalidMode,
    /// E04: `adc` argument is not a subcommand
    UnknownAdcCommand,
    /// E05: Temperature math produced NaN or infinity
    TempError,
    /// E06: ADC peripheral error
    Adc(AdcError),
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::Usage(_) => "E02",
            Self::InvalidMode => "E03",
            Self::UnknownAdcCommand => "E04",
            Self::TempError => "E05",
            Self::Adc(_) => "E06",
        }
    }

    /// Get error message, exactly as printed on the console
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::Usage(usage) => usage,
            Self::InvalidMode => "invalid mode",
            Self::UnknownAdcCommand => "unknown adc command",
            Self::TempError => "TEMP ERROR (NaN/Inf)",
            Self::Adc(err) => err.message(),
        }
    }
}

impl From<AdcError> for ConsoleError {
    fn from(err: AdcError) -> Self {
        Self::Adc(err)
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
