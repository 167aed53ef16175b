// Licensed under the Apache-2.0 license

//! Failure taxonomy for the I2C master adapter.
//!
//! Every failure keeps the raw status code reported by the driver. Codes use
//! the vendor's numbering (see [`status`]), so log lines can be compared
//! directly against the driver's own documentation.

use core::fmt;
use embedded_hal::i2c::ErrorKind;

/// Raw driver status codes.
pub mod status {
    pub const OK: i32 = 0;
    pub const FAIL: i32 = -1;
    pub const INVALID_ARG: i32 = 0x102;
    pub const INVALID_STATE: i32 = 0x103;
    pub const TIMEOUT: i32 = 0x107;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The driver rejected the bus parameters.
    Configuration { code: i32 },
    /// The driver could not be installed.
    Installation { code: i32 },
    /// A submitted transaction, or its arguments, failed.
    Transfer { code: i32, kind: ErrorKind },
}

impl Error {
    #[must_use]
    pub const fn invalid_argument() -> Self {
        Error::Transfer {
            code: status::INVALID_ARG,
            kind: ErrorKind::Other,
        }
    }

    #[must_use]
    pub const fn not_initialized() -> Self {
        Error::Transfer {
            code: status::INVALID_STATE,
            kind: ErrorKind::Other,
        }
    }

    /// Raw status code from the driver.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match *self {
            Error::Configuration { code }
            | Error::Installation { code }
            | Error::Transfer { code, .. } => code,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { code } => write!(f, "bus configuration failed (status {code})"),
            Error::Installation { code } => write!(f, "driver installation failed (status {code})"),
            Error::Transfer { code, kind } => {
                write!(f, "transfer failed: {kind} (status {code})")
            }
        }
    }
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Transfer { kind, .. } => *kind,
            Error::Configuration { .. } | Error::Installation { .. } => ErrorKind::Other,
        }
    }
}

impl core::error::Error for Error {}

/// Boolean view of an adapter result, for callers written against the
/// success/failure contract.
pub trait ResultExt {
    fn succeeded(&self) -> bool;
}

impl<T> ResultExt for Result<T, Error> {
    fn succeeded(&self) -> bool {
        self.is_ok()
    }
}
