// Licensed under the Apache-2.0 license

//! # I2C Driver Capability Traits
//!
//! The adapter never touches registers itself. Everything below the
//! transaction descriptor belongs to a driver that implements these traits:
//!
//! ```text
//! I2cHardwareCore (configure / install / uninstall)
//!     └── I2cCommandQueue (blocking submit of a Transaction)
//! ```
//!
//! A vendor command-queue driver, the embedded-hal bridge in
//! [`crate::i2c::hal_transport`], and the test mock all implement the same
//! pair, so the adapter logic is identical across transports.

use crate::i2c::common::I2cConfig;
use crate::i2c::transaction::Transaction;
use fugit::MillisDurationU32;

/// Raw status code carried by a driver error.
///
/// Codes follow the vendor numbering in [`crate::i2c::error::status`]; the
/// adapter logs and returns them unchanged.
pub trait DriverStatus {
    fn status(&self) -> i32;
}

/// Bus bring-up and teardown.
pub trait I2cHardwareCore {
    /// Driver error; carries both an embedded-hal kind and a raw status.
    type Error: embedded_hal::i2c::Error + DriverStatus + core::fmt::Debug;

    /// Apply mode, pins, pull-ups and clock speed.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects any parameter.
    fn configure(&mut self, config: &I2cConfig) -> Result<(), Self::Error>;

    /// Acquire driver resources (interrupts, command memory) for the
    /// configured port.
    ///
    /// # Errors
    ///
    /// Returns an error if resources cannot be acquired or the driver is
    /// already installed.
    fn install(&mut self, config: &I2cConfig) -> Result<(), Self::Error>;

    /// Release driver resources for `port`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was installed.
    fn uninstall(&mut self, port: u8) -> Result<(), Self::Error>;
}

/// Blocking execution of a command-queue transaction.
pub trait I2cCommandQueue: I2cHardwareCore {
    /// Run every command in `transaction` in order, returning when the
    /// driver reports completion or `timeout` elapses.
    ///
    /// Read commands are filled in place. On error the contents of read
    /// buffers are unspecified.
    ///
    /// # Errors
    ///
    /// NACK, arbitration loss, bus fault, timeout, or an invalid command
    /// list.
    fn submit(
        &mut self,
        transaction: &mut Transaction<'_>,
        timeout: MillisDurationU32,
    ) -> Result<(), Self::Error>;
}
