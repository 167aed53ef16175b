// Licensed under the Apache-2.0 license

//! I2C Driver Bring-up Helper
//!
//! Sequences the driver calls that move a bus from "unknown" to "configured
//! and installed", and classifies each step's failure so callers can tell a
//! rejected parameter set from a failed resource acquisition.

use crate::i2c::common::I2cConfig;
use crate::i2c::error::Error;
use crate::i2c::traits::{DriverStatus, I2cHardwareCore};

pub struct I2cSystemSetup;

impl I2cSystemSetup {
    /// Full bring-up: best-effort teardown, then configure, then install.
    ///
    /// A leftover installation from an earlier boot stage or a previous
    /// `init` would make `install` fail, so the port is torn down first. The
    /// teardown result is ignored because "nothing installed" is the normal
    /// case.
    ///
    /// # Errors
    ///
    /// `Error::Configuration` or `Error::Installation` with the driver's raw
    /// status.
    pub fn initialize_i2c_master<H: I2cHardwareCore>(
        hardware: &mut H,
        config: &I2cConfig,
    ) -> Result<(), Error> {
        let _ = Self::teardown(hardware, config.port);
        Self::configure(hardware, config)?;
        Self::install(hardware, config)
    }

    /// # Errors
    ///
    /// `Error::Configuration` if the driver rejects the parameters.
    pub fn configure<H: I2cHardwareCore>(hardware: &mut H, config: &I2cConfig) -> Result<(), Error> {
        hardware
            .configure(config)
            .map_err(|e| Error::Configuration { code: e.status() })
    }

    /// # Errors
    ///
    /// `Error::Installation` if resources cannot be acquired.
    pub fn install<H: I2cHardwareCore>(hardware: &mut H, config: &I2cConfig) -> Result<(), Error> {
        hardware
            .install(config)
            .map_err(|e| Error::Installation { code: e.status() })
    }

    /// # Errors
    ///
    /// `Error::Installation` if no driver was installed on `port`.
    pub fn teardown<H: I2cHardwareCore>(hardware: &mut H, port: u8) -> Result<(), Error> {
        hardware
            .uninstall(port)
            .map_err(|e| Error::Installation { code: e.status() })
    }
}
