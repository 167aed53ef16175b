// Licensed under the Apache-2.0 license

//! Command-queue driver on top of any `embedded_hal::i2c::I2c` bus.
//!
//! HALs such as esp-hal, rp-hal or linux-embedded-hal already own pin setup
//! and clocking when their bus object is constructed, and expose whole
//! transactions rather than a command queue. `HalTransport` lets the adapter
//! run over them unchanged:
//!
//! - `configure` records the requested parameters (the HAL bus was already
//!   configured by its constructor);
//! - `install` / `uninstall` track ownership the way a vendor driver does;
//! - `submit` folds the command list into one `transaction()` call.
//!
//! embedded-hal places restarts and the final NACK of each read group
//! itself, which matches how [`Transaction`] lays them out. Timeouts are
//! whatever the HAL bus enforces; the per-call timeout is not forwarded.

use crate::i2c::common::I2cConfig;
use crate::i2c::error::status;
use crate::i2c::traits::{DriverStatus, I2cCommandQueue, I2cHardwareCore};
use crate::i2c::transaction::{Command, Transaction, MAX_COMMANDS};
use embedded_hal::i2c::{ErrorKind, I2c, Operation};
use fugit::MillisDurationU32;
use heapless::Vec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HalError {
    kind: ErrorKind,
    status: i32,
}

impl HalError {
    const fn invalid_argument() -> Self {
        Self {
            kind: ErrorKind::Other,
            status: status::INVALID_ARG,
        }
    }

    const fn invalid_state() -> Self {
        Self {
            kind: ErrorKind::Other,
            status: status::INVALID_STATE,
        }
    }

    fn from_bus<E: embedded_hal::i2c::Error>(err: &E) -> Self {
        Self {
            kind: err.kind(),
            status: status::FAIL,
        }
    }
}

impl embedded_hal::i2c::Error for HalError {
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl DriverStatus for HalError {
    fn status(&self) -> i32 {
        self.status
    }
}

pub struct HalTransport<I> {
    bus: I,
    config: Option<I2cConfig>,
    installed: bool,
}

impl<I: I2c> HalTransport<I> {
    pub fn new(bus: I) -> Self {
        Self {
            bus,
            config: None,
            installed: false,
        }
    }

    /// Parameters recorded by the last `configure`.
    #[must_use]
    pub fn config(&self) -> Option<&I2cConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn bus_mut(&mut self) -> &mut I {
        &mut self.bus
    }

    pub fn release(self) -> I {
        self.bus
    }

    /// Split a command list into the target address and the operations
    /// between its conditions.
    ///
    /// A restart is only expressible as a change of operation kind, so a
    /// repeated start that keeps the previous direction is rejected.
    fn operations<'t, 'a: 't>(
        transaction: &'t mut Transaction<'a>,
    ) -> Result<(u8, Vec<Operation<'t>, MAX_COMMANDS>), HalError> {
        let mut address: Option<u8> = None;
        let mut direction: Option<u8> = None;
        let mut ops: Vec<Operation<'t>, MAX_COMMANDS> = Vec::new();
        let mut expect_address = false;
        let mut phase_has_data = true;
        let mut stopped = false;

        for command in transaction.commands_mut() {
            if stopped {
                return Err(HalError::invalid_argument());
            }
            let op = match command {
                Command::Start => {
                    if !phase_has_data {
                        // Address-only write phase, e.g. a probe.
                        ops.push(Operation::Write(&[]))
                            .map_err(|_| HalError::invalid_argument())?;
                    }
                    expect_address = true;
                    continue;
                }
                Command::WriteByte(byte) if expect_address => {
                    let target = *byte >> 1;
                    if address.is_some_and(|a| a != target) {
                        return Err(HalError::invalid_argument());
                    }
                    if direction == Some(*byte & 1) {
                        return Err(HalError::invalid_argument());
                    }
                    address = Some(target);
                    direction = Some(*byte & 1);
                    expect_address = false;
                    phase_has_data = *byte & 1 == 1;
                    continue;
                }
                Command::Stop => {
                    if !phase_has_data {
                        ops.push(Operation::Write(&[]))
                            .map_err(|_| HalError::invalid_argument())?;
                    }
                    stopped = true;
                    continue;
                }
                _ if expect_address => return Err(HalError::invalid_argument()),
                Command::WriteByte(byte) => Operation::Write(core::slice::from_ref(&*byte)),
                Command::Write(bytes) => Operation::Write(*bytes),
                Command::Read { buffer, .. } => Operation::Read(&mut **buffer),
            };
            phase_has_data = true;
            ops.push(op).map_err(|_| HalError::invalid_argument())?;
        }

        match address {
            Some(address) if stopped => Ok((address, ops)),
            _ => Err(HalError::invalid_argument()),
        }
    }
}

impl<I: I2c> I2cHardwareCore for HalTransport<I> {
    type Error = HalError;

    fn configure(&mut self, config: &I2cConfig) -> Result<(), Self::Error> {
        self.config = Some(*config);
        Ok(())
    }

    fn install(&mut self, _config: &I2cConfig) -> Result<(), Self::Error> {
        if self.installed {
            return Err(HalError::invalid_state());
        }
        self.installed = true;
        Ok(())
    }

    fn uninstall(&mut self, _port: u8) -> Result<(), Self::Error> {
        if !self.installed {
            return Err(HalError::invalid_state());
        }
        self.installed = false;
        Ok(())
    }
}

impl<I: I2c> I2cCommandQueue for HalTransport<I> {
    fn submit(
        &mut self,
        transaction: &mut Transaction<'_>,
        _timeout: MillisDurationU32,
    ) -> Result<(), Self::Error> {
        if !self.installed {
            return Err(HalError::invalid_state());
        }
        let (address, mut ops) = Self::operations(transaction)?;
        self.bus
            .transaction(address, &mut ops)
            .map_err(|e| HalError::from_bus(&e))
    }
}
