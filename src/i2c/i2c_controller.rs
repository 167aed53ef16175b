// Licensed under the Apache-2.0 license

//! I2C master adapter.
//!
//! [`I2cController`] owns the driver for one physical bus and turns each
//! call into a single command-queue transaction. It never retries: a driver
//! status other than success is logged once (operation, address, register,
//! length, raw status) and returned as [`Error`].
//!
//! Every operation takes `&mut self`. Sharing a bus between threads or tasks
//! therefore needs an external lock around the controller; the adapter
//! holds none of its own.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::I2cConfig;
use crate::i2c::error::Error;
use crate::i2c::system_setup::I2cSystemSetup;
use crate::i2c::traits::{DriverStatus, I2cCommandQueue};
use crate::i2c::transaction::Transaction;
use core::fmt;
use core::ops::RangeInclusive;
use embedded_hal::i2c::{Error as _, Operation, SevenBitAddress};

/// Addresses outside the reserved blocks at both ends of the 7-bit space.
pub const SCAN_RANGE: RangeInclusive<u8> = 0x08..=0x77;

/// Upper bound on devices a scan can report.
pub const MAX_SCAN_RESULTS: usize = 112;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BusState {
    Uninitialized,
    Initialized,
}

pub struct I2cController<H: I2cCommandQueue, L: Logger = NoOpLogger> {
    pub hardware: H,
    pub config: I2cConfig,
    pub logger: L,
    state: BusState,
}

#[derive(Clone, Copy)]
struct Target {
    address: u8,
    register: Option<u8>,
    len: usize,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "addr=0x{:02x}", self.address)?;
        if let Some(register) = self.register {
            write!(f, " reg=0x{register:02x}")?;
        }
        write!(f, " len={}", self.len)
    }
}

impl<H: I2cCommandQueue, L: Logger> I2cController<H, L> {
    /// Wrap a driver without touching the bus. Call [`Self::init`] before
    /// any transfer.
    pub fn new(hardware: H, config: I2cConfig, logger: L) -> Self {
        Self {
            hardware,
            config,
            logger,
            state: BusState::Uninitialized,
        }
    }

    /// Wrap a driver and bring the bus up.
    ///
    /// # Errors
    ///
    /// See [`Self::init`].
    pub fn open(hardware: H, config: I2cConfig, logger: L) -> Result<Self, Error> {
        let mut controller = Self::new(hardware, config, logger);
        controller.init()?;
        Ok(controller)
    }

    #[must_use]
    pub fn state(&self) -> BusState {
        self.state
    }

    /// Configure and install the driver.
    ///
    /// Safe to call again: any previous installation is torn down first, so
    /// repeated calls leave the bus in the same configured state.
    ///
    /// # Errors
    ///
    /// `Error::Configuration` if the driver rejects the parameters,
    /// `Error::Installation` if it cannot be installed. The bus is left
    /// uninitialized in both cases.
    pub fn init(&mut self) -> Result<(), Error> {
        self.logger.debug(format_args!(
            "configuring i2c port {}",
            self.config.port
        ));
        match I2cSystemSetup::initialize_i2c_master(&mut self.hardware, &self.config) {
            Ok(()) => {
                self.state = BusState::Initialized;
                self.logger.info(format_args!(
                    "i2c port {} ready: scl={} sda={} freq={} Hz",
                    self.config.port,
                    self.config.scl_pin,
                    self.config.sda_pin,
                    self.config.speed.hz()
                ));
                Ok(())
            }
            Err(err) => {
                self.state = BusState::Uninitialized;
                let stage = match err {
                    Error::Configuration { .. } => "parameter config",
                    _ => "driver install",
                };
                self.logger.error(format_args!(
                    "i2c {stage} failed: port={} status={}",
                    self.config.port,
                    err.code()
                ));
                Err(err)
            }
        }
    }

    /// `S AD+W data... P`
    ///
    /// # Errors
    ///
    /// An empty `bytes` or out-of-range address is rejected before the bus
    /// is touched; otherwise any non-success driver status.
    pub fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        let target = Target {
            address,
            register: None,
            len: bytes.len(),
        };
        self.execute("write", target, || Transaction::for_write(address, bytes))
    }

    /// `S AD+R data(ACK)... data(NACK) P`, filling `buffer` in order.
    ///
    /// # Errors
    ///
    /// An empty `buffer` or out-of-range address is rejected before the bus
    /// is touched; otherwise any non-success driver status, in which case
    /// `buffer` holds whatever the driver wrote.
    pub fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Error> {
        let target = Target {
            address,
            register: None,
            len: buffer.len(),
        };
        self.execute("read", target, || Transaction::for_read(address, buffer))
    }

    /// `S AD+W reg data... P`
    ///
    /// # Errors
    ///
    /// Out-of-range address, or any non-success driver status.
    pub fn write_register(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<(), Error> {
        let target = Target {
            address,
            register: Some(register),
            len: bytes.len(),
        };
        self.execute("register write", target, || {
            Transaction::for_write_register(address, register, bytes)
        })
    }

    /// `S AD+W reg Sr AD+R data(ACK)... data(NACK) P`
    ///
    /// # Errors
    ///
    /// Empty `buffer`, out-of-range address, or any non-success driver
    /// status.
    pub fn read_register(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error> {
        let target = Target {
            address,
            register: Some(register),
            len: buffer.len(),
        };
        self.execute("register read", target, || {
            Transaction::for_read_register(address, register, buffer)
        })
    }

    /// Address-only write (`S AD+W P`); succeeds if the device ACKs.
    ///
    /// # Errors
    ///
    /// Typically a NACK when nothing answers at `address`.
    pub fn probe(&mut self, address: u8) -> Result<(), Error> {
        let target = Target {
            address,
            register: None,
            len: 0,
        };
        self.execute("probe", target, || Transaction::for_probe(address))
    }

    /// Probe every address in [`SCAN_RANGE`] and collect those that ACK.
    ///
    /// Silent addresses are the expected case here and are not logged as
    /// failures.
    ///
    /// # Errors
    ///
    /// Only if the bus is not initialized.
    pub fn scan(&mut self) -> Result<heapless::Vec<u8, MAX_SCAN_RESULTS>, Error> {
        if let Err(err) = self.check_initialized() {
            self.logger
                .error(format_args!("i2c scan failed: status={}", err.code()));
            return Err(err);
        }
        let mut found = heapless::Vec::new();
        for address in SCAN_RANGE {
            let mut tx = Transaction::for_probe(address)?;
            if self.submit(&mut tx).is_ok() {
                self.logger
                    .debug(format_args!("found device at 0x{address:02x}"));
                if found.push(address).is_err() {
                    break;
                }
            }
        }
        self.logger
            .info(format_args!("scan found {} device(s)", found.len()));
        Ok(found)
    }

    fn check_initialized(&self) -> Result<(), Error> {
        match self.state {
            BusState::Initialized => Ok(()),
            BusState::Uninitialized => Err(Error::not_initialized()),
        }
    }

    fn submit(&mut self, transaction: &mut Transaction<'_>) -> Result<(), Error> {
        self.hardware
            .submit(transaction, self.config.timeout)
            .map_err(|e| Error::Transfer {
                code: e.status(),
                kind: e.kind(),
            })
    }

    fn execute<'b>(
        &mut self,
        op: &str,
        target: Target,
        build: impl FnOnce() -> Result<Transaction<'b>, Error>,
    ) -> Result<(), Error> {
        self.logger.debug(format_args!("{op}: {target}"));
        let result = self
            .check_initialized()
            .and_then(|()| build())
            .and_then(|mut tx| self.submit(&mut tx));
        if let Err(err) = &result {
            self.logger.error(format_args!(
                "i2c {op} failed: {target} status={}",
                err.code()
            ));
        }
        result
    }
}

impl<H: I2cCommandQueue, L: Logger> embedded_hal::i2c::ErrorType for I2cController<H, L> {
    type Error = Error;
}

impl<H: I2cCommandQueue, L: Logger> embedded_hal::i2c::I2c for I2cController<H, L> {
    fn read(&mut self, addr: SevenBitAddress, buffer: &mut [u8]) -> Result<(), Self::Error> {
        I2cController::read(self, addr, buffer)
    }

    /// Unlike [`I2cController::write`], an empty `bytes` is an address-only
    /// write, as embedded-hal defines it.
    fn write(&mut self, addr: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error> {
        embedded_hal::i2c::I2c::transaction(self, addr, &mut [Operation::Write(bytes)])
    }

    fn write_read(
        &mut self,
        addr: SevenBitAddress,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        embedded_hal::i2c::I2c::transaction(
            self,
            addr,
            &mut [Operation::Write(bytes), Operation::Read(buffer)],
        )
    }

    fn transaction(
        &mut self,
        addr: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if operations.is_empty() {
            return Ok(());
        }
        let len = operations
            .iter()
            .map(|op| match op {
                Operation::Read(buffer) => buffer.len(),
                Operation::Write(bytes) => bytes.len(),
            })
            .sum();
        let target = Target {
            address: addr,
            register: None,
            len,
        };
        self.execute("transaction", target, || {
            Transaction::for_operations(addr, operations)
        })
    }
}
