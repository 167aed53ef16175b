// Licensed under the Apache-2.0 license

//! In-memory command-queue driver for unit tests.
//!
//! `MockBus` executes transactions against one simulated peripheral and keeps
//! a record of every driver call, so tests can assert on exact command
//! sequences (ACK/NACK placement, repeated starts) as well as on data.

use crate::i2c::common::{Direction, I2cConfig};
use crate::i2c::error::status;
use crate::i2c::traits::{DriverStatus, I2cCommandQueue, I2cHardwareCore};
use crate::i2c::transaction::{Command, Step, Transaction};
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use fugit::MillisDurationU32;
use std::vec::Vec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockError {
    pub status: i32,
    pub kind: ErrorKind,
}

impl MockError {
    pub const fn new(status: i32, kind: ErrorKind) -> Self {
        Self { status, kind }
    }

    pub const fn nack_address() -> Self {
        Self::new(
            status::FAIL,
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
        )
    }

    pub const fn timeout() -> Self {
        Self::new(status::TIMEOUT, ErrorKind::Other)
    }
}

impl embedded_hal::i2c::Error for MockError {
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl DriverStatus for MockError {
    fn status(&self) -> i32 {
        self.status
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Configure(I2cConfig),
    Install(u8),
    Uninstall(u8),
    Submit(Vec<Step>, MillisDurationU32),
}

/// Simulated target device.
pub trait Peripheral {
    fn on_write(&mut self, bytes: &[u8]);
    fn on_read(&mut self, buffer: &mut [u8]);
    /// Start, repeated start or stop seen on the bus.
    fn on_condition(&mut self) {}
}

/// Answers reads with the bytes of its last completed write, repeating
/// them if more are requested.
#[derive(Default)]
pub struct EchoDevice {
    incoming: Vec<u8>,
    cursor: usize,
    pub last_write: Vec<u8>,
}

impl Peripheral for EchoDevice {
    fn on_write(&mut self, bytes: &[u8]) {
        self.incoming.extend_from_slice(bytes);
    }

    fn on_read(&mut self, buffer: &mut [u8]) {
        if self.last_write.is_empty() {
            return;
        }
        for slot in buffer.iter_mut() {
            *slot = self.last_write[self.cursor % self.last_write.len()];
            self.cursor += 1;
        }
    }

    fn on_condition(&mut self) {
        self.cursor = 0;
        if !self.incoming.is_empty() {
            self.last_write = core::mem::take(&mut self.incoming);
        }
    }
}

/// Register-file device: the first byte written after addressing selects
/// the register pointer, which auto-increments on every access.
pub struct RegisterDevice {
    pub registers: [u8; 256],
    pub pointer: u8,
    expect_pointer: bool,
}

impl Default for RegisterDevice {
    fn default() -> Self {
        Self {
            registers: [0; 256],
            pointer: 0,
            expect_pointer: true,
        }
    }
}

impl Peripheral for RegisterDevice {
    fn on_write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.expect_pointer {
                self.pointer = byte;
                self.expect_pointer = false;
            } else {
                self.registers[usize::from(self.pointer)] = byte;
                self.pointer = self.pointer.wrapping_add(1);
            }
        }
    }

    fn on_read(&mut self, buffer: &mut [u8]) {
        for slot in buffer.iter_mut() {
            *slot = self.registers[usize::from(self.pointer)];
            self.pointer = self.pointer.wrapping_add(1);
        }
    }

    fn on_condition(&mut self) {
        self.expect_pointer = true;
    }
}

pub struct MockBus<D: Peripheral> {
    pub device_address: u8,
    pub device: D,
    pub events: Vec<Event>,
    pub configured: Option<I2cConfig>,
    pub installed: bool,
    pub fail_configure: Option<MockError>,
    pub fail_install: Option<MockError>,
    pub fail_uninstall: Option<MockError>,
    pub fail_submit: Option<MockError>,
    /// Byte written into every read buffer before a forced submit failure.
    pub scribble_on_failure: Option<u8>,
}

impl<D: Peripheral> MockBus<D> {
    pub fn new(device_address: u8, device: D) -> Self {
        Self {
            device_address,
            device,
            events: Vec::new(),
            configured: None,
            installed: false,
            fail_configure: None,
            fail_install: None,
            fail_uninstall: None,
            fail_submit: None,
            scribble_on_failure: None,
        }
    }

    pub fn submissions(&self) -> Vec<&[Step]> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Submit(steps, _) => Some(steps.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn last_submission(&self) -> Option<&[Step]> {
        self.submissions().last().copied()
    }

    fn execute(&mut self, transaction: &mut Transaction<'_>) -> Result<(), MockError> {
        let mut expect_address = false;
        let mut direction = None;
        for command in transaction.commands_mut() {
            match command {
                Command::Start => {
                    self.device.on_condition();
                    expect_address = true;
                }
                Command::WriteByte(byte) if expect_address => {
                    expect_address = false;
                    if *byte >> 1 != self.device_address {
                        return Err(MockError::nack_address());
                    }
                    direction = Some(if *byte & 1 == 1 {
                        Direction::Read
                    } else {
                        Direction::Write
                    });
                }
                Command::WriteByte(byte) if direction == Some(Direction::Write) => {
                    self.device.on_write(core::slice::from_ref(byte));
                }
                Command::Write(bytes) if direction == Some(Direction::Write) => {
                    self.device.on_write(bytes);
                }
                Command::Read { buffer, .. } if direction == Some(Direction::Read) => {
                    self.device.on_read(buffer);
                }
                Command::Stop => {
                    self.device.on_condition();
                    direction = None;
                }
                _ => return Err(MockError::new(status::INVALID_ARG, ErrorKind::Other)),
            }
        }
        Ok(())
    }
}

impl<D: Peripheral> I2cHardwareCore for MockBus<D> {
    type Error = MockError;

    fn configure(&mut self, config: &I2cConfig) -> Result<(), Self::Error> {
        self.events.push(Event::Configure(*config));
        if let Some(err) = self.fail_configure {
            return Err(err);
        }
        self.configured = Some(*config);
        Ok(())
    }

    fn install(&mut self, config: &I2cConfig) -> Result<(), Self::Error> {
        self.events.push(Event::Install(config.port));
        if let Some(err) = self.fail_install {
            return Err(err);
        }
        if self.installed {
            return Err(MockError::new(status::FAIL, ErrorKind::Other));
        }
        self.installed = true;
        Ok(())
    }

    fn uninstall(&mut self, port: u8) -> Result<(), Self::Error> {
        self.events.push(Event::Uninstall(port));
        if let Some(err) = self.fail_uninstall {
            return Err(err);
        }
        if !self.installed {
            return Err(MockError::new(status::FAIL, ErrorKind::Other));
        }
        self.installed = false;
        Ok(())
    }
}

impl<D: Peripheral> I2cCommandQueue for MockBus<D> {
    fn submit(
        &mut self,
        transaction: &mut Transaction<'_>,
        timeout: MillisDurationU32,
    ) -> Result<(), Self::Error> {
        self.events
            .push(Event::Submit(transaction.steps().collect(), timeout));
        if !self.installed {
            return Err(MockError::new(status::INVALID_STATE, ErrorKind::Other));
        }
        if let Some(err) = self.fail_submit {
            if let Some(fill) = self.scribble_on_failure {
                for command in transaction.commands_mut() {
                    if let Command::Read { buffer, .. } = command {
                        buffer.fill(fill);
                    }
                }
            }
            return Err(err);
        }
        self.execute(transaction)
    }
}
