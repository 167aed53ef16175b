// Licensed under the Apache-2.0 license

//! Command-queue transaction descriptor.
//!
//! A [`Transaction`] is the list of bus conditions and byte transfers that a
//! command-queue driver executes in one blocking call. The builders here
//! produce the four shapes the adapter needs:
//!
//! ```text
//! write           S  AD+W  data...                    P
//! read            S  AD+R  data(ACK)... data(NACK)     P
//! write_register  S  AD+W  reg  data...               P
//! read_register   S  AD+W  reg  Sr  AD+R  data(ACK)... data(NACK)  P
//! ```
//!
//! Buffers are borrowed, never copied: read commands hold the caller's
//! slice and the driver fills it in place.

use crate::i2c::common::{address_byte, is_valid_address, Direction};
use crate::i2c::error::Error;
use embedded_hal::i2c::Operation;
use heapless::Vec;

/// Command slots per transaction.
pub const MAX_COMMANDS: usize = 16;

/// Acknowledge the master sends after each byte it reads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AckMode {
    Ack,
    Nack,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// Start condition; a repeated start when not the first command.
    Start,
    /// Single byte (address or register), ACK expected.
    WriteByte(u8),
    /// Payload bytes, ACK expected on each.
    Write(&'a [u8]),
    /// Fill `buffer`, answering every byte with `ack`.
    Read { buffer: &'a mut [u8], ack: AckMode },
    Stop,
}

/// Buffer-free description of a [`Command`], used for logging and
/// transaction records.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Start,
    WriteByte(u8),
    Write(usize),
    Read(usize, AckMode),
    Stop,
}

impl Command<'_> {
    #[must_use]
    pub fn step(&self) -> Step {
        match self {
            Command::Start => Step::Start,
            Command::WriteByte(byte) => Step::WriteByte(*byte),
            Command::Write(bytes) => Step::Write(bytes.len()),
            Command::Read { buffer, ack } => Step::Read(buffer.len(), *ack),
            Command::Stop => Step::Stop,
        }
    }
}

#[derive(Debug, Default)]
pub struct Transaction<'a> {
    commands: Vec<Command<'a>, MAX_COMMANDS>,
}

impl<'a> Transaction<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    fn push(&mut self, command: Command<'a>) -> Result<(), Error> {
        self.commands
            .push(command)
            .map_err(|_| Error::invalid_argument())
    }

    pub fn start(&mut self) -> Result<(), Error> {
        self.push(Command::Start)
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.push(Command::WriteByte(byte))
    }

    /// Queue payload bytes. Empty payloads queue nothing.
    pub fn write(&mut self, bytes: &'a [u8]) -> Result<(), Error> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.push(Command::Write(bytes))
    }

    /// Queue a read that ends the read phase: every byte but the last is
    /// ACKed, the last is NACKed.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error for an empty buffer.
    pub fn read(&mut self, buffer: &'a mut [u8]) -> Result<(), Error> {
        let (last, head) = buffer
            .split_last_mut()
            .ok_or_else(Error::invalid_argument)?;
        if !head.is_empty() {
            self.read_with(head, AckMode::Ack)?;
        }
        self.read_with(core::slice::from_mut(last), AckMode::Nack)
    }

    pub fn read_with(&mut self, buffer: &'a mut [u8], ack: AckMode) -> Result<(), Error> {
        if buffer.is_empty() {
            return Err(Error::invalid_argument());
        }
        self.push(Command::Read { buffer, ack })
    }

    pub fn stop(&mut self) -> Result<(), Error> {
        self.push(Command::Stop)
    }

    #[must_use]
    pub fn commands(&self) -> &[Command<'a>] {
        &self.commands
    }

    /// Mutable access for drivers that fill read buffers.
    pub fn commands_mut(&mut self) -> &mut [Command<'a>] {
        &mut self.commands
    }

    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        self.commands.iter().map(Command::step)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// `S AD+W data... P`
    ///
    /// # Errors
    ///
    /// Invalid argument for an address above 0x7F or an empty payload.
    pub fn for_write(address: u8, bytes: &'a [u8]) -> Result<Self, Error> {
        if bytes.is_empty() {
            return Err(Error::invalid_argument());
        }
        let mut tx = Self::addressed(address, Direction::Write)?;
        tx.write(bytes)?;
        tx.stop()?;
        Ok(tx)
    }

    /// `S AD+W P`, an address-only write used to detect a device.
    ///
    /// # Errors
    ///
    /// Invalid argument for an address above 0x7F.
    pub fn for_probe(address: u8) -> Result<Self, Error> {
        let mut tx = Self::addressed(address, Direction::Write)?;
        tx.stop()?;
        Ok(tx)
    }

    /// `S AD+R data(ACK)... data(NACK) P`
    ///
    /// # Errors
    ///
    /// Invalid argument for an address above 0x7F or an empty buffer.
    pub fn for_read(address: u8, buffer: &'a mut [u8]) -> Result<Self, Error> {
        let mut tx = Self::addressed(address, Direction::Read)?;
        tx.read(buffer)?;
        tx.stop()?;
        Ok(tx)
    }

    /// `S AD+W reg data... P`. An empty payload only sets the register
    /// pointer.
    ///
    /// # Errors
    ///
    /// Invalid argument for an address above 0x7F.
    pub fn for_write_register(address: u8, register: u8, bytes: &'a [u8]) -> Result<Self, Error> {
        let mut tx = Self::addressed(address, Direction::Write)?;
        tx.write_byte(register)?;
        tx.write(bytes)?;
        tx.stop()?;
        Ok(tx)
    }

    /// `S AD+W reg Sr AD+R data(ACK)... data(NACK) P`
    ///
    /// No stop between register select and the read, so the bus is never
    /// released to another master.
    ///
    /// # Errors
    ///
    /// Invalid argument for an address above 0x7F or an empty buffer.
    pub fn for_read_register(
        address: u8,
        register: u8,
        buffer: &'a mut [u8],
    ) -> Result<Self, Error> {
        let mut tx = Self::addressed(address, Direction::Write)?;
        tx.write_byte(register)?;
        tx.start()?;
        tx.write_byte(address_byte(address, Direction::Read))?;
        tx.read(buffer)?;
        tx.stop()?;
        Ok(tx)
    }

    /// Translate an embedded-hal operation list.
    ///
    /// A start and address byte precede the first operation and every
    /// change of direction. Adjacent reads form one group whose final byte
    /// is NACKed. An empty list yields an empty transaction.
    ///
    /// An empty write adds nothing to its phase, so `[Write(&[])]` is an
    /// address-only write. An empty read has no final byte to NACK and is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Invalid argument for an address above 0x7F, an empty read buffer,
    /// or a list that does not fit in [`MAX_COMMANDS`].
    pub fn for_operations<'o>(
        address: u8,
        operations: &'a mut [Operation<'o>],
    ) -> Result<Self, Error>
    where
        'o: 'a,
    {
        if !is_valid_address(address) {
            return Err(Error::invalid_argument());
        }
        let mut tx = Self::new();
        if operations.is_empty() {
            return Ok(tx);
        }

        let mut current: Option<Direction> = None;
        let mut ops = operations.iter_mut().peekable();
        while let Some(op) = ops.next() {
            let direction = match op {
                Operation::Write(_) => Direction::Write,
                Operation::Read(_) => Direction::Read,
            };
            if current != Some(direction) {
                tx.start()?;
                tx.write_byte(address_byte(address, direction))?;
                current = Some(direction);
            }
            match op {
                Operation::Write(bytes) => tx.write(bytes)?,
                Operation::Read(buffer) => {
                    if matches!(ops.peek(), Some(Operation::Read(_))) {
                        tx.read_with(buffer, AckMode::Ack)?;
                    } else {
                        tx.read(buffer)?;
                    }
                }
            }
        }
        tx.stop()?;
        Ok(tx)
    }

    fn addressed(address: u8, direction: Direction) -> Result<Self, Error> {
        if !is_valid_address(address) {
            return Err(Error::invalid_argument());
        }
        let mut tx = Self::new();
        tx.start()?;
        tx.write_byte(address_byte(address, direction))?;
        Ok(tx)
    }
}
