// Licensed under the Apache-2.0 license

//! Bus configuration types and the compile-time defaults for the single
//! I2C master instance.

use fugit::MillisDurationU32;

/// Master instance index. The board exposes exactly one bus.
pub const I2C_MASTER_PORT: u8 = 0;

pub const DEFAULT_SCL_PIN: u8 = 23;
pub const DEFAULT_SDA_PIN: u8 = 22;

/// Upper bound on a single blocking transaction.
pub const DEFAULT_TIMEOUT: MillisDurationU32 = MillisDurationU32::millis(1000);

#[cfg(not(feature = "fast-mode"))]
pub const DEFAULT_SPEED: I2cSpeed = I2cSpeed::Standard;
#[cfg(feature = "fast-mode")]
pub const DEFAULT_SPEED: I2cSpeed = I2cSpeed::Fast;

/// Largest valid 7-bit device address.
pub const MAX_SEVEN_BIT_ADDRESS: u8 = 0x7F;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum I2cSpeed {
    Standard = 100_000,
    Fast = 400_000,
    FastPlus = 1_000_000,
}

impl I2cSpeed {
    #[must_use]
    pub const fn hz(self) -> u32 {
        self as u32
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum I2cMode {
    Master,
}

/// Transfer direction encoded in bit 0 of the address byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

/// Address byte as it goes on the wire: `(address << 1) | direction`.
#[must_use]
pub const fn address_byte(address: u8, direction: Direction) -> u8 {
    (address << 1) | direction as u8
}

#[must_use]
pub const fn is_valid_address(address: u8) -> bool {
    address <= MAX_SEVEN_BIT_ADDRESS
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct I2cConfig {
    pub port: u8,
    pub mode: I2cMode,
    pub sda_pin: u8,
    pub scl_pin: u8,
    pub sda_pullup: bool,
    pub scl_pullup: bool,
    pub speed: I2cSpeed,
    pub timeout: MillisDurationU32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        I2cConfigBuilder::new().build()
    }
}

pub struct I2cConfigBuilder {
    port: u8,
    sda_pin: u8,
    scl_pin: u8,
    pullups: bool,
    speed: I2cSpeed,
    timeout: MillisDurationU32,
}

impl Default for I2cConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl I2cConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            port: I2C_MASTER_PORT,
            sda_pin: DEFAULT_SDA_PIN,
            scl_pin: DEFAULT_SCL_PIN,
            pullups: true,
            speed: DEFAULT_SPEED,
            timeout: DEFAULT_TIMEOUT,
        }
    }
    #[must_use]
    pub fn port(mut self, port: u8) -> Self {
        self.port = port;
        self
    }
    #[must_use]
    pub fn pins(mut self, sda: u8, scl: u8) -> Self {
        self.sda_pin = sda;
        self.scl_pin = scl;
        self
    }
    #[must_use]
    pub fn pullups(mut self, enabled: bool) -> Self {
        self.pullups = enabled;
        self
    }
    #[must_use]
    pub fn speed(mut self, speed: I2cSpeed) -> Self {
        self.speed = speed;
        self
    }
    #[must_use]
    pub fn timeout(mut self, timeout: MillisDurationU32) -> Self {
        self.timeout = timeout;
        self
    }
    #[must_use]
    pub fn build(self) -> I2cConfig {
        I2cConfig {
            port: self.port,
            mode: I2cMode::Master,
            sda_pin: self.sda_pin,
            scl_pin: self.scl_pin,
            sda_pullup: self.pullups,
            scl_pullup: self.pullups,
            speed: self.speed,
            timeout: self.timeout,
        }
    }
}
