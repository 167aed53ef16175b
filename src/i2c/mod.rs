// Licensed under the Apache-2.0 license

//! I2C master adapter module.
//!
//! Wraps a command-queue I2C driver behind a small blocking API (init, write,
//! read, register write, register read) for bare-metal and `no_std`
//! applications. The driver itself sits behind the capability traits in
//! [`traits`], so the same controller runs over a vendor driver, any
//! `embedded-hal` bus via [`hal_transport`], or the in-memory mock used by the
//! unit tests.

pub mod buffered;
pub mod common;
pub mod error;
pub mod hal_transport;
pub mod i2c_controller;
#[cfg(test)]
pub(crate) mod mock;
pub mod system_setup;
pub mod traits;
pub mod transaction;

pub use common::{I2cConfig, I2cConfigBuilder, I2cSpeed};
pub use error::{Error, ResultExt};
pub use i2c_controller::{BusState, I2cController};
