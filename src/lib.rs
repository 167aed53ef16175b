// Licensed under the Apache-2.0 license

// Enforce Copilot coding guidelines - prevent panic-prone patterns in production code only
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::indexing_slicing))]
#![cfg_attr(not(test), warn(clippy::expect_used))]
#![cfg_attr(not(test), no_std)]

//! Blocking I2C master adapter over a command-queue driver.
//!
//! Start with [`i2c::I2cController`]: open it with an [`i2c::I2cConfig`] and a
//! driver implementing [`i2c::traits::I2cCommandQueue`], then issue writes,
//! reads and register accesses against 7-bit addresses.

pub mod common;
pub mod i2c;
pub mod tests;
