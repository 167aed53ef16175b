// Licensed under the Apache-2.0 license

//! Frame-buffered writes for byte-stream display drivers.
//!
//! Display libraries in the u8g2 family push a frame as a sequence of
//! begin / send / end callbacks. [`Buffered`] collects the sent chunks and
//! puts the whole frame on the bus as one `write` when the transfer ends.

use crate::common::Logger;
use crate::i2c::error::Error;
use crate::i2c::i2c_controller::I2cController;
use crate::i2c::traits::I2cCommandQueue;
use heapless::Vec;

/// 7-bit address of an SSD1306 OLED controller with SA0 low.
pub const SSD1306_ADDRESS: u8 = 0x3C;

/// Bytes held per frame; anything beyond is dropped.
pub const FRAME_CAPACITY: usize = 128;

#[derive(Debug)]
pub struct Buffered {
    address: u8,
    frame: Vec<u8, FRAME_CAPACITY>,
}

impl Default for Buffered {
    fn default() -> Self {
        Self::new(SSD1306_ADDRESS)
    }
}

impl Buffered {
    #[must_use]
    pub fn new(address: u8) -> Self {
        Self {
            address,
            frame: Vec::new(),
        }
    }

    #[must_use]
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Bytes collected since the last `begin`.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.frame
    }

    pub fn begin(&mut self) {
        self.frame.clear();
    }

    /// Append `bytes` to the frame and return how many did not fit.
    pub fn send(&mut self, bytes: &[u8]) -> usize {
        for (sent, &byte) in bytes.iter().enumerate() {
            if self.frame.push(byte).is_err() {
                return bytes.len() - sent;
            }
        }
        0
    }

    /// Flush the frame as a single write. The frame is consumed either way.
    ///
    /// # Errors
    ///
    /// Whatever [`I2cController::write`] reports. An empty frame succeeds
    /// without touching the bus.
    pub fn end<H: I2cCommandQueue, L: Logger>(
        &mut self,
        controller: &mut I2cController<H, L>,
    ) -> Result<(), Error> {
        if self.frame.is_empty() {
            return Ok(());
        }
        let result = controller.write(self.address, &self.frame);
        self.frame.clear();
        result
    }
}
