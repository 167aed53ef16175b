// Licensed under the Apache-2.0 license

//! Logging seam shared by the driver modules.
//!
//! Controllers are generic over a [`Logger`] so that bare-metal builds can pay
//! nothing for diagnostics ([`NoOpLogger`]) while hosted or RTT-equipped
//! builds route messages through the `log` facade ([`LogFacade`]).

use core::fmt::Arguments;

/// Sink for human-readable driver diagnostics.
///
/// Messages are free-form and carry no compatibility guarantee.
pub trait Logger {
    fn debug(&mut self, args: Arguments<'_>);
    fn info(&mut self, args: Arguments<'_>);
    fn error(&mut self, args: Arguments<'_>);
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&mut self, _args: Arguments<'_>) {}
    fn info(&mut self, _args: Arguments<'_>) {}
    fn error(&mut self, _args: Arguments<'_>) {}
}

/// Forwards to the `log` crate.
///
/// The backend (`env_logger`, `esp-println`, `defmt` bridge, ...) is chosen by
/// the application.
#[derive(Clone, Copy, Debug)]
pub struct LogFacade {
    target: &'static str,
}

impl LogFacade {
    pub const DEFAULT_TARGET: &'static str = "i2c";

    #[must_use]
    pub const fn new(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogFacade {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TARGET)
    }
}

impl Logger for LogFacade {
    fn debug(&mut self, args: Arguments<'_>) {
        log::debug!(target: self.target, "{}", args);
    }

    fn info(&mut self, args: Arguments<'_>) {
        log::info!(target: self.target, "{}", args);
    }

    fn error(&mut self, args: Arguments<'_>) {
        log::error!(target: self.target, "{}", args);
    }
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn debug(&mut self, args: Arguments<'_>) {
        (**self).debug(args);
    }

    fn info(&mut self, args: Arguments<'_>) {
        (**self).info(args);
    }

    fn error(&mut self, args: Arguments<'_>) {
        (**self).error(args);
    }
}
