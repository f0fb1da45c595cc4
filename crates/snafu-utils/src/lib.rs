//! Error helpers shared by the simulator crates.
//!
//! - [`Location`] records the source position an error was created at and
//!   plugs into `snafu` as implicit data.
//! - [`GenericError`] is a `whatever`-style error for fatal paths that only
//!   need a message and an optional cause.
//! - [`Report`] prints an error together with its chain of causes.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::{boxed::Box, string::String};
use core::{error::Error, fmt};

use ansi_term::{Color, WithFg};
use snafu::{GenerateImplicitData, Snafu};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location(&'static core::panic::Location<'static>);

impl Default for Location {
    #[track_caller]
    fn default() -> Self {
        Self(core::panic::Location::caller())
    }
}

impl GenerateImplicitData for Location {
    #[track_caller]
    fn generate() -> Self {
        Self::default()
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Location {
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.0.line()
    }
}

#[derive(Debug, Snafu)]
#[snafu(whatever, display("{message}"))]
pub struct GenericError {
    message: String,
    #[snafu(implicit)]
    location: Location,
    #[snafu(source(from(Box<dyn Error>, Some)))]
    source: Option<Box<dyn Error>>,
}

impl GenericError {
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }
}

/// Displays an error and every error in its `source()` chain.
///
/// Errors in the chain that are [`GenericError`]s also get the location they
/// were raised at. Other error types can be located with
/// [`with_locator`](Self::with_locator).
pub struct Report<E> {
    error: E,
    locate: Locator,
}

/// Finds the location of an error type [`Report`] does not know about.
pub type Locator = fn(&(dyn Error + 'static)) -> Option<Location>;

impl<E> fmt::Debug for Report<E>
where
    E: Error + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<E> fmt::Display for Report<E>
where
    E: Error + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let error: &(dyn Error + 'static) = &self.error;
        writeln!(f, "Error: {}", WithFg::new(Color::Red, error))?;
        if let Some(loc) = self.location_of(error) {
            writeln!(f, "  at {}", WithFg::new(Color::DarkGray, loc))?;
        }
        let mut source = error.source();
        if source.is_some() {
            writeln!(f)?;
            writeln!(f, "Caused by:")?;
        }
        let mut index = 0;
        while let Some(s) = source {
            writeln!(f, "{index:4}: {}", WithFg::new(Color::Red, s))?;
            if let Some(loc) = self.location_of(s) {
                writeln!(f, "      at {}", WithFg::new(Color::DarkGray, loc))?;
            }
            source = s.source();
            index += 1;
        }
        Ok(())
    }
}

impl<E> Report<E> {
    pub fn new(error: E) -> Self {
        Self {
            error,
            locate: |_| None,
        }
    }

    #[must_use]
    pub fn with_locator(self, locate: Locator) -> Self {
        Self { locate, ..self }
    }

    fn location_of(&self, error: &(dyn Error + 'static)) -> Option<Location> {
        error
            .downcast_ref::<GenericError>()
            .map(GenericError::location)
            .or_else(|| (self.locate)(error))
    }
}
