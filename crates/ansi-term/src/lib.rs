//! Minimal ANSI foreground coloring for terminal output.
//!
//! Coloring can be switched off process-wide with [`set_enabled`], in which
//! case [`WithFg`] renders its value unchanged. The switch is meant to be set
//! once at startup from the command line.

#![cfg_attr(not(test), no_std)]

use core::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Turns ANSI escape sequences on or off for every [`WithFg`] rendered
/// afterwards.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

#[must_use]
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    DarkGray,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
}

impl Color {
    fn fg(self) -> u8 {
        match self {
            Self::DarkGray => 90,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
        }
    }
}

/// A value rendered in bold with the given foreground color.
pub struct WithFg<T>(Color, T);

impl<T> fmt::Display for WithFg<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = &self.1;
        if !is_enabled() {
            return write!(f, "{value}");
        }
        let fg = self.0.fg();
        write!(f, "\x1B[{fg};1m{value}\x1B[0m")
    }
}

impl<T> WithFg<T> {
    pub fn new(color: Color, value: T) -> Self {
        Self(color, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_switch() {
        set_enabled(true);
        assert_eq!(
            format!("{}", WithFg::new(Color::Red, "oops")),
            "\x1B[31;1moops\x1B[0m"
        );
        set_enabled(false);
        assert_eq!(format!("{}", WithFg::new(Color::Red, "oops")), "oops");
        set_enabled(true);
    }
}
