use core::{fmt, str::FromStr};

use arrayvec::ArrayString;

/// Maximum length of a process name in bytes.
pub const MAX_NAME_LEN: usize = 31;

/// The reasons a string is rejected as a [`ProcessName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[non_exhaustive]
pub enum InvalidProcessName {
    #[display("process name is empty")]
    Empty,
    #[display("process name is too long: len={len}, max={}", MAX_NAME_LEN)]
    TooLong { len: usize },
    #[display("process name contains whitespace")]
    Whitespace,
}

/// The name of a process owning an allocated segment.
///
/// Names are non-empty, at most [`MAX_NAME_LEN`] bytes long and contain no
/// whitespace, so that they survive a round trip through the command line
/// unchanged.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessName(ArrayString<MAX_NAME_LEN>);

impl ProcessName {
    /// Validates `name` and stores it inline.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_list::{InvalidProcessName, ProcessName};
    ///
    /// let name = ProcessName::new("P1").unwrap();
    /// assert_eq!(name.as_str(), "P1");
    ///
    /// assert_eq!(ProcessName::new(""), Err(InvalidProcessName::Empty));
    /// assert_eq!(ProcessName::new("a b"), Err(InvalidProcessName::Whitespace));
    /// ```
    pub fn new(name: &str) -> Result<Self, InvalidProcessName> {
        if name.is_empty() {
            return Err(InvalidProcessName::Empty);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(InvalidProcessName::Whitespace);
        }
        let inner = ArrayString::from(name).map_err(|err| InvalidProcessName::TooLong {
            len: err.element().len(),
        })?;
        Ok(Self(inner))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for ProcessName {
    type Err = InvalidProcessName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ProcessName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for ProcessName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl fmt::Debug for ProcessName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for ProcessName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_max_len() {
        let long = "p".repeat(MAX_NAME_LEN);
        let name = ProcessName::new(&long).unwrap();
        assert_eq!(name.as_str(), long);
    }

    #[test]
    fn test_rejects_too_long() {
        let long = "p".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            ProcessName::new(&long),
            Err(InvalidProcessName::TooLong {
                len: MAX_NAME_LEN + 1
            })
        );
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert_eq!(ProcessName::new(""), Err(InvalidProcessName::Empty));
        assert_eq!(
            ProcessName::new("P\t1"),
            Err(InvalidProcessName::Whitespace)
        );
    }

    #[test]
    fn test_display_and_parse() {
        let name: ProcessName = "worker-7".parse().unwrap();
        assert_eq!(format!("{name}"), "worker-7");
        assert_eq!(format!("{name:?}"), "\"worker-7\"");
        assert!(name == *"worker-7");
    }
}
