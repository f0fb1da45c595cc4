use snafu::Snafu;
use snafu_utils::Location;

use crate::{ProcessName, Strategy};

/// Errors returned by [`BlockList`](crate::BlockList) operations.
///
/// A failed operation never modifies the block list.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AllocError {
    #[snafu(display("Process {name} already exists"))]
    DuplicateProcess {
        name: ProcessName,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Not enough memory for process {name}"))]
    OutOfMemory {
        name: ProcessName,
        size: usize,
        strategy: Strategy,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Process {name} not found"))]
    ProcessNotFound {
        name: ProcessName,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Invalid size for process {name}, size must be positive"))]
    InvalidSize {
        name: ProcessName,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Memory size must be positive"))]
    ZeroCapacity {
        #[snafu(implicit)]
        location: Location,
    },
}

impl AllocError {
    /// Returns the source location the error was raised at.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::DuplicateProcess { location, .. }
            | Self::OutOfMemory { location, .. }
            | Self::ProcessNotFound { location, .. }
            | Self::InvalidSize { location, .. }
            | Self::ZeroCapacity { location } => *location,
        }
    }
}

/// A broken structural invariant of a block list.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[display("block list has no segments")]
    Empty,
    #[display("segment {index} is empty")]
    EmptySegment { index: usize },
    #[display("segment {index} starts at {start}, expected {expected}")]
    Discontinuous {
        index: usize,
        start: usize,
        expected: usize,
    },
    #[display("segments end at {end}, expected {total_size}")]
    Truncated { end: usize, total_size: usize },
    #[display("segments {index} and {} are both free", index + 1)]
    AdjacentFree { index: usize },
    #[display("process {name} owns more than one segment")]
    DuplicateOwner { name: ProcessName },
}
