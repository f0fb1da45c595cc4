use core::ops::{Range, RangeInclusive};

use crate::ProcessName;

/// Whether a segment is a hole or owned by a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum SegmentState {
    Free,
    Allocated(ProcessName),
}

/// A contiguous, non-empty range of the simulated address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub(crate) start: usize,
    pub(crate) size: usize,
    pub(crate) state: SegmentState,
}

impl Segment {
    pub(crate) fn free(start: usize, size: usize) -> Self {
        Self {
            start,
            size,
            state: SegmentState::Free,
        }
    }

    pub(crate) fn allocated(start: usize, size: usize, owner: ProcessName) -> Self {
        Self {
            start,
            size,
            state: SegmentState::Allocated(owner),
        }
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the first address past this segment.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.size
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Returns the addresses covered by this segment, last address included.
    #[must_use]
    pub fn inclusive_range(&self) -> RangeInclusive<usize> {
        self.start..=self.end() - 1
    }

    #[must_use]
    pub fn state(&self) -> &SegmentState {
        &self.state
    }

    #[must_use]
    pub fn owner(&self) -> Option<&ProcessName> {
        match &self.state {
            SegmentState::Free => None,
            SegmentState::Allocated(owner) => Some(owner),
        }
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        self.state.is_free()
    }

    pub(crate) fn is_owned_by(&self, name: &ProcessName) -> bool {
        self.owner() == Some(name)
    }
}
