//! The block list engine.
//!
//! A [`BlockList`] partitions the address space `0..total_size` into an
//! address-ordered sequence of segments, each either free or owned by one
//! process. Every public operation preserves three invariants:
//!
//! - the segments cover `0..total_size` without gaps or overlaps,
//! - no two neighboring segments are both free,
//! - a process name owns at most one segment.
//!
//! Segments live in a `Vec` indexed by position. Splitting a hole inserts the
//! allocated prefix in front of it, and merging removes the absorbed
//! neighbor, so every operation is linear in the number of segments.

use alloc::{vec, vec::Vec};
use core::ops::Range;

use snafu::{OptionExt as _, ensure};

use crate::{
    MemoryStats, ProcessName, ReportEntry, Segment, SegmentState, Strategy,
    error::{
        AllocError, DuplicateProcessSnafu, InvalidSizeSnafu, InvariantViolation,
        OutOfMemorySnafu, ProcessNotFoundSnafu, ZeroCapacitySnafu,
    },
};

/// An address-ordered list of segments covering a fixed-size address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockList {
    total_size: usize,
    segments: Vec<Segment>,
}

impl BlockList {
    /// Creates a block list whose whole address space is one hole.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_list::BlockList;
    ///
    /// let list = BlockList::new(100).unwrap();
    /// assert_eq!(list.segments().len(), 1);
    /// assert!(list.segments()[0].is_free());
    ///
    /// assert!(BlockList::new(0).is_err());
    /// ```
    pub fn new(total_size: usize) -> Result<Self, AllocError> {
        ensure!(total_size > 0, ZeroCapacitySnafu);
        Ok(Self {
            total_size,
            segments: vec![Segment::free(0, total_size)],
        })
    }

    #[must_use]
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Returns the segments in address order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the segment owned by `name`, if any.
    #[must_use]
    pub fn find(&self, name: &ProcessName) -> Option<&Segment> {
        self.segments.iter().find(|seg| seg.is_owned_by(name))
    }

    fn position(&self, name: &ProcessName) -> Option<usize> {
        self.segments.iter().position(|seg| seg.is_owned_by(name))
    }

    /// Allocates `size` bytes to `name` from the hole chosen by `strategy`.
    ///
    /// An exactly fitting hole is handed over whole. Otherwise the hole is
    /// split: the allocation takes its lower addresses and the rest stays
    /// free. Returns the allocated address range.
    ///
    /// # Errors
    ///
    /// - [`AllocError::DuplicateProcess`] if `name` already owns a segment.
    /// - [`AllocError::InvalidSize`] if `size` is zero.
    /// - [`AllocError::OutOfMemory`] if no hole is large enough.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_list::{BlockList, ProcessName, Strategy};
    ///
    /// let mut list = BlockList::new(100).unwrap();
    /// let p1 = ProcessName::new("P1").unwrap();
    /// assert_eq!(list.allocate(p1, 30, Strategy::FirstFit).unwrap(), 0..30);
    /// assert!(list.allocate(p1, 10, Strategy::FirstFit).is_err());
    /// ```
    pub fn allocate(
        &mut self,
        name: ProcessName,
        size: usize,
        strategy: Strategy,
    ) -> Result<Range<usize>, AllocError> {
        ensure!(self.find(&name).is_none(), DuplicateProcessSnafu { name });
        ensure!(size > 0, InvalidSizeSnafu { name });

        let index = strategy
            .select(&self.segments, size)
            .context(OutOfMemorySnafu {
                name,
                size,
                strategy,
            })?;

        let hole = &mut self.segments[index];
        let start = hole.start;
        if hole.size == size {
            hole.state = SegmentState::Allocated(name);
        } else {
            hole.start += size;
            hole.size -= size;
            self.segments
                .insert(index, Segment::allocated(start, size, name));
        }

        self.debug_check_invariants();
        Ok(start..start + size)
    }

    /// Frees the segment owned by `name` and merges it with free neighbors.
    ///
    /// Returns the address range the process held.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::ProcessNotFound`] if `name` owns no segment.
    pub fn release(&mut self, name: &ProcessName) -> Result<Range<usize>, AllocError> {
        let mut index = self
            .position(name)
            .context(ProcessNotFoundSnafu { name: *name })?;
        let released = self.segments[index].range();
        self.segments[index].state = SegmentState::Free;

        if index > 0 && self.segments[index - 1].is_free() {
            let absorbed = self.segments.remove(index);
            index -= 1;
            self.segments[index].size += absorbed.size;
        }
        if self.segments.get(index + 1).is_some_and(Segment::is_free) {
            let absorbed = self.segments.remove(index + 1);
            self.segments[index].size += absorbed.size;
        }

        self.debug_check_invariants();
        Ok(released)
    }

    /// Moves every allocated segment to the front of the address space.
    ///
    /// Allocated segments keep their relative order, sizes and owners. The
    /// remaining space, if any, becomes a single trailing hole.
    pub fn compact(&mut self) {
        self.segments.retain(|seg| !seg.is_free());

        let mut cursor = 0;
        for seg in &mut self.segments {
            seg.start = cursor;
            cursor += seg.size;
        }
        if cursor < self.total_size {
            self.segments
                .push(Segment::free(cursor, self.total_size - cursor));
        }

        self.debug_check_invariants();
    }

    /// Returns one report entry per segment, in address order.
    pub fn report(&self) -> impl Iterator<Item = ReportEntry> + '_ {
        self.segments.iter().map(ReportEntry::from)
    }

    #[must_use]
    pub fn stats(&self) -> MemoryStats {
        MemoryStats::collect(self.total_size, &self.segments)
    }

    /// Verifies the structural invariants of the list.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.segments.is_empty() {
            return Err(InvariantViolation::Empty);
        }

        let mut expected = 0;
        for (index, seg) in self.segments.iter().enumerate() {
            if seg.size == 0 {
                return Err(InvariantViolation::EmptySegment { index });
            }
            if seg.start != expected {
                return Err(InvariantViolation::Discontinuous {
                    index,
                    start: seg.start,
                    expected,
                });
            }
            expected = seg.end();
        }
        if expected != self.total_size {
            return Err(InvariantViolation::Truncated {
                end: expected,
                total_size: self.total_size,
            });
        }

        for (index, pair) in self.segments.windows(2).enumerate() {
            if pair[0].is_free() && pair[1].is_free() {
                return Err(InvariantViolation::AdjacentFree { index });
            }
        }

        for (index, seg) in self.segments.iter().enumerate() {
            let Some(name) = seg.owner() else {
                continue;
            };
            if self.segments[index + 1..]
                .iter()
                .any(|other| other.is_owned_by(name))
            {
                return Err(InvariantViolation::DuplicateOwner { name: *name });
            }
        }

        Ok(())
    }

    fn debug_check_invariants(&self) {
        debug_assert_eq!(self.check_invariants(), Ok(()), "block list corrupted");
    }
}
