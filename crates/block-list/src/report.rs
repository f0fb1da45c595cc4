use core::{fmt, ops::RangeInclusive};

use crate::{ProcessName, Segment, SegmentState};

/// What occupies a reported address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum SegmentStatus {
    Unused,
    Process(ProcessName),
}

impl fmt::Display for SegmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unused => write!(f, "Unused"),
            Self::Process(name) => write!(f, "Process {name}"),
        }
    }
}

/// One line of a status report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportEntry {
    /// Covered addresses, last address included.
    pub range: RangeInclusive<usize>,
    pub status: SegmentStatus,
}

impl From<&Segment> for ReportEntry {
    fn from(seg: &Segment) -> Self {
        let status = match seg.state() {
            SegmentState::Free => SegmentStatus::Unused,
            SegmentState::Allocated(owner) => SegmentStatus::Process(*owner),
        };
        Self {
            range: seg.inclusive_range(),
            status,
        }
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Addresses [{}:{}] {}",
            self.range.start(),
            self.range.end(),
            self.status
        )
    }
}

/// Aggregate usage figures of a block list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryStats {
    pub total: usize,
    pub allocated: usize,
    pub free: usize,
    pub processes: usize,
    pub holes: usize,
    pub largest_hole: usize,
    /// External fragmentation, `1 - largest_hole / free`, in permille.
    ///
    /// Zero when nothing is free or all free space is one hole.
    pub fragmentation_permille: usize,
}

impl MemoryStats {
    pub(crate) fn collect(total: usize, segments: &[Segment]) -> Self {
        let mut stats = Self {
            total,
            allocated: 0,
            free: 0,
            processes: 0,
            holes: 0,
            largest_hole: 0,
            fragmentation_permille: 0,
        };
        for seg in segments {
            if seg.is_free() {
                stats.free += seg.size;
                stats.holes += 1;
                stats.largest_hole = stats.largest_hole.max(seg.size);
            } else {
                stats.allocated += seg.size;
                stats.processes += 1;
            }
        }
        stats.fragmentation_permille = permille(stats.free - stats.largest_hole, stats.free);
        stats
    }
}

/// `part * 1000 / whole` for `part < whole`, without overflowing.
fn permille(part: usize, whole: usize) -> usize {
    if whole == 0 {
        return 0;
    }
    match part.checked_mul(1000) {
        Some(scaled) => scaled / whole,
        // `whole > part >= usize::MAX / 1000` here, so `whole / 1000` is nonzero.
        None => (part / (whole / 1000)).min(999),
    }
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total {}, allocated {} to {} process(es), free {} in {} hole(s), largest hole {}, \
             fragmentation {}.{}%",
            self.total,
            self.allocated,
            self.processes,
            self.free,
            self.holes,
            self.largest_hole,
            self.fragmentation_permille / 10,
            self.fragmentation_permille % 10,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_display() {
        let owner = ProcessName::new("P2").unwrap();
        let entry = ReportEntry::from(&Segment::allocated(30, 20, owner));
        assert_eq!(entry.to_string(), "Addresses [30:49] Process P2");
        assert_eq!(entry.status, SegmentStatus::Process(owner));

        let entry = ReportEntry::from(&Segment::free(50, 50));
        assert_eq!(entry.to_string(), "Addresses [50:99] Unused");
        assert!(entry.status.is_unused());
    }

    #[test]
    fn test_stats() {
        let owner = ProcessName::new("P").unwrap();
        let segments = [
            Segment::free(0, 30),
            Segment::allocated(30, 20, owner),
            Segment::free(50, 10),
        ];
        let stats = MemoryStats::collect(60, &segments);
        assert_eq!(stats.allocated, 20);
        assert_eq!(stats.free, 40);
        assert_eq!(stats.holes, 2);
        assert_eq!(stats.largest_hole, 30);
        assert_eq!(stats.fragmentation_permille, 250);
        assert_eq!(
            stats.to_string(),
            "Total 60, allocated 20 to 1 process(es), free 40 in 2 hole(s), largest hole 30, \
             fragmentation 25.0%"
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_stats_huge_holes() {
        let owner = ProcessName::new("P").unwrap();
        let hole = 1 << 60;
        let segments = [
            Segment::free(0, hole),
            Segment::allocated(hole, 10, owner),
            Segment::free(hole + 10, hole),
        ];
        let stats = MemoryStats::collect(2 * hole + 10, &segments);
        assert_eq!(stats.free, 2 * hole);
        assert_eq!(stats.largest_hole, hole);
        assert_eq!(stats.fragmentation_permille, 500);
    }

    #[test]
    fn test_permille() {
        assert_eq!(permille(0, 0), 0);
        assert_eq!(permille(1, 3), 333);
        assert_eq!(permille(usize::MAX - 1, usize::MAX), 999);
    }

    #[test]
    fn test_stats_without_free_space() {
        let owner = ProcessName::new("P").unwrap();
        let stats = MemoryStats::collect(8, &[Segment::allocated(0, 8, owner)]);
        assert_eq!(stats.free, 0);
        assert_eq!(stats.fragmentation_permille, 0);
    }
}
