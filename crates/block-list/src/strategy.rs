use alloc::string::{String, ToString as _};
use core::str::FromStr;

use crate::Segment;

/// Hole placement policy for an allocation request.
///
/// All strategies scan holes in address order and only consider holes at
/// least as large as the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Strategy {
    /// Take the lowest-addressed hole that fits, stopping at the first match.
    #[display("first-fit")]
    FirstFit,
    /// Take the smallest hole that fits. Ties go to the lowest address.
    #[display("best-fit")]
    BestFit,
    /// Take the largest hole. Ties go to the lowest address.
    #[display("worst-fit")]
    WorstFit,
}

/// The error returned when parsing an unknown strategy letter.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown allocation strategy: {letter:?}")]
pub struct UnknownStrategy {
    letter: String,
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::FirstFit, Self::BestFit, Self::WorstFit];

    /// Returns the single-letter command code of this strategy.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::FirstFit => 'F',
            Self::BestFit => 'B',
            Self::WorstFit => 'W',
        }
    }

    /// Returns the index of the hole this strategy picks for `size` bytes.
    pub(crate) fn select(self, segments: &[Segment], size: usize) -> Option<usize> {
        let mut holes = segments
            .iter()
            .enumerate()
            .filter(|(_, seg)| seg.is_free() && seg.size >= size)
            .map(|(index, seg)| (index, seg.size));

        match self {
            Self::FirstFit => holes.next().map(|(index, _)| index),
            Self::BestFit => pick(holes, |capacity, best| capacity < best),
            Self::WorstFit => pick(holes, |capacity, best| capacity > best),
        }
    }
}

// Replacing only on a strict improvement keeps the first hole seen among
// equally good candidates.
fn pick<I>(holes: I, better: fn(usize, usize) -> bool) -> Option<usize>
where
    I: Iterator<Item = (usize, usize)>,
{
    let mut best: Option<(usize, usize)> = None;
    for (index, capacity) in holes {
        if best.is_none_or(|(_, best_capacity)| better(capacity, best_capacity)) {
            best = Some((index, capacity));
        }
    }
    best.map(|(index, _)| index)
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F" => Ok(Self::FirstFit),
            "B" => Ok(Self::BestFit),
            "W" => Ok(Self::WorstFit),
            _ => Err(UnknownStrategy {
                letter: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProcessName;

    fn layout(holes: &[(usize, bool)]) -> Vec<Segment> {
        let owner = ProcessName::new("X").unwrap();
        let mut start = 0;
        holes
            .iter()
            .map(|&(size, free)| {
                let seg = if free {
                    Segment::free(start, size)
                } else {
                    Segment::allocated(start, size, owner)
                };
                start += size;
                seg
            })
            .collect()
    }

    #[test]
    fn test_parse_letters() {
        for strategy in Strategy::ALL {
            let letter = strategy.letter().to_string();
            assert_eq!(letter.parse::<Strategy>(), Ok(strategy));
        }
        let err = "f".parse::<Strategy>().unwrap_err();
        assert_eq!(err.to_string(), "unknown allocation strategy: \"f\"");
        assert!("FF".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_select_skips_small_and_allocated() {
        let segs = layout(&[(10, false), (4, true), (10, false), (12, true)]);
        for strategy in Strategy::ALL {
            assert_eq!(strategy.select(&segs, 5), Some(3), "{strategy}");
            assert_eq!(strategy.select(&segs, 13), None, "{strategy}");
        }
    }

    #[test]
    fn test_select_ties_prefer_lowest_address() {
        let segs = layout(&[
            (8, true),
            (1, false),
            (6, true),
            (1, false),
            (8, true),
            (1, false),
            (6, true),
        ]);
        assert_eq!(Strategy::FirstFit.select(&segs, 6), Some(0));
        assert_eq!(Strategy::BestFit.select(&segs, 6), Some(2));
        assert_eq!(Strategy::WorstFit.select(&segs, 6), Some(0));
    }
}
