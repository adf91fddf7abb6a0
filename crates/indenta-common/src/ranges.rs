//! Coalescing set of inclusive offset ranges.
//! 可合并的闭区间偏移量集合。
//!
//! Stable-start searches record document areas which were already resolved
//! (for example a matched tag pair) so the engine can skip them.

use std::fmt;

/// An inclusive `[start, end]` range of document offsets.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetRange {
    pub start: usize,
    pub end: usize,
}

impl OffsetRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {start}-{end}");
        Self { start, end }
    }

    /// Is `[start, end]` fully inside this range?
    pub fn covers(&self, start: usize, end: usize) -> bool {
        start >= self.start && end <= self.end
    }

    fn touches(&self, other: &OffsetRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Debug for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.start, self.end)
    }
}

/// Result of trimming a line against the ignore-list.
/// 将行与忽略列表比较后的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uncovered {
    /// No range touches the area.
    Unchanged,
    /// Part of the area was covered; the rest is `[start, end]`.
    Trimmed { start: usize, end: usize },
    /// The whole area is covered.
    Covered,
}

/// Set of ignored offset ranges. Overlapping or bordering ranges are merged
/// on insert, so the set stays sorted and disjoint.
/// 忽略的偏移量区间集合。插入时合并重叠或相邻的区间。
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OffsetRanges {
    ranges: Vec<OffsetRange>,
}

impl OffsetRanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new range, coalescing with its neighbours.
    /// 添加新区间，并与相邻区间合并。
    pub fn add(&mut self, start: usize, end: usize) {
        let mut merged = OffsetRange::new(start.min(end), start.max(end));
        let mut kept = Vec::with_capacity(self.ranges.len() + 1);
        for range in self.ranges.drain(..) {
            if range.touches(&merged) {
                merged.start = merged.start.min(range.start);
                merged.end = merged.end.max(range.end);
            } else {
                kept.push(range);
            }
        }
        let at = kept.partition_point(|r| r.start < merged.start);
        kept.insert(at, merged);
        self.ranges = kept;
    }

    /// Is the area `[start, end]` within a single range?
    pub fn contains(&self, start: usize, end: usize) -> bool {
        self.ranges.iter().any(|r| r.covers(start, end))
    }

    /// Trim `[start, end]` so it does not overlap any range. A range lying
    /// strictly inside the area is ignored and the whole area is kept.
    /// 裁剪 `[start, end]` 使其不与任何区间重叠。
    pub fn uncovered(&self, start: usize, end: usize) -> Uncovered {
        let (mut start, mut end) = (start, end);
        let mut changed = false;
        for range in &self.ranges {
            if start < range.start && end > range.end {
                continue;
            }
            if range.covers(start, end) {
                return Uncovered::Covered;
            }
            if start >= range.start && start <= range.end {
                start = range.end + 1;
                changed = true;
            }
            if end >= range.start && end <= range.end {
                end = range.start.saturating_sub(1);
                changed = true;
            }
        }
        if !changed {
            Uncovered::Unchanged
        } else if start > end {
            Uncovered::Covered
        } else {
            Uncovered::Trimmed { start, end }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OffsetRange> {
        self.ranges.iter()
    }
}

impl fmt::Debug for OffsetRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OffsetRanges")?;
        f.debug_list().entries(self.ranges.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bordering_ranges_merge() {
        let mut ranges = OffsetRanges::new();
        ranges.add(10, 20);
        ranges.add(20, 30);
        assert_eq!(ranges.len(), 1);
        assert!(ranges.contains(10, 30));
    }

    #[test]
    fn test_gap_keeps_ranges_apart() {
        let mut ranges = OffsetRanges::new();
        ranges.add(40, 50);
        ranges.add(10, 20);
        assert_eq!(ranges.len(), 2);
        let starts: Vec<_> = ranges.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![10, 40]);
    }

    #[test]
    fn test_bridge_merges_three() {
        let mut ranges = OffsetRanges::new();
        ranges.add(0, 5);
        ranges.add(10, 15);
        ranges.add(4, 11);
        assert_eq!(ranges.len(), 1);
        assert!(ranges.contains(0, 15));
    }

    #[test]
    fn test_uncovered() {
        let mut ranges = OffsetRanges::new();
        ranges.add(10, 20);
        assert_eq!(ranges.uncovered(0, 5), Uncovered::Unchanged);
        assert_eq!(ranges.uncovered(12, 18), Uncovered::Covered);
        assert_eq!(
            ranges.uncovered(15, 30),
            Uncovered::Trimmed { start: 21, end: 30 }
        );
        assert_eq!(
            ranges.uncovered(5, 12),
            Uncovered::Trimmed { start: 5, end: 9 }
        );
        // range inside the line is ignored
        assert_eq!(ranges.uncovered(5, 25), Uncovered::Unchanged);
    }
}
