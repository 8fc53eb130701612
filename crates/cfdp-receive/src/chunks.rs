//! Gap Tracker: the chunk list data structure (spec §3 "Chunk list", §4.5).

use std::ops::Range;

use crate::collab::ChunkStore;

/// An ordered set of disjoint received byte ranges, capacity-bounded by
/// `max_chunks`.
///
/// Ranges are kept sorted by `start` and coalesced on insertion so the
/// invariant "the chunk list contains only disjoint, ordered ranges" (spec
/// §3) always holds without a separate compaction pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkList {
    ranges: Vec<Range<u64>>,
    max_chunks: usize,
}

impl ChunkList {
    /// Creates an empty chunk list bounded to `max_chunks` disjoint ranges.
    #[must_use]
    pub fn new(max_chunks: usize) -> Self {
        Self {
            ranges: Vec::new(),
            max_chunks,
        }
    }

    /// Total number of disjoint ranges currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Reports whether no bytes have been received yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Reports whether `[scope.start, scope.end)` is fully covered by the
    /// tracked ranges, i.e. `compute_gaps` over that scope would invoke its
    /// callback zero times.
    #[must_use]
    pub fn covers(&self, scope: Range<u64>) -> bool {
        let mut covered = true;
        self.compute_gaps(scope, &mut |_| covered = false);
        covered
    }
}

impl ChunkStore for ChunkList {
    fn add(&mut self, range: Range<u64>) {
        if range.is_empty() {
            return;
        }

        let insert_at = self
            .ranges
            .partition_point(|existing| existing.start < range.start);

        self.ranges.insert(insert_at, range);

        // Coalesce left-to-right: a freshly-inserted range may now abut or
        // overlap its neighbors on either side.
        let mut i = 0;
        while i + 1 < self.ranges.len() {
            if self.ranges[i].end >= self.ranges[i + 1].start {
                let merged_end = self.ranges[i].end.max(self.ranges[i + 1].end);
                self.ranges[i].end = merged_end;
                self.ranges.remove(i + 1);
            } else {
                i += 1;
            }
        }

        if self.ranges.len() > self.max_chunks {
            // Capacity is exceeded; the oldest-inserted boundary information
            // is lost by merging the two closest-together ranges, which is
            // the least harmful way to shrink below the configured bound.
            self.merge_closest_pair();
        }
    }

    fn compute_gaps(&self, scope: Range<u64>, callback: &mut dyn FnMut(Range<u64>)) {
        if scope.is_empty() {
            return;
        }

        let mut cursor = scope.start;
        for range in &self.ranges {
            if range.end <= cursor {
                continue;
            }
            if range.start >= scope.end {
                break;
            }
            let gap_start = cursor;
            let gap_end = range.start.min(scope.end);
            if gap_end > gap_start {
                callback(gap_start..gap_end);
            }
            cursor = cursor.max(range.end).min(scope.end);
            if cursor >= scope.end {
                return;
            }
        }

        if cursor < scope.end {
            callback(cursor..scope.end);
        }
    }
}

impl ChunkList {
    fn merge_closest_pair(&mut self) {
        let Some((index, _)) = self
            .ranges
            .windows(2)
            .enumerate()
            .min_by_key(|(_, pair)| pair[1].start - pair[0].end)
        else {
            return;
        };
        let merged_end = self.ranges[index].end.max(self.ranges[index + 1].end);
        self.ranges[index].end = merged_end;
        self.ranges.remove(index + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_coalesces_adjacent_ranges() {
        let mut list = ChunkList::new(10);
        list.add(0..100);
        list.add(100..200);
        assert_eq!(list.len(), 1);
        assert!(list.covers(0..200));
    }

    #[test]
    fn add_coalesces_overlapping_ranges() {
        let mut list = ChunkList::new(10);
        list.add(0..150);
        list.add(100..200);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn gap_in_the_middle_is_reported() {
        let mut list = ChunkList::new(10);
        list.add(0..100);
        list.add(200..300);

        let mut gaps = Vec::new();
        list.compute_gaps(0..300, &mut |gap| gaps.push(gap));

        assert_eq!(gaps, vec![100..200]);
    }

    #[test]
    fn gap_clamping_relative_to_scope() {
        // Matches spec §8 scenario 6: a chunk at offset 11000 size 100 within
        // a NAK scope of {10000, 20000} produces a gap of {1000, 11000} and
        // {11100, 20000} relative to... actually the scope itself is
        // absolute; segment offsets are relativized by the caller (see
        // `class2::nak`). This test only asserts the absolute gap shape.
        let mut list = ChunkList::new(10);
        list.add(11_000..11_100);

        let mut gaps = Vec::new();
        list.compute_gaps(10_000..20_000, &mut |gap| gaps.push(gap));

        assert_eq!(gaps, vec![10_000..11_000, 11_100..20_000]);
    }

    #[test]
    fn no_gaps_when_scope_fully_covered() {
        let mut list = ChunkList::new(10);
        list.add(0..300);
        assert!(list.covers(0..300));
    }

    #[test]
    fn covers_is_false_with_any_gap() {
        let mut list = ChunkList::new(10);
        list.add(0..100);
        list.add(150..300);
        assert!(!list.covers(0..300));
    }

    #[test]
    fn capacity_is_respected_by_merging_closest_pair() {
        let mut list = ChunkList::new(2);
        list.add(0..10);
        list.add(100..110);
        list.add(1000..1010);
        assert!(list.len() <= 2);
    }
}
