//! The view of a built learned index that persistence needs.

use crate::KeyBounded;

/// A multi-level segmented index: a flat sequence of segments partitioned into levels by an
/// offset table.
///
/// Level `i` occupies `segments()[offsets[i]..offsets[i + 1]]`; level 0 is the base level built
/// over the raw keys and every higher level indexes the level below it. The last offset equals
/// the total number of segments.
pub trait SegmentedIndex<K> {
    type Segment: KeyBounded<K>;

    /// Builds the index over a sorted key sequence.
    fn build(keys: &[K]) -> Self
    where
        Self: Sized;

    fn segments(&self) -> &[Self::Segment];

    fn levels_offsets(&self) -> &[usize];

    /// Number of levels
    fn height(&self) -> usize {
        self.levels_offsets().len().saturating_sub(1)
    }

    fn segments_count(&self) -> usize {
        self.segments().len()
    }

    /// The segments of a single level, empty if the level does not exist.
    fn level(&self, level: usize) -> &[Self::Segment] {
        let offsets = self.levels_offsets();
        match (offsets.get(level), offsets.get(level + 1)) {
            (Some(&start), Some(&end)) => self.segments().get(start..end).unwrap_or(&[]),
            _ => &[],
        }
    }

    fn base_level(&self) -> &[Self::Segment] {
        self.level(0)
    }
}
