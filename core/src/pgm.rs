//! A multi-level PGM index: a base level of linear models over the keys, topped by recursive
//! levels over the representative keys of the level below.

use std::marker::PhantomData;

use learned_index_segmentation::{LinearModel, OptimalSegmentation, Segmentation};
use tracing::debug;

use crate::{Key, SegmentedIndex};

pub struct PGMIndex<
    K,
    const EPSILON: usize,
    const EPSILON_RECURSIVE: usize = 4,
    S = OptimalSegmentation,
> {
    n: usize,
    segments: Vec<LinearModel<K>>,
    levels_offsets: Vec<usize>,

    /// Keep the segmentation as a generic parameter so the fitting strategy is part of the type
    _ph: PhantomData<S>,
}

impl<K, const EPSILON: usize, const EPSILON_RECURSIVE: usize, S>
    PGMIndex<K, EPSILON, EPSILON_RECURSIVE, S>
where
    K: Key,
    S: Segmentation,
{
    pub fn new(keys: &[K]) -> Self {
        let mut segments: Vec<LinearModel<K>> = Vec::new();
        let mut levels_offsets = vec![0];

        if !keys.is_empty() {
            segments = S::make_segmentation(keys.iter().copied().zip(0..), EPSILON);
            levels_offsets.push(segments.len());

            // Each recursive level is built over the previous one until it fits in one segment
            while EPSILON_RECURSIVE > 0 && Self::last_level_len(&levels_offsets) > 1 {
                let start = levels_offsets[levels_offsets.len() - 2];
                let level = S::make_segmentation(
                    segments[start..].iter().map(|model| *model.min_key()).zip(0..),
                    EPSILON_RECURSIVE,
                );

                segments.extend(level);
                levels_offsets.push(segments.len());
            }
        }

        debug!(
            keys = keys.len(),
            segments = segments.len(),
            height = levels_offsets.len() - 1,
            epsilon = EPSILON,
            "built PGM index"
        );

        Self {
            n: keys.len(),
            segments,
            levels_offsets,
            _ph: PhantomData,
        }
    }

    fn last_level_len(levels_offsets: &[usize]) -> usize {
        match levels_offsets {
            [.., start, end] => end - start,
            _ => 0,
        }
    }
}

impl<K, const EPSILON: usize, const EPSILON_RECURSIVE: usize, S>
    PGMIndex<K, EPSILON, EPSILON_RECURSIVE, S>
{
    /// Number of keys the index was built over
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn epsilon(&self) -> usize {
        EPSILON
    }

    pub fn epsilon_recursive(&self) -> usize {
        EPSILON_RECURSIVE
    }

    /// Memory taken by the segments and the offset table, excluding the keys themselves
    pub fn size_in_bytes(&self) -> usize {
        self.segments.len() * std::mem::size_of::<LinearModel<K>>()
            + self.levels_offsets.len() * std::mem::size_of::<usize>()
    }
}

impl<K, const EPSILON: usize, const EPSILON_RECURSIVE: usize, S> SegmentedIndex<K>
    for PGMIndex<K, EPSILON, EPSILON_RECURSIVE, S>
where
    K: Key,
    S: Segmentation,
{
    type Segment = LinearModel<K>;

    fn build(keys: &[K]) -> Self {
        Self::new(keys)
    }

    fn segments(&self) -> &[Self::Segment] {
        &self.segments
    }

    fn levels_offsets(&self) -> &[usize] {
        &self.levels_offsets
    }
}
