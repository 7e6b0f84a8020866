//! This file defines the Model portion of the PGM, which is simply just a
//! linear approximator anchored at the smallest key it covers.

use serde::{Deserialize, Serialize};

use crate::SegmentKey;

/// A window of positions guaranteed to hold the rank of an approximated key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApproxPos {
    pub lo: usize,
    pub hi: usize,
}

/// A simple linear model for a key-rank segment of data.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearModel<K> {
    /// Smallest key covered by this model, the segment's representative key
    pub(crate) key: K,
    pub(crate) slope: f64,
    pub(crate) intercept: i64,
}

impl<K: SegmentKey> LinearModel<K> {
    /// Construct a new model from the smallest key, slope, and intercept
    pub fn new(key: K, slope: f64, intercept: i64) -> Self {
        debug_assert!(slope.is_finite());
        Self {
            key,
            slope,
            intercept,
        }
    }

    /// Predicted rank of `key`, before widening by the error bound
    pub fn predict(&self, key: &K) -> usize {
        let run = key.saturating_sub(self.key).as_f64();
        let pos = ((self.slope * run) as i64).saturating_add(self.intercept);
        pos.max(0) as usize
    }

    /// Approximation logic for linear models
    pub fn approximate(&self, key: &K, epsilon: usize) -> ApproxPos {
        let pos = self.predict(key);

        ApproxPos {
            lo: pos.saturating_sub(epsilon),
            hi: pos + epsilon + 2,
        }
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> i64 {
        self.intercept
    }
}

impl<K> LinearModel<K> {
    pub fn min_key(&self) -> &K {
        &self.key
    }
}
