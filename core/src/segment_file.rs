//! Persistence of segment breakpoints, so an index can be reconstructed without refitting.
//!
//! A segment file stores one count record followed by exactly that many representative keys,
//! all of the key's width and in native byte order:
//!
//! ```text
//! [count: W][seg_key_0: W]...[seg_key_{count-1}: W]
//! ```

use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::common::io::{open_for_read, read_record, read_records, record_layout, write_atomic};
use crate::{FixedWidthKey, KeyBounded, PersistError, PersistResult, SegmentedIndex};

/// Which segments of an index are written to a segment file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PersistScope {
    /// Every segment of every level, in level order.
    #[default]
    AllLevels,
    /// Only the segments of level 0.
    BaseLevel,
}

impl PersistScope {
    pub fn select<'i, K, I: SegmentedIndex<K>>(&self, index: &'i I) -> &'i [I::Segment] {
        match self {
            PersistScope::AllLevels => index.segments(),
            PersistScope::BaseLevel => index.base_level(),
        }
    }
}

/// Encodes the segment file image of `segments`.
fn encode<K: FixedWidthKey, S: KeyBounded<K>>(segments: &[S]) -> PersistResult<Vec<u8>> {
    let count = K::from_count(segments.len()).ok_or(PersistError::CountOverflow {
        count: segments.len(),
        width: K::WIDTH,
    })?;

    let mut bytes = Vec::with_capacity((segments.len() + 1) * K::WIDTH);
    count.write_ne(&mut bytes);
    for segment in segments {
        segment.lower_bound().write_ne(&mut bytes);
    }

    Ok(bytes)
}

/// Writes the representative keys of the selected segments, returning how many were written.
///
/// The file is replaced atomically: on error nothing is left at `path` that was not there
/// before.
pub fn write_segment_file<K, I>(
    index: &I,
    path: impl AsRef<Path>,
    scope: PersistScope,
) -> PersistResult<usize>
where
    K: FixedWidthKey,
    I: SegmentedIndex<K>,
{
    let path = path.as_ref();
    let segments = scope.select::<K, I>(index);

    write_atomic(path, &encode::<K, _>(segments)?)?;

    info!(
        path = %path.display(),
        segments = segments.len(),
        scope = ?scope,
        "saved segments"
    );
    Ok(segments.len())
}

/// Like [`write_segment_file`], but logs failures instead of returning them.
///
/// Returns whether the file was written.
pub fn save_segments<K, I>(index: &I, path: impl AsRef<Path>, scope: PersistScope) -> bool
where
    K: FixedWidthKey,
    I: SegmentedIndex<K>,
{
    match write_segment_file::<K, I>(index, path, scope) {
        Ok(_) => true,
        Err(err) => {
            error!(%err, "failed to save segments");
            false
        }
    }
}

/// Reads the breakpoint keys of a segment file, in file order.
///
/// The declared count decides how many keys are read. If the file holds fewer whole records
/// than declared, the keys that are present are returned; bytes past the declared records are
/// ignored. Both cases are reported as warnings.
pub fn read_segment_file<K: FixedWidthKey>(path: impl AsRef<Path>) -> PersistResult<Vec<K>> {
    let path = path.as_ref();
    let mut file = open_for_read(path)?;

    let (records, trailing) = record_layout::<K>(file.metadata()?.len());
    if records == 0 {
        warn!(path = %path.display(), "segment file has no count record");
        return Ok(Vec::new());
    }

    let declared: K = read_record(&mut file)?;
    let available = records - 1;

    let count = match declared.to_count() {
        Some(count) if count <= available => {
            if count < available || trailing > 0 {
                warn!(
                    path = %path.display(),
                    declared = count,
                    extra_bytes = (available - count) * K::WIDTH + trailing,
                    "ignoring bytes past the declared segments"
                );
            }
            count
        }
        _ => {
            warn!(
                path = %path.display(),
                declared = ?declared,
                available,
                "segment file is shorter than its declared count, truncating"
            );
            available
        }
    };

    let keys = read_records(&mut file, count)?;

    info!(path = %path.display(), segments = keys.len(), "loaded segments");
    Ok(keys)
}

/// Like [`read_segment_file`], but logs failures and falls back to an empty sequence.
pub fn load_segments<K: FixedWidthKey>(path: impl AsRef<Path>) -> Vec<K> {
    match read_segment_file(path) {
        Ok(keys) => keys,
        Err(err) => {
            error!(%err, "failed to load segments");
            Vec::new()
        }
    }
}
