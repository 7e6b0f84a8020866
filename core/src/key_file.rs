//! Loading of raw sorted-key datasets.
//!
//! A key file is a flat array of `W`-byte native-endian integers whose first record is a
//! header (usually the number of keys that follow) rather than data:
//!
//! ```text
//! [header: W][key_0: W][key_1: W]...[key_{N-1}: W]
//! ```
//!
//! This is the layout of the common sorted-array benchmark datasets.

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::common::io::{open_for_read, read_record, read_records, record_layout};
use crate::{FixedWidthKey, PersistResult};

/// Reads every key of a key file, skipping the header record.
///
/// A trailing partial record is ignored, and a file without even a header yields no keys;
/// both are reported as warnings rather than errors.
pub fn read_key_file<K: FixedWidthKey>(path: impl AsRef<Path>) -> PersistResult<Vec<K>> {
    let path = path.as_ref();
    let mut file = open_for_read(path)?;

    let (records, trailing) = record_layout::<K>(file.metadata()?.len());
    if trailing > 0 {
        warn!(
            path = %path.display(),
            trailing_bytes = trailing,
            width = K::WIDTH,
            "key file size is not a multiple of the key width, ignoring the partial record"
        );
    }

    if records == 0 {
        warn!(path = %path.display(), "key file has no header record");
        return Ok(Vec::new());
    }

    let header: K = read_record(&mut file)?;
    let keys: Vec<K> = read_records(&mut file, records - 1)?;

    if header.to_count() != Some(keys.len()) {
        debug!(
            path = %path.display(),
            header = ?header,
            keys = keys.len(),
            "key file header does not match the number of keys"
        );
    }

    info!(path = %path.display(), keys = keys.len(), "read keys from key file");
    Ok(keys)
}

/// Like [`read_key_file`], but logs failures and falls back to an empty key sequence.
pub fn load_keys<K: FixedWidthKey>(path: impl AsRef<Path>) -> Vec<K> {
    match read_key_file(path) {
        Ok(keys) => keys,
        Err(err) => {
            error!(%err, "failed to load key file");
            Vec::new()
        }
    }
}
