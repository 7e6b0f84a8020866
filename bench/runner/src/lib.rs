use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context;
use pgm_persist_core::{
    read_key_file, read_segment_file, write_segment_file, Key, PGMIndex, PersistScope,
    SegmentedIndex,
};
use serde::{Deserialize, Serialize};
pub use serde_json::from_str;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = ".pgm_segments.json";

/// Space-time trade-off of the base level
pub const EPSILON: usize = 128;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyType {
    U32,
    #[default]
    U64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RunParams {
    #[serde(default)]
    pub key_type: KeyType,
    pub key_file: PathBuf,
    pub segment_file: PathBuf,
    #[serde(default)]
    pub scope: PersistScope,
}

impl RunParams {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        from_str(&json).with_context(|| format!("invalid config {}", path.display()))
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub keys: usize,
    pub build_time: Duration,
    pub size_in_bytes: usize,
    pub height: usize,
    pub segments_count: usize,
    pub levels_offsets: Vec<usize>,
    pub saved: usize,
    pub loaded: usize,
}

/// Loads the keys, builds the index, saves its segments and loads them back.
pub fn run<K: Key>(params: &RunParams) -> anyhow::Result<RunReport> {
    let keys: Vec<K> = read_key_file(&params.key_file)
        .with_context(|| format!("failed to load keys from {}", params.key_file.display()))?;

    let start = Instant::now();
    let index: PGMIndex<K, EPSILON> = PGMIndex::new(&keys);
    let build_time = start.elapsed();
    info!(
        keys = keys.len(),
        segments = index.segments_count(),
        build_time = %humantime::format_duration(build_time),
        "built PGM index"
    );

    let saved = write_segment_file::<K, _>(&index, &params.segment_file, params.scope)
        .with_context(|| {
            format!(
                "failed to save segments to {}",
                params.segment_file.display()
            )
        })?;

    let loaded: Vec<K> = read_segment_file(&params.segment_file).with_context(|| {
        format!(
            "failed to load segments from {}",
            params.segment_file.display()
        )
    })?;

    anyhow::ensure!(
        loaded.len() == saved,
        "saved {} segments but loaded {}",
        saved,
        loaded.len()
    );

    Ok(RunReport {
        keys: keys.len(),
        build_time,
        size_in_bytes: index.size_in_bytes(),
        height: index.height(),
        segments_count: index.segments_count(),
        levels_offsets: index.levels_offsets().to_vec(),
        saved,
        loaded: loaded.len(),
    })
}
