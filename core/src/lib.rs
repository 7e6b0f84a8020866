//! Persistence for the breakpoint table of a PGM learned index.
//!
//! Building a learned index over hundreds of millions of keys is expensive, so the segment
//! breakpoints of a built index can be written to disk and read back in later runs:
//!
//! ```no_run
//! use pgm_persist_core::*;
//!
//! let keys: Vec<u64> = load_keys("osm_cellids_200M_uint64");
//! let index: PGMIndex<u64, 128> = PGMIndex::new(&keys);
//!
//! write_segment_file::<u64, _>(&index, "segments.bin", PersistScope::AllLevels)?;
//! let breakpoints: Vec<u64> = read_segment_file("segments.bin")?;
//! assert_eq!(breakpoints.len(), index.segments_count());
//! # Ok::<(), PersistError>(())
//! ```

mod common;
mod error;
mod index;
mod key_file;
mod pgm;
mod segment_file;
mod traits;

pub use error::{PersistError, PersistResult};
pub use index::SegmentedIndex;
pub use key_file::{load_keys, read_key_file};
pub use pgm::PGMIndex;
pub use segment_file::{
    load_segments, read_segment_file, save_segments, write_segment_file, PersistScope,
};
pub use traits::*;

pub use learned_index_segmentation::{
    ApproxPos, LinearModel, OptimalSegmentation, Segmentation, SimpleSegmentation,
};
