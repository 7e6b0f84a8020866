//! Record-level I/O shared by the key and segment files: both are flat runs of fixed-width
//! native-endian records.

use std::{
    fs::File,
    io::{self, Read, Write},
    path::Path,
};

use tempfile::NamedTempFile;

use crate::{FixedWidthKey, PersistError, PersistResult};

pub(crate) fn open_for_read(path: &Path) -> PersistResult<File> {
    File::open(path).map_err(|source| PersistError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Number of whole `K` records in a file of `len` bytes and the size of the ragged tail.
pub(crate) fn record_layout<K: FixedWidthKey>(len: u64) -> (usize, usize) {
    let width = K::WIDTH as u64;
    let records = usize::try_from(len / width).unwrap_or(usize::MAX);
    (records, (len % width) as usize)
}

/// Reads exactly `count` records in a single transfer.
pub(crate) fn read_records<K: FixedWidthKey>(
    mut reader: impl Read,
    count: usize,
) -> io::Result<Vec<K>> {
    let mut bytes = vec![0u8; count * K::WIDTH];
    reader.read_exact(&mut bytes)?;

    Ok(bytes.chunks_exact(K::WIDTH).filter_map(K::read_ne).collect())
}

pub(crate) fn read_record<K: FixedWidthKey>(reader: impl Read) -> io::Result<K> {
    let mut record = read_records::<K>(reader, 1)?;
    record
        .pop()
        .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
}

/// Writes `bytes` to `path` through a uniquely named temporary file in the same directory,
/// so that `path` either keeps its previous contents or holds all of `bytes`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> PersistResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|source| PersistError::Open {
        path: dir.to_path_buf(),
        source,
    })?;

    let write_error = |source: io::Error| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };

    file.write_all(bytes)
        .and_then(|()| file.flush())
        .and_then(|()| file.as_file().sync_all())
        .map_err(write_error)?;

    // Dropping the temporary file on error removes it
    file.persist(path).map_err(|err| write_error(err.error))?;
    Ok(())
}
