use std::fmt::Debug;

use learned_index_segmentation::{LinearModel, SegmentKey};
use trait_set::trait_set;

// Until `trait_alias` is stabilized, we have to use a macro
trait_set! {
    /// General key type: can be fed to the index builder and stored in index files
    pub trait Key = FixedWidthKey + SegmentKey;
}

/// An unsigned integer stored as exactly `WIDTH` native-endian bytes.
///
/// Files carry no type tag, so a file is only meaningful when read back with the same key type
/// it was written with.
pub trait FixedWidthKey: Copy + Ord + Debug + Send + Sync + 'static {
    /// Size of one record in bytes
    const WIDTH: usize;

    /// Decodes a record, `None` unless `bytes` is exactly `WIDTH` long.
    fn read_ne(bytes: &[u8]) -> Option<Self>;

    /// Appends the native-endian encoding of this key.
    fn write_ne(&self, out: &mut Vec<u8>);

    /// Converts a record count into a key-width count field.
    fn from_count(count: usize) -> Option<Self>;

    /// Interprets this key as a record count.
    fn to_count(self) -> Option<usize>;
}

pub trait KeyBounded<K> {
    /// The smallest key covered, i.e. the representative key of a segment
    fn lower_bound(&self) -> &K;
}

macro_rules! impl_integer {
    ($($t:ty),+) => {
        $(
            impl FixedWidthKey for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                #[inline(always)]
                fn read_ne(bytes: &[u8]) -> Option<Self> {
                    bytes.try_into().ok().map(<$t>::from_ne_bytes)
                }

                #[inline(always)]
                fn write_ne(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_ne_bytes());
                }

                fn from_count(count: usize) -> Option<Self> {
                    <$t>::try_from(count).ok()
                }

                fn to_count(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }
            }

            impl KeyBounded<$t> for $t {
                fn lower_bound(&self) -> &$t {
                    self
                }
            }
        )*
    }
}

impl_integer!(usize, u8, u16, u32, u64, u128);

impl<K> KeyBounded<K> for LinearModel<K> {
    fn lower_bound(&self) -> &K {
        self.min_key()
    }
}
