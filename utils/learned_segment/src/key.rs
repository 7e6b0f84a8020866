use std::fmt::Debug;

use num::PrimInt;

/// An integer key which can be fitted by the segmentation algorithms.
///
/// All hull arithmetic is carried out in `i128`, so keys must embed losslessly into it.
pub trait SegmentKey: PrimInt + Debug + Send + Sync + 'static {
    fn to_signed(self) -> i128;

    fn as_f64(self) -> f64 {
        self.to_signed() as f64
    }
}

macro_rules! impl_segment_key {
    ($($t:ty),+) => {
        $(
            impl SegmentKey for $t {
                #[inline(always)]
                fn to_signed(self) -> i128 {
                    self as i128
                }
            }
        )*
    }
}

impl_segment_key!(usize, u8, u16, u32, u64, isize, i8, i16, i32, i64);
