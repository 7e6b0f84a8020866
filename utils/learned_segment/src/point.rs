use crate::SegmentKey;

/// A slope between two key-rank points, kept as an exact fraction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Slope {
    pub(crate) dx: i128,
    pub(crate) dy: i128,
}

impl Slope {
    pub(crate) fn slope(&self) -> f64 {
        self.dy as f64 / self.dx as f64
    }
}

impl PartialEq for Slope {
    fn eq(&self, other: &Self) -> bool {
        self.dy * other.dx == self.dx * other.dy
    }
}

impl PartialOrd for Slope {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        (self.dy * other.dx).partial_cmp(&(self.dx * other.dy))
    }
}

/// Represents a key-rank pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Point<K> {
    pub(crate) x: K,
    pub(crate) y: usize,
}

impl<K: SegmentKey> Default for Point<K> {
    fn default() -> Self {
        Self { x: K::zero(), y: 0 }
    }
}

impl<K: SegmentKey> std::ops::Sub for Point<K> {
    type Output = Slope;

    fn sub(self, rhs: Self) -> Self::Output {
        Slope {
            dx: self.x.to_signed() - rhs.x.to_signed(),
            dy: self.y as i128 - rhs.y as i128,
        }
    }
}

/// Cross product of `oa` and `ob`, positive when `o -> a -> b` turns counter-clockwise.
pub(crate) fn cross<K: SegmentKey>(o: Point<K>, a: Point<K>, b: Point<K>) -> i128 {
    let oa = a - o;
    let ob = b - o;
    oa.dx * ob.dy - oa.dy * ob.dx
}
