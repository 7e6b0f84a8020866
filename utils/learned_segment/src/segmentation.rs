use crate::{
    model::LinearModel,
    point::{cross, Point},
    SegmentKey,
};

/// An algorithm for turning a sorted list of key-rank pairs into a piecewise linear model.
///
/// Keys must be non-decreasing. Every returned model covers a contiguous run of the input and
/// its `min_key` is the first key of that run, so the models come out sorted by key.
pub trait Segmentation: 'static {
    fn make_segmentation<K: SegmentKey>(
        key_ranks: impl Iterator<Item = (K, usize)>,
        epsilon: usize,
    ) -> Vec<LinearModel<K>>;
}

/// The optimal linear segmentation algorithm, which maintains the convex hull of the points
/// of the current segment and closes a segment only when no line fits all of them.
pub struct OptimalSegmentation;

impl Segmentation for OptimalSegmentation {
    fn make_segmentation<K: SegmentKey>(
        key_ranks: impl Iterator<Item = (K, usize)>,
        epsilon: usize,
    ) -> Vec<LinearModel<K>> {
        let key_ranks: Vec<(K, usize)> = key_ranks.collect();
        let n = key_ranks.len();

        if n == 0 {
            return Vec::new();
        }

        let in_fun = |i: usize| {
            let x: K = key_ranks[i].0;
            // Here there is an adjustment for inputs with duplicate keys: at the end
            // of a run of duplicate keys equal to x=first[i] such that
            // x+1!=first[i+1], we map the values x+1,...,first[i+1]-1 to their
            // correct rank i
            let flag = i > 0
                && i + 1 < n
                && x == key_ranks[i - 1].0
                && x != key_ranks[i + 1].0
                && x + K::one() != key_ranks[i + 1].0;

            if flag {
                (x + K::one(), key_ranks[i].1)
            } else {
                key_ranks[i]
            }
        };

        let mut segments: Vec<LinearModel<K>> = vec![];
        let mut model = OptimalPiecewiseLinearModel::<K>::new(epsilon);

        let mut p = in_fun(0);
        model.add_point(p);

        for i in 1..n {
            let next_p = in_fun(i);
            if next_p.0 == p.0 {
                continue;
            }

            p = next_p;
            if !model.add_point(p) {
                segments.push(model.get_segment().into_model());
                // A fresh hull always accepts its first point
                model.add_point(p);
            }
        }

        segments.push(model.get_segment().into_model());
        segments
    }
}

#[derive(Debug)]
struct CanonicalSegment<K> {
    rectangle: [Point<K>; 4],
    first: K,
}

struct OptimalPiecewiseLinearModel<K> {
    epsilon: usize,
    lower: Vec<Point<K>>,
    upper: Vec<Point<K>>,
    first_x: K,
    last_x: K,
    lower_start: usize,
    upper_start: usize,
    points_in_hull: usize,
    rectangle: [Point<K>; 4],
}

impl<K: SegmentKey> OptimalPiecewiseLinearModel<K> {
    fn new(epsilon: usize) -> Self {
        Self {
            epsilon,
            lower: Vec::with_capacity(1 << 16),
            upper: Vec::with_capacity(1 << 16),
            first_x: K::min_value(),
            last_x: K::min_value(),
            lower_start: 0,
            upper_start: 0,
            points_in_hull: 0,
            rectangle: [Default::default(); 4],
        }
    }

    /// Tries to extend the current segment with a point, returning `false` and resetting the
    /// hull when the point does not fit.
    fn add_point(&mut self, (x, y): (K, usize)) -> bool {
        if self.points_in_hull > 0 && x <= self.last_x {
            return false;
        }

        self.last_x = x;

        let p1 = Point {
            x,
            y: y.saturating_add(self.epsilon),
        };
        let p2 = Point {
            x,
            y: y.saturating_sub(self.epsilon),
        };

        if self.points_in_hull == 0 {
            self.first_x = x;
            self.rectangle[0] = p1;
            self.rectangle[1] = p2;
            self.upper.clear();
            self.lower.clear();
            self.upper.push(p1);
            self.lower.push(p2);
            self.upper_start = 0;
            self.lower_start = 0;
            self.points_in_hull += 1;
            return true;
        }

        if self.points_in_hull == 1 {
            self.rectangle[2] = p2;
            self.rectangle[3] = p1;
            self.upper.push(p1);
            self.lower.push(p2);
            self.points_in_hull += 1;
            return true;
        }

        let slope1 = self.rectangle[2] - self.rectangle[0];
        let slope2 = self.rectangle[3] - self.rectangle[1];
        let outside_line1 = p1 - self.rectangle[2] < slope1;
        let outside_line2 = p2 - self.rectangle[3] > slope2;

        if outside_line1 || outside_line2 {
            self.points_in_hull = 0;
            return false;
        }

        if p1 - self.rectangle[1] < slope2 {
            // Find extreme slope
            let mut min = self.lower[self.lower_start] - p1;
            let mut min_i = self.lower_start;
            for i in (self.lower_start + 1)..self.lower.len() {
                let val = self.lower[i] - p1;
                if val > min {
                    break;
                }
                min = val;
                min_i = i;
            }

            self.rectangle[1] = self.lower[min_i];
            self.rectangle[3] = p1;
            self.lower_start = min_i;

            // Hull update
            let mut end = self.upper.len();
            while end >= self.upper_start + 2
                && cross(self.upper[end - 2], self.upper[end - 1], p1) <= 0
            {
                end -= 1;
            }

            self.upper.truncate(end);
            self.upper.push(p1);
        }

        if p2 - self.rectangle[0] > slope1 {
            // Find extreme slope
            let mut max = self.upper[self.upper_start] - p2;
            let mut max_i = self.upper_start;
            for i in (self.upper_start + 1)..self.upper.len() {
                let val = self.upper[i] - p2;
                if val < max {
                    break;
                }
                max = val;
                max_i = i;
            }

            self.rectangle[0] = self.upper[max_i];
            self.rectangle[2] = p2;
            self.upper_start = max_i;

            // Hull update
            let mut end = self.lower.len();
            while end >= self.lower_start + 2
                && cross(self.lower[end - 2], self.lower[end - 1], p2) >= 0
            {
                end -= 1;
            }

            self.lower.truncate(end);
            self.lower.push(p2);
        }

        self.points_in_hull += 1;
        true
    }

    fn get_segment(&self) -> CanonicalSegment<K> {
        if self.points_in_hull == 1 {
            return CanonicalSegment::diagonal(self.rectangle[0], self.rectangle[1], self.first_x);
        }

        CanonicalSegment::new(self.rectangle, self.first_x)
    }
}

impl<K: SegmentKey> CanonicalSegment<K> {
    fn into_model(self) -> LinearModel<K> {
        let (slope, intercept) = self.get_floating_point_segment(self.first);
        LinearModel::new(self.first, slope, intercept as i64)
    }

    fn diagonal(p0: Point<K>, p1: Point<K>, first: K) -> Self {
        Self {
            rectangle: [p0, p1, p0, p1],
            first,
        }
    }

    fn new(rectangle: [Point<K>; 4], first: K) -> Self {
        Self { rectangle, first }
    }

    fn one_point(&self) -> bool {
        self.rectangle[0] == self.rectangle[2] && self.rectangle[1] == self.rectangle[3]
    }

    fn get_floating_point_segment(&self, origin: K) -> (f64, i128) {
        if self.one_point() {
            return (
                0.0,
                (self.rectangle[0].y as i128 + self.rectangle[1].y as i128) / 2,
            );
        }

        // Integral version of the method (rounding version)
        let slope = self.rectangle[3] - self.rectangle[1];
        let intercept_n = slope.dy * (origin.to_signed() - self.rectangle[1].x.to_signed());
        let intercept_d = slope.dx;
        let rounding_term = (if (intercept_n < 0) ^ (intercept_d < 0) {
            -1
        } else {
            1
        }) * intercept_d
            / 2;
        let intercept = (intercept_n + rounding_term) / intercept_d + self.rectangle[1].y as i128;

        (slope.slope(), intercept)
    }
}

/// The greedy "shrinking cone" segmentation: a segment is anchored at its first point and
/// keeps the range of slopes which approximate every later point, closing once it is empty.
///
/// Cheaper than [`OptimalSegmentation`] but usually produces more segments.
pub struct SimpleSegmentation;

struct ShrinkingCone<K> {
    origin: Option<(K, usize)>,
    last_key: Option<K>,
    max_slope: f64,
    min_slope: f64,
    num_entries: usize,
}

impl<K: SegmentKey> ShrinkingCone<K> {
    fn new() -> Self {
        Self {
            origin: None,
            last_key: None,
            max_slope: f64::MAX,
            min_slope: f64::MIN,
            num_entries: 0,
        }
    }

    /// Tries to add an entry to this cone, returning whether it was successful.
    fn try_add_entry(&mut self, (key, rank): (K, usize), epsilon: usize) -> bool {
        let Some((first_key, first_rank)) = self.origin else {
            self.origin = Some((key, rank));
            self.last_key = Some(key);
            self.num_entries = 1;
            return true;
        };

        debug_assert!(self.last_key.map_or(true, |last| last < key));

        // Leave one position of slack on both sides to absorb flooring and float error
        let run = (key - first_key).as_f64();
        let rise = rank.saturating_sub(first_rank) as f64;
        let slack = epsilon.saturating_sub(1) as f64;
        let this_max = (rise + slack) / run;
        let this_min = (rise - slack) / run;

        let new_max_slope = this_max.min(self.max_slope);
        let new_min_slope = this_min.max(self.min_slope);
        if new_min_slope > new_max_slope {
            // We can't fit this point in the model
            return false;
        }

        self.max_slope = new_max_slope;
        self.min_slope = new_min_slope;
        self.num_entries += 1;
        self.last_key = Some(key);
        true
    }

    // Outputs a linear model that fits all the points presented so far
    fn to_linear_model(&self) -> Option<LinearModel<K>> {
        let (first_key, first_rank) = self.origin?;

        let slope = if self.num_entries > 1 {
            (self.max_slope + self.min_slope) / 2.0
        } else {
            // A model that only has one point can pick any slope
            0.0
        };

        Some(LinearModel::new(first_key, slope.max(0.0), first_rank as i64))
    }
}

impl Segmentation for SimpleSegmentation {
    fn make_segmentation<K: SegmentKey>(
        key_ranks: impl Iterator<Item = (K, usize)>,
        epsilon: usize,
    ) -> Vec<LinearModel<K>> {
        let mut result = vec![];
        let mut cone = ShrinkingCone::new();
        let mut last_key: Option<K> = None;

        for entry in key_ranks {
            // Only the first occurrence of a duplicate run is fitted
            if last_key == Some(entry.0) {
                continue;
            }
            last_key = Some(entry.0);

            if !cone.try_add_entry(entry, epsilon) {
                result.extend(cone.to_linear_model());
                cone = ShrinkingCone::new();
                cone.try_add_entry(entry, epsilon);
            }
        }

        // Handle last segment
        result.extend(cone.to_linear_model());
        result
    }
}
