/// Axis-aligned bounds of a point cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Bounds3 {
    pub fn center(&self) -> [f64; 3] {
        [0, 1, 2].map(|axis| (self.min[axis] + self.max[axis]) / 2.0)
    }

    /// Largest half-extent over the three axes; never zero.
    pub fn max_half_extent(&self) -> f64 {
        let largest = (0..3)
            .map(|axis| (self.max[axis] - self.min[axis]) / 2.0)
            .fold(0.0, f64::max);
        if largest > f64::EPSILON {
            largest
        } else {
            1.0
        }
    }
}

pub struct StatsHelper;

impl StatsHelper {
    pub fn bounds<'a, I>(points: I) -> Option<Bounds3>
    where
        I: IntoIterator<Item = &'a [f64; 3]>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Bounds3 {
            min: first,
            max: first,
        };
        for point in iter {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(point[axis]);
                bounds.max[axis] = bounds.max[axis].max(point[axis]);
            }
        }
        Some(bounds)
    }
}
