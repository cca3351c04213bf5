//! Small geometry helpers shared by the map viewer: extents, range remapping,
//! line sides, and a stateless integer hash.

use glam::Vec2;

/// An axis aligned box around a set of points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: Vec2,
    pub max: Vec2,
}

impl Extent {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// `None` if there are no points
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    #[inline]
    pub fn centre(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Clamp `value` to `[in_min, in_max]` and map it linearly on to
/// `[out_min, out_max]`. A zero width input range maps to the middle of the
/// output range.
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span <= 0.0 {
        return (out_min + out_max) * 0.5;
    }
    let clamped = value.clamp(in_min, in_max);
    (clamped - in_min) * (out_max - out_min) / span + out_min
}

/// Which side of the line through `origin` along `delta` the point is on.
/// 0 is the front (right), 1 is the back (left).
#[inline]
pub fn point_on_side(origin: Vec2, delta: Vec2, point: Vec2) -> usize {
    let dx = point.x - origin.x;
    let dy = point.y - origin.y;

    if (dy * delta.x) <= (delta.y * dx) {
        // Front side
        return 0;
    }
    // Backside
    1
}

/// SplitMix64 finaliser. A pure function, so the same input gives the same
/// output on every call and every run.
#[inline]
pub const fn splitmix64(mut value: u64) -> u64 {
    value = value.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = value;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
