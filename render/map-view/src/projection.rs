use glam::Vec2;
use math::{Extent, remap};
use render_trait::BufferSize;
use wad::WadVertex;

use crate::RenderError;

/// World to surface mapping. World Y grows upward and surface Y grows
/// downward, so Y is flipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    extent: Extent,
    size: BufferSize,
    margin: f32,
}

impl MapProjection {
    pub const DEFAULT_MARGIN: f32 = 10.0;

    pub fn new(extent: Extent, size: BufferSize, margin: f32) -> Self {
        Self {
            extent,
            size,
            margin,
        }
    }

    /// Size the projection to every vertex of a map
    pub fn from_vertexes(
        vertexes: &[WadVertex],
        size: BufferSize,
        margin: f32,
    ) -> Result<Self, RenderError> {
        let points = vertexes.iter().map(|v| Vec2::new(v.x as f32, v.y as f32));
        let extent = Extent::from_points(points).ok_or(RenderError::EmptyMap)?;
        Ok(Self::new(extent, size, margin))
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    #[inline]
    pub fn remap_x(&self, x: f32) -> f32 {
        remap(
            x,
            self.extent.min.x,
            self.extent.max.x,
            self.margin,
            self.size.width_f32() - self.margin,
        )
    }

    #[inline]
    pub fn remap_y(&self, y: f32) -> f32 {
        let height = self.size.height_f32();
        height
            - remap(
                y,
                self.extent.min.y,
                self.extent.max.y,
                self.margin,
                height - self.margin,
            )
    }

    #[inline]
    pub fn project(&self, point: Vec2) -> Vec2 {
        Vec2::new(self.remap_x(point.x), self.remap_y(point.y))
    }
}
