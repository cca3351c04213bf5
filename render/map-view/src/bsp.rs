use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use log::{debug, trace};
use math::point_on_side;
use render_trait::{BufferSize, DrawSurface};
use wad::{BoundingBox, MapData, NodeChild, WadNode};

use crate::colour::{BLUE, GREEN, GREY, ORANGE, RED, WHITE, id_colour};
use crate::{MapProjection, RenderError};

/// How far below the root node the renderer walks
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TraversalDepth {
    /// Only the root node's boxes and partition line
    #[default]
    RootOnly,
    /// At most this many levels below the root
    Limited(u32),
    /// Every node and leaf
    Full,
}

impl TraversalDepth {
    /// Is a node `depth` levels below the root visited
    pub const fn allows(self, depth: u32) -> bool {
        match self {
            TraversalDepth::RootOnly => depth == 0,
            TraversalDepth::Limited(max) => depth <= max,
            TraversalDepth::Full => true,
        }
    }
}

impl FromStr for TraversalDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "root" => Ok(TraversalDepth::RootOnly),
            "full" => Ok(TraversalDepth::Full),
            n => n
                .parse::<u32>()
                .map(TraversalDepth::Limited)
                .map_err(|_| format!("invalid depth {s:?}, expected root, full, or a number")),
        }
    }
}

impl fmt::Display for TraversalDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalDepth::RootOnly => write!(f, "root"),
            TraversalDepth::Limited(n) => write!(f, "{n}"),
            TraversalDepth::Full => write!(f, "full"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Inset from every edge of the surface, in pixels
    pub margin: f32,
    pub max_depth: TraversalDepth,
    /// Draw the segs of each sub-sector reached, coloured by sub-sector id
    pub draw_segs: bool,
    pub draw_vertexes: bool,
    pub linedef_width: u32,
    pub bbox_width: u32,
    pub partition_width: u32,
    pub seg_width: u32,
    pub viewer_radius: f32,
    pub vertex_radius: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            margin: MapProjection::DEFAULT_MARGIN,
            max_depth: TraversalDepth::default(),
            draw_segs: false,
            draw_vertexes: false,
            linedef_width: 3,
            bbox_width: 2,
            partition_width: 4,
            seg_width: 4,
            viewer_radius: 4.0,
            vertex_radius: 4.0,
        }
    }
}

/// Draws one map's geometry and BSP on to any `DrawSurface`. The projection
/// is fixed when the renderer is made, so every frame uses the same scale.
pub struct BspRenderer<'m> {
    map: &'m MapData,
    projection: MapProjection,
    options: RenderOptions,
    /// Map vertexes already in surface space
    vertexes: Vec<Vec2>,
}

impl<'m> BspRenderer<'m> {
    pub fn new(
        map: &'m MapData,
        size: BufferSize,
        options: RenderOptions,
    ) -> Result<Self, RenderError> {
        let projection = MapProjection::from_vertexes(map.vertexes(), size, options.margin)?;
        let vertexes = map
            .vertexes()
            .iter()
            .map(|v| projection.project(Vec2::new(v.x as f32, v.y as f32)))
            .collect();
        debug!(
            "Projecting {} to {}x{}, extent {:?}",
            map.name(),
            size.width(),
            size.height(),
            projection.extent()
        );
        Ok(Self {
            map,
            projection,
            options,
            vertexes,
        })
    }

    pub fn projection(&self) -> &MapProjection {
        &self.projection
    }

    /// Draw a whole frame: linedefs, the viewer, then the BSP from the root.
    /// The side of each partition holding the viewer is walked first.
    pub fn render_frame(
        &self,
        surface: &mut impl DrawSurface,
        viewer: Vec2,
    ) -> Result<(), RenderError> {
        surface.clear();
        if self.options.draw_vertexes {
            self.draw_vertexes(surface);
        }
        self.draw_linedefs(surface)?;
        self.draw_viewer(viewer, surface);

        let visited = self.walk(self.map.start_node(), Some(viewer), surface)?;
        trace!("Frame visited {visited} nodes");
        Ok(())
    }

    /// Draw `node_id` and, as far as `max_depth` allows, the nodes below it.
    /// `node_id` is a raw child id, so a leaf id draws that sub-sector.
    /// Returns the number of nodes visited.
    pub fn render_node(
        &self,
        node_id: u16,
        surface: &mut impl DrawSurface,
    ) -> Result<usize, RenderError> {
        let visited = self.walk(NodeChild::from_raw(node_id), None, surface)?;
        trace!("Visited {visited} nodes from {node_id:#06x}");
        Ok(visited)
    }

    pub fn draw_linedefs(&self, surface: &mut impl DrawSurface) -> Result<(), RenderError> {
        for line in self.map.linedefs() {
            let start = self.vertex(line.start_vertex as usize)?;
            let end = self.vertex(line.end_vertex as usize)?;
            surface.draw_line(start, end, GREY, self.options.linedef_width);
        }
        Ok(())
    }

    pub fn draw_vertexes(&self, surface: &mut impl DrawSurface) {
        for v in &self.vertexes {
            surface.fill_circle(*v, self.options.vertex_radius, WHITE);
        }
    }

    /// `pos` is in world coordinates
    pub fn draw_viewer(&self, pos: Vec2, surface: &mut impl DrawSurface) {
        surface.fill_circle(self.projection.project(pos), self.options.viewer_radius, ORANGE);
    }

    /// Draw every seg of one sub-sector in that sub-sector's colour
    pub fn draw_subsector(
        &self,
        subsector_id: u16,
        surface: &mut impl DrawSurface,
    ) -> Result<(), RenderError> {
        let index = subsector_id as usize;
        let subsector = self.map.subsector(index).ok_or(RenderError::IndexOutOfRange {
            table: "subsectors",
            index,
            len: self.map.subsectors().len(),
        })?;

        let segs = self.map.segments();
        let first = subsector.first_seg as u16 as usize;
        let end = first + subsector.seg_count as u16 as usize;
        if end > segs.len() {
            return Err(RenderError::IndexOutOfRange {
                table: "segs",
                index: end - 1,
                len: segs.len(),
            });
        }

        let colour = id_colour(subsector_id as u32);
        for seg in &segs[first..end] {
            let start = self.vertex(seg.start_vertex as u16 as usize)?;
            let end = self.vertex(seg.end_vertex as u16 as usize)?;
            surface.draw_line(start, end, colour, self.options.seg_width);
        }
        Ok(())
    }

    fn walk(
        &self,
        root: NodeChild,
        viewer: Option<Vec2>,
        surface: &mut impl DrawSurface,
    ) -> Result<usize, RenderError> {
        let mut seen = vec![false; self.map.nodes().len()];
        self.visit(root, 0, viewer, surface, &mut seen)?;
        Ok(seen.iter().filter(|s| **s).count())
    }

    fn visit(
        &self,
        child: NodeChild,
        depth: u32,
        viewer: Option<Vec2>,
        surface: &mut impl DrawSurface,
        seen: &mut [bool],
    ) -> Result<(), RenderError> {
        // Leaf test before anything touches the node table
        let id = match child {
            NodeChild::SubSector(id) => {
                if self.options.draw_segs {
                    self.draw_subsector(id, surface)?;
                }
                return Ok(());
            }
            NodeChild::Node(id) => id,
        };

        let nodes = self.map.nodes();
        let node = nodes.get(id as usize).ok_or(RenderError::IndexOutOfRange {
            table: "nodes",
            index: id as usize,
            len: nodes.len(),
        })?;
        // Each node has one parent, so reaching it twice is a cycle or a
        // shared child
        if std::mem::replace(&mut seen[id as usize], true) {
            return Err(RenderError::MalformedTree { node: id });
        }
        self.draw_node(node, surface);

        if !self.options.max_depth.allows(depth + 1) {
            return Ok(());
        }

        let near = match viewer {
            Some(pos) => point_on_side(
                Vec2::new(node.x as f32, node.y as f32),
                Vec2::new(node.dx as f32, node.dy as f32),
                pos,
            ),
            None => 0,
        };
        for side in [near, near ^ 1] {
            let child = NodeChild::from_raw(node.child_index[side]);
            self.visit(child, depth + 1, viewer, surface, seen)?;
        }
        Ok(())
    }

    /// Front box, back box, then the partition line
    fn draw_node(&self, node: &WadNode, surface: &mut impl DrawSurface) {
        self.draw_bbox(node.front_box(), GREEN, surface);
        self.draw_bbox(node.back_box(), RED, surface);

        let (end_x, end_y) = node.partition_end();
        let start = self.projection.project(Vec2::new(node.x as f32, node.y as f32));
        let end = self.projection.project(Vec2::new(end_x as f32, end_y as f32));
        surface.draw_line(start, end, BLUE, self.options.partition_width);
    }

    fn draw_bbox(&self, bbox: &BoundingBox, colour: [u8; 4], surface: &mut impl DrawSurface) {
        let top_left = Vec2::new(
            self.projection.remap_x(bbox.left as f32),
            self.projection.remap_y(bbox.top as f32),
        );
        let bottom_right = Vec2::new(
            self.projection.remap_x(bbox.right as f32),
            self.projection.remap_y(bbox.bottom as f32),
        );
        surface.draw_rect(top_left, bottom_right, colour, self.options.bbox_width);
    }

    #[inline]
    fn vertex(&self, index: usize) -> Result<Vec2, RenderError> {
        self.vertexes
            .get(index)
            .copied()
            .ok_or(RenderError::IndexOutOfRange {
                table: "vertexes",
                index,
                len: self.vertexes.len(),
            })
    }
}
