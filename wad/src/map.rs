use crate::error::Result;
use crate::lumps::{
    LumpRecord, WadLineDef, WadSector, WadSegment, WadSideDef, WadSubSector, WadThing, WadVertex,
};
use crate::nodes::{NodeChild, WadNode};
use crate::wad::WadArchive;
use log::info;
use std::io::{Read, Seek};

/// All of the geometry tables for one map. Built once by
/// `WadArchive::load_map` and never changed afterwards; it holds no reference
/// to the archive, so the archive can be dropped once the map is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapData {
    name: String,
    things: Vec<WadThing>,
    linedefs: Vec<WadLineDef>,
    sidedefs: Vec<WadSideDef>,
    vertexes: Vec<WadVertex>,
    segments: Vec<WadSegment>,
    subsectors: Vec<WadSubSector>,
    nodes: Vec<WadNode>,
    sectors: Vec<WadSector>,
}

impl MapData {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn things(&self) -> &[WadThing] {
        &self.things
    }

    pub fn linedefs(&self) -> &[WadLineDef] {
        &self.linedefs
    }

    pub fn sidedefs(&self) -> &[WadSideDef] {
        &self.sidedefs
    }

    pub fn vertexes(&self) -> &[WadVertex] {
        &self.vertexes
    }

    pub fn segments(&self) -> &[WadSegment] {
        &self.segments
    }

    pub fn subsectors(&self) -> &[WadSubSector] {
        &self.subsectors
    }

    pub fn nodes(&self) -> &[WadNode] {
        &self.nodes
    }

    pub fn sectors(&self) -> &[WadSector] {
        &self.sectors
    }

    pub fn vertex(&self, index: usize) -> Option<&WadVertex> {
        self.vertexes.get(index)
    }

    pub fn linedef(&self, index: usize) -> Option<&WadLineDef> {
        self.linedefs.get(index)
    }

    pub fn segment(&self, index: usize) -> Option<&WadSegment> {
        self.segments.get(index)
    }

    pub fn subsector(&self, index: usize) -> Option<&WadSubSector> {
        self.subsectors.get(index)
    }

    pub fn node(&self, index: usize) -> Option<&WadNode> {
        self.nodes.get(index)
    }

    /// The root of the BSP. The last node is the root; a map too small to need
    /// splitting has no nodes and its only sub-sector is the whole tree.
    pub fn start_node(&self) -> NodeChild {
        match self.nodes.len() {
            0 => NodeChild::SubSector(0),
            n => NodeChild::Node((n - 1) as u16),
        }
    }

    /// The first player one start, if the map has one
    pub fn player_start(&self) -> Option<&WadThing> {
        self.things
            .iter()
            .find(|t| t.kind == WadThing::PLAYER_ONE_START)
    }
}

impl<R: Read + Seek> WadArchive<R> {
    /// Read every geometry table belonging to the map marker `name`
    pub fn load_map(&mut self, name: &str) -> Result<MapData> {
        let map = MapData {
            name: name.to_ascii_uppercase(),
            things: self.read_map_lump(name)?,
            linedefs: self.read_map_lump(name)?,
            sidedefs: self.read_map_lump(name)?,
            vertexes: self.read_map_lump(name)?,
            segments: self.read_map_lump(name)?,
            subsectors: self.read_map_lump(name)?,
            nodes: self.read_map_lump(name)?,
            sectors: self.read_map_lump(name)?,
        };
        log_loaded(&map);
        Ok(map)
    }

    /// Read a map from an archive that has no map marker, taking the first
    /// lump of each name
    pub fn load_unmarked_map(&mut self) -> Result<MapData> {
        let map = MapData {
            name: String::new(),
            things: self.read_lump_by_name(WadThing::LUMP.name())?,
            linedefs: self.read_lump_by_name(WadLineDef::LUMP.name())?,
            sidedefs: self.read_lump_by_name(WadSideDef::LUMP.name())?,
            vertexes: self.read_lump_by_name(WadVertex::LUMP.name())?,
            segments: self.read_lump_by_name(WadSegment::LUMP.name())?,
            subsectors: self.read_lump_by_name(WadSubSector::LUMP.name())?,
            nodes: self.read_lump_by_name(WadNode::LUMP.name())?,
            sectors: self.read_lump_by_name(WadSector::LUMP.name())?,
        };
        log_loaded(&map);
        Ok(map)
    }
}

fn log_loaded(map: &MapData) {
    info!(
        "Loaded map {:?}: {} vertexes, {} linedefs, {} segs, {} subsectors, {} nodes",
        map.name,
        map.vertexes.len(),
        map.linedefs.len(),
        map.segments.len(),
        map.subsectors.len(),
        map.nodes.len()
    );
}
