//  Structures, in WAD order
//  - [X] Thing
//  - [X] LineDef
//  - [X] SideDef
//  - [X] Vertex
//  - [X] Segment   (SEGS)
//  - [X] SubSector (SSECTORS)
//  - [X] Node      (see `nodes`)
//  - [X] Sector
//  - [ ] Reject
//  - [ ] Blockmap

use crate::cursor::BinaryCursor;
use crate::error::{Result, WadError};
use crate::wad::LumpInfo;
use std::io::{Read, Seek};

/// The value a `LineDef` stores in place of a sidedef index when that side
/// has no sidedef (one-sided wall)
pub const NO_SIDEDEF: u16 = 0xFFFF;

/// The lumps that make up a map, numbered by their position after the map
/// marker lump (`E1M1`, `MAP01`...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapLump {
    /// Position and angle for all monster, powerup and spawn location
    Things = 1,
    /// An array of lines referencing two vertices (Two vertexes are connected
    /// by one `LineDef`). Also points to one or two `SideDef` depending on if
    /// this line is a wall or a portal
    LineDefs,
    /// Defines upper, lower, and middle textures. Also defines texture
    /// horizontal and vertical offsets. This is information for a `LineDef`
    SideDefs,
    /// An array of signed short X, Y pairs (`Vertex`). All coordinates in this map
    /// block are indexes into this array
    Vertexes,
    /// Portions of lines cut due to Binary Space Partitioning.
    /// Each `SubSectors`'s geometry is defined by the `Segs` which it contains
    Segs,
    /// Set of segments of a `LineDef` representing a convex subspace
    SSectors,
    /// BSP with segs, nodes and sub-sector leaves
    Nodes,
    /// Area surrounded by lines, with set ceiling and floor textures/heights
    /// with light level
    Sectors,
    /// Sector-to-sector visibility matrix to speed-up line of sight
    /// calculations
    Reject,
    /// 128x128 grid partition of the map LINEDEFS to accelerate collision
    /// detection
    Blockmap,
}

impl MapLump {
    pub const fn name(self) -> &'static str {
        match self {
            MapLump::Things => "THINGS",
            MapLump::LineDefs => "LINEDEFS",
            MapLump::SideDefs => "SIDEDEFS",
            MapLump::Vertexes => "VERTEXES",
            MapLump::Segs => "SEGS",
            MapLump::SSectors => "SSECTORS",
            MapLump::Nodes => "NODES",
            MapLump::Sectors => "SECTORS",
            MapLump::Reject => "REJECT",
            MapLump::Blockmap => "BLOCKMAP",
        }
    }

    /// Position of the lump relative to its map marker
    pub const fn position(self) -> usize {
        self as usize
    }
}

/// A fixed size record stored back to back in a lump
pub trait LumpRecord: Sized {
    /// Size of one record in bytes
    const SIZE: usize;
    /// Which map lump these records live in
    const LUMP: MapLump;

    /// Decode one record starting at the absolute `offset`
    fn decode<R: Read + Seek>(cursor: &mut BinaryCursor<R>, offset: u64) -> Result<Self>;

    /// Append the on-disk bytes of this record
    fn encode(&self, out: &mut Vec<u8>);
}

/// Number of whole records in a lump. A lump that does not divide evenly is
/// corrupt or is not the lump we think it is.
pub fn record_count(info: &LumpInfo, record_size: usize) -> Result<usize> {
    let size = info.size as usize;
    if size % record_size != 0 {
        return Err(WadError::MalformedLump {
            name: info.name.clone(),
            size,
            record_size,
        });
    }
    Ok(size / record_size)
}

/// Write `name` as a NUL padded 8 byte field. Longer names are cut.
pub(crate) fn encode_name(name: &str, out: &mut Vec<u8>) {
    let mut field = [0u8; 8];
    for (slot, b) in field.iter_mut().zip(name.bytes()) {
        *slot = b.to_ascii_uppercase();
    }
    out.extend_from_slice(&field);
}

/// A `Thing` describes only the position, type, and angle + spawn flags
///
/// The data in the WAD lump is structured as follows:
///
/// | Field Size | Data Type | Content            |
/// |------------|-----------|--------------------|
/// |  0x00-0x01 |    i16    | X Position         |
/// |  0x02-0x03 |    i16    | Y Position         |
/// |  0x04-0x05 |    u16    | Angle in degrees   |
/// |  0x06-0x07 |    u16    | Type               |
/// |  0x08-0x09 |    u16    | Flags              |
///
/// Each `Thing` record is 10 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WadThing {
    pub x: i16,
    pub y: i16,
    pub angle: u16,
    pub kind: u16,
    pub flags: u16,
}

impl WadThing {
    /// Thing type of the player one start
    pub const PLAYER_ONE_START: u16 = 1;

    pub const fn new(x: i16, y: i16, angle: u16, kind: u16, flags: u16) -> WadThing {
        WadThing {
            x,
            y,
            angle,
            kind,
            flags,
        }
    }
}

impl LumpRecord for WadThing {
    const SIZE: usize = 10;
    const LUMP: MapLump = MapLump::Things;

    fn decode<R: Read + Seek>(cursor: &mut BinaryCursor<R>, offset: u64) -> Result<Self> {
        Ok(WadThing::new(
            cursor.read_i16(offset)?,
            cursor.read_i16(offset + 2)?,
            cursor.read_u16(offset + 4)?,
            cursor.read_u16(offset + 6)?,
            cursor.read_u16(offset + 8)?,
        ))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.x.to_le_bytes());
        out.extend_from_slice(&self.y.to_le_bytes());
        out.extend_from_slice(&self.angle.to_le_bytes());
        out.extend_from_slice(&self.kind.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
    }
}

/// A `Vertex` is the basic struct used for any type of coordinate
/// in the map
///
/// | Field Size | Data Type | Content      |
/// |------------|-----------|--------------|
/// |  0x00-0x01 |    i16    | X Coordinate |
/// |  0x02-0x03 |    i16    | Y Coordinate |
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WadVertex {
    pub x: i16,
    pub y: i16,
}

impl WadVertex {
    pub const fn new(x: i16, y: i16) -> WadVertex {
        WadVertex { x, y }
    }
}

impl LumpRecord for WadVertex {
    const SIZE: usize = 4;
    const LUMP: MapLump = MapLump::Vertexes;

    fn decode<R: Read + Seek>(cursor: &mut BinaryCursor<R>, offset: u64) -> Result<Self> {
        Ok(WadVertex::new(
            cursor.read_i16(offset)?,
            cursor.read_i16(offset + 2)?,
        ))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.x.to_le_bytes());
        out.extend_from_slice(&self.y.to_le_bytes());
    }
}

/// Each linedef represents a line from one of the VERTEXES to another.
///
///| Field Size | Data Type      | Content                                   |
///|------------|----------------|-------------------------------------------|
///|  0x00-0x01 | Unsigned short | Start vertex                              |
///|  0x02-0x03 | Unsigned short | End vertex                                |
///|  0x04-0x05 | Unsigned short | Flags                                     |
///|  0x06-0x07 | Unsigned short | Line type / Action                        |
///|  0x08-0x09 | Unsigned short | Sector tag                                |
///|  0x0A-0x0B | Unsigned short | Front sidedef ( 0xFFFF side not present ) |
///|  0x0C-0x0D | Unsigned short | Back sidedef  ( 0xFFFF side not present ) |
///
/// Each linedef's record is 14 bytes, and is made up of 7 16-bit
/// fields
///
/// A Linedef will always have at least one side. This first side is referred to
/// as either front or right. If you imagine a linedef starting from the bottom
/// of the screen travelling upwards then the right side of this line is the first
/// valid side (and is the front).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WadLineDef {
    /// The line starts from this point
    pub start_vertex: u16,
    /// The line ends at this point
    pub end_vertex: u16,
    pub flags: u16,
    pub line_type: u16,
    /// This is a number which ties this line's effect type
    /// to all SECTORS that have the same tag number (in their last
    /// field)
    pub sector_tag: u16,
    /// Raw front (right) `SideDef` index, `NO_SIDEDEF` if absent
    pub front_sidedef: u16,
    /// Raw back (left) `SideDef` index, `NO_SIDEDEF` if absent
    pub back_sidedef: u16,
}

impl WadLineDef {
    pub const fn new(
        start_vertex: u16,
        end_vertex: u16,
        flags: u16,
        line_type: u16,
        sector_tag: u16,
        front_sidedef: u16,
        back_sidedef: u16,
    ) -> WadLineDef {
        WadLineDef {
            start_vertex,
            end_vertex,
            flags,
            line_type,
            sector_tag,
            front_sidedef,
            back_sidedef,
        }
    }

    pub const fn front_side(&self) -> Option<u16> {
        side_index(self.front_sidedef)
    }

    pub const fn back_side(&self) -> Option<u16> {
        side_index(self.back_sidedef)
    }

    /// A wall with nothing behind it
    pub const fn is_one_sided(&self) -> bool {
        self.back_sidedef == NO_SIDEDEF
    }
}

const fn side_index(raw: u16) -> Option<u16> {
    if raw == NO_SIDEDEF { None } else { Some(raw) }
}

impl LumpRecord for WadLineDef {
    const SIZE: usize = 14;
    const LUMP: MapLump = MapLump::LineDefs;

    fn decode<R: Read + Seek>(cursor: &mut BinaryCursor<R>, offset: u64) -> Result<Self> {
        Ok(WadLineDef::new(
            cursor.read_u16(offset)?,
            cursor.read_u16(offset + 2)?,
            cursor.read_u16(offset + 4)?,
            cursor.read_u16(offset + 6)?,
            cursor.read_u16(offset + 8)?,
            cursor.read_u16(offset + 10)?,
            cursor.read_u16(offset + 12)?,
        ))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        for field in [
            self.start_vertex,
            self.end_vertex,
            self.flags,
            self.line_type,
            self.sector_tag,
            self.front_sidedef,
            self.back_sidedef,
        ] {
            out.extend_from_slice(&field.to_le_bytes());
        }
    }
}

/// A sidedef is a definition of what wall texture(s) to draw along a
/// `LineDef`, and a group of sidedefs outline the space of a `Sector`
///
/// Each `SideDef` record is 30 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadSideDef {
    pub x_offset: i16,
    pub y_offset: i16,
    /// Name of upper texture used for example in the upper of a window
    pub upper_tex: String,
    /// Name of lower texture used for example in the front of a step
    pub lower_tex: String,
    /// The regular part of a wall
    pub middle_tex: String,
    /// Sector that this sidedef faces or helps to surround
    pub sector: u16,
}

impl WadSideDef {
    pub fn new(
        x_offset: i16,
        y_offset: i16,
        upper_tex: String,
        lower_tex: String,
        middle_tex: String,
        sector: u16,
    ) -> WadSideDef {
        WadSideDef {
            x_offset,
            y_offset,
            upper_tex,
            lower_tex,
            middle_tex,
            sector,
        }
    }
}

impl LumpRecord for WadSideDef {
    const SIZE: usize = 30;
    const LUMP: MapLump = MapLump::SideDefs;

    fn decode<R: Read + Seek>(cursor: &mut BinaryCursor<R>, offset: u64) -> Result<Self> {
        Ok(WadSideDef::new(
            cursor.read_i16(offset)?,
            cursor.read_i16(offset + 2)?,
            cursor.read_string(offset + 4, 8)?,
            cursor.read_string(offset + 12, 8)?,
            cursor.read_string(offset + 20, 8)?,
            cursor.read_u16(offset + 28)?,
        ))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.x_offset.to_le_bytes());
        out.extend_from_slice(&self.y_offset.to_le_bytes());
        encode_name(&self.upper_tex, out);
        encode_name(&self.lower_tex, out);
        encode_name(&self.middle_tex, out);
        out.extend_from_slice(&self.sector.to_le_bytes());
    }
}

/// The Segments (SEGS) are in a sequential order determined by the `SubSector`
/// (SSECTOR), which are part of the NODES recursive tree
///
/// | Field Size | Data Type | Content                              |
/// |------------|-----------|--------------------------------------|
/// |  0x00-0x01 |    i16    | Index to vertex the line starts from |
/// |  0x02-0x03 |    i16    | Index to vertex the line ends with   |
/// |  0x04-0x05 |    i16    | Angle in Binary Angle Measurement (BAMS) |
/// |  0x06-0x07 |    i16    | Index to the linedef this seg travels along|
/// |  0x08-0x09 |    i16    | Direction along line. 0 == SEG is on the right and follows the line, 1 == SEG travels in opposite direction |
/// |  0x0A-0x0B |    i16    | Offset: this is the distance along the linedef this seg starts at |
///
/// Each `Segment` record is 12 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WadSegment {
    pub start_vertex: i16,
    pub end_vertex: i16,
    /// Binary Angle Measurement
    ///
    /// Degrees(0-360) = angle * 0.005493164
    pub angle: i16,
    /// The Linedef this segment travels along
    pub linedef: i16,
    /// 0 = same direction as the linedef, 1 = opposite
    pub direction: i16,
    /// Offset distance along the linedef (from `start_vertex`) to the start
    /// of this `Segment`
    pub offset: i16,
}

impl WadSegment {
    pub const fn new(
        start_vertex: i16,
        end_vertex: i16,
        angle: i16,
        linedef: i16,
        direction: i16,
        offset: i16,
    ) -> WadSegment {
        WadSegment {
            start_vertex,
            end_vertex,
            angle,
            linedef,
            direction,
            offset,
        }
    }
}

impl LumpRecord for WadSegment {
    const SIZE: usize = 12;
    const LUMP: MapLump = MapLump::Segs;

    fn decode<R: Read + Seek>(cursor: &mut BinaryCursor<R>, offset: u64) -> Result<Self> {
        Ok(WadSegment::new(
            cursor.read_i16(offset)?,
            cursor.read_i16(offset + 2)?,
            cursor.read_i16(offset + 4)?,
            cursor.read_i16(offset + 6)?,
            cursor.read_i16(offset + 8)?,
            cursor.read_i16(offset + 10)?,
        ))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        for field in [
            self.start_vertex,
            self.end_vertex,
            self.angle,
            self.linedef,
            self.direction,
            self.offset,
        ] {
            out.extend_from_slice(&field.to_le_bytes());
        }
    }
}

/// A `SubSector` divides up all the SECTORS into convex polygons. They are then
/// referenced through the NODES resources. There will be (number of nodes) + 1.
///
/// | Field Size | Data Type | Content                            |
/// |------------|-----------|------------------------------------|
/// |  0x00-0x01 |    i16    | How many segments line this sector |
/// |  0x02-0x03 |    i16    | Index to the starting segment      |
///
/// Each `SubSector` record is 4 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WadSubSector {
    pub seg_count: i16,
    pub first_seg: i16,
}

impl WadSubSector {
    pub const fn new(seg_count: i16, first_seg: i16) -> WadSubSector {
        WadSubSector {
            seg_count,
            first_seg,
        }
    }
}

impl LumpRecord for WadSubSector {
    const SIZE: usize = 4;
    const LUMP: MapLump = MapLump::SSectors;

    fn decode<R: Read + Seek>(cursor: &mut BinaryCursor<R>, offset: u64) -> Result<Self> {
        Ok(WadSubSector::new(
            cursor.read_i16(offset)?,
            cursor.read_i16(offset + 2)?,
        ))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.seg_count.to_le_bytes());
        out.extend_from_slice(&self.first_seg.to_le_bytes());
    }
}

/// A `Sector` is a horizontal (east-west and north-south) area of the map
/// where a floor height and ceiling height is defined.
///
/// Each `Sector` record is 26 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadSector {
    pub floor_height: i16,
    pub ceil_height: i16,
    /// Floor texture name
    pub floor_tex: String,
    /// Ceiling texture name
    pub ceil_tex: String,
    /// Light level from 0-255
    pub light_level: u16,
    /// This determines some area-effects called special sectors
    pub kind: u16,
    /// a "tag" number corresponding to LINEDEF(s) with the same tag
    /// number
    pub tag: u16,
}

impl WadSector {
    pub fn new(
        floor_height: i16,
        ceil_height: i16,
        floor_tex: String,
        ceil_tex: String,
        light_level: u16,
        kind: u16,
        tag: u16,
    ) -> WadSector {
        WadSector {
            floor_height,
            ceil_height,
            floor_tex,
            ceil_tex,
            light_level,
            kind,
            tag,
        }
    }
}

impl LumpRecord for WadSector {
    const SIZE: usize = 26;
    const LUMP: MapLump = MapLump::Sectors;

    fn decode<R: Read + Seek>(cursor: &mut BinaryCursor<R>, offset: u64) -> Result<Self> {
        Ok(WadSector::new(
            cursor.read_i16(offset)?,
            cursor.read_i16(offset + 2)?,
            cursor.read_string(offset + 4, 8)?,
            cursor.read_string(offset + 12, 8)?,
            cursor.read_u16(offset + 20)?,
            cursor.read_u16(offset + 22)?,
            cursor.read_u16(offset + 24)?,
        ))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.floor_height.to_le_bytes());
        out.extend_from_slice(&self.ceil_height.to_le_bytes());
        encode_name(&self.floor_tex, out);
        encode_name(&self.ceil_tex, out);
        out.extend_from_slice(&self.light_level.to_le_bytes());
        out.extend_from_slice(&self.kind.to_le_bytes());
        out.extend_from_slice(&self.tag.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode_one<T: LumpRecord>(bytes: Vec<u8>) -> T {
        let mut cursor = BinaryCursor::new(Cursor::new(bytes)).unwrap();
        T::decode(&mut cursor, 0).unwrap()
    }

    fn info(name: &str, size: u32) -> LumpInfo {
        LumpInfo::new(name.to_owned(), 0, size)
    }

    #[test]
    fn record_sizes_match_encoding() {
        let mut out = Vec::new();
        WadThing::new(1, 2, 90, 1, 7).encode(&mut out);
        assert_eq!(out.len(), WadThing::SIZE);

        out.clear();
        WadLineDef::new(0, 1, 1, 0, 0, 0, NO_SIDEDEF).encode(&mut out);
        assert_eq!(out.len(), WadLineDef::SIZE);

        out.clear();
        WadSideDef::new(0, 0, "-".into(), "-".into(), "STARTAN3".into(), 0).encode(&mut out);
        assert_eq!(out.len(), WadSideDef::SIZE);

        out.clear();
        WadSegment::new(0, 1, 16384, 0, 0, 0).encode(&mut out);
        assert_eq!(out.len(), WadSegment::SIZE);

        out.clear();
        WadSubSector::new(4, 0).encode(&mut out);
        assert_eq!(out.len(), WadSubSector::SIZE);

        out.clear();
        WadSector::new(0, 72, "FLOOR4_8".into(), "CEIL3_5".into(), 160, 0, 0).encode(&mut out);
        assert_eq!(out.len(), WadSector::SIZE);
    }

    #[test]
    fn thing_fields_by_offset() {
        let bytes = vec![0x20, 0x04, 0xe0, 0xf1, 90, 0, 1, 0, 7, 0];
        let thing: WadThing = decode_one(bytes);
        assert_eq!(thing, WadThing::new(1056, -3616, 90, 1, 7));
    }

    #[test]
    fn one_sided_linedef_keeps_sentinel() {
        let mut bytes = Vec::new();
        WadLineDef::new(3, 0, 1, 0, 0, 2, NO_SIDEDEF).encode(&mut bytes);
        let line: WadLineDef = decode_one(bytes);
        assert_eq!(line.back_sidedef, 0xFFFF);
        assert!(line.is_one_sided());
        assert_eq!(line.back_side(), None);
        assert_eq!(line.front_side(), Some(2));
    }

    #[test]
    fn sidedef_names_are_normalised() {
        let mut bytes = Vec::new();
        WadSideDef::new(-8, 16, "bigdoor2".into(), "-".into(), "".into(), 3).encode(&mut bytes);
        let side: WadSideDef = decode_one(bytes);
        assert_eq!(side.x_offset, -8);
        assert_eq!(side.upper_tex, "BIGDOOR2");
        assert_eq!(side.lower_tex, "-");
        assert_eq!(side.middle_tex, "");
        assert_eq!(side.sector, 3);
    }

    #[test]
    fn segment_signed_fields() {
        let mut bytes = Vec::new();
        WadSegment::new(7, 8, -16384, 12, 1, -4).encode(&mut bytes);
        let seg: WadSegment = decode_one(bytes);
        assert_eq!(seg.angle, -16384);
        assert_eq!(seg.direction, 1);
        assert_eq!(seg.offset, -4);
    }

    #[test]
    fn record_count_rejects_partial_records() {
        assert_eq!(record_count(&info("VERTEXES", 12), WadVertex::SIZE).unwrap(), 3);
        assert_eq!(record_count(&info("VERTEXES", 0), WadVertex::SIZE).unwrap(), 0);
        assert!(matches!(
            record_count(&info("VERTEXES", 10), WadVertex::SIZE),
            Err(WadError::MalformedLump {
                size: 10,
                record_size: 4,
                ..
            })
        ));
    }

    #[test]
    fn map_lump_positions() {
        assert_eq!(MapLump::Things.position(), 1);
        assert_eq!(MapLump::Vertexes.position(), 4);
        assert_eq!(MapLump::Nodes.position(), 7);
        assert_eq!(MapLump::Blockmap.position(), 10);
        assert_eq!(MapLump::SSectors.name(), "SSECTORS");
    }
}
