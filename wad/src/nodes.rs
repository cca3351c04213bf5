use crate::cursor::BinaryCursor;
use crate::error::Result;
use crate::lumps::{LumpRecord, MapLump};
use std::io::{Read, Seek};

/// Set on a node child index when the child is a `SubSector` rather than
/// another node
pub const IS_SSECTOR_MASK: u16 = 0x8000;

/// What a node child index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeChild {
    /// Index in to the node table
    Node(u16),
    /// Index in to the sub-sector table, the leaf bit already removed
    SubSector(u16),
}

impl NodeChild {
    pub const fn from_raw(id: u16) -> NodeChild {
        if id & IS_SSECTOR_MASK != 0 {
            NodeChild::SubSector(id & !IS_SSECTOR_MASK)
        } else {
            NodeChild::Node(id)
        }
    }

    pub const fn to_raw(self) -> u16 {
        match self {
            NodeChild::Node(id) => id,
            NodeChild::SubSector(id) => id | IS_SSECTOR_MASK,
        }
    }

    pub const fn is_leaf(self) -> bool {
        matches!(self, NodeChild::SubSector(_))
    }
}

/// Axis aligned box in map units. `top` is the largest Y
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub top: i16,
    pub bottom: i16,
    pub left: i16,
    pub right: i16,
}

impl BoundingBox {
    pub const fn new(top: i16, bottom: i16, left: i16, right: i16) -> BoundingBox {
        BoundingBox {
            top,
            bottom,
            left,
            right,
        }
    }

    fn decode<R: Read + Seek>(cursor: &mut BinaryCursor<R>, offset: u64) -> Result<Self> {
        Ok(BoundingBox::new(
            cursor.read_i16(offset)?,
            cursor.read_i16(offset + 2)?,
            cursor.read_i16(offset + 4)?,
            cursor.read_i16(offset + 6)?,
        ))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        for field in [self.top, self.bottom, self.left, self.right] {
            out.extend_from_slice(&field.to_le_bytes());
        }
    }
}

/// The base node structure as parsed from the WAD records. What is stored in the WAD
/// is the splitting line used for splitting the map/node (starts with the map then
/// consecutive nodes, aiming for an even split if possible), a box which encapsulates
/// the left and right regions of the split, and the index numbers for left and right
/// children of the node; the index is in to the array built from this lump.
///
/// **The last node is the root node**
///
/// | Field Size | Data Type                            | Content                                          |
/// |------------|--------------------------------------|--------------------------------------------------|
/// | 0x00-0x01  | Partition line x coordinate          | X coordinate of the splitter                     |
/// | 0x02-0x03  | Partition line y coordinate          | Y coordinate of the splitter                     |
/// | 0x04-0x05  | Change in x to end of partition line | The amount to move in X to reach end of splitter |
/// | 0x06-0x07  | Change in y to end of partition line | The amount to move in Y to reach end of splitter |
/// | 0x08-0x09  | Right (Front) box top                | First corner of front box (Y coordinate)         |
/// | 0x0A-0x0B  | Right (Front)  box bottom            | Second corner of front box (Y coordinate)        |
/// | 0x0C-0x0D  | Right (Front)  box left              | First corner of front box (X coordinate)         |
/// | 0x0E-0x0F  | Right (Front)  box right             | Second corner of front box (X coordinate)        |
/// | 0x10-0x11  | Left (Back) box top                  | First corner of back box (Y coordinate)          |
/// | 0x12-0x13  | Left (Back)  box bottom              | Second corner of back box (Y coordinate)         |
/// | 0x14-0x15  | Left (Back)  box left                | First corner of back box (X coordinate)          |
/// | 0x16-0x17  | Left (Back)  box right               | Second corner of back box (X coordinate)         |
/// | 0x18-0x19  | Right (Front) child index            | Index of the front child + sub-sector indicator  |
/// | 0x1A-0x1B  | Left (Back)  child index             | Index of the back child + sub-sector indicator   |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WadNode {
    /// Where the line used for splitting the map starts
    pub x: i16,
    pub y: i16,
    /// Delta from the start to the end of the splitting line
    pub dx: i16,
    pub dy: i16,
    /// Front (right) and back (left) boxes, in that order
    pub bounding_boxes: [BoundingBox; 2],
    /// Raw child indexes, front then back. Test with `IS_SSECTOR_MASK` or use
    /// `front_child()`/`back_child()`
    pub child_index: [u16; 2],
}

impl WadNode {
    pub const fn new(
        x: i16,
        y: i16,
        dx: i16,
        dy: i16,
        front_box: BoundingBox,
        back_box: BoundingBox,
        front_child_id: u16,
        back_child_id: u16,
    ) -> WadNode {
        WadNode {
            x,
            y,
            dx,
            dy,
            bounding_boxes: [front_box, back_box],
            child_index: [front_child_id, back_child_id],
        }
    }

    pub const fn front_box(&self) -> &BoundingBox {
        &self.bounding_boxes[0]
    }

    pub const fn back_box(&self) -> &BoundingBox {
        &self.bounding_boxes[1]
    }

    pub const fn front_child(&self) -> NodeChild {
        NodeChild::from_raw(self.child_index[0])
    }

    pub const fn back_child(&self) -> NodeChild {
        NodeChild::from_raw(self.child_index[1])
    }

    /// End of the partition line, computed wide so it can't wrap
    pub const fn partition_end(&self) -> (i32, i32) {
        (
            self.x as i32 + self.dx as i32,
            self.y as i32 + self.dy as i32,
        )
    }
}

impl LumpRecord for WadNode {
    const SIZE: usize = 28;
    const LUMP: MapLump = MapLump::Nodes;

    fn decode<R: Read + Seek>(cursor: &mut BinaryCursor<R>, offset: u64) -> Result<Self> {
        Ok(WadNode::new(
            cursor.read_i16(offset)?,
            cursor.read_i16(offset + 2)?,
            cursor.read_i16(offset + 4)?,
            cursor.read_i16(offset + 6)?,
            BoundingBox::decode(cursor, offset + 8)?,
            BoundingBox::decode(cursor, offset + 16)?,
            cursor.read_u16(offset + 24)?,
            cursor.read_u16(offset + 26)?,
        ))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        for field in [self.x, self.y, self.dx, self.dy] {
            out.extend_from_slice(&field.to_le_bytes());
        }
        self.bounding_boxes[0].encode(out);
        self.bounding_boxes[1].encode(out);
        out.extend_from_slice(&self.child_index[0].to_le_bytes());
        out.extend_from_slice(&self.child_index[1].to_le_bytes());
    }
}
