use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// There are no vertexes to size the projection from
    EmptyMap,
    /// A record refers past the end of one of the map tables
    IndexOutOfRange {
        table: &'static str,
        index: usize,
        len: usize,
    },
    /// Walking down from the root went deeper than there are nodes, so the
    /// children must loop
    MalformedTree { node: u16 },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::EmptyMap => write!(f, "map has no vertexes"),
            RenderError::IndexOutOfRange { table, index, len } => {
                write!(f, "{table} index {index} out of range, table has {len} entries")
            }
            RenderError::MalformedTree { node } => {
                write!(f, "node {node} is part of a cycle in the BSP tree")
            }
        }
    }
}

impl Error for RenderError {}
