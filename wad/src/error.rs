use std::{error::Error, fmt, io};

pub type Result<T> = std::result::Result<T, WadError>;

/// Everything that can go wrong while reading a WAD. None of these are
/// recoverable: the archive is either well formed or it is not.
#[derive(Debug)]
pub enum WadError {
    /// The underlying handle failed for a reason other than running out of
    /// bytes
    Io(io::Error),
    /// The archive ended in the middle of a field
    TruncatedRead {
        offset: u64,
        wanted: usize,
        available: usize,
    },
    /// The bytes were there but could not be turned in to the requested value
    Decode { offset: u64, reason: String },
    /// The header tag is not `IWAD` or `PWAD`
    InvalidArchive { magic: [u8; 4] },
    /// The lump size is not a whole number of records
    MalformedLump {
        name: String,
        size: usize,
        record_size: usize,
    },
    /// A directory entry points outside of the file
    LumpOutOfBounds {
        name: String,
        offset: u32,
        size: u32,
        file_len: u64,
    },
    /// A lump required for a map was not found in the directory
    MissingLump { map: String, lump: String },
}

impl fmt::Display for WadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WadError::Io(err) => write!(f, "WAD I/O failure: {err}"),
            WadError::TruncatedRead {
                offset,
                wanted,
                available,
            } => write!(
                f,
                "truncated read at offset {offset}: wanted {wanted} bytes, {available} available"
            ),
            WadError::Decode { offset, reason } => {
                write!(f, "could not decode value at offset {offset}: {reason}")
            }
            WadError::InvalidArchive { magic } => write!(
                f,
                "invalid archive tag {:?}, expected IWAD or PWAD",
                String::from_utf8_lossy(magic)
            ),
            WadError::MalformedLump {
                name,
                size,
                record_size,
            } => write!(
                f,
                "lump {name} is {size} bytes, which is not a multiple of its {record_size} byte record"
            ),
            WadError::LumpOutOfBounds {
                name,
                offset,
                size,
                file_len,
            } => write!(
                f,
                "lump {name} at offset {offset} with size {size} runs past the end of a {file_len} byte file"
            ),
            WadError::MissingLump { map, lump } => {
                if map.is_empty() {
                    write!(f, "lump {lump} not found")
                } else {
                    write!(f, "lump {lump} not found for map {map}")
                }
            }
        }
    }
}

impl Error for WadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for WadError {
    fn from(err: io::Error) -> Self {
        WadError::Io(err)
    }
}
