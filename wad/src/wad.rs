use crate::cursor::BinaryCursor;
use crate::error::{Result, WadError};
use crate::iterators::LumpIter;
use crate::lumps::{LumpRecord, MapLump, record_count};
use log::{debug, warn};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

pub const HEADER_SIZE: u64 = 12;
pub const DIRECTORY_ENTRY_SIZE: u64 = 16;

/// Will be either `IWAD` for game, or `PWAD` for patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WadKind {
    Iwad,
    Pwad,
}

impl WadKind {
    pub fn from_magic(magic: &[u8; 4]) -> Option<WadKind> {
        match magic {
            b"IWAD" => Some(WadKind::Iwad),
            b"PWAD" => Some(WadKind::Pwad),
            _ => None,
        }
    }

    pub const fn magic(self) -> &'static [u8; 4] {
        match self {
            WadKind::Iwad => b"IWAD",
            WadKind::Pwad => b"PWAD",
        }
    }
}

/// Header which tells us the WAD type and where the data is
///
/// The header structure in the WAD is as follows:
///
/// | Field Size | Data Type    | Content                                              |
/// |------------|--------------|------------------------------------------------------|
/// | 0x00-0x03  | 4 ASCII char | *Must* be an ASCII string (either "IWAD" or "PWAD")  |
/// | 0x04-0x07  | unsigned int | The number entries in the directory                  |
/// | 0x08-0x0b  | unsigned int | Offset in bytes to the directory in the WAD file     |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WadHeader {
    pub kind: WadKind,
    /// The count of "lumps" of data
    pub lump_count: u32,
    /// Offset in bytes that the directory starts at
    pub dir_offset: u32,
}

/// Contains the details for a lump of data: where it starts, the size of it, and the name
///
/// The directory structure in the WAD is as follows:
///
/// | Field Size | Data Type    | Content                                                    |
/// |------------|--------------|------------------------------------------------------------|
/// | 0x00-0x03  | unsigned int | Offset value to the start of the lump data in the WAD file |
/// | 0x04-0x07  | unsigned int | The size of the lump in bytes                              |
/// | 0x08-0x0f  | 8 ASCII char | ASCII holding the name of the lump                         |
#[derive(Clone, PartialEq, Eq)]
pub struct LumpInfo {
    /// Upper-case, NUL padding removed
    pub name: String,
    /// The offset in bytes where the lump data starts
    pub offset: u32,
    /// The size in bytes of the lump referenced
    pub size: u32,
}

impl LumpInfo {
    pub fn new(name: String, offset: u32, size: u32) -> LumpInfo {
        LumpInfo { name, offset, size }
    }

    /// One past the last byte of the lump
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }
}

impl fmt::Debug for LumpInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LumpInfo {{ name: {}, size: {}, offset: {} }}",
            &self.name, self.size, self.offset
        )
    }
}

/// True for map marker lumps: `ExMy` (Doom) and `MAPxx` (Doom II)
pub fn is_map_marker(name: &str) -> bool {
    let b = name.as_bytes();
    match b.len() {
        4 => b[0] == b'E' && b[1].is_ascii_digit() && b[2] == b'M' && b[3].is_ascii_digit(),
        5 => b.starts_with(b"MAP") && b[3].is_ascii_digit() && b[4].is_ascii_digit(),
        _ => false,
    }
}

/// Decode only the header and directory of the archive at `path`. The file is
/// closed before returning.
pub fn load<P: AsRef<Path>>(path: P) -> Result<(WadHeader, Vec<LumpInfo>)> {
    let wad = WadArchive::open(path)?;
    Ok((wad.header, wad.lumps))
}

/// "Where's All (the) Data": an open archive plus the directory telling us
/// where each data lump starts.
///
/// The archive owns its handle for as long as it lives; dropping it closes the
/// file.
pub struct WadArchive<R = BufReader<File>> {
    cursor: BinaryCursor<R>,
    header: WadHeader,
    lumps: Vec<LumpInfo>,
}

impl<R> fmt::Debug for WadArchive<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WadArchive")
            .field("header", &self.header)
            .field("lumps", &self.lumps.len())
            .finish()
    }
}

impl WadArchive<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening WAD {path:?}");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> WadArchive<R> {
    /// Decode the header and directory from any random access source
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut cursor = BinaryCursor::new(reader)?;
        let header = read_header(&mut cursor)?;
        debug!("{header:?}");
        let lumps = read_directory(&mut cursor, &header)?;
        debug!("Read {} directory entries", lumps.len());
        Ok(WadArchive {
            cursor,
            header,
            lumps,
        })
    }

    pub fn header(&self) -> &WadHeader {
        &self.header
    }

    /// The directory, in file order
    pub fn lumps(&self) -> &[LumpInfo] {
        &self.lumps
    }

    /// Length of the underlying file in bytes
    pub fn file_len(&self) -> u64 {
        self.cursor.len()
    }

    pub fn find_lump_index(&self, name: &str) -> Option<usize> {
        self.lumps
            .iter()
            .position(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn find_lump(&self, name: &str) -> Option<&LumpInfo> {
        self.find_lump_index(name).map(|i| &self.lumps[i])
    }

    pub fn lump_exists(&self, name: &str) -> bool {
        self.find_lump_index(name).is_some()
    }

    /// Every map marker in the directory, in file order
    pub fn map_names(&self) -> Vec<&str> {
        self.lumps
            .iter()
            .filter(|l| is_map_marker(&l.name))
            .map(|l| l.name.as_str())
            .collect()
    }

    /// Find the index of `lump` belonging to `map_name`. Map lumps normally sit
    /// at a fixed position after the marker; if that slot holds something else
    /// the lumps up to the next marker are searched.
    pub fn find_map_lump_index(&self, map_name: &str, lump: MapLump) -> Result<usize> {
        let missing = || WadError::MissingLump {
            map: map_name.to_ascii_uppercase(),
            lump: lump.name().to_owned(),
        };
        let marker = self.find_lump_index(map_name).ok_or_else(missing)?;

        let expected = marker + lump.position();
        if self
            .lumps
            .get(expected)
            .is_some_and(|l| l.name == lump.name())
        {
            return Ok(expected);
        }

        warn!(
            "{} not at its usual position for {map_name}, scanning",
            lump.name()
        );
        self.lumps[marker + 1..]
            .iter()
            .take_while(|l| !is_map_marker(&l.name))
            .position(|l| l.name == lump.name())
            .map(|i| marker + 1 + i)
            .ok_or_else(missing)
    }

    pub fn find_map_lump(&self, map_name: &str, lump: MapLump) -> Result<&LumpInfo> {
        let index = self.find_map_lump_index(map_name, lump)?;
        Ok(&self.lumps[index])
    }

    /// Iterate the records of the lump at directory `index`. Fails up front if
    /// the lump is not a whole number of records.
    pub fn lump_iter<T: LumpRecord>(&mut self, index: usize) -> Result<LumpIter<'_, T, R>> {
        let info = self.lumps.get(index).ok_or_else(|| WadError::MissingLump {
            map: String::new(),
            lump: format!("#{index}"),
        })?;
        let count = record_count(info, T::SIZE)?;
        let offset = info.offset as u64;
        Ok(LumpIter::new(&mut self.cursor, offset, count))
    }

    /// Decode every record of the lump at directory `index`
    pub fn read_lump<T: LumpRecord>(&mut self, index: usize) -> Result<Vec<T>> {
        self.lump_iter::<T>(index)?.collect()
    }

    /// Decode the first lump called `name`
    pub fn read_lump_by_name<T: LumpRecord>(&mut self, name: &str) -> Result<Vec<T>> {
        let index = self
            .find_lump_index(name)
            .ok_or_else(|| WadError::MissingLump {
                map: String::new(),
                lump: name.to_ascii_uppercase(),
            })?;
        self.read_lump(index)
    }

    /// Decode the `T` records of `map_name`
    pub fn read_map_lump<T: LumpRecord>(&mut self, map_name: &str) -> Result<Vec<T>> {
        let index = self.find_map_lump_index(map_name, T::LUMP)?;
        self.read_lump(index)
    }

    /// The raw bytes of the lump at directory `index`
    pub fn lump_bytes(&mut self, index: usize) -> Result<Vec<u8>> {
        let info = self.lumps.get(index).ok_or_else(|| WadError::MissingLump {
            map: String::new(),
            lump: format!("#{index}"),
        })?;
        let (offset, size) = (info.offset as u64, info.size as usize);
        self.cursor.read_raw(offset, size)
    }

}

fn read_header<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<WadHeader> {
    let raw = cursor.read_raw(0, 4)?;
    let magic = [raw[0], raw[1], raw[2], raw[3]];
    let kind = WadKind::from_magic(&magic).ok_or(WadError::InvalidArchive { magic })?;

    Ok(WadHeader {
        kind,
        lump_count: cursor.read_u32(4)?,
        dir_offset: cursor.read_u32(8)?,
    })
}

fn read_directory<R: Read + Seek>(
    cursor: &mut BinaryCursor<R>,
    header: &WadHeader,
) -> Result<Vec<LumpInfo>> {
    let start = header.dir_offset as u64;
    let dir_len = header.lump_count as u64 * DIRECTORY_ENTRY_SIZE;
    if start + dir_len > cursor.len() {
        return Err(WadError::TruncatedRead {
            offset: start,
            wanted: dir_len as usize,
            available: cursor.len().saturating_sub(start) as usize,
        });
    }

    let mut lumps = Vec::with_capacity(header.lump_count as usize);
    for i in 0..header.lump_count as u64 {
        let offset = start + i * DIRECTORY_ENTRY_SIZE;
        let info = LumpInfo::new(
            cursor.read_string(offset + 8, 8)?,
            cursor.read_u32(offset)?,
            cursor.read_u32(offset + 4)?,
        );
        if info.end() > cursor.len() {
            return Err(WadError::LumpOutOfBounds {
                name: info.name,
                offset: info.offset,
                size: info.size,
                file_len: cursor.len(),
            });
        }
        lumps.push(info);
    }
    Ok(lumps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WadBuilder;
    use crate::lumps::{WadLineDef, WadVertex};
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_UNIQUIFIER: AtomicU64 = AtomicU64::new(0);

    fn temp_wad(name: &str, bytes: &[u8]) -> PathBuf {
        let serial = TEST_UNIQUIFIER.fetch_add(1, Ordering::Relaxed);
        let mut path = std::env::temp_dir();
        path.push(format!("wad-{name}-{}-{serial}.wad", std::process::id()));
        fs::write(&path, bytes).unwrap();
        path
    }

    fn archive(bytes: Vec<u8>) -> Result<WadArchive<Cursor<Vec<u8>>>> {
        WadArchive::from_reader(Cursor::new(bytes))
    }

    /// The smallest useful archive, written out by hand: header, one
    /// directory entry, then the lump.
    fn single_vertex_wad() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"IWAD");
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&12u32.to_le_bytes());
        bytes.extend_from_slice(&28u32.to_le_bytes());
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(b"VERTEXES");
        bytes.extend_from_slice(&10i16.to_le_bytes());
        bytes.extend_from_slice(&20i16.to_le_bytes());
        bytes
    }

    #[test]
    fn single_vertex_archive() {
        let mut wad = archive(single_vertex_wad()).unwrap();
        assert_eq!(
            *wad.header(),
            WadHeader {
                kind: WadKind::Iwad,
                lump_count: 1,
                dir_offset: 12,
            }
        );
        assert_eq!(wad.lumps().len(), 1);
        assert_eq!(wad.lumps()[0], LumpInfo::new("VERTEXES".into(), 28, 4));

        let vertexes: Vec<WadVertex> = wad.read_lump_by_name("VERTEXES").unwrap();
        assert_eq!(vertexes, vec![WadVertex::new(10, 20)]);
    }

    #[test]
    fn load_from_file() {
        let path = temp_wad("single-vertex", &single_vertex_wad());
        let (header, lumps) = load(&path).unwrap();
        assert_eq!(
            header,
            WadHeader {
                kind: WadKind::Iwad,
                lump_count: 1,
                dir_offset: 12,
            }
        );
        assert_eq!(lumps, vec![LumpInfo::new("VERTEXES".into(), 28, 4)]);

        let mut wad = WadArchive::open(&path).unwrap();
        let vertexes: Vec<WadVertex> = wad.read_lump(0).unwrap();
        assert_eq!(vertexes, vec![WadVertex::new(10, 20)]);
        drop(wad);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn failed_load_releases_the_file() {
        let mut bytes = single_vertex_wad();
        bytes[..4].copy_from_slice(b"XWAD");
        let path = temp_wad("bad-magic", &bytes);
        assert!(matches!(
            load(&path),
            Err(WadError::InvalidArchive { magic }) if &magic == b"XWAD"
        ));

        // Nothing holds the file now, so it can be replaced and removed
        fs::write(&path, single_vertex_wad()).unwrap();
        assert_eq!(load(&path).unwrap().1.len(), 1);
        fs::remove_file(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut path = std::env::temp_dir();
        path.push(format!("wad-missing-{}.wad", std::process::id()));
        assert!(matches!(load(&path), Err(WadError::Io(_))));
    }

    #[test]
    fn builder_matches_hand_written_layout() {
        let built = WadBuilder::new(WadKind::Iwad)
            .records(&[WadVertex::new(10, 20)])
            .build();
        assert_eq!(built, single_vertex_wad());
    }

    #[test]
    fn lookups_ignore_case() {
        let wad = archive(single_vertex_wad()).unwrap();
        assert_eq!(wad.find_lump_index("vertexes"), Some(0));
        assert!(wad.lump_exists("Vertexes"));
        assert!(wad.find_lump("LINEDEFS").is_none());
    }

    #[test]
    fn bad_magic_is_invalid_archive() {
        let mut bytes = single_vertex_wad();
        bytes[..4].copy_from_slice(b"ZWAD");
        match archive(bytes) {
            Err(WadError::InvalidArchive { magic }) => assert_eq!(&magic, b"ZWAD"),
            other => panic!("expected invalid archive, got {other:?}"),
        }
    }

    #[test]
    fn pwad_is_accepted() {
        let mut bytes = single_vertex_wad();
        bytes[..4].copy_from_slice(b"PWAD");
        assert_eq!(archive(bytes).unwrap().header().kind, WadKind::Pwad);
    }

    #[test]
    fn short_header_is_truncated() {
        assert!(matches!(
            archive(b"IWAD\x01\x00".to_vec()),
            Err(WadError::TruncatedRead { .. })
        ));
    }

    #[test]
    fn directory_past_eof_is_truncated() {
        let mut bytes = single_vertex_wad();
        // Claim two entries, only one is there
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        match archive(bytes) {
            Err(WadError::TruncatedRead {
                offset,
                wanted,
                available,
            }) => {
                assert_eq!(offset, 12);
                assert_eq!(wanted, 32);
                assert_eq!(available, 20);
            }
            other => panic!("expected truncated read, got {other:?}"),
        }
    }

    #[test]
    fn lump_past_eof_is_rejected() {
        let mut bytes = single_vertex_wad();
        // Size 8 at offset 28 in a 32 byte file
        bytes[16..20].copy_from_slice(&8u32.to_le_bytes());
        assert!(matches!(
            archive(bytes),
            Err(WadError::LumpOutOfBounds { size: 8, file_len: 32, .. })
        ));
    }

    #[test]
    fn every_lump_stays_inside_the_file() {
        let wad = archive(
            WadBuilder::new(WadKind::Pwad)
                .marker("MAP01")
                .records(&[WadVertex::new(1, 2), WadVertex::new(3, 4)])
                .records(&[WadLineDef::new(0, 1, 0, 0, 0, 0, 0xFFFF)])
                .build(),
        )
        .unwrap();
        assert_eq!(wad.lumps().len(), wad.header().lump_count as usize);
        for lump in wad.lumps() {
            assert!(lump.end() <= wad.file_len());
        }
    }

    #[test]
    fn ten_byte_vertex_lump_is_malformed() {
        let bytes = WadBuilder::new(WadKind::Iwad)
            .lump("VERTEXES", vec![0; 10])
            .build();
        let mut wad = archive(bytes).unwrap();
        match wad.read_lump_by_name::<WadVertex>("VERTEXES") {
            Err(WadError::MalformedLump {
                name,
                size,
                record_size,
            }) => {
                assert_eq!(name, "VERTEXES");
                assert_eq!(size, 10);
                assert_eq!(record_size, 4);
            }
            other => panic!("expected malformed lump, got {other:?}"),
        }
    }

    #[test]
    fn map_markers() {
        assert!(is_map_marker("E1M1"));
        assert!(is_map_marker("E4M9"));
        assert!(is_map_marker("MAP01"));
        assert!(is_map_marker("MAP32"));
        assert!(!is_map_marker("MAP1"));
        assert!(!is_map_marker("EXMY"));
        assert!(!is_map_marker("VERTEXES"));
    }

    #[test]
    fn map_lumps_resolve_per_map() {
        let bytes = WadBuilder::new(WadKind::Pwad)
            .marker("MAP01")
            .lump("THINGS", Vec::new())
            .lump("LINEDEFS", Vec::new())
            .lump("SIDEDEFS", Vec::new())
            .records(&[WadVertex::new(1, 1)])
            .marker("MAP02")
            .lump("THINGS", Vec::new())
            .lump("LINEDEFS", Vec::new())
            .lump("SIDEDEFS", Vec::new())
            .records(&[WadVertex::new(2, 2), WadVertex::new(3, 3)])
            .build();
        let mut wad = archive(bytes).unwrap();
        assert_eq!(wad.map_names(), vec!["MAP01", "MAP02"]);

        assert_eq!(wad.find_map_lump_index("MAP02", MapLump::Vertexes).unwrap(), 9);
        let second: Vec<WadVertex> = wad.read_map_lump("map02").unwrap();
        assert_eq!(second, vec![WadVertex::new(2, 2), WadVertex::new(3, 3)]);
        let first: Vec<WadVertex> = wad.read_map_lump("MAP01").unwrap();
        assert_eq!(first, vec![WadVertex::new(1, 1)]);

        // Does not bleed in to the next map
        assert!(matches!(
            wad.find_map_lump("MAP01", MapLump::Nodes),
            Err(WadError::MissingLump { .. })
        ));
        assert!(matches!(
            wad.find_map_lump("MAP03", MapLump::Things),
            Err(WadError::MissingLump { .. })
        ));
    }

    #[test]
    fn out_of_order_map_lumps_are_found_by_scan() {
        let bytes = WadBuilder::new(WadKind::Pwad)
            .marker("E1M1")
            .records(&[WadVertex::new(5, 6)])
            .lump("THINGS", Vec::new())
            .build();
        let wad = archive(bytes).unwrap();
        assert_eq!(wad.find_map_lump_index("E1M1", MapLump::Vertexes).unwrap(), 1);
        assert_eq!(wad.find_map_lump_index("E1M1", MapLump::Things).unwrap(), 2);
    }

    #[test]
    fn raw_lump_bytes() {
        let mut wad = archive(single_vertex_wad()).unwrap();
        assert_eq!(wad.lump_bytes(0).unwrap(), vec![10, 0, 20, 0]);
        assert!(wad.lump_bytes(1).is_err());
    }
}
