//! Assemble an archive in memory. Used to write small test WADs without
//! shipping binary fixtures.

use crate::lumps::{LumpRecord, encode_name};
use crate::wad::{DIRECTORY_ENTRY_SIZE, HEADER_SIZE, WadKind};

/// Lays an archive out as header, directory, then lump data in the order the
/// lumps were added.
#[derive(Debug, Clone)]
pub struct WadBuilder {
    kind: WadKind,
    lumps: Vec<(String, Vec<u8>)>,
}

impl WadBuilder {
    pub fn new(kind: WadKind) -> Self {
        Self {
            kind,
            lumps: Vec::new(),
        }
    }

    /// Add a lump with raw contents. Names longer than 8 bytes are cut.
    pub fn lump(mut self, name: &str, data: Vec<u8>) -> Self {
        self.lumps.push((name.to_owned(), data));
        self
    }

    /// Add a zero length marker lump such as `E1M1`
    pub fn marker(self, name: &str) -> Self {
        self.lump(name, Vec::new())
    }

    /// Add a lump holding `records`, named after the record's map lump
    pub fn records<T: LumpRecord>(self, records: &[T]) -> Self {
        let mut data = Vec::with_capacity(records.len() * T::SIZE);
        for record in records {
            record.encode(&mut data);
        }
        self.lump(T::LUMP.name(), data)
    }

    pub fn build(&self) -> Vec<u8> {
        let dir_len = self.lumps.len() as u64 * DIRECTORY_ENTRY_SIZE;
        let data_len: usize = self.lumps.iter().map(|(_, d)| d.len()).sum();

        let mut out = Vec::with_capacity((HEADER_SIZE + dir_len) as usize + data_len);
        out.extend_from_slice(self.kind.magic());
        out.extend_from_slice(&(self.lumps.len() as u32).to_le_bytes());
        out.extend_from_slice(&(HEADER_SIZE as u32).to_le_bytes());

        let mut offset = (HEADER_SIZE + dir_len) as u32;
        for (name, data) in &self.lumps {
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            encode_name(name, &mut out);
            offset += data.len() as u32;
        }
        for (_, data) in &self.lumps {
            out.extend_from_slice(data);
        }
        out
    }
}
