//! Absolute-offset reads from a random access handle. Every read seeks first,
//! so the handle position carries no meaning between calls.

use crate::error::{Result, WadError};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// The fixed-width integer layouts a WAD is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntFormat {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
}

impl IntFormat {
    /// Width in bytes
    pub const fn width(self) -> usize {
        match self {
            IntFormat::I8 | IntFormat::U8 => 1,
            IntFormat::I16 | IntFormat::U16 => 2,
            IntFormat::I32 | IntFormat::U32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntValue {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
}

impl IntValue {
    pub const fn as_i64(self) -> i64 {
        match self {
            IntValue::I8(v) => v as i64,
            IntValue::U8(v) => v as i64,
            IntValue::I16(v) => v as i64,
            IntValue::U16(v) => v as i64,
            IntValue::I32(v) => v as i64,
            IntValue::U32(v) => v as i64,
        }
    }
}

/// Turn a fixed length, NUL padded name in to an upper-case `String`.
///
/// Anything after the first NUL is padding (and in some WADs, garbage).
pub fn ascii_name(bytes: &[u8]) -> Option<String> {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    let name = &bytes[..end];
    if !name.is_ascii() {
        return None;
    }
    Some(name.iter().map(|b| b.to_ascii_uppercase() as char).collect())
}

pub struct BinaryCursor<R> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> BinaryCursor<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        Ok(Self { inner, len })
    }

    /// Total length of the handle in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fill `buf` from `offset`, failing if the handle ends first
    fn fill(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        let mut got = 0;
        while got < buf.len() {
            match self.inner.read(&mut buf[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        if got < buf.len() {
            return Err(WadError::TruncatedRead {
                offset,
                wanted: buf.len(),
                available: got,
            });
        }
        Ok(())
    }

    /// Read `count` bytes at `offset` and decode them as `format`.
    ///
    /// `count` must equal the width of `format`.
    pub fn read_bytes(&mut self, offset: u64, count: usize, format: IntFormat) -> Result<IntValue> {
        if count != format.width() {
            return Err(WadError::Decode {
                offset,
                reason: format!(
                    "{count} bytes requested for a {} byte {format:?}",
                    format.width()
                ),
            });
        }
        Ok(match format {
            IntFormat::I8 => IntValue::I8(self.read_i8(offset)?),
            IntFormat::U8 => IntValue::U8(self.read_u8(offset)?),
            IntFormat::I16 => IntValue::I16(self.read_i16(offset)?),
            IntFormat::U16 => IntValue::U16(self.read_u16(offset)?),
            IntFormat::I32 => IntValue::I32(self.read_i32(offset)?),
            IntFormat::U32 => IntValue::U32(self.read_u32(offset)?),
        })
    }

    pub fn read_i8(&mut self, offset: u64) -> Result<i8> {
        let mut buf = [0u8; 1];
        self.fill(offset, &mut buf)?;
        Ok(buf.as_slice().read_i8()?)
    }

    pub fn read_u8(&mut self, offset: u64) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(offset, &mut buf)?;
        Ok(buf.as_slice().read_u8()?)
    }

    pub fn read_i16(&mut self, offset: u64) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.fill(offset, &mut buf)?;
        Ok(buf.as_slice().read_i16::<LittleEndian>()?)
    }

    pub fn read_u16(&mut self, offset: u64) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.fill(offset, &mut buf)?;
        Ok(buf.as_slice().read_u16::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self, offset: u64) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.fill(offset, &mut buf)?;
        Ok(buf.as_slice().read_i32::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self, offset: u64) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill(offset, &mut buf)?;
        Ok(buf.as_slice().read_u32::<LittleEndian>()?)
    }

    pub fn read_raw(&mut self, offset: u64, length: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; length];
        self.fill(offset, &mut buf)?;
        Ok(buf)
    }

    /// Read a fixed length ASCII field, dropping the NUL padding and
    /// upper-casing it. Lump and texture names are case-insensitive.
    pub fn read_string(&mut self, offset: u64, length: usize) -> Result<String> {
        let raw = self.read_raw(offset, length)?;
        ascii_name(&raw).ok_or_else(|| WadError::Decode {
            offset,
            reason: format!("non-ASCII name {raw:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cursor(bytes: &[u8]) -> BinaryCursor<Cursor<Vec<u8>>> {
        BinaryCursor::new(Cursor::new(bytes.to_vec())).unwrap()
    }

    #[test]
    fn reads_little_endian_at_offsets() {
        let mut c = cursor(&[0xff, 0x34, 0x12, 0xfe, 0xff, 0x78, 0x56, 0x34, 0x12]);
        assert_eq!(c.len(), 9);
        assert_eq!(c.read_u8(0).unwrap(), 0xff);
        assert_eq!(c.read_i8(0).unwrap(), -1);
        assert_eq!(c.read_u16(1).unwrap(), 0x1234);
        assert_eq!(c.read_i16(3).unwrap(), -2);
        assert_eq!(c.read_u32(5).unwrap(), 0x1234_5678);
        // Going backwards is fine, every read seeks
        assert_eq!(c.read_u16(1).unwrap(), 0x1234);
    }

    #[test]
    fn read_bytes_dispatches_on_format() {
        let mut c = cursor(&[0xfe, 0xff, 0xff, 0xff]);
        assert_eq!(
            c.read_bytes(0, 4, IntFormat::I32).unwrap(),
            IntValue::I32(-2)
        );
        assert_eq!(
            c.read_bytes(0, 2, IntFormat::U16).unwrap(),
            IntValue::U16(0xfffe)
        );
        assert_eq!(c.read_bytes(1, 1, IntFormat::I8).unwrap().as_i64(), -1);
    }

    #[test]
    fn width_mismatch_is_a_decode_error() {
        let mut c = cursor(&[0, 0, 0, 0]);
        assert!(matches!(
            c.read_bytes(0, 3, IntFormat::U32),
            Err(WadError::Decode { offset: 0, .. })
        ));
    }

    #[test]
    fn reading_past_the_end_is_truncated() {
        let mut c = cursor(&[1, 2, 3]);
        match c.read_u32(0) {
            Err(WadError::TruncatedRead {
                offset,
                wanted,
                available,
            }) => {
                assert_eq!(offset, 0);
                assert_eq!(wanted, 4);
                assert_eq!(available, 3);
            }
            other => panic!("expected truncated read, got {other:?}"),
        }
        assert!(matches!(
            c.read_u16(10),
            Err(WadError::TruncatedRead { available: 0, .. })
        ));
    }

    #[test]
    fn strings_are_trimmed_and_upper_cased() {
        let mut c = cursor(b"e1m1\0\0\0\0VERTEXES");
        assert_eq!(c.read_string(0, 8).unwrap(), "E1M1");
        assert_eq!(c.read_string(8, 8).unwrap(), "VERTEXES");
    }

    #[test]
    fn garbage_after_nul_is_ignored() {
        assert_eq!(ascii_name(b"MAP01\0\xff\xfe").as_deref(), Some("MAP01"));
        assert_eq!(ascii_name(b"\xffBAD\0\0\0\0"), None);
    }
}
