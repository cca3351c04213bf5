use crate::cursor::BinaryCursor;
use crate::error::Result;
use crate::lumps::LumpRecord;
use std::io::{Read, Seek};
use std::marker::PhantomData;

/// Decodes the records of one lump lazily, one `T::SIZE` step at a time
pub struct LumpIter<'a, T, R> {
    cursor: &'a mut BinaryCursor<R>,
    lump_offset: u64,
    item_count: usize,
    current: usize,
    _phantom: PhantomData<T>,
}

impl<'a, T, R> LumpIter<'a, T, R> {
    pub(crate) fn new(cursor: &'a mut BinaryCursor<R>, lump_offset: u64, item_count: usize) -> Self {
        Self {
            cursor,
            lump_offset,
            item_count,
            current: 0,
            _phantom: PhantomData,
        }
    }
}

impl<T, R> Iterator for LumpIter<'_, T, R>
where
    T: LumpRecord,
    R: Read + Seek,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current < self.item_count {
            let offset = self.lump_offset + (self.current * T::SIZE) as u64;
            self.current += 1;
            return Some(T::decode(&mut *self.cursor, offset));
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.item_count - self.current;
        (left, Some(left))
    }
}

impl<T, R> ExactSizeIterator for LumpIter<'_, T, R>
where
    T: LumpRecord,
    R: Read + Seek,
{
}
