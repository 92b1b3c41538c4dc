//! Binary persistence for [`BitArray`] and [`SparseArray`].
//!
//! The wire layout is little-endian, byte-exact and order-preserving; a
//! value always unpacks bit-for-bit equal to what was packed:
//!
//! - `BitArray`: `u32` stored word count, each word as a `u64` (lowest-order
//!   word first), then one `u8` tail flag.
//! - `SparseArray`: `u32` subrange count, each subrange as `i64` begin and
//!   `i64` end (ascending order), then one `u8` inverse flag.
//!
//! Readers expect streams produced by the matching writer; stream-level
//! failures and structurally impossible subrange lists surface as
//! [`Error`](crate::Error), never as panics.

use std::io::{Read, Write};

use byteorder::{LE, ReadBytesExt, WriteBytesExt};
use tailset_mask::Mask64;

use crate::error::Error;
use crate::result::Result;
use crate::sparse_array::Subrange;
use crate::{BitArray, SparseArray};

impl BitArray {
    /// Serializes the array to any writer.
    ///
    /// Returns the number of bytes written.
    pub fn pack_to_writer<W>(&self, w: &mut W) -> Result<usize>
    where
        W: Write + ?Sized,
    {
        w.write_u32::<LE>(self.num_words() as u32)?;
        for word in self.words() {
            w.write_u64::<LE>(word.word())?;
        }
        w.write_u8(self.highest_bits() as u8)?;
        Ok(4 + 8 * self.num_words() + 1)
    }

    /// Serializes the array to a byte vector.
    pub fn pack_to_vec(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(8 * self.num_words() + 5);
        self.pack_to_writer(&mut v)
            .expect("packing to a vec should not fail");
        v
    }

    /// Deserializes an array previously written by
    /// [`BitArray::pack_to_writer`].
    ///
    /// The result is re-normalized, so a stream carrying redundant trailing
    /// words still yields a canonical array.
    pub fn unpack_from_reader<R>(r: &mut R) -> Result<BitArray>
    where
        R: Read + ?Sized,
    {
        let count = r.read_u32::<LE>()? as usize;
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(Mask64::new(r.read_u64::<LE>()?));
        }
        let highest_bits = r.read_u8()? != 0;
        Ok(BitArray::from_parts(words, highest_bits))
    }

    /// Deserializes an array from a byte slice.
    pub fn unpack_from_slice(mut s: &[u8]) -> Result<BitArray> {
        Self::unpack_from_reader(&mut s)
    }
}

impl SparseArray {
    /// Serializes the array to any writer.
    ///
    /// Returns the number of bytes written.
    pub fn pack_to_writer<W>(&self, w: &mut W) -> Result<usize>
    where
        W: Write + ?Sized,
    {
        w.write_u32::<LE>(self.num_subranges() as u32)?;
        for sr in self.subranges() {
            w.write_i64::<LE>(sr.begin)?;
            w.write_i64::<LE>(sr.end)?;
        }
        w.write_u8(self.is_inverse() as u8)?;
        Ok(4 + 16 * self.num_subranges() + 1)
    }

    /// Serializes the array to a byte vector.
    pub fn pack_to_vec(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(16 * self.num_subranges() + 5);
        self.pack_to_writer(&mut v)
            .expect("packing to a vec should not fail");
        v
    }

    /// Deserializes an array previously written by
    /// [`SparseArray::pack_to_writer`].
    ///
    /// A stream whose subranges are empty, out of order or touching cannot
    /// have come from the writer and is rejected as invalid.
    pub fn unpack_from_reader<R>(r: &mut R) -> Result<SparseArray>
    where
        R: Read + ?Sized,
    {
        let count = r.read_u32::<LE>()? as usize;
        let mut subranges = Vec::with_capacity(count);
        let mut previous_end: Option<i64> = None;
        for _ in 0..count {
            let begin = r.read_i64::<LE>()?;
            let end = r.read_i64::<LE>()?;
            if begin >= end {
                return Err(Error::invalid_format(
                    "SparseArray",
                    format!("empty subrange {begin}..{end}"),
                ));
            }
            if previous_end.is_some_and(|prev| prev >= begin) {
                return Err(Error::invalid_format(
                    "SparseArray",
                    format!("subrange {begin}..{end} out of order"),
                ));
            }
            previous_end = Some(end);
            subranges.push(Subrange::new(begin, end));
        }
        let inverse = r.read_u8()? != 0;
        Ok(SparseArray::from_parts(subranges, inverse))
    }

    /// Deserializes an array from a byte slice.
    pub fn unpack_from_slice(mut s: &[u8]) -> Result<SparseArray> {
        Self::unpack_from_reader(&mut s)
    }
}
