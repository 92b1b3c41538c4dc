//! Infinite-extent integer sets.
//!
//! Two interchangeable representations of a set of integers whose extent is
//! conceptually unbounded (e.g. "every bit except 3 and 7"):
//!
//! - [`BitArray`] — dense: a growable, copy-on-write sequence of 64-bit mask
//!   words plus a single tail flag giving the value of every bit beyond the
//!   stored words. Indices are non-negative.
//! - [`SparseArray`] — sparse: a sorted list of disjoint half-open subranges
//!   plus an inverse flag. Indices may be negative.
//!
//! Both carry the full boolean set algebra (well-defined between infinite
//! tails), shifts, bit and range mutation, ordered comparison, and a
//! byte-stable little-endian codec ([`codec`]). Conversion constructors
//! connect the two forms in either direction.
//!
//! The cost of every operation is proportional to the physical size of the
//! representation (stored words or subranges), never to the magnitude of the
//! indices involved.

pub mod bit_array;
pub mod codec;
pub mod error;
pub mod result;
pub mod sparse_array;

mod convert;
#[cfg(test)]
mod tests;

pub use bit_array::BitArray;
pub use error::{Error, ErrorKind};
pub use result::Result;
pub use sparse_array::{SparseArray, Subrange};
