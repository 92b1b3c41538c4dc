//! Conversions between the dense and sparse representations.

use crate::sparse_array::Subrange;
use crate::{BitArray, SparseArray};

impl From<&BitArray> for SparseArray {
    /// Re-encodes a dense array as subrange runs.
    ///
    /// The walk visits conceptual bits `0..=num_bits()`; the final position
    /// carries the tail value by definition, which closes any open run and
    /// bounds the walk despite the logically infinite domain. Runs whose
    /// value differs from `highest_bits` become the listed subranges, and
    /// the tail value becomes `inverse`.
    fn from(bits: &BitArray) -> SparseArray {
        let empty_bit = bits.highest_bits();
        let mut subranges = Vec::new();
        let mut run_start: Option<i64> = None;
        for pos in 0..=bits.num_bits() {
            if bits.contains(pos) != empty_bit {
                if run_start.is_none() {
                    run_start = Some(pos as i64);
                }
            } else if let Some(begin) = run_start.take() {
                subranges.push(Subrange::new(begin, pos as i64));
            }
        }
        SparseArray::from_parts(subranges, empty_bit)
    }
}

impl From<BitArray> for SparseArray {
    fn from(bits: BitArray) -> SparseArray {
        SparseArray::from(&bits)
    }
}

impl From<&SparseArray> for BitArray {
    /// Materializes a sparse array as a dense one.
    ///
    /// Starts from the constant array selected by `inverse` and applies the
    /// listed runs. The dense form has no negative positions, so a subrange
    /// reaching below zero is a precondition violation.
    fn from(sparse: &SparseArray) -> BitArray {
        let mut bits = if sparse.is_inverse() {
            BitArray::all_on()
        } else {
            BitArray::all_off()
        };
        for sr in sparse.subranges() {
            assert!(
                sr.begin >= 0,
                "subrange {sr:?} has negative positions, which a dense array cannot hold"
            );
            let range = sr.begin as u64..sr.end as u64;
            if sparse.is_inverse() {
                bits.reset_range(range);
            } else {
                bits.set_range(range);
            }
        }
        bits
    }
}

impl From<SparseArray> for BitArray {
    fn from(sparse: SparseArray) -> BitArray {
        BitArray::from(&sparse)
    }
}
