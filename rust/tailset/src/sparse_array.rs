//! A sparse integer set of unbounded extent, stored as subrange runs.

use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Range, Shl, ShlAssign,
    Shr, ShrAssign,
};

use itertools::Itertools;

/// A half-open run `[begin, end)` of consecutive set positions.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subrange {
    pub begin: i64,
    pub end: i64,
}

impl Subrange {
    #[inline]
    pub fn new(begin: i64, end: i64) -> Subrange {
        debug_assert!(begin < end);
        Subrange { begin, end }
    }

    /// Number of positions covered.
    #[inline]
    pub fn len(&self) -> u64 {
        (self.end - self.begin) as u64
    }

    #[inline]
    pub fn contains(&self, pos: i64) -> bool {
        pos >= self.begin && pos < self.end
    }

    #[inline]
    pub fn as_range(&self) -> Range<i64> {
        self.begin..self.end
    }

    /// Merges `next` into `self` when the two touch or overlap.
    ///
    /// Requires `self.begin <= next.begin` (i.e. inputs sorted by start).
    #[inline]
    pub fn coalesce(self, next: Subrange) -> Result<Subrange, (Subrange, Subrange)> {
        if next.begin <= self.end {
            Ok(Subrange::new(self.begin, self.end.max(next.end)))
        } else {
            Err((self, next))
        }
    }
}

impl From<Range<i64>> for Subrange {
    #[inline]
    fn from(range: Range<i64>) -> Subrange {
        Subrange::new(range.start, range.end)
    }
}

impl From<Subrange> for Range<i64> {
    #[inline]
    fn from(subrange: Subrange) -> Range<i64> {
        subrange.as_range()
    }
}

impl fmt::Debug for Subrange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

/// A sparse set over all integers (negative positions included),
/// conceptually infinite in extent.
///
/// Storage is a sorted list of disjoint, non-touching subranges plus an
/// `inverse` flag: a position is on iff it falls in a listed subrange XOR
/// `inverse`. `all_on()` is the empty list with `inverse` set, and co-finite
/// sets stay exactly as small as their complement is simple.
///
/// # Canonical form
///
/// Subranges are strictly increasing, non-empty, non-overlapping and
/// non-adjacent (`ranges[i].end < ranges[i + 1].begin`). Every mutator
/// re-establishes this, so structural equality is semantic equality.
///
/// The list is held by value: cloning copies it, and nothing is shared.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SparseArray {
    subranges: Vec<Subrange>,
    inverse: bool,
}

impl SparseArray {
    /// Returns an array with every position off.
    pub fn all_off() -> SparseArray {
        SparseArray {
            subranges: Vec::new(),
            inverse: false,
        }
    }

    /// Returns an array with every position on.
    pub fn all_on() -> SparseArray {
        SparseArray {
            subranges: Vec::new(),
            inverse: true,
        }
    }

    /// Returns an array with only the position `pos` on.
    pub fn bit(pos: i64) -> SparseArray {
        SparseArray::range(pos..pos + 1)
    }

    /// Returns an array whose positions in `range` are on.
    pub fn range(range: Range<i64>) -> SparseArray {
        let mut array = SparseArray::all_off();
        array.set_range(range);
        array
    }

    /// Returns an array whose positions in `[0, count)` are on.
    pub fn lower_on(count: u64) -> SparseArray {
        SparseArray::range(0..count as i64)
    }

    /// Builds an array from subranges sorted by start.
    ///
    /// Touching or overlapping inputs are merged, as in
    /// [`Itertools::coalesce`]; empty inputs are skipped.
    pub fn from_ranges(ranges: impl IntoIterator<Item = Range<i64>>) -> SparseArray {
        let subranges = ranges
            .into_iter()
            .filter(|r| r.start < r.end)
            .map(Subrange::from)
            .coalesce(|prev, next| prev.coalesce(next))
            .collect();
        let array = SparseArray {
            subranges,
            inverse: false,
        };
        #[cfg(debug_assertions)]
        array.check_invariants();
        array
    }

    pub(crate) fn from_parts(subranges: Vec<Subrange>, inverse: bool) -> SparseArray {
        let array = SparseArray { subranges, inverse };
        #[cfg(debug_assertions)]
        array.check_invariants();
        array
    }

    /// Returns the listed subranges in ascending order.
    #[inline]
    pub fn subranges(&self) -> &[Subrange] {
        &self.subranges
    }

    /// Returns the number of listed subranges.
    #[inline]
    pub fn num_subranges(&self) -> usize {
        self.subranges.len()
    }

    /// Whether the listed subranges denote off runs rather than on runs.
    #[inline]
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Checks whether the position `pos` is on.
    pub fn contains(&self, pos: i64) -> bool {
        let index = self.subranges.partition_point(|sr| sr.end <= pos);
        let listed = self
            .subranges
            .get(index)
            .is_some_and(|sr| sr.begin <= pos);
        listed != self.inverse
    }

    /// Checks whether no position is on.
    #[inline]
    pub fn is_zero(&self) -> bool {
        !self.inverse && self.subranges.is_empty()
    }

    /// Checks whether every position is on.
    #[inline]
    pub fn is_all_on(&self) -> bool {
        self.inverse && self.subranges.is_empty()
    }

    /// Counts the on positions, or `None` when infinitely many are on.
    pub fn count_ones(&self) -> Option<u64> {
        if self.inverse {
            return None;
        }
        Some(self.subranges.iter().map(|sr| sr.len()).sum())
    }

    /// Counts the off positions, or `None` when infinitely many are off.
    pub fn count_zeros(&self) -> Option<u64> {
        if !self.inverse {
            return None;
        }
        Some(self.subranges.iter().map(|sr| sr.len()).sum())
    }

    /// Returns the lowest on position.
    ///
    /// `None` both when nothing is on and when the on region extends
    /// without bound toward negative positions (any inverse array).
    pub fn lowest_on_bit(&self) -> Option<i64> {
        if self.inverse {
            return None;
        }
        self.subranges.first().map(|sr| sr.begin)
    }

    /// Returns the highest on position, with the same `None` conventions as
    /// [`SparseArray::lowest_on_bit`].
    pub fn highest_on_bit(&self) -> Option<i64> {
        if self.inverse {
            return None;
        }
        self.subranges.last().map(|sr| sr.end - 1)
    }

    /// Returns the lowest off position, or `None` when the off region is
    /// empty or unbounded.
    pub fn lowest_off_bit(&self) -> Option<i64> {
        if !self.inverse {
            return None;
        }
        self.subranges.first().map(|sr| sr.begin)
    }

    /// Returns the highest off position, or `None` when the off region is
    /// empty or unbounded.
    pub fn highest_off_bit(&self) -> Option<i64> {
        if !self.inverse {
            return None;
        }
        self.subranges.last().map(|sr| sr.end - 1)
    }

    /// Returns the position of the next bit above `low` whose value differs
    /// from the bit at `low`, or `low` itself when every higher bit matches.
    ///
    /// Values flip exactly at subrange boundaries, regardless of `inverse`.
    pub fn next_higher_different_bit(&self, low: i64) -> i64 {
        let index = self.subranges.partition_point(|sr| sr.end <= low);
        match self.subranges.get(index) {
            Some(sr) if sr.begin <= low => sr.end,
            Some(sr) => sr.begin,
            None => low,
        }
    }

    /// Checks whether any position in `range` is on. Empty ranges hold
    /// nothing, so the answer is `false`.
    pub fn has_any_of(&self, range: Range<i64>) -> bool {
        if range.start >= range.end {
            return false;
        }
        if self.inverse {
            !self.listed_has_all(&range)
        } else {
            self.listed_has_any(&range)
        }
    }

    /// Checks whether every position in `range` is on. Vacuously `true` for
    /// an empty range.
    pub fn has_all_of(&self, range: Range<i64>) -> bool {
        if range.start >= range.end {
            return true;
        }
        if self.inverse {
            !self.listed_has_any(&range)
        } else {
            self.listed_has_all(&range)
        }
    }

    /// Whether any listed subrange intersects `range`.
    fn listed_has_any(&self, range: &Range<i64>) -> bool {
        let index = self.subranges.partition_point(|sr| sr.end <= range.start);
        self.subranges
            .get(index)
            .is_some_and(|sr| sr.begin < range.end)
    }

    /// Whether one listed subrange covers all of `range`. A canonical list
    /// never splits a contiguous covered stretch across two subranges.
    fn listed_has_all(&self, range: &Range<i64>) -> bool {
        let index = self.subranges.partition_point(|sr| sr.end <= range.start);
        self.subranges
            .get(index)
            .is_some_and(|sr| sr.begin <= range.start && sr.end >= range.end)
    }

    /// Turns the position `pos` on.
    pub fn set(&mut self, pos: i64) {
        self.set_range(pos..pos + 1);
    }

    /// Turns the position `pos` off.
    pub fn reset(&mut self, pos: i64) {
        self.reset_range(pos..pos + 1);
    }

    /// Sets the position `pos` to `value`.
    pub fn set_value(&mut self, pos: i64, value: bool) {
        if value {
            self.set(pos);
        } else {
            self.reset(pos);
        }
    }

    /// Turns every position in `range` on. An empty range is a no-op.
    pub fn set_range(&mut self, range: Range<i64>) {
        if self.inverse {
            self.remove_range(range.start, range.end);
        } else {
            self.add_range(range.start, range.end);
        }
    }

    /// Turns every position in `range` off. An empty range is a no-op.
    pub fn reset_range(&mut self, range: Range<i64>) {
        if self.inverse {
            self.add_range(range.start, range.end);
        } else {
            self.remove_range(range.start, range.end);
        }
    }

    /// Sets every position in `range` to `value`.
    pub fn set_range_to(&mut self, value: bool, range: Range<i64>) {
        if value {
            self.set_range(range);
        } else {
            self.reset_range(range);
        }
    }

    /// Flips every position.
    #[inline]
    pub fn negate(&mut self) {
        self.inverse = !self.inverse;
    }

    /// Adds `[begin, end)` to the listed subranges, merging any touching or
    /// overlapping neighbors into a single span.
    fn add_range(&mut self, begin: i64, end: i64) {
        if begin >= end {
            return;
        }
        // First subrange that could merge: touching counts, so `end == begin`
        // on either side still coalesces.
        let first = self.subranges.partition_point(|sr| sr.end < begin);
        let last = first
            + self.subranges[first..].partition_point(|sr| sr.begin <= end);
        if first == last {
            self.subranges.insert(first, Subrange::new(begin, end));
        } else {
            let merged = Subrange::new(
                begin.min(self.subranges[first].begin),
                end.max(self.subranges[last - 1].end),
            );
            self.subranges.splice(first..last, std::iter::once(merged));
        }
    }

    /// Removes `[begin, end)` from the listed subranges, shrinking or
    /// deleting overlapped neighbors and splitting a fully straddled
    /// subrange in two.
    fn remove_range(&mut self, begin: i64, end: i64) {
        if begin >= end {
            return;
        }
        let first = self.subranges.partition_point(|sr| sr.end <= begin);
        let last = first
            + self.subranges[first..].partition_point(|sr| sr.begin < end);
        if first == last {
            return;
        }
        let head = self.subranges[first];
        let tail = self.subranges[last - 1];
        let mut keep = [Subrange::new(0, 1); 2];
        let mut kept = 0;
        if head.begin < begin {
            keep[kept] = Subrange::new(head.begin, begin);
            kept += 1;
        }
        if tail.end > end {
            keep[kept] = Subrange::new(end, tail.end);
            kept += 1;
        }
        self.subranges
            .splice(first..last, keep[..kept].iter().copied());
    }

    /// Asserts the structural invariant: subranges non-empty, strictly
    /// increasing and non-touching.
    pub fn check_invariants(&self) {
        for sr in &self.subranges {
            assert!(sr.begin < sr.end, "empty subrange {sr:?}");
        }
        for pair in self.subranges.windows(2) {
            assert!(
                pair[0].end < pair[1].begin,
                "subranges out of order or touching: {:?}, {:?}",
                pair[0],
                pair[1]
            );
        }
    }
}

/// Streaming intersection of two canonical subrange lists.
fn intersect_lists(a: &[Subrange], b: &[Subrange]) -> Vec<Subrange> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let begin = a[i].begin.max(b[j].begin);
        let end = a[i].end.min(b[j].end);
        if begin < end {
            out.push(Subrange::new(begin, end));
        }
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

impl Default for SparseArray {
    fn default() -> Self {
        SparseArray::all_off()
    }
}

impl BitAndAssign<&SparseArray> for SparseArray {
    /// Intersection, dispatching on the two `inverse` flags.
    fn bitand_assign(&mut self, rhs: &SparseArray) {
        match (self.inverse, rhs.inverse) {
            (false, false) => {
                self.subranges = intersect_lists(&self.subranges, &rhs.subranges);
            }
            (false, true) => {
                // A ∩ ¬B: subtract B's runs.
                for sr in &rhs.subranges {
                    self.remove_range(sr.begin, sr.end);
                }
            }
            (true, false) => {
                // ¬A ∩ B: start from B's runs and subtract ours.
                let removed = mem::take(&mut self.subranges);
                self.subranges = rhs.subranges.clone();
                self.inverse = false;
                for sr in &removed {
                    self.remove_range(sr.begin, sr.end);
                }
            }
            (true, true) => {
                // ¬A ∩ ¬B = ¬(A ∪ B).
                for sr in &rhs.subranges {
                    self.add_range(sr.begin, sr.end);
                }
            }
        }
    }
}

impl BitOrAssign<&SparseArray> for SparseArray {
    /// Union; each `inverse` case reduces to intersection or subtraction by
    /// De Morgan.
    fn bitor_assign(&mut self, rhs: &SparseArray) {
        match (self.inverse, rhs.inverse) {
            (false, false) => {
                for sr in &rhs.subranges {
                    self.add_range(sr.begin, sr.end);
                }
            }
            (false, true) => {
                // A ∪ ¬B = ¬(B ∖ A).
                let removed = mem::take(&mut self.subranges);
                self.subranges = rhs.subranges.clone();
                self.inverse = true;
                for sr in &removed {
                    self.remove_range(sr.begin, sr.end);
                }
            }
            (true, false) => {
                // ¬A ∪ B = ¬(A ∖ B).
                for sr in &rhs.subranges {
                    self.remove_range(sr.begin, sr.end);
                }
            }
            (true, true) => {
                // ¬A ∪ ¬B = ¬(A ∩ B).
                self.subranges = intersect_lists(&self.subranges, &rhs.subranges);
            }
        }
    }
}

impl BitXorAssign<&SparseArray> for SparseArray {
    /// Symmetric difference via `(a | b) & !(a & b)`.
    ///
    /// This stays on the generic composition rather than a fused range walk;
    /// the result is what matters at the observed subrange counts.
    fn bitxor_assign(&mut self, rhs: &SparseArray) {
        let mut union = self.clone();
        union |= rhs;
        let mut intersection = self.clone();
        intersection &= rhs;
        intersection.negate();
        union &= &intersection;
        *self = union;
    }
}

impl BitAnd<&SparseArray> for &SparseArray {
    type Output = SparseArray;

    fn bitand(self, rhs: &SparseArray) -> SparseArray {
        let mut result = self.clone();
        result &= rhs;
        result
    }
}

impl BitOr<&SparseArray> for &SparseArray {
    type Output = SparseArray;

    fn bitor(self, rhs: &SparseArray) -> SparseArray {
        let mut result = self.clone();
        result |= rhs;
        result
    }
}

impl BitXor<&SparseArray> for &SparseArray {
    type Output = SparseArray;

    fn bitxor(self, rhs: &SparseArray) -> SparseArray {
        let mut result = self.clone();
        result ^= rhs;
        result
    }
}

impl Not for &SparseArray {
    type Output = SparseArray;

    fn not(self) -> SparseArray {
        let mut result = self.clone();
        result.negate();
        result
    }
}

impl ShlAssign<u64> for SparseArray {
    /// Translates every subrange up by `amount`.
    fn shl_assign(&mut self, amount: u64) {
        for sr in &mut self.subranges {
            sr.begin += amount as i64;
            sr.end += amount as i64;
        }
    }
}

impl ShrAssign<u64> for SparseArray {
    /// Translates every subrange down by `amount`. Positions may go
    /// negative; nothing is truncated.
    fn shr_assign(&mut self, amount: u64) {
        for sr in &mut self.subranges {
            sr.begin -= amount as i64;
            sr.end -= amount as i64;
        }
    }
}

impl Shl<u64> for &SparseArray {
    type Output = SparseArray;

    fn shl(self, amount: u64) -> SparseArray {
        let mut result = self.clone();
        result <<= amount;
        result
    }
}

impl Shr<u64> for &SparseArray {
    type Output = SparseArray;

    fn shr(self, amount: u64) -> SparseArray {
        let mut result = self.clone();
        result >>= amount;
        result
    }
}

impl PartialOrd for SparseArray {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SparseArray {
    /// Orders consistently with [`BitArray`](crate::BitArray): `inverse`
    /// (the analogue of an all-on tail) decides first, then subranges
    /// compare from the highest down — greater `end` wins, then smaller
    /// `begin` (at the highest differing position, the set holding it is
    /// the greater one).
    fn cmp(&self, other: &Self) -> Ordering {
        match self.inverse.cmp(&other.inverse) {
            Ordering::Equal => {}
            ord => return ord,
        }
        let mut a = self.subranges.iter().rev();
        let mut b = other.subranges.iter().rev();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some(x), Some(y)) => {
                    match x.end.cmp(&y.end) {
                        Ordering::Equal => {}
                        ord => return ord,
                    }
                    match y.begin.cmp(&x.begin) {
                        Ordering::Equal => {}
                        ord => return ord,
                    }
                }
            }
        }
    }
}

impl fmt::Display for SparseArray {
    /// Set notation over the listed subranges, `~`-prefixed when they
    /// denote the off runs: `~[3..4, 7..8]` is "everything except 3 and 7".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            f.write_str("~")?;
        }
        f.write_str("[")?;
        for (index, sr) in self.subranges.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{sr:?}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for SparseArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SparseArray({self})")
    }
}
