//! A dense bit vector of unbounded extent.

use std::cmp::Ordering;
use std::fmt;
use std::fmt::Write as _;
use std::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Range, Shl, ShlAssign,
    Shr, ShrAssign,
};

use tailset_mask::{FixedMask, Mask64};
use tailset_shared_vec::CowVec;

/// Width of one storage word in bits.
const WORD_BITS: u32 = Mask64::BITS;

/// A dense bit vector over the non-negative integers, conceptually infinite
/// in extent.
///
/// Storage is a sequence of 64-bit mask words (word 0 holds bits 0–63) plus
/// `highest_bits`, the value taken by every bit beyond the stored words. An
/// array can therefore represent co-finite sets — `all_on()` stores no words
/// at all — and every operation costs time proportional to the stored word
/// count, never to the magnitude of the indices involved.
///
/// # Canonical form
///
/// After every mutation the array is normalized: no trailing stored word may
/// equal the tail word (`highest_bits` replicated across 64 bits). Two
/// arrays are bit-for-bit equal if and only if they are structurally equal,
/// so `PartialEq`, `Hash` and `Ord` operate directly on the representation.
///
/// # Sharing
///
/// The word buffer is held copy-on-write: cloning a `BitArray` shares it,
/// and the first mutation of either clone duplicates it. Concurrent readers
/// of logical copies need no synchronization; mutating a single logical
/// instance from several threads is the caller's problem (and unrepresentable
/// in safe Rust, which demands `&mut`).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitArray {
    words: CowVec<Mask64>,
    highest_bits: bool,
}

#[inline]
fn split(pos: u64) -> (usize, u32) {
    ((pos / WORD_BITS as u64) as usize, (pos % WORD_BITS as u64) as u32)
}

impl BitArray {
    /// Returns an array with every bit off.
    pub fn all_off() -> BitArray {
        BitArray {
            words: CowVec::new(),
            highest_bits: false,
        }
    }

    /// Returns an array with every bit on.
    pub fn all_on() -> BitArray {
        BitArray {
            words: CowVec::new(),
            highest_bits: true,
        }
    }

    /// Returns an array with only the bit at `pos` on.
    pub fn bit(pos: u64) -> BitArray {
        let mut array = BitArray::all_off();
        array.set(pos);
        array
    }

    /// Returns an array whose bits in `range` are on.
    pub fn range(range: Range<u64>) -> BitArray {
        let mut array = BitArray::all_off();
        array.set_range(range);
        array
    }

    /// Returns an array whose lowest `count` bits are on.
    pub fn lower_on(count: u64) -> BitArray {
        BitArray::range(0..count)
    }

    /// Lifts a fixed-width mask into the low bits of an array.
    pub fn from_mask(mask: Mask64) -> BitArray {
        BitArray::from_parts(vec![mask], false)
    }

    pub(crate) fn from_parts(words: Vec<Mask64>, highest_bits: bool) -> BitArray {
        let mut array = BitArray {
            words: CowVec::from_vec(words),
            highest_bits,
        };
        array.normalize();
        array
    }

    /// The word every stored word is measured against: `highest_bits`
    /// replicated across the full word width.
    #[inline]
    fn tail_word(&self) -> Mask64 {
        Mask64::replicated(self.highest_bits)
    }

    /// Returns the stored word at `index`, or the tail word past the end.
    #[inline]
    fn word_or_tail(&self, index: usize) -> Mask64 {
        self.words.get(index).copied().unwrap_or(self.tail_word())
    }

    /// Grows the stored words to at least `count`, appending copies of the
    /// current tail word so that no defined bit changes value.
    fn ensure_word(&mut self, count: usize) {
        if self.words.len() < count {
            let tail = self.tail_word();
            self.words.make_mut().resize(count, tail);
        }
    }

    /// Restores canonical form by popping trailing words equal to the tail
    /// word. Runs after every mutation that could create one.
    fn normalize(&mut self) {
        let tail = self.tail_word();
        if self.words.last() == Some(&tail) {
            let words = self.words.make_mut();
            while words.last() == Some(&tail) {
                words.pop();
            }
        }
    }

    /// Checks whether the bit at `pos` is on.
    #[inline]
    pub fn contains(&self, pos: u64) -> bool {
        let (word, bit) = split(pos);
        match self.words.get(word) {
            Some(mask) => mask.contains(bit),
            None => self.highest_bits,
        }
    }

    /// Returns the number of stored words.
    #[inline]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Returns the stored word at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_words()`.
    #[inline]
    pub fn word(&self, index: usize) -> Mask64 {
        self.words[index]
    }

    /// Returns the stored words, lowest-order first.
    #[inline]
    pub fn words(&self) -> &[Mask64] {
        &self.words
    }

    /// Returns one past the highest explicitly stored bit position.
    ///
    /// Every bit at or above this position equals [`BitArray::highest_bits`].
    #[inline]
    pub fn num_bits(&self) -> u64 {
        self.words.len() as u64 * WORD_BITS as u64
    }

    /// The value of every bit beyond the stored words.
    #[inline]
    pub fn highest_bits(&self) -> bool {
        self.highest_bits
    }

    /// Checks whether no bit is on.
    pub fn is_zero(&self) -> bool {
        !self.highest_bits && self.words.iter().all(|w| w.is_zero())
    }

    /// Checks whether every bit is on.
    pub fn is_all_on(&self) -> bool {
        self.highest_bits && self.words.iter().all(|w| w.is_all_on())
    }

    /// Counts the on bits, or `None` when infinitely many are on.
    pub fn count_ones(&self) -> Option<u64> {
        if self.highest_bits {
            return None;
        }
        Some(self.words.iter().map(|w| w.count_ones() as u64).sum())
    }

    /// Counts the off bits, or `None` when infinitely many are off.
    pub fn count_zeros(&self) -> Option<u64> {
        if !self.highest_bits {
            return None;
        }
        Some(
            self.words
                .iter()
                .map(|w| (WORD_BITS - w.count_ones()) as u64)
                .sum(),
        )
    }

    /// Returns the position of the lowest on bit, or `None` if no bit is on.
    pub fn lowest_on_bit(&self) -> Option<u64> {
        for (index, word) in self.words.iter().enumerate() {
            if let Some(bit) = word.lowest_on_bit() {
                return Some(index as u64 * WORD_BITS as u64 + bit as u64);
            }
        }
        self.highest_bits.then(|| self.num_bits())
    }

    /// Returns the position of the lowest off bit, or `None` if no bit is off.
    pub fn lowest_off_bit(&self) -> Option<u64> {
        for (index, word) in self.words.iter().enumerate() {
            if let Some(bit) = word.lowest_off_bit() {
                return Some(index as u64 * WORD_BITS as u64 + bit as u64);
            }
        }
        (!self.highest_bits).then(|| self.num_bits())
    }

    /// Returns the position of the highest on bit.
    ///
    /// `None` both when no bit is on and when infinitely many are (an all-on
    /// tail has no highest member).
    pub fn highest_on_bit(&self) -> Option<u64> {
        if self.highest_bits {
            return None;
        }
        for (index, word) in self.words.iter().enumerate().rev() {
            if let Some(bit) = word.highest_on_bit() {
                return Some(index as u64 * WORD_BITS as u64 + bit as u64);
            }
        }
        None
    }

    /// Returns the position of the highest off bit.
    ///
    /// `None` both when no bit is off and when infinitely many are.
    pub fn highest_off_bit(&self) -> Option<u64> {
        if !self.highest_bits {
            return None;
        }
        for (index, word) in self.words.iter().enumerate().rev() {
            if let Some(bit) = word.highest_off_bit() {
                return Some(index as u64 * WORD_BITS as u64 + bit as u64);
            }
        }
        None
    }

    /// Returns the position of the next bit above `low` whose value differs
    /// from the bit at `low`, or `low` itself when every higher bit matches.
    pub fn next_higher_different_bit(&self, low: u64) -> u64 {
        let (word, bit) = split(low);
        if word >= self.words.len() {
            // `low` is already in the tail.
            return low;
        }
        let within = self.words[word].next_higher_different_bit(bit);
        if within != bit {
            return word as u64 * WORD_BITS as u64 + within as u64;
        }
        let value = self.words[word].contains(bit);
        let same = Mask64::replicated(value);
        for index in word + 1..self.words.len() {
            if self.words[index] != same {
                let diff = self.words[index] ^ same;
                let bit = diff.lowest_on_bit().unwrap_or(0);
                return index as u64 * WORD_BITS as u64 + bit as u64;
            }
        }
        if self.highest_bits != value {
            self.num_bits()
        } else {
            low
        }
    }

    /// Reads the `size`-bit field at `low` as an integer (`size <= 64`).
    pub fn extract(&self, low: u64, size: u32) -> u64 {
        assert!(size <= 64);
        if size == 0 {
            return 0;
        }
        let (word, bit) = split(low);
        if bit + size <= WORD_BITS {
            self.word_or_tail(word).extract(bit, size)
        } else {
            let lo_size = WORD_BITS - bit;
            self.word_or_tail(word).extract(bit, lo_size)
                | (self.word_or_tail(word + 1).extract(0, size - lo_size) << lo_size)
        }
    }

    /// Writes the low `size` bits of `value` into the field at `low`
    /// (`size <= 64`).
    pub fn store(&mut self, value: u64, low: u64, size: u32) {
        assert!(size <= 64);
        if size == 0 {
            return;
        }
        let (word, bit) = split(low);
        let (last_word, _) = split(low + size as u64 - 1);
        self.ensure_word(last_word + 1);
        {
            let words = self.words.make_mut();
            if bit + size <= WORD_BITS {
                words[word].store(value, bit, size);
            } else {
                let lo_size = WORD_BITS - bit;
                words[word].store(value, bit, lo_size);
                words[word + 1].store(value >> lo_size, 0, size - lo_size);
            }
        }
        self.normalize();
    }

    /// Checks whether any bit in `range` is on.
    pub fn has_any_of(&self, range: Range<u64>) -> bool {
        if range.start >= range.end {
            return false;
        }
        let (first_word, first_bit) = split(range.start);
        let (last_word, last_bit) = split(range.end);
        if first_word == last_word {
            return self.word_or_tail(first_word).has_any_of(first_bit, last_bit - first_bit);
        }
        if self.word_or_tail(first_word).has_any_of(first_bit, WORD_BITS - first_bit) {
            return true;
        }
        let interior = first_word + 1..last_word;
        for index in interior.start..interior.end.min(self.words.len()) {
            if !self.words[index].is_zero() {
                return true;
            }
        }
        if interior.end > interior.start && interior.end > self.words.len() && self.highest_bits {
            return true;
        }
        last_bit > 0 && self.word_or_tail(last_word).has_any_of(0, last_bit)
    }

    /// Checks whether every bit in `range` is on.
    pub fn has_all_of(&self, range: Range<u64>) -> bool {
        if range.start >= range.end {
            return true;
        }
        let (first_word, first_bit) = split(range.start);
        let (last_word, last_bit) = split(range.end);
        if first_word == last_word {
            return self.word_or_tail(first_word).has_all_of(first_bit, last_bit - first_bit);
        }
        if !self.word_or_tail(first_word).has_all_of(first_bit, WORD_BITS - first_bit) {
            return false;
        }
        let interior = first_word + 1..last_word;
        for index in interior.start..interior.end.min(self.words.len()) {
            if !self.words[index].is_all_on() {
                return false;
            }
        }
        if interior.end > interior.start && interior.end > self.words.len() && !self.highest_bits {
            return false;
        }
        last_bit == 0 || self.word_or_tail(last_word).has_all_of(0, last_bit)
    }

    /// Turns the bit at `pos` on.
    pub fn set(&mut self, pos: u64) {
        let (word, bit) = split(pos);
        self.ensure_word(word + 1);
        self.words.make_mut()[word].set(bit);
        self.normalize();
    }

    /// Turns the bit at `pos` off.
    pub fn reset(&mut self, pos: u64) {
        let (word, bit) = split(pos);
        self.ensure_word(word + 1);
        self.words.make_mut()[word].reset(bit);
        self.normalize();
    }

    /// Sets the bit at `pos` to `value`.
    pub fn set_value(&mut self, pos: u64, value: bool) {
        if value {
            self.set(pos);
        } else {
            self.reset(pos);
        }
    }

    /// Turns every bit in `range` on.
    pub fn set_range(&mut self, range: Range<u64>) {
        self.set_range_to(true, range);
    }

    /// Turns every bit in `range` off.
    pub fn reset_range(&mut self, range: Range<u64>) {
        self.set_range_to(false, range);
    }

    /// Sets every bit in `range` to `value`.
    ///
    /// The range decomposes into a partial prefix word, whole interior words
    /// and a partial suffix word. An empty range is a no-op.
    pub fn set_range_to(&mut self, value: bool, range: Range<u64>) {
        if range.start >= range.end {
            return;
        }
        let (first_word, first_bit) = split(range.start);
        let (last_word, last_bit) = split(range.end);
        let needed = if last_bit > 0 { last_word + 1 } else { last_word };
        self.ensure_word(needed);
        {
            let words = self.words.make_mut();
            if first_word == last_word {
                words[first_word].set_range_to(value, first_bit, last_bit - first_bit);
            } else {
                words[first_word].set_range_to(value, first_bit, WORD_BITS - first_bit);
                for word in &mut words[first_word + 1..last_word] {
                    *word = Mask64::replicated(value);
                }
                if last_bit > 0 {
                    words[last_word].set_range_to(value, 0, last_bit);
                }
            }
        }
        self.normalize();
    }

    /// Replaces the stored word at `index`, growing the array if needed.
    pub fn set_word(&mut self, index: usize, word: Mask64) {
        self.ensure_word(index + 1);
        self.words.make_mut()[index] = word;
        self.normalize();
    }

    /// Flips every bit, including the infinite tail.
    pub fn negate(&mut self) {
        if !self.words.is_empty() {
            for word in self.words.make_mut() {
                *word = !*word;
            }
        }
        self.highest_bits = !self.highest_bits;
        // Flipping both words and tail preserves canonical form.
    }

    /// Checks whether any position is on in both arrays.
    pub fn has_bits_in_common(&self, other: &BitArray) -> bool {
        if self.highest_bits && other.highest_bits {
            return true;
        }
        let count = self.words.len().max(other.words.len());
        (0..count).any(|i| !(self.word_or_tail(i) & other.word_or_tail(i)).is_zero())
    }

    /// Word-wise combination with `other`.
    ///
    /// The shorter operand's missing words are supplied by its own tail word,
    /// and the resulting tail is `tail_op` of the two operand tails.
    fn combine(
        &mut self,
        other: &BitArray,
        word_op: impl Fn(Mask64, Mask64) -> Mask64,
        tail_op: impl Fn(bool, bool) -> bool,
    ) {
        let count = self.words.len().max(other.words.len());
        self.ensure_word(count);
        let other_tail = Mask64::replicated(other.highest_bits);
        if count > 0 {
            let words = self.words.make_mut();
            for (index, word) in words.iter_mut().enumerate() {
                let rhs = other.words.get(index).copied().unwrap_or(other_tail);
                *word = word_op(*word, rhs);
            }
        }
        self.highest_bits = tail_op(self.highest_bits, other.highest_bits);
        self.normalize();
    }

    /// Renders the bits as a binary string, highest stored bit first, with
    /// a leading marker for the tail value. Diagnostic only.
    pub fn to_binary_string(&self) -> String {
        let mut out = String::new();
        out.push_str(if self.highest_bits { "..1" } else { "..0" });
        for word in self.words.iter().rev() {
            out.push(' ');
            for bit in (0..WORD_BITS).rev() {
                out.push(if word.contains(bit) { '1' } else { '0' });
            }
        }
        out
    }
}

impl Default for BitArray {
    fn default() -> Self {
        BitArray::all_off()
    }
}

impl From<Mask64> for BitArray {
    fn from(mask: Mask64) -> Self {
        BitArray::from_mask(mask)
    }
}

impl BitAndAssign<&BitArray> for BitArray {
    fn bitand_assign(&mut self, rhs: &BitArray) {
        self.combine(rhs, |a, b| a & b, |a, b| a && b);
    }
}

impl BitOrAssign<&BitArray> for BitArray {
    fn bitor_assign(&mut self, rhs: &BitArray) {
        self.combine(rhs, |a, b| a | b, |a, b| a || b);
    }
}

impl BitXorAssign<&BitArray> for BitArray {
    fn bitxor_assign(&mut self, rhs: &BitArray) {
        self.combine(rhs, |a, b| a ^ b, |a, b| a != b);
    }
}

impl BitAnd<&BitArray> for &BitArray {
    type Output = BitArray;

    fn bitand(self, rhs: &BitArray) -> BitArray {
        let mut result = self.clone();
        result &= rhs;
        result
    }
}

impl BitOr<&BitArray> for &BitArray {
    type Output = BitArray;

    fn bitor(self, rhs: &BitArray) -> BitArray {
        let mut result = self.clone();
        result |= rhs;
        result
    }
}

impl BitXor<&BitArray> for &BitArray {
    type Output = BitArray;

    fn bitxor(self, rhs: &BitArray) -> BitArray {
        let mut result = self.clone();
        result ^= rhs;
        result
    }
}

impl Not for &BitArray {
    type Output = BitArray;

    fn not(self) -> BitArray {
        let mut result = self.clone();
        result.negate();
        result
    }
}

impl ShlAssign<u64> for BitArray {
    /// Shifts every bit position up by `amount`.
    ///
    /// Vacated low positions become off; the infinite tail shifts into
    /// itself, so `highest_bits` is unchanged.
    fn shl_assign(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        let word_shift = (amount / WORD_BITS as u64) as usize;
        let bit_shift = (amount % WORD_BITS as u64) as u32;
        let tail = self.tail_word();
        let mut shifted = Vec::with_capacity(self.words.len() + word_shift + 1);
        shifted.resize(word_shift, Mask64::all_off());
        if bit_shift == 0 {
            shifted.extend(self.words.iter().copied());
        } else {
            let mut carry = Mask64::all_off();
            for &word in self.words.iter() {
                shifted.push((word << bit_shift) | carry);
                carry = word >> (WORD_BITS - bit_shift);
            }
            // Above the last stored word the source is the tail.
            shifted.push(carry | (tail << bit_shift));
        }
        self.words = CowVec::from_vec(shifted);
        self.normalize();
    }
}

impl ShrAssign<u64> for BitArray {
    /// Shifts every bit position down by `amount`, discarding bits shifted
    /// below zero. The tail supplies all content from above; `highest_bits`
    /// is unchanged.
    fn shr_assign(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        let word_shift = (amount / WORD_BITS as u64) as usize;
        let bit_shift = (amount % WORD_BITS as u64) as u32;
        let len = self.words.len();
        if word_shift >= len {
            self.words = CowVec::new();
            return;
        }
        let tail = self.tail_word();
        let mut shifted = Vec::with_capacity(len - word_shift);
        if bit_shift == 0 {
            shifted.extend(self.words.as_slice()[word_shift..].iter().copied());
        } else {
            for index in word_shift..len {
                let low = self.words[index] >> bit_shift;
                let high = if index + 1 < len {
                    self.words[index + 1]
                } else {
                    tail
                };
                shifted.push(low | (high << (WORD_BITS - bit_shift)));
            }
        }
        self.words = CowVec::from_vec(shifted);
        self.normalize();
    }
}

impl Shl<u64> for &BitArray {
    type Output = BitArray;

    fn shl(self, amount: u64) -> BitArray {
        let mut result = self.clone();
        result <<= amount;
        result
    }
}

impl Shr<u64> for &BitArray {
    type Output = BitArray;

    fn shr(self, amount: u64) -> BitArray {
        let mut result = self.clone();
        result >>= amount;
        result
    }
}

impl PartialOrd for BitArray {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BitArray {
    /// Orders arrays like unsigned integers of unbounded width: an all-on
    /// tail dominates, then stored words compare most-significant first.
    fn cmp(&self, other: &Self) -> Ordering {
        match self.highest_bits.cmp(&other.highest_bits) {
            Ordering::Equal => {}
            ord => return ord,
        }
        let count = self.words.len().max(other.words.len());
        for index in (0..count).rev() {
            match self.word_or_tail(index).cmp(&other.word_or_tail(index)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for BitArray {
    /// Hex rendering, most significant stored word first; a `..f` prefix
    /// marks an all-on tail. Diagnostic only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        if self.highest_bits {
            f.write_str("..f")?;
            first = false;
        }
        for word in self.words.iter().rev() {
            if !first {
                f.write_char('_')?;
            }
            write!(f, "{word}")?;
            first = false;
        }
        if first {
            f.write_str("0")?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitArray({self})")
    }
}
