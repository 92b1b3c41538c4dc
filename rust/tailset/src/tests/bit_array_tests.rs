use tailset_mask::{FixedMask, Mask64};

use crate::BitArray;

#[test]
fn test_literal_constructors() {
    assert!(BitArray::all_off().is_zero());
    assert!(BitArray::all_on().is_all_on());
    assert!(!BitArray::all_on().is_zero());
    assert_eq!(BitArray::all_off(), BitArray::default());

    let single = BitArray::bit(100);
    assert!(single.contains(100));
    assert!(!single.contains(99));
    assert!(!single.contains(101));
    assert_eq!(single.count_ones(), Some(1));

    let run = BitArray::range(60..70);
    assert!(!run.contains(59));
    assert!(run.contains(60));
    assert!(run.contains(69));
    assert!(!run.contains(70));
    assert_eq!(run.count_ones(), Some(10));

    assert_eq!(BitArray::lower_on(8), BitArray::range(0..8));
    assert_eq!(BitArray::from_mask(Mask64::new(0xff)), BitArray::lower_on(8));
}

#[test]
fn test_infinite_tail() {
    let all = BitArray::all_on();
    assert_eq!(all.num_words(), 0);
    assert!(all.highest_bits());
    assert!(all.contains(0));
    assert!(all.contains(1_000_000_000_000));
    // Infinitely many on bits have no finite count.
    assert_eq!(all.count_ones(), None);
    assert_eq!(all.count_zeros(), Some(0));

    let mut except = all.clone();
    except.reset(70);
    assert!(except.contains(0));
    assert!(!except.contains(70));
    assert!(except.contains(1_000_000));
    assert_eq!(except.count_zeros(), Some(1));
    assert_eq!(except.count_ones(), None);
    assert_eq!(except.num_words(), 2);
}

#[test]
fn test_set_then_clear_range() {
    // Turn bits 4-7 on, then bits 2-5 off: only 6 and 7 survive.
    let mut array = BitArray::all_off();
    array.set_range(4..8);
    array.reset_range(2..6);
    assert_eq!(array.count_ones(), Some(2));
    assert!(array.contains(6));
    assert!(array.contains(7));
    assert!(!array.contains(5));
    assert_eq!(array.lowest_on_bit(), Some(6));
    assert_eq!(array.highest_on_bit(), Some(7));
}

#[test]
fn test_canonical_form() {
    let mut array = BitArray::all_off();
    array.set(100);
    assert_eq!(array.num_words(), 2);
    array.reset(100);
    assert_eq!(array.num_words(), 0);
    assert_eq!(array, BitArray::all_off());

    // Same round trip against an all-on tail.
    let mut array = BitArray::all_on();
    array.reset(100);
    array.set(100);
    assert_eq!(array.num_words(), 0);
    assert_eq!(array, BitArray::all_on());

    // A word written explicitly as the tail value trims away.
    let mut array = BitArray::all_off();
    array.set_word(3, Mask64::all_off());
    assert_eq!(array.num_words(), 0);
    array.set_word(3, Mask64::new(0x10));
    assert_eq!(array.num_words(), 4);
    assert_eq!(array.word(3), Mask64::new(0x10));
    assert!(array.contains(196));
}

#[test]
fn test_growth_preserves_tail_bits() {
    // Growing the stored words must not silently change defined tail bits.
    let mut array = BitArray::all_on();
    array.reset(130);
    for pos in [0, 64, 128, 129, 131, 192, 10_000] {
        assert!(array.contains(pos), "bit {pos} should still be on");
    }
    assert!(!array.contains(130));
}

#[test]
fn test_clone_is_value_semantics() {
    let original = BitArray::range(10..20);
    let mut copy = original.clone();
    copy.set(40);
    copy.reset(15);
    assert!(original.contains(15));
    assert!(!original.contains(40));
    assert_eq!(original, BitArray::range(10..20));
}

#[test]
fn test_negate() {
    let mut array = BitArray::range(5..15);
    array.negate();
    assert!(array.highest_bits());
    assert!(!array.contains(5));
    assert!(array.contains(4));
    assert!(array.contains(1_000_000));
    array.negate();
    assert_eq!(array, BitArray::range(5..15));

    assert_eq!(!&BitArray::all_off(), BitArray::all_on());
    assert_eq!(!&(!&BitArray::bit(7)), BitArray::bit(7));
}

#[test]
fn test_extract_store() {
    let mut array = BitArray::all_off();
    array.store(0xabcd, 60, 16);
    assert_eq!(array.extract(60, 16), 0xabcd);
    assert_eq!(array.extract(64, 8), 0xbc);
    assert_eq!(array.num_words(), 2);
    assert!(array.contains(60)); // 0xabcd has bit 0 set

    // Fields read from the tail.
    assert_eq!(BitArray::all_on().extract(1_000, 8), 0xff);
    assert_eq!(BitArray::all_off().extract(1_000, 8), 0);
    assert_eq!(BitArray::all_on().extract(62, 4), 0xf);

    // Storing the tail pattern leaves the array canonical.
    let mut array = BitArray::all_on();
    array.store(u64::MAX, 64, 64);
    assert_eq!(array.num_words(), 0);
}

#[test]
fn test_has_any_of_has_all_of() {
    let run = BitArray::range(100..200);
    assert!(run.has_any_of(0..101));
    assert!(!run.has_any_of(0..100));
    assert!(run.has_all_of(100..200));
    assert!(!run.has_all_of(100..201));
    assert!(run.has_any_of(199..1_000_000));
    assert!(!run.has_any_of(200..1_000_000));

    // Empty ranges are defined, not errors.
    assert!(!run.has_any_of(5..5));
    assert!(run.has_all_of(5..5));

    // Ranges reaching deep into an all-on tail.
    let except_low = !&BitArray::lower_on(10);
    assert!(except_low.has_all_of(10..100_000));
    assert!(!except_low.has_all_of(9..100_000));
    assert!(BitArray::all_on().has_all_of(0..u64::MAX));
    assert!(!BitArray::all_off().has_any_of(0..u64::MAX));
}

#[test]
fn test_bit_scans() {
    assert_eq!(BitArray::all_off().lowest_on_bit(), None);
    assert_eq!(BitArray::all_off().highest_on_bit(), None);
    assert_eq!(BitArray::all_off().lowest_off_bit(), Some(0));
    assert_eq!(BitArray::all_on().lowest_on_bit(), Some(0));
    assert_eq!(BitArray::all_on().lowest_off_bit(), None);
    // An all-on tail has no highest member.
    assert_eq!(BitArray::all_on().highest_on_bit(), None);
    assert_eq!(BitArray::all_on().highest_off_bit(), None);

    let run = BitArray::range(100..200);
    assert_eq!(run.lowest_on_bit(), Some(100));
    assert_eq!(run.highest_on_bit(), Some(199));
    assert_eq!(run.lowest_off_bit(), Some(0));

    let except = !&run;
    assert_eq!(except.lowest_off_bit(), Some(100));
    assert_eq!(except.highest_off_bit(), Some(199));
    assert_eq!(except.lowest_on_bit(), Some(0));
    assert_eq!(except.highest_on_bit(), None);

    // The first on bit of a trimmed-to-tail suffix sits at num_bits().
    let mut high = BitArray::all_on();
    high.reset_range(0..64);
    assert_eq!(high.num_words(), 1);
    assert_eq!(high.lowest_on_bit(), Some(64));
}

#[test]
fn test_next_higher_different_bit() {
    let run = BitArray::range(4..8);
    assert_eq!(run.next_higher_different_bit(0), 4);
    assert_eq!(run.next_higher_different_bit(4), 8);
    assert_eq!(run.next_higher_different_bit(7), 8);
    assert_eq!(run.next_higher_different_bit(8), 8);
    assert_eq!(run.next_higher_different_bit(1_000), 1_000);

    assert_eq!(BitArray::all_on().next_higher_different_bit(5), 5);

    // The change sits exactly on the stored/tail boundary.
    let mut high = BitArray::all_on();
    high.reset_range(0..64);
    assert_eq!(high.next_higher_different_bit(0), 64);

    // Crossing a word boundary to find the change.
    let wide = BitArray::range(10..100);
    assert_eq!(wide.next_higher_different_bit(10), 100);
    assert_eq!(wide.next_higher_different_bit(63), 100);
}

#[test]
fn test_shift_left() {
    let mut array = BitArray::bit(0);
    array <<= 1;
    assert_eq!(array, BitArray::bit(1));

    let mut array = BitArray::bit(63);
    array <<= 1;
    assert_eq!(array, BitArray::bit(64));

    let mut array = BitArray::bit(60);
    array <<= 70;
    assert_eq!(array, BitArray::bit(130));

    assert_eq!(&BitArray::range(10..20) << 25, BitArray::range(35..45));

    // The all-on tail shifts into itself; vacated low bits are off.
    let mut all = BitArray::all_on();
    all <<= 10;
    assert!(!all.contains(9));
    assert!(all.contains(10));
    assert!(all.highest_bits());
    assert_eq!(all, !&BitArray::lower_on(10));

    let mut unchanged = BitArray::range(3..9);
    unchanged <<= 0;
    assert_eq!(unchanged, BitArray::range(3..9));
}

#[test]
fn test_shift_right() {
    let mut array = BitArray::bit(64);
    array >>= 1;
    assert_eq!(array, BitArray::bit(63));

    assert_eq!(&BitArray::range(10..20) >> 5, BitArray::range(5..15));

    // Bits shifted below zero disappear.
    assert_eq!(&BitArray::range(3..8) >> 5, BitArray::range(0..3));
    assert_eq!(&BitArray::bit(4) >> 5, BitArray::all_off());

    // The tail pours down from above.
    assert!((&(!&BitArray::lower_on(10)) >> 20).is_all_on());
    assert!((&BitArray::all_on() >> 1_000).is_all_on());

    let mut big = BitArray::range(128..256);
    big >>= 128;
    assert_eq!(big, BitArray::range(0..128));
}

#[test]
fn test_has_bits_in_common() {
    assert!(BitArray::range(0..10).has_bits_in_common(&BitArray::range(9..20)));
    assert!(!BitArray::range(0..10).has_bits_in_common(&BitArray::range(10..20)));
    // Two all-on tails always intersect.
    assert!((!&BitArray::lower_on(100)).has_bits_in_common(&!&BitArray::lower_on(1_000_000)));
    assert!(BitArray::all_on().has_bits_in_common(&BitArray::bit(3)));
    assert!(!BitArray::all_on().has_bits_in_common(&BitArray::all_off()));
}

#[test]
fn test_ordering() {
    // The tail is the primary key: any co-finite array outranks any finite one.
    assert!(BitArray::all_on() > BitArray::lower_on(10_000));
    assert!(!&BitArray::lower_on(3) > BitArray::lower_on(10_000));

    assert!(BitArray::range(0..6) > BitArray::range(0..5));
    assert!(BitArray::bit(100) > BitArray::bit(99));
    assert!(BitArray::bit(64) > BitArray::lower_on(64));
    assert_eq!(BitArray::range(3..7).cmp(&BitArray::range(3..7)), std::cmp::Ordering::Equal);
}

#[test]
fn test_output_formats() {
    assert_eq!(BitArray::all_off().to_string(), "0");
    assert_eq!(BitArray::all_on().to_string(), "..f");
    assert_eq!(BitArray::bit(4).to_string(), "0000000000000010");
    assert_eq!(
        (!&BitArray::lower_on(4)).to_string(),
        "..f_fffffffffffffff0"
    );
    assert_eq!(
        BitArray::bit(64).to_string(),
        "0000000000000001_0000000000000000"
    );

    let binary = BitArray::bit(1).to_binary_string();
    assert!(binary.starts_with("..0 "));
    assert!(binary.ends_with("10"));
    assert_eq!(binary.len(), 4 + 64);
    assert_eq!(BitArray::all_on().to_binary_string(), "..1");
}
