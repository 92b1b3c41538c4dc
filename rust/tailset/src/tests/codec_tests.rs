use crate::{BitArray, ErrorKind, SparseArray};

#[test]
fn test_bit_array_round_trip() {
    let samples = vec![
        BitArray::all_off(),
        BitArray::all_on(),
        BitArray::bit(5),
        BitArray::bit(200),
        BitArray::range(60..70),
        !&BitArray::range(5..15),
        &BitArray::range(0..4) | &BitArray::range(100..130),
    ];
    for original in samples {
        let packed = original.pack_to_vec();
        let restored = BitArray::unpack_from_slice(&packed).expect("unpack");
        assert_eq!(restored, original);
    }
}

#[test]
fn test_sparse_array_round_trip() {
    let samples = vec![
        SparseArray::all_off(),
        SparseArray::all_on(),
        SparseArray::bit(-40),
        SparseArray::from_ranges([-10..-5, 0..4, 50..51]),
        !&SparseArray::from_ranges([3..4, 7..8]),
    ];
    for original in samples {
        let packed = original.pack_to_vec();
        let restored = SparseArray::unpack_from_slice(&packed).expect("unpack");
        assert_eq!(restored, original);
    }
}

#[test]
fn test_bit_array_exact_layout() {
    // One stored word (0x1), tail off: count, word, flag — all little-endian.
    let packed = BitArray::bit(0).pack_to_vec();
    assert_eq!(packed, vec![1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0]);

    // No stored words, tail on.
    assert_eq!(BitArray::all_on().pack_to_vec(), vec![0, 0, 0, 0, 1]);
    assert_eq!(BitArray::all_off().pack_to_vec(), vec![0, 0, 0, 0, 0]);
}

#[test]
fn test_sparse_array_exact_layout() {
    // One subrange [1, 3), not inverse.
    let packed = SparseArray::range(1..3).pack_to_vec();
    assert_eq!(
        packed,
        vec![
            1, 0, 0, 0, // count
            1, 0, 0, 0, 0, 0, 0, 0, // begin
            3, 0, 0, 0, 0, 0, 0, 0, // end
            0, // inverse
        ]
    );

    // Negative bounds are two's-complement i64.
    let packed = SparseArray::range(-1..1).pack_to_vec();
    assert_eq!(
        packed,
        vec![
            1, 0, 0, 0,
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            1, 0, 0, 0, 0, 0, 0, 0,
            0,
        ]
    );

    assert_eq!(SparseArray::all_on().pack_to_vec(), vec![0, 0, 0, 0, 1]);
}

#[test]
fn test_writer_reports_byte_count() {
    let array = BitArray::range(0..130);
    let mut sink = Vec::new();
    let written = array.pack_to_writer(&mut sink).expect("pack");
    assert_eq!(written, sink.len());

    let sparse = SparseArray::from_ranges([0..4, 10..20]);
    let mut sink = Vec::new();
    let written = sparse.pack_to_writer(&mut sink).expect("pack");
    assert_eq!(written, sink.len());
}

#[test]
fn test_truncated_stream_is_an_io_error() {
    let packed = BitArray::range(0..130).pack_to_vec();
    let err = BitArray::unpack_from_slice(&packed[..7]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Io { .. }));

    let err = SparseArray::unpack_from_slice(&[2, 0, 0, 0, 9]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Io { .. }));
}

#[test]
fn test_malformed_subranges_are_rejected() {
    // An "empty" subrange [5, 5) cannot come from the writer.
    let mut bytes = vec![1, 0, 0, 0];
    bytes.extend_from_slice(&5i64.to_le_bytes());
    bytes.extend_from_slice(&5i64.to_le_bytes());
    bytes.push(0);
    let err = SparseArray::unpack_from_slice(&bytes).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));

    // Touching subranges are likewise impossible in canonical form.
    let mut bytes = vec![2, 0, 0, 0];
    bytes.extend_from_slice(&0i64.to_le_bytes());
    bytes.extend_from_slice(&5i64.to_le_bytes());
    bytes.extend_from_slice(&5i64.to_le_bytes());
    bytes.extend_from_slice(&9i64.to_le_bytes());
    bytes.push(0);
    let err = SparseArray::unpack_from_slice(&bytes).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
}

#[test]
fn test_redundant_trailing_words_normalize_on_read() {
    // A foreign stream may carry words equal to the tail; reading it still
    // yields the canonical array and re-packing drops the redundancy.
    let mut bytes = vec![2, 0, 0, 0];
    bytes.extend_from_slice(&0x0fu64.to_le_bytes());
    bytes.extend_from_slice(&0u64.to_le_bytes());
    bytes.push(0);
    let array = BitArray::unpack_from_slice(&bytes).expect("unpack");
    assert_eq!(array, BitArray::lower_on(4));
    assert_eq!(array.num_words(), 1);
    assert_eq!(array.pack_to_vec(), BitArray::lower_on(4).pack_to_vec());
}
