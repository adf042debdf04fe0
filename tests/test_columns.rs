use colpress::{
    AttributeType, BitVectorColumn, ColumnError, CompressedColumn, DeltaColumn, DictionaryColumn,
    RawValue, RunLengthColumn,
};

fn bitvec() -> BitVectorColumn<i64> {
    BitVectorColumn::new("bv", AttributeType::Int)
}

fn delta() -> DeltaColumn<i64> {
    DeltaColumn::new("dl", AttributeType::Int)
}

fn dict() -> DictionaryColumn<i64> {
    DictionaryColumn::new("dc", AttributeType::Int)
}

fn rle() -> RunLengthColumn<i64> {
    RunLengthColumn::new("rl", AttributeType::Int)
}

const SAMPLE: [i64; 8] = [3, 3, -1, 7, 7, 7, 0, 3];

/// The full logical column contract, exercised identically against every
/// encoder.
fn contract_suite<C: CompressedColumn<i64>>(mut col: C) {
    assert!(col.is_empty());
    assert!(matches!(
        col.get(0),
        Err(ColumnError::IndexOutOfRange { tid: 0, len: 0 })
    ));

    // Append-then-read.
    for (i, v) in SAMPLE.iter().enumerate() {
        col.insert(*v).unwrap();
        assert_eq!(col.get(i).unwrap(), *v);
        assert_eq!(col.len(), i + 1);
    }
    assert_eq!(col.materialize().unwrap(), SAMPLE.to_vec());

    // Update preserves length and all other rows.
    let mut expected = SAMPLE.to_vec();
    col.update(4, 9).unwrap();
    expected[4] = 9;
    assert_eq!(col.len(), expected.len());
    assert_eq!(col.materialize().unwrap(), expected);
    assert!(col.update(expected.len(), 1).is_err());

    // Remove shifts later rows down.
    col.remove(2).unwrap();
    expected.remove(2);
    assert_eq!(col.len(), expected.len());
    assert_eq!(col.materialize().unwrap(), expected);
    assert!(col.remove(expected.len()).is_err());

    // Bulk variants over ascending position sets.
    col.update_many(&[0, 3], &42).unwrap();
    expected[0] = 42;
    expected[3] = 42;
    assert_eq!(col.materialize().unwrap(), expected);
    col.remove_many(&[1, 2, 5]).unwrap();
    expected.remove(5);
    expected.remove(2);
    expected.remove(1);
    assert_eq!(col.materialize().unwrap(), expected);

    // Deep copy shares nothing with the original.
    let copy = col.copy();
    col.update(0, -99).unwrap();
    assert_eq!(copy.materialize().unwrap(), expected);
    assert_ne!(copy.get(0).unwrap(), col.get(0).unwrap());

    // Type-erased boundary.
    col.insert_raw(RawValue::new(11_i64)).unwrap();
    assert_eq!(col.get(col.len() - 1).unwrap(), 11);
    let err = col.insert_raw(RawValue::new("nope")).unwrap_err();
    assert!(matches!(err, ColumnError::TypeMismatch { .. }));
    col.update_raw(0, RawValue::new(8_i64)).unwrap();
    assert_eq!(col.get(0).unwrap(), 8);

    col.clear();
    assert!(col.is_empty());
    assert_eq!(col.len(), 0);
}

#[test]
fn bitvec_contract() {
    contract_suite(bitvec());
}

#[test]
fn delta_contract() {
    contract_suite(delta());
}

#[test]
fn dict_contract() {
    contract_suite(dict());
}

#[test]
fn rle_contract() {
    contract_suite(rle());
}

#[test]
fn bitvec_scenario() {
    // [A, B, A, C, B] with A=1, B=2, C=3.
    let mut col = bitvec();
    for v in [1, 2, 1, 3, 2] {
        col.insert(v).unwrap();
    }
    assert_eq!(col.len(), 5);
    assert_eq!(col.get(2).unwrap(), 1);
    col.remove(0).unwrap();
    assert_eq!(col.len(), 4);
    assert_eq!(col.get(0).unwrap(), 2);
}

#[test]
fn rle_scenario() {
    let mut col = rle();
    for v in [10, 10, 10, 20, 20, 10] {
        col.insert(v).unwrap();
    }
    assert_eq!(col.len(), 6);
    let runs: Vec<(usize, i64)> = col.runs().iter().map(|r| (r.len, r.value)).collect();
    assert_eq!(runs, vec![(3, 10), (2, 20), (1, 10)]);
}

#[test]
fn rle_stays_maximal_under_mutation() {
    let mut col = rle();
    for v in [1, 1, 2, 2, 3, 3, 2] {
        col.insert(v).unwrap();
    }
    col.update(4, 2).unwrap();
    col.remove(5).unwrap();
    col.update(0, 1).unwrap();
    for pair in col.runs().windows(2) {
        assert_ne!(pair[0].value, pair[1].value);
    }
    assert!(col.runs().iter().all(|r| r.len >= 1));
}

#[test]
fn delta_update_scenario() {
    let mut col = delta();
    for v in [10, 20, 30] {
        col.insert(v).unwrap();
    }
    col.update(1, 25).unwrap();
    assert_eq!(col.materialize().unwrap(), vec![10, 25, 30]);
}

#[test]
fn size_in_bytes_grows_with_entries() {
    let mut col = dict();
    let empty = col.size_in_bytes();
    for v in 0..100 {
        col.insert(v).unwrap();
    }
    let full = col.size_in_bytes();
    assert!(full > empty);

    let mut bv = bitvec();
    let empty = bv.size_in_bytes();
    for v in 0..100 {
        bv.insert(v % 5).unwrap();
    }
    assert!(bv.size_in_bytes() > empty);
}

#[test]
fn update_never_changes_size() {
    let mut col = rle();
    for v in [1, 1, 1, 2] {
        col.insert(v).unwrap();
    }
    for tid in 0..col.len() {
        col.update(tid, 7).unwrap();
        assert_eq!(col.len(), 4);
    }
}
