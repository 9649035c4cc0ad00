//! Cross-cutting round-trip and boundary-case properties, exercised
//! through the public `encode`/`decode` pair only.

use std::borrow::Cow;

use tagcodec::{decode, decode_with, encode, DecodeError, DecodeOptions, OrderedMap, SymbolTable, Value};

fn no_symbols() -> Vec<String> {
    Vec::new()
}

fn round_trip(value: &Value<'_>, symbols: &SymbolTable<'_>) -> Value<'static> {
    let encoded = encode(value, symbols).unwrap();
    decode(&encoded, symbols).unwrap().into_owned()
}

#[test]
fn every_scalar_and_container_shape_round_trips() {
    let symbols = vec!["id".to_string(), "tags".to_string()];
    let table = SymbolTable::new(&symbols);

    let mut map = OrderedMap::with_capacity(1);
    map.insert("id".to_string(), Value::Int(42));

    let mut set = tagcodec::Set::default();
    set.insert(Value::Int(1));
    set.insert(Value::Int(2));

    let values = vec![
        Value::Null,
        Value::Bool(true),
        Value::Bool(false),
        Value::Int(i64::MIN),
        Value::Int(i64::MAX),
        Value::from(0.0_f64),
        Value::from(-1.5_f64),
        Value::str("hello"),
        Value::bytes(Cow::Borrowed(&b"opaque"[..])),
        Value::Timestamp(tagcodec::Timestamp::from_millis(1_700_000_000_123)),
        Value::List(vec![Value::Int(1), Value::Int(2)]),
        Value::Tuple(vec![Value::Int(1), Value::Int(2)]),
        Value::Set(set),
        Value::Map(map),
        Value::Ext(9, Cow::Borrowed(&b"payload"[..])),
    ];

    for value in values {
        assert_eq!(round_trip(&value, &table), value.into_owned());
    }
}

#[test]
fn integer_exactness_across_the_signed_64_bit_range() {
    let symbols = no_symbols();
    let table = SymbolTable::new(&symbols);
    let samples = [
        0,
        1,
        -1,
        i64::MIN,
        i64::MAX,
        i64::MIN + 1,
        i64::MAX - 1,
        -(1 << 32),
        1 << 32,
    ];
    for n in samples {
        let encoded = encode(&Value::Int(n), &table).unwrap();
        assert_eq!(decode(&encoded, &table).unwrap(), Value::Int(n));
    }
}

#[test]
fn float_bit_patterns_round_trip_exactly_including_nan_and_infinities() {
    let symbols = no_symbols();
    let table = SymbolTable::new(&symbols);
    let samples: &[f64] = &[
        0.0,
        -0.0,
        1.0,
        -1.5,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NAN,
        f64::MIN_POSITIVE,
    ];
    for &d in samples {
        let encoded = encode(&Value::from(d), &table).unwrap();
        assert_eq!(&encoded[1..], &d.to_be_bytes());
        match decode(&encoded, &table).unwrap() {
            Value::Float(f) => assert_eq!(f.into_inner().to_bits(), d.to_bits()),
            other => panic!("expected Float, got {other:?}"),
        }
    }
}

#[test]
fn empty_containers_round_trip() {
    let symbols = no_symbols();
    let table = SymbolTable::new(&symbols);
    for value in [
        Value::List(vec![]),
        Value::Tuple(vec![]),
        Value::Set(Default::default()),
        Value::Map(Default::default()),
    ] {
        assert_eq!(round_trip(&value, &table), value.into_owned());
    }
}

#[test]
fn string_lengths_at_and_past_a_varint_byte_boundary_round_trip() {
    let symbols = no_symbols();
    let table = SymbolTable::new(&symbols);
    for len in [0, 1, 126, 127, 128, 129] {
        let s = "a".repeat(len);
        let value = Value::str(s.clone());
        let encoded = encode(&value, &table).unwrap();
        assert_eq!(decode(&encoded, &table).unwrap(), Value::str(s));
    }
}

#[test]
fn nesting_exactly_at_the_depth_limit_succeeds_one_past_fails() {
    let symbols = no_symbols();
    let table = SymbolTable::new(&symbols);

    let mut value = Value::Int(0);
    for _ in 0..5 {
        value = Value::List(vec![value]);
    }
    let encoded = encode(&value, &table).unwrap();

    let at_limit = DecodeOptions::new().with_max_depth(5);
    assert!(decode_with(&encoded, &table, &at_limit).is_ok());

    let one_under = DecodeOptions::new().with_max_depth(4);
    assert_eq!(
        decode_with(&encoded, &table, &one_under),
        Err(DecodeError::DepthExceeded { limit: 4 })
    );
}

#[test]
fn symbol_index_zero_and_just_out_of_range() {
    let symbols = vec!["only".to_string()];
    let table = SymbolTable::new(&symbols);

    // SYMREF index 0 resolves.
    assert_eq!(decode(&[0x08, 0x00], &table).unwrap(), Value::str("only"));

    // SYMREF index 1 is one past the single-entry table.
    assert_eq!(
        decode(&[0x08, 0x01], &table),
        Err(DecodeError::SymbolIndexOutOfRange { index: 1, len: 1 })
    );
}

#[test]
fn symbol_compaction_cost_is_independent_of_key_length() {
    let symbols = vec!["x".to_string(), "a-rather-long-symbol-table-entry".to_string()];
    let table = SymbolTable::new(&symbols);

    let short = encode(&Value::str("x"), &table).unwrap();
    let long = encode(&Value::str("a-rather-long-symbol-table-entry"), &table).unwrap();

    // tag byte + varint(index); index 0 and index 1 both fit in one byte.
    assert_eq!(short.len(), 2);
    assert_eq!(long.len(), 2);
}

#[test]
fn maximum_size_varint_round_trips() {
    let symbols = no_symbols();
    let table = SymbolTable::new(&symbols);
    // ZigZag(i64::MIN) == u64::MAX, the one value whose varint needs the
    // full 10 bytes.
    let encoded = encode(&Value::Int(i64::MIN), &table).unwrap();
    assert_eq!(encoded.len(), 1 + 10);
    assert_eq!(decode(&encoded, &table).unwrap(), Value::Int(i64::MIN));
}

#[test]
fn zero_copy_bytes_observe_mutation_of_the_input_buffer() {
    let symbols = no_symbols();
    let table = SymbolTable::new(&symbols);
    let value = Value::bytes(Cow::Borrowed(&b"before"[..]));
    let mut encoded = encode(&value, &table).unwrap();

    let options = DecodeOptions::new().with_zero_copy(true);
    let decoded = decode_with(&encoded, &table, &options).unwrap();
    let Value::Bytes(Cow::Borrowed(slice)) = decoded else {
        panic!("expected borrowed bytes");
    };
    assert_eq!(slice, b"before");

    let len = encoded.len();
    encoded[len - 6..].copy_from_slice(b"after!");
    assert_eq!(slice, b"after!");
}

#[test]
fn map_key_not_in_symbol_table_fails_to_encode() {
    let symbols = no_symbols();
    let table = SymbolTable::new(&symbols);
    let mut map = OrderedMap::with_capacity(1);
    map.insert("missing".to_string(), Value::Int(1));
    assert!(encode(&Value::Map(map), &table).is_err());
}

#[test]
fn truncated_input_fails_at_every_read_site() {
    let symbols = vec!["k".to_string()];
    let table = SymbolTable::new(&symbols);

    // mid-varint
    assert_eq!(decode(&[0x03, 0x80], &table), Err(DecodeError::Truncated));
    // mid-float
    assert_eq!(decode(&[0x04, 0x00, 0x00], &table), Err(DecodeError::Truncated));
    // mid-string payload
    assert_eq!(decode(&[0x05, 0x05, b'h', b'i'], &table), Err(DecodeError::Truncated));
    // mid-bytes payload
    assert_eq!(decode(&[0x09, 0x05, 0x01], &table), Err(DecodeError::Truncated));
    // mid-ext payload
    assert_eq!(decode(&[0x0B, 0x01, 0x05, 0x01], &table), Err(DecodeError::Truncated));
}
