use super::{DecodeOptions, decode, decode_with};
use crate::codec::encode::encode;
use crate::codec::number::encode_number;
use crate::codec::script::{OP_0, OP_1, OP_2, OP_FALSE, OP_TRUE, ScriptItem};
use crate::codec::shape::{Field, IntWidth, Shape, StructRef, WellKnownShape};
use crate::codec::value::{StructValue, Value};
use crate::codec::BsorError;

fn pair_shape() -> Shape {
	Shape::Struct(StructRef::new(
		"Pair",
		vec![Field::new("a", 1, Shape::Int(IntWidth::W32)), Field::new("b", 2, Shape::string())],
	))
}

fn pair(a: i64, b: &str) -> Value {
	Value::Struct(StructValue::new("Pair").with(1, "a", Value::Int(a)).with(2, "b", Value::String(b.to_owned())))
}

#[test]
fn struct_fields_are_restored_in_declaration_order() {
	let items = vec![
		ScriptItem::Opcode(OP_2),
		ScriptItem::Opcode(OP_2),
		ScriptItem::push(b"hi".to_vec()),
		ScriptItem::Opcode(OP_1),
		ScriptItem::push(vec![0x64]),
	];
	let (value, rest) = decode(&items, &pair_shape()).expect("decodes");
	assert!(rest.is_empty());
	assert_eq!(value, pair(100, "hi"));
}

#[test]
fn zero_count_restores_zero_fields() {
	let items = vec![ScriptItem::Opcode(OP_0)];
	let (value, _) = decode(&items, &pair_shape()).expect("decodes");
	assert_eq!(value, pair(0, ""));
}

#[test]
fn trailing_items_are_returned() {
	let mut items = encode(&pair(5, "x"), &pair_shape()).expect("encodes");
	items.push(ScriptItem::Opcode(0x6a));
	let (value, rest) = decode(&items, &pair_shape()).expect("decodes");
	assert_eq!(value, pair(5, "x"));
	assert_eq!(rest, &[ScriptItem::Opcode(0x6a)]);
}

#[test]
fn fixed_and_variable_optional_collections_decode() {
	let fixed = Shape::fixed_array(Shape::optional(Shape::string()), 2);
	let items = vec![ScriptItem::Opcode(OP_FALSE), ScriptItem::Opcode(OP_TRUE), ScriptItem::push(b"x".to_vec())];
	let (value, rest) = decode(&items, &fixed).expect("decodes");
	assert!(rest.is_empty());
	assert_eq!(value, Value::Array(vec![Value::Null, Value::String("x".to_owned())]));

	let variable = Shape::array(Shape::optional(Shape::string()));
	let mut items = items;
	items.insert(0, ScriptItem::Opcode(OP_2));
	let (decoded, rest) = decode(&items, &variable).expect("decodes");
	assert!(rest.is_empty());
	assert_eq!(decoded, value);
}

#[test]
fn unknown_identifier_is_not_skipped() {
	let items = vec![ScriptItem::Opcode(OP_1), encode_number(9), ScriptItem::Opcode(OP_TRUE)];
	let err = decode(&items, &pair_shape()).expect_err("unknown id");
	assert!(matches!(err, BsorError::UnknownFieldIdentifier { id: 9, .. }), "unexpected error: {err}");
}

#[test]
fn duplicate_schema_identifier_fails_decode() {
	let shape = Shape::Struct(StructRef::new("Dup", vec![Field::new("a", 4, Shape::Bool), Field::new("b", 4, Shape::string())]));
	let err = decode(&[ScriptItem::Opcode(OP_0)], &shape).expect_err("duplicate id");
	assert!(matches!(err, BsorError::DuplicateFieldId { id: 4, .. }), "unexpected error: {err}");
}

#[test]
fn repeated_stream_identifier_is_malformed() {
	let items = vec![
		ScriptItem::Opcode(OP_2),
		ScriptItem::Opcode(OP_1),
		ScriptItem::Opcode(OP_1),
		ScriptItem::Opcode(OP_1),
		ScriptItem::Opcode(OP_2),
	];
	let err = decode(&items, &pair_shape()).expect_err("repeated id");
	assert!(matches!(err, BsorError::MalformedValue { at: 3, .. }), "unexpected error: {err}");
}

#[test]
fn non_minimal_counts_and_identifiers_are_malformed() {
	let items = vec![ScriptItem::push(vec![0x01]), ScriptItem::Opcode(OP_1), ScriptItem::Opcode(0x55)];
	let err = decode(&items, &pair_shape()).expect_err("padded count");
	assert!(matches!(err, BsorError::MalformedValue { at: 0, .. }), "unexpected error: {err}");

	let items = vec![ScriptItem::Opcode(OP_1), ScriptItem::push(vec![0x01, 0x00]), ScriptItem::Opcode(0x55)];
	let err = decode(&items, &pair_shape()).expect_err("padded id");
	assert!(matches!(err, BsorError::MalformedValue { at: 1, .. }), "unexpected error: {err}");

	let items = vec![ScriptItem::Opcode(OP_1), ScriptItem::Opcode(OP_1), ScriptItem::push(vec![0x05])];
	let err = decode(&items, &pair_shape()).expect_err("push for a small value");
	assert!(matches!(err, BsorError::MalformedValue { at: 2, .. }), "unexpected error: {err}");
}

#[test]
fn missing_items_report_truncation() {
	let items = vec![ScriptItem::Opcode(OP_2), ScriptItem::Opcode(OP_1)];
	let err = decode(&items, &pair_shape()).expect_err("truncated");
	assert!(matches!(err, BsorError::StreamTruncated { at: 2, .. }), "unexpected error: {err}");

	let err = decode(&[], &Shape::Bool).expect_err("empty stream");
	assert!(matches!(err, BsorError::StreamTruncated { at: 0, .. }), "unexpected error: {err}");
}

#[test]
fn float_with_wrong_width_is_malformed() {
	let err = decode(&[ScriptItem::push(vec![0; 3])], &Shape::Float32).expect_err("3-byte float");
	assert!(matches!(err, BsorError::MalformedValue { at: 0, .. }), "unexpected error: {err}");

	let err = decode(&[ScriptItem::push(vec![0; 4])], &Shape::Float64).expect_err("4-byte double");
	assert!(matches!(err, BsorError::MalformedValue { .. }), "unexpected error: {err}");
}

#[test]
fn wrong_item_kind_is_malformed() {
	let err = decode(&[ScriptItem::push(vec![1])], &Shape::Bool).expect_err("push is not a bool");
	assert!(matches!(err, BsorError::MalformedValue { .. }), "unexpected error: {err}");

	let err = decode(&[ScriptItem::Opcode(OP_1)], &Shape::string()).expect_err("opcode is not a string");
	assert!(matches!(err, BsorError::MalformedValue { .. }), "unexpected error: {err}");

	let err = decode(&[ScriptItem::push(vec![0xff, 0xfe])], &Shape::string()).expect_err("invalid utf-8");
	assert!(matches!(err, BsorError::MalformedValue { .. }), "unexpected error: {err}");
}

#[test]
fn integer_width_is_checked() {
	let err = decode(&[encode_number(200)], &Shape::Int(IntWidth::W8)).expect_err("does not fit int8");
	assert!(matches!(err, BsorError::MalformedValue { .. }), "unexpected error: {err}");

	let (value, _) = decode(&[encode_number(200)], &Shape::Uint(IntWidth::W8)).expect("fits uint8");
	assert_eq!(value, Value::Uint(200));
}

#[test]
fn empty_push_opcode_reads_as_empty_string() {
	let shape = Shape::array(Shape::string());
	let (value, _) = decode(&[ScriptItem::Opcode(OP_1), ScriptItem::Opcode(OP_0)], &shape).expect("decodes");
	assert_eq!(value, Value::Array(vec![Value::String(String::new())]));
}

#[test]
fn well_known_size_is_checked() {
	let shape = Shape::WellKnown(WellKnownShape::new("Key", Some(2)));
	let (value, _) = decode(&[ScriptItem::push(vec![1, 2])], &shape).expect("decodes");
	assert_eq!(value, Value::Bytes(vec![1, 2]));

	let err = decode(&[ScriptItem::push(vec![1])], &shape).expect_err("short key");
	assert!(matches!(err, BsorError::MalformedValue { .. }), "unexpected error: {err}");
}

#[test]
fn collection_limit_is_enforced() {
	let shape = Shape::array(Shape::Bool);
	let opt = DecodeOptions {
		max_collection_len: 2,
		..DecodeOptions::default()
	};
	let err = decode_with(&[encode_number(3)], &shape, &opt).expect_err("too many elements");
	assert!(matches!(err, BsorError::CollectionTooLarge { count: 3, max: 2 }), "unexpected error: {err}");
}

#[test]
fn depth_limit_is_enforced() {
	let shape = Shape::array(Shape::array(Shape::array(Shape::Bool)));
	let items = vec![ScriptItem::Opcode(OP_1), ScriptItem::Opcode(OP_1), ScriptItem::Opcode(OP_1), ScriptItem::Opcode(OP_TRUE)];
	let opt = DecodeOptions {
		max_depth: 3,
		..DecodeOptions::untrusted()
	};
	let err = decode_with(&items, &shape, &opt).expect_err("too deep");
	assert!(matches!(err, BsorError::DepthExceeded { max_depth: 3 }), "unexpected error: {err}");
}
