use super::*;
use crate::codec::value::{StructValue, Value};
use crate::codec::{decode, encode};

const DOC: &str = r#"{
	"well_known": [{ "name": "PubKey", "size": 33 }],
	"structs": [
		{
			"name": "Order",
			"fields": [
				{ "name": "id", "id": 1, "type": "uint64" },
				{ "name": "buyer", "id": 2, "type": "PubKey" },
				{ "name": "lines", "id": 3, "type": "[]Line" },
				{ "name": "note", "id": 4, "type": "*string" }
			]
		},
		{
			"name": "Line",
			"fields": [
				{ "name": "sku", "id": 1, "type": "string(4)" },
				{ "name": "qty", "id": 2, "type": "int32" },
				{ "name": "parent", "id": 3, "type": "*Line" }
			]
		}
	]
}"#;

#[test]
fn forward_and_self_references_resolve() {
	let schema = Schema::from_json(DOC).expect("schema");
	let Shape::Struct(order) = schema.shape("Order").expect("Order") else {
		panic!("expected struct");
	};
	let fields = order.fields().expect("fields");
	assert_eq!(fields[2].shape.type_name(), "[]Line");
	assert_eq!(fields[1].shape.type_name(), "PubKey");

	let Shape::Struct(line) = schema.shape("Line").expect("Line") else {
		panic!("expected struct");
	};
	assert_eq!(line.fields().expect("fields")[2].shape.type_name(), "*Line");
}

#[test]
fn expressions_over_declared_names() {
	let schema = Schema::from_json(DOC).expect("schema");
	assert_eq!(schema.shape("[2]*Line").expect("expr").type_name(), "[2]*Line");
	assert_eq!(schema.shape("bool").expect("scalar").type_name(), "bool");
	assert!(matches!(schema.shape("Missing"), Err(BsorError::UnknownType { name }) if name == "Missing"));
}

#[test]
fn resolved_shapes_drive_the_codec() {
	let schema = Schema::from_json(DOC).expect("schema");
	let shape = schema.shape("Line").expect("Line");
	let value = Value::Struct(
		StructValue::new("Line")
			.with(1, "sku", Value::String("AB12".into()))
			.with(2, "qty", Value::Int(-3))
			.with(3, "parent", Value::Null),
	);
	let items = encode(&value, &shape).expect("encode");
	let (back, rest) = decode(&items, &shape).expect("decode");
	assert!(rest.is_empty());
	assert_eq!(back, value);
}

#[test]
fn definitions_follow_declaration_order() {
	let schema = Schema::from_json(DOC).expect("schema");
	let defs = schema.definitions().expect("definitions");
	let names: Vec<_> = defs.iter().map(|definition| definition.name.as_str()).collect();
	assert_eq!(names, vec!["Order", "Line"]);
	assert_eq!(schema.struct_shapes().len(), 2);
}

#[test]
fn unknown_field_type_is_reported() {
	let doc = r#"{ "structs": [{ "name": "A", "fields": [{ "name": "b", "id": 1, "type": "B" }] }] }"#;
	assert!(matches!(Schema::from_json(doc), Err(BsorError::UnknownType { name }) if name == "B"));
}

#[test]
fn invalid_ids_are_rejected() {
	let zero = r#"{ "structs": [{ "name": "A", "fields": [{ "name": "b", "id": 0, "type": "bool" }] }] }"#;
	assert!(matches!(Schema::from_json(zero), Err(BsorError::InvalidFieldId { .. })));

	let dup = r#"{ "structs": [{ "name": "A", "fields": [
		{ "name": "b", "id": 1, "type": "bool" },
		{ "name": "c", "id": 1, "type": "bool" }
	] }] }"#;
	assert!(matches!(Schema::from_json(dup), Err(BsorError::DuplicateFieldId { id: 1, .. })));

	let missing = r#"{ "structs": [{ "name": "A", "fields": [{ "name": "b", "type": "bool" }] }] }"#;
	assert!(matches!(Schema::from_json(missing), Err(BsorError::InvalidFieldId { field, .. }) if field == "b"));
}

#[test]
fn skipped_fields_stay_off_the_wire() {
	let doc = r#"{ "structs": [{ "name": "Session", "fields": [
		{ "name": "user", "id": 1, "type": "string" },
		{ "name": "cache", "type": "[]string", "skip": true },
		{ "name": "handle", "id": 1, "type": "Unresolvable", "skip": true },
		{ "name": "ttl", "id": 2, "type": "uint32" }
	] }] }"#;
	let schema = Schema::from_json(doc).expect("schema");
	let Shape::Struct(session) = schema.shape("Session").expect("Session") else {
		panic!("expected struct");
	};
	let names: Vec<_> = session.fields().expect("fields").iter().map(|field| (field.name.to_string(), field.id)).collect();
	assert_eq!(names, vec![("user".to_owned(), 1), ("ttl".to_owned(), 2)]);

	let defs = schema.definitions().expect("definitions");
	assert!(!defs.to_string().contains("cache"));

	let value = Value::Struct(StructValue::new("Session").with(1, "user", Value::String("u".into())));
	let items = encode(&value, &schema.shape("Session").expect("Session")).expect("encode");
	assert_eq!(items.len(), 3);
}

#[test]
fn duplicate_and_builtin_names_are_rejected() {
	let twice = r#"{ "structs": [{ "name": "A" }, { "name": "A" }] }"#;
	assert!(matches!(Schema::from_json(twice), Err(BsorError::DuplicateTypeName { name }) if name == "A"));

	let builtin = r#"{ "well_known": [{ "name": "int32" }] }"#;
	assert!(matches!(Schema::from_json(builtin), Err(BsorError::DuplicateTypeName { .. })));
}

#[test]
fn malformed_json_is_a_json_error() {
	assert!(matches!(Schema::from_json("{"), Err(BsorError::Json(_))));
}

#[test]
fn load_reads_files() {
	let schema = Schema::load(bsor_testkit::fixture_path("contract.json")).expect("load fixture");
	assert_eq!(schema.struct_shapes().len(), 3);

	let dir = bsor_testkit::scratch_dir("schema-load");
	assert!(matches!(Schema::load(dir.join("missing.json")), Err(BsorError::Io(_))));
}
