use super::{Field, FieldIndex, IntWidth, Shape, StructRef, validate_fields};
use crate::codec::BsorError;

fn node_fields() -> Vec<Field> {
	vec![
		Field::new("label", 1, Shape::string()),
		Field::new("next", 2, Shape::optional(Shape::Struct(StructRef::lazy("Node", node_fields)))),
	]
}

#[test]
fn type_names_render_expressions() {
	assert_eq!(Shape::Int(IntWidth::W32).type_name(), "int32");
	assert_eq!(Shape::array(Shape::string()).type_name(), "[]string");
	assert_eq!(Shape::fixed_array(Shape::optional(Shape::Bool), 4).type_name(), "[4]*bool");
	assert_eq!(Shape::String { fixed: Some(3) }.type_name(), "string(3)");
	assert_eq!(Shape::Struct(StructRef::lazy("Node", node_fields)).type_name(), "Node");
}

#[test]
fn byte_collections_collapse_into_binary() {
	assert!(matches!(Shape::array(Shape::Uint(IntWidth::W8)), Shape::Binary { fixed: None }));
	assert!(matches!(Shape::fixed_array(Shape::Uint(IntWidth::W8), 32), Shape::Binary { fixed: Some(32) }));
	assert!(matches!(Shape::array(Shape::Int(IntWidth::W8)), Shape::Array { .. }));
}

#[test]
fn identity_follows_the_field_source_not_the_name() {
	let first = StructRef::new("Item", vec![Field::new("x", 1, Shape::Bool)]);
	let second = StructRef::new("Item", vec![Field::new("x", 1, Shape::Bool)]);
	assert_ne!(first.identity(), second.identity());
	assert_eq!(first.identity(), first.clone().identity());
	assert_eq!(StructRef::lazy("Node", node_fields).identity(), StructRef::lazy("Node", node_fields).identity());
}

#[test]
fn lazy_struct_can_reference_itself() {
	let node = StructRef::lazy("Node", node_fields);
	let fields = node.fields().expect("fields resolve");
	assert_eq!(fields.len(), 2);
	let Shape::Optional(inner) = &fields[1].shape else {
		panic!("expected optional next field");
	};
	assert_eq!(inner.type_name(), "Node");
}

#[test]
fn placeholder_resolves_once() {
	let item = StructRef::placeholder("Late");
	let err = item.fields().expect_err("unresolved");
	assert!(matches!(err, BsorError::UnresolvedStruct { .. }), "unexpected error: {err}");

	assert!(item.resolve(vec![Field::new("a", 1, Shape::Bool)]));
	assert!(!item.resolve(Vec::new()));
	assert_eq!(item.clone().fields().expect("resolved").len(), 1);
}

#[test]
fn zero_identifier_is_rejected() {
	let err = validate_fields("Bad", &[Field::new("a", 0, Shape::Bool)]).expect_err("zero id");
	assert!(matches!(err, BsorError::InvalidFieldId { ref field, .. } if field == "a"), "unexpected error: {err}");
}

#[test]
fn duplicate_identifier_is_rejected() {
	let item = StructRef::new("Dup", vec![Field::new("a", 3, Shape::Bool), Field::new("b", 3, Shape::string())]);
	let err = FieldIndex::build(&item).expect_err("duplicate id");
	assert!(matches!(err, BsorError::DuplicateFieldId { id: 3, .. }), "unexpected error: {err}");
}

#[test]
fn index_maps_identifiers_to_positions() {
	let item = StructRef::new("Pair", vec![Field::new("a", 9, Shape::Bool), Field::new("b", 2, Shape::string())]);
	let index = FieldIndex::build(&item).expect("index builds");
	let (pos, field) = index.get(2).expect("id 2 exists");
	assert_eq!(pos, 1);
	assert_eq!(field.name.as_ref(), "b");
	assert!(index.get(1).is_none());
}
