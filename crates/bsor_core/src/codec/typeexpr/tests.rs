use super::{parse_scalar_expr, parse_type_expr, well_known};
use crate::codec::shape::{IntWidth, Shape, StructRef};
use crate::codec::BsorError;

fn resolve(name: &str) -> Option<Shape> {
	match name {
		"Item" => Some(Shape::Struct(StructRef::new("Item", Vec::new()))),
		"PublicKey" => Some(well_known("PublicKey", Some(33))),
		_ => None,
	}
}

#[test]
fn scalars_parse() {
	assert!(matches!(parse_scalar_expr("int32").expect("parses"), Shape::Int(IntWidth::W32)));
	assert!(matches!(parse_scalar_expr("uint64").expect("parses"), Shape::Uint(IntWidth::W64)));
	assert!(matches!(parse_scalar_expr(" bool ").expect("parses"), Shape::Bool));
	assert!(matches!(parse_scalar_expr("string(3)").expect("parses"), Shape::String { fixed: Some(3) }));
	assert!(matches!(parse_scalar_expr("binary").expect("parses"), Shape::Binary { fixed: None }));
}

#[test]
fn nested_wrappers_parse() {
	let shape = parse_type_expr("*[]Item", &resolve).expect("parses");
	assert_eq!(shape.type_name(), "*[]Item");

	let shape = parse_type_expr("[2]*string", &resolve).expect("parses");
	assert_eq!(shape.type_name(), "[2]*string");

	let shape = parse_type_expr("[32]byte", &resolve).expect("parses");
	assert!(matches!(shape, Shape::Binary { fixed: Some(32) }));
}

#[test]
fn rendered_names_parse_back() {
	for expr in ["[]*Item", "*PublicKey", "[3]int16", "string(8)", "*binary(4)", "[][]uint32"] {
		let shape = parse_type_expr(expr, &resolve).expect("parses");
		assert_eq!(shape.type_name(), expr);
	}
}

#[test]
fn unknown_names_are_reported() {
	let err = parse_type_expr("[]Missing", &resolve).expect_err("unknown type");
	assert!(matches!(err, BsorError::UnknownType { ref name } if name == "Missing"), "unexpected error: {err}");
}

#[test]
fn malformed_expressions_are_rejected() {
	for expr in ["", "[x]int8", "[3int8", "**bool", "int7", "bool(2)", "string(", "Item(4)"] {
		let err = parse_type_expr(expr, &resolve).expect_err("invalid expression");
		assert!(matches!(err, BsorError::InvalidTypeExpr { .. } | BsorError::UnknownType { .. }), "{expr}: unexpected error: {err}");
	}
}
