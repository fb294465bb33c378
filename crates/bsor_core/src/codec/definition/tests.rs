use super::*;
use crate::codec::shape::{Field, IntWidth, WellKnownShape};

fn node_fields() -> Vec<Field> {
	vec![
		Field::new("value", 1, Shape::Int(IntWidth::W32)),
		Field::new("next", 2, Shape::optional(Shape::Struct(node()))),
	]
}

fn node() -> StructRef {
	StructRef::lazy("Node", node_fields)
}

fn account() -> Shape {
	Shape::Struct(StructRef::new(
		"Account",
		vec![
			Field::new("owner", 1, Shape::string()),
			Field::new("key", 2, Shape::WellKnown(WellKnownShape::new("PubKey", Some(33)))),
			Field::new("head", 3, Shape::Struct(node())),
			Field::new("tags", 4, Shape::array(Shape::string())),
			Field::new("digest", 5, Shape::fixed_array(Shape::Uint(IntWidth::W8), 32)),
		],
	))
}

#[test]
fn struct_definitions_include_reachable_structs() {
	let defs = build_definitions(&[account()]).expect("build");
	let names: Vec<_> = defs.iter().map(|definition| definition.name.as_str()).collect();
	assert_eq!(names, vec!["Account", "Node"]);

	let Some(Definition {
		body: DefinitionBody::Struct { fields },
		..
	}) = defs.get("Account")
	else {
		panic!("expected struct definition");
	};
	let types: Vec<_> = fields.iter().map(|field| field.descriptor.to_string()).collect();
	assert_eq!(types, vec!["string", "PubKey", "Node", "[]string", "binary(32)"]);
}

#[test]
fn self_reference_terminates() {
	let defs = build_definitions(&[Shape::Struct(node())]).expect("build");
	assert_eq!(defs.len(), 1);

	let Some(Definition {
		body: DefinitionBody::Struct { fields },
		..
	}) = defs.get("Node")
	else {
		panic!("expected struct definition");
	};
	assert_eq!(
		fields[1].descriptor,
		TypeDescriptor::Optional {
			pointee: Box::new(TypeDescriptor::Struct { name: "Node".into() })
		}
	);
}

#[test]
fn base_definitions_describe_scalars() {
	let defs = build_definitions(&[Shape::array(Shape::Int(IntWidth::W16)), Shape::Float64]).expect("build");
	let Some(Definition {
		body: DefinitionBody::Base { descriptor },
		..
	}) = defs.get("[]int16")
	else {
		panic!("expected base definition");
	};
	assert_eq!(
		descriptor,
		&TypeDescriptor::Array {
			elem: Box::new(TypeDescriptor::Scalar {
				base: ScalarKind::Int,
				size: 2
			}),
			fixed: false,
			size: 0,
		}
	);
	assert!(defs.get("float64").is_some());
}

#[test]
fn invalid_ids_fail_the_build() {
	let bad = Shape::Struct(StructRef::new(
		"Bad",
		vec![Field::new("a", 1, Shape::Bool), Field::new("b", 1, Shape::Bool)],
	));
	assert!(matches!(build_definitions(&[bad]), Err(BsorError::DuplicateFieldId { id: 1, .. })));
}

#[test]
fn failed_add_leaves_no_partial_entries() {
	let bad = Shape::Struct(StructRef::new(
		"Bad",
		vec![Field::new("a", 1, Shape::Bool), Field::new("b", 1, Shape::Bool)],
	));
	let mut defs = build_definitions(&[Shape::Struct(node())]).expect("build");
	for _ in 0..2 {
		assert!(matches!(defs.add(&bad), Err(BsorError::DuplicateFieldId { id: 1, .. })));
	}
	assert!(defs.get("Bad").is_none());
	assert_eq!(defs.len(), 1);

	let wrapper = Shape::Struct(StructRef::new(
		"Wrapper",
		vec![Field::new("ok", 1, Shape::string()), Field::new("bad", 2, Shape::optional(bad))],
	));
	assert!(defs.add(&wrapper).is_err());
	assert!(defs.get("Wrapper").is_none());
	assert_eq!(defs.to_string(), "struct Node\n  1  value  int32\n  2  next   *Node\n");
}

#[test]
fn display_aligns_columns() {
	let defs = build_definitions(&[Shape::Struct(node())]).expect("build");
	assert_eq!(defs.to_string(), "struct Node\n  1  value  int32\n  2  next   *Node\n");
}

#[test]
fn json_output_is_tagged() {
	let defs = build_definitions(&[Shape::Struct(node())]).expect("build");
	let json = serde_json::to_value(&defs).expect("json");
	assert_eq!(json[0]["name"], "Node");
	assert_eq!(json[0]["kind"], "struct");
	assert_eq!(json[0]["fields"][0]["type"]["kind"], "scalar");
	assert_eq!(json[0]["fields"][0]["type"]["base"], "int");
	assert_eq!(json[0]["fields"][1]["type"]["pointee"]["name"], "Node");
}

#[test]
fn registry_caches_definitions() {
	let registry = DefinitionRegistry::new();
	let first = registry.definition(&account()).expect("account");
	assert_eq!(first.name, "Account");
	assert_eq!(registry.snapshot().len(), 2);

	let again = registry.definition(&Shape::Struct(node())).expect("node");
	assert_eq!(again.name, "Node");
	assert_eq!(registry.snapshot().len(), 2);
}

#[test]
fn registry_leaves_cache_untouched_on_failure() {
	let registry = DefinitionRegistry::new();
	let bad = Shape::Struct(StructRef::new("Bad", vec![Field::new("zero", 0, Shape::Bool)]));
	assert!(matches!(registry.definition(&bad), Err(BsorError::InvalidFieldId { .. })));
	assert!(registry.snapshot().is_empty());
}

#[test]
fn global_registry_is_shared() {
	let a = global_definitions() as *const DefinitionRegistry;
	let b = global_definitions() as *const DefinitionRegistry;
	assert_eq!(a, b);
}
