//! JSON schema documents resolved into shapes.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::definition::{Definitions, build_definitions};
use crate::codec::shape::{Field, Shape, StructRef, validate_fields};
use crate::codec::typeexpr::{parse_scalar_expr, parse_type_expr, well_known};
use crate::codec::{BsorError, Result};

/// Serialized schema document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SchemaDoc {
	/// Struct declarations.
	#[serde(default)]
	pub structs: Vec<StructDoc>,
	/// Opaque types carrying their own binary form.
	#[serde(default)]
	pub well_known: Vec<WellKnownDoc>,
}

/// One struct declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StructDoc {
	/// Struct type name.
	pub name: String,
	/// Fields in declaration order.
	#[serde(default)]
	pub fields: Vec<FieldDoc>,
}

/// One field declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldDoc {
	/// Field name.
	pub name: String,
	/// Non-zero field identifier. Required unless the field is skipped.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<u64>,
	/// Field type expression.
	#[serde(rename = "type")]
	pub type_expr: String,
	/// Excluded from the wire form and the catalogue.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub skip: bool,
}

/// One well-known binary declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WellKnownDoc {
	/// Type name.
	pub name: String,
	/// Exact encoded length, if fixed.
	#[serde(default)]
	pub size: Option<usize>,
}

/// Resolved schema: named shapes ready for encoding and decoding.
///
/// Struct shapes of a self-referential document form reference cycles and are never freed.
#[derive(Debug, Clone, Default)]
pub struct Schema {
	types: HashMap<String, Shape>,
	structs: Vec<String>,
}

impl Schema {
	/// Parse and resolve a JSON schema document.
	pub fn from_json(text: &str) -> Result<Self> {
		let doc: SchemaDoc = serde_json::from_str(text)?;
		Self::resolve(&doc)
	}

	/// Read, parse, and resolve a schema document file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let text = std::fs::read_to_string(path)?;
		Self::from_json(&text)
	}

	/// Resolve every declaration of `doc`.
	pub fn resolve(doc: &SchemaDoc) -> Result<Self> {
		let mut out = Self::default();

		for item in &doc.well_known {
			out.declare(&item.name, well_known(&item.name, item.size))?;
		}

		let mut pending = Vec::with_capacity(doc.structs.len());
		for item in &doc.structs {
			let placeholder = StructRef::placeholder(&item.name);
			out.declare(&item.name, Shape::Struct(placeholder.clone()))?;
			out.structs.push(item.name.clone());
			pending.push((item, placeholder));
		}

		for (item, placeholder) in pending {
			let mut fields = Vec::with_capacity(item.fields.len());
			for field in item.fields.iter().filter(|field| !field.skip) {
				let shape = out.shape(&field.type_expr)?;
				fields.push(Field::new(&field.name, field.id.unwrap_or(0), shape));
			}
			validate_fields(&item.name, &fields)?;
			placeholder.resolve(fields);
		}

		debug!(structs = out.structs.len(), types = out.types.len(), "bsor schema resolved");
		Ok(out)
	}

	fn declare(&mut self, name: &str, shape: Shape) -> Result<()> {
		if parse_scalar_expr(name).is_ok() || self.types.contains_key(name) {
			return Err(BsorError::DuplicateTypeName { name: name.to_owned() });
		}
		self.types.insert(name.to_owned(), shape);
		Ok(())
	}

	/// Shape for a declared name or any type expression over declared names.
	pub fn shape(&self, expr: &str) -> Result<Shape> {
		parse_type_expr(expr, &|name| self.types.get(name).cloned())
	}

	/// Struct shapes in declaration order.
	pub fn struct_shapes(&self) -> Vec<Shape> {
		self.structs.iter().filter_map(|name| self.types.get(name).cloned()).collect()
	}

	/// Catalogue of every declared struct.
	pub fn definitions(&self) -> Result<Definitions> {
		build_definitions(&self.struct_shapes())
	}
}

#[cfg(test)]
mod tests;
