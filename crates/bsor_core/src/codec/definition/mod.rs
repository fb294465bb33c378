//! Name-keyed catalogue describing struct and base type layouts.

use std::collections::HashMap;
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use serde::Serialize;
use tracing::debug;

use crate::codec::shape::{Shape, StructRef, validate_fields};
use crate::codec::{BsorError, Result};

/// Base kind of a scalar descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
	/// Boolean.
	Bool,
	/// Signed integer.
	Int,
	/// Unsigned integer.
	Uint,
	/// IEEE-754 float.
	Float,
	/// UTF-8 string.
	String,
	/// Binary blob.
	Binary,
}

/// Resolved description of one field's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
	/// Reference to a struct definition.
	Struct {
		/// Struct type name.
		name: String,
	},
	/// Homogeneous collection.
	Array {
		/// Element descriptor.
		elem: Box<TypeDescriptor>,
		/// Whether the element count is implied by the shape.
		fixed: bool,
		/// Element count when fixed, otherwise 0.
		size: usize,
	},
	/// Nullable wrapper.
	Optional {
		/// Wrapped descriptor.
		pointee: Box<TypeDescriptor>,
	},
	/// Scalar with its byte width (0 for variable-length strings and blobs).
	Scalar {
		/// Base kind.
		base: ScalarKind,
		/// Byte width.
		size: usize,
	},
	/// Self-encoding opaque type.
	WellKnown {
		/// Type name.
		name: String,
		/// Whether the encoded length is fixed.
		fixed: bool,
		/// Encoded length when fixed, otherwise 0.
		size: usize,
	},
}

impl fmt::Display for TypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Struct { name } | Self::WellKnown { name, .. } => f.write_str(name),
			Self::Array { elem, fixed: true, size } => write!(f, "[{size}]{elem}"),
			Self::Array { elem, .. } => write!(f, "[]{elem}"),
			Self::Optional { pointee } => write!(f, "*{pointee}"),
			Self::Scalar { base, size } => match base {
				ScalarKind::Bool => f.write_str("bool"),
				ScalarKind::Int => write!(f, "int{}", size * 8),
				ScalarKind::Uint => write!(f, "uint{}", size * 8),
				ScalarKind::Float => write!(f, "float{}", size * 8),
				ScalarKind::String if *size > 0 => write!(f, "string({size})"),
				ScalarKind::String => f.write_str("string"),
				ScalarKind::Binary if *size > 0 => write!(f, "binary({size})"),
				ScalarKind::Binary => f.write_str("binary"),
			},
		}
	}
}

/// One field row of a struct definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
	/// Field identifier.
	pub id: u64,
	/// Field name.
	pub name: String,
	/// Field type.
	#[serde(rename = "type")]
	pub descriptor: TypeDescriptor,
}

/// Body of a catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefinitionBody {
	/// Struct with identified fields.
	Struct {
		/// Fields in declaration order.
		fields: Vec<FieldDefinition>,
	},
	/// Bare non-struct type.
	Base {
		/// Resolved type.
		descriptor: TypeDescriptor,
	},
}

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
	/// Type name.
	pub name: String,
	/// Entry body.
	#[serde(flatten)]
	pub body: DefinitionBody,
}

/// Ordered, name-keyed catalogue of definitions.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Definitions {
	entries: Vec<Definition>,
	#[serde(skip)]
	by_name: HashMap<String, usize>,
}

/// Build a catalogue covering `shapes` and every struct they reach.
pub fn build_definitions(shapes: &[Shape]) -> Result<Definitions> {
	let mut out = Definitions::default();
	for shape in shapes {
		out.add(shape)?;
	}
	debug!(requested = shapes.len(), definitions = out.len(), "bsor definitions built");
	Ok(out)
}

impl Definitions {
	/// Add `shape` (and reachable structs) to the catalogue.
	///
	/// On error the catalogue is left as it was before the call.
	pub fn add(&mut self, shape: &Shape) -> Result<()> {
		let mark = self.entries.len();
		let result = self.add_shape(shape);
		if result.is_err() {
			for definition in self.entries.drain(mark..) {
				self.by_name.remove(&definition.name);
			}
		}
		result
	}

	fn add_shape(&mut self, shape: &Shape) -> Result<()> {
		if let Shape::Struct(item) = shape {
			return self.define_struct(item);
		}

		let name = shape.type_name();
		if self.by_name.contains_key(&name) {
			return Ok(());
		}
		let descriptor = self.describe(shape)?;
		self.insert(Definition {
			name,
			body: DefinitionBody::Base { descriptor },
		});
		Ok(())
	}

	/// Entry by type name.
	pub fn get(&self, name: &str) -> Option<&Definition> {
		self.by_name.get(name).map(|idx| &self.entries[*idx])
	}

	/// Entries in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &Definition> {
		self.entries.iter()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the catalogue is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn insert(&mut self, definition: Definition) -> usize {
		let idx = self.entries.len();
		self.by_name.insert(definition.name.clone(), idx);
		self.entries.push(definition);
		idx
	}

	fn define_struct(&mut self, item: &StructRef) -> Result<()> {
		if self.by_name.contains_key(item.name()) {
			return Ok(());
		}

		// Registered first so self references terminate.
		let slot = self.insert(Definition {
			name: item.name().to_owned(),
			body: DefinitionBody::Struct { fields: Vec::new() },
		});

		let fields = item.fields()?;
		validate_fields(item.name(), &fields)?;

		let mut rows = Vec::with_capacity(fields.len());
		for field in fields.iter() {
			rows.push(FieldDefinition {
				id: field.id,
				name: field.name.to_string(),
				descriptor: self.describe(&field.shape)?,
			});
		}
		self.entries[slot].body = DefinitionBody::Struct { fields: rows };
		Ok(())
	}

	fn describe(&mut self, shape: &Shape) -> Result<TypeDescriptor> {
		Ok(match shape {
			Shape::Struct(item) => {
				self.define_struct(item)?;
				TypeDescriptor::Struct { name: item.name().to_owned() }
			}
			Shape::Array { elem, fixed } if elem.is_byte() => TypeDescriptor::Scalar {
				base: ScalarKind::Binary,
				size: fixed.unwrap_or(0),
			},
			Shape::Array { elem, fixed } => TypeDescriptor::Array {
				elem: Box::new(self.describe(elem)?),
				fixed: fixed.is_some(),
				size: fixed.unwrap_or(0),
			},
			Shape::Optional(inner) => TypeDescriptor::Optional {
				pointee: Box::new(self.describe(inner)?),
			},
			Shape::WellKnown(item) => TypeDescriptor::WellKnown {
				name: item.name.to_string(),
				fixed: item.fixed.is_some(),
				size: item.fixed.unwrap_or(0),
			},
			Shape::Bool => scalar(ScalarKind::Bool, 1),
			Shape::Int(width) => scalar(ScalarKind::Int, width.bytes()),
			Shape::Uint(width) => scalar(ScalarKind::Uint, width.bytes()),
			Shape::Float32 => scalar(ScalarKind::Float, 4),
			Shape::Float64 => scalar(ScalarKind::Float, 8),
			Shape::String { fixed } => scalar(ScalarKind::String, fixed.unwrap_or(0)),
			Shape::Binary { fixed } => scalar(ScalarKind::Binary, fixed.unwrap_or(0)),
		})
	}
}

fn scalar(base: ScalarKind, size: usize) -> TypeDescriptor {
	TypeDescriptor::Scalar { base, size }
}

impl fmt::Display for Definitions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, definition) in self.entries.iter().enumerate() {
			if idx > 0 {
				writeln!(f)?;
			}
			match &definition.body {
				DefinitionBody::Base {
					descriptor: TypeDescriptor::WellKnown { name, fixed: true, size },
				} => writeln!(f, "type {name} (well-known, {size} bytes)")?,
				DefinitionBody::Base {
					descriptor: TypeDescriptor::WellKnown { name, .. },
				} => writeln!(f, "type {name} (well-known)")?,
				DefinitionBody::Base { descriptor } => writeln!(f, "type {descriptor}")?,
				DefinitionBody::Struct { fields } => {
					writeln!(f, "struct {}", definition.name)?;
					let id_width = fields.iter().map(|field| field.id.to_string().len()).max().unwrap_or(1);
					let name_width = fields.iter().map(|field| field.name.len()).max().unwrap_or(0);
					for field in fields {
						writeln!(f, "  {:>id_width$}  {:<name_width$}  {}", field.id, field.name, field.descriptor)?;
					}
				}
			}
		}
		Ok(())
	}
}

/// Read-mostly definition cache shared across threads.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
	inner: RwLock<Definitions>,
}

impl DefinitionRegistry {
	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Definition for `shape`, building and caching it on first request.
	pub fn definition(&self, shape: &Shape) -> Result<Definition> {
		let name = shape.type_name();
		if let Some(found) = self.inner.read().unwrap_or_else(PoisonError::into_inner).get(&name) {
			return Ok(found.clone());
		}

		let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
		if guard.get(&name).is_none() {
			let mut next = guard.clone();
			next.add(shape)?;
			*guard = next;
		}
		guard.get(&name).cloned().ok_or(BsorError::UnknownType { name })
	}

	/// Copy of every cached definition.
	pub fn snapshot(&self) -> Definitions {
		self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
	}
}

/// Process-wide definition registry.
pub fn global_definitions() -> &'static DefinitionRegistry {
	static REGISTRY: OnceLock<DefinitionRegistry> = OnceLock::new();
	REGISTRY.get_or_init(DefinitionRegistry::new)
}

#[cfg(test)]
mod tests;
