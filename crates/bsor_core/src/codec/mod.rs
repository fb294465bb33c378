mod bytes;
mod cursor;
mod decode;
mod definition;
mod encode;
mod error;
mod number;
mod schema;
mod script;
mod shape;
mod typeexpr;
/// Static-type bridge and the helpers used by the declaration macros.
pub mod typed;
mod value;

/// Decoding entry points and options.
pub use decode::{DecodeOptions, decode, decode_with};
/// Definition catalogue types, builder, and registry.
pub use definition::{
	Definition, DefinitionBody, DefinitionRegistry, Definitions, FieldDefinition, ScalarKind, TypeDescriptor, build_definitions,
	global_definitions,
};
/// Encoding entry points and options.
pub use encode::{EncodeOptions, encode, encode_with};
/// Error and result aliases.
pub use error::{BsorError, Result};
/// Script number conversions.
pub use number::{MAX_NUMBER_LEN, decode_number, decode_unsigned, encode_number, encode_unsigned, number_bytes};
/// Schema documents and their resolved form.
pub use schema::{FieldDoc, Schema, SchemaDoc, StructDoc, WellKnownDoc};
/// Script items, opcodes, and byte-form conversion.
pub use script::{
	OP_0, OP_1, OP_1NEGATE, OP_2, OP_16, OP_FALSE, OP_PUSH_MAX_DIRECT, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4, OP_TRUE, ScriptItem,
	opcode_name, parse_script, parse_script_hex, render_asm, to_bytes, to_hex, write_item,
};
/// Shape description types.
pub use shape::{Field, FieldIndex, IntWidth, Shape, StructRef, WellKnownShape, validate_fields};
/// Typed conversion traits and entry points.
pub use typed::{Bsor, WellKnownBinary, definitions_for, from_script, from_script_prefix, to_script};
/// Type expression parsing.
pub use typeexpr::{parse_scalar_expr, parse_type_expr};
/// Runtime value types.
pub use value::{FieldValue, StructValue, Value};
