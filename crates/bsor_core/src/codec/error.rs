use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, BsorError>;

/// Errors produced while building definitions, encoding, and decoding BSOR scripts.
#[derive(Debug, Error)]
pub enum BsorError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Schema document or value JSON could not be parsed.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Hex input could not be parsed.
	#[error("invalid hex: {0}")]
	Hex(#[from] hex::FromHexError),
	/// Field identifier is missing (zero) in a struct schema.
	#[error("invalid field id for {struct_name}.{field}: identifiers must be non-zero")]
	InvalidFieldId {
		/// Struct type name.
		struct_name: String,
		/// Offending field name.
		field: String,
	},
	/// Two fields of one struct schema share an identifier.
	#[error("duplicate field id {id} in {struct_name}: {first} and {second}")]
	DuplicateFieldId {
		/// Struct type name.
		struct_name: String,
		/// Shared identifier.
		id: u64,
		/// First field declaring the identifier.
		first: String,
		/// Second field declaring the identifier.
		second: String,
	},
	/// Runtime value does not fit its declared shape.
	#[error("value conversion: expected {expected}, got {got}")]
	ValueConversion {
		/// Expected shape description.
		expected: String,
		/// Actual value kind or detail.
		got: String,
	},
	/// Fewer script items remained than the shape requires.
	#[error("stream truncated at item {at}: expected {expected}")]
	StreamTruncated {
		/// Item index where the read was attempted.
		at: usize,
		/// Kind of item that was expected.
		expected: &'static str,
	},
	/// A script item had an unexpected kind, length, or content.
	#[error("malformed value at item {at}: {reason}")]
	MalformedValue {
		/// Item index of the offending script item.
		at: usize,
		/// Human-readable description.
		reason: String,
	},
	/// Decoded identifier is not declared by the target struct schema.
	#[error("unknown field identifier {id} for {struct_name}")]
	UnknownFieldIdentifier {
		/// Struct type name.
		struct_name: String,
		/// Identifier read from the stream.
		id: u64,
	},
	/// Raw script bytes could not be split into items.
	#[error("malformed script at byte {at}: {reason}")]
	MalformedScript {
		/// Byte offset of the offending opcode.
		at: usize,
		/// Human-readable description.
		reason: &'static str,
	},
	/// Push payload is longer than the widest length prefix can express.
	#[error("push of {len} bytes exceeds the 4-byte length prefix")]
	PushTooLarge {
		/// Payload length in bytes.
		len: usize,
	},
	/// Recursion depth exceeded configured limit.
	#[error("depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Decoded collection count exceeded configured limit.
	#[error("collection too large: count={count}, max={max}")]
	CollectionTooLarge {
		/// Requested element count.
		count: u64,
		/// Maximum permitted element count.
		max: usize,
	},
	/// Struct reference has no resolved field list.
	#[error("struct {name} is declared but never resolved")]
	UnresolvedStruct {
		/// Struct type name.
		name: String,
	},
	/// Type expression names a type that is not declared.
	#[error("unknown type: {name}")]
	UnknownType {
		/// Unresolved type name.
		name: String,
	},
	/// Schema document declares one type name twice.
	#[error("duplicate type name: {name}")]
	DuplicateTypeName {
		/// Repeated type name.
		name: String,
	},
	/// Type expression syntax is invalid.
	#[error("invalid type expression: {expr}")]
	InvalidTypeExpr {
		/// Original type expression text.
		expr: String,
	},
}

impl BsorError {
	/// Shorthand for [`BsorError::ValueConversion`].
	pub fn conversion(expected: impl Into<String>, got: impl Into<String>) -> Self {
		Self::ValueConversion {
			expected: expected.into(),
			got: got.into(),
		}
	}

	/// Shorthand for [`BsorError::MalformedValue`].
	pub fn malformed(at: usize, reason: impl Into<String>) -> Self {
		Self::MalformedValue { at, reason: reason.into() }
	}
}
