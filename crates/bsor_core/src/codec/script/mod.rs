use std::fmt;

use crate::codec::{BsorError, Result};
use crate::codec::bytes::ScriptReader;

/// Push zero / empty byte vector / boolean false.
pub const OP_0: u8 = 0x00;
/// Alias of [`OP_0`] used for booleans.
pub const OP_FALSE: u8 = OP_0;
/// Largest opcode that is itself a direct push length.
pub const OP_PUSH_MAX_DIRECT: u8 = 0x4b;
/// Push with a one-byte length prefix.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Push with a two-byte little-endian length prefix.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Push with a four-byte little-endian length prefix.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1.
pub const OP_1NEGATE: u8 = 0x4f;
/// Push the number 1.
pub const OP_1: u8 = 0x51;
/// Alias of [`OP_1`] used for booleans.
pub const OP_TRUE: u8 = OP_1;
/// Push the number 2.
pub const OP_2: u8 = 0x52;
/// Push the number 16.
pub const OP_16: u8 = 0x60;

/// Atomic wire unit of an encoded value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScriptItem {
	/// Single-byte opcode.
	Opcode(u8),
	/// Length-prefixed raw byte block.
	PushData(Vec<u8>),
}

impl ScriptItem {
	/// Build a push-data item.
	pub fn push(bytes: impl Into<Vec<u8>>) -> Self {
		Self::PushData(bytes.into())
	}

	/// Boolean opcode.
	pub fn bool(value: bool) -> Self {
		Self::Opcode(if value { OP_TRUE } else { OP_FALSE })
	}

	/// Return the small integer an opcode stands for, if any.
	pub fn small_int(&self) -> Option<i64> {
		match self {
			Self::Opcode(OP_0) => Some(0),
			Self::Opcode(OP_1NEGATE) => Some(-1),
			Self::Opcode(op @ OP_1..=OP_16) => Some(i64::from(op - OP_1) + 1),
			_ => None,
		}
	}

	/// Stable label for diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Opcode(_) => "opcode",
			Self::PushData(_) => "push_data",
		}
	}
}

impl fmt::Display for ScriptItem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Opcode(op) => f.write_str(&opcode_name(*op)),
			Self::PushData(bytes) => write!(f, "0x{}", hex::encode(bytes)),
		}
	}
}

/// Return assembly mnemonic for one opcode byte.
pub fn opcode_name(op: u8) -> String {
	match op {
		OP_0 => "OP_0".to_owned(),
		OP_PUSHDATA1 => "OP_PUSHDATA1".to_owned(),
		OP_PUSHDATA2 => "OP_PUSHDATA2".to_owned(),
		OP_PUSHDATA4 => "OP_PUSHDATA4".to_owned(),
		OP_1NEGATE => "OP_1NEGATE".to_owned(),
		OP_1..=OP_16 => format!("OP_{}", op - OP_1 + 1),
		_ => format!("OP_UNKNOWN_0x{op:02x}"),
	}
}

/// Render items as space-separated assembly text.
pub fn render_asm(items: &[ScriptItem]) -> String {
	items.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

/// Serialize items into raw script bytes.
pub fn to_bytes(items: &[ScriptItem]) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	for item in items {
		write_item(&mut out, item)?;
	}
	Ok(out)
}

/// Append one item's byte form.
pub fn write_item(out: &mut Vec<u8>, item: &ScriptItem) -> Result<()> {
	match item {
		ScriptItem::Opcode(op) => out.push(*op),
		ScriptItem::PushData(bytes) if bytes.is_empty() => out.push(OP_0),
		ScriptItem::PushData(bytes) => {
			write_push_len(out, bytes.len())?;
			out.extend_from_slice(bytes);
		}
	}
	Ok(())
}

fn write_push_len(out: &mut Vec<u8>, len: usize) -> Result<()> {
	if let Ok(short) = u8::try_from(len) {
		if short > OP_PUSH_MAX_DIRECT {
			out.push(OP_PUSHDATA1);
		}
		out.push(short);
	} else if let Ok(medium) = u16::try_from(len) {
		out.push(OP_PUSHDATA2);
		out.extend_from_slice(&medium.to_le_bytes());
	} else {
		let long = u32::try_from(len).map_err(|_| BsorError::PushTooLarge { len })?;
		out.push(OP_PUSHDATA4);
		out.extend_from_slice(&long.to_le_bytes());
	}
	Ok(())
}

/// Split raw script bytes into items.
pub fn parse_script(bytes: &[u8]) -> Result<Vec<ScriptItem>> {
	let mut reader = ScriptReader::new(bytes);
	let mut items = Vec::new();

	while !reader.is_done() {
		let op = reader.next_op()?;
		let len = match op {
			0x01..=OP_PUSH_MAX_DIRECT => usize::from(op),
			OP_PUSHDATA1 => reader.read_len::<1>()?,
			OP_PUSHDATA2 => reader.read_len::<2>()?,
			OP_PUSHDATA4 => reader.read_len::<4>()?,
			_ => {
				items.push(ScriptItem::Opcode(op));
				continue;
			}
		};
		items.push(ScriptItem::PushData(reader.read_payload(len)?.to_vec()));
	}

	Ok(items)
}

/// Parse hex-encoded script bytes. Surrounding whitespace and a `0x` prefix are ignored.
pub fn parse_script_hex(text: &str) -> Result<Vec<ScriptItem>> {
	let trimmed = text.trim();
	let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
	parse_script(&hex::decode(digits)?)
}

/// Hex form of the serialized items.
pub fn to_hex(items: &[ScriptItem]) -> Result<String> {
	Ok(hex::encode(to_bytes(items)?))
}
