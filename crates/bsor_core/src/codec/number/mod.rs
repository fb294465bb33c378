//! Minimal-width script numbers.
//!
//! Values `0..=16` and `-1` use their dedicated opcodes. Everything else is a push of the
//! little-endian magnitude with the sign carried in the top bit of the last byte; a padding
//! byte is appended when the magnitude already occupies that bit. Only that form decodes.

use crate::codec::script::{OP_0, OP_1, OP_1NEGATE, ScriptItem};
use crate::codec::{BsorError, Result};

/// Longest push accepted as a number (`u64::MAX` needs nine bytes).
pub const MAX_NUMBER_LEN: usize = 9;

/// Encode a signed integer as a script item.
pub fn encode_number(value: i64) -> ScriptItem {
	encode_wide(i128::from(value))
}

/// Encode an unsigned integer as a script item.
pub fn encode_unsigned(value: u64) -> ScriptItem {
	encode_wide(i128::from(value))
}

/// Decode a script item as a signed integer.
pub fn decode_number(item: &ScriptItem) -> Result<i64> {
	let value = decode_wide(item)?;
	i64::try_from(value).map_err(|_| BsorError::malformed(0, format!("number {value} out of range for int64")))
}

/// Decode a script item as an unsigned integer.
pub fn decode_unsigned(item: &ScriptItem) -> Result<u64> {
	let value = decode_wide(item)?;
	u64::try_from(value).map_err(|_| BsorError::malformed(0, format!("number {value} out of range for uint64")))
}

/// Minimal sign-magnitude bytes for `value`. Zero is the empty vector.
pub fn number_bytes(value: i128) -> Vec<u8> {
	let negative = value < 0;
	let mut magnitude = value.unsigned_abs();
	let mut out = Vec::with_capacity(MAX_NUMBER_LEN);
	while magnitude > 0 {
		out.push((magnitude & 0xff) as u8);
		magnitude >>= 8;
	}

	let Some(last) = out.last_mut() else {
		return out;
	};
	if *last & 0x80 != 0 {
		out.push(if negative { 0x80 } else { 0x00 });
	} else if negative {
		*last |= 0x80;
	}
	out
}

fn encode_wide(value: i128) -> ScriptItem {
	match value {
		0 => ScriptItem::Opcode(OP_0),
		-1 => ScriptItem::Opcode(OP_1NEGATE),
		1..=16 => ScriptItem::Opcode(OP_1 + (value - 1) as u8),
		_ => ScriptItem::PushData(number_bytes(value)),
	}
}

fn decode_wide(item: &ScriptItem) -> Result<i128> {
	if let Some(value) = item.small_int() {
		return Ok(i128::from(value));
	}

	match item {
		ScriptItem::PushData(bytes) if bytes.len() <= MAX_NUMBER_LEN => {
			let value = number_from_bytes(bytes);
			if encode_wide(value) != *item {
				return Err(BsorError::malformed(0, format!("non-minimal encoding of number {value}")));
			}
			Ok(value)
		}
		ScriptItem::PushData(bytes) => Err(BsorError::malformed(0, format!("number push of {} bytes exceeds {MAX_NUMBER_LEN}", bytes.len()))),
		ScriptItem::Opcode(op) => Err(BsorError::malformed(0, format!("opcode 0x{op:02x} is not a number"))),
	}
}

fn number_from_bytes(bytes: &[u8]) -> i128 {
	let Some((&last, body)) = bytes.split_last() else {
		return 0;
	};

	let mut magnitude = 0_u128;
	for (idx, byte) in body.iter().enumerate() {
		magnitude |= u128::from(*byte) << (8 * idx);
	}
	magnitude |= u128::from(last & 0x7f) << (8 * body.len());

	let value = magnitude as i128;
	if last & 0x80 != 0 { -value } else { value }
}
