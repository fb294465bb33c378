use crate::codec::script::{OP_FALSE, OP_TRUE, ScriptItem};
use crate::codec::{BsorError, Result};

/// Bounded cursor over a decoded script item sequence.
pub struct ItemCursor<'a> {
	items: &'a [ScriptItem],
	pos: usize,
}

impl<'a> ItemCursor<'a> {
	/// Create a cursor at item 0.
	pub fn new(items: &'a [ScriptItem]) -> Self {
		Self { items, pos: 0 }
	}

	/// Return current item index.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return the number of unread items.
	pub fn remaining(&self) -> usize {
		self.items.len().saturating_sub(self.pos)
	}

	/// Return unread items without consuming them.
	pub fn rest(&self) -> &'a [ScriptItem] {
		&self.items[self.pos.min(self.items.len())..]
	}

	/// Read the next item.
	pub fn next_item(&mut self, expected: &'static str) -> Result<&'a ScriptItem> {
		let Some(item) = self.items.get(self.pos) else {
			return Err(BsorError::StreamTruncated { at: self.pos, expected });
		};
		self.pos += 1;
		Ok(item)
	}

	/// Read a push-data payload. `OP_0` is accepted as an empty push.
	pub fn read_push(&mut self, expected: &'static str) -> Result<&'a [u8]> {
		let at = self.pos;
		match self.next_item(expected)? {
			ScriptItem::PushData(bytes) => Ok(bytes.as_slice()),
			ScriptItem::Opcode(OP_FALSE) => Ok(&[]),
			ScriptItem::Opcode(op) => Err(BsorError::malformed(at, format!("expected {expected} push data, got opcode 0x{op:02x}"))),
		}
	}

	/// Read a boolean opcode.
	pub fn read_bool(&mut self) -> Result<bool> {
		let at = self.pos;
		match self.next_item("bool")? {
			ScriptItem::Opcode(OP_TRUE) => Ok(true),
			ScriptItem::Opcode(OP_FALSE) => Ok(false),
			ScriptItem::PushData(bytes) if bytes.is_empty() => Ok(false),
			other => Err(BsorError::malformed(at, format!("expected bool opcode, got {other}"))),
		}
	}

	/// Read a signed script number.
	pub fn read_number(&mut self) -> Result<i64> {
		let at = self.pos;
		let item = self.next_item("number")?;
		crate::codec::number::decode_number(item).map_err(|err| reposition(err, at))
	}

	/// Read an unsigned script number.
	pub fn read_unsigned(&mut self) -> Result<u64> {
		let at = self.pos;
		let item = self.next_item("number")?;
		crate::codec::number::decode_unsigned(item).map_err(|err| reposition(err, at))
	}
}

fn reposition(err: BsorError, at: usize) -> BsorError {
	match err {
		BsorError::MalformedValue { reason, .. } => BsorError::MalformedValue { at, reason },
		other => other,
	}
}
