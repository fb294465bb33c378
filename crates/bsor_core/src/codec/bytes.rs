use crate::codec::{BsorError, Result};

/// Reader over raw script bytes. Errors point at the opcode currently being parsed.
pub struct ScriptReader<'a> {
	bytes: &'a [u8],
	pos: usize,
	op_start: usize,
}

impl<'a> ScriptReader<'a> {
	/// Reader positioned before the first opcode.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0, op_start: 0 }
	}

	/// Whether every byte has been consumed.
	pub fn is_done(&self) -> bool {
		self.pos >= self.bytes.len()
	}

	/// Read the next opcode byte and mark it as the error location for its operands.
	pub fn next_op(&mut self) -> Result<u8> {
		self.op_start = self.pos;
		Ok(self.take(1, "missing opcode")?[0])
	}

	/// Read a little-endian length operand of `N` bytes.
	pub fn read_len<const N: usize>(&mut self) -> Result<usize> {
		let raw = self.take(N, "push length extends past end of script")?;
		let mut wide = [0_u8; 8];
		wide[..N].copy_from_slice(raw);
		usize::try_from(u64::from_le_bytes(wide)).map_err(|_| self.fail("push length does not fit in memory"))
	}

	/// Read a push payload of `len` bytes.
	pub fn read_payload(&mut self, len: usize) -> Result<&'a [u8]> {
		self.take(len, "push data extends past end of script")
	}

	fn take(&mut self, n: usize, reason: &'static str) -> Result<&'a [u8]> {
		let end = self.pos.checked_add(n).filter(|end| *end <= self.bytes.len()).ok_or_else(|| self.fail(reason))?;
		let out = &self.bytes[self.pos..end];
		self.pos = end;
		Ok(out)
	}

	fn fail(&self, reason: &'static str) -> BsorError {
		BsorError::MalformedScript { at: self.op_start, reason }
	}
}
