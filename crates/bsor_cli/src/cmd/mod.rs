/// Raw script disassembly command.
pub mod asm;
/// Script decode command.
pub mod decode;
/// Schema definitions command.
pub mod defs;
/// Value encode command.
pub mod encode;
/// Shape-guided JSON conversion.
pub mod json;
/// Script number command.
pub mod number;
/// Decoded value tree printer.
pub mod print;
mod util;
