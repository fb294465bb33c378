//! Encode and decode structured values as Bitcoin-script data items (BSOR).
//!
//! Values are described by a [`codec::Shape`], either declared in Rust with
//! [`bsor_struct!`] or resolved from a JSON [`codec::SchemaDoc`], and travel as a flat
//! sequence of [`codec::ScriptItem`]s.

/// Script items, shapes, values, and the BSOR encoder/decoder.
pub mod codec;
mod macros;
