//! Shared-structure base sequences for the rewriting engine.
//!
//! A sequence is a rope: a concatenation tree over immutable byte leaves
//! drawn from the four-symbol alphabet `{I, C, F, P}`. Ropes share subtrees
//! freely, so prepending a replacement onto a multi-megabase tail is O(1)
//! in the tail. [`Cursor`] streams bases off a rope without materializing
//! it; [`Rna`] is the seven-base command word emitted as a rewriting side
//! effect.

use thiserror::Error;

pub mod cursor;
pub mod rna;
pub mod rope;

pub use cursor::Cursor;
pub use rna::Rna;
pub use rope::Seq;

/// A byte outside the `{I, C, F, P}` alphabet in caller-supplied input.
///
/// This is an input error, not a control-flow signal: sequences built from
/// validated bytes stay closed under every engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("corrupt base {byte:#04x} at offset {offset}")]
pub struct CorruptBase {
    pub byte: u8,
    pub offset: usize,
}

/// True for the four legal base bytes.
#[inline]
pub fn is_base(byte: u8) -> bool {
    matches!(byte, b'I' | b'C' | b'F' | b'P')
}

/// Validate a byte slice against the base alphabet.
pub fn validate(bytes: &[u8]) -> Result<(), CorruptBase> {
    match bytes.iter().position(|b| !is_base(*b)) {
        None => Ok(()),
        Some(offset) => Err(CorruptBase {
            byte: bytes[offset],
            offset,
        }),
    }
}
