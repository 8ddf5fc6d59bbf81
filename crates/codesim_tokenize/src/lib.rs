//! codesim_tokenize: the tokenization boundary of the codesim engine.
//!
//! This crate defines the input contract the rest of the engine consumes:
//! a [`File`] with caller-supplied stable identity, and a [`TokenizedFile`]
//! carrying an ordered token stream plus a parallel token-index → source
//! [`Region`] mapping. Language-aware tokenization is explicitly out of
//! scope; the bundled [`tokenize`] splitter is a deterministic,
//! grammar-free default so the engine runs end to end without an external
//! tokenizer.
//!
//! For a fixed input, [`tokenize`] always produces the same token stream and
//! mapping on any machine.

mod file;
mod region;
mod tokenizer;

pub use file::{File, TokenizedFile};
pub use region::Region;
pub use tokenizer::tokenize;

use thiserror::Error;

/// Errors produced at the tokenization boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// `tokens` and `mapping` must have the same length.
    #[error("token/mapping length mismatch: {tokens} tokens vs {mapping} regions")]
    MappingLengthMismatch { tokens: usize, mapping: usize },

    /// Content contains a control byte that cannot belong to source text.
    #[error("binary content at byte offset {offset}")]
    BinaryContent { offset: usize },
}
