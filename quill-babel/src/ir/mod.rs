//! Intermediate representation: the flat token stream.
//!
//! The tokenizer produces a flat sequence of block tokens in document order.
//! Nested structure is expressed with matching open/close pairs, and inline
//! content lives in the `children` of `inline` tokens. The renderer and the
//! classifier both consume this stream; nothing else depends on how it was
//! produced.

pub mod token;

pub use token::{Nesting, Token, TokenKind, TokenMeta};
