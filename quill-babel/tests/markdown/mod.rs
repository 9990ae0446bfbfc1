//! Markdown format tests
//!
//! Tokenizer output for the extended dialect and HTML → Markdown serialization.

mod serialize;
mod tokenize;
