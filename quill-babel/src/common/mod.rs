//! Format-agnostic helpers shared by the tokenizer, renderer and serializer

pub mod admonition;
pub mod codec;
pub mod fence;
pub mod tables;
