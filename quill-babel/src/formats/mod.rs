//! Format implementations
//!
//! This module contains the two formats the pipeline converts between. The
//! markdown side owns the tokenizer and the comrak-based serializer; the HTML
//! side owns the renderer and the html5ever parser.

pub mod html;
pub mod markdown;

pub use html::{RenderOptions, render};
pub use markdown::serializer::SerializeOptions;
pub use markdown::tokenize;
