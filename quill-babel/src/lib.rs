//! Extended-markdown content pipeline
//!
//!     This crate converts article bodies between an extended markdown dialect and HTML, and
//!     tells the two apart when the stored text carries no format tag.
//!
//!     TLDR:
//!         - Markdown → HTML goes through our own tokenizer (./formats/markdown) into a flat token
//!           stream (./ir), which the renderer (./formats/html/renderer.rs) turns into HTML text.
//!         - HTML → Markdown parses the HTML with html5ever and builds a comrak AST, which comrak
//!           formats. We never write a markdown printer by hand.
//!         - Pipe tables separated by blank lines are repaired before tokenizing (./common/tables.rs).
//!         - Failures never lose content: the convenience functions log and return the input.
//!
//! Architecture
//!
//!     The dialect is CommonMark plus GFM tables, task lists and strikethrough, plus `$`/`$$` math,
//!     `:::` admonition containers, definition lists and footnotes. These extensions produce HTML
//!     that is tagged (classes and a `data-config` attribute, see ./common/codec.rs) so the
//!     serializer can recognize them and write the original syntax back.
//!
//!     This is a pure lib: no code here assumes a shell environment, be it stdout, env vars or the
//!     file system. The quill-cli crate wraps it.
//!
//!     The file structure :
//!     .
//!     ├── classify.rs             # Markdown or HTML?
//!     ├── error.rs
//!     ├── format.rs               # ContentFormat
//!     ├── pipeline.rs             # Pipeline, options and the never-fail wrappers
//!     ├── formats
//!     │   ├── html
//!     │   │   ├── parser.rs       # html5ever DOM helpers
//!     │   │   └── renderer.rs     # tokens → HTML
//!     │   └── markdown
//!     │       ├── block.rs        # block tokenizer
//!     │       ├── inline.rs       # inline tokenizer
//!     │       ├── footnote.rs     # footnote numbering
//!     │       └── serializer.rs   # HTML → comrak AST → markdown
//!     ├── ir                      # Token stream
//!     └── common                  # Tables, fences, admonition kinds, data-config codec
//!
//! Testing
//!     tests
//!     ├── markdown                # tokenizer and serializer
//!     ├── html                    # renderer
//!     └── pipeline                # round trips, classification, fallbacks
//!
//!     Note that rust does not by default discover tests in subdirectories, so they are included
//!     from tests/lib.rs.
//!
//! Round Tripping
//!
//!     HTML → markdown → HTML preserves structure for everything the dialect can express. The
//!     lossy cases are listed in ./formats/markdown/mod.rs.
//!
pub mod classify;
pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod ir;
pub mod pipeline;

pub use common::admonition::AdmonitionKind;
pub use error::ConvertError;
pub use format::ContentFormat;
pub use formats::{RenderOptions, SerializeOptions};
pub use ir::{Token, TokenKind};
pub use pipeline::{Pipeline, PipelineOptions};

/// Decide whether `text` is markdown or HTML.
///
/// Blank and plain text are HTML. See [`classify`] for the rules.
pub fn classify_format(text: &str) -> ContentFormat {
    classify::classify(text)
}

/// Render markdown to HTML with default options.
///
/// Never fails: on an internal error the markdown is returned unchanged.
pub fn markdown_to_html(markdown: &str) -> String {
    Pipeline::default().markdown_to_html(markdown)
}

/// Serialize HTML to markdown with default options.
///
/// Never fails: on an internal error the HTML is returned unchanged.
pub fn html_to_markdown(html: &str) -> String {
    Pipeline::default().html_to_markdown(html)
}

/// Join pipe-table rows separated by blank lines. Text inside fenced code is
/// left alone.
pub fn normalize_tables(text: &str) -> String {
    common::tables::normalize_tables(text)
}
