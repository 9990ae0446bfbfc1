//! HTML format implementation
//!
//! Two directions live here:
//! - [`renderer`]: token stream → HTML text (the markdown → HTML path)
//! - [`parser`]: HTML text → DOM tree, read by the markdown serializer
//!
//! # Library Choice
//!
//! HTML is parsed with `html5ever` into a `markup5ever_rcdom` tree. html5ever
//! implements the WHATWG parsing algorithm, so whatever an editor or a browser
//! produced (unclosed tags, stray end tags, `<br>` without a slash) yields the
//! same tree a browser would build.
//!
//! # Rendered Markup
//!
//! Extended constructs render to fixed markup that the serializer recognizes
//! again:
//!
//! | Construct         | Element                                   | Attributes                              |
//! |-------------------|-------------------------------------------|-----------------------------------------|
//! | Math block        | `div.math-block`                          | `data-config` kind=math, variant=block  |
//! | Math inline       | `span.math-inline`                        | `data-config` kind=math, variant=inline |
//! | Admonition        | `div.admonition.admonition-<type>`        | `data-config` kind=admonition           |
//! | Admonition title  | `p.admonition-title`                      |                                         |
//! | Table             | `div.table-wrapper > table`               | cell `style="text-align: ..."`          |
//! | Task item         | `li.task-list-item > input[type=checkbox]`| `disabled`, `checked`                   |
//! | Footnote ref      | `sup.footnote-ref > a`                    | `data-config` kind=footnote             |
//! | Footnote block    | `hr.footnotes-sep`, `section.footnotes`   | items `li.footnote-item`                |
//!
//! Math content is the raw LaTeX wrapped in its delimiters and HTML-escaped,
//! so `$$ a < b $$` is readable even without a math renderer on the page.

pub mod parser;
pub mod renderer;

pub use renderer::{render, RenderOptions};
