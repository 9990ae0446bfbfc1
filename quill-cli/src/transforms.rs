//! CLI-specific transforms
//!
//! `quill inspect` shows the token stream the renderer consumes. Each
//! transform is a stage + format combination:
//!
//! - `tokens-simple`: one token kind per line, indented by nesting
//! - `tokens-json`: the full token records as pretty JSON
//!
//! Example: `quill inspect post.md tokens-json`

use quill_babel::ir::token::to_simple_listing;
use quill_babel::Pipeline;

/// All available CLI transforms (stage + format combinations)
pub const AVAILABLE_TRANSFORMS: &[&str] = &["tokens-simple", "tokens-json"];

pub const DEFAULT_TRANSFORM: &str = "tokens-simple";

/// Execute a named transform on markdown source.
///
/// Tables are normalized first when the pipeline is configured to, so the
/// listing matches what `convert` renders.
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    pipeline: &Pipeline,
) -> Result<String, String> {
    let tokens = pipeline.tokenize(source);
    match transform_name {
        "tokens-simple" => Ok(to_simple_listing(&tokens)),
        "tokens-json" => serde_json::to_string_pretty(&tokens)
            .map(|json| format!("{json}\n"))
            .map_err(|e| format!("JSON serialization failed: {e}")),
        other => Err(format!(
            "Unknown transform '{other}'. Available: {}",
            AVAILABLE_TRANSFORMS.join(", ")
        )),
    }
}
