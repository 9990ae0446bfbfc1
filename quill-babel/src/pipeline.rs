//! The conversion pipeline
//!
//! [`Pipeline`] bundles the options for both directions and is the single
//! entry point the free functions in the crate root delegate to. It holds no
//! mutable state, so one value can be shared across threads.
//!
//! The infallible methods never lose content: when rendering or serializing
//! fails, including by panicking, the error is logged and the input is
//! returned unchanged.

use crate::classify;
use crate::common::tables;
use crate::error::ConvertError;
use crate::format::ContentFormat;
use crate::formats::html::renderer::{render, RenderOptions};
use crate::formats::markdown::serializer::{serialize, SerializeOptions};
use crate::formats::markdown::tokenize;
use crate::ir::Token;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Options for both conversion directions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub render: RenderOptions,
    pub serialize: SerializeOptions,
}

/// An immutable, explicitly configured conversion pipeline.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Pipeline { options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn classify(&self, text: &str) -> ContentFormat {
        classify::classify(text)
    }

    pub fn normalize_tables(&self, text: &str) -> String {
        tables::normalize_tables(text)
    }

    /// Tokenize markdown, normalizing tables first when configured to.
    pub fn tokenize(&self, markdown: &str) -> Vec<Token> {
        if self.options.render.normalize_tables {
            tokenize(&tables::normalize_tables(markdown))
        } else {
            tokenize(markdown)
        }
    }

    pub fn try_markdown_to_html(&self, markdown: &str) -> Result<String, ConvertError> {
        if markdown.is_empty() {
            return Ok(String::new());
        }
        guarded(|| {
            let tokens = self.tokenize(markdown);
            tracing::debug!(tokens = tokens.len(), "rendering markdown");
            render(&tokens, &self.options.render)
        })
    }

    /// Render markdown to HTML; on failure the markdown comes back unchanged.
    pub fn markdown_to_html(&self, markdown: &str) -> String {
        self.try_markdown_to_html(markdown)
            .unwrap_or_else(|err| echo(markdown, "markdown rendering", &err))
    }

    /// Render an already tokenized document, returning `source` if the
    /// tokens cannot be rendered.
    pub fn render_or_echo(&self, source: &str, tokens: &[Token]) -> String {
        guarded(|| render(tokens, &self.options.render))
            .unwrap_or_else(|err| echo(source, "markdown rendering", &err))
    }

    pub fn try_html_to_markdown(&self, html: &str) -> Result<String, ConvertError> {
        if html.is_empty() {
            return Ok(String::new());
        }
        guarded(|| serialize(html, &self.options.serialize))
    }

    /// Serialize HTML to markdown; on failure the HTML comes back unchanged.
    pub fn html_to_markdown(&self, html: &str) -> String {
        self.try_html_to_markdown(html)
            .unwrap_or_else(|err| echo(html, "html serialization", &err))
    }
}

fn echo(input: &str, stage: &str, err: &ConvertError) -> String {
    tracing::warn!(stage, error = %err, "conversion failed, returning input unchanged");
    input.to_string()
}

/// Run a conversion step, turning a panic into [`ConvertError::Panic`].
fn guarded<T>(step: impl FnOnce() -> Result<T, ConvertError>) -> Result<T, ConvertError> {
    panic::catch_unwind(AssertUnwindSafe(step))
        .unwrap_or_else(|payload| Err(ConvertError::Panic(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TokenKind;

    #[test]
    fn pipeline_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }

    #[test]
    fn empty_input_is_empty_output() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.markdown_to_html(""), "");
        assert_eq!(pipeline.html_to_markdown(""), "");
    }

    #[test]
    fn unbalanced_tokens_echo_the_source() {
        let pipeline = Pipeline::default();
        let tokens = vec![Token::new(TokenKind::ContainerOpen)];
        assert_eq!(pipeline.render_or_echo("::: tip", &tokens), "::: tip");
    }

    #[test]
    fn panics_become_errors() {
        let result: Result<(), ConvertError> = guarded(|| panic!("boom"));
        assert_eq!(result, Err(ConvertError::Panic("boom".to_string())));
    }

    #[test]
    fn table_normalization_is_optional() {
        let source = "| a | b |\n\n| --- | --- |\n\n| 1 | 2 |";
        let normalizing = Pipeline::default();
        assert!(normalizing.markdown_to_html(source).contains("<table>"));

        let mut options = PipelineOptions::default();
        options.render.normalize_tables = false;
        let verbatim = Pipeline::new(options);
        assert!(!verbatim.markdown_to_html(source).contains("<table>"));
    }
}
