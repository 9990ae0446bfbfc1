//! Shared configuration loader for the quill toolchain.
//!
//! `defaults/quill.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`QuillConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use quill_babel::{AdmonitionKind, PipelineOptions, RenderOptions, SerializeOptions};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/quill.default.toml");

/// Top-level configuration consumed by quill applications.
#[derive(Debug, Clone, Deserialize)]
pub struct QuillConfig {
    pub render: RenderConfig,
    pub serialize: SerializeConfig,
}

/// Markdown → HTML knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub normalize_tables: bool,
    pub table_wrapper_class: String,
    pub code_class_prefix: String,
    #[serde(default)]
    pub admonition_titles: BTreeMap<AdmonitionKind, String>,
}

/// HTML → Markdown knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct SerializeConfig {
    pub bullet: char,
}

impl From<RenderConfig> for RenderOptions {
    fn from(config: RenderConfig) -> Self {
        RenderOptions {
            normalize_tables: config.normalize_tables,
            table_wrapper_class: config.table_wrapper_class,
            code_class_prefix: config.code_class_prefix,
            admonition_titles: config.admonition_titles,
        }
    }
}

impl From<SerializeConfig> for SerializeOptions {
    fn from(config: SerializeConfig) -> Self {
        SerializeOptions {
            bullet: config.bullet,
        }
    }
}

impl From<QuillConfig> for PipelineOptions {
    fn from(config: QuillConfig) -> Self {
        PipelineOptions {
            render: config.render.into(),
            serialize: config.serialize.into(),
        }
    }
}

impl QuillConfig {
    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.serialize.bullet, '-' | '*' | '+') {
            return Err(ConfigError::Message(format!(
                "serialize.bullet must be one of '-', '*' or '+', got {:?}",
                self.serialize.bullet
            )));
        }
        Ok(())
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and validate the configuration.
    pub fn build(self) -> Result<QuillConfig, ConfigError> {
        let config: QuillConfig = self.builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<QuillConfig, ConfigError> {
    Loader::new().build()
}
