use std::path::Path;

use super::env::EnvSource;
use super::file::FileSource;
use super::source::{LeafSource, Source};
use super::store::ConfigStore;
use super::value::Value;
use super::ConfigError;

/// One registered source plus where and how it merges.
#[derive(Debug)]
struct Layer {
    source: Box<dyn Source>,
    prefix: String,
    overwrite: bool,
}

/// Builder for populating a [`ConfigStore`] from several sources in one go.
///
/// Layers are merged in registration order. Each layer's `overwrite` flag
/// decides, key by key, whether it replaces values set by earlier layers.
/// A common layering is "file first, environment on top, defaults last":
///
/// ```no_run
/// use dragon_conf::Config;
///
/// let store = Config::builder()
///     .with_file("config/default.json", "", false)
///     .with_optional_file("config/local.json", "", true)
///     .with_env("MYAPP_", "env", true)
///     .with_default("port", 8080, "server", false)
///     .build()?;
///
/// let port = store.get_int("server.port");
/// # Ok::<(), dragon_conf::ConfigError>(())
/// ```
///
/// If any layer fails, `build` returns the error and no store is produced.
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    layers: Vec<Layer>,
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a JSON file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>, prefix: impl Into<String>, overwrite: bool) -> Self {
        self.with_source(FileSource::new(path, true), prefix, overwrite)
    }

    /// Adds a JSON file that is skipped if it doesn't exist. Other read or
    /// parse failures still fail the build.
    pub fn with_optional_file(
        self,
        path: impl AsRef<Path>,
        prefix: impl Into<String>,
        overwrite: bool,
    ) -> Self {
        self.with_source(FileSource::new(path, false), prefix, overwrite)
    }

    /// Adds process environment variables starting with `source_prefix`.
    ///
    /// The environment is read at build time, not here.
    pub fn with_env(
        self,
        source_prefix: impl Into<String>,
        dest_prefix: impl Into<String>,
        overwrite: bool,
    ) -> Self {
        self.with_source(EnvSource::new(source_prefix), dest_prefix, overwrite)
    }

    /// Adds a single value under `section`.
    pub fn with_default(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        section: impl Into<String>,
        overwrite: bool,
    ) -> Self {
        self.with_source(LeafSource::new(key, value), section, overwrite)
    }

    /// Adds any [`Source`].
    pub fn with_source(
        mut self,
        source: impl Source + 'static,
        prefix: impl Into<String>,
        overwrite: bool,
    ) -> Self {
        self.layers.push(Layer {
            source: Box::new(source),
            prefix: prefix.into(),
            overwrite,
        });
        self
    }

    /// Collects and merges every layer into a new store.
    pub fn build(self) -> Result<ConfigStore, ConfigError> {
        let mut store = ConfigStore::new();
        for layer in &self.layers {
            store.merge_source(layer.source.as_ref(), &layer.prefix, layer.overwrite)?;
        }
        tracing::debug!(layers = self.layers.len(), keys = store.len(), "built config store");
        Ok(store)
    }
}
