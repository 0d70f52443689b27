//! Application context for sharing a populated config store.

use std::sync::Arc;

use crate::config::{Config, ConfigStore};
use crate::Error;

/// Central application context holding the config store once it's populated.
///
/// Building the context ends the write phase: the store is moved behind an
/// `Arc` and only read access is handed out. Clones share the same store and
/// can be sent to other threads.
///
/// ## Example
///
/// ```no_run
/// use dragon_conf::{AppContext, Config};
///
/// let ctx = AppContext::builder()
///     .with_config(
///         Config::builder()
///             .with_file("config.json", "", false)
///             .with_env("APP_", "env", true),
///     )
///     .build()?;
///
/// let port = ctx.config().get_int("server.port");
/// # Ok::<(), dragon_conf::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AppContext {
    config: Arc<ConfigStore>,
}

impl AppContext {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder { config: None }
    }

    /// Returns a reference to the config store.
    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Returns a shared handle to the config store.
    pub fn shared_config(&self) -> Arc<ConfigStore> {
        Arc::clone(&self.config)
    }
}

#[derive(Debug)]
enum PendingConfig {
    Store(ConfigStore),
    Builder(Config),
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    config: Option<PendingConfig>,
}

impl AppContextBuilder {
    /// Attaches a store that has already been populated.
    pub fn with_store(mut self, store: ConfigStore) -> Self {
        self.config = Some(PendingConfig::Store(store));
        self
    }

    /// Attaches a [`Config`] builder, run when the context is built.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(PendingConfig::Builder(config));
        self
    }

    /// Builds the `AppContext`.
    ///
    /// Returns an error if no configuration was provided or loading it failed.
    pub fn build(self) -> Result<AppContext, Error> {
        let store = match self.config.ok_or(Error::MissingConfig)? {
            PendingConfig::Store(store) => store,
            PendingConfig::Builder(config) => config.build()?,
        };
        Ok(AppContext {
            config: Arc::new(store),
        })
    }
}
