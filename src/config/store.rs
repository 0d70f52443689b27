use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::env::EnvSource;
use super::file::FileSource;
use super::source::{join_key, LeafSource, Source};
use super::unflatten::unflatten;
use super::value::{Object, Value};
use super::ConfigError;

/// A flat key/value store addressed by dot-delimited keys.
///
/// Sources are merged in as nested objects and flattened, so `{"svc": {"port": 8080}}`
/// becomes the single key `svc.port`. Only leaves are addressable: `svc` alone is absent.
///
/// The store is meant to be populated once and then read. It does no locking of
/// its own; share it behind an [`AppContext`](crate::AppContext) (or your own `Arc`)
/// after the last merge.
///
/// ## Accessors
///
/// The `get_*` accessors never fail: an absent or mistyped key reads as the zero
/// value (`""`, `0`, `false`, empty vec). Use them for optional settings.
/// The `try_*` accessors report [`ConfigError::MissingKey`] or
/// [`ConfigError::TypeMismatch`] instead. Use them for required settings.
///
/// ```no_run
/// use dragon_conf::ConfigStore;
///
/// let mut store = ConfigStore::new();
/// store.load_file("config/service.json", "", false)?;
/// store.load_environment("SVC_", "env", true);
/// store.set_default("port", 8080, "svc", false);
///
/// let port = store.try_int("svc.port")?;
/// let verbose = store.get_bool("svc.verbose");
/// # Ok::<(), dragon_conf::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    entries: HashMap<String, Value>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// New store holding a single JSON file merged at the top level.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut store = Self::new();
        store.load_file(path, "", false)?;
        Ok(store)
    }

    /// New store holding the environment variables that start with `prefix`.
    pub fn read_from_env(prefix: &str) -> Self {
        let mut store = Self::new();
        store.load_environment(prefix, "", false);
        store
    }

    /// Reads a JSON object from `path` and merges it under `dest_prefix`.
    ///
    /// Fails on a missing or unreadable file, malformed JSON, or a top level that
    /// isn't an object; nothing is merged in that case. Returns the number of
    /// keys written.
    pub fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        dest_prefix: &str,
        overwrite: bool,
    ) -> Result<usize, ConfigError> {
        let source = FileSource::new(path, true);
        let written = self.merge_source(&source, dest_prefix, overwrite)?;
        tracing::debug!(path = %source.path().display(), written, "loaded config file");
        Ok(written)
    }

    /// Merges environment variables whose names start with `source_prefix`
    /// under `dest_prefix`. The source prefix stays part of each key.
    pub fn load_environment(&mut self, source_prefix: &str, dest_prefix: &str, overwrite: bool) -> usize {
        self.merge_env(EnvSource::new(source_prefix), dest_prefix, overwrite)
    }

    /// Same as [`load_environment`](Self::load_environment), over explicit
    /// `NAME=VALUE` entries.
    pub fn load_environment_from<I, S>(
        &mut self,
        entries: I,
        source_prefix: &str,
        dest_prefix: &str,
        overwrite: bool,
    ) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.merge_env(EnvSource::from_entries(source_prefix, entries), dest_prefix, overwrite)
    }

    fn merge_env(&mut self, source: EnvSource, dest_prefix: &str, overwrite: bool) -> usize {
        self.merge(source.object(), dest_prefix, overwrite)
    }

    /// Collects `source` and merges it under `prefix`.
    pub fn merge_source(
        &mut self,
        source: &dyn Source,
        prefix: &str,
        overwrite: bool,
    ) -> Result<usize, ConfigError> {
        let object = source.collect()?;
        Ok(self.merge(object, prefix, overwrite))
    }

    /// Flattens `object` into the store under `prefix`.
    ///
    /// Nested objects become dotted keys. A key that is already set keeps its
    /// value unless `overwrite` is true; this is decided per key, so one merge
    /// can add some keys and skip others. Returns the number of keys written.
    pub fn merge(&mut self, object: Object, prefix: &str, overwrite: bool) -> usize {
        let mut written = 0;
        let mut skipped = 0;
        self.merge_nested(object, prefix, overwrite, &mut written, &mut skipped);
        tracing::debug!(prefix, overwrite, written, skipped, "merged config");
        written
    }

    fn merge_nested(
        &mut self,
        object: Object,
        prefix: &str,
        overwrite: bool,
        written: &mut usize,
        skipped: &mut usize,
    ) {
        for (key, value) in object {
            let full_key = join_key(prefix, &key);
            match value {
                Value::Object(nested) => {
                    self.merge_nested(nested, &full_key, overwrite, written, skipped);
                }
                leaf => {
                    if overwrite || !self.entries.contains_key(&full_key) {
                        self.entries.insert(full_key, leaf);
                        *written += 1;
                    } else {
                        tracing::trace!(key = %full_key, "keeping existing value");
                        *skipped += 1;
                    }
                }
            }
        }
    }

    /// Merges `{key: value}` under `section`. Returns whether the value was written.
    pub fn set_default(
        &mut self,
        key: &str,
        value: impl Into<Value>,
        section: &str,
        overwrite: bool,
    ) -> bool {
        let object = LeafSource::new(key, value).into_object();
        self.merge(object, section, overwrite) > 0
    }

    /// Top-level default that never replaces an existing value.
    pub fn add_default(&mut self, key: &str, value: impl Into<Value>) -> bool {
        self.set_default(key, value, "", false)
    }

    /// Top-level value that replaces whatever is there.
    pub fn add_default_override(&mut self, key: &str, value: impl Into<Value>) -> bool {
        self.set_default(key, value, "", true)
    }

    /// Exact-match lookup. Namespace prefixes are not keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// True when `key` holds a non-null value.
    pub fn has_key(&self, key: &str) -> bool {
        self.present(key).is_some()
    }

    /// Canonical string rendering of the value, or `""`.
    pub fn get_string(&self, key: &str) -> String {
        self.get(key).map(Value::to_string).unwrap_or_default()
    }

    /// The number truncated toward zero, or `0` when absent or not a number.
    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).and_then(Value::as_i64).unwrap_or(0)
    }

    pub fn get_float(&self, key: &str) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// `true` only for a stored boolean `true`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Array elements rendered as strings, or an empty vec when absent or not an array.
    pub fn get_string_array(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(render_all)
            .unwrap_or_default()
    }

    /// Like [`get_string`](Self::get_string) but fails when the key is missing.
    pub fn try_string(&self, key: &str) -> Result<String, ConfigError> {
        self.require(key).map(Value::to_string)
    }

    pub fn try_int(&self, key: &str) -> Result<i64, ConfigError> {
        self.require_as(key, "a number", Value::as_i64)
    }

    pub fn try_float(&self, key: &str) -> Result<f64, ConfigError> {
        self.require_as(key, "a number", Value::as_f64)
    }

    pub fn try_bool(&self, key: &str) -> Result<bool, ConfigError> {
        self.require_as(key, "a boolean", Value::as_bool)
    }

    pub fn try_string_array(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        self.require_as(key, "an array", |v| v.as_array().map(render_all))
    }

    /// Deserializes every key under `section` (or the whole store when empty)
    /// into `T`, rebuilding namespaces from the dotted keys.
    ///
    /// ```no_run
    /// # use dragon_conf::ConfigStore;
    /// #[derive(serde::Deserialize)]
    /// struct Service {
    ///     port: u16,
    ///     name: String,
    /// }
    ///
    /// let store = ConfigStore::read_from_file("service.json")?;
    /// let svc: Service = store.extract("svc")?;
    /// # Ok::<(), dragon_conf::ConfigError>(())
    /// ```
    pub fn extract<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
        let leaves = self.entries.iter().filter_map(|(key, value)| {
            let relative = if section.is_empty() {
                key.as_str()
            } else {
                key.strip_prefix(section)?.strip_prefix('.')?
            };
            Some((relative, value))
        });
        let tree = unflatten(leaves)?;
        Ok(serde_json::from_value(tree)?)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn present(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }

    fn require(&self, key: &str) -> Result<&Value, ConfigError> {
        self.present(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    fn require_as<T>(
        &self,
        key: &str,
        expected: &'static str,
        convert: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<T, ConfigError> {
        let value = self.require(key)?;
        convert(value).ok_or_else(|| ConfigError::TypeMismatch {
            key: key.to_string(),
            expected,
            found: value.kind(),
        })
    }
}

fn render_all(items: &[Value]) -> Vec<String> {
    items.iter().map(Value::to_string).collect()
}
