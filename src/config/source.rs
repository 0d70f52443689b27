use super::value::{Object, Value};
use super::ConfigError;

/// Something that yields a nested object to merge into a [`ConfigStore`](super::ConfigStore).
///
/// A source is collected in full before anything is merged, so an error
/// leaves the store untouched.
pub trait Source: Send + Sync + std::fmt::Debug {
    fn collect(&self) -> Result<Object, ConfigError>;
}

/// A single key/value pair, the input shape behind `set_default`.
#[derive(Debug, Clone)]
pub struct LeafSource {
    key: String,
    value: Value,
}

impl LeafSource {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub(crate) fn into_object(self) -> Object {
        Object::from([(self.key, self.value)])
    }
}

impl Source for LeafSource {
    fn collect(&self) -> Result<Object, ConfigError> {
        Ok(self.clone().into_object())
    }
}

/// Joins a namespace prefix and a key segment with `.`.
pub(crate) fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
