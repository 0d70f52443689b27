use super::source::Source;
use super::value::{Object, Value};
use super::ConfigError;

/// Environment variables whose names start with a prefix.
///
/// The prefix is a filter only: it is kept in the resulting key, and values
/// stay strings. Place the batch under a namespace with the merge prefix.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    entries: Option<Vec<String>>,
}

impl EnvSource {
    /// Reads the process environment. An empty prefix keeps every variable.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: None,
        }
    }

    /// Uses `NAME=VALUE` strings instead of the process environment.
    pub fn from_entries<I, S>(prefix: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            entries: Some(entries.into_iter().map(Into::into).collect()),
        }
    }

    fn vars(&self) -> Vec<(String, String)> {
        match &self.entries {
            Some(entries) => entries
                .iter()
                .map(|entry| {
                    let (name, value) = split_entry(entry);
                    (name.to_string(), value.to_string())
                })
                .collect(),
            None => std::env::vars_os()
                .map(|(name, value)| {
                    (
                        name.to_string_lossy().into_owned(),
                        value.to_string_lossy().into_owned(),
                    )
                })
                .collect(),
        }
    }

    /// The matching variables as a single-level object. Never fails.
    pub fn object(&self) -> Object {
        let object: Object = self
            .vars()
            .into_iter()
            .filter(|(name, _)| name.starts_with(&self.prefix))
            .map(|(name, value)| (name, Value::String(value)))
            .collect();

        tracing::trace!(prefix = %self.prefix, matched = object.len(), "collected environment");
        object
    }
}

impl Source for EnvSource {
    fn collect(&self) -> Result<Object, ConfigError> {
        Ok(self.object())
    }
}

/// Splits on the first `=`. An entry without one is a name with an empty value.
fn split_entry(entry: &str) -> (&str, &str) {
    entry.split_once('=').unwrap_or((entry, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_entry() {
        assert_eq!(split_entry("A=1"), ("A", "1"));
        assert_eq!(split_entry("URL=a=b=c"), ("URL", "a=b=c"));
        assert_eq!(split_entry("FLAG"), ("FLAG", ""));
        assert_eq!(split_entry("EMPTY="), ("EMPTY", ""));
    }

    #[test]
    fn test_prefix_filter_keeps_full_name() {
        let source = EnvSource::from_entries("FOO_", ["FOO_A=1", "FOO_B=2", "BAR_C=3"]);
        let object = source.collect().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object.get("FOO_A"), Some(&Value::from("1")));
        assert_eq!(object.get("FOO_B"), Some(&Value::from("2")));
        assert!(!object.contains_key("BAR_C"));
        assert!(!object.contains_key("A"));
    }

    #[test]
    fn test_object_matches_collect() {
        let source = EnvSource::from_entries("APP_", ["APP_X=1", "OTHER=2"]);
        let object = source.object();

        assert_eq!(object.len(), 1);
        assert_eq!(source.collect().unwrap(), object);
    }

    #[test]
    fn test_empty_prefix_keeps_everything() {
        let source = EnvSource::from_entries("", ["A=1", "B"]);
        let object = source.collect().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object.get("B"), Some(&Value::from("")));
    }

    #[test]
    fn test_reads_process_environment() {
        std::env::set_var("DRAGON_CONF_ENV_SOURCE_TEST", "on");
        let object = EnvSource::new("DRAGON_CONF_ENV_SOURCE_").collect().unwrap();

        assert_eq!(
            object.get("DRAGON_CONF_ENV_SOURCE_TEST"),
            Some(&Value::from("on"))
        );
    }
}
