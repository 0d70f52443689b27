//! File-based configuration source.

use std::path::{Path, PathBuf};

use super::source::Source;
use super::value::{Object, Value};
use super::ConfigError;

/// A configuration source that loads from a JSON file.
///
/// The document must be a JSON object; nested objects become namespaces.
/// Files can be marked as required or optional. Required files that don't exist
/// cause an error; optional files that don't exist yield nothing.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    /// Creates a new file source.
    ///
    /// If `required` is true, collecting fails when the file doesn't exist.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn collect(&self) -> Result<Object, ConfigError> {
        Ok(load_config_file(&self.path, self.required)?.unwrap_or_default())
    }
}

/// Loads and parses a JSON config file.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn load_config_file(path: &Path, required: bool) -> Result<Option<Object>, ConfigError> {
    match std::fs::read(path) {
        Ok(contents) => parse_object(path, &contents).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                tracing::debug!(path = %path.display(), "optional config file not found");
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Invalid UTF-8 is a parse failure, not a read failure.
fn parse_object(path: &Path, contents: &[u8]) -> Result<Object, ConfigError> {
    let parsed: serde_json::Value =
        serde_json::from_slice(contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    match Value::from(parsed) {
        Value::Object(object) => Ok(object),
        other => Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
            found: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_file_source_loads_valid_file() {
        let file = write_file(r#"{"key": "value", "nested": {"n": 1}}"#);

        let source = FileSource::new(file.path(), true);
        let object = source.collect().unwrap();

        assert_eq!(object.get("key"), Some(&Value::from("value")));
        assert!(matches!(object.get("nested"), Some(Value::Object(_))));
    }

    #[test]
    fn test_file_source_required_missing() {
        let source = FileSource::new("/nonexistent/path/config.json", true);
        let result = source.collect();

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
        assert!(result.unwrap_err().is_io());
    }

    #[test]
    fn test_file_source_optional_missing() {
        let source = FileSource::new("/nonexistent/path/config.json", false);
        assert!(source.collect().unwrap().is_empty());
    }

    #[test]
    fn test_file_source_rejects_malformed_json() {
        let file = write_file(r#"{"key": "#);
        let err = FileSource::new(file.path(), true).collect().unwrap_err();

        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.is_parse());
    }

    #[test]
    fn test_file_source_rejects_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"a\": \"\xff\xfe\"}").unwrap();

        let err = FileSource::new(file.path(), true).collect().unwrap_err();

        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.is_parse());
        assert!(!err.is_io());
    }

    #[test]
    fn test_file_source_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = FileSource::new(dir.path(), true).collect().unwrap_err();

        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(err.is_io());
    }

    #[test]
    fn test_file_source_rejects_top_level_array() {
        let file = write_file("[1, 2, 3]");
        let err = FileSource::new(file.path(), true).collect().unwrap_err();

        assert!(matches!(
            err,
            ConfigError::NotAnObject {
                found: "an array",
                ..
            }
        ));
        assert!(err.is_parse());
    }

    #[test]
    fn test_file_source_rejects_top_level_scalar() {
        let file = write_file("42");
        let err = FileSource::new(file.path(), true).collect().unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { .. }));
    }
}
