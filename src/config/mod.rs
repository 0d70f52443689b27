//! Flattened key/value configuration: sources, merging, and typed reads.

mod builder;
mod env;
mod error;
mod file;
mod source;
mod store;
mod unflatten;
mod value;

pub use builder::Config;
pub use env::EnvSource;
pub use error::ConfigError;
pub use file::FileSource;
pub use source::{LeafSource, Source};
pub use store::ConfigStore;
pub use value::{Object, Value};
