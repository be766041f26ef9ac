//! Extra or overriding language packs loaded from TOML.

pub mod loader;
pub mod schema;

pub use loader::{load_from_path, load_from_str, merge_into, registry_from_path, ConfigError};
pub use schema::{
    Metadata, PackConfig, PackDefinition, QueryOverrides, ValidationError, ValidationIssue,
};
