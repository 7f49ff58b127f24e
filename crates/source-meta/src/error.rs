use std::path::PathBuf;
use thiserror::Error;

/// Result type for metadata lookups
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Errors that can occur while looking up structural metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    /// No module with this dotted name exists on the search path
    #[error("No module named '{0}'")]
    ModuleNotFound(String),

    /// The module exists but its source cannot be loaded
    #[error("Cannot load module '{module}' ({}): syntax error at line {line}", .file.display())]
    Syntax {
        module: String,
        file: PathBuf,
        line: usize,
    },

    /// A name is not bound in the given scope
    #[error("'{scope}' has no attribute '{name}'")]
    AttributeNotFound { scope: String, name: String },

    /// The entity exists but is not the expected kind
    #[error("'{entity}' is not a {expected}")]
    WrongKind {
        entity: String,
        expected: &'static str,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl MetadataError {
    /// Create a module-not-found error
    pub fn module_not_found(name: impl Into<String>) -> Self {
        Self::ModuleNotFound(name.into())
    }

    /// Create an attribute-not-found error
    pub fn attribute_not_found(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AttributeNotFound {
            scope: scope.into(),
            name: name.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    /// Whether the error means "this name does not exist" rather than "it exists but is broken"
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ModuleNotFound(_) | Self::AttributeNotFound { .. }
        )
    }
}
