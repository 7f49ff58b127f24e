use peek_render::RenderError;
use peek_source_meta::MetadataError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for inspection operations
pub type Result<T> = std::result::Result<T, InspectError>;

/// Errors that can occur while resolving, building or rendering a target
#[derive(Error, Debug)]
pub enum InspectError {
    /// The inspector for this kind does not accept the descriptor
    #[error("Target '{target}' is not supported by the {kind} inspector")]
    UnsupportedTarget { target: String, kind: String },

    /// No inspector registered under this kind
    #[error("No inspector registered for target type: {0}")]
    UnknownKind(String),

    /// No renderer registered under this format
    #[error("No formatter registered for format type: {0}")]
    UnknownFormat(String),

    /// Nothing matched the descriptor
    #[error("Could not find {0}")]
    NotFound(String),

    /// A key in a data path does not exist
    #[error("Path component '{0}' not found")]
    PathNotFound(String),

    /// An index in a data path is past the end of the array
    #[error("Array index {index} out of bounds (array has {len} items)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A data path continues below a scalar value
    #[error("Cannot descend into {kind} value with path component '{component}'")]
    NotTraversable {
        component: String,
        kind: &'static str,
    },

    /// The data file is not valid for its format
    #[error("Failed to parse {format} file {}: {message}", .file.display())]
    Parse {
        format: &'static str,
        file: PathBuf,
        message: String,
    },

    /// IO error reading a data file
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Provider(#[from] MetadataError),
}

impl InspectError {
    /// Create an unsupported-target error
    pub fn unsupported(target: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnsupportedTarget {
            target: target.into(),
            kind: kind.into(),
        }
    }

    /// Create a not-found error naming the full descriptor
    pub fn not_found(descriptor: impl Into<String>) -> Self {
        Self::NotFound(descriptor.into())
    }

    /// Create a parse error
    pub fn parse(format: &'static str, file: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            format,
            file: file.into(),
            message: message.to_string(),
        }
    }

    /// Create an IO error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the error means a target could not be located
    #[must_use]
    pub fn is_resolution_failure(&self) -> bool {
        match self {
            Self::NotFound(_)
            | Self::PathNotFound(_)
            | Self::IndexOutOfBounds { .. }
            | Self::NotTraversable { .. } => true,
            Self::Provider(err) => err.is_not_found() || matches!(err, MetadataError::Syntax { .. }),
            _ => false,
        }
    }
}
