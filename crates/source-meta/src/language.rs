use crate::error::{MetadataError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Kind of Python source file a module can be loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Implementation file (`.py`, `.pyw`)
    Module,
    /// Interface stub (`.pyi`)
    Stub,
    Unknown,
}

impl SourceKind {
    /// Detect source kind from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyw" => SourceKind::Module,
            "pyi" => SourceKind::Stub,
            _ => SourceKind::Unknown,
        }
    }

    /// Detect source kind from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(SourceKind::Unknown)
    }

    /// Get source kind name as string
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Module => "module",
            SourceKind::Stub => "stub",
            SourceKind::Unknown => "unknown",
        }
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        match self {
            SourceKind::Module | SourceKind::Stub => Ok(tree_sitter_python::LANGUAGE.into()),
            SourceKind::Unknown => Err(MetadataError::tree_sitter(
                "no grammar for unknown source kind",
            )),
        }
    }
}

/// Whether `name` is a valid Python identifier (ASCII subset)
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Whether every dot-separated component of `name` is an identifier
pub fn is_dotted_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}

/// Candidate files for a dotted module name below one search root, in lookup order.
///
/// Packages win over plain modules; implementation files win over stubs.
pub fn module_candidates(root: &Path, module: &str) -> Vec<(PathBuf, bool)> {
    let mut base = root.to_path_buf();
    for part in module.split('.') {
        base.push(part);
    }

    let mut candidates = Vec::with_capacity(4);
    for init in ["__init__.py", "__init__.pyi"] {
        candidates.push((base.join(init), true));
    }
    for ext in ["py", "pyi"] {
        candidates.push((base.with_extension(ext), false));
    }
    candidates
}
