//! Shared inspection model for peek.
//!
//! Every tree builder produces an [`InspectionResult`] and every renderer consumes one.
//! The envelope is the only contract between the two sides: renderers never reach back
//! into the resolver, the metadata provider, or the file system.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod code;
pub mod data;
pub mod pagination;

pub use code::{Attribute, Class, Method, Module, Parameter, Provenance};
pub use data::{DataElement, DataKind, DataRoot, DataValue};
pub use pagination::{DocstringMetadata, PaginationInfo, NO_CONTENT_PLACEHOLDER};

/// Metadata key holding the originating data file.
pub const META_FILE_PATH: &str = "file_path";
/// Metadata key holding the module that was inspected (or the prefix a member was found in).
pub const META_MODULE: &str = "module";
/// Metadata key holding the source file a code entity was parsed from.
pub const META_SOURCE_FILE: &str = "source_file";

/// Type tag carried by an inspection result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Module,
    Class,
    Function,
    Attribute,
    Json,
    Toml,
}

impl ResultKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Function => "function",
            Self::Attribute => "attribute",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    /// Whether the result describes a code entity (as opposed to a data document).
    #[must_use]
    pub const fn is_code(self) -> bool {
        matches!(
            self,
            Self::Module | Self::Class | Self::Function | Self::Attribute
        )
    }
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A top-level element of an inspection result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Element {
    Module(Module),
    Class(Class),
    Method(Method),
    Attribute(Attribute),
    Data(DataRoot),
}

impl Element {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Module(module) => &module.name,
            Self::Class(class) => &class.name,
            Self::Method(method) => &method.name,
            Self::Attribute(attribute) => &attribute.name,
            Self::Data(root) => &root.name,
        }
    }
}

/// Uniform envelope produced by tree builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionResult {
    /// Display name (descriptor, module name, or `file:path`)
    pub name: String,

    /// Type tag (`module`, `class`, `function`, `json`, ...)
    #[serde(rename = "type")]
    pub kind: ResultKind,

    /// Top-level elements; exactly one for every current producer
    pub elements: Vec<Element>,

    /// Free-form metadata (originating file, module prefix)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl InspectionResult {
    /// Create a result wrapping a single element
    pub fn single(name: impl Into<String>, kind: ResultKind, element: Element) -> Self {
        Self {
            name: name.into(),
            kind,
            elements: vec![element],
            metadata: BTreeMap::new(),
        }
    }

    /// Builder: attach a metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
