//! # Peek Source Metadata
//!
//! Structural metadata about Python modules, classes and callables, read from
//! source instead of a live interpreter.
//!
//! ## Architecture
//!
//! ```text
//! Dotted name ("pkg.mod")
//!     │
//!     ├──> Module lookup on search roots (pkg/mod/__init__.py, pkg/mod.py, .pyi stubs)
//!     │    └─> in-memory overlays shadow the file system
//!     │
//!     ├──> Tree-sitter Parsing → ModuleSummary (cached, LRU)
//!     │    ├─> classes, functions, variables, imports
//!     │    └─> getdoc-style cleaned docstrings
//!     │
//!     └──> MetadataProvider queries
//!          ├─> members (imports followed, inherited class members merged)
//!          ├─> documentation / signature / bases
//!          └─> declaring scope of each member
//! ```
//!
//! ## Example
//!
//! ```rust
//! use peek_source_meta::{EntityRef, MetadataProvider, ProviderConfig, PythonProvider};
//!
//! let provider = PythonProvider::new(ProviderConfig::default())
//!     .unwrap()
//!     .with_source("shapes", "class Circle:\n    \"\"\"A circle.\"\"\"\n");
//!
//! let module = provider.load_module("shapes").unwrap();
//! let circle = provider.member(&module, "Circle").unwrap();
//! assert_eq!(
//!     provider.documentation(&circle.entity).unwrap().as_deref(),
//!     Some("A circle.")
//! );
//! ```

mod config;
mod error;
mod language;
mod provider;
mod python;

pub use config::{
    interpreter_search_paths, ProviderConfig, DEFAULT_PYTHON, PYTHONPATH_ENV, PYTHON_ENV,
    SEARCH_PATH_ENV,
};
pub use error::{MetadataError, Result};
pub use language::{is_dotted_name, is_identifier, SourceKind};
pub use provider::{
    CallableFlavor, DefaultValue, EntityKind, EntityRef, Member, MetadataProvider, ParamSpec,
    Signature,
};
pub use python::PythonProvider;
