//! # Peek Inspect
//!
//! Resolves target descriptors into element trees and renders them as bounded,
//! human-readable text.
//!
//! ## Architecture
//!
//! ```text
//! Target descriptor ("pkg.mod.Class", "config.json:a.b[0]")
//!     │
//!     ├──> Registry: kind → Inspector, format → Renderer
//!     │    └─> python / json / toml inspectors; text, python-text, json-text renderers
//!     │
//!     ├──> Resolver
//!     │    ├─> existing .json / .toml file (optional ":path") → data target
//!     │    └─> module, module.member, module.Class.method, prefix + attribute chain
//!     │
//!     ├──> Tree builders → InspectionResult
//!     │    ├─> CodeTreeBuilder (MetadataProvider queries, provenance, short signatures)
//!     │    └─> data builder (serde_json / toml, path traversal)
//!     │
//!     └──> Renderer → text; failures become "Error: <message>"
//! ```
//!
//! ## Example
//!
//! ```rust
//! use peek_inspect::{inspect_and_render, Registry};
//! use peek_render::RenderLimits;
//! use peek_source_meta::{ProviderConfig, PythonProvider};
//! use std::sync::Arc;
//!
//! let provider = PythonProvider::new(ProviderConfig::default())
//!     .unwrap()
//!     .with_source("greet", "def hello(name: str) -> str:\n    \"\"\"Say hello.\"\"\"\n");
//! let registry = Registry::new(Arc::new(provider), RenderLimits::default());
//!
//! let text = inspect_and_render(&registry, "greet.hello", None, None);
//! assert!(text.contains("def hello(name: str) -> str"));
//! ```

mod api;
mod code;
mod config;
mod data;
mod error;
mod inspector;
mod registry;
mod resolver;

pub use api::{
    extract_docstring, get_paginated_docstring, inspect, inspect_and_render,
    try_inspect_and_render, Docstring,
};
pub use code::{short_type, CodeTreeBuilder, OPAQUE_DEFAULT};
pub use config::{InspectConfig, DEFAULT_PAGE_SIZE, PAGE_SIZE_ENV};
pub use data::{split_path, DataFormat, DataTarget};
pub use error::{InspectError, Result};
pub use inspector::{DataInspector, Inspector, PythonInspector};
pub use registry::{Registry, PYTHON_TEXT_FORMAT};
pub use resolver::{CodeTarget, Resolution, Resolver, TargetKind};

