//! MCP tools for Peek
//!
//! Thin async wrappers over the synchronous inspection core.

use peek_inspect::{get_paginated_docstring, inspect_and_render, Registry};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Usage guide sent to clients as server instructions
pub const INSTRUCTIONS: &str = r#"# Peek

Inspect and explore code and data structures: Python modules, classes, methods,
functions, and JSON/TOML files. Modules are read from source on the search path
(PEEK_PATH, then PYTHONPATH, then the working directory). Without PEEK_PATH the
`sys.path` of `python3` (or the interpreter named in PEEK_PYTHON) is searched too,
so standard library modules such as `json` resolve.

## Inspect a Module

Use the `inspect_module` tool to inspect Python modules, classes, methods, or functions:

```python
inspect_module(target="json")  # Inspect the json module
inspect_module(target="json.JSONEncoder")  # Inspect a class
inspect_module(target="json.dumps")  # Inspect a function
inspect_module(target="json.JSONEncoder.encode")  # Inspect a method
```

## Inspect a Data File

Use the `inspect_module` tool with a JSON or TOML file path:

```python
inspect_module(target="/path/to/file.json", inspector_type="json")  # Whole document
inspect_module(target="/path/to/file.json:path.to.element")  # One element
inspect_module(target="/path/to/file.json:items[0].name")  # Array items by index
```

## Read a Docstring

Use `get_docstring` for the full, formatted documentation of a module, class or
function, one page at a time:

```python
get_docstring(target="json.dumps")  # First page
get_docstring(target="json.dumps", page=1, page_size=20)  # Next page (pages are zero-based)
```

## Parameters

- `target`: The Python module, class, function, method, or data file path to inspect
- `inspector_type`: Type of inspector to use ("python", "json" or "toml"; auto-detected if omitted)
- `output_format`: Output format ("text", "python-text" or "json-text"; auto-selected if omitted)
- `page`, `page_size`: Docstring page (zero-based) and lines per page (default 20)
"#;

/// Peek MCP Service
#[derive(Clone)]
pub struct PeekService {
    registry: Arc<Registry>,
    tool_router: ToolRouter<Self>,
}

impl PeekService {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_handler]
impl ServerHandler for PeekService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InspectRequest {
    /// Module, class, function, method, or data file path (with optional `:path`)
    #[schemars(description = "Target to inspect (e.g. 'json', 'json.dumps', 'config.json:a.b')")]
    pub target: String,

    /// Inspector kind (auto-detected when omitted)
    #[schemars(description = "Type of inspector: python, json or toml")]
    pub inspector_type: Option<String>,

    /// Output format (auto-selected when omitted)
    #[schemars(description = "Output format: text, python-text or json-text")]
    pub output_format: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DocstringRequest {
    /// Dotted name of a module, class, function or method
    #[schemars(description = "Entity whose docstring to read (e.g. 'json.dumps')")]
    pub target: String,

    /// Zero-based page number
    #[schemars(description = "Zero-based page number (default: 0)")]
    pub page: Option<usize>,

    /// Lines per page
    #[schemars(description = "Lines per page (default: 20)")]
    pub page_size: Option<usize>,
}

#[tool_router]
impl PeekService {
    /// Structure of a code entity or data document
    #[tool(description = "Inspect a Python module, class, method, function, or JSON/TOML file and return its structure")]
    pub async fn inspect_module(
        &self,
        Parameters(request): Parameters<InspectRequest>,
    ) -> Result<CallToolResult, McpError> {
        log::debug!(
            "inspect_module target={} type={:?} format={:?}",
            request.target,
            request.inspector_type,
            request.output_format
        );
        let text = inspect_and_render(
            &self.registry,
            &request.target,
            request.inspector_type.as_deref(),
            request.output_format.as_deref(),
        );
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Paginated docstring
    #[tool(description = "Get the formatted docstring of a Python module, class, method or function, paginated. Returns the page text followed by JSON pagination metadata.")]
    pub async fn get_docstring(
        &self,
        Parameters(request): Parameters<DocstringRequest>,
    ) -> Result<CallToolResult, McpError> {
        let (text, metadata) = get_paginated_docstring(
            &self.registry,
            &request.target,
            request.page.unwrap_or(0),
            request.page_size,
        );
        Ok(CallToolResult::success(vec![
            Content::text(text),
            json_content(&metadata)?,
        ]))
    }
}

/// Pretty-printed JSON as a text content block
fn json_content<T: Serialize>(value: &T) -> Result<Content, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(
            "Failed to serialize tool output",
            Some(serde_json::json!({ "error": e.to_string() })),
        )
    })?;
    Ok(Content::text(json))
}
