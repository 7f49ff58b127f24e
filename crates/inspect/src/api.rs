//! Entry points shared by the command-line and MCP front ends.

use crate::error::{InspectError, Result};
use crate::registry::Registry;
use crate::resolver::{Resolver, TargetKind};
use peek_docstring::{format_docstring, paginate, render_page};
use peek_protocol::{DocstringMetadata, InspectionResult};
use serde::Serialize;

/// Resolve and build a target with the given (or detected) inspector kind
pub fn inspect(registry: &Registry, target: &str, kind: Option<&str>) -> Result<InspectionResult> {
    let kind = kind.unwrap_or_else(|| registry.detect_kind(target));
    let inspector = registry.inspector(kind)?;
    if !inspector.supports(target) {
        return Err(InspectError::unsupported(target, kind));
    }
    inspector.inspect(target)
}

/// Inspect and render, propagating failures
pub fn try_inspect_and_render(
    registry: &Registry,
    target: &str,
    kind: Option<&str>,
    format: Option<&str>,
) -> Result<String> {
    let kind = kind.unwrap_or_else(|| registry.detect_kind(target));
    // Resolve the renderer first so a bad format fails before any loading
    let format = format.unwrap_or_else(|| registry.default_format(kind));
    let renderer = registry.renderer(format)?;

    let result = inspect(registry, target, Some(kind))?;
    log::debug!(
        "Rendering '{}' ({}) as {format}",
        result.name,
        result.kind
    );
    Ok(renderer.render(&result)?)
}

/// Inspect and render; any failure becomes a single `Error: <message>` line
pub fn inspect_and_render(
    registry: &Registry,
    target: &str,
    kind: Option<&str>,
    format: Option<&str>,
) -> String {
    try_inspect_and_render(registry, target, kind, format).unwrap_or_else(|err| {
        log::debug!("Inspection of '{target}' failed: {err}");
        format!("Error: {err}")
    })
}

/// Raw documentation of a code entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Docstring {
    /// `module`, `class`, `function` or `attribute`
    pub kind: TargetKind,
    /// Cleaned docstring; empty when the entity has none
    pub docstring: String,
    /// Module the entity was found in; `None` for module targets
    pub module: Option<String>,
}

/// Look up the documentation of a dotted name with the resolver's ordering
pub fn extract_docstring(registry: &Registry, target: &str) -> Result<Docstring> {
    let provider = registry.provider();
    let resolved = Resolver::new(provider).resolve_code(target)?;
    let docstring = provider.documentation(&resolved.entity)?.unwrap_or_default();
    Ok(Docstring {
        kind: resolved.kind,
        docstring,
        module: resolved.scope,
    })
}

/// Formatted, paginated docstring framed with a header and, across several
/// pages, a navigation footer.
///
/// `page` is zero-based and clamped; `page_size` defaults to the registry's.
/// Failures produce `Error: …` text and metadata with `error` set.
pub fn get_paginated_docstring(
    registry: &Registry,
    target: &str,
    page: usize,
    page_size: Option<usize>,
) -> (String, DocstringMetadata) {
    let page_size = page_size.unwrap_or_else(|| registry.page_size()).max(1);

    let doc = match extract_docstring(registry, target) {
        Ok(doc) => doc,
        Err(err) => {
            log::debug!("Docstring lookup for '{target}' failed: {err}");
            let message = err.to_string();
            return (
                format!("Error: {message}"),
                DocstringMetadata::failed(target, page_size, message),
            );
        }
    };

    let formatted = format_docstring(&doc.docstring);
    let page = paginate(&formatted, page, page_size);
    let metadata = DocstringMetadata {
        target: target.to_string(),
        kind: Some(doc.kind.as_str().to_string()),
        module: doc.module,
        pagination: page.info,
        error: None,
    };
    (render_page(&page.content, &metadata), metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use peek_render::RenderLimits;
    use peek_source_meta::{ProviderConfig, PythonProvider};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn registry() -> Registry {
        let long_doc = (1..=45)
            .map(|n| format!("    line {n}"))
            .collect::<Vec<_>>()
            .join("\n");
        let provider = PythonProvider::new(ProviderConfig {
            search_paths: Vec::new(),
            ..Default::default()
        })
        .unwrap()
        .with_source(
            "notes",
            format!(
                "\"\"\"Notes module.\"\"\"\n\ndef long():\n    \"\"\"Summary.\n{long_doc}\n    \"\"\"\n\ndef bare():\n    pass\n"
            ),
        );
        Registry::new(Arc::new(provider), RenderLimits::default())
    }

    #[test]
    fn errors_become_one_line() {
        let registry = registry();
        assert_eq!(
            inspect_and_render(&registry, "notes.missing", None, None),
            "Error: Could not find notes.missing"
        );
        assert_eq!(
            inspect_and_render(&registry, "notes", None, Some("html")),
            "Error: No formatter registered for format type: html"
        );
        assert_eq!(
            inspect_and_render(&registry, "notes", Some("yaml"), None),
            "Error: No inspector registered for target type: yaml"
        );
        assert_eq!(
            inspect_and_render(&registry, "elsewhere.thing", None, None),
            "Error: Target 'elsewhere.thing' is not supported by the python inspector"
        );
    }

    #[test]
    fn module_renders_with_default_format() {
        let text = inspect_and_render(&registry(), "notes", None, None);
        assert!(text.starts_with("notes (module)\n==============\n\nDescription: Notes module."));
        assert!(text.contains("Functions:\n---------\n  def bare()\n  def long()"));
    }

    #[test]
    fn docstring_metadata() {
        let doc = extract_docstring(&registry(), "notes.long").unwrap();
        assert_eq!(doc.kind, TargetKind::Function);
        assert_eq!(doc.module.as_deref(), Some("notes"));
        assert!(doc.docstring.starts_with("Summary.\nline 1\n"));

        let module = extract_docstring(&registry(), "notes").unwrap();
        assert_eq!(module.kind.as_str(), "module");
        assert_eq!(module.module, None);
    }

    #[test]
    fn paginated_docstring_second_page() {
        let (text, meta) = get_paginated_docstring(&registry(), "notes.long", 1, None);
        assert_eq!(meta.pagination.total_lines, 46);
        assert_eq!(meta.pagination.total_pages, 3);
        assert_eq!(meta.pagination.lines_range, "21-40 of 46");
        assert_eq!(meta.kind.as_deref(), Some("function"));
        assert!(text.contains("Docstring for: notes.long | Type: function | Module: notes"));
        assert!(text.contains("\n\nline 20\n"));
        assert!(text.ends_with("Use page=0 for previous page | Use page=2 for next page"));
    }

    #[test]
    fn paginated_docstring_placeholder_and_errors() {
        let registry = registry();
        let (text, meta) = get_paginated_docstring(&registry, "notes.bare", 0, Some(20));
        assert!(text.ends_with("\n\n(No docstring available)"));
        assert_eq!(meta.pagination.total_pages, 1);

        let (text, meta) = get_paginated_docstring(&registry, "notes.nothing", 3, Some(0));
        assert_eq!(text, "Error: Could not find notes.nothing");
        assert_eq!(meta.error.as_deref(), Some("Could not find notes.nothing"));
        assert_eq!(meta.pagination.page_size, 1);
        assert_eq!(meta.pagination.total_pages, 1);
    }
}
