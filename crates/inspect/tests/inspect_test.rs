use peek_inspect::{
    get_paginated_docstring, inspect, inspect_and_render, InspectConfig, Registry,
};
use peek_protocol::{Element, ResultKind, META_SOURCE_FILE};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
    registry: Registry,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "inventory/__init__.py",
            "\"\"\"Inventory tracking.\"\"\"\nfrom inventory.items import Item\n",
        );
        write(
            dir.path(),
            "inventory/items.py",
            r#""""Stock items."""
from typing import Optional


class Record:
    """Base record."""

    def save(self, force: bool = False) -> None:
        """Persist the record."""


class Item(Record):
    """A stocked item.

    Args:
        sku: stock keeping unit
        qty: quantity on hand
    """

    def __init__(self, sku: str, qty: int = 0):
        pass

    def restock(self, amount: int, note: Optional[str] = None) -> int:
        pass


def lookup(sku: str, cache=dict()) -> Optional[Item]:
    pass
"#,
        );
        write(
            dir.path(),
            "stock.json",
            r#"{"a": {"b": [10, 20, 30]}, "items": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14], "zeta": "z", "alpha": {"nested": {"deep": true}}}"#,
        );
        write(
            dir.path(),
            "stock.toml",
            "[warehouse]\nname = \"north\"\nopened = 2021-03-04\nbins = [1, 2]\n",
        );

        let config = InspectConfig::default().with_search_path(dir.path());
        let registry = Registry::from_config(&config).unwrap();
        Self { dir, registry }
    }

    fn file(&self, name: &str) -> String {
        self.dir.path().join(name).display().to_string()
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn package_module_view() {
    let ws = Workspace::new();
    let text = inspect_and_render(&ws.registry, "inventory", None, None);
    assert_eq!(
        text,
        "inventory (module)
==================

Description: Inventory tracking.

Submodules:
  inventory.items

Imported Classes:
  From inventory.items:
    Item
"
    );
}

#[test]
fn module_result_name_equals_descriptor() {
    let ws = Workspace::new();
    let result = inspect(&ws.registry, "inventory.items", None).unwrap();
    assert_eq!(result.name, "inventory.items");
    assert_eq!(result.kind, ResultKind::Module);
    let source = result.metadata_value(META_SOURCE_FILE).unwrap();
    assert!(source.ends_with("items.py"));
}

#[test]
fn class_view_lists_bases_and_inherited_methods() {
    let ws = Workspace::new();
    let text = inspect_and_render(&ws.registry, "inventory.items.Item", None, None);
    assert_eq!(
        text,
        "inventory.items.Item (class)
============================

class Item(Record)
  Description: A stocked item.

Args:
    sku: stock keeping unit
    qty: quantity on hand
  Methods:
    def __init__(self, sku: str, qty: int = 0)
    def restock(amount: int, note: Optional[str] = None) -> int
    def save(force: bool = False) -> None
"
    );
}

#[test]
fn reexported_class_shows_origin() {
    let ws = Workspace::new();
    let text = inspect_and_render(&ws.registry, "inventory.Item", None, None);
    assert!(text.contains("class Item(Record) [imported from inventory.items]"));

    let text = inspect_and_render(&ws.registry, "inventory.items.Record", None, Some("python-text"));
    assert!(text.contains("\nclass Record\n"));
}

#[test]
fn function_view_uses_opaque_defaults() {
    let ws = Workspace::new();
    let text = inspect_and_render(&ws.registry, "inventory.items.lookup", None, None);
    assert!(text.contains("def lookup(sku: str, cache = ...) -> Optional[Item]"));
}

#[test]
fn long_docstrings_are_capped_per_view() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (1..=50).map(|n| format!("line {n}")).collect();
    let source = format!(
        "\"\"\"{}\n\"\"\"\n\n\ndef summarize():\n    \"\"\"{}\n    \"\"\"\n",
        lines.join("\n"),
        lines.join("\n    "),
    );
    write(dir.path(), "ledger.py", &source);
    let config = InspectConfig::default().with_search_path(dir.path());
    let registry = Registry::from_config(&config).unwrap();

    let module = inspect_and_render(&registry, "ledger", None, None);
    let first_eight = lines[..8].join("\n");
    assert!(module.contains(&format!(
        "Description: {first_eight}\n\n[...docstring truncated...]\n"
    )));
    assert!(!module.contains("line 9"));
    assert!(module.contains("  def summarize()"));

    let function = inspect_and_render(&registry, "ledger.summarize", None, None);
    let first_fifteen = lines[..15].join("\n");
    assert!(function.contains(&format!(
        "  Description: {first_fifteen}\n\n[...docstring truncated...]\n"
    )));
    assert!(!function.contains("line 16"));
}

#[test]
fn json_path_reaches_array_item() {
    let ws = Workspace::new();
    let target = format!("{}:a.b.1", ws.file("stock.json"));
    let result = inspect(&ws.registry, &target, None).unwrap();
    let Element::Data(root) = &result.elements[0] else {
        panic!("expected data root");
    };
    assert_eq!(root.element.value, peek_protocol::DataValue::Number(20.into()));

    let text = inspect_and_render(&ws.registry, &target, None, None);
    assert!(text.starts_with("stock.json:a.b.1 (json)\n"));
    assert!(text.ends_with("\n\na.b.1: 20"));
}

#[test]
fn json_index_out_of_bounds_names_index() {
    let ws = Workspace::new();
    let target = format!("{}:a.b.5", ws.file("stock.json"));
    let text = inspect_and_render(&ws.registry, &target, None, None);
    assert!(text.starts_with("Error: "));
    assert!(text.contains('5'));
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn json_document_view_is_bounded() {
    let ws = Workspace::new();
    let text = inspect_and_render(&ws.registry, &ws.file("stock.json"), None, None);
    let body: Vec<&str> = text.lines().skip(5).collect();
    assert_eq!(
        body,
        vec![
            "stock.json: {",
            "  a: {",
            "    ... (object with 1 properties)",
            "  }",
            "  alpha: {",
            "    ... (object with 1 properties)",
            "  }",
            "  items: [",
            "    ... (array with 15 items)",
            "  ]",
            "  zeta: \"z\"",
            "}",
        ]
    );
}

#[test]
fn json_array_shows_ten_items() {
    let ws = Workspace::new();
    let target = format!("{}:items", ws.file("stock.json"));
    let text = inspect_and_render(&ws.registry, &target, None, None);
    assert!(text.contains("  [9]: 9\n  ... (5 more items)\n]"));
    assert!(!text.contains("[10]"));
}

#[test]
fn toml_documents_render_as_data() {
    let ws = Workspace::new();
    let target = format!("{}:warehouse", ws.file("stock.toml"));
    let text = inspect_and_render(&ws.registry, &target, None, None);
    assert!(text.starts_with("stock.toml:warehouse (toml)\n"));
    assert!(text.contains("  opened: 2021-03-04\n"));
    assert!(text.contains("  name: \"north\"\n"));

    let forced = inspect_and_render(&ws.registry, &target, Some("json"), None);
    assert!(forced.ends_with("is not supported by the json inspector"));
}

#[test]
fn docstring_pages_format_sections() {
    let ws = Workspace::new();
    let (text, meta) = get_paginated_docstring(&ws.registry, "inventory.items.Item", 0, Some(3));
    assert_eq!(meta.kind.as_deref(), Some("class"));
    assert_eq!(meta.module.as_deref(), Some("inventory.items"));
    assert_eq!(meta.pagination.total_lines, 5);
    assert_eq!(meta.pagination.total_pages, 2);
    assert!(text.contains("A stocked item.\n\nArgs:"));
    assert!(text.ends_with("Use page=1 for next page"));

    let (text, _) = get_paginated_docstring(&ws.registry, "inventory.items.Item", 1, Some(3));
    assert!(text.contains("  sku: stock keeping unit\n  qty: quantity on hand"));
    assert!(text.ends_with("Use page=0 for previous page"));
}
