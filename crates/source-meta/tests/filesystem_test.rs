use peek_source_meta::{EntityKind, EntityRef, MetadataProvider, ProviderConfig, PythonProvider};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "geo/__init__.py", "\"\"\"Geometry toolkit.\"\"\"\n");
    write(
        root,
        "geo/shapes.py",
        r#""""Shapes."""
from geo.base import Shape


class Square(Shape):
    """A square."""

    def area(self) -> float:
        return self.side ** 2
"#,
    );
    write(
        root,
        "geo/base.py",
        "class Shape:\n    \"\"\"Base shape.\"\"\"\n\n    def area(self) -> float:\n        raise NotImplementedError\n",
    );
    write(root, "geo/stubs_only.pyi", "def typed(x: int) -> int: ...\n");
    write(root, "geo/sub/__init__.py", "");
    write(root, "geo/not_a_package/readme.txt", "hello");
    write(root, "geo/notes.txt", "ignored");
    write(root, "broken.py", "class Oops(:\n");
    dir
}

fn provider(dir: &TempDir) -> PythonProvider {
    PythonProvider::new(ProviderConfig::default().with_search_path(dir.path())).unwrap()
}

#[test]
fn test_package_discovery() {
    let dir = fixture();
    let provider = provider(&dir);

    assert!(provider.is_package("geo").unwrap());
    assert_eq!(
        provider.submodules("geo").unwrap(),
        vec!["geo.base", "geo.shapes", "geo.stubs_only", "geo.sub"]
    );
    assert_eq!(
        provider.source_file("geo.shapes"),
        Some(dir.path().join("geo").join("shapes.py"))
    );
    assert_eq!(
        provider
            .documentation(&EntityRef::module("geo"))
            .unwrap()
            .as_deref(),
        Some("Geometry toolkit.")
    );
}

#[test]
fn test_stub_modules_load() {
    let dir = fixture();
    let provider = provider(&dir);

    let module = provider.load_module("geo.stubs_only").unwrap();
    let typed = provider.member(&module, "typed").unwrap();
    assert_eq!(typed.kind(), EntityKind::Function);
    let signature = provider.signature(&typed.entity).unwrap();
    assert_eq!(signature.return_type.as_deref(), Some("int"));
}

#[test]
fn test_overridden_method_wins_over_inherited() {
    let dir = fixture();
    let provider = provider(&dir);

    let square = EntityRef::module("geo.shapes").child("Square", EntityKind::Class);
    let area = provider.member(&square, "area").unwrap();
    assert_eq!(provider.declaring_scope(&area), "geo.shapes");
}

#[test]
fn test_unloadable_module() {
    let dir = fixture();
    let provider = provider(&dir);

    let err = provider.load_module("broken").unwrap_err();
    assert!(!err.is_not_found());
    assert!(provider.load_module("nowhere").unwrap_err().is_not_found());
}

#[test]
fn test_docstring_with_unicode_indentation() {
    let provider = PythonProvider::new(ProviderConfig::default())
        .unwrap()
        .with_source(
            "wide",
            "def f():\n    \"\"\"Summary.\n\n      x\n    \u{3000}y\n    \"\"\"\n",
        );

    let function = EntityRef::module("wide").child("f", EntityKind::Function);
    assert_eq!(
        provider.documentation(&function).unwrap().as_deref(),
        Some("Summary.\n\n x\ny")
    );
}
