use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn peek(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("peek").expect("binary");
    cmd.current_dir(workdir)
        .env_remove("PEEK_PATH")
        .env_remove("PYTHONPATH")
        .env_remove("PEEK_PAGE_SIZE")
        .env("PEEK_PYTHON", "");
    cmd
}

fn fixture(root: &Path) {
    fs::create_dir_all(root.join("lib/billing")).unwrap();
    fs::write(
        root.join("lib/billing/__init__.py"),
        "\"\"\"Billing.\"\"\"\n",
    )
    .unwrap();
    fs::write(
        root.join("lib/billing/invoice.py"),
        r#""""Invoices."""


class Invoice:
    """An invoice.

    Line one.
    Line two.
    Line three.
    """

    def total(self, currency: str = "EUR") -> float:
        pass
"#,
    )
    .unwrap();
    fs::write(root.join("prices.json"), r#"{"tiers": [5, 10, 20]}"#).unwrap();
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn inspect_class_from_search_path() {
    let temp = tempdir().unwrap();
    fixture(temp.path());

    let output = peek(temp.path())
        .args(["--path", "lib", "inspect", "billing.invoice.Invoice"])
        .output()
        .expect("command run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    assert!(text.starts_with("billing.invoice.Invoice (class)\n"));
    assert!(text.contains("    def total(currency: str = \"EUR\") -> float"));
}

#[test]
fn inspect_json_path() {
    let temp = tempdir().unwrap();
    fixture(temp.path());

    let output = peek(temp.path())
        .args(["inspect", "prices.json:tiers[2]"])
        .output()
        .expect("command run");
    assert!(output.status.success());
    assert!(stdout(&output).trim_end().ends_with("tiers.2: 20"));
}

#[test]
fn inspect_failure_exits_nonzero() {
    let temp = tempdir().unwrap();
    fixture(temp.path());

    let output = peek(temp.path())
        .args(["inspect", "prices.json:tiers.7"])
        .output()
        .expect("command run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: "));
    assert!(stderr.contains('7'));
    assert!(output.stdout.is_empty());
}

#[test]
fn doc_json_reports_pagination() {
    let temp = tempdir().unwrap();
    fixture(temp.path());

    let output = peek(temp.path())
        .args([
            "--path",
            "lib",
            "doc",
            "billing.invoice.Invoice",
            "--page-size",
            "2",
            "--page",
            "1",
            "--json",
        ])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let meta = &value["metadata"];
    assert_eq!(meta["type"], "class");
    assert_eq!(meta["module"], "billing.invoice");
    assert_eq!(meta["pagination"]["total_lines"], 5);
    assert_eq!(meta["pagination"]["total_pages"], 3);
    assert_eq!(meta["pagination"]["lines_range"], "3-4 of 5");
    let text = value["text"].as_str().unwrap();
    assert!(text.ends_with("Use page=0 for previous page | Use page=2 for next page"));
}

#[test]
fn doc_missing_target_fails() {
    let temp = tempdir().unwrap();
    let output = peek(temp.path())
        .args(["doc", "nothing_here.at_all"])
        .output()
        .expect("command run");
    assert!(!output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stderr).trim_end(),
        "Error: Could not find nothing_here.at_all"
    );
}

#[test]
fn kinds_lists_registry_tables() {
    let temp = tempdir().unwrap();
    let output = peek(temp.path())
        .args(["kinds", "--json"])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let kinds: Vec<&str> = value["kinds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["json", "python", "toml"]);
    assert_eq!(value["kinds"][0]["default_format"], "json-text");
    assert_eq!(value["formats"][2], "text");
}
