use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::process::Command;

/// Environment variable holding extra search roots (OS path-list syntax).
pub const SEARCH_PATH_ENV: &str = "PEEK_PATH";
/// Fallback environment variable consulted after [`SEARCH_PATH_ENV`].
pub const PYTHONPATH_ENV: &str = "PYTHONPATH";
/// Interpreter queried for its `sys.path` when [`SEARCH_PATH_ENV`] is unset; empty disables the query.
pub const PYTHON_ENV: &str = "PEEK_PYTHON";
/// Interpreter used when [`PYTHON_ENV`] is unset.
pub const DEFAULT_PYTHON: &str = "python3";

const SYS_PATH_SCRIPT: &str = "import sys; print('\\n'.join(sys.path))";

/// Configuration for the Python source provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Directories searched, in order, for `pkg/mod.py`, `pkg/mod.pyi` and `pkg/__init__.py`
    pub search_paths: Vec<PathBuf>,

    /// Number of parsed modules kept in memory
    pub cache_capacity: usize,

    /// Maximum number of `from x import y` re-exports followed when locating a declaration
    pub max_import_hops: usize,

    /// Maximum depth of base-class chains walked when collecting inherited members
    pub max_inheritance_depth: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from(".")],
            cache_capacity: 128,
            max_import_hops: 8,
            max_inheritance_depth: 16,
        }
    }
}

impl ProviderConfig {
    /// Build the search path from `PEEK_PATH`, then `PYTHONPATH`, then the current directory.
    ///
    /// Without `PEEK_PATH` the interpreter named by `PEEK_PYTHON` (default `python3`)
    /// is asked for its `sys.path`, which is appended so the standard library and
    /// installed packages resolve.
    pub fn from_env() -> Self {
        let mut search_paths = Vec::new();
        for var in [SEARCH_PATH_ENV, PYTHONPATH_ENV] {
            if let Some(raw) = env::var_os(var) {
                search_paths.extend(env::split_paths(&raw).filter(|p| !p.as_os_str().is_empty()));
            }
        }
        search_paths.push(PathBuf::from("."));
        if env::var_os(SEARCH_PATH_ENV).is_none() {
            let python = env::var(PYTHON_ENV).unwrap_or_else(|_| DEFAULT_PYTHON.to_string());
            if !python.is_empty() {
                search_paths.extend(interpreter_search_paths(&python));
            }
        }
        dedup_preserving_order(&mut search_paths);

        Self {
            search_paths,
            ..Default::default()
        }
    }

    /// Builder: put a directory in front of the search path
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.insert(0, path.into());
        dedup_preserving_order(&mut self.search_paths);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_capacity == 0 {
            return Err("cache_capacity must be > 0".to_string());
        }

        if self.max_import_hops == 0 {
            return Err("max_import_hops must be > 0".to_string());
        }

        Ok(())
    }
}

/// Directories on the `sys.path` of `python`; empty when the interpreter cannot be run.
pub fn interpreter_search_paths(python: &str) -> Vec<PathBuf> {
    let output = match Command::new(python).arg("-c").arg(SYS_PATH_SCRIPT).output() {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            log::warn!(
                "{python} exited with {} while listing sys.path; using configured search paths only",
                output.status
            );
            return Vec::new();
        }
        Err(err) => {
            log::warn!("Cannot run {python} to list sys.path ({err}); using configured search paths only");
            return Vec::new();
        }
    };

    let paths = parse_sys_path(&String::from_utf8_lossy(&output.stdout));
    log::debug!("{python} sys.path: {paths:?}");
    paths
}

/// One directory per line; blank entries (the script directory) are dropped.
fn parse_sys_path(listing: &str) -> Vec<PathBuf> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn dedup_preserving_order(paths: &mut Vec<PathBuf>) {
    let mut seen = Vec::with_capacity(paths.len());
    paths.retain(|path| {
        if seen.contains(path) {
            false
        } else {
            seen.push(path.clone());
            true
        }
    });
}
