use crate::provider::{CallableFlavor, ParamSpec, Signature};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Structural summary of one parsed Python module.
#[derive(Debug, Clone, Default)]
pub(crate) struct ModuleSummary {
    pub(crate) name: String,
    pub(crate) file: Option<PathBuf>,
    pub(crate) is_package: bool,
    /// Directories holding the submodules of a package
    pub(crate) package_dirs: Vec<PathBuf>,
    pub(crate) docstring: Option<String>,
    /// Top-level names; the last binding of a name wins
    pub(crate) bindings: BTreeMap<String, Binding>,
}

/// What a top-level name is bound to
#[derive(Debug, Clone)]
pub(crate) enum Binding {
    Class(ClassDecl),
    Function(FunctionDecl),
    Variable { docstring: Option<String> },
    /// `from module import name`; `module` is already absolute
    ImportFrom { module: String, name: String },
    /// `import a.b as c` binds `c` to `a.b`; `import a.b` binds `a` to `a`
    ImportModule { module: String },
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ClassDecl {
    pub(crate) name: String,
    pub(crate) docstring: Option<String>,
    /// Base class expressions as written (`abc.ABC`, `Generic[T]`)
    pub(crate) bases: Vec<String>,
    pub(crate) methods: BTreeMap<String, FunctionDecl>,
    pub(crate) nested: BTreeMap<String, ClassDecl>,
    /// Class-level variables and properties
    pub(crate) attributes: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone)]
pub(crate) struct FunctionDecl {
    pub(crate) name: String,
    pub(crate) docstring: Option<String>,
    pub(crate) flavor: CallableFlavor,
    pub(crate) params: Vec<ParamSpec>,
    pub(crate) return_type: Option<String>,
}

impl FunctionDecl {
    pub(crate) fn signature(&self) -> Signature {
        Signature {
            flavor: self.flavor,
            params: self.params.clone(),
            return_type: self.return_type.clone(),
        }
    }
}

impl ClassDecl {
    /// Display names of the bases: last dotted component, subscripts dropped
    pub(crate) fn base_names(&self) -> Vec<String> {
        self.bases.iter().map(|base| base_display_name(base)).collect()
    }
}

/// `typing.Generic[T]` → `Generic`, `abc.ABC` → `ABC`
pub(crate) fn base_display_name(expr: &str) -> String {
    let head = base_dotted_path(expr);
    head.rsplit('.').next().unwrap_or(head).to_string()
}

/// Dotted path of a base expression with any subscript or call removed
pub(crate) fn base_dotted_path(expr: &str) -> &str {
    let end = expr.find(['[', '(']).unwrap_or(expr.len());
    expr[..end].trim()
}
