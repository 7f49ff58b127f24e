use serde::{Deserialize, Serialize};

/// Where a class or callable was declared relative to the scope being inspected.
///
/// Fixed once at build time; never recomputed after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "provenance", rename_all = "snake_case")]
pub enum Provenance {
    /// Declared in the scope under inspection
    #[default]
    Local,
    /// Declared elsewhere; `source` is the declaring module
    Imported { source: String },
}

impl Provenance {
    /// Compare the declaring scope of a member against the scope under inspection.
    pub fn from_scopes(declaring_scope: &str, inspected_scope: &str) -> Self {
        if declaring_scope == inspected_scope {
            Self::Local
        } else {
            Self::Imported {
                source: declaring_scope.to_string(),
            }
        }
    }

    #[must_use]
    pub const fn is_imported(&self) -> bool {
        matches!(self, Self::Imported { .. })
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Local => None,
            Self::Imported { source } => Some(source),
        }
    }
}

/// A parameter in a function or method signature
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Short-form type descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<String>,

    /// Literal default, or the opaque placeholder for non-primitive defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: set the type annotation
    #[must_use]
    pub fn typed(mut self, annotation: impl Into<String>) -> Self {
        self.type_annotation = Some(annotation.into());
        self
    }

    /// Builder: set the default value literal
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }
}

/// A function or method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default)]
    pub docstring: String,
    #[serde(default)]
    pub provenance: Provenance,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn is_imported(&self) -> bool {
        self.provenance.is_imported()
    }
}

/// A class with its base classes and methods
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(default)]
    pub docstring: String,
    /// Base class names in declaration order, without the universal root
    pub base_classes: Vec<String>,
    pub methods: Vec<Method>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn is_imported(&self) -> bool {
        self.provenance.is_imported()
    }
}

/// A module (or package) with its declared and imported members
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Dotted module name
    pub name: String,
    #[serde(default)]
    pub docstring: String,
    pub classes: Vec<Class>,
    pub functions: Vec<Method>,
    /// Dotted names of direct submodules (packages only)
    #[serde(default)]
    pub submodules: Vec<String>,
}

impl Module {
    pub fn new(name: impl Into<String>, docstring: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docstring: docstring.into(),
            ..Default::default()
        }
    }

    pub fn local_classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter().filter(|class| !class.is_imported())
    }

    pub fn local_functions(&self) -> impl Iterator<Item = &Method> {
        self.functions.iter().filter(|function| !function.is_imported())
    }
}

/// A resolved name that is neither a class nor a callable; rendered as name + doc only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub docstring: String,
    #[serde(default)]
    pub provenance: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_from_scopes() {
        assert_eq!(Provenance::from_scopes("pkg.a", "pkg.a"), Provenance::Local);

        let imported = Provenance::from_scopes("pkg.b", "pkg.a");
        assert!(imported.is_imported());
        assert_eq!(imported.source(), Some("pkg.b"));
        assert_eq!(Provenance::Local.source(), None);
    }

    #[test]
    fn module_partitions_local_members() {
        let mut module = Module::new("pkg.a", "");
        module.classes.push(Class::new("Local"));
        module.classes.push(Class {
            provenance: Provenance::from_scopes("pkg.b", "pkg.a"),
            ..Class::new("Imported")
        });

        let local: Vec<_> = module.local_classes().map(|c| c.name.as_str()).collect();
        assert_eq!(local, vec!["Local"]);
    }

    #[test]
    fn parameter_builder() {
        let param = Parameter::new("timeout").typed("float").with_default("1.5");
        assert_eq!(param.type_annotation.as_deref(), Some("float"));
        assert_eq!(param.default_value.as_deref(), Some("1.5"));
    }
}
