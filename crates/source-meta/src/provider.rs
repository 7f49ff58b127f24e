use crate::error::{MetadataError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Structural kind of a named entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Module,
    Class,
    Function,
    /// Anything bound to a name that is neither a module, a class nor a callable
    Attribute,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Function => "function",
            Self::Attribute => "attribute",
        }
    }
}

/// Canonical location of a declared entity: the declaring module plus the
/// qualified path inside it (empty for the module itself).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub module: String,
    pub path: Vec<String>,
    pub kind: EntityKind,
}

impl EntityRef {
    pub fn module(name: impl Into<String>) -> Self {
        Self {
            module: name.into(),
            path: Vec::new(),
            kind: EntityKind::Module,
        }
    }

    /// Reference to a name declared directly inside this entity
    #[must_use]
    pub fn child(&self, name: impl Into<String>, kind: EntityKind) -> Self {
        let mut path = self.path.clone();
        path.push(name.into());
        Self {
            module: self.module.clone(),
            path,
            kind,
        }
    }

    /// Last path component, or the module name for modules
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.last().map_or(self.module.as_str(), String::as_str)
    }

    /// Fully qualified dotted name (`pkg.mod.Class.method`)
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.path.is_empty() {
            self.module.clone()
        } else {
            format!("{}.{}", self.module, self.path.join("."))
        }
    }

    #[must_use]
    pub fn is_module(&self) -> bool {
        self.kind == EntityKind::Module
    }
}

/// A name bound inside a scope, together with the entity it refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Name under which the entity is bound in the enumerated scope
    pub name: String,
    pub entity: EntityRef,
}

impl Member {
    pub fn new(name: impl Into<String>, entity: EntityRef) -> Self {
        Self {
            name: name.into(),
            entity,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.entity.kind
    }
}

/// How a callable binds its first parameter when reached through its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallableFlavor {
    /// Module-level function
    Function,
    /// Plain method; the first parameter receives the instance
    Instance,
    /// `@classmethod`; the first parameter receives the class
    ClassMethod,
    /// `@staticmethod`; nothing is bound
    Static,
}

impl CallableFlavor {
    /// Whether the first positional parameter is bound implicitly
    #[must_use]
    pub const fn binds_first_parameter(self) -> bool {
        matches!(self, Self::Instance | Self::ClassMethod)
    }
}

/// Default value of a parameter as written in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum DefaultValue {
    /// String, integer, float, boolean or `None` literal
    Literal(String),
    /// Any other expression
    Expression(String),
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Name; variadic parameters keep their `*` / `**` prefix
    pub name: String,
    pub annotation: Option<String>,
    pub default: Option<DefaultValue>,
}

/// Declared signature of a callable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub flavor: CallableFlavor,
    pub params: Vec<ParamSpec>,
    pub return_type: Option<String>,
}

/// Capability interface over a named-entity environment.
///
/// Resolvers and tree builders depend only on this trait; the shipped implementation
/// parses Python sources, tests may substitute in-memory environments.
pub trait MetadataProvider: Send + Sync {
    /// Load a module by dotted name.
    ///
    /// Fails with [`MetadataError::ModuleNotFound`] when nothing matches and with
    /// another error when the module exists but cannot be loaded.
    fn load_module(&self, name: &str) -> Result<EntityRef>;

    /// Whether the module is a package (has sub-locations)
    fn is_package(&self, module: &str) -> Result<bool>;

    /// Dotted names of direct submodules, without loading them
    fn submodules(&self, module: &str) -> Result<Vec<String>>;

    /// Members bound in a module or class scope, ordered by name.
    ///
    /// Class scopes include members inherited from resolvable base classes.
    fn members(&self, scope: &EntityRef) -> Result<Vec<Member>>;

    /// Look up one member of a scope
    fn member(&self, scope: &EntityRef, name: &str) -> Result<Member> {
        self.members(scope)?
            .into_iter()
            .find(|member| member.name == name)
            .ok_or_else(|| MetadataError::attribute_not_found(scope.qualified_name(), name))
    }

    /// Cleaned documentation string, if the entity has one
    fn documentation(&self, entity: &EntityRef) -> Result<Option<String>>;

    /// Declared signature of a callable
    fn signature(&self, callable: &EntityRef) -> Result<Signature>;

    /// Base class names of a class, in declaration order (as written, last component)
    fn bases(&self, class: &EntityRef) -> Result<Vec<String>>;

    /// Module in which a member is declared
    fn declaring_scope(&self, member: &Member) -> String {
        member.entity.module.clone()
    }

    /// Source file a module was loaded from, when it came from disk
    fn source_file(&self, _module: &str) -> Option<PathBuf> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ref_names() {
        let module = EntityRef::module("pkg.shapes");
        assert_eq!(module.name(), "pkg.shapes");
        assert!(module.is_module());

        let method = module
            .child("Circle", EntityKind::Class)
            .child("area", EntityKind::Function);
        assert_eq!(method.name(), "area");
        assert_eq!(method.qualified_name(), "pkg.shapes.Circle.area");
        assert_eq!(method.kind.as_str(), "function");
    }

    #[test]
    fn flavor_binding() {
        assert!(CallableFlavor::Instance.binds_first_parameter());
        assert!(CallableFlavor::ClassMethod.binds_first_parameter());
        assert!(!CallableFlavor::Static.binds_first_parameter());
        assert!(!CallableFlavor::Function.binds_first_parameter());
    }

    #[test]
    fn declaring_scope_is_entity_module() {
        struct Empty;
        impl MetadataProvider for Empty {
            fn load_module(&self, name: &str) -> Result<EntityRef> {
                Err(MetadataError::module_not_found(name))
            }
            fn is_package(&self, _module: &str) -> Result<bool> {
                Ok(false)
            }
            fn submodules(&self, _module: &str) -> Result<Vec<String>> {
                Ok(Vec::new())
            }
            fn members(&self, _scope: &EntityRef) -> Result<Vec<Member>> {
                Ok(Vec::new())
            }
            fn documentation(&self, _entity: &EntityRef) -> Result<Option<String>> {
                Ok(None)
            }
            fn signature(&self, callable: &EntityRef) -> Result<Signature> {
                Err(MetadataError::WrongKind {
                    entity: callable.qualified_name(),
                    expected: "callable",
                })
            }
            fn bases(&self, _class: &EntityRef) -> Result<Vec<String>> {
                Ok(Vec::new())
            }
        }

        let member = Member::new(
            "Path",
            EntityRef::module("pathlib").child("Path", EntityKind::Class),
        );
        assert_eq!(Empty.declaring_scope(&member), "pathlib");

        let missing = Empty.member(&EntityRef::module("pkg"), "nope").unwrap_err();
        assert!(missing.is_not_found());
    }
}
