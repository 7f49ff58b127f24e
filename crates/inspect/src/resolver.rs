use crate::data::DataTarget;
use crate::error::{InspectError, Result};
use peek_source_meta::{is_dotted_name, EntityKind, EntityRef, MetadataError, MetadataProvider};
use serde::{Serialize, Serializer};

/// What a descriptor was resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Module,
    Class,
    Function,
    Attribute,
    DataFile,
    DataPath,
}

impl TargetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Function => "function",
            Self::Attribute => "attribute",
            Self::DataFile => "data-file",
            Self::DataPath => "data-path",
        }
    }

    const fn from_entity(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Module => Self::Module,
            EntityKind::Class => Self::Class,
            EntityKind::Function => Self::Function,
            EntityKind::Attribute => Self::Attribute,
        }
    }
}

impl Serialize for TargetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A code entity located through the metadata provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTarget {
    /// Descriptor as the caller wrote it
    pub descriptor: String,
    pub kind: TargetKind,
    /// Module the entity was looked up in; `None` when the target is a module itself
    pub scope: Option<String>,
    /// Where the entity is declared
    pub entity: EntityRef,
}

/// Outcome of resolving a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Code(CodeTarget),
    Data(DataTarget),
}

impl Resolution {
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Code(target) => target.kind,
            Self::Data(target) if target.has_path() => TargetKind::DataPath,
            Self::Data(_) => TargetKind::DataFile,
        }
    }
}

/// Turns descriptors into resolutions; data files first, then code entities.
pub struct Resolver<'a> {
    provider: &'a dyn MetadataProvider,
}

impl<'a> Resolver<'a> {
    pub fn new(provider: &'a dyn MetadataProvider) -> Self {
        Self { provider }
    }

    pub fn resolve(&self, descriptor: &str) -> Result<Resolution> {
        if let Some(target) = DataTarget::detect(descriptor) {
            log::debug!("'{descriptor}' resolved to a {} file", target.format.as_str());
            return Ok(Resolution::Data(target));
        }
        self.resolve_code(descriptor).map(Resolution::Code)
    }

    /// Resolve a dotted name, trying in order:
    /// the whole name as a module, `module.member`, `module.Class.method`,
    /// then every module prefix (shortest first) followed by an attribute chain.
    ///
    /// When nothing matches, a failure other than "no such name" (a module that
    /// exists but does not parse) is reported in preference to not-found.
    pub fn resolve_code(&self, descriptor: &str) -> Result<CodeTarget> {
        if !is_dotted_name(descriptor) {
            return Err(InspectError::not_found(descriptor));
        }

        let mut attempts = Attempts::default();

        match self.provider.load_module(descriptor) {
            Ok(entity) => {
                return Ok(CodeTarget {
                    descriptor: descriptor.to_string(),
                    kind: TargetKind::Module,
                    scope: None,
                    entity,
                })
            }
            Err(err) => attempts.record(descriptor, err),
        }

        let parts: Vec<&str> = descriptor.split('.').collect();

        if let Some((prefix, name)) = descriptor.rsplit_once('.') {
            match self.member_of_module(prefix, &[name]) {
                Ok(entity) => return Ok(self.code_target(descriptor, prefix, entity)),
                Err(err) => attempts.record(descriptor, err),
            }
        }

        if parts.len() >= 3 {
            let split = parts.len() - 2;
            let module = parts[..split].join(".");
            match self.method_of_class(&module, parts[split], parts[split + 1]) {
                Ok(entity) => return Ok(self.code_target(descriptor, &module, entity)),
                Err(err) => attempts.record(descriptor, err),
            }

            for split in 1..parts.len() - 1 {
                let module = parts[..split].join(".");
                match self.member_of_module(&module, &parts[split..]) {
                    Ok(entity) => return Ok(self.code_target(descriptor, &module, entity)),
                    Err(err) => attempts.record(descriptor, err),
                }
            }
        }

        Err(attempts.into_error(descriptor))
    }

    fn code_target(&self, descriptor: &str, scope: &str, entity: EntityRef) -> CodeTarget {
        let kind = TargetKind::from_entity(entity.kind);
        log::debug!(
            "'{descriptor}' resolved to {} '{}' via '{scope}'",
            kind.as_str(),
            entity.qualified_name()
        );
        CodeTarget {
            descriptor: descriptor.to_string(),
            kind,
            // A module reached through an alias is reported like a direct module target
            scope: (kind != TargetKind::Module).then(|| scope.to_string()),
            entity,
        }
    }

    /// Load `module` and follow `chain` through its members
    fn member_of_module(&self, module: &str, chain: &[&str]) -> peek_source_meta::Result<EntityRef> {
        let mut current = self.provider.load_module(module)?;
        for name in chain {
            current = self.provider.member(&current, name)?.entity;
        }
        Ok(current)
    }

    fn method_of_class(
        &self,
        module: &str,
        class: &str,
        method: &str,
    ) -> peek_source_meta::Result<EntityRef> {
        let scope = self.provider.load_module(module)?;
        let class_ref = self.provider.member(&scope, class)?.entity;
        if class_ref.kind != EntityKind::Class {
            return Err(MetadataError::WrongKind {
                entity: class_ref.qualified_name(),
                expected: "class",
            });
        }
        Ok(self.provider.member(&class_ref, method)?.entity)
    }
}

/// Failures collected while trying resolution strategies
#[derive(Default)]
struct Attempts {
    broken: Option<MetadataError>,
}

impl Attempts {
    fn record(&mut self, descriptor: &str, err: MetadataError) {
        log::debug!("Resolution attempt for '{descriptor}' failed: {err}");
        let broken = !err.is_not_found() && !matches!(err, MetadataError::WrongKind { .. });
        if broken && self.broken.is_none() {
            self.broken = Some(err);
        }
    }

    fn into_error(self, descriptor: &str) -> InspectError {
        match self.broken {
            Some(err) => InspectError::Provider(err),
            None => InspectError::not_found(descriptor),
        }
    }
}
