//! Python source provider: locates modules on the search path, parses them with
//! tree-sitter and answers [`MetadataProvider`] queries from the parsed summaries.

mod docstring;
mod parser;
mod summary;

use crate::config::ProviderConfig;
use crate::error::{MetadataError, Result};
use crate::language::{is_dotted_name, module_candidates, SourceKind};
use crate::provider::{EntityKind, EntityRef, Member, MetadataProvider, Signature};
use lru::LruCache;
use parser::SourceParser;
use std::collections::BTreeMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use summary::{base_dotted_path, Binding, ClassDecl, FunctionDecl, ModuleSummary};

/// In-memory module source registered instead of a file
#[derive(Debug, Clone)]
struct Overlay {
    source: String,
    is_package: bool,
}

/// Where a module's source was found
enum Location {
    Overlay(Overlay),
    File { path: PathBuf, is_package: bool },
    /// Directory without `__init__` (implicit namespace package)
    Namespace(Vec<PathBuf>),
}

/// [`MetadataProvider`] backed by Python sources and stubs
pub struct PythonProvider {
    config: ProviderConfig,
    overlays: BTreeMap<String, Overlay>,
    cache: Mutex<LruCache<String, Arc<ModuleSummary>>>,
}

impl PythonProvider {
    /// Create provider with configuration
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate().map_err(MetadataError::invalid_config)?;
        let capacity = NonZeroUsize::new(config.cache_capacity)
            .ok_or_else(|| MetadataError::invalid_config("cache_capacity must be > 0"))?;

        Ok(Self {
            config,
            overlays: BTreeMap::new(),
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Provider over the search path taken from the environment
    pub fn from_env() -> Result<Self> {
        Self::new(ProviderConfig::from_env())
    }

    /// Register an in-memory module that shadows anything on disk
    #[must_use]
    pub fn with_source(mut self, module: impl Into<String>, source: impl Into<String>) -> Self {
        self.add_overlay(module.into(), source.into(), false);
        self
    }

    /// Register an in-memory package (`__init__` source)
    #[must_use]
    pub fn with_package(mut self, module: impl Into<String>, source: impl Into<String>) -> Self {
        self.add_overlay(module.into(), source.into(), true);
        self
    }

    fn add_overlay(&mut self, module: String, source: String, is_package: bool) {
        self.lock_cache().pop(&module);
        self.overlays
            .insert(module, Overlay { source, is_package });
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn lock_cache(&self) -> MutexGuard<'_, LruCache<String, Arc<ModuleSummary>>> {
        // The cache only holds immutable summaries, so a poisoned lock is still usable
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn locate(&self, module: &str) -> Option<Location> {
        if let Some(overlay) = self.overlays.get(module) {
            return Some(Location::Overlay(overlay.clone()));
        }

        let mut namespace_dirs = Vec::new();
        for root in &self.config.search_paths {
            for (path, is_package) in module_candidates(root, module) {
                if path.is_file() {
                    return Some(Location::File { path, is_package });
                }
            }
            let dir = module
                .split('.')
                .fold(root.clone(), |dir, part| dir.join(part));
            if dir.is_dir() {
                namespace_dirs.push(dir);
            }
        }

        if namespace_dirs.is_empty() {
            None
        } else {
            Some(Location::Namespace(namespace_dirs))
        }
    }

    /// Parsed summary of a module, loading it on first use
    fn summary(&self, module: &str) -> Result<Arc<ModuleSummary>> {
        if !is_dotted_name(module) {
            return Err(MetadataError::module_not_found(module));
        }
        if let Some(summary) = self.lock_cache().get(module) {
            return Ok(Arc::clone(summary));
        }

        let location = self
            .locate(module)
            .ok_or_else(|| MetadataError::module_not_found(module))?;

        let summary = match location {
            Location::Overlay(overlay) => {
                log::debug!("Loading module '{module}' from in-memory source");
                let display = PathBuf::from(format!("<{module}>"));
                let mut summary = SourceParser::new(SourceKind::Module)?.parse_module(
                    module,
                    &display,
                    overlay.is_package,
                    &overlay.source,
                )?;
                summary.file = None;
                summary
            }
            Location::File { path, is_package } => {
                log::debug!("Loading module '{module}' from {}", path.display());
                let content = fs::read_to_string(&path)?;
                let mut summary = SourceParser::new(SourceKind::from_path(&path))?
                    .parse_module(module, &path, is_package, &content)?;
                if is_package {
                    summary.package_dirs = path.parent().map(|p| p.to_path_buf()).into_iter().collect();
                }
                summary
            }
            Location::Namespace(dirs) => {
                log::debug!("Module '{module}' is a namespace package");
                ModuleSummary {
                    name: module.to_string(),
                    is_package: true,
                    package_dirs: dirs,
                    ..Default::default()
                }
            }
        };

        let summary = Arc::new(summary);
        self.lock_cache()
            .put(module.to_string(), Arc::clone(&summary));
        Ok(summary)
    }

    /// Resolve a name bound at module level to the entity it denotes,
    /// following `from x import y` re-exports up to `hops` times.
    fn resolve_binding(&self, module: &str, name: &str, hops: usize) -> Result<EntityRef> {
        let summary = self.summary(module)?;
        let scope = EntityRef::module(module);

        match summary.bindings.get(name) {
            Some(Binding::Class(_)) => Ok(scope.child(name, EntityKind::Class)),
            Some(Binding::Function(_)) => Ok(scope.child(name, EntityKind::Function)),
            Some(Binding::Variable { .. }) => Ok(scope.child(name, EntityKind::Attribute)),
            Some(Binding::ImportModule { module: target }) => self.load_module(target),
            Some(Binding::ImportFrom {
                module: source,
                name: imported,
            }) => {
                if hops == 0 {
                    log::debug!("Import chain for '{module}.{name}' exceeds the hop limit");
                    return Err(MetadataError::attribute_not_found(module, name));
                }
                match self.resolve_binding(source, imported, hops - 1) {
                    Ok(entity) => Ok(entity),
                    Err(err) if err.is_not_found() => {
                        self.load_module(&format!("{source}.{imported}"))
                            .map_err(|_| err)
                    }
                    Err(err) => Err(err),
                }
            }
            None => Err(MetadataError::attribute_not_found(module, name)),
        }
    }

    /// Resolve a dotted expression (`Base`, `abc.ABC`, `mod.Outer.Inner`) in a module's namespace
    fn resolve_expression(&self, module: &str, expr: &str) -> Result<EntityRef> {
        let mut parts = expr.split('.');
        let head = parts.next().unwrap_or(expr);
        let mut entity = self.resolve_binding(module, head, self.config.max_import_hops)?;

        for part in parts {
            entity = match entity.kind {
                EntityKind::Module => {
                    self.resolve_binding(&entity.module, part, self.config.max_import_hops)
                        .or_else(|_| self.load_module(&format!("{}.{part}", entity.module)))?
                }
                EntityKind::Class => {
                    let summary = self.summary(&entity.module)?;
                    let class = class_decl(&summary, &entity)?;
                    if class.nested.contains_key(part) {
                        entity.child(part, EntityKind::Class)
                    } else {
                        return Err(MetadataError::attribute_not_found(
                            entity.qualified_name(),
                            part,
                        ));
                    }
                }
                _ => {
                    return Err(MetadataError::attribute_not_found(
                        entity.qualified_name(),
                        part,
                    ))
                }
            };
        }
        Ok(entity)
    }

    fn module_members(&self, module: &str) -> Result<Vec<Member>> {
        let summary = self.summary(module)?;
        let mut members = Vec::with_capacity(summary.bindings.len());
        for name in summary.bindings.keys() {
            match self.resolve_binding(module, name, self.config.max_import_hops) {
                Ok(entity) => members.push(Member::new(name.clone(), entity)),
                Err(err) => log::debug!("Skipping '{module}.{name}': {err}"),
            }
        }
        Ok(members)
    }

    /// Own members of a class followed by inherited ones, closest base first
    fn class_members(&self, class: &EntityRef, depth: usize) -> Result<BTreeMap<String, Member>> {
        let summary = self.summary(&class.module)?;
        let decl = class_decl(&summary, class)?;

        let mut members = BTreeMap::new();
        for name in decl.methods.keys() {
            members.insert(
                name.clone(),
                Member::new(name.clone(), class.child(name.clone(), EntityKind::Function)),
            );
        }
        for name in decl.nested.keys() {
            members.insert(
                name.clone(),
                Member::new(name.clone(), class.child(name.clone(), EntityKind::Class)),
            );
        }
        for name in decl.attributes.keys() {
            members.insert(
                name.clone(),
                Member::new(name.clone(), class.child(name.clone(), EntityKind::Attribute)),
            );
        }

        if depth >= self.config.max_inheritance_depth {
            log::debug!(
                "Inheritance depth limit reached at '{}'",
                class.qualified_name()
            );
            return Ok(members);
        }

        for base in &decl.bases {
            let base_ref = match self.resolve_expression(&class.module, base_dotted_path(base)) {
                Ok(entity) if entity.kind == EntityKind::Class => entity,
                Ok(_) => continue,
                Err(err) => {
                    log::debug!(
                        "Base '{base}' of '{}' not resolvable: {err}",
                        class.qualified_name()
                    );
                    continue;
                }
            };
            if base_ref == *class {
                continue;
            }
            for (name, member) in self.class_members(&base_ref, depth + 1)? {
                members.entry(name).or_insert(member);
            }
        }

        Ok(members)
    }

    fn function_decl(&self, callable: &EntityRef) -> Result<FunctionDecl> {
        let summary = self.summary(&callable.module)?;
        let wrong_kind = || MetadataError::WrongKind {
            entity: callable.qualified_name(),
            expected: "callable",
        };

        match callable.path.as_slice() {
            [] => Err(wrong_kind()),
            [name] => match summary.bindings.get(name) {
                Some(Binding::Function(function)) => Ok(function.clone()),
                Some(_) => Err(wrong_kind()),
                None => Err(MetadataError::attribute_not_found(&callable.module, name)),
            },
            [owner @ .., name] => {
                let class = class_decl_at(&summary, &callable.module, owner)?;
                class.methods.get(name).cloned().ok_or_else(|| {
                    if class.attributes.contains_key(name) || class.nested.contains_key(name) {
                        wrong_kind()
                    } else {
                        MetadataError::attribute_not_found(owner.join("."), name)
                    }
                })
            }
        }
    }
}

/// Class declaration an entity reference points at
fn class_decl<'a>(summary: &'a ModuleSummary, class: &EntityRef) -> Result<&'a ClassDecl> {
    class_decl_at(summary, &class.module, &class.path)
}

fn class_decl_at<'a>(
    summary: &'a ModuleSummary,
    module: &str,
    path: &[String],
) -> Result<&'a ClassDecl> {
    let not_class = || MetadataError::WrongKind {
        entity: format!("{module}.{}", path.join(".")),
        expected: "class",
    };

    let (first, rest) = path.split_first().ok_or_else(not_class)?;
    let mut class = match summary.bindings.get(first) {
        Some(Binding::Class(class)) => class,
        Some(_) => return Err(not_class()),
        None => return Err(MetadataError::attribute_not_found(module, first)),
    };
    for part in rest {
        class = class
            .nested
            .get(part)
            .ok_or_else(|| MetadataError::attribute_not_found(&class.name, part))?;
    }
    Ok(class)
}

impl MetadataProvider for PythonProvider {
    fn load_module(&self, name: &str) -> Result<EntityRef> {
        self.summary(name)?;
        Ok(EntityRef::module(name))
    }

    fn is_package(&self, module: &str) -> Result<bool> {
        Ok(self.summary(module)?.is_package)
    }

    fn submodules(&self, module: &str) -> Result<Vec<String>> {
        let summary = self.summary(module)?;
        if !summary.is_package {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for dir in &summary.package_dirs {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(err) => {
                    log::debug!("Cannot list {}: {err}", dir.display());
                    continue;
                }
            };
            for entry in entries.flatten() {
                let path = entry.path();
                let name = if path.is_dir() {
                    let has_init = ["__init__.py", "__init__.pyi"]
                        .iter()
                        .any(|init| path.join(init).is_file());
                    if !has_init {
                        continue;
                    }
                    path.file_name().and_then(|n| n.to_str()).map(str::to_string)
                } else if SourceKind::from_path(&path) != SourceKind::Unknown {
                    path.file_stem().and_then(|n| n.to_str()).map(str::to_string)
                } else {
                    None
                };
                if let Some(name) = name.filter(|n| n != "__init__" && is_dotted_name(n)) {
                    names.push(format!("{module}.{name}"));
                }
            }
        }

        let prefix = format!("{module}.");
        names.extend(
            self.overlays
                .keys()
                .filter(|key| {
                    key.strip_prefix(&prefix)
                        .is_some_and(|rest| !rest.contains('.'))
                })
                .cloned(),
        );

        names.sort();
        names.dedup();
        Ok(names)
    }

    fn members(&self, scope: &EntityRef) -> Result<Vec<Member>> {
        match scope.kind {
            EntityKind::Module => self.module_members(&scope.module),
            EntityKind::Class => Ok(self.class_members(scope, 0)?.into_values().collect()),
            _ => Ok(Vec::new()),
        }
    }

    fn member(&self, scope: &EntityRef, name: &str) -> Result<Member> {
        match scope.kind {
            EntityKind::Module => {
                let entity = self.resolve_binding(&scope.module, name, self.config.max_import_hops)?;
                Ok(Member::new(name, entity))
            }
            EntityKind::Class => self
                .class_members(scope, 0)?
                .remove(name)
                .ok_or_else(|| MetadataError::attribute_not_found(scope.qualified_name(), name)),
            _ => Err(MetadataError::attribute_not_found(
                scope.qualified_name(),
                name,
            )),
        }
    }

    fn documentation(&self, entity: &EntityRef) -> Result<Option<String>> {
        let summary = self.summary(&entity.module)?;
        match entity.kind {
            EntityKind::Module => Ok(summary.docstring.clone()),
            EntityKind::Class => Ok(class_decl(&summary, entity)?.docstring.clone()),
            EntityKind::Function => Ok(self.function_decl(entity)?.docstring),
            EntityKind::Attribute => match entity.path.as_slice() {
                [name] => match summary.bindings.get(name) {
                    Some(Binding::Variable { docstring }) => Ok(docstring.clone()),
                    _ => Ok(None),
                },
                [owner @ .., name] => {
                    let class = class_decl_at(&summary, &entity.module, owner)?;
                    Ok(class.attributes.get(name).cloned().flatten())
                }
                [] => Ok(None),
            },
        }
    }

    fn signature(&self, callable: &EntityRef) -> Result<Signature> {
        Ok(self.function_decl(callable)?.signature())
    }

    fn bases(&self, class: &EntityRef) -> Result<Vec<String>> {
        let summary = self.summary(&class.module)?;
        Ok(class_decl(&summary, class)?.base_names())
    }

    fn source_file(&self, module: &str) -> Option<PathBuf> {
        self.summary(module).ok().and_then(|summary| summary.file.clone())
    }
}
