//! Element trees for code entities, built from [`MetadataProvider`] queries.

use crate::error::{InspectError, Result};
use crate::inspector::PythonInspector;
use crate::resolver::{CodeTarget, TargetKind};
use once_cell::sync::Lazy;
use peek_protocol::{
    Attribute, Class, Element, InspectionResult, Method, Module, Parameter, Provenance,
    ResultKind, META_MODULE, META_SOURCE_FILE,
};
use peek_source_meta::{
    DefaultValue, EntityKind, EntityRef, Member, MetadataProvider, ParamSpec, Signature,
};
use regex::Regex;

/// Rendered in place of defaults that are not simple literals
pub const OPAQUE_DEFAULT: &str = "...";

/// Implicit root base left out of base class listings
const ROOT_BASE: &str = "object";

static TYPING_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btyping\.").expect("valid typing prefix regex"));

/// Builds code element trees; holds no state beyond the provider reference.
pub struct CodeTreeBuilder<'a> {
    provider: &'a dyn MetadataProvider,
}

impl<'a> CodeTreeBuilder<'a> {
    pub fn new(provider: &'a dyn MetadataProvider) -> Self {
        Self { provider }
    }

    pub fn build(&self, target: &CodeTarget) -> Result<InspectionResult> {
        let entity = &target.entity;
        let (kind, element) = match target.kind {
            TargetKind::Class => {
                let inspected = target.scope.as_deref().unwrap_or(&entity.module);
                let class = self.class(entity, Provenance::from_scopes(&entity.module, inspected))?;
                (ResultKind::Class, Element::Class(class))
            }
            TargetKind::Function => {
                let inspected = target.scope.as_deref().unwrap_or(&entity.module);
                let method = self.method(entity, Provenance::from_scopes(&entity.module, inspected))?;
                (ResultKind::Function, Element::Method(method))
            }
            TargetKind::Attribute => {
                let inspected = target.scope.as_deref().unwrap_or(&entity.module);
                let attribute = Attribute {
                    name: entity.name().to_string(),
                    docstring: self.docstring(entity)?,
                    provenance: Provenance::from_scopes(&entity.module, inspected),
                };
                (ResultKind::Attribute, Element::Attribute(attribute))
            }
            TargetKind::Module => (ResultKind::Module, Element::Module(self.module(entity)?)),
            TargetKind::DataFile | TargetKind::DataPath => {
                return Err(InspectError::unsupported(
                    &target.descriptor,
                    PythonInspector::KIND,
                ));
            }
        };

        let mut result = InspectionResult::single(&target.descriptor, kind, element);
        if let Some(scope) = &target.scope {
            result = result.with_metadata(META_MODULE, scope.clone());
        }
        if let Some(file) = self.provider.source_file(&entity.module) {
            result = result.with_metadata(META_SOURCE_FILE, file.display().to_string());
        }
        Ok(result)
    }

    /// Module view: local and imported classes and functions, plus submodule names
    fn module(&self, entity: &EntityRef) -> Result<Module> {
        let name = &entity.module;
        let mut module = Module::new(name, self.docstring(entity)?);

        if self.provider.is_package(name)? {
            module.submodules = self.provider.submodules(name)?;
        }

        for member in self.provider.members(entity)? {
            let provenance = Provenance::from_scopes(&self.provider.declaring_scope(&member), name);
            match member.kind() {
                EntityKind::Class => module.classes.push(self.class(&member.entity, provenance)?),
                EntityKind::Function => {
                    module.functions.push(self.method(&member.entity, provenance)?)
                }
                EntityKind::Module | EntityKind::Attribute => {}
            }
        }

        log::debug!(
            "Module '{name}': {} classes, {} functions, {} submodules",
            module.classes.len(),
            module.functions.len(),
            module.submodules.len()
        );
        Ok(module)
    }

    fn class(&self, entity: &EntityRef, provenance: Provenance) -> Result<Class> {
        let mut class = Class::new(entity.name());
        class.docstring = self.docstring(entity)?;
        class.base_classes = self
            .provider
            .bases(entity)?
            .into_iter()
            .filter(|base| base != ROOT_BASE)
            .collect();
        class.provenance = provenance;

        for member in self.provider.members(entity)? {
            if member.kind() != EntityKind::Function || !is_listed_method(&member) {
                continue;
            }
            let provenance =
                Provenance::from_scopes(&self.provider.declaring_scope(&member), &entity.module);
            class.methods.push(self.method(&member.entity, provenance)?);
        }
        Ok(class)
    }

    fn method(&self, entity: &EntityRef, provenance: Provenance) -> Result<Method> {
        let name = entity.name();
        let signature = self.provider.signature(entity)?;

        let mut method = Method::new(name);
        method.docstring = self.docstring(entity)?;
        method.parameters = parameters(name, &signature);
        method.return_type = signature.return_type.as_deref().map(short_type);
        method.provenance = provenance;
        Ok(method)
    }

    fn docstring(&self, entity: &EntityRef) -> Result<String> {
        Ok(self.provider.documentation(entity)?.unwrap_or_default())
    }
}

/// Dunder methods are hidden, except the constructor
fn is_listed_method(member: &Member) -> bool {
    let name = member.name.as_str();
    name == "__init__" || !(name.len() > 4 && name.starts_with("__") && name.ends_with("__"))
}

/// Parameters as shown to the reader; the implicitly bound first parameter is dropped
fn parameters(name: &str, signature: &Signature) -> Vec<Parameter> {
    let skip = usize::from(signature.flavor.binds_first_parameter() && name != "__init__");
    signature
        .params
        .iter()
        .skip(skip)
        .map(parameter)
        .collect()
}

fn parameter(declared: &ParamSpec) -> Parameter {
    let mut param = Parameter::new(&declared.name);
    if let Some(annotation) = &declared.annotation {
        param = param.typed(short_type(annotation));
    }
    match &declared.default {
        Some(DefaultValue::Literal(text)) => param.with_default(text.clone()),
        Some(DefaultValue::Expression(_)) => param.with_default(OPAQUE_DEFAULT),
        None => param,
    }
}

/// `typing.Optional[typing.List[int]]` → `Optional[List[int]]`
pub fn short_type(annotation: &str) -> String {
    TYPING_PREFIX.replace_all(annotation.trim(), "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Resolver;
    use peek_source_meta::{ProviderConfig, PythonProvider};
    use pretty_assertions::assert_eq;

    const GEOMETRY: &str = r#"
"""Geometry helpers."""
import typing
from typing import Optional
from math import sqrt
from geo.base import Shape


class Circle(Shape):
    """A circle."""

    def __init__(self, radius: float = 1.0):
        pass

    def __repr__(self):
        pass

    def area(self) -> float:
        """Area."""

    @classmethod
    def unit(cls, scale=-2):
        pass

    @staticmethod
    def parse(text: str, strict=True, *args, **kwargs) -> "Circle":
        pass


class Square:
    def __private(self):
        pass


def distance(a: typing.Tuple[float, float], b: Optional[typing.List[int]] = None, *, eps=SENTINEL) -> float:
    """Distance between points."""
"#;

    fn provider() -> PythonProvider {
        PythonProvider::new(ProviderConfig {
            search_paths: Vec::new(),
            ..Default::default()
        })
        .unwrap()
        .with_package("geo", "\"\"\"Geo package.\"\"\"\nfrom geo.shapes import Circle\n")
        .with_source("geo.shapes", GEOMETRY)
        .with_source(
            "geo.base",
            "class Shape(object):\n    def describe(self, verbose=False):\n        \"\"\"Describe.\"\"\"\n",
        )
    }

    fn build(descriptor: &str) -> InspectionResult {
        let provider = provider();
        let target = Resolver::new(&provider).resolve_code(descriptor).unwrap();
        CodeTreeBuilder::new(&provider).build(&target).unwrap()
    }

    #[test]
    fn module_partitions_members() {
        let result = build("geo.shapes");
        assert_eq!(result.name, "geo.shapes");
        assert_eq!(result.kind, ResultKind::Module);
        assert_eq!(result.metadata_value(META_MODULE), None);

        let Element::Module(module) = &result.elements[0] else {
            panic!("expected module");
        };
        assert_eq!(module.docstring, "Geometry helpers.");
        let local: Vec<_> = module.local_classes().map(|c| c.name.as_str()).collect();
        assert_eq!(local, vec!["Circle", "Square"]);
        let imported: Vec<_> = module
            .classes
            .iter()
            .filter_map(|c| c.provenance.source().map(|s| (c.name.as_str(), s)))
            .collect();
        assert_eq!(imported, vec![("Shape", "geo.base")]);
        let functions: Vec<_> = module.local_functions().map(|f| f.name.as_str()).collect();
        assert_eq!(functions, vec!["distance"]);
    }

    #[test]
    fn package_lists_submodules() {
        let result = build("geo");
        let Element::Module(module) = &result.elements[0] else {
            panic!("expected module");
        };
        assert_eq!(module.submodules, vec!["geo.base", "geo.shapes"]);
        assert_eq!(module.classes[0].provenance.source(), Some("geo.shapes"));
    }

    #[test]
    fn class_methods_and_bases() {
        let result = build("geo.shapes.Circle");
        assert_eq!(result.kind, ResultKind::Class);
        assert_eq!(result.metadata_value(META_MODULE), Some("geo.shapes"));

        let Element::Class(class) = &result.elements[0] else {
            panic!("expected class");
        };
        assert_eq!(class.base_classes, vec!["Shape"]);
        assert_eq!(class.provenance, Provenance::Local);

        let names: Vec<_> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["__init__", "area", "describe", "parse", "unit"]);

        let init = &class.methods[0];
        assert_eq!(
            init.parameters,
            vec![
                Parameter::new("self"),
                Parameter::new("radius").typed("float").with_default("1.0"),
            ]
        );

        let describe = &class.methods[2];
        assert_eq!(describe.provenance.source(), Some("geo.base"));
        assert_eq!(describe.parameters, vec![Parameter::new("verbose").with_default("False")]);

        let parse = &class.methods[3];
        let params: Vec<_> = parse.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["text", "strict", "*args", "**kwargs"]);

        let unit = &class.methods[4];
        assert_eq!(unit.parameters, vec![Parameter::new("scale").with_default("-2")]);
    }

    #[test]
    fn base_classes_exclude_root() {
        let result = build("geo.base.Shape");
        let Element::Class(class) = &result.elements[0] else {
            panic!("expected class");
        };
        assert!(class.base_classes.is_empty());
    }

    #[test]
    fn reexported_class_is_imported() {
        let result = build("geo.Circle");
        let Element::Class(class) = &result.elements[0] else {
            panic!("expected class");
        };
        assert_eq!(class.provenance.source(), Some("geo.shapes"));
    }

    #[test]
    fn function_signature_short_types_and_opaque_defaults() {
        let result = build("geo.shapes.distance");
        assert_eq!(result.kind, ResultKind::Function);
        let Element::Method(function) = &result.elements[0] else {
            panic!("expected function");
        };
        assert_eq!(function.docstring, "Distance between points.");
        assert_eq!(function.return_type.as_deref(), Some("float"));
        assert_eq!(
            function.parameters,
            vec![
                Parameter::new("a").typed("Tuple[float, float]"),
                Parameter::new("b")
                    .typed("Optional[List[int]]")
                    .with_default("None"),
                Parameter::new("eps").with_default(OPAQUE_DEFAULT),
            ]
        );
    }

    #[test]
    fn method_target_drops_bound_parameter() {
        let result = build("geo.shapes.Circle.area");
        let Element::Method(method) = &result.elements[0] else {
            panic!("expected method");
        };
        assert!(method.parameters.is_empty());
        assert_eq!(method.return_type.as_deref(), Some("float"));
    }

    #[test]
    fn short_type_strips_only_typing_namespace() {
        assert_eq!(short_type("typing.Dict[str, typing.Any]"), "Dict[str, Any]");
        assert_eq!(short_type("mytyping.Thing"), "mytyping.Thing");
        assert_eq!(short_type("int"), "int");
    }

    #[test]
    fn data_targets_are_rejected() {
        let provider = provider();
        let target = CodeTarget {
            descriptor: "stock.json:a.b".to_string(),
            kind: TargetKind::DataPath,
            scope: None,
            entity: EntityRef::module("geo"),
        };
        let err = CodeTreeBuilder::new(&provider).build(&target).unwrap_err();
        assert!(matches!(err, InspectError::UnsupportedTarget { .. }));
        assert_eq!(
            err.to_string(),
            "Target 'stock.json:a.b' is not supported by the python inspector"
        );
    }
}
