use crate::error::{RenderError, Result};
use crate::limits::{truncate_docstring, RenderLimits};
use crate::renderer::{element_tag, push_header, Renderer};
use peek_protocol::{Attribute, Class, Element, InspectionResult, Method, Module, Parameter};
use std::collections::BTreeMap;

/// Plain-text view of modules, classes and functions
#[derive(Debug, Clone, Default)]
pub struct CodeTextRenderer {
    limits: RenderLimits,
}

impl CodeTextRenderer {
    pub const NAME: &'static str = "text";

    pub fn new(limits: RenderLimits) -> Self {
        Self { limits }
    }

    fn render_module(&self, module: &Module, out: &mut Vec<String>) {
        if !module.docstring.is_empty() {
            let doc = truncate_docstring(&module.docstring, self.limits.docstring_lines);
            out.push(format!("Description: {doc}"));
            out.push(String::new());
        }

        if !module.submodules.is_empty() {
            out.push("Submodules:".to_string());
            out.extend(module.submodules.iter().map(|name| format!("  {name}")));
            out.push(String::new());
        }

        let classes: Vec<&Class> = module.local_classes().collect();
        if !classes.is_empty() {
            out.push("Classes:".to_string());
            out.push("-".repeat(7));
            for class in classes {
                out.push(format!("  {}", class_declaration(class)));
            }
            out.push(String::new());
        }

        let functions: Vec<&Method> = module.local_functions().collect();
        if !functions.is_empty() {
            out.push("Functions:".to_string());
            out.push("-".repeat(9));
            for function in functions {
                out.push(format!("  {}", signature(function)));
            }
            out.push(String::new());
        }

        push_imported_groups(
            "Imported Classes:",
            module
                .classes
                .iter()
                .filter_map(|c| c.provenance.source().map(|src| (src, c.name.as_str()))),
            out,
        );
        push_imported_groups(
            "Imported Functions:",
            module
                .functions
                .iter()
                .filter_map(|f| f.provenance.source().map(|src| (src, f.name.as_str()))),
            out,
        );
    }

    fn render_class(&self, class: &Class, out: &mut Vec<String>) {
        let mut declaration = class_declaration(class);
        if let Some(source) = class.provenance.source() {
            declaration.push_str(&format!(" [imported from {source}]"));
        }
        out.push(declaration);

        if !class.docstring.is_empty() {
            let doc = truncate_docstring(&class.docstring, self.limits.target_docstring_lines);
            out.push(format!("  Description: {doc}"));
        }

        if !class.methods.is_empty() {
            out.push("  Methods:".to_string());
            for method in &class.methods {
                let mut line = format!("    {}", signature(method));
                if let Some(source) = method.provenance.source() {
                    line.push_str(&format!(" [imported from {source}]"));
                }
                out.push(line);
            }
        }

        out.push(String::new());
    }

    fn render_function(&self, function: &Method, out: &mut Vec<String>) {
        let mut line = signature(function);
        if let Some(source) = function.provenance.source() {
            line.push_str(&format!(" [imported from {source}]"));
        }
        out.push(line);

        if !function.docstring.is_empty() {
            let doc = truncate_docstring(&function.docstring, self.limits.target_docstring_lines);
            out.push(format!("  Description: {doc}"));
        }

        out.push(String::new());
    }

    fn render_attribute(&self, attribute: &Attribute, out: &mut Vec<String>) {
        let mut line = attribute.name.clone();
        if let Some(source) = attribute.provenance.source() {
            line.push_str(&format!(" [imported from {source}]"));
        }
        out.push(line);

        if !attribute.docstring.is_empty() {
            let doc = truncate_docstring(&attribute.docstring, self.limits.target_docstring_lines);
            out.push(format!("  Description: {doc}"));
        }

        out.push(String::new());
    }
}

impl Renderer for CodeTextRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn render(&self, result: &InspectionResult) -> Result<String> {
        if result.elements.is_empty() {
            return Err(RenderError::EmptyResult(result.name.clone()));
        }

        let mut out = Vec::new();
        push_header(result, &mut out);

        for element in &result.elements {
            match element {
                Element::Module(module) => self.render_module(module, &mut out),
                Element::Class(class) => self.render_class(class, &mut out),
                Element::Method(method) => self.render_function(method, &mut out),
                Element::Attribute(attribute) => self.render_attribute(attribute, &mut out),
                Element::Data(_) => {
                    return Err(RenderError::unsupported(Self::NAME, element_tag(element)))
                }
            }
        }

        Ok(out.join("\n"))
    }
}

/// `class Name(Base, Other)`
fn class_declaration(class: &Class) -> String {
    if class.base_classes.is_empty() {
        format!("class {}", class.name)
    } else {
        format!("class {}({})", class.name, class.base_classes.join(", "))
    }
}

/// `def name(a: int, b = 1) -> str`
fn signature(method: &Method) -> String {
    let params = method
        .parameters
        .iter()
        .map(parameter)
        .collect::<Vec<_>>()
        .join(", ");
    match &method.return_type {
        Some(ret) => format!("def {}({params}) -> {ret}", method.name),
        None => format!("def {}({params})", method.name),
    }
}

fn parameter(param: &Parameter) -> String {
    let mut text = param.name.clone();
    if let Some(annotation) = &param.type_annotation {
        text.push_str(&format!(": {annotation}"));
    }
    if let Some(default) = &param.default_value {
        text.push_str(&format!(" = {default}"));
    }
    text
}

/// Imported names grouped under `From <module>:`, groups and names sorted
fn push_imported_groups<'a>(
    title: &str,
    imported: impl Iterator<Item = (&'a str, &'a str)>,
    out: &mut Vec<String>,
) {
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (source, name) in imported {
        groups.entry(source).or_default().push(name);
    }
    if groups.is_empty() {
        return;
    }

    out.push(title.to_string());
    for (source, mut names) in groups {
        names.sort_unstable();
        out.push(format!("  From {source}:"));
        out.push(format!("    {}", names.join(", ")));
    }
    out.push(String::new());
}
