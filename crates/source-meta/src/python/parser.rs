use super::docstring::docstring_from_literal;
use super::summary::{Binding, ClassDecl, FunctionDecl, ModuleSummary};
use crate::error::{MetadataError, Result};
use crate::language::SourceKind;
use crate::provider::{CallableFlavor, DefaultValue, ParamSpec};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Compound statements whose blocks still bind names in the enclosing scope
const TRANSPARENT_STATEMENTS: &[&str] = &[
    "if_statement",
    "elif_clause",
    "else_clause",
    "try_statement",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "with_statement",
];

/// Tree-sitter based extractor of module summaries
pub(crate) struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub(crate) fn new(kind: SourceKind) -> Result<Self> {
        let ts_language = kind.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| MetadataError::tree_sitter(format!("Failed to set language: {e}")))?;
        Ok(Self { parser })
    }

    /// Parse one module source into its structural summary.
    ///
    /// Sources with syntax errors are rejected as a whole.
    pub(crate) fn parse_module(
        &mut self,
        name: &str,
        file: &Path,
        is_package: bool,
        content: &str,
    ) -> Result<ModuleSummary> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| MetadataError::tree_sitter("Failed to parse source code"))?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(MetadataError::Syntax {
                module: name.to_string(),
                file: file.to_path_buf(),
                line: first_error_line(root).unwrap_or(1),
            });
        }

        let mut summary = ModuleSummary {
            name: name.to_string(),
            file: Some(file.to_path_buf()),
            is_package,
            package_dirs: Vec::new(),
            docstring: block_docstring(content, root),
            bindings: Default::default(),
        };

        let mut visitor = ModuleVisitor {
            content,
            module: name,
            is_package,
            bindings: &mut summary.bindings,
        };
        visitor.visit_block(root);

        Ok(summary)
    }
}

struct ModuleVisitor<'a> {
    content: &'a str,
    module: &'a str,
    is_package: bool,
    bindings: &'a mut std::collections::BTreeMap<String, Binding>,
}

impl ModuleVisitor<'_> {
    fn visit_block(&mut self, block: Node) {
        let statements = statements(block);
        for (idx, stmt) in statements.iter().enumerate() {
            match stmt.kind() {
                "class_definition" => {
                    let class = parse_class(self.content, *stmt);
                    self.bindings
                        .insert(class.name.clone(), Binding::Class(class));
                }
                "function_definition" => {
                    let function = parse_function(self.content, *stmt, CallableFlavor::Function);
                    self.bindings
                        .insert(function.name.clone(), Binding::Function(function));
                }
                "decorated_definition" => self.visit_decorated(*stmt),
                "expression_statement" => {
                    let docstring = following_docstring(self.content, &statements, idx);
                    for target in assignment_targets(self.content, *stmt) {
                        self.bindings.insert(
                            target,
                            Binding::Variable {
                                docstring: docstring.clone(),
                            },
                        );
                    }
                }
                "import_statement" => self.visit_import(*stmt),
                "import_from_statement" => self.visit_import_from(*stmt),
                kind if TRANSPARENT_STATEMENTS.contains(&kind) => self.visit_compound(*stmt),
                _ => {}
            }
        }
    }

    fn visit_compound(&mut self, node: Node) {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            if child.kind() == "block" {
                self.visit_block(child);
            } else if TRANSPARENT_STATEMENTS.contains(&child.kind()) {
                self.visit_compound(child);
            }
        }
    }

    fn visit_decorated(&mut self, node: Node) {
        let Some(definition) = node.child_by_field_name("definition") else {
            return;
        };
        match definition.kind() {
            "class_definition" => {
                let class = parse_class(self.content, definition);
                self.bindings
                    .insert(class.name.clone(), Binding::Class(class));
            }
            "function_definition" => {
                let function = parse_function(self.content, definition, CallableFlavor::Function);
                self.bindings
                    .insert(function.name.clone(), Binding::Function(function));
            }
            _ => {}
        }
    }

    fn visit_import(&mut self, node: Node) {
        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            match name.kind() {
                "dotted_name" => {
                    let dotted = node_text(self.content, name);
                    let head = dotted.split('.').next().unwrap_or(dotted).to_string();
                    self.bindings.insert(
                        head.clone(),
                        Binding::ImportModule { module: head },
                    );
                }
                "aliased_import" => {
                    let (Some(target), Some(alias)) = (
                        name.child_by_field_name("name"),
                        name.child_by_field_name("alias"),
                    ) else {
                        continue;
                    };
                    self.bindings.insert(
                        node_text(self.content, alias).to_string(),
                        Binding::ImportModule {
                            module: node_text(self.content, target).to_string(),
                        },
                    );
                }
                _ => {}
            }
        }
    }

    fn visit_import_from(&mut self, node: Node) {
        let Some(module_node) = node.child_by_field_name("module_name") else {
            return;
        };
        let Some(source) = self.absolute_module(module_node) else {
            log::debug!(
                "{}: relative import '{}' escapes the top-level package",
                self.module,
                node_text(self.content, module_node)
            );
            return;
        };

        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            let (imported, bound) = match name.kind() {
                "dotted_name" => {
                    let text = node_text(self.content, name);
                    (text, text)
                }
                "aliased_import" => {
                    let (Some(target), Some(alias)) = (
                        name.child_by_field_name("name"),
                        name.child_by_field_name("alias"),
                    ) else {
                        continue;
                    };
                    (
                        node_text(self.content, target),
                        node_text(self.content, alias),
                    )
                }
                _ => continue,
            };
            self.bindings.insert(
                bound.to_string(),
                Binding::ImportFrom {
                    module: source.clone(),
                    name: imported.to_string(),
                },
            );
        }
    }

    /// Absolute dotted name of the module an import-from statement reads
    fn absolute_module(&self, module_node: Node) -> Option<String> {
        if module_node.kind() != "relative_import" {
            return Some(node_text(self.content, module_node).to_string());
        }

        let text = node_text(self.content, module_node);
        let level = text.chars().take_while(|c| *c == '.').count();
        let suffix = text[level..].trim();

        let mut parts: Vec<&str> = self.module.split('.').collect();
        if !self.is_package {
            parts.pop();
        }
        for _ in 1..level {
            parts.pop()?;
        }
        if !suffix.is_empty() {
            parts.extend(suffix.split('.'));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("."))
        }
    }
}

fn parse_class(content: &str, node: Node) -> ClassDecl {
    let mut class = ClassDecl {
        name: field_text(content, node, "name").unwrap_or_default(),
        ..Default::default()
    };

    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            match base.kind() {
                "keyword_argument" | "comment" | "list_splat" | "dictionary_splat" => {}
                _ => class.bases.push(normalize_ws(node_text(content, base))),
            }
        }
    }

    let Some(body) = node.child_by_field_name("body") else {
        return class;
    };
    class.docstring = block_docstring(content, body);
    collect_class_body(content, body, &mut class);
    class
}

fn collect_class_body(content: &str, body: Node, class: &mut ClassDecl) {
    let statements = statements(body);
    for (idx, stmt) in statements.iter().enumerate() {
        match stmt.kind() {
            "function_definition" => {
                let method = parse_function(content, *stmt, CallableFlavor::Instance);
                class.methods.insert(method.name.clone(), method);
            }
            "decorated_definition" => {
                let Some(definition) = stmt.child_by_field_name("definition") else {
                    continue;
                };
                if definition.kind() == "class_definition" {
                    let nested = parse_class(content, definition);
                    class.nested.insert(nested.name.clone(), nested);
                    continue;
                }
                let decorators = decorator_names(content, *stmt);
                if decorators.iter().any(|d| is_property_decorator(d)) {
                    let name = field_text(content, definition, "name").unwrap_or_default();
                    let docstring = definition
                        .child_by_field_name("body")
                        .and_then(|b| block_docstring(content, b));
                    // A setter without a docstring must not erase the getter's
                    let entry = class.attributes.entry(name).or_insert(None);
                    if docstring.is_some() {
                        *entry = docstring;
                    }
                    continue;
                }
                let flavor = if decorators.iter().any(|d| d == "staticmethod") {
                    CallableFlavor::Static
                } else if decorators.iter().any(|d| d == "classmethod") {
                    CallableFlavor::ClassMethod
                } else {
                    CallableFlavor::Instance
                };
                let method = parse_function(content, definition, flavor);
                class.methods.insert(method.name.clone(), method);
            }
            "class_definition" => {
                let nested = parse_class(content, *stmt);
                class.nested.insert(nested.name.clone(), nested);
            }
            "expression_statement" => {
                let docstring = following_docstring(content, &statements, idx);
                for target in assignment_targets(content, *stmt) {
                    class.methods.remove(&target);
                    class.attributes.insert(target, docstring.clone());
                }
            }
            kind if TRANSPARENT_STATEMENTS.contains(&kind) => {
                let mut cursor = stmt.walk();
                let blocks: Vec<_> = stmt
                    .named_children(&mut cursor)
                    .filter(|child| child.kind() == "block")
                    .collect();
                for block in blocks {
                    collect_class_body(content, block, class);
                }
            }
            _ => {}
        }
    }
}

fn parse_function(content: &str, node: Node, flavor: CallableFlavor) -> FunctionDecl {
    let params = node
        .child_by_field_name("parameters")
        .map(|params| parse_parameters(content, params))
        .unwrap_or_default();

    FunctionDecl {
        name: field_text(content, node, "name").unwrap_or_default(),
        docstring: node
            .child_by_field_name("body")
            .and_then(|body| block_docstring(content, body)),
        flavor,
        params,
        return_type: field_text(content, node, "return_type"),
    }
}

fn parse_parameters(content: &str, node: Node) -> Vec<ParamSpec> {
    let mut params = Vec::new();
    let mut cursor = node.walk();
    for param in node.named_children(&mut cursor) {
        let param_spec = match param.kind() {
            "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => ParamSpec {
                name: node_text(content, param).to_string(),
                annotation: None,
                default: None,
            },
            "typed_parameter" => {
                let Some(name) = param.named_child(0) else {
                    continue;
                };
                ParamSpec {
                    name: node_text(content, name).to_string(),
                    annotation: field_text(content, param, "type"),
                    default: None,
                }
            }
            "default_parameter" | "typed_default_parameter" => ParamSpec {
                name: field_text(content, param, "name").unwrap_or_default(),
                annotation: field_text(content, param, "type"),
                default: param
                    .child_by_field_name("value")
                    .map(|value| default_value(content, value)),
            },
            // bare `*`, `/` and comments are not parameters
            _ => continue,
        };
        params.push(param_spec);
    }
    params
}

fn default_value(content: &str, node: Node) -> DefaultValue {
    let text = normalize_ws(node_text(content, node));
    if is_literal(node) {
        DefaultValue::Literal(text)
    } else {
        DefaultValue::Expression(text)
    }
}

fn is_literal(node: Node) -> bool {
    match node.kind() {
        "integer" | "float" | "true" | "false" | "none" => true,
        "string" => {
            let mut cursor = node.walk();
            let has_interpolation = node
                .named_children(&mut cursor)
                .any(|child| child.kind() == "interpolation");
            !has_interpolation
        }
        "unary_operator" => node
            .child_by_field_name("argument")
            .is_some_and(|arg| matches!(arg.kind(), "integer" | "float")),
        _ => false,
    }
}

/// Names bound by a simple assignment statement (`x = ...`, `x: int = ...`, `a, b = ...`)
fn assignment_targets(content: &str, stmt: Node) -> Vec<String> {
    let Some(expr) = stmt.named_child(0) else {
        return Vec::new();
    };
    if expr.kind() != "assignment" {
        return Vec::new();
    }
    let Some(left) = expr.child_by_field_name("left") else {
        return Vec::new();
    };
    match left.kind() {
        "identifier" => vec![node_text(content, left).to_string()],
        "pattern_list" | "tuple_pattern" => {
            let mut cursor = left.walk();
            left.named_children(&mut cursor)
                .filter(|n| n.kind() == "identifier")
                .map(|n| node_text(content, n).to_string())
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Docstring of a module, class or function body: a leading string statement
fn block_docstring(content: &str, block: Node) -> Option<String> {
    let first = statements(block).into_iter().next()?;
    string_statement(content, first)
}

/// Attribute docstring: a string statement directly after the assignment
fn following_docstring(content: &str, statements: &[Node], idx: usize) -> Option<String> {
    statements
        .get(idx + 1)
        .and_then(|next| string_statement(content, *next))
}

fn string_statement(content: &str, stmt: Node) -> Option<String> {
    if stmt.kind() != "expression_statement" || stmt.named_child_count() != 1 {
        return None;
    }
    let expr = stmt.named_child(0)?;
    if expr.kind() != "string" {
        return None;
    }
    docstring_from_literal(node_text(content, expr))
}

fn decorator_names(content: &str, decorated: Node) -> Vec<String> {
    let mut cursor = decorated.walk();
    decorated
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "decorator")
        .filter_map(|decorator| decorator.named_child(0))
        .map(|expr| {
            let callee = if expr.kind() == "call" {
                expr.child_by_field_name("function").unwrap_or(expr)
            } else {
                expr
            };
            node_text(content, callee).to_string()
        })
        .collect()
}

fn is_property_decorator(name: &str) -> bool {
    let last = name.rsplit('.').next().unwrap_or(name);
    matches!(
        last,
        "property" | "cached_property" | "setter" | "getter" | "deleter"
    )
}

/// Statement nodes of a module or block, comments skipped
fn statements(block: Node) -> Vec<Node> {
    let mut cursor = block.walk();
    block
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error_line)
}

fn field_text(content: &str, node: Node, field: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|child| normalize_ws(node_text(content, child)))
}

fn node_text<'a>(content: &'a str, node: Node) -> &'a str {
    &content[node.start_byte()..node.end_byte()]
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
