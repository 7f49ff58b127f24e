use crate::error::{RenderError, Result};
use crate::limits::RenderLimits;
use crate::renderer::{element_tag, push_header, Renderer};
use peek_protocol::{DataElement, DataRoot, DataValue, Element, InspectionResult};

/// Bounded text view of JSON-shaped documents
#[derive(Debug, Clone, Default)]
pub struct DataTextRenderer {
    limits: RenderLimits,
}

impl DataTextRenderer {
    pub const NAME: &'static str = "json-text";

    pub fn new(limits: RenderLimits) -> Self {
        Self { limits }
    }

    fn render_root(&self, root: &DataRoot, out: &mut Vec<String>) {
        out.push(format!("File: {}", root.path));
        out.push(String::new());
        self.render_element(&root.element, 0, 0, out);
    }

    fn render_element(&self, element: &DataElement, indent: usize, depth: usize, out: &mut Vec<String>) {
        let pad = " ".repeat(indent);
        let expand = depth < self.limits.max_display_depth;

        match &element.value {
            DataValue::Object(children) => {
                out.push(format!("{pad}{}: {{", element.name));
                if expand {
                    for child in children.values() {
                        self.render_element(child, indent + 2, depth + 1, out);
                    }
                } else {
                    out.push(format!(
                        "{pad}  ... (object with {} properties)",
                        children.len()
                    ));
                }
                out.push(format!("{pad}}}"));
            }
            DataValue::Array(items) => {
                out.push(format!("{pad}{}: [", element.name));
                if expand {
                    for item in items.iter().take(self.limits.max_array_items) {
                        self.render_element(item, indent + 2, depth + 1, out);
                    }
                    if items.len() > self.limits.max_array_items {
                        out.push(format!(
                            "{pad}  ... ({} more items)",
                            items.len() - self.limits.max_array_items
                        ));
                    }
                } else {
                    out.push(format!("{pad}  ... (array with {} items)", items.len()));
                }
                out.push(format!("{pad}]"));
            }
            scalar => out.push(format!("{pad}{}: {}", element.name, self.scalar(scalar))),
        }
    }

    fn scalar(&self, value: &DataValue) -> String {
        match value {
            DataValue::String(text) => {
                let max = self.limits.max_string_length;
                if text.chars().count() > max {
                    let head: String = text.chars().take(max).collect();
                    format!("\"{head}...\" (truncated)")
                } else {
                    format!("\"{text}\"")
                }
            }
            DataValue::Number(number) => number.to_string(),
            DataValue::Boolean(flag) => flag.to_string(),
            DataValue::Null => "null".to_string(),
            DataValue::Other { text, .. } => text.clone(),
            DataValue::Object(children) => format!("{{{} properties}}", children.len()),
            DataValue::Array(items) => format!("[{} items]", items.len()),
        }
    }
}

impl Renderer for DataTextRenderer {
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
                Element::Data(root) => self.render_root(root, &mut out),
                other => return Err(RenderError::unsupported(Self::NAME, element_tag(other))),
            }
        }

        Ok(out.join("\n"))
    }
}
