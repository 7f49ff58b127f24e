use crate::error::Result;
use peek_protocol::{Element, InspectionResult};

/// Turns an inspection result into display text.
///
/// Implementations are stateless apart from their limits and can be shared
/// across requests.
pub trait Renderer: Send + Sync {
    /// Format name this renderer is registered under
    fn name(&self) -> &'static str;

    /// Render the result, header included
    fn render(&self, result: &InspectionResult) -> Result<String>;
}

/// Title line, `=` rule of the same width, blank line
pub(crate) fn push_header(result: &InspectionResult, out: &mut Vec<String>) {
    let title = format!("{} ({})", result.name, result.kind);
    let rule = "=".repeat(title.chars().count());
    out.push(title);
    out.push(rule);
    out.push(String::new());
}

/// Tag used in error messages for an element variant
pub(crate) fn element_tag(element: &Element) -> &'static str {
    match element {
        Element::Module(_) => "module",
        Element::Class(_) => "class",
        Element::Method(_) => "function",
        Element::Attribute(_) => "attribute",
        Element::Data(_) => "data",
    }
}
