use thiserror::Error;

/// Result type for rendering
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors raised by renderers.
///
/// These indicate a mismatch between a result and the renderer it was routed to,
/// never a problem with user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The renderer does not handle this element kind
    #[error("The {renderer} format cannot render {element} elements")]
    UnsupportedElement {
        renderer: &'static str,
        element: &'static str,
    },

    /// The result carries no element to render
    #[error("Inspection result '{0}' has no elements")]
    EmptyResult(String),
}

impl RenderError {
    pub fn unsupported(renderer: &'static str, element: &'static str) -> Self {
        Self::UnsupportedElement { renderer, element }
    }
}
