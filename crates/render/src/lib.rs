//! # Peek Render
//!
//! Bounded text rendering of [`InspectionResult`](peek_protocol::InspectionResult)s.
//!
//! Every renderer prints the same header (`name (type)` over a rule of `=`) and then
//! its element view. Output size is governed by [`RenderLimits`], a fixed set of caps
//! that never depends on the input:
//!
//! - docstrings are cut after a line budget and marked `[...docstring truncated...]`
//! - arrays show their first items and a count of the rest
//! - containers below the display depth collapse to a property/item count
//! - long strings are cut and marked `(truncated)`

mod code;
mod data;
mod error;
mod limits;
mod renderer;

pub use code::CodeTextRenderer;
pub use data::DataTextRenderer;
pub use error::{RenderError, Result};
pub use limits::{truncate_docstring, RenderLimits, TRUNCATION_MARKER};
pub use renderer::Renderer;
