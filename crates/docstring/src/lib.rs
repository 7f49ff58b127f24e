//! Docstring normalization and pagination.
//!
//! Everything here is a pure function of its inputs: no state is retained between
//! calls, so a page requested twice with the same arguments is identical.

mod format;
mod output;
mod paginate;

pub use format::{format_docstring, SECTION_HEADERS};
pub use output::render_page;
pub use paginate::{paginate, Page};
