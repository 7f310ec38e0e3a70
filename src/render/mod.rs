//! Rendering and persisting extraction results.

mod output;
mod text;

pub use output::{write_flat, write_sections};
pub use text::{render_flat, render_section, sanitize_file_name, PAGE_SEPARATOR};
