//! Pure-Rust formatters for generated Python.

mod imports;
mod layout;

pub use imports::ImportSortFormatter;
pub use layout::LayoutFormatter;
