//! User interface module - output formatting for the command line.

pub mod formatter;

pub use formatter::{display_error, display_lines, format_line};
