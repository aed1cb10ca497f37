//! Pure formatting functions for UI output.
//!
//! Results go to stdout, one per line, so they can be captured by build
//! scripts. Diagnostics go to stderr.

use console::style;

/// Prefix prepended by `--prefix`
pub const VERSION_PREFIX: &str = "v";

/// Render one result line, optionally with the `v` prefix.
pub fn format_line(value: &str, prefix: bool) -> String {
    if prefix {
        format!("{}{}", VERSION_PREFIX, value)
    } else {
        value.to_string()
    }
}

/// Print every result on its own line.
pub fn display_lines(lines: &[String], prefix: bool) {
    for line in lines {
        println!("{}", format_line(line, prefix));
    }
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_plain() {
        assert_eq!(format_line("1.2.3", false), "1.2.3");
    }

    #[test]
    fn test_format_line_prefixed() {
        assert_eq!(format_line("1.2.3", true), "v1.2.3");
        assert_eq!(format_line("latest", true), "vlatest");
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }
}
