//! Terminal output helpers for consistent CLI formatting

/// Check if color output is enabled
fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a success message (green checkmark)
pub fn print_success(message: &str) {
    println!("{}", format_success(message, use_color()));
}

/// Print a warning message (yellow)
pub fn print_warning(message: &str) {
    eprintln!("{}", format_warning(message, use_color()));
}

/// Print an info message (blue)
pub fn print_info(message: &str) {
    println!("{}", format_info(message, use_color()));
}

fn format_success(message: &str, color: bool) -> String {
    if color {
        format!("\x1b[32m✓\x1b[0m {}", message)
    } else {
        format!("OK: {}", message)
    }
}

fn format_warning(message: &str, color: bool) -> String {
    if color {
        format!("\x1b[33mWarning:\x1b[0m {}", message)
    } else {
        format!("Warning: {}", message)
    }
}

fn format_info(message: &str, color: bool) -> String {
    if color {
        format!("\x1b[34mℹ\x1b[0m {}", message)
    } else {
        format!("Info: {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_formatting() {
        assert_eq!(format_success("done", false), "OK: done");
        assert_eq!(format_warning("careful", false), "Warning: careful");
        assert_eq!(format_info("note", false), "Info: note");
    }

    #[test]
    fn test_colored_formatting() {
        assert!(format_success("done", true).starts_with("\x1b[32m"));
        assert!(format_warning("careful", true).contains("Warning:"));
        assert!(format_info("note", true).ends_with("note"));
    }
}
