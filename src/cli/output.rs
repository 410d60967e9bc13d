//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print failure status (red X)
pub fn failure(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✗".red(), msg);
}

/// Print completed action (green label) to stderr, keeping stdout for markup
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", label.green(), msg);
}

/// Print plain output (no color, for markup and config text)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
