//! Terminal output helpers
//!
//! Status and diagnostics are colored (`colored` honors NO_COLOR and
//! CLICOLOR_FORCE); record data always goes to stdout uncolored so it can be
//! piped into another file.

use std::fmt::Display;

use colored::Colorize;

pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Check passed
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Check failed
pub fn failure(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✗".red(), msg);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Line found in the input but not in the rendered forest
pub fn diff_remove(line: &(impl Display + ?Sized)) {
    println!("  {} {}", "-".red(), line.to_string().red());
}

/// Line produced by rendering the forest
pub fn diff_add(line: &(impl Display + ?Sized)) {
    println!("  {} {}", "+".green(), line.to_string().green());
}

/// Uncolored data on stdout
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
