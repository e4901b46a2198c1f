//! Terminal output for command results
//!
//! Status lines (success, warnings, notes) are dropped under `--quiet`; the
//! data a command was asked for is always printed.

use console::style;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);

/// Silence status lines for the rest of the process
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn success(msg: &str) {
    if !quiet() {
        println!("{} {}", style("✓").green().bold(), msg);
    }
}

pub fn warning(msg: &str) {
    if !quiet() {
        eprintln!("{} {}", style("⚠").yellow().bold(), msg);
    }
}

pub fn note(msg: &str) {
    if !quiet() {
        println!("{} {}", style("ℹ").blue().bold(), msg);
    }
}

/// Title line above a block of entries
pub fn section(title: &str) {
    println!("\n{}", style(title).bold().underlined());
}

/// Print `key  value` rows with the values lined up
pub fn entries<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str)>) {
    for (key, value) in align(rows) {
        println!("  {}  {}", style(key).dim(), value);
    }
}

/// Pad keys to a common width; continuation lines of multi-line values
/// (PEM certificates, for one) are indented under the value column
fn align<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<(String, String)> {
    let rows: Vec<(&str, &str)> = rows.into_iter().collect();
    let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let indent = format!("\n{}", " ".repeat(width + 4));

    rows.into_iter()
        .map(|(key, value)| {
            let value = value.trim_end_matches('\n').replace('\n', &indent);
            (format!("{:<width$}", key, width = width), value)
        })
        .collect()
}
