//! Output formatting utilities

use aggexpr_diagnostics::ExprError;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::io::IsTerminal;

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stdout().is_terminal()),
    }
}

/// Format an error for display. Expression errors are rendered as diagnostics.
pub fn format_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ExprError>() {
        Some(expr_error) => format_diagnostics(expr_error),
        None => format!("{} {:#}", "Error:".red().bold(), error),
    }
}

pub fn format_diagnostics(error: &ExprError) -> String {
    error
        .to_diagnostics()
        .iter()
        .map(|d| d.render())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

pub fn format_failure(message: &str) -> String {
    format!("{} {}", "Failed:".red().bold(), message)
}

/// Print any serializable value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize JSON")?;
    println!("{}", text);
    Ok(())
}
