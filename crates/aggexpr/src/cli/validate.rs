//! Validate command implementation

use super::{context::ContextFile, output};
use crate::{ExpressionService, ValidationOutcome};
use aggexpr_ast::UsageContext;
use aggexpr_types::{DataType, InMemoryMetadata};
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// Configuration for validate command
pub struct ValidateConfig {
    pub expressions: Vec<String>,
    pub usage: UsageContext,
    /// Required result type
    pub expected: Option<DataType>,
    /// Context file whose `metadata` section types the items
    pub metadata: Option<PathBuf>,
    pub verbose: bool,
}

/// Validate each expression; fails when any is not well formed
pub fn validate(service: &ExpressionService, config: ValidateConfig) -> Result<()> {
    if config.expressions.is_empty() {
        anyhow::bail!("No expressions specified for validation");
    }
    let metadata = match &config.metadata {
        Some(path) => ContextFile::load(path)?.metadata,
        None => InMemoryMetadata::new(),
    };

    let mut failed = 0;
    for text in &config.expressions {
        let outcome = service.is_valid_with(text, config.usage, &metadata, config.expected);
        match outcome {
            ValidationOutcome::Valid => println!("{} {}", "✓".green(), text),
            ValidationOutcome::ExpressionIsNotWellFormed => {
                failed += 1;
                println!("{} {} {}", "✗".red(), text, outcome.to_string().dimmed());
                if config.verbose {
                    // Re-run the checks to report what went wrong
                    let checked = service.parse_checked(text, config.usage, &metadata, config.expected);
                    if let Err(err) = checked {
                        println!("  {}", output::format_diagnostics(&err).replace('\n', "\n  "));
                    }
                }
            }
        }
    }

    println!();
    if failed == 0 {
        println!(
            "{}",
            output::format_success(&format!("{} expression(s) valid", config.expressions.len()))
        );
        Ok(())
    } else {
        anyhow::bail!(
            "{} of {} expression(s) not well formed",
            failed,
            config.expressions.len()
        )
    }
}
