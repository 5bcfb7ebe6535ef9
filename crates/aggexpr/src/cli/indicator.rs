//! Indicator command implementation

use super::{context::ContextFile, output};
use crate::{ExpressionService, Indicator};
use aggexpr_eval::IndicatorFactor;
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::path::PathBuf;

/// Configuration for indicator command
pub struct IndicatorConfig {
    /// Uid of an indicator in the context file
    pub uid: Option<String>,
    pub numerator: Option<String>,
    pub denominator: Option<String>,
    pub factor: f64,
    pub annualized: bool,
    pub context: Option<PathBuf>,
    pub json: bool,
}

pub fn indicator(service: &ExpressionService, config: IndicatorConfig) -> Result<()> {
    let file = match &config.context {
        Some(path) => ContextFile::load(path)?,
        None => ContextFile::default(),
    };

    let indicator = match (&config.uid, &config.numerator, &config.denominator) {
        (Some(uid), _, _) => file
            .indicators
            .iter()
            .find(|i| &i.uid == uid)
            .cloned()
            .with_context(|| format!("Indicator '{}' not found in context file", uid))?,
        (None, Some(numerator), Some(denominator)) => {
            let mut indicator = Indicator::new("cli", numerator.clone(), denominator.clone())
                .with_factor(IndicatorFactor::new(config.factor));
            indicator.annualized = config.annualized;
            indicator
        }
        _ => anyhow::bail!("Give an indicator uid or both --numerator and --denominator"),
    };

    if !file.indicators.is_empty() {
        let expansion = service.expand_indicator_references(&[indicator.clone()], &file.indicators[..])?;
        info!(
            "indicator {} reaches {} indicator(s) and {} item(s)",
            indicator.uid,
            expansion.indicators.len(),
            expansion.items.len()
        );
        if !expansion.missing.is_empty() {
            let missing = expansion.missing.iter().cloned().collect::<Vec<_>>();
            eprintln!("{} unknown indicator(s): {}", "Warning:".yellow().bold(), missing.join(", "));
        }
    }

    let ctx = file.to_value_context(service.config().default_strategy)?;
    let period = file.period()?;
    let value = service.indicator_value(&indicator, &ctx, period.as_ref())?;

    if config.json {
        return output::print_json(&value, true);
    }
    match value.value {
        Some(v) => println!("{}", v),
        None => println!("{}", "no value".dimmed()),
    }
    println!(
        "  numerator {:?}, denominator {:?}, factor {}",
        value.numerator_value, value.denominator_value, value.factor
    );
    Ok(())
}
