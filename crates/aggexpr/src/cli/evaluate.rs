//! Eval command implementation

use super::{context::ContextFile, output};
use crate::ExpressionService;
use aggexpr_ast::UsageContext;
use aggexpr_eval::MissingValueStrategy;
use aggexpr_types::Value;
use anyhow::Result;
use std::path::PathBuf;

/// Configuration for eval command
pub struct EvalConfig {
    pub expression: String,
    pub usage: UsageContext,
    pub context: Option<PathBuf>,
    /// Overrides both the file and the configured default
    pub strategy: Option<MissingValueStrategy>,
    pub json: bool,
}

pub fn evaluate(service: &ExpressionService, config: EvalConfig) -> Result<()> {
    let file = match &config.context {
        Some(path) => ContextFile::load(path)?,
        None => ContextFile::default(),
    };
    let mut ctx = file.to_value_context(service.config().default_strategy)?;
    if let Some(strategy) = config.strategy {
        ctx.missing_value_strategy = strategy;
    }

    let value = service.evaluate(&config.expression, config.usage, &ctx)?;
    if config.json {
        output::print_json(&value, false)
    } else {
        println!("{}", display_value(&value));
        Ok(())
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Text(s) => s.clone(),
        Value::Boolean(b) => b.to_string(),
    }
}
