//! Parse command implementation

use super::output;
use crate::ExpressionService;
use aggexpr_ast::{Expression, UsageContext};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Configuration for parse command
pub struct ParseConfig {
    pub expression: String,
    pub usage: UsageContext,
    pub json: bool,
}

#[derive(Serialize)]
struct ParseReport<'a> {
    expression: &'a str,
    usage: UsageContext,
    items: Vec<String>,
    org_unit_groups: Vec<String>,
    org_units: Vec<String>,
    tree: &'a Expression,
}

/// Parse one expression and print its tree and references
pub fn parse(service: &ExpressionService, config: ParseConfig) -> Result<()> {
    let expr = service.parse(&config.expression, config.usage)?;
    let items = service
        .item_references(&config.expression, config.usage)?
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    let groups = service
        .org_unit_group_references(&config.expression, config.usage)?
        .into_iter()
        .collect::<Vec<_>>();
    let org_units = service
        .org_unit_references(&config.expression, config.usage)?
        .into_iter()
        .collect::<Vec<_>>();

    if config.json {
        return output::print_json(
            &ParseReport {
                expression: &config.expression,
                usage: config.usage,
                items,
                org_unit_groups: groups,
                org_units,
                tree: expr.as_ref(),
            },
            true,
        );
    }

    println!("{}", output::format_success(&format!("parsed for {}", config.usage)));
    println!("{:#?}", expr);
    if !items.is_empty() {
        println!("{} {}", "Items:".bold(), items.join(", "));
    }
    if !groups.is_empty() {
        println!("{} {}", "Org unit groups:".bold(), groups.join(", "));
    }
    if !org_units.is_empty() {
        println!("{} {}", "Org units:".bold(), org_units.join(", "));
    }
    Ok(())
}
