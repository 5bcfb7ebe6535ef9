//! Describe command implementation

use super::context::ContextFile;
use crate::ExpressionService;
use aggexpr_ast::UsageContext;
use aggexpr_types::InMemoryMetadata;
use anyhow::Result;
use std::path::PathBuf;

/// Configuration for describe command
pub struct DescribeConfig {
    pub expressions: Vec<String>,
    pub usage: UsageContext,
    /// Context file whose `metadata` section supplies display names
    pub metadata: Option<PathBuf>,
}

pub fn describe(service: &ExpressionService, config: DescribeConfig) -> Result<()> {
    let metadata = match &config.metadata {
        Some(path) => ContextFile::load(path)?.metadata,
        None => InMemoryMetadata::new(),
    };
    for text in &config.expressions {
        println!("{}", service.describe(text, config.usage, &metadata)?);
    }
    Ok(())
}
