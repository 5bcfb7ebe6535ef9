//! Expression service
//!
//! Entry point for callers holding expression text: parses (with a shared
//! cache), checks, describes and evaluates. All operations take `&self` and
//! may run concurrently.

use crate::config::{ConfigError, ServiceConfig};
use crate::describe::describe;
use crate::validity::{check_expression, is_valid_with, ValidationOutcome};
use aggexpr_ast::visit::{
    collect_item_references, collect_org_unit_group_references, collect_org_unit_references,
};
use aggexpr_ast::{DimensionalItemId, Expression, ItemReference, UsageContext};
use aggexpr_diagnostics::{ExprError, Result};
use aggexpr_eval::{
    ExpressionEngine, IndicatorFactor, IndicatorValue, ObjectLookup, ValueContext,
};
use aggexpr_parser::parse_expression;
use aggexpr_types::{DataType, MetadataLookup, NoMetadata, SemanticChecker, Value};
use indexmap::{IndexMap, IndexSet};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type CacheKey = (String, UsageContext);

pub struct ExpressionService {
    config: ServiceConfig,
    engine: ExpressionEngine,
    /// Parsed trees that passed the usage checks
    cache: Arc<RwLock<HashMap<CacheKey, Arc<Expression>>>>,
}

impl Default for ExpressionService {
    fn default() -> Self {
        Self::build(ServiceConfig::default())
    }
}

impl ExpressionService {
    pub fn new(config: ServiceConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ServiceConfig) -> Self {
        Self {
            engine: ExpressionEngine::with_max_depth(config.max_depth),
            config,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn engine(&self) -> &ExpressionEngine {
        &self.engine
    }

    /// Empty value context using the configured default strategy
    pub fn new_context(&self) -> ValueContext {
        ValueContext::new().with_strategy(self.config.default_strategy)
    }

    // === Parsing ===

    /// Parse `text` and apply the usage checks (allowlist, arity, nesting).
    /// Results are cached by (text, usage).
    pub fn parse(&self, text: &str, usage: UsageContext) -> Result<Arc<Expression>> {
        let key = (text.to_string(), usage);
        if self.config.cache_enabled {
            if let Some(expr) = self.cache.read().get(&key) {
                debug!("parse cache hit for '{}' ({})", text, usage);
                return Ok(Arc::clone(expr));
            }
            debug!("parse cache miss for '{}' ({})", text, usage);
        }

        let expr = parse_expression(text)?;
        let errors: Vec<ExprError> = SemanticChecker::new(usage)
            .structural_errors(&expr)
            .into_iter()
            .map(|e| ExprError::from(e).with_context(text))
            .collect();
        if let Some(err) = ExprError::from_many(errors) {
            return Err(err);
        }

        let expr = Arc::new(expr);
        if self.config.cache_enabled {
            let mut cache = self.cache.write();
            // A full cache is dropped wholesale
            if self.config.cache_capacity > 0 && cache.len() >= self.config.cache_capacity {
                debug!("parse cache full ({} entries), clearing", cache.len());
                cache.clear();
            }
            // A concurrent parse of the same key may have won; either tree is fine
            return Ok(Arc::clone(cache.entry(key).or_insert(expr)));
        }
        Ok(expr)
    }

    /// Parse with full type checking against `metadata`, optionally
    /// requiring the declared result type
    pub fn parse_checked(
        &self,
        text: &str,
        usage: UsageContext,
        metadata: &dyn MetadataLookup,
        expected: Option<DataType>,
    ) -> Result<Arc<Expression>> {
        let expr = self.parse(text, usage)?;
        check_expression(&expr, usage, metadata, expected).map_err(|e| e.with_context(text))?;
        Ok(expr)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    // === Validity ===

    pub fn is_valid(&self, text: &str, usage: UsageContext) -> ValidationOutcome {
        is_valid_with(text, usage, &NoMetadata, None)
    }

    pub fn is_valid_with(
        &self,
        text: &str,
        usage: UsageContext,
        metadata: &dyn MetadataLookup,
        expected: Option<DataType>,
    ) -> ValidationOutcome {
        is_valid_with(text, usage, metadata, expected)
    }

    // === Description ===

    /// Describe `text` with display names from `metadata`
    pub fn describe(
        &self,
        text: &str,
        usage: UsageContext,
        metadata: &dyn MetadataLookup,
    ) -> Result<String> {
        let expr = self.parse(text, usage)?;
        Ok(describe(&expr, metadata))
    }

    // === References ===

    pub fn item_references(&self, text: &str, usage: UsageContext) -> Result<IndexSet<ItemReference>> {
        Ok(collect_item_references(&*self.parse(text, usage)?))
    }

    pub fn org_unit_group_references(&self, text: &str, usage: UsageContext) -> Result<IndexSet<String>> {
        Ok(collect_org_unit_group_references(&*self.parse(text, usage)?))
    }

    /// Org unit uids named by `orgUnit.ancestor(..)`
    pub fn org_unit_references(&self, text: &str, usage: UsageContext) -> Result<IndexSet<String>> {
        Ok(collect_org_unit_references(&*self.parse(text, usage)?))
    }

    /// Item references of `text` resolved through `lookup`
    pub fn resolve_items<L: ObjectLookup + ?Sized>(
        &self,
        text: &str,
        usage: UsageContext,
        lookup: &L,
    ) -> Result<IndexMap<DimensionalItemId, Option<L::Object>>> {
        let refs = self.item_references(text, usage)?;
        Ok(aggexpr_eval::resolve(&refs, lookup))
    }

    // === Evaluation ===

    pub fn evaluate(&self, text: &str, usage: UsageContext, ctx: &ValueContext) -> Result<Value> {
        let expr = self.parse(text, usage)?;
        self.engine
            .evaluate(&expr, ctx)
            .map_err(|e| ExprError::from(e).with_context(text))
    }

    /// Evaluate numerator and denominator texts into an indicator value
    pub fn compute_indicator_value(
        &self,
        numerator: &str,
        denominator: &str,
        ctx: &ValueContext,
        factor: &IndicatorFactor,
        annualize: bool,
        periods_in_year: u32,
    ) -> Result<IndicatorValue> {
        let numerator_expr = self.parse(numerator, UsageContext::Indicator)?;
        let denominator_expr = self.parse(denominator, UsageContext::Indicator)?;
        self.engine
            .compute_indicator_value(
                &numerator_expr,
                &denominator_expr,
                ctx,
                factor,
                annualize,
                periods_in_year,
            )
            .map_err(|e| ExprError::from(e).with_context(format!("{} / {}", numerator, denominator)))
    }
}
