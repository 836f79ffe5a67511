//! Ratio definition registry.
//!
//! Every ratio the engine knows about is a [`RatioDefinition`]: tagged data
//! naming the line items it reads plus a pure formula over those items. The
//! registry is built once and never mutated afterwards; it is the single
//! source of truth for which ratios exist and how they are presented.

use crate::benchmark::BenchmarkTarget;
use crate::{FiscalYear, LineItem, RatioError, Result};
use derive_more::Display;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Ratio category for grouping related ratios.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RatioCategory {
    /// Profitability - margins and returns on capital
    Profitability,
    /// Liquidity - ability to meet short-term obligations
    Liquidity,
    /// Solvency - leverage and debt service
    Solvency,
    /// Efficiency - asset utilization
    Efficiency,
    /// Valuation - price relative to fundamentals
    Valuation,
    /// Market performance - market-derived measures
    #[display("Market Performance")]
    MarketPerformance,
}

/// How a ratio is presented to consumers.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Presentation {
    /// Multi-year series for charting
    Trend,
    /// One current-period value with benchmark comparators
    Single,
}

/// Scaling applied by the calculator after the formula runs.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Scale {
    /// Formula output as-is
    Raw,
    /// Formula output is a fraction reported as a percentage
    Percent,
}

impl Scale {
    /// Apply the scaling to a raw formula value.
    pub fn apply(self, raw: f64) -> f64 {
        match self {
            Self::Raw => raw,
            Self::Percent => raw * 100.0,
        }
    }
}

/// Display unit of a ratio value.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Unit {
    /// Percentage points
    #[display("%")]
    Percent,
    /// Multiple of the denominator
    #[display("x")]
    Times,
    /// Plain ratio
    #[display("ratio")]
    Ratio,
    /// Currency amount per share
    #[display("per share")]
    PerShare,
    /// Number of days
    #[display("days")]
    Days,
    /// Currency amount
    #[display("currency")]
    Currency,
    /// Regression coefficient
    #[display("coefficient")]
    Coefficient,
}

/// Line-item values handed to a formula for one fiscal year.
///
/// Only the items a definition declares are present. Averaged items also
/// carry the prior fiscal year's value when it was reported.
#[derive(Debug, Clone, Default)]
pub struct FormulaInputs {
    year: FiscalYear,
    current: BTreeMap<LineItem, f64>,
    prior: BTreeMap<LineItem, f64>,
}

impl FormulaInputs {
    /// Empty inputs for `year`.
    pub fn new(year: FiscalYear) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    /// Add a current-year value.
    #[must_use]
    pub fn with(mut self, item: LineItem, value: f64) -> Self {
        self.current.insert(item, value);
        self
    }

    /// Add a prior-year value.
    #[must_use]
    pub fn with_prior(mut self, item: LineItem, value: f64) -> Self {
        self.prior.insert(item, value);
        self
    }

    /// Fiscal year being evaluated.
    pub const fn year(&self) -> FiscalYear {
        self.year
    }

    /// Current-year value of `item`.
    pub fn get(&self, item: LineItem) -> Option<f64> {
        self.current.get(&item).copied()
    }

    /// Prior-year value of `item`.
    pub fn prior(&self, item: LineItem) -> Option<f64> {
        self.prior.get(&item).copied()
    }

    /// Two-year average of `item`.
    ///
    /// Falls back to the current value alone when the prior year is absent.
    pub fn average(&self, item: LineItem) -> Option<f64> {
        let current = self.get(item)?;
        Some(self.prior(item).map_or(current, |prior| (current + prior) / 2.0))
    }
}

/// Division that yields `None` instead of infinities or NaN.
pub fn divide(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

/// Pure formula over one year's inputs; `None` means undefined.
pub type FormulaFn = fn(&FormulaInputs) -> Option<f64>;

/// Declarative description of one ratio.
#[derive(Clone, Copy)]
pub struct RatioDefinition {
    /// Unique snake_case identifier
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// What the ratio measures
    pub description: &'static str,
    /// Category for grouping
    pub category: RatioCategory,
    /// Trend series or single value
    pub presentation: Presentation,
    /// Display unit
    pub unit: Unit,
    /// Scaling applied after the formula
    pub scale: Scale,
    /// Line items the numerator needs
    pub numerator: &'static [LineItem],
    /// Line items the denominator needs
    pub denominator: &'static [LineItem],
    /// Items averaged with the prior fiscal year
    pub averaged: &'static [LineItem],
    /// Formula over the declared items
    pub formula: FormulaFn,
    /// Baselines this ratio is compared against
    pub benchmarks: &'static [BenchmarkTarget],
}

impl RatioDefinition {
    /// Numerator and denominator items, without duplicates.
    pub fn required_items(&self) -> Vec<LineItem> {
        let mut items: Vec<LineItem> = Vec::with_capacity(self.numerator.len() + self.denominator.len());
        for item in self.numerator.iter().chain(self.denominator) {
            if !items.contains(item) {
                items.push(*item);
            }
        }
        items
    }

    /// Whether this ratio is benchmarked against `target`.
    pub fn targets(&self, target: BenchmarkTarget) -> bool {
        self.benchmarks.contains(&target)
    }
}

impl fmt::Debug for RatioDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RatioDefinition")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("presentation", &self.presentation)
            .field("scale", &self.scale)
            .field("numerator", &self.numerator)
            .field("denominator", &self.denominator)
            .field("averaged", &self.averaged)
            .field("benchmarks", &self.benchmarks)
            .finish_non_exhaustive()
    }
}

/// Metadata for ratio introspection.
#[derive(Debug, Clone, Serialize)]
pub struct RatioInfo {
    /// Ratio name (unique identifier)
    pub name: String,
    /// Human-readable label
    pub label: String,
    /// Description
    pub description: String,
    /// Ratio category
    pub category: RatioCategory,
    /// Presentation mode
    pub presentation: Presentation,
    /// Display unit
    pub unit: Unit,
    /// Required input line items
    pub required_items: Vec<LineItem>,
    /// Items averaged across two years
    pub averaged_items: Vec<LineItem>,
    /// Benchmark targets
    pub benchmarks: Vec<BenchmarkTarget>,
}

impl From<&RatioDefinition> for RatioInfo {
    fn from(def: &RatioDefinition) -> Self {
        Self {
            name: def.name.to_string(),
            label: def.label.to_string(),
            description: def.description.to_string(),
            category: def.category,
            presentation: def.presentation,
            unit: def.unit,
            required_items: def.required_items(),
            averaged_items: def.averaged.to_vec(),
            benchmarks: def.benchmarks.to_vec(),
        }
    }
}

/// Registry of ratio definitions in registration order.
#[derive(Debug, Default)]
pub struct RatioRegistry {
    definitions: Vec<RatioDefinition>,
    index: HashMap<&'static str, usize>,
}

impl RatioRegistry {
    /// Build a registry from definitions, rejecting duplicate names.
    pub fn from_definitions<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = RatioDefinition>,
    {
        let mut registry = Self::default();
        for definition in definitions {
            if registry.index.contains_key(definition.name) {
                return Err(RatioError::Computation(format!(
                    "ratio '{}' registered twice",
                    definition.name
                )));
            }
            registry
                .index
                .insert(definition.name, registry.definitions.len());
            registry.definitions.push(definition);
        }
        Ok(registry)
    }

    /// Registry with every standard ratio.
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        for definition in crate::definitions::all() {
            registry
                .index
                .insert(definition.name, registry.definitions.len());
            registry.definitions.push(definition);
        }
        registry
    }

    /// All definitions in registration order.
    pub fn get_all(&self) -> &[RatioDefinition] {
        &self.definitions
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Result<&RatioDefinition> {
        self.index
            .get(name)
            .map(|&idx| &self.definitions[idx])
            .ok_or_else(|| RatioError::NotFound(format!("ratio '{name}'")))
    }

    /// Definitions in one category.
    pub fn by_category(&self, category: RatioCategory) -> Vec<&RatioDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Get all ratio metadata.
    pub fn all_info(&self) -> Vec<RatioInfo> {
        self.definitions.iter().map(RatioInfo::from).collect()
    }

    /// Get all ratio names.
    pub fn names(&self) -> Vec<&'static str> {
        self.definitions.iter().map(|d| d.name).collect()
    }

    /// Number of registered ratios.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
