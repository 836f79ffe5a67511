//! Industry-peer and market-index baselines.
//!
//! Baselines run the same [`RatioCalculator`] over other companies and align
//! the output to the subject's year axis. A year without any contributing
//! peer is kept with a `None` value so every set has one point per requested
//! year.

use crate::{CompanyId, FactStore, FiscalYear, Period, RatioCalculator, RatioDefinition, YearValue};
use derive_more::Display;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Kind of baseline a ratio is compared against.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BenchmarkTarget {
    /// Mean over industry peers
    Industry,
    /// A designated market-index pseudo-company
    Market,
}

/// Baseline value for one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkPoint {
    /// Fiscal year
    pub fiscal_year: FiscalYear,
    /// Aggregate value; `None` when nothing contributed
    pub value: Option<f64>,
    /// Number of companies that contributed a value
    pub contributors: usize,
}

/// A baseline series for one ratio and target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkSet {
    /// Ratio name
    pub ratio: String,
    /// Baseline kind
    pub target: BenchmarkTarget,
    /// Peer identifiers, or the market index identifier
    pub constituents: Vec<CompanyId>,
    /// One point per requested year, in request order
    pub values: Vec<BenchmarkPoint>,
}

impl BenchmarkSet {
    /// A set with a `None` value for every year of `period`.
    pub fn placeholder(
        definition: &RatioDefinition,
        target: BenchmarkTarget,
        constituents: Vec<CompanyId>,
        period: &Period,
    ) -> Self {
        Self {
            ratio: definition.name.to_string(),
            target,
            constituents,
            values: period
                .years()
                .iter()
                .map(|&fiscal_year| BenchmarkPoint {
                    fiscal_year,
                    value: None,
                    contributors: 0,
                })
                .collect(),
        }
    }

    /// Aggregate value for a fiscal year.
    pub fn value_for(&self, year: FiscalYear) -> Option<f64> {
        self.values
            .iter()
            .find(|p| p.fiscal_year == year)
            .and_then(|p| p.value)
    }
}

/// Computes baselines for ratio definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BenchmarkAggregator {
    calculator: RatioCalculator,
}

impl BenchmarkAggregator {
    /// Create an aggregator.
    pub const fn new() -> Self {
        Self {
            calculator: RatioCalculator::new(),
        }
    }

    /// Baselines for every target the definition declares, in declaration
    /// order.
    pub fn aggregate(
        &self,
        definition: &RatioDefinition,
        store: &FactStore,
        peers: &[CompanyId],
        market_index: Option<&CompanyId>,
        period: &Period,
    ) -> Vec<BenchmarkSet> {
        definition
            .benchmarks
            .iter()
            .map(|target| match target {
                BenchmarkTarget::Industry => self.industry(definition, store, peers, period),
                BenchmarkTarget::Market => self.market(definition, store, market_index, period),
            })
            .collect()
    }

    /// Per-year mean over peers that produced a value that year.
    ///
    /// Peers without any facts are skipped. The number of contributing peers
    /// may differ from year to year.
    pub fn industry(
        &self,
        definition: &RatioDefinition,
        store: &FactStore,
        peers: &[CompanyId],
        period: &Period,
    ) -> BenchmarkSet {
        let series: Vec<Vec<YearValue>> = peers
            .par_iter()
            .filter_map(|peer| {
                let Some(facts) = store.company(peer).filter(|facts| !facts.is_empty()) else {
                    debug!(peer = %peer, ratio = definition.name, "peer has no facts, excluded");
                    return None;
                };
                Some(self.calculator.evaluate(definition, facts, period))
            })
            .collect();

        let values = period
            .years()
            .iter()
            .enumerate()
            .map(|(idx, &fiscal_year)| {
                let (sum, contributors) = series
                    .iter()
                    .filter_map(|values| values[idx].value)
                    .fold((0.0, 0usize), |(sum, n), value| (sum + value, n + 1));
                BenchmarkPoint {
                    fiscal_year,
                    value: (contributors > 0).then(|| sum / contributors as f64),
                    contributors,
                }
            })
            .collect();

        BenchmarkSet {
            ratio: definition.name.to_string(),
            target: BenchmarkTarget::Industry,
            constituents: peers.to_vec(),
            values,
        }
    }

    /// The market index's own values for each year.
    pub fn market(
        &self,
        definition: &RatioDefinition,
        store: &FactStore,
        market_index: Option<&CompanyId>,
        period: &Period,
    ) -> BenchmarkSet {
        let constituents: Vec<CompanyId> = market_index.into_iter().cloned().collect();
        let facts = market_index
            .and_then(|id| store.company(id))
            .filter(|facts| !facts.is_empty());

        let Some(facts) = facts else {
            debug!(ratio = definition.name, "market index has no facts");
            return BenchmarkSet::placeholder(
                definition,
                BenchmarkTarget::Market,
                constituents,
                period,
            );
        };

        let values = self
            .calculator
            .evaluate(definition, facts, period)
            .into_iter()
            .map(|v| BenchmarkPoint {
                fiscal_year: v.fiscal_year,
                value: v.value,
                contributors: usize::from(v.value.is_some()),
            })
            .collect();

        BenchmarkSet {
            ratio: definition.name.to_string(),
            target: BenchmarkTarget::Market,
            constituents,
            values,
        }
    }
}
