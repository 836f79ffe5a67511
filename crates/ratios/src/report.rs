//! Report assembly.
//!
//! The assembler runs every registered ratio for the subject company, builds
//! the peer and market baselines for ratios that declare them, and packages
//! everything into one immutable [`Report`]. Ratio and baseline computations
//! are independent and run in parallel; the report is built once all of them
//! have finished.

use crate::regression::annual_beta;
use crate::{
    BenchmarkAggregator, BenchmarkSet, BenchmarkTarget, CompanyId, DataQuality, EngineConfig,
    FactStore, FiscalYear, Period, RatioCalculator, RatioError, RatioRegistry, RatioResult, Result,
};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Count of results per data quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Completeness {
    /// Results with every value present
    pub complete: usize,
    /// Results with some values missing
    pub partial: usize,
    /// Results with no usable inputs
    pub unavailable: usize,
}

impl Completeness {
    fn from_results(results: &[RatioResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, result| {
            match result.data_quality {
                DataQuality::Complete => acc.complete += 1,
                DataQuality::Partial => acc.partial += 1,
                DataQuality::Unavailable => acc.unavailable += 1,
            }
            acc
        })
    }
}

/// Context attached to a report for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    /// Subject reporting currency, when unambiguous
    pub currency: Option<String>,
    /// Period labels in request order (`FY2023`)
    pub period_labels: Vec<String>,
    /// Result counts per data quality
    pub completeness: Completeness,
    /// Industry peers used for baselines
    pub peers: Vec<CompanyId>,
    /// Peers skipped because they had no facts
    pub excluded_peers: Vec<CompanyId>,
    /// Market index used for market baselines
    pub market_index: Option<CompanyId>,
    /// Regression beta over fiscal-year returns against the market index
    pub estimated_beta: Option<f64>,
    /// Assembly timestamp
    pub generated_at: DateTime<Utc>,
}

/// One flattened row: a ratio value and its baselines for one fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Ratio name
    pub ratio: String,
    /// Fiscal year
    pub fiscal_year: FiscalYear,
    /// Subject value
    pub value: Option<f64>,
    /// Industry baseline
    pub industry: Option<f64>,
    /// Market baseline
    pub market: Option<f64>,
    /// Subject result quality
    pub data_quality: DataQuality,
}

/// Ratios, baselines and metadata for one company.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    company_id: CompanyId,
    period: Period,
    results: Vec<RatioResult>,
    benchmarks: BTreeMap<String, Vec<BenchmarkSet>>,
    metadata: ReportMetadata,
}

impl Report {
    /// Subject company.
    pub const fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    /// Requested fiscal years.
    pub const fn period(&self) -> &Period {
        &self.period
    }

    /// Results in registry order.
    pub fn results(&self) -> &[RatioResult] {
        &self.results
    }

    /// Result for one ratio.
    pub fn result(&self, ratio: &str) -> Option<&RatioResult> {
        self.results.iter().find(|r| r.ratio == ratio)
    }

    /// Baselines for one ratio; empty when it declares none.
    pub fn benchmarks(&self, ratio: &str) -> &[BenchmarkSet] {
        self.benchmarks.get(ratio).map_or(&[], Vec::as_slice)
    }

    /// Baseline for one ratio and target.
    pub fn benchmark(&self, ratio: &str, target: BenchmarkTarget) -> Option<&BenchmarkSet> {
        self.benchmarks(ratio).iter().find(|s| s.target == target)
    }

    /// Presentation metadata.
    pub const fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    /// Flatten to one row per `(ratio, fiscal year)` emitted by each result.
    ///
    /// Trend ratios produce a row for every period year; single-value ratios
    /// produce one row for the year they report.
    pub fn rows(&self) -> Vec<ReportRow> {
        self.results
            .iter()
            .flat_map(|result| {
                let industry = self.benchmark(&result.ratio, BenchmarkTarget::Industry);
                let market = self.benchmark(&result.ratio, BenchmarkTarget::Market);
                result.values().iter().map(move |v| ReportRow {
                    ratio: result.ratio.clone(),
                    fiscal_year: v.fiscal_year,
                    value: v.value,
                    industry: industry.and_then(|s| s.value_for(v.fiscal_year)),
                    market: market.and_then(|s| s.value_for(v.fiscal_year)),
                    data_quality: result.data_quality,
                })
            })
            .collect()
    }

    /// The flattened rows as a DataFrame.
    ///
    /// Columns: `ratio`, `fiscal_year`, `value`, `industry`, `market`,
    /// `data_quality`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let rows = self.rows();
        let frame = df![
            "ratio" => rows.iter().map(|r| r.ratio.as_str()).collect::<Vec<_>>(),
            "fiscal_year" => rows.iter().map(|r| r.fiscal_year).collect::<Vec<_>>(),
            "value" => rows.iter().map(|r| r.value).collect::<Vec<_>>(),
            "industry" => rows.iter().map(|r| r.industry).collect::<Vec<_>>(),
            "market" => rows.iter().map(|r| r.market).collect::<Vec<_>>(),
            "data_quality" => rows.iter().map(|r| r.data_quality.to_string()).collect::<Vec<_>>()
        ]?;
        Ok(frame)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds [`Report`]s from a populated [`FactStore`].
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    registry: Arc<RatioRegistry>,
    config: EngineConfig,
    calculator: RatioCalculator,
    aggregator: BenchmarkAggregator,
}

impl ReportAssembler {
    /// Assembler with the default configuration.
    pub fn new(registry: Arc<RatioRegistry>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    /// Assembler with an explicit configuration.
    pub const fn with_config(registry: Arc<RatioRegistry>, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            calculator: RatioCalculator::new(),
            aggregator: BenchmarkAggregator::new(),
        }
    }

    /// Returns the current configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registry the assembler evaluates.
    pub fn registry(&self) -> &RatioRegistry {
        &self.registry
    }

    /// Assemble a report for `company_id` over `period`.
    ///
    /// `market_index` falls back to the configured index. Fails only when the
    /// subject has no facts; every other gap degrades individual results.
    #[instrument(
        skip(self, store, company_id, period, peers, market_index),
        fields(company = %company_id, years = period.len())
    )]
    pub fn assemble(
        &self,
        store: &FactStore,
        company_id: &CompanyId,
        period: &Period,
        peers: &[CompanyId],
        market_index: Option<&CompanyId>,
    ) -> Result<Report> {
        let facts = store
            .company(company_id)
            .filter(|facts| !facts.is_empty())
            .ok_or_else(|| RatioError::InsufficientData {
                company: company_id.to_string(),
            })?;

        let market_index = market_index.or(self.config.market_index.as_ref());
        let peers = self.select_peers(company_id, peers, market_index);
        let excluded_peers: Vec<CompanyId> = peers
            .iter()
            .filter(|peer| !store.has_data(peer))
            .cloned()
            .collect();

        let definitions = self.registry.get_all();
        let (results, benchmarks) = rayon::join(
            || {
                definitions
                    .par_iter()
                    .map(|def| self.calculator.compute(def, company_id, facts, period))
                    .collect::<Vec<_>>()
            },
            || {
                definitions
                    .par_iter()
                    .filter(|def| !def.benchmarks.is_empty())
                    .map(|def| {
                        let sets = self
                            .aggregator
                            .aggregate(def, store, &peers, market_index, period);
                        (def.name.to_string(), sets)
                    })
                    .collect::<BTreeMap<_, _>>()
            },
        );

        let currency = facts.currency().map(str::to_string);
        if currency.is_none() && facts.currencies().count() > 1 {
            warn!(
                company = %company_id,
                currencies = ?facts.currencies().collect::<Vec<_>>(),
                "facts mix reporting currencies; values are not normalized"
            );
        }

        let estimated_beta = market_index
            .and_then(|id| store.company(id))
            .and_then(|market| {
                annual_beta(facts, market, period, self.config.min_beta_observations)
            });

        let completeness = Completeness::from_results(&results);
        info!(
            complete = completeness.complete,
            partial = completeness.partial,
            unavailable = completeness.unavailable,
            peers = peers.len(),
            "assembled report"
        );

        Ok(Report {
            company_id: company_id.clone(),
            period: period.clone(),
            results,
            benchmarks,
            metadata: ReportMetadata {
                currency,
                period_labels: period.labels(),
                completeness,
                peers,
                excluded_peers,
                market_index: market_index.cloned(),
                estimated_beta,
                generated_at: Utc::now(),
            },
        })
    }

    /// Drop the subject, the market index and duplicates, then apply the
    /// configured peer cap.
    pub(crate) fn select_peers(
        &self,
        subject: &CompanyId,
        peers: &[CompanyId],
        market_index: Option<&CompanyId>,
    ) -> Vec<CompanyId> {
        let mut selected: Vec<CompanyId> = Vec::with_capacity(peers.len());
        for peer in peers {
            if peer == subject || Some(peer) == market_index || selected.contains(peer) {
                debug!(peer = %peer, "dropping peer");
                continue;
            }
            selected.push(peer.clone());
        }
        if let Some(max) = self.config.max_peers {
            selected.truncate(max);
        }
        selected
    }
}
