#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratios/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod benchmark;
pub mod calculator;
pub mod config;
pub mod definitions;
pub mod engine;
pub mod error;
pub mod facts;
pub mod period;
pub mod provider;
pub mod regression;
pub mod registry;
pub mod report;

// Re-export core types
pub use benchmark::{BenchmarkAggregator, BenchmarkPoint, BenchmarkSet, BenchmarkTarget};
pub use calculator::{DataQuality, RatioCalculator, RatioResult, RatioValues, YearValue};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{RatioError, Result};
pub use facts::{CompanyFacts, CompanyId, FactStore, FinancialFact, FiscalYear, LineItem};
pub use period::{MAX_YEARS, Period};
pub use provider::{FactProvider, InMemoryProvider, PeerProvider};
pub use registry::{
    FormulaFn, FormulaInputs, Presentation, RatioCategory, RatioDefinition, RatioInfo,
    RatioRegistry, Scale, Unit,
};
pub use report::{Completeness, Report, ReportAssembler, ReportMetadata, ReportRow};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
