//! Market performance ratios.
//!
//! Market capitalization and beta are reported figures rather than quotients;
//! they run through the same formula path so missing values degrade the same
//! way as every other ratio.

use crate::benchmark::BenchmarkTarget::{Industry, Market};
use crate::registry::{FormulaInputs, divide};
use crate::{LineItem, Presentation, RatioCategory, RatioDefinition, Scale, Unit};

/// Dividend Yield.
///
/// ```text
/// Dividend Yield (%) = Dividend Per Share / Stock Price × 100
/// ```
pub const DIVIDEND_YIELD: RatioDefinition = RatioDefinition {
    name: "dividend_yield",
    label: "Dividend Yield (%)",
    description: "Annual dividend per share as a percentage of the share price",
    category: RatioCategory::MarketPerformance,
    presentation: Presentation::Trend,
    unit: Unit::Percent,
    scale: Scale::Percent,
    numerator: &[LineItem::DividendPerShare],
    denominator: &[LineItem::StockPrice],
    averaged: &[],
    formula: dividend_yield,
    benchmarks: &[Market],
};

/// Market Capitalization as reported by the fact provider.
pub const MARKET_CAPITALIZATION: RatioDefinition = RatioDefinition {
    name: "market_capitalization",
    label: "Market Capitalization",
    description: "Market value of outstanding equity",
    category: RatioCategory::MarketPerformance,
    presentation: Presentation::Single,
    unit: Unit::Currency,
    scale: Scale::Raw,
    numerator: &[LineItem::MarketCap],
    denominator: &[],
    averaged: &[],
    formula: market_capitalization,
    benchmarks: &[Industry, Market],
};

/// Beta (stock volatility relative to the market) as reported.
///
/// A regression estimate over fiscal-year returns is attached to reports
/// separately, see [`crate::regression::annual_beta`].
pub const BETA: RatioDefinition = RatioDefinition {
    name: "beta",
    label: "Beta (Stock Volatility)",
    description: "Sensitivity of the stock's returns to market returns",
    category: RatioCategory::MarketPerformance,
    presentation: Presentation::Single,
    unit: Unit::Coefficient,
    scale: Scale::Raw,
    numerator: &[LineItem::Beta],
    denominator: &[],
    averaged: &[],
    formula: beta,
    benchmarks: &[Industry],
};

/// Market performance definitions in presentation order.
pub const DEFINITIONS: &[RatioDefinition] = &[DIVIDEND_YIELD, MARKET_CAPITALIZATION, BETA];

fn dividend_yield(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::DividendPerShare)?,
        inputs.get(LineItem::StockPrice)?,
    )
}

fn market_capitalization(inputs: &FormulaInputs) -> Option<f64> {
    inputs.get(LineItem::MarketCap)
}

fn beta(inputs: &FormulaInputs) -> Option<f64> {
    inputs.get(LineItem::Beta)
}
