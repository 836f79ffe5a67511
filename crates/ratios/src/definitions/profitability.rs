//! Profitability ratios - margins and returns on capital.
//!
//! Percentage ratios return raw fractions here; the calculator applies the
//! ×100 scaling so intermediate values stay unscaled.

use crate::benchmark::BenchmarkTarget::{Industry, Market};
use crate::registry::{FormulaInputs, divide};
use crate::{LineItem, Presentation, RatioCategory, RatioDefinition, Scale, Unit};

/// Net Profit Margin.
///
/// ```text
/// Net Profit Margin (%) = Net Profit / Revenue × 100
/// ```
pub const NET_PROFIT_MARGIN: RatioDefinition = RatioDefinition {
    name: "net_profit_margin",
    label: "Net Profit Margin (%)",
    description: "Net profit as a percentage of revenue",
    category: RatioCategory::Profitability,
    presentation: Presentation::Trend,
    unit: Unit::Percent,
    scale: Scale::Percent,
    numerator: &[LineItem::NetProfit],
    denominator: &[LineItem::Revenue],
    averaged: &[],
    formula: net_profit_margin,
    benchmarks: &[Industry, Market],
};

/// Operating Profit Margin.
///
/// ```text
/// Operating Profit Margin (%) = Operating Profit / Revenue × 100
/// ```
pub const OPERATING_PROFIT_MARGIN: RatioDefinition = RatioDefinition {
    name: "operating_profit_margin",
    label: "Operating Profit Margin (%)",
    description: "Operating profit as a percentage of revenue",
    category: RatioCategory::Profitability,
    presentation: Presentation::Trend,
    unit: Unit::Percent,
    scale: Scale::Percent,
    numerator: &[LineItem::OperatingProfit],
    denominator: &[LineItem::Revenue],
    averaged: &[],
    formula: operating_profit_margin,
    benchmarks: &[Industry],
};

/// Return on Equity.
///
/// ```text
/// ROE (%) = Net Profit / Shareholders' Equity × 100
/// ```
pub const RETURN_ON_EQUITY: RatioDefinition = RatioDefinition {
    name: "return_on_equity",
    label: "Return on Equity (ROE) (%)",
    description: "Net profit as a percentage of shareholders' equity",
    category: RatioCategory::Profitability,
    presentation: Presentation::Trend,
    unit: Unit::Percent,
    scale: Scale::Percent,
    numerator: &[LineItem::NetProfit],
    denominator: &[LineItem::ShareholdersEquity],
    averaged: &[],
    formula: return_on_equity,
    benchmarks: &[Industry, Market],
};

/// Return on Assets.
///
/// ```text
/// ROA (%) = Net Profit / Total Assets × 100
/// ```
pub const RETURN_ON_ASSETS: RatioDefinition = RatioDefinition {
    name: "return_on_assets",
    label: "Return on Assets (ROA) (%)",
    description: "Net profit as a percentage of total assets",
    category: RatioCategory::Profitability,
    presentation: Presentation::Trend,
    unit: Unit::Percent,
    scale: Scale::Percent,
    numerator: &[LineItem::NetProfit],
    denominator: &[LineItem::TotalAssets],
    averaged: &[],
    formula: return_on_assets,
    benchmarks: &[Industry],
};

/// Return on Capital Employed.
///
/// ```text
/// Capital Employed = Total Assets - Current Liabilities
/// ROCE (%)         = EBIT / Capital Employed × 100
/// ```
///
/// Undefined when capital employed is zero or negative.
pub const RETURN_ON_CAPITAL_EMPLOYED: RatioDefinition = RatioDefinition {
    name: "return_on_capital_employed",
    label: "Return on Capital Employed (ROCE) (%)",
    description: "EBIT as a percentage of total assets less current liabilities",
    category: RatioCategory::Profitability,
    presentation: Presentation::Trend,
    unit: Unit::Percent,
    scale: Scale::Percent,
    numerator: &[LineItem::Ebit],
    denominator: &[LineItem::TotalAssets, LineItem::CurrentLiabilities],
    averaged: &[],
    formula: return_on_capital_employed,
    benchmarks: &[Industry],
};

/// Earnings Per Share.
///
/// ```text
/// EPS = Net Profit / Shares Outstanding
/// ```
pub const EARNINGS_PER_SHARE: RatioDefinition = RatioDefinition {
    name: "earnings_per_share",
    label: "Earnings Per Share (EPS)",
    description: "Net profit per share outstanding",
    category: RatioCategory::Profitability,
    presentation: Presentation::Single,
    unit: Unit::PerShare,
    scale: Scale::Raw,
    numerator: &[LineItem::NetProfit],
    denominator: &[LineItem::SharesOutstanding],
    averaged: &[],
    formula: earnings_per_share,
    benchmarks: &[Industry],
};

/// Profitability definitions in presentation order.
pub const DEFINITIONS: &[RatioDefinition] = &[
    NET_PROFIT_MARGIN,
    OPERATING_PROFIT_MARGIN,
    RETURN_ON_EQUITY,
    RETURN_ON_ASSETS,
    RETURN_ON_CAPITAL_EMPLOYED,
    EARNINGS_PER_SHARE,
];

fn net_profit_margin(inputs: &FormulaInputs) -> Option<f64> {
    divide(inputs.get(LineItem::NetProfit)?, inputs.get(LineItem::Revenue)?)
}

fn operating_profit_margin(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::OperatingProfit)?,
        inputs.get(LineItem::Revenue)?,
    )
}

fn return_on_equity(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::NetProfit)?,
        inputs.get(LineItem::ShareholdersEquity)?,
    )
}

fn return_on_assets(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::NetProfit)?,
        inputs.get(LineItem::TotalAssets)?,
    )
}

fn return_on_capital_employed(inputs: &FormulaInputs) -> Option<f64> {
    let capital_employed =
        inputs.get(LineItem::TotalAssets)? - inputs.get(LineItem::CurrentLiabilities)?;
    if capital_employed <= 0.0 {
        return None;
    }
    divide(inputs.get(LineItem::Ebit)?, capital_employed)
}

/// Per-share earnings, shared with the valuation ratios.
pub(crate) fn eps(inputs: &FormulaInputs) -> Option<f64> {
    let shares = inputs.get(LineItem::SharesOutstanding)?;
    if shares <= 0.0 {
        return None;
    }
    divide(inputs.get(LineItem::NetProfit)?, shares)
}

fn earnings_per_share(inputs: &FormulaInputs) -> Option<f64> {
    eps(inputs)
}
