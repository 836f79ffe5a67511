//! Solvency ratios - leverage and debt service capacity.

use crate::benchmark::BenchmarkTarget::Industry;
use crate::registry::{FormulaInputs, divide};
use crate::{LineItem, Presentation, RatioCategory, RatioDefinition, Scale, Unit};

/// Debt-to-Equity Ratio.
///
/// ```text
/// D/E = Total Debt / Shareholders' Equity
/// ```
pub const DEBT_TO_EQUITY: RatioDefinition = RatioDefinition {
    name: "debt_to_equity",
    label: "Debt-to-Equity (D/E) Ratio",
    description: "Total debt divided by shareholders' equity",
    category: RatioCategory::Solvency,
    presentation: Presentation::Trend,
    unit: Unit::Ratio,
    scale: Scale::Raw,
    numerator: &[LineItem::TotalDebt],
    denominator: &[LineItem::ShareholdersEquity],
    averaged: &[],
    formula: debt_to_equity,
    benchmarks: &[Industry],
};

/// Interest Coverage Ratio.
///
/// ```text
/// Interest Coverage = EBIT / |Interest Expense|
/// ```
///
/// Providers disagree on the sign of interest expense, so its magnitude is
/// used.
pub const INTEREST_COVERAGE: RatioDefinition = RatioDefinition {
    name: "interest_coverage",
    label: "Interest Coverage Ratio",
    description: "EBIT divided by interest expense",
    category: RatioCategory::Solvency,
    presentation: Presentation::Trend,
    unit: Unit::Times,
    scale: Scale::Raw,
    numerator: &[LineItem::Ebit],
    denominator: &[LineItem::InterestExpense],
    averaged: &[],
    formula: interest_coverage,
    benchmarks: &[Industry],
};

/// Debt-to-Asset Ratio.
///
/// ```text
/// Debt-to-Asset = Total Debt / Total Assets
/// ```
pub const DEBT_TO_ASSETS: RatioDefinition = RatioDefinition {
    name: "debt_to_assets",
    label: "Debt-to-Asset Ratio",
    description: "Total debt divided by total assets",
    category: RatioCategory::Solvency,
    presentation: Presentation::Single,
    unit: Unit::Ratio,
    scale: Scale::Raw,
    numerator: &[LineItem::TotalDebt],
    denominator: &[LineItem::TotalAssets],
    averaged: &[],
    formula: debt_to_assets,
    benchmarks: &[Industry],
};

/// Solvency definitions in presentation order.
pub const DEFINITIONS: &[RatioDefinition] = &[DEBT_TO_EQUITY, INTEREST_COVERAGE, DEBT_TO_ASSETS];

fn debt_to_equity(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::TotalDebt)?,
        inputs.get(LineItem::ShareholdersEquity)?,
    )
}

fn interest_coverage(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::Ebit)?,
        inputs.get(LineItem::InterestExpense)?.abs(),
    )
}

fn debt_to_assets(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::TotalDebt)?,
        inputs.get(LineItem::TotalAssets)?,
    )
}
