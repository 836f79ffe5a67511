//! Efficiency ratios - how well a company turns its assets into sales.
//!
//! The turnover ratios divide by the average of the current and prior fiscal
//! year balance. When the prior year was not reported they fall back to the
//! current balance alone instead of dropping the year.

use crate::benchmark::BenchmarkTarget::Industry;
use crate::registry::{FormulaInputs, divide};
use crate::{LineItem, Presentation, RatioCategory, RatioDefinition, Scale, Unit};

/// Days in a fiscal year for DSO.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Asset Turnover Ratio.
///
/// ```text
/// Asset Turnover = Revenue / Average Total Assets
/// ```
pub const ASSET_TURNOVER: RatioDefinition = RatioDefinition {
    name: "asset_turnover",
    label: "Asset Turnover Ratio",
    description: "Revenue divided by average total assets",
    category: RatioCategory::Efficiency,
    presentation: Presentation::Trend,
    unit: Unit::Times,
    scale: Scale::Raw,
    numerator: &[LineItem::Revenue],
    denominator: &[LineItem::TotalAssets],
    averaged: &[LineItem::TotalAssets],
    formula: asset_turnover,
    benchmarks: &[Industry],
};

/// Inventory Turnover Ratio.
///
/// ```text
/// Inventory Turnover = COGS / Average Inventory
/// ```
pub const INVENTORY_TURNOVER: RatioDefinition = RatioDefinition {
    name: "inventory_turnover",
    label: "Inventory Turnover Ratio",
    description: "Cost of goods sold divided by average inventory",
    category: RatioCategory::Efficiency,
    presentation: Presentation::Trend,
    unit: Unit::Times,
    scale: Scale::Raw,
    numerator: &[LineItem::Cogs],
    denominator: &[LineItem::Inventory],
    averaged: &[LineItem::Inventory],
    formula: inventory_turnover,
    benchmarks: &[Industry],
};

/// Receivables Turnover Ratio.
///
/// ```text
/// Receivables Turnover = Revenue / Average Accounts Receivable
/// ```
pub const RECEIVABLES_TURNOVER: RatioDefinition = RatioDefinition {
    name: "receivables_turnover",
    label: "Receivables Turnover Ratio",
    description: "Revenue divided by average accounts receivable",
    category: RatioCategory::Efficiency,
    presentation: Presentation::Trend,
    unit: Unit::Times,
    scale: Scale::Raw,
    numerator: &[LineItem::Revenue],
    denominator: &[LineItem::AccountsReceivable],
    averaged: &[LineItem::AccountsReceivable],
    formula: receivables_turnover,
    benchmarks: &[Industry],
};

/// Days Sales Outstanding.
///
/// ```text
/// DSO = Accounts Receivable / Revenue × 365
/// ```
pub const DAYS_SALES_OUTSTANDING: RatioDefinition = RatioDefinition {
    name: "days_sales_outstanding",
    label: "Days Sales Outstanding (DSO)",
    description: "Average days to collect receivables",
    category: RatioCategory::Efficiency,
    presentation: Presentation::Single,
    unit: Unit::Days,
    scale: Scale::Raw,
    numerator: &[LineItem::AccountsReceivable],
    denominator: &[LineItem::Revenue],
    averaged: &[],
    formula: days_sales_outstanding,
    benchmarks: &[Industry],
};

/// Efficiency definitions in presentation order.
pub const DEFINITIONS: &[RatioDefinition] = &[
    ASSET_TURNOVER,
    INVENTORY_TURNOVER,
    RECEIVABLES_TURNOVER,
    DAYS_SALES_OUTSTANDING,
];

fn asset_turnover(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::Revenue)?,
        inputs.average(LineItem::TotalAssets)?,
    )
}

fn inventory_turnover(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::Cogs)?,
        inputs.average(LineItem::Inventory)?,
    )
}

fn receivables_turnover(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::Revenue)?,
        inputs.average(LineItem::AccountsReceivable)?,
    )
}

fn days_sales_outstanding(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::AccountsReceivable)?,
        inputs.get(LineItem::Revenue)?,
    )
    .map(|fraction| fraction * DAYS_PER_YEAR)
}
