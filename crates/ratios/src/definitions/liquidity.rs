//! Liquidity ratios - ability to meet short-term obligations.

use crate::benchmark::BenchmarkTarget::Industry;
use crate::registry::{FormulaInputs, divide};
use crate::{LineItem, Presentation, RatioCategory, RatioDefinition, Scale, Unit};

/// Current Ratio.
///
/// ```text
/// Current Ratio = Current Assets / Current Liabilities
/// ```
///
/// A ratio above 1.0 indicates short-term assets cover short-term liabilities.
pub const CURRENT_RATIO: RatioDefinition = RatioDefinition {
    name: "current_ratio",
    label: "Current Ratio",
    description: "Current assets divided by current liabilities",
    category: RatioCategory::Liquidity,
    presentation: Presentation::Trend,
    unit: Unit::Ratio,
    scale: Scale::Raw,
    numerator: &[LineItem::CurrentAssets],
    denominator: &[LineItem::CurrentLiabilities],
    averaged: &[],
    formula: current_ratio,
    benchmarks: &[Industry],
};

/// Quick Ratio.
///
/// ```text
/// Quick Ratio = (Current Assets - Inventory) / Current Liabilities
/// ```
pub const QUICK_RATIO: RatioDefinition = RatioDefinition {
    name: "quick_ratio",
    label: "Quick Ratio",
    description: "Current assets excluding inventory divided by current liabilities",
    category: RatioCategory::Liquidity,
    presentation: Presentation::Trend,
    unit: Unit::Ratio,
    scale: Scale::Raw,
    numerator: &[LineItem::CurrentAssets, LineItem::Inventory],
    denominator: &[LineItem::CurrentLiabilities],
    averaged: &[],
    formula: quick_ratio,
    benchmarks: &[Industry],
};

/// Cash Ratio.
///
/// ```text
/// Cash Ratio = Cash & Equivalents / Current Liabilities
/// ```
pub const CASH_RATIO: RatioDefinition = RatioDefinition {
    name: "cash_ratio",
    label: "Cash Ratio",
    description: "Cash and equivalents divided by current liabilities",
    category: RatioCategory::Liquidity,
    presentation: Presentation::Single,
    unit: Unit::Ratio,
    scale: Scale::Raw,
    numerator: &[LineItem::Cash],
    denominator: &[LineItem::CurrentLiabilities],
    averaged: &[],
    formula: cash_ratio,
    benchmarks: &[Industry],
};

/// Liquidity definitions in presentation order.
pub const DEFINITIONS: &[RatioDefinition] = &[CURRENT_RATIO, QUICK_RATIO, CASH_RATIO];

fn current_ratio(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::CurrentAssets)?,
        inputs.get(LineItem::CurrentLiabilities)?,
    )
}

fn quick_ratio(inputs: &FormulaInputs) -> Option<f64> {
    let quick_assets = inputs.get(LineItem::CurrentAssets)? - inputs.get(LineItem::Inventory)?;
    divide(quick_assets, inputs.get(LineItem::CurrentLiabilities)?)
}

fn cash_ratio(inputs: &FormulaInputs) -> Option<f64> {
    divide(
        inputs.get(LineItem::Cash)?,
        inputs.get(LineItem::CurrentLiabilities)?,
    )
}
