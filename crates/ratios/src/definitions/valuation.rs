//! Valuation ratios - market price relative to fundamentals.

use super::profitability::eps;
use crate::benchmark::BenchmarkTarget::{Industry, Market};
use crate::registry::{FormulaInputs, divide};
use crate::{LineItem, Presentation, RatioCategory, RatioDefinition, Scale, Unit};

/// Price-to-Earnings Ratio.
///
/// ```text
/// EPS = Net Profit / Shares Outstanding
/// P/E = Stock Price / EPS
/// ```
pub const PRICE_TO_EARNINGS: RatioDefinition = RatioDefinition {
    name: "price_to_earnings",
    label: "Price-to-Earnings (P/E) Ratio",
    description: "Fiscal year-end share price divided by earnings per share",
    category: RatioCategory::Valuation,
    presentation: Presentation::Trend,
    unit: Unit::Times,
    scale: Scale::Raw,
    numerator: &[LineItem::StockPrice],
    denominator: &[LineItem::NetProfit, LineItem::SharesOutstanding],
    averaged: &[],
    formula: price_to_earnings,
    benchmarks: &[Industry, Market],
};

/// Price-to-Book Ratio.
///
/// ```text
/// Book Value Per Share = Shareholders' Equity / Shares Outstanding
/// P/B                  = Stock Price / Book Value Per Share
/// ```
pub const PRICE_TO_BOOK: RatioDefinition = RatioDefinition {
    name: "price_to_book",
    label: "Price-to-Book (P/B) Ratio",
    description: "Fiscal year-end share price divided by book value per share",
    category: RatioCategory::Valuation,
    presentation: Presentation::Trend,
    unit: Unit::Times,
    scale: Scale::Raw,
    numerator: &[LineItem::StockPrice],
    denominator: &[LineItem::ShareholdersEquity, LineItem::SharesOutstanding],
    averaged: &[],
    formula: price_to_book,
    benchmarks: &[Industry, Market],
};

/// Enterprise Value to EBITDA.
///
/// ```text
/// EV        = Market Cap + Total Debt - Cash
/// EV/EBITDA = EV / EBITDA
/// ```
pub const EV_TO_EBITDA: RatioDefinition = RatioDefinition {
    name: "ev_to_ebitda",
    label: "Enterprise Value to EBITDA (EV/EBITDA)",
    description: "Enterprise value divided by EBITDA",
    category: RatioCategory::Valuation,
    presentation: Presentation::Single,
    unit: Unit::Times,
    scale: Scale::Raw,
    numerator: &[LineItem::MarketCap, LineItem::TotalDebt, LineItem::Cash],
    denominator: &[LineItem::Ebitda],
    averaged: &[],
    formula: ev_to_ebitda,
    benchmarks: &[Industry, Market],
};

/// Valuation definitions in presentation order.
pub const DEFINITIONS: &[RatioDefinition] = &[PRICE_TO_EARNINGS, PRICE_TO_BOOK, EV_TO_EBITDA];

fn price_to_earnings(inputs: &FormulaInputs) -> Option<f64> {
    divide(inputs.get(LineItem::StockPrice)?, eps(inputs)?)
}

fn price_to_book(inputs: &FormulaInputs) -> Option<f64> {
    let shares = inputs.get(LineItem::SharesOutstanding)?;
    if shares <= 0.0 {
        return None;
    }
    let book_per_share = divide(inputs.get(LineItem::ShareholdersEquity)?, shares)?;
    divide(inputs.get(LineItem::StockPrice)?, book_per_share)
}

fn ev_to_ebitda(inputs: &FormulaInputs) -> Option<f64> {
    let enterprise_value = inputs.get(LineItem::MarketCap)? + inputs.get(LineItem::TotalDebt)?
        - inputs.get(LineItem::Cash)?;
    divide(enterprise_value, inputs.get(LineItem::Ebitda)?)
}
