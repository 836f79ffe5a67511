//! Beta estimation from fiscal-year price returns.
//!
//! `β = Cov(R_s, R_m) / Var(R_m)`
//!
//! Returns are measured between consecutive fiscal year-end prices. The
//! window is the requested period; the year before the first period year, when
//! reported, seeds the first return.

use crate::registry::divide;
use crate::{CompanyFacts, FiscalYear, LineItem, Period};
use ndarray::Array1;
use std::collections::BTreeMap;

/// Default minimum number of paired annual returns for an estimate.
pub const DEFAULT_MIN_OBSERVATIONS: usize = 3;

/// Fiscal-year price returns `p_t / p_{t-1} - 1` for each year of `period`.
///
/// Years missing either price, or with a non-positive prior price, are
/// skipped.
pub fn annual_returns(facts: &CompanyFacts, period: &Period) -> BTreeMap<FiscalYear, f64> {
    period
        .years()
        .iter()
        .filter_map(|&year| {
            let price = facts.get(year, LineItem::StockPrice)?;
            let prior = year
                .checked_sub(1)
                .and_then(|prior_year| facts.get(prior_year, LineItem::StockPrice))
                .filter(|p| *p > 0.0)?;
            Some((year, price / prior - 1.0))
        })
        .collect()
}

/// Regression beta of `subject` against `market` over `period`.
///
/// Only years where both returns exist are paired. Returns `None` with fewer
/// than `min_observations` pairs (never fewer than two) or when the market
/// returns have zero variance.
pub fn annual_beta(
    subject: &CompanyFacts,
    market: &CompanyFacts,
    period: &Period,
    min_observations: usize,
) -> Option<f64> {
    let market_returns = annual_returns(market, period);
    let (subject_returns, market_returns): (Vec<f64>, Vec<f64>) = annual_returns(subject, period)
        .into_iter()
        .filter_map(|(year, r)| market_returns.get(&year).map(|m| (r, *m)))
        .unzip();

    if subject_returns.len() < min_observations.max(2) {
        return None;
    }

    let subject_returns = Array1::from_vec(subject_returns);
    let market_returns = Array1::from_vec(market_returns);
    let subject_dev = &subject_returns - subject_returns.mean()?;
    let market_dev = &market_returns - market_returns.mean()?;

    // The (n - 1) normalisation cancels between covariance and variance.
    divide(subject_dev.dot(&market_dev), market_dev.dot(&market_dev))
}
