//! Standard ratio definitions, grouped by category.
//!
//! Each submodule exposes its definitions as constants plus a `DEFINITIONS`
//! slice in presentation order. [`all`] concatenates them for the default
//! registry.

pub mod efficiency;
pub mod liquidity;
pub mod market;
pub mod profitability;
pub mod solvency;
pub mod valuation;

use crate::RatioDefinition;

/// Every standard definition in registry order.
pub fn all() -> Vec<RatioDefinition> {
    [
        profitability::DEFINITIONS,
        liquidity::DEFINITIONS,
        solvency::DEFINITIONS,
        efficiency::DEFINITIONS,
        valuation::DEFINITIONS,
        market::DEFINITIONS,
    ]
    .concat()
}
