//! Fiscal year windows.

use crate::{FiscalYear, RatioError, Result};
use serde::Serialize;
use std::collections::HashSet;

/// Longest window [`Period::trailing`] builds.
pub const MAX_YEARS: usize = 200;

/// A non-empty, duplicate-free list of fiscal years in caller order.
///
/// Results follow this order exactly, so callers charting a trend ascending
/// pass ascending years and get an ascending series back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Period {
    years: Vec<FiscalYear>,
}

impl Period {
    /// Validate a caller-supplied list of years.
    pub fn new(years: impl Into<Vec<FiscalYear>>) -> Result<Self> {
        let years = years.into();
        if years.is_empty() {
            return Err(RatioError::InvalidPeriod("no fiscal years requested".to_string()));
        }

        let mut seen = HashSet::with_capacity(years.len());
        if let Some(dup) = years.iter().find(|year| !seen.insert(**year)) {
            return Err(RatioError::InvalidPeriod(format!(
                "fiscal year {dup} requested more than once"
            )));
        }

        Ok(Self { years })
    }

    /// The ascending window of `count` years ending at `end`.
    ///
    /// Windows longer than [`MAX_YEARS`] or starting before the earliest
    /// representable year are rejected.
    pub fn trailing(end: FiscalYear, count: usize) -> Result<Self> {
        if count > MAX_YEARS {
            return Err(RatioError::InvalidPeriod(format!(
                "window of {count} years exceeds the maximum of {MAX_YEARS}"
            )));
        }
        let Some(span) = count.checked_sub(1) else {
            return Self::new(Vec::new());
        };
        let start = FiscalYear::try_from(span)
            .ok()
            .and_then(|span| end.checked_sub(span))
            .ok_or_else(|| {
                RatioError::InvalidPeriod(format!("window of {count} years ending in {end}"))
            })?;
        Self::new((start..=end).collect::<Vec<_>>())
    }

    /// Years in caller order.
    pub fn years(&self) -> &[FiscalYear] {
        &self.years
    }

    /// The most recent year, regardless of ordering.
    pub fn latest(&self) -> FiscalYear {
        // Non-empty by construction.
        self.years.iter().copied().max().unwrap_or_default()
    }

    /// Number of years in the window.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Period labels for presentation (`FY2023`).
    pub fn labels(&self) -> Vec<String> {
        self.years.iter().map(|year| format!("FY{year}")).collect()
    }
}
