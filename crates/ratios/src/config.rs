//! Engine configuration.

use crate::regression::DEFAULT_MIN_OBSERVATIONS;
use crate::{CompanyId, FiscalYear, Period, RatioError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for report assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of fiscal years in the report window
    pub years: usize,
    /// Last fiscal year of the window; defaults to the subject's latest
    /// reported year
    pub end_year: Option<FiscalYear>,
    /// Market index pseudo-company used for market baselines
    pub market_index: Option<CompanyId>,
    /// Upper bound on the number of industry peers
    pub max_peers: Option<usize>,
    /// Minimum paired annual returns for the regression beta
    pub min_beta_observations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            years: 5,
            end_year: None,
            market_index: None,
            max_peers: None,
            min_beta_observations: DEFAULT_MIN_OBSERVATIONS,
        }
    }
}

impl EngineConfig {
    /// Read a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| RatioError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// The report window for a subject whose latest reported year is
    /// `latest_year`.
    ///
    /// Fails with [`RatioError::InsufficientData`] when no end year is
    /// configured and the subject has no facts to infer one from.
    pub fn period_for(&self, company: &CompanyId, latest_year: Option<FiscalYear>) -> Result<Period> {
        let end = self
            .end_year
            .or(latest_year)
            .ok_or_else(|| RatioError::InsufficientData {
                company: company.to_string(),
            })?;
        Period::trailing(end, self.years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FactStore, FinancialFact, LineItem};

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.years, 5);
        assert_eq!(config.min_beta_observations, 3);
        assert!(config.market_index.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "years": 3, "market_index": "^gspc" }"#).unwrap();
        assert_eq!(config.years, 3);
        assert_eq!(config.market_index, Some(CompanyId::new("^GSPC")));
        assert_eq!(config.min_beta_observations, 3);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<EngineConfig>(r#"{ "yeras": 3 }"#).is_err());
    }

    #[test]
    fn test_period_from_latest_fact() {
        let store =
            FactStore::from_facts([FinancialFact::new("ACME", 2022, LineItem::Revenue, 1.0)])
                .unwrap();
        let id = CompanyId::new("ACME");
        let config = EngineConfig {
            years: 3,
            ..EngineConfig::default()
        };
        let period = config.period_for(&id, store.company(&id).and_then(|f| f.latest_year())).unwrap();
        assert_eq!(period.years(), &[2020, 2021, 2022]);

        let missing = CompanyId::new("NONE");
        assert!(matches!(
            config.period_for(&missing, store.company(&missing).and_then(|f| f.latest_year())),
            Err(RatioError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_explicit_end_year() {
        let config = EngineConfig {
            years: 2,
            end_year: Some(2024),
            ..EngineConfig::default()
        };
        let period = config.period_for(&CompanyId::new("ACME"), None).unwrap();
        assert_eq!(period.years(), &[2023, 2024]);
    }
}
