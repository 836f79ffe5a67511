//! Provider traits for supplying facts and peer groups.
//!
//! - [`FactProvider`] - Financial facts for one company
//! - [`PeerProvider`] - Industry peers and the market index
//!
//! [`InMemoryProvider`] implements both over a fixed fact set and is what the
//! CLI loads from JSON.

use crate::{CompanyId, FactStore, FinancialFact, FiscalYear, Period, RatioError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;

/// Source of financial facts.
#[async_trait]
pub trait FactProvider: Send + Sync + Debug {
    /// Fetches facts for a company covering `period`.
    ///
    /// Implementations should include the year before the first period year
    /// when available; averaged ratios and price returns read it.
    async fn get_facts(
        &self,
        company_id: &CompanyId,
        period: &Period,
    ) -> Result<Vec<FinancialFact>>;
}

/// Source of peer groups.
#[async_trait]
pub trait PeerProvider: Send + Sync + Debug {
    /// Industry peers for a company. May include the company itself.
    async fn peers_for(&self, company_id: &CompanyId) -> Result<Vec<CompanyId>>;

    /// Identifier of the market index pseudo-company, if any.
    async fn market_index_id(&self) -> Result<Option<CompanyId>>;
}

/// Fixed facts and peer groups held in memory.
///
/// Deserializes from:
///
/// ```json
/// {
///   "facts": [{ "company_id": "ACME", "fiscal_year": 2023,
///               "line_item": "revenue", "value": 500.0 }],
///   "peers": { "ACME": ["BETA", "GAMMA"] },
///   "market_index": "^GSPC"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InMemoryProvider {
    facts: Vec<FinancialFact>,
    peers: BTreeMap<CompanyId, Vec<CompanyId>>,
    market_index: Option<CompanyId>,
}

impl InMemoryProvider {
    /// Provider over the given facts with no peer groups.
    pub fn new(facts: impl IntoIterator<Item = FinancialFact>) -> Self {
        Self {
            facts: facts.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Set the peer group for a company.
    #[must_use]
    pub fn with_peers(
        mut self,
        company_id: impl Into<CompanyId>,
        peers: impl IntoIterator<Item = impl Into<CompanyId>>,
    ) -> Self {
        self.peers
            .insert(company_id.into(), peers.into_iter().map(Into::into).collect());
        self
    }

    /// Set the market index.
    #[must_use]
    pub fn with_market_index(mut self, market_index: impl Into<CompanyId>) -> Self {
        self.market_index = Some(market_index.into());
        self
    }

    /// Parse a provider from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a provider from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| RatioError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json_str(&contents)
    }

    /// Latest fiscal year with a reported value for a company.
    pub fn latest_year(&self, company_id: &CompanyId) -> Option<FiscalYear> {
        self.facts
            .iter()
            .filter(|f| &f.company_id == company_id && f.value.is_some())
            .map(|f| f.fiscal_year)
            .max()
    }

    /// Every fact as a validated store.
    pub fn to_store(&self) -> Result<FactStore> {
        FactStore::from_facts(self.facts.iter().cloned())
    }
}

#[async_trait]
impl FactProvider for InMemoryProvider {
    async fn get_facts(
        &self,
        company_id: &CompanyId,
        period: &Period,
    ) -> Result<Vec<FinancialFact>> {
        let seed_year = period
            .years()
            .iter()
            .min()
            .and_then(|year| year.checked_sub(1));
        Ok(self
            .facts
            .iter()
            .filter(|f| &f.company_id == company_id)
            .filter(|f| period.years().contains(&f.fiscal_year) || Some(f.fiscal_year) == seed_year)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PeerProvider for InMemoryProvider {
    async fn peers_for(&self, company_id: &CompanyId) -> Result<Vec<CompanyId>> {
        Ok(self.peers.get(company_id).cloned().unwrap_or_default())
    }

    async fn market_index_id(&self) -> Result<Option<CompanyId>> {
        Ok(self.market_index.clone())
    }
}
