//! In-memory financial fact store.
//!
//! A fact is one line-item value for one company in one fiscal year. The store
//! holds at most one fact per `(company, year, line item)` and never turns a
//! missing value into zero: absent and null facts are simply not present when
//! a formula asks for them.

use crate::{RatioError, Result};
use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Fiscal year label (e.g. `2023`).
pub type FiscalYear = i32;

/// Resolved company or market-index identifier.
///
/// Identifiers are upper-cased on creation so `aapl` and `AAPL` refer to the
/// same company.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CompanyId(String);

impl CompanyId {
    /// Creates a new identifier, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompanyId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CompanyId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<CompanyId> for String {
    fn from(id: CompanyId) -> Self {
        id.0
    }
}

/// Closed set of statement line items the engine understands.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LineItem {
    /// Total revenue
    Revenue,
    /// Net income attributable to shareholders
    NetProfit,
    /// Operating income
    OperatingProfit,
    /// Earnings before interest and taxes
    Ebit,
    /// Earnings before interest, taxes, depreciation and amortization
    Ebitda,
    /// Total shareholders' equity
    ShareholdersEquity,
    /// Total assets
    TotalAssets,
    /// Total current assets
    CurrentAssets,
    /// Total current liabilities
    CurrentLiabilities,
    /// Inventory
    Inventory,
    /// Cash and cash equivalents
    Cash,
    /// Total debt
    TotalDebt,
    /// Interest expense
    InterestExpense,
    /// Net accounts receivable
    AccountsReceivable,
    /// Cost of goods sold
    Cogs,
    /// Shares outstanding
    SharesOutstanding,
    /// Fiscal year-end stock price
    StockPrice,
    /// Dividends paid per share over the fiscal year
    DividendPerShare,
    /// Market capitalization
    MarketCap,
    /// Reported beta against the market
    Beta,
}

impl LineItem {
    /// Every line item, in declaration order.
    pub const ALL: [Self; 20] = [
        Self::Revenue,
        Self::NetProfit,
        Self::OperatingProfit,
        Self::Ebit,
        Self::Ebitda,
        Self::ShareholdersEquity,
        Self::TotalAssets,
        Self::CurrentAssets,
        Self::CurrentLiabilities,
        Self::Inventory,
        Self::Cash,
        Self::TotalDebt,
        Self::InterestExpense,
        Self::AccountsReceivable,
        Self::Cogs,
        Self::SharesOutstanding,
        Self::StockPrice,
        Self::DividendPerShare,
        Self::MarketCap,
        Self::Beta,
    ];

    /// Stable snake_case name used in tabular and JSON inputs.
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::NetProfit => "net_profit",
            Self::OperatingProfit => "operating_profit",
            Self::Ebit => "ebit",
            Self::Ebitda => "ebitda",
            Self::ShareholdersEquity => "shareholders_equity",
            Self::TotalAssets => "total_assets",
            Self::CurrentAssets => "current_assets",
            Self::CurrentLiabilities => "current_liabilities",
            Self::Inventory => "inventory",
            Self::Cash => "cash",
            Self::TotalDebt => "total_debt",
            Self::InterestExpense => "interest_expense",
            Self::AccountsReceivable => "accounts_receivable",
            Self::Cogs => "cogs",
            Self::SharesOutstanding => "shares_outstanding",
            Self::StockPrice => "stock_price",
            Self::DividendPerShare => "dividend_per_share",
            Self::MarketCap => "market_cap",
            Self::Beta => "beta",
        }
    }
}

impl FromStr for LineItem {
    type Err = RatioError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|item| item.column_name() == wanted)
            .ok_or_else(|| RatioError::Parse(format!("unknown line item '{s}'")))
    }
}

/// One line-item value for one company in one fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialFact {
    /// Company the value belongs to
    pub company_id: CompanyId,
    /// Fiscal year of the value
    pub fiscal_year: FiscalYear,
    /// Statement line item
    pub line_item: LineItem,
    /// Reported value; `None` marks an explicitly missing value
    pub value: Option<f64>,
    /// Reporting currency (e.g. `USD`)
    #[serde(default)]
    pub currency: Option<String>,
}

impl FinancialFact {
    /// Create a fact with a reported value.
    pub fn new(
        company_id: impl Into<CompanyId>,
        fiscal_year: FiscalYear,
        line_item: LineItem,
        value: f64,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            fiscal_year,
            line_item,
            value: Some(value),
            currency: None,
        }
    }

    /// Create a fact that records the value as missing.
    pub fn missing(
        company_id: impl Into<CompanyId>,
        fiscal_year: FiscalYear,
        line_item: LineItem,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            fiscal_year,
            line_item,
            value: None,
            currency: None,
        }
    }

    /// Attach a reporting currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

/// All facts recorded for a single company.
#[derive(Debug, Clone, Default)]
pub struct CompanyFacts {
    values: BTreeMap<(FiscalYear, LineItem), f64>,
    recorded: BTreeSet<(FiscalYear, LineItem)>,
    currencies: BTreeSet<String>,
}

impl CompanyFacts {
    fn record(&mut self, fact: FinancialFact) -> Result<()> {
        let key = (fact.fiscal_year, fact.line_item);
        if !self.recorded.insert(key) {
            return Err(RatioError::DuplicateFact {
                company: fact.company_id.to_string(),
                fiscal_year: fact.fiscal_year,
                line_item: fact.line_item,
            });
        }

        // Non-finite provider values carry no information.
        if let Some(value) = fact.value.filter(|v| v.is_finite()) {
            self.values.insert(key, value);
            if let Some(currency) = fact.currency {
                self.currencies.insert(currency.trim().to_uppercase());
            }
        }
        Ok(())
    }

    /// Value of `item` in `year`, if reported.
    pub fn get(&self, year: FiscalYear, item: LineItem) -> Option<f64> {
        self.values.get(&(year, item)).copied()
    }

    /// Fiscal years with at least one reported value, ascending.
    pub fn years(&self) -> BTreeSet<FiscalYear> {
        self.values.keys().map(|(year, _)| *year).collect()
    }

    /// Most recent fiscal year with a reported value.
    pub fn latest_year(&self) -> Option<FiscalYear> {
        self.values.keys().map(|(year, _)| *year).max()
    }

    /// Number of reported values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value has been reported.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The single reporting currency, if the facts agree on exactly one.
    pub fn currency(&self) -> Option<&str> {
        match self.currencies.len() {
            1 => self.currencies.first().map(String::as_str),
            _ => None,
        }
    }

    /// Every currency seen on reported values.
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.currencies.iter().map(String::as_str)
    }

    fn first_overlap(&self, other: &Self) -> Option<(FiscalYear, LineItem)> {
        self.recorded.intersection(&other.recorded).next().copied()
    }

    fn absorb(&mut self, other: Self) {
        self.values.extend(other.values);
        self.recorded.extend(other.recorded);
        self.currencies.extend(other.currencies);
    }
}

/// Columns required by [`FactStore::from_frame`].
pub const FRAME_COLUMNS: [&str; 4] = ["company_id", "fiscal_year", "line_item", "value"];

/// Normalized per-year line items for a set of companies.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    companies: HashMap<CompanyId, CompanyFacts>,
}

impl FactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            companies: HashMap::new(),
        }
    }

    /// Record one fact.
    ///
    /// Fails with [`RatioError::DuplicateFact`] when the key already exists,
    /// even if the earlier fact was recorded as missing.
    pub fn insert(&mut self, fact: FinancialFact) -> Result<()> {
        self.companies
            .entry(fact.company_id.clone())
            .or_default()
            .record(fact)
    }

    /// Record every fact from an iterator, stopping at the first duplicate.
    pub fn extend<I>(&mut self, facts: I) -> Result<()>
    where
        I: IntoIterator<Item = FinancialFact>,
    {
        facts.into_iter().try_for_each(|fact| self.insert(fact))
    }

    /// Build a store from a list of facts.
    pub fn from_facts<I>(facts: I) -> Result<Self>
    where
        I: IntoIterator<Item = FinancialFact>,
    {
        let mut store = Self::new();
        store.extend(facts)?;
        Ok(store)
    }

    /// Move every company from `other` into this store.
    ///
    /// Fails with [`RatioError::DuplicateFact`] if any key is already
    /// recorded, in which case nothing is moved.
    pub fn merge(&mut self, other: FactStore) -> Result<()> {
        for (id, incoming) in &other.companies {
            let overlap = self
                .companies
                .get(id)
                .and_then(|existing| existing.first_overlap(incoming));
            if let Some((fiscal_year, line_item)) = overlap {
                return Err(RatioError::DuplicateFact {
                    company: id.to_string(),
                    fiscal_year,
                    line_item,
                });
            }
        }
        for (id, incoming) in other.companies {
            self.companies.entry(id).or_default().absorb(incoming);
        }
        Ok(())
    }

    /// Facts for one company.
    pub fn company(&self, id: &CompanyId) -> Option<&CompanyFacts> {
        self.companies.get(id)
    }

    /// Whether the company has at least one reported value.
    pub fn has_data(&self, id: &CompanyId) -> bool {
        self.company(id).is_some_and(|facts| !facts.is_empty())
    }

    /// Identifiers of every company seen.
    pub fn companies(&self) -> impl Iterator<Item = &CompanyId> {
        self.companies.keys()
    }

    /// Total number of reported values across companies.
    pub fn len(&self) -> usize {
        self.companies.values().map(CompanyFacts::len).sum()
    }

    /// Whether no values have been reported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load facts from a long-format DataFrame.
    ///
    /// Expects the [`FRAME_COLUMNS`] plus an optional `currency` column.
    /// `fiscal_year` and `value` are cast to `Int32` and `Float64`.
    pub fn from_frame(frame: &DataFrame) -> Result<Self> {
        let companies = required_column(frame, "company_id")?.str()?;
        let years = required_column(frame, "fiscal_year")?.cast(&DataType::Int32)?;
        let years = years.i32()?;
        let items = required_column(frame, "line_item")?.str()?;
        let values = required_column(frame, "value")?.cast(&DataType::Float64)?;
        let values = values.f64()?;
        let currencies = match frame.column("currency") {
            Ok(column) => Some(column.str()?),
            Err(_) => None,
        };

        let mut store = Self::new();
        for idx in 0..frame.height() {
            let (Some(company), Some(year), Some(item)) =
                (companies.get(idx), years.get(idx), items.get(idx))
            else {
                return Err(RatioError::Parse(format!(
                    "row {idx}: company_id, fiscal_year and line_item must not be null"
                )));
            };

            store.insert(FinancialFact {
                company_id: CompanyId::new(company),
                fiscal_year: year,
                line_item: item.parse()?,
                value: values.get(idx),
                currency: currencies.and_then(|c| c.get(idx)).map(str::to_string),
            })?;
        }

        Ok(store)
    }

    /// Collect a lazy long-format frame and load it.
    pub fn from_lazy(frame: LazyFrame) -> Result<Self> {
        Self::from_frame(&frame.collect()?)
    }
}

fn required_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Column> {
    frame
        .column(name)
        .map_err(|_| RatioError::MissingColumn(name.to_string()))
}
