//! Ratio calculator.
//!
//! Evaluates a [`RatioDefinition`] against one company's facts for every year
//! of a [`Period`]. Trend and single-value ratios share the same evaluation
//! path and differ only in the shape of the returned [`RatioResult`].
//!
//! Missing operands and zero denominators never raise: the year's value is
//! `None` and the result's [`DataQuality`] is downgraded.

use crate::{
    CompanyFacts, CompanyId, FiscalYear, FormulaInputs, LineItem, Period, Presentation,
    RatioDefinition,
};
use derive_more::Display;
use serde::Serialize;
use tracing::trace;

/// How much of a result's underlying data was present.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    /// Every emitted year has a value
    #[display("complete")]
    Complete,
    /// Some years are missing, or inputs were present but undefined
    #[display("partial")]
    Partial,
    /// No required input was present for any requested year
    #[display("unavailable")]
    Unavailable,
}

/// A ratio value for one fiscal year; `None` when it could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    /// Fiscal year
    pub fiscal_year: FiscalYear,
    /// Computed value
    pub value: Option<f64>,
}

/// Result shape matching the definition's presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioValues {
    /// One entry per requested year, in request order
    Trend(Vec<YearValue>),
    /// The most recent requested year only
    Single(YearValue),
}

impl RatioValues {
    /// Entries as a slice; a single value is a slice of length one.
    pub fn as_slice(&self) -> &[YearValue] {
        match self {
            Self::Trend(values) => values,
            Self::Single(value) => std::slice::from_ref(value),
        }
    }
}

/// A computed ratio for one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioResult {
    /// Ratio name
    pub ratio: String,
    /// Company the ratio was computed for
    pub company_id: CompanyId,
    /// Presentation mode
    pub presentation: Presentation,
    /// Computed values
    pub values: RatioValues,
    /// Data quality classification
    pub data_quality: DataQuality,
}

impl RatioResult {
    /// Entries in request order.
    pub fn values(&self) -> &[YearValue] {
        self.values.as_slice()
    }

    /// Value for a fiscal year, if emitted and computed.
    pub fn value_for(&self, year: FiscalYear) -> Option<f64> {
        self.values()
            .iter()
            .find(|v| v.fiscal_year == year)
            .and_then(|v| v.value)
    }

    /// Number of emitted years with a value.
    pub fn computed_count(&self) -> usize {
        self.values().iter().filter(|v| v.value.is_some()).count()
    }
}

#[derive(Debug, Clone, Copy)]
struct YearEvaluation {
    value: YearValue,
    inputs_present: bool,
}

/// Evaluates ratio definitions against company facts.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioCalculator;

impl RatioCalculator {
    /// Create a calculator.
    pub const fn new() -> Self {
        Self
    }

    /// Compute a ratio for every year of `period`, shaped by presentation.
    ///
    /// Single-value ratios keep only the most recent year of the period, but
    /// are `partial` rather than `unavailable` when an earlier year had
    /// inputs.
    pub fn compute(
        &self,
        definition: &RatioDefinition,
        company_id: &CompanyId,
        facts: &CompanyFacts,
        period: &Period,
    ) -> RatioResult {
        let evaluated = self.evaluate_years(definition, facts, period);

        let (values, data_quality) = match definition.presentation {
            Presentation::Trend => {
                let data_quality = classify(&evaluated);
                let values = evaluated.into_iter().map(|e| e.value).collect();
                (RatioValues::Trend(values), data_quality)
            }
            Presentation::Single => {
                let latest = period.latest();
                let value = evaluated
                    .iter()
                    .find(|e| e.value.fiscal_year == latest)
                    .map_or(
                        YearValue {
                            fiscal_year: latest,
                            value: None,
                        },
                        |e| e.value,
                    );
                // Earlier years still count as evidence of inputs.
                let data_quality = if value.value.is_some() {
                    DataQuality::Complete
                } else if evaluated.iter().any(|e| e.inputs_present) {
                    DataQuality::Partial
                } else {
                    DataQuality::Unavailable
                };
                (RatioValues::Single(value), data_quality)
            }
        };

        trace!(
            ratio = definition.name,
            company = %company_id,
            quality = %data_quality,
            "computed ratio"
        );

        RatioResult {
            ratio: definition.name.to_string(),
            company_id: company_id.clone(),
            presentation: definition.presentation,
            values,
            data_quality,
        }
    }

    /// Per-year values for every year of `period`, ignoring presentation.
    ///
    /// This is the series benchmark aggregation averages over.
    pub fn evaluate(
        &self,
        definition: &RatioDefinition,
        facts: &CompanyFacts,
        period: &Period,
    ) -> Vec<YearValue> {
        self.evaluate_years(definition, facts, period)
            .into_iter()
            .map(|e| e.value)
            .collect()
    }

    fn evaluate_years(
        &self,
        definition: &RatioDefinition,
        facts: &CompanyFacts,
        period: &Period,
    ) -> Vec<YearEvaluation> {
        let required = definition.required_items();
        period
            .years()
            .iter()
            .map(|&year| evaluate_year(definition, &required, facts, year))
            .collect()
    }
}

fn evaluate_year(
    definition: &RatioDefinition,
    required: &[LineItem],
    facts: &CompanyFacts,
    year: FiscalYear,
) -> YearEvaluation {
    let mut inputs = FormulaInputs::new(year);
    let mut present = 0;
    for &item in required {
        if let Some(value) = facts.get(year, item) {
            inputs = inputs.with(item, value);
            present += 1;
        }
    }
    if let Some(prior_year) = year.checked_sub(1) {
        for &item in definition.averaged {
            if let Some(value) = facts.get(prior_year, item) {
                inputs = inputs.with_prior(item, value);
            }
        }
    }

    let value = if present == required.len() {
        (definition.formula)(&inputs)
            .map(|raw| definition.scale.apply(raw))
            .filter(|v| v.is_finite())
    } else {
        None
    };

    YearEvaluation {
        value: YearValue {
            fiscal_year: year,
            value,
        },
        inputs_present: present > 0,
    }
}

fn classify(emitted: &[YearEvaluation]) -> DataQuality {
    if !emitted.is_empty() && emitted.iter().all(|e| e.value.value.is_some()) {
        DataQuality::Complete
    } else if emitted.iter().any(|e| e.inputs_present) {
        DataQuality::Partial
    } else {
        DataQuality::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::{efficiency, liquidity, profitability};
    use crate::{FactStore, FinancialFact, LineItem, RatioRegistry};
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn store(facts: Vec<FinancialFact>) -> FactStore {
        FactStore::from_facts(facts).unwrap()
    }

    fn compute(def: &RatioDefinition, store: &FactStore, years: &[FiscalYear]) -> RatioResult {
        let id = CompanyId::new("ACME");
        let empty = CompanyFacts::default();
        let facts = store.company(&id).unwrap_or(&empty);
        RatioCalculator::new().compute(def, &id, facts, &Period::new(years.to_vec()).unwrap())
    }

    #[test]
    fn test_net_profit_margin_example() {
        let store = store(vec![
            FinancialFact::new("ACME", 2023, LineItem::NetProfit, 100.0),
            FinancialFact::new("ACME", 2023, LineItem::Revenue, 500.0),
        ]);
        let result = compute(&profitability::NET_PROFIT_MARGIN, &store, &[2023]);
        assert_relative_eq!(result.value_for(2023).unwrap(), 20.0, epsilon = 1e-9);
        assert_eq!(result.data_quality, DataQuality::Complete);
    }

    #[test]
    fn test_zero_revenue_yields_null_and_partial() {
        let store = store(vec![
            FinancialFact::new("ACME", 2022, LineItem::NetProfit, 80.0),
            FinancialFact::new("ACME", 2022, LineItem::Revenue, 0.0),
            FinancialFact::new("ACME", 2023, LineItem::NetProfit, 100.0),
            FinancialFact::new("ACME", 2023, LineItem::Revenue, 500.0),
        ]);
        let result = compute(&profitability::NET_PROFIT_MARGIN, &store, &[2022, 2023]);
        assert_eq!(result.value_for(2022), None);
        assert!(result.value_for(2023).is_some());
        assert_eq!(result.data_quality, DataQuality::Partial);
    }

    #[test]
    fn test_only_zero_denominators_is_partial_not_unavailable() {
        let store = store(vec![
            FinancialFact::new("ACME", 2023, LineItem::NetProfit, 100.0),
            FinancialFact::new("ACME", 2023, LineItem::Revenue, 0.0),
        ]);
        let result = compute(&profitability::NET_PROFIT_MARGIN, &store, &[2023]);
        assert_eq!(result.value_for(2023), None);
        assert_eq!(result.data_quality, DataQuality::Partial);
    }

    #[test]
    fn test_one_of_five_years_present() {
        let store = store(vec![
            FinancialFact::new("ACME", 2021, LineItem::CurrentAssets, 150.0),
            FinancialFact::new("ACME", 2021, LineItem::CurrentLiabilities, 100.0),
        ]);
        let result = compute(
            &liquidity::CURRENT_RATIO,
            &store,
            &[2019, 2020, 2021, 2022, 2023],
        );

        assert_eq!(result.values().len(), 5);
        assert_eq!(result.computed_count(), 1);
        assert_eq!(result.data_quality, DataQuality::Partial);
        assert_relative_eq!(result.value_for(2021).unwrap(), 1.5);
    }

    #[test]
    fn test_no_facts_is_unavailable() {
        let store = store(vec![]);
        let result = compute(&liquidity::CURRENT_RATIO, &store, &[2022, 2023]);
        assert_eq!(result.values().len(), 2);
        assert_eq!(result.computed_count(), 0);
        assert_eq!(result.data_quality, DataQuality::Unavailable);
    }

    #[test]
    fn test_missing_operand_is_null() {
        let store = store(vec![FinancialFact::new("ACME", 2023, LineItem::NetProfit, 100.0)]);
        let result = compute(&profitability::NET_PROFIT_MARGIN, &store, &[2023]);
        assert_eq!(result.value_for(2023), None);
        assert_eq!(result.data_quality, DataQuality::Partial);
    }

    #[test]
    fn test_trend_preserves_request_order() {
        let store = store(
            (2019..=2023)
                .flat_map(|year| {
                    [
                        FinancialFact::new("ACME", year, LineItem::CurrentAssets, f64::from(year - 2000)),
                        FinancialFact::new("ACME", year, LineItem::CurrentLiabilities, 1.0),
                    ]
                })
                .collect(),
        );
        let years = [2023, 2021, 2019, 2022];
        let result = compute(&liquidity::CURRENT_RATIO, &store, &years);

        let emitted: Vec<_> = result.values().iter().map(|v| v.fiscal_year).collect();
        assert_eq!(emitted, years);
        assert_relative_eq!(result.values()[0].value.unwrap(), 23.0);
        assert_relative_eq!(result.values()[3].value.unwrap(), 22.0);
    }

    #[rstest]
    #[case(&[2021, 2022, 2023])]
    #[case(&[2023, 2022, 2021])]
    #[case(&[2022, 2023, 2021])]
    fn test_single_ratios_emit_latest_year(#[case] years: &[FiscalYear]) {
        let registry = RatioRegistry::with_defaults();
        let store = store(vec![]);
        for def in registry
            .get_all()
            .iter()
            .filter(|d| d.presentation == Presentation::Single)
        {
            let result = compute(def, &store, years);
            assert_eq!(result.values().len(), 1, "{}", def.name);
            assert_eq!(result.values()[0].fiscal_year, 2023, "{}", def.name);
        }
    }

    #[test]
    fn test_trend_ratios_match_requested_length() {
        let registry = RatioRegistry::with_defaults();
        let store = store(vec![]);
        let years = [2019, 2020, 2021, 2022, 2023];
        for def in registry
            .get_all()
            .iter()
            .filter(|d| d.presentation == Presentation::Trend)
        {
            assert_eq!(compute(def, &store, &years).values().len(), 5, "{}", def.name);
        }
    }

    #[rstest]
    #[case::reported_year(&[2023], Some(0.6), DataQuality::Complete)]
    #[case::earlier_year_only(&[2021], None, DataQuality::Partial)]
    #[case::earlier_and_reported(&[2021, 2023], Some(0.6), DataQuality::Complete)]
    #[case::no_year(&[], None, DataQuality::Unavailable)]
    fn test_single_quality_spans_requested_years(
        #[case] reported: &[FiscalYear],
        #[case] expected: Option<f64>,
        #[case] quality: DataQuality,
    ) {
        let store = store(
            reported
                .iter()
                .flat_map(|&year| {
                    [
                        FinancialFact::new("ACME", year, LineItem::Cash, 60.0),
                        FinancialFact::new("ACME", year, LineItem::CurrentLiabilities, 100.0),
                    ]
                })
                .collect(),
        );
        let result = compute(&liquidity::CASH_RATIO, &store, &[2021, 2022, 2023]);
        assert_eq!(
            result.values,
            RatioValues::Single(YearValue {
                fiscal_year: 2023,
                value: expected
            })
        );
        assert_eq!(result.data_quality, quality);
    }

    #[test]
    fn test_earliest_representable_year() {
        let store = store(vec![
            FinancialFact::new("ACME", FiscalYear::MIN, LineItem::Revenue, 200.0),
            FinancialFact::new("ACME", FiscalYear::MIN, LineItem::TotalAssets, 100.0),
        ]);
        let result = compute(&efficiency::ASSET_TURNOVER, &store, &[FiscalYear::MIN]);
        assert_relative_eq!(result.value_for(FiscalYear::MIN).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_percent_ratio_exact() {
        let (num, den) = (1234.5678, 98765.4321);
        let store = store(vec![
            FinancialFact::new("ACME", 2023, LineItem::NetProfit, num),
            FinancialFact::new("ACME", 2023, LineItem::TotalAssets, den),
        ]);
        let result = compute(&profitability::RETURN_ON_ASSETS, &store, &[2023]);
        assert_relative_eq!(result.value_for(2023).unwrap(), 100.0 * num / den, epsilon = 1e-9);
    }

    #[test]
    fn test_asset_turnover_prior_year_outside_period() {
        let store = store(vec![
            FinancialFact::new("ACME", 2022, LineItem::TotalAssets, 600.0),
            FinancialFact::new("ACME", 2023, LineItem::TotalAssets, 400.0),
            FinancialFact::new("ACME", 2023, LineItem::Revenue, 100.0),
        ]);
        let result = compute(&efficiency::ASSET_TURNOVER, &store, &[2023]);
        assert_relative_eq!(result.value_for(2023).unwrap(), 0.2);
    }

    #[test]
    fn test_asset_turnover_falls_back_without_prior_year() {
        let store = store(vec![
            FinancialFact::new("ACME", 2023, LineItem::TotalAssets, 400.0),
            FinancialFact::new("ACME", 2023, LineItem::Revenue, 100.0),
        ]);
        let result = compute(&efficiency::ASSET_TURNOVER, &store, &[2023]);
        assert_relative_eq!(result.value_for(2023).unwrap(), 0.25);
        assert_eq!(result.data_quality, DataQuality::Complete);
    }

    #[test]
    fn test_evaluate_ignores_presentation() {
        let store = store(vec![
            FinancialFact::new("ACME", 2022, LineItem::NetProfit, 10.0),
            FinancialFact::new("ACME", 2022, LineItem::SharesOutstanding, 5.0),
        ]);
        let facts = store.company(&"ACME".into()).unwrap();
        let period = Period::new(vec![2022, 2023]).unwrap();
        let series =
            RatioCalculator::new().evaluate(&profitability::EARNINGS_PER_SHARE, facts, &period);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].value, Some(2.0));
        assert_eq!(series[1].value, None);
    }
}
