//! End-to-end report assembly: loading facts, computing every ratio,
//! benchmarking against peers and the market, and exporting.

use approx::assert_relative_eq;
use polars::prelude::*;
use ratios::{
    BenchmarkTarget, CompanyId, DataQuality, Engine, FactStore, FinancialFact, FiscalYear,
    InMemoryProvider, LineItem, Period, Presentation, RatioRegistry, Report, ReportAssembler,
};
use std::sync::Arc;

/// A full year of line items, scaled.
fn full_year(company: &str, year: FiscalYear, scale: f64) -> Vec<FinancialFact> {
    [
        (LineItem::Revenue, 1000.0),
        (LineItem::NetProfit, 100.0),
        (LineItem::OperatingProfit, 150.0),
        (LineItem::Ebit, 140.0),
        (LineItem::Ebitda, 200.0),
        (LineItem::ShareholdersEquity, 500.0),
        (LineItem::TotalAssets, 1200.0),
        (LineItem::CurrentAssets, 400.0),
        (LineItem::CurrentLiabilities, 200.0),
        (LineItem::Inventory, 100.0),
        (LineItem::Cash, 80.0),
        (LineItem::TotalDebt, 300.0),
        (LineItem::InterestExpense, 20.0),
        (LineItem::AccountsReceivable, 120.0),
        (LineItem::Cogs, 600.0),
        (LineItem::SharesOutstanding, 50.0),
        (LineItem::StockPrice, 40.0),
        (LineItem::DividendPerShare, 1.0),
        (LineItem::MarketCap, 2000.0),
        (LineItem::Beta, 1.1),
    ]
    .into_iter()
    .map(|(item, value)| {
        let value = if item == LineItem::Beta { value } else { value * scale };
        FinancialFact::new(company, year, item, value).with_currency("USD")
    })
    .collect()
}

fn assembler() -> ReportAssembler {
    ReportAssembler::new(Arc::new(RatioRegistry::with_defaults()))
}

fn assemble(store: &FactStore, period: &Period, peers: &[&str], index: Option<&str>) -> Report {
    let peers: Vec<CompanyId> = peers.iter().map(|p| CompanyId::new(*p)).collect();
    let index = index.map(CompanyId::new);
    assembler()
        .assemble(store, &CompanyId::new("ACME"), period, &peers, index.as_ref())
        .unwrap()
}

#[test]
fn test_complete_data_yields_complete_report() {
    let facts: Vec<_> = (2019..=2023)
        .flat_map(|year| full_year("ACME", year, 1.0))
        .collect();
    let store = FactStore::from_facts(facts).unwrap();
    let period = Period::trailing(2023, 5).unwrap();
    let report = assemble(&store, &period, &[], None);

    let registry = RatioRegistry::with_defaults();
    assert_eq!(report.metadata().completeness.complete, registry.len());
    assert_eq!(report.metadata().currency.as_deref(), Some("USD"));

    let expected = [
        ("net_profit_margin", 10.0),
        ("operating_profit_margin", 15.0),
        ("return_on_equity", 20.0),
        ("current_ratio", 2.0),
        ("quick_ratio", 1.5),
        ("cash_ratio", 0.4),
        ("debt_to_equity", 0.6),
        ("interest_coverage", 7.0),
        ("earnings_per_share", 2.0),
        ("price_to_earnings", 20.0),
        ("dividend_yield", 2.5),
        ("ev_to_ebitda", 11.1),
        ("beta", 1.1),
    ];
    for (name, value) in expected {
        let result = report.result(name).unwrap();
        assert_relative_eq!(result.value_for(2023).unwrap(), value, epsilon = 1e-9);
    }
}

#[test]
fn test_presentation_shapes() {
    let facts: Vec<_> = (2021..=2023)
        .flat_map(|year| full_year("ACME", year, 1.0))
        .collect();
    let store = FactStore::from_facts(facts).unwrap();
    let period = Period::new(vec![2023, 2021, 2022]).unwrap();
    let report = assemble(&store, &period, &[], None);

    for result in report.results() {
        let years: Vec<_> = result.values().iter().map(|v| v.fiscal_year).collect();
        match result.presentation {
            Presentation::Single => assert_eq!(years, vec![2023], "{}", result.ratio),
            Presentation::Trend => assert_eq!(years, vec![2023, 2021, 2022], "{}", result.ratio),
        }
    }
}

#[test]
fn test_net_profit_margin_example() {
    let store = FactStore::from_facts([
        FinancialFact::new("ACME", 2023, LineItem::NetProfit, 100.0),
        FinancialFact::new("ACME", 2023, LineItem::Revenue, 500.0),
    ])
    .unwrap();
    let report = assemble(&store, &Period::new(vec![2023]).unwrap(), &[], None);
    let npm = report.result("net_profit_margin").unwrap();
    assert_relative_eq!(npm.value_for(2023).unwrap(), 20.0, epsilon = 1e-9);
    assert_eq!(npm.data_quality, DataQuality::Complete);
}

#[test]
fn test_zero_denominator_is_null_and_partial() {
    let mut facts = full_year("ACME", 2023, 1.0);
    facts.push(FinancialFact::new("ACME", 2022, LineItem::NetProfit, 10.0));
    facts.push(FinancialFact::new("ACME", 2022, LineItem::Revenue, 0.0));
    let store = FactStore::from_facts(facts).unwrap();
    let report = assemble(&store, &Period::new(vec![2022, 2023]).unwrap(), &[], None);

    let npm = report.result("net_profit_margin").unwrap();
    assert_eq!(npm.value_for(2022), None);
    assert!(npm.value_for(2023).is_some());
    assert_eq!(npm.data_quality, DataQuality::Partial);
}

#[test]
fn test_one_of_five_years_present() {
    let store = FactStore::from_facts(full_year("ACME", 2021, 1.0)).unwrap();
    let report = assemble(&store, &Period::trailing(2023, 5).unwrap(), &[], None);

    let npm = report.result("net_profit_margin").unwrap();
    assert_eq!(npm.values().len(), 5);
    assert_eq!(npm.computed_count(), 1);
    assert_eq!(npm.data_quality, DataQuality::Partial);

    // Only 2023 is reported, which is null, but 2021 had the inputs.
    let cash = report.result("cash_ratio").unwrap();
    assert_eq!(cash.values().len(), 1);
    assert_eq!(cash.value_for(2023), None);
    assert_eq!(cash.data_quality, DataQuality::Partial);
}

#[test]
fn test_asset_turnover_degraded_average() {
    let store = FactStore::from_facts([
        FinancialFact::new("ACME", 2023, LineItem::Revenue, 600.0),
        FinancialFact::new("ACME", 2023, LineItem::TotalAssets, 300.0),
        FinancialFact::new("ACME", 2022, LineItem::Revenue, 400.0),
        FinancialFact::new("ACME", 2022, LineItem::TotalAssets, 100.0),
    ])
    .unwrap();
    let report = assemble(&store, &Period::new(vec![2022, 2023]).unwrap(), &[], None);
    let turnover = report.result("asset_turnover").unwrap();

    // 2022 has no 2021 balance, so the current value stands alone.
    assert_relative_eq!(turnover.value_for(2022).unwrap(), 4.0, epsilon = 1e-12);
    assert_relative_eq!(turnover.value_for(2023).unwrap(), 3.0, epsilon = 1e-12);
    assert_eq!(turnover.data_quality, DataQuality::Complete);
}

#[test]
fn test_industry_mean_excludes_null_peer() {
    let mut facts = full_year("ACME", 2023, 1.0);
    facts.extend([
        FinancialFact::new("P1", 2023, LineItem::NetProfit, 10.0),
        FinancialFact::new("P1", 2023, LineItem::Revenue, 100.0),
        FinancialFact::new("P2", 2023, LineItem::NetProfit, 30.0),
        FinancialFact::new("P2", 2023, LineItem::Revenue, 100.0),
        FinancialFact::new("P3", 2023, LineItem::NetProfit, 30.0),
        FinancialFact::new("P3", 2023, LineItem::Revenue, 0.0),
    ]);
    let store = FactStore::from_facts(facts).unwrap();
    let report = assemble(
        &store,
        &Period::new(vec![2023]).unwrap(),
        &["P1", "P2", "P3"],
        None,
    );

    let industry = report
        .benchmark("net_profit_margin", BenchmarkTarget::Industry)
        .unwrap();
    assert_relative_eq!(industry.value_for(2023).unwrap(), 20.0, epsilon = 1e-9);
    assert_eq!(industry.values[0].contributors, 2);
}

#[test]
fn test_empty_peer_set_yields_null_benchmarks() {
    let store = FactStore::from_facts(full_year("ACME", 2023, 1.0)).unwrap();
    let period = Period::trailing(2023, 3).unwrap();
    let report = assemble(&store, &period, &[], None);

    for result in report.results() {
        for set in report.benchmarks(&result.ratio) {
            assert_eq!(set.values.len(), period.len());
            assert!(set.values.iter().all(|p| p.value.is_none()));
        }
    }
}

#[test]
fn test_market_benchmark_from_index() {
    let mut facts = full_year("ACME", 2023, 1.0);
    facts.extend(full_year("^GSPC", 2023, 2.0));
    let store = FactStore::from_facts(facts).unwrap();
    let report = assemble(&store, &Period::new(vec![2023]).unwrap(), &[], Some("^GSPC"));

    // Scaling every line item leaves margins unchanged.
    let market = report
        .benchmark("net_profit_margin", BenchmarkTarget::Market)
        .unwrap();
    assert_relative_eq!(market.value_for(2023).unwrap(), 10.0, epsilon = 1e-9);
    assert_eq!(market.constituents, vec![CompanyId::new("^GSPC")]);
    assert!(report.benchmark("current_ratio", BenchmarkTarget::Market).is_none());
}

#[test]
fn test_rows_export_to_csv() {
    let mut facts = full_year("ACME", 2023, 1.0);
    facts.extend(full_year("P1", 2023, 1.0));
    let store = FactStore::from_facts(facts).unwrap();
    let report = assemble(&store, &Period::new(vec![2022, 2023]).unwrap(), &["P1"], None);

    let mut frame = report.to_frame().unwrap();
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf).finish(&mut frame).unwrap();
    let csv = String::from_utf8(buf).unwrap();

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("ratio,fiscal_year,value,industry,market,data_quality")
    );
    let npm: Vec<_> = lines.filter(|line| line.starts_with("net_profit_margin,")).collect();
    assert_eq!(npm.len(), 2);
    assert_eq!(npm[0], "net_profit_margin,2022,,,,partial");
    assert!(npm[1].starts_with("net_profit_margin,2023,10"));
}

#[test]
fn test_store_from_frame() {
    let frame = df![
        "company_id" => ["acme", "acme"],
        "fiscal_year" => [2023i64, 2023],
        "line_item" => ["net_profit", "revenue"],
        "value" => [Some(100.0), Some(500.0)]
    ]
    .unwrap();
    let store = FactStore::from_frame(&frame).unwrap();
    let report = assemble(&store, &Period::new(vec![2023]).unwrap(), &[], None);
    assert_relative_eq!(
        report.result("net_profit_margin").unwrap().value_for(2023).unwrap(),
        20.0,
        epsilon = 1e-9
    );
}

#[tokio::test]
async fn test_engine_with_json_provider() {
    let provider = InMemoryProvider::from_json_str(
        r#"{
            "facts": [
                { "company_id": "ACME", "fiscal_year": 2023, "line_item": "net_profit", "value": 100.0 },
                { "company_id": "ACME", "fiscal_year": 2023, "line_item": "revenue", "value": 500.0 },
                { "company_id": "BETA", "fiscal_year": 2023, "line_item": "net_profit", "value": 30.0 },
                { "company_id": "BETA", "fiscal_year": 2023, "line_item": "revenue", "value": 100.0 },
                { "company_id": "^GSPC", "fiscal_year": 2023, "line_item": "net_profit", "value": 12.0 },
                { "company_id": "^GSPC", "fiscal_year": 2023, "line_item": "revenue", "value": 100.0 }
            ],
            "peers": { "ACME": ["BETA", "GHOST"] },
            "market_index": "^GSPC"
        }"#,
    )
    .unwrap();
    let provider = Arc::new(provider);
    let report = Engine::new(provider.clone(), provider)
        .run(&CompanyId::new("ACME"), &Period::new(vec![2023]).unwrap())
        .await
        .unwrap();

    let npm = report.result("net_profit_margin").unwrap();
    assert_relative_eq!(npm.value_for(2023).unwrap(), 20.0, epsilon = 1e-9);
    let industry = report
        .benchmark("net_profit_margin", BenchmarkTarget::Industry)
        .unwrap();
    assert_relative_eq!(industry.value_for(2023).unwrap(), 30.0, epsilon = 1e-9);
    let market = report
        .benchmark("net_profit_margin", BenchmarkTarget::Market)
        .unwrap();
    assert_relative_eq!(market.value_for(2023).unwrap(), 12.0, epsilon = 1e-9);
    assert_eq!(report.metadata().excluded_peers, vec![CompanyId::new("GHOST")]);
}
