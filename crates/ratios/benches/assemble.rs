//! Report assembly over a random peer universe.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratios::{CompanyId, FactStore, FinancialFact, LineItem, Period, RatioRegistry, ReportAssembler};
use std::sync::Arc;

const YEARS: std::ops::RangeInclusive<i32> = 2014..=2023;

fn universe(rng: &mut StdRng, companies: usize) -> (FactStore, Vec<CompanyId>) {
    let ids: Vec<CompanyId> = (0..companies)
        .map(|i| CompanyId::new(format!("C{i:04}")))
        .collect();
    let mut facts = Vec::with_capacity(companies * LineItem::ALL.len() * YEARS.count());
    for id in &ids {
        for year in YEARS {
            for item in LineItem::ALL {
                // Roughly one value in twenty goes missing.
                if rng.gen_bool(0.05) {
                    continue;
                }
                facts.push(FinancialFact::new(
                    id.clone(),
                    year,
                    item,
                    rng.gen_range(1.0..1_000.0),
                ));
            }
        }
    }
    let store = FactStore::from_facts(facts).expect("generated facts are unique");
    (store, ids)
}

fn bench_assemble(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let assembler = ReportAssembler::new(Arc::new(RatioRegistry::with_defaults()));
    let period = Period::trailing(2023, 5).expect("non-empty period");

    let mut group = c.benchmark_group("assemble");
    for peers in [10, 100, 500] {
        let (store, ids) = universe(&mut rng, peers + 2);
        let subject = &ids[0];
        let index = &ids[1];
        let peer_ids = &ids[2..];
        group.bench_with_input(BenchmarkId::from_parameter(peers), &peers, |b, _| {
            b.iter(|| {
                assembler
                    .assemble(
                        black_box(&store),
                        subject,
                        &period,
                        peer_ids,
                        Some(index),
                    )
                    .expect("subject has facts")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_assemble);
criterion_main!(benches);
