use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use slots_rs::game::{BetLimits, GameState};
use slots_rs::payout::evaluate_line;
use slots_rs::reel::{RandomReels, Reel, ReelDistribution};
use slots_rs::spin::SpinEngine;
use slots_rs::symbols::{SymbolId, SymbolTable};

fn bench_evaluate_line(c: &mut Criterion) {
    let table = SymbolTable::classic();
    let win = [SymbolId::Star; 3];
    let miss = [SymbolId::Star, SymbolId::Star, SymbolId::Cherry];

    let mut g = c.benchmark_group("evaluate_line");
    g.bench_with_input(BenchmarkId::new("win", "3x star"), &win, |b, input| {
        b.iter(|| evaluate_line(black_box(input), &table))
    });
    g.bench_with_input(BenchmarkId::new("miss", "star,star,cherry"), &miss, |b, input| {
        b.iter(|| evaluate_line(black_box(input), &table))
    });
    g.finish();
}

fn bench_spin(c: &mut Criterion) {
    let table = SymbolTable::classic();
    let mut g = c.benchmark_group("spin");
    for (name, dist) in
        [("uniform", ReelDistribution::Uniform), ("weighted", ReelDistribution::rarity(&table))]
    {
        let reel = Reel::try_new(&table, &dist).unwrap();
        let mut engine = SpinEngine::new(table.clone(), RandomReels::seeded(reel, 7), 3);
        g.bench_function(name, |b| {
            b.iter(|| {
                let mut state = GameState::new(1_000, 10, BetLimits::default());
                engine.spin(black_box(10), &mut state)
            })
        });
    }
    g.finish();
}

criterion_group!(benches, bench_evaluate_line, bench_spin);
criterion_main!(benches);
