use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use minedelve_core::*;
use std::hint::black_box;

const TIERS: [(&str, BoardConfig); 3] = [
    ("small", BoardConfig::SMALL),
    ("medium", BoardConfig::MEDIUM),
    ("open", BoardConfig::new_unchecked((255, 255), 1, 0)),
];

fn bench_populate(c: &mut Criterion) {
    let mut group = c.benchmark_group("populate");
    for (name, config) in TIERS {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, &config| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                RandomMinefieldGenerator::new(seed)
                    .generate(black_box(config), Doors::all())
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade");
    for (name, config) in TIERS {
        let board = RandomMinefieldGenerator::new(17)
            .generate(config, Doors::all())
            .unwrap();
        let origin = board
            .playable()
            .iter()
            .find(|&pos| board.tile(pos).is_ok_and(Tile::is_cascade_source))
            .unwrap_or(board.playable().min);

        group.bench_with_input(BenchmarkId::from_parameter(name), &board, |b, board| {
            b.iter_batched(
                || board.clone(),
                |mut board| board.discover(black_box(origin)).unwrap(),
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_reveal_all(c: &mut Criterion) {
    let board = RandomMinefieldGenerator::new(3)
        .generate(BoardConfig::MEDIUM, Doors::all())
        .unwrap();

    c.bench_function("reveal_all/medium", |b| {
        b.iter_batched(
            || board.clone(),
            |mut board| board.reveal_all(),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_populate, bench_cascade, bench_reveal_all);
criterion_main!(benches);
