use criterion::{Criterion, criterion_group, criterion_main};
use minegrid_core::*;
use std::hint::black_box;

fn generate_classic(c: &mut Criterion) {
    let mut seed = 0u64;
    c.bench_function("generate classic", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            Board::generate(black_box(GameConfig::CLASSIC), seed)
        })
    });
}

fn flood_open_board(c: &mut Criterion) {
    // a single corner mine leaves one huge zero region
    let layout = MineLayout::from_mine_coords((100, 100), &[(0, 0)]).unwrap();
    c.bench_function("flood 100x100", |b| {
        b.iter_batched(
            || Board::new(layout.clone()),
            |mut board| board.reveal(black_box((99, 99))),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, generate_classic, flood_open_board);
criterion_main!(benches);
