use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use ponder::prelude::*;

fn bench_evaluation(c: &mut Criterion) {
    let evaluator = Evaluator::new();
    let positions = [("start", Board::new()), ("kiwipete", Board::from_fen(KIWIPETE))];

    let mut group = c.benchmark_group("evaluate");
    for (name, board) in &positions {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(evaluator.evaluate(black_box(board))))
        });
    }
    group.finish();
}

fn bench_breakdown(c: &mut Criterion) {
    let evaluator = Evaluator::new();
    let board = Board::from_fen(KIWIPETE);

    c.bench_function("eval_breakdown", |b| {
        b.iter(|| black_box(evaluator.breakdown(black_box(&board))))
    });
}

criterion_group!(benches, bench_evaluation, bench_breakdown);
criterion_main!(benches);
