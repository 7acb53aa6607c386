use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use ponder::prelude::*;

fn bench_move_ordering(c: &mut Criterion) {
    let evaluator = Evaluator::new();
    let params = SearchParams::default();
    let orderer = MoveOrderer::new(&evaluator, &params);
    let history = PositionHistory::new();

    let mut board = Board::from_fen(KIWIPETE);
    let mut legal = Vec::with_capacity(MAX_MOVES);
    board.generate_legal_moves(&mut legal);

    c.bench_function("order_moves", |b| {
        b.iter(|| {
            let mut moves = legal.clone();
            orderer.order(&mut board, &mut moves, &history);
            black_box(moves);
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for (name, fen) in [("start", START_FEN), ("kiwipete", KIWIPETE)] {
        let mut board = Board::from_fen(fen);
        group.bench_function(format!("{name}_depth_3"), |b| {
            b.iter(|| {
                let mut engine = SearchEngine::new(3, 600.0).unwrap();
                black_box(engine.get_best_move(&mut board))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_move_ordering, bench_search);
criterion_main!(benches);
