use chess_rules::board::Board;
use chess_rules::game::{apply_move, new_game};
use chess_rules::legality::{all_legal_moves, status_for};
use chess_rules::perft::perft;
use chess_rules::types::{CapturedLedger, CastlingRights, Color, Position};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const MIDDLEGAME: &str = "r3k2r/pppq1ppp/2n2n2/3pp3/3PP3/2N2N2/PPPQ1PPP/R3K2R";

pub fn bench_legal_moves_from_start(c: &mut Criterion) {
    let bo = Board::new();
    let rights = CastlingRights::new();
    c.bench_function("get legal moves from start", |b| {
        b.iter(|| all_legal_moves(black_box(&bo), black_box(Color::White), &rights))
    });
}

pub fn bench_legal_moves_from_middlegame(c: &mut Criterion) {
    let bo = Board::from_placement(MIDDLEGAME).unwrap();
    let rights = CastlingRights::new();
    c.bench_function("get legal moves from middlegame", |b| {
        b.iter(|| all_legal_moves(black_box(&bo), black_box(Color::White), &rights))
    });
}

pub fn bench_status_from_middlegame(c: &mut Criterion) {
    let bo = Board::from_placement(MIDDLEGAME).unwrap();
    let rights = CastlingRights::new();
    c.bench_function("status for middlegame", |b| {
        b.iter(|| status_for(black_box(&bo), black_box(Color::Black), &rights))
    });
}

pub fn bench_apply_move(c: &mut Criterion) {
    let state = new_game();
    let rights = CastlingRights::new();
    let ledger = CapturedLedger::new();
    c.bench_function("apply e2e4 from start", |b| {
        b.iter(|| {
            apply_move(
                black_box(&state),
                &rights,
                &ledger,
                Position::new(6, 4),
                Position::new(4, 4),
            )
        })
    });
}

pub fn bench_perft_3(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat-sampling");
    group.sample_size(10);

    let state = new_game();
    let rights = CastlingRights::new();
    group.bench_function("perft from start 3 ply", |b| {
        b.iter(|| perft(black_box(&state), &rights, black_box(3)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_legal_moves_from_start,
    bench_legal_moves_from_middlegame,
    bench_status_from_middlegame,
    bench_apply_move,
    bench_perft_3,
);
criterion_main!(benches);
