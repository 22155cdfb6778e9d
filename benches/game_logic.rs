use criterion::{black_box, criterion_group, criterion_main, Criterion};
use block_smash::core::{Board, GameConfig, GameState};
use block_smash::types::{Block, BlockColor, BlockId, BlockShape, PlacedCell, Position};

fn filled() -> Option<PlacedCell> {
    Some(PlacedCell {
        block: BlockId(0),
        shape: BlockShape::Single,
        color: BlockColor::Red,
    })
}

fn bench_can_place_anywhere(c: &mut Criterion) {
    let mut board = Board::default();
    // Checkerboard: worst case, every anchor is scanned.
    for row in 0..10 {
        for col in 0..10 {
            if (row + col) % 2 == 0 {
                board.set(row, col, filled());
            }
        }
    }
    let square = Block::new(BlockId(1), BlockShape::Square, BlockColor::Blue);

    c.bench_function("can_place_anywhere_miss", |b| {
        b.iter(|| board.can_place_anywhere(black_box(&square)))
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_rows", |b| {
        b.iter(|| {
            let mut board = Board::default();
            for row in 6..10 {
                for col in 0..10 {
                    board.set(row, col, filled());
                }
            }
            for row in board.full_rows() {
                board.clear_row(row);
            }
            board
        })
    });
}

fn bench_occupied_groups(c: &mut Criterion) {
    let mut board = Board::default();
    for row in 0..10 {
        for col in 0..10 {
            if col != 5 && row != 5 {
                board.set(row, col, filled());
            }
        }
    }

    c.bench_function("occupied_groups_4x20", |b| {
        b.iter(|| black_box(&board).occupied_groups())
    });
}

fn bench_place_and_undo(c: &mut Criterion) {
    let mut state = GameState::new(GameConfig::default());

    c.bench_function("place_then_undo", |b| {
        b.iter(|| {
            let (id, anchor) = state.find_hint().unwrap_or((BlockId(0), Position::new(0, 0)));
            if state.place_block_from_tray(id, anchor) {
                state.grant_undo_credit(1);
                state.undo_last_move();
            }
            state.take_events();
        })
    });
}

fn bench_find_hint(c: &mut Criterion) {
    let state = GameState::new(GameConfig::default());

    c.bench_function("find_hint", |b| b.iter(|| black_box(&state).find_hint()));
}

criterion_group!(
    benches,
    bench_can_place_anywhere,
    bench_line_clear,
    bench_occupied_groups,
    bench_place_and_undo,
    bench_find_hint
);
criterion_main!(benches);
