//! Line clear and scoring tests
//!
//! Boards are built from text through the save format: `.` is empty, any other
//! character is the symbol of a [`BlockColor`].

use block_smash::core::{
    required_score, AchievementId, AchievementSignal, GameConfig, GameEvent, GameState,
    GameStats, PersistedGame,
};
use block_smash::core::snapshot::{SavedBlock, SavedCell};
use block_smash::types::{BlockColor, BlockId, BlockShape, Position};

fn color_of(symbol: char) -> BlockColor {
    BlockColor::ALL
        .into_iter()
        .find(|c| c.symbol() == symbol)
        .unwrap_or_else(|| panic!("no color for {symbol:?}"))
}

fn game_from(rows: &[&str], tray: &[(BlockShape, BlockColor)]) -> GameState {
    let grid = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|ch| {
                    (ch != '.').then(|| SavedCell {
                        color: color_of(ch),
                        shape: BlockShape::Single,
                        block: None,
                    })
                })
                .collect()
        })
        .collect();
    let saved = PersistedGame {
        score: 0,
        level: 1,
        grid,
        tray: tray
            .iter()
            .map(|&(shape, color)| SavedBlock {
                color,
                shape,
                id: None,
            })
            .collect(),
        rng_state: None,
        next_block_id: None,
        ad_undo_count: 0,
        perfect_level: false,
        stats: GameStats::default(),
    };
    GameState::restore(&saved, GameConfig::default()).unwrap()
}

/// Ids are handed out in tray order starting at 1 when the save has none.
const FIRST: BlockId = BlockId(1);

#[test]
fn test_single_color_row_scores_600() {
    let mut game = game_from(
        &[
            "RRRRRRRRR.",
            "..........",
            "..........",
            "..........",
            "..........",
            ".....B....",
            "..........",
            "..........",
            "..........",
            "..........",
        ],
        &[(BlockShape::Single, BlockColor::Red)],
    );

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));
    assert_eq!(game.score(), 600);

    let report = game.last_clear().unwrap();
    assert_eq!(report.rows, vec![0]);
    assert!(report.cols.is_empty());
    assert_eq!(report.color_matches, 1);
    assert_eq!(report.points, 600);
    assert_eq!(game.board().occupied_count(), 1);
}

#[test]
fn test_mixed_row_scores_100() {
    let mut game = game_from(
        &[
            "RBRBRBRBR.",
            "..........",
            "..........",
            "..........",
            "..........",
            ".....B....",
            "..........",
            "..........",
            "..........",
            "..........",
        ],
        &[(BlockShape::Single, BlockColor::Red)],
    );

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));
    assert_eq!(game.score(), 100);
    assert_eq!(game.last_clear().unwrap().color_matches, 0);
}

#[test]
fn test_two_single_color_rows_earn_super_bonus() {
    let mut game = game_from(
        &[
            "GGGGGGGGG.",
            "GGGGGGGGG.",
            "..........",
            "..........",
            "..........",
            ".....B....",
            "..........",
            "..........",
            "..........",
            "..........",
        ],
        &[(BlockShape::VerticalBar2, BlockColor::Green)],
    );

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));
    // 2 x (100 + 500) + 2 x 1000
    assert_eq!(game.score(), 3200);
    assert_eq!(game.last_clear().unwrap().points, 3200);
    assert!(game.level_complete());
}

#[test]
fn test_two_single_color_columns_earn_super_bonus() {
    let mut game = game_from(
        &[
            "..........",
            "PP........",
            "PP........",
            "PP........",
            "PP........",
            "PP.....B..",
            "PP........",
            "PP........",
            "PP........",
            "PP........",
        ],
        &[(BlockShape::HorizontalBar2, BlockColor::Purple)],
    );

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 0)));
    let report = game.last_clear().unwrap();
    assert!(report.rows.is_empty());
    assert_eq!(report.cols, vec![0, 1]);
    assert_eq!(report.color_matches, 2);
    // 2 x (100 + 500) + 2 x 1000
    assert_eq!(game.score(), 3200);
}

#[test]
fn test_single_color_row_and_column_cannot_both_match() {
    // The row takes the shared corner, so the yellow column is one short and
    // only one color match is counted: no super bonus.
    let mut game = game_from(
        &[
            "YYYYYYYYY.",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
        ],
        &[(BlockShape::Single, BlockColor::Yellow)],
    );

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));
    let report = game.last_clear().unwrap();
    assert_eq!(report.rows, vec![0]);
    assert!(report.cols.is_empty());
    assert_eq!(report.color_matches, 1);
    assert_eq!(game.score(), 600);
}

#[test]
fn test_three_lines_in_one_pass_count_as_combo() {
    let mut game = game_from(
        &[
            "RBRBRBRBR.",
            "BRBRBRBRB.",
            "RBRBRBRBR.",
            "..........",
            "..........",
            ".....B....",
            "..........",
            "..........",
            "..........",
            "..........",
        ],
        &[(BlockShape::VerticalBar3, BlockColor::Green)],
    );
    game.take_events();

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));
    assert_eq!(game.last_clear().unwrap().lines(), 3);
    assert_eq!(game.score(), 300);
    assert_eq!(game.stats().combos, 1);
    assert!(game
        .take_events()
        .contains(&GameEvent::Achievement(AchievementSignal::new(
            AchievementId::Combo3,
            1
        ))));
}

#[test]
fn test_two_lines_are_not_a_combo() {
    let mut game = game_from(
        &[
            "RBRBRBRBR.",
            "BRBRBRBRB.",
            "..........",
            "..........",
            "..........",
            ".....B....",
            "..........",
            "..........",
            "..........",
            "..........",
        ],
        &[(BlockShape::VerticalBar2, BlockColor::Green)],
    );

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));
    assert_eq!(game.last_clear().unwrap().lines(), 2);
    assert_eq!(game.stats().combos, 0);
}

#[test]
fn test_rows_clear_before_columns() {
    // Placing at (0, 9) completes row 0 and column 9 at the same time. The row
    // clears first, which empties (0, 9), so the column is no longer full.
    let mut game = game_from(
        &[
            "RBRBRBRBR.",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
            ".........Y",
        ],
        &[(BlockShape::Single, BlockColor::Yellow)],
    );

    let (rows, cols) = game.preview_clears(FIRST, Position::new(0, 9)).unwrap();
    assert_eq!(rows.as_slice(), &[0]);
    assert!(cols.is_empty());

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));
    let report = game.last_clear().unwrap();
    assert_eq!(report.rows, vec![0]);
    assert!(report.cols.is_empty());
    assert_eq!(game.score(), 100);
    assert_eq!(game.board().occupied_count(), 9);
}

#[test]
fn test_column_clear_scores_like_a_row() {
    let mut game = game_from(
        &[
            "..........",
            "P.........",
            "P.........",
            "P.........",
            "P.........",
            "P.........",
            "P.........",
            "P.........",
            "P.........",
            "P......B..",
        ],
        &[(BlockShape::Single, BlockColor::Purple)],
    );

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 0)));
    let report = game.last_clear().unwrap();
    assert!(report.rows.is_empty());
    assert_eq!(report.cols, vec![0]);
    assert_eq!(game.score(), 600);
}

#[test]
fn test_group_bonus_after_clear() {
    let mut game = game_from(
        &[
            "RBRBRBRBR.",
            "..........",
            "..........",
            "..........",
            "..........",
            "GGGGGG....",
            "GGGGGG....",
            "..........",
            "..........",
            "..........",
        ],
        &[(BlockShape::Single, BlockColor::Red)],
    );

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));
    let report = game.last_clear().unwrap();
    assert_eq!(report.bonus_groups, 1);
    assert_eq!(game.score(), 100 + 200);
}

#[test]
fn test_each_large_group_earns_its_own_bonus() {
    let mut game = game_from(
        &[
            "RBRBRBRBR.",
            "..........",
            "..........",
            "..........",
            "..........",
            "GGGGG.....",
            "GGGGG.....",
            "..........",
            "BBBBB.....",
            "BBBBB.....",
        ],
        &[(BlockShape::Single, BlockColor::Red)],
    );
    game.take_events();

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));
    let report = game.last_clear().unwrap();
    assert_eq!(report.bonus_groups, 2);
    assert_eq!(game.score(), 100 + 2 * 200);

    let group_awards = game
        .take_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::ScoreAnimation { points: 200, .. }))
        .count();
    assert_eq!(group_awards, 2);
}

#[test]
fn test_no_group_bonus_without_a_clear() {
    let mut game = game_from(
        &[
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "GGGGGG....",
            "GGGGGG....",
            "..........",
            "..........",
            "..........",
        ],
        &[(BlockShape::Single, BlockColor::Red)],
    );

    assert!(game.place_block_from_tray(FIRST, Position::new(7, 0)));
    assert_eq!(game.score(), 0);
    assert!(game.last_clear().unwrap().is_empty());
}

#[test]
fn test_lines_counter_adds_each_line_twice() {
    let mut game = game_from(
        &[
            "RBRBRBRBR.",
            "..........",
            "..........",
            "..........",
            "..........",
            ".....B....",
            "..........",
            "..........",
            "..........",
            "..........",
        ],
        &[(BlockShape::Single, BlockColor::Red)],
    );

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));
    assert_eq!(game.stats().lines_cleared, 2);
    assert_eq!(game.stats().chain, 1);
    assert_eq!(game.stats().first_clears, 1);
}

#[test]
fn test_perfect_clear_advances_level() {
    let mut game = game_from(
        &[
            "RRRRRRRRR.",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
        ],
        &[(BlockShape::Single, BlockColor::Red)],
    );
    game.take_events();

    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));
    assert!(game.last_clear().unwrap().perfect_clear);
    assert_eq!(game.level(), 2);
    assert_eq!(game.score(), 600);
    assert!(game.board().is_empty());
    assert_eq!(game.tray().len(), 3);
    assert!(!game.level_complete());
    assert!(game.perfect_level());
    assert_eq!(game.stats().chain, 1);

    let events = game.take_events();
    assert!(events.contains(&GameEvent::LevelChanged { level: 2 }));
    assert_eq!(events.last(), Some(&GameEvent::StateChanged));
}

#[test]
fn test_score_events_carry_positions() {
    let mut game = game_from(
        &[
            "RRRRRRRRR.",
            "..........",
            "..........",
            "..........",
            "..........",
            ".....B....",
            "..........",
            "..........",
            "..........",
            "..........",
        ],
        &[(BlockShape::Single, BlockColor::Red)],
    );
    game.take_events();
    assert!(game.place_block_from_tray(FIRST, Position::new(0, 9)));

    let events = game.take_events();
    assert!(events.contains(&GameEvent::ScoreAnimation {
        points: 600,
        position: Position::new(0, 5),
    }));
    let cleared = events
        .iter()
        .find_map(|e| match e {
            GameEvent::LinesCleared(cells) => Some(cells.len()),
            _ => None,
        })
        .unwrap();
    assert_eq!(cleared, 10);
}

#[test]
fn test_required_score_tiers() {
    assert_eq!(required_score(1), 1000);
    assert_eq!(required_score(5), 5000);
    assert_eq!(required_score(6), 12000);
    assert_eq!(required_score(10), 20000);
    assert_eq!(required_score(11), 33000);
    assert_eq!(required_score(50), 150000);
    assert_eq!(required_score(51), 255000);
}
