//! Line-oriented command parsing and plain-text rendering for the CLI driver.

use std::fmt::Write;

use crate::core::GameState;
use crate::types::{BlockId, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Show,
    Place { id: BlockId, anchor: Position },
    Undo,
    Grant(u32),
    Hint,
    Next,
    LevelUp,
    Seed(u32),
    Reset,
    Save,
    Load,
    Stats,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  show                    draw the board and tray
  place <id> <row> <col>  place tray block <id> with its anchor at (row, col)
  undo                    revert the last placement (needs undo credit)
  grant [n]               add n undo credits (default 2)
  hint                    suggest a legal placement
  next                    advance to the next level unconditionally
  levelup                 advance if the required score is reached
  seed <level>            reseed the block generator
  reset                   start over at level 1
  save | load             write or read the saved game
  stats                   show counters and achievements
  quit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Ok(Command::Show);
        };
        let args: Vec<&str> = parts.collect();

        let cmd = match (word.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("show" | "s", []) => Command::Show,
            ("place" | "p", [id, row, col]) => Command::Place {
                id: BlockId(number(id)?),
                anchor: Position::new(number(row)?, number(col)?),
            },
            ("undo" | "u", []) => Command::Undo,
            ("grant", []) => Command::Grant(crate::types::UNDO_GRANT),
            ("grant", [n]) => Command::Grant(number(n)?),
            ("hint" | "h", []) => Command::Hint,
            ("next", []) => Command::Next,
            ("levelup", []) => Command::LevelUp,
            ("seed", [level]) => Command::Seed(number(level)?),
            ("reset", []) => Command::Reset,
            ("save", []) => Command::Save,
            ("load", []) => Command::Load,
            ("stats", []) => Command::Stats,
            ("help" | "?", []) => Command::Help,
            ("quit" | "q" | "exit", []) => Command::Quit,
            (other, _) => return Err(format!("unknown command or arguments: {other} (try help)")),
        };
        Ok(cmd)
    }
}

fn number<T: std::str::FromStr>(s: &str) -> Result<T, String> {
    let s = s.trim_start_matches('#');
    s.parse().map_err(|_| format!("not a number: {s}"))
}

/// Board, tray and status line as plain text
pub fn render(state: &GameState) -> String {
    let mut out = String::new();
    let board = state.board();
    let size = board.size();

    out.push_str("    ");
    for col in 0..size {
        let _ = write!(out, "{}", col % 10);
    }
    out.push('\n');
    for (row, cells) in board.rows().enumerate() {
        let _ = write!(out, "{row:>3} ");
        for cell in cells {
            out.push(cell.map_or('.', |c| c.color.symbol()));
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "level {}  score {}/{}  high {}  undo credit {}",
        state.level(),
        state.score(),
        state.required_score(),
        state.high_score(),
        state.ad_undo_count(),
    );
    if state.level_complete() {
        out.push_str("level complete: `levelup` to advance\n");
    }
    if state.game_over() {
        out.push_str("GAME OVER: `undo` or `reset`\n");
    }

    out.push_str("tray:\n");
    for block in state.tray() {
        let _ = writeln!(
            out,
            "  {} {} {}",
            block.id,
            block.color.as_str(),
            block.shape.as_str()
        );
        let (w, h) = block.shape.extent();
        for dy in 0..h {
            out.push_str("    ");
            for dx in 0..w {
                let filled = block.shape.cells().contains(&(dx, dy));
                out.push(if filled { block.color.symbol() } else { ' ' });
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_place_accepts_hash_ids() {
        assert_eq!(
            Command::parse("place #4 2 3"),
            Ok(Command::Place {
                id: BlockId(4),
                anchor: Position::new(2, 3),
            })
        );
    }

    #[test]
    fn parse_defaults_and_aliases() {
        assert_eq!(Command::parse(""), Ok(Command::Show));
        assert_eq!(Command::parse("Q"), Ok(Command::Quit));
        assert_eq!(Command::parse("grant"), Ok(Command::Grant(2)));
        assert_eq!(Command::parse("grant 5"), Ok(Command::Grant(5)));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(Command::parse("place 1 2").is_err());
        assert!(Command::parse("place a b c").is_err());
        assert!(Command::parse("jump").is_err());
    }

    #[test]
    fn render_shows_tray_and_status() {
        let state = GameState::default();
        let text = render(&state);
        assert!(text.contains("level 1  score 0/1000"));
        for block in state.tray() {
            assert!(text.contains(&block.id.to_string()));
        }
        assert_eq!(text.lines().filter(|l| l.ends_with("..........")).count(), 10);
    }
}
