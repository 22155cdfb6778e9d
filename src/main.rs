//! Headless Block Smash runner (default binary).
//!
//! Reads one command per line from stdin and prints the board after each one.
//! Set `RUST_LOG=debug` to watch clears and bonuses as they are scored.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use log::info;

use block_smash::adapter::{AdapterConfig, Services};
use block_smash::cli::{render, Command, HELP};
use block_smash::engine::GameSession;

fn main() -> Result<()> {
    env_logger::init();

    let services = Services::start_from_env()?;
    let config = services
        .as_ref()
        .map(|s| s.config().clone())
        .unwrap_or_else(AdapterConfig::from_env);
    let mut session = GameSession::resume(services, config.game_config());

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    write!(out, "{}", render(session.state()))?;
    out.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let cmd = match Command::parse(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        if cmd == Command::Quit {
            break;
        }
        run(&mut session, cmd, &mut out)?;
        out.flush()?;
    }

    // Block on the final save so it is not lost when the runtime shuts down.
    if let (Some(task), Some(services)) = (session.save(), session.services()) {
        let _ = services.handle().block_on(task);
    }
    info!("bye");
    Ok(())
}

fn run(session: &mut GameSession, cmd: Command, out: &mut impl Write) -> Result<()> {
    match cmd {
        Command::Show => {}
        Command::Place { id, anchor } => {
            if let Err(e) = session.try_place(id, anchor) {
                writeln!(out, "error [{}]: {}", e.code(), e.message())?;
                return Ok(());
            }
            if let Some(report) = session.state().last_clear().filter(|r| !r.is_empty()) {
                writeln!(
                    out,
                    "cleared rows {:?} cols {:?} for {} points",
                    report.rows, report.cols, report.points
                )?;
            }
        }
        Command::Undo => {
            if !session.undo_last_move() {
                writeln!(out, "nothing to undo, or no undo credit left")?;
            }
        }
        Command::Grant(n) => session.grant_undo_credit(n),
        Command::Hint => {
            match session.state().find_hint() {
                Some((id, anchor)) => {
                    writeln!(out, "try: place {} {} {}", id.0, anchor.row, anchor.col)?
                }
                None => writeln!(out, "no legal placement")?,
            }
            return Ok(());
        }
        Command::Next => session.advance_to_next_level(),
        Command::LevelUp => {
            if !session.level_up() {
                writeln!(
                    out,
                    "need {} points to level up",
                    session.state().required_score()
                )?;
            }
        }
        Command::Seed(level) => session.set_seed(level),
        Command::Reset => session.reset_game(),
        Command::Save => match session.save() {
            Some(_) => writeln!(out, "saving")?,
            None => writeln!(out, "services disabled, nothing saved")?,
        },
        Command::Load => match session.load() {
            Ok(true) => {}
            Ok(false) => writeln!(out, "no saved game")?,
            Err(e) => writeln!(out, "save is unusable: {e}")?,
        },
        Command::Stats => {
            let stats = session.state().stats();
            writeln!(
                out,
                "blocks {}  lines {}  chain {}  games {}  undos {}  highest level {}",
                stats.blocks_placed,
                stats.lines_cleared,
                stats.chain,
                stats.games_completed,
                stats.total_undos,
                stats.highest_level,
            )?;
            if let Some(services) = session.services() {
                let book = services.achievements().book();
                let unlocked: Vec<_> = book.unlocked().map(|id| id.as_str()).collect();
                writeln!(out, "achievements: {}", unlocked.join(", "))?;
                if let Ok(top) = services.leaderboard().top(5) {
                    for (rank, entry) in top.iter().enumerate() {
                        writeln!(out, "  {}. {} (level {})", rank + 1, entry.score, entry.level)?;
                    }
                }
            }
            return Ok(());
        }
        Command::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(());
        }
        Command::Quit => return Ok(()),
    }
    write!(out, "{}", render(session.state()))?;
    Ok(())
}
