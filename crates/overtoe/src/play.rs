//! Terminal input source: drives a turn controller from `row col` lines.

use std::io::{BufRead, Write};

use overtoe_core::{MoveRecorder, Outcome, Progress, TurnController};
use tracing::{debug, info, instrument, warn};

/// Parses a `row col` line. Commas and extra spaces are accepted.
pub fn parse_coordinates(line: &str) -> Option<(usize, usize)> {
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    match parts.next() {
        Some(_) => None,
        None => Some((row, col)),
    }
}

/// Plays `game` to the end, reading human moves from `input` and writing
/// the board and prompts to `out`.
///
/// Returns `None` if the input ends or the player types `q` before the game
/// is over.
///
/// # Errors
///
/// Returns an error if writing fails or an engine turn fails.
#[instrument(skip_all, fields(mode = %game.mode()))]
pub fn run<R, I, W>(
    game: &mut TurnController<R>,
    mut input: I,
    mut out: W,
) -> anyhow::Result<Option<Outcome>>
where
    R: MoveRecorder,
    I: BufRead,
    W: Write,
{
    writeln!(out, "{} - enter moves as `row col` (0-2), `q` to quit.", game.mode())?;

    loop {
        writeln!(out, "\n{}\n", game.state().board().display())?;

        if let Some(outcome) = game.outcome() {
            writeln!(out, "{}", outcome)?;
            return Ok(Some(outcome));
        }

        let mover = game.state().current_player();

        if game.is_ai_turn() {
            game.play_ai_turn()?;
            if let Some(action) = game.state().history().last() {
                writeln!(out, "AI ({}) plays {}", mover, action.position)?;
            }
            continue;
        }

        write!(out, "Player {}: ", mover)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            info!("Input closed, abandoning game");
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            info!("Player quit");
            return Ok(None);
        }

        let Some((row, col)) = parse_coordinates(line) else {
            debug!(line, "Unparseable input");
            writeln!(out, "Enter a row and a column, e.g. `1 2`.")?;
            continue;
        };

        match game.submit(row, col) {
            Ok(Progress::Continue { next }) => debug!(%next, "Turn passed"),
            Ok(Progress::Finished(outcome)) => debug!(%outcome, "Game finished"),
            Err(reason) => {
                warn!(%reason, "Move rejected");
                writeln!(out, "{}. Try again.", reason)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overtoe_core::{AiEngine, Difficulty, GameMode, MemoryRecorder, Player};
    use std::io::Cursor;

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(parse_coordinates("1 2"), Some((1, 2)));
        assert_eq!(parse_coordinates("  0,  2 "), Some((0, 2)));
        assert_eq!(parse_coordinates("1"), None);
        assert_eq!(parse_coordinates("a b"), None);
        assert_eq!(parse_coordinates("1 2 3"), None);
    }

    #[test]
    fn test_scripted_classic_game() {
        let mut game =
            TurnController::new(GameMode::Classic).with_recorder(MemoryRecorder::default());
        let input = Cursor::new("0 0\n1 0\n0 1\n1 1\n0 2\n");
        let mut out = Vec::new();

        let outcome = run(&mut game, input, &mut out).unwrap();

        assert_eq!(outcome, Some(Outcome::Winner(Player::X)));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Player X wins"));
        assert_eq!(game.recorder().moves.len(), 5);
    }

    #[test]
    fn test_bad_input_reprompts() {
        let mut game = TurnController::new(GameMode::Classic);
        let input = Cursor::new("hello\n0 0\n0 0\n5 5\nq\n");
        let mut out = Vec::new();

        let outcome = run(&mut game, input, &mut out).unwrap();

        assert_eq!(outcome, None);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Enter a row and a column"));
        assert!(text.contains("occupied"));
        assert!(text.contains("off the board"));
        assert_eq!(game.state().move_count(), 1);
    }

    #[test]
    fn test_human_against_engine() {
        let mut game = TurnController::new(GameMode::AiHard)
            .with_ai(Player::O, AiEngine::seeded(Difficulty::Hard, 3));
        // Enough candidate moves for any reply; taken squares are re-prompted.
        let script = "1 1\n0 0\n0 1\n0 2\n1 0\n1 2\n2 0\n2 1\n2 2\n".repeat(2);
        let mut out = Vec::new();

        let outcome = run(&mut game, Cursor::new(script), &mut out).unwrap();

        assert!(matches!(
            outcome,
            Some(Outcome::Draw) | Some(Outcome::Winner(Player::O))
        ));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("AI (O) plays"));
    }

    #[test]
    fn test_end_of_input_abandons() {
        let mut game = TurnController::new(GameMode::Overwrite);
        let outcome = run(&mut game, Cursor::new(""), Vec::new()).unwrap();
        assert_eq!(outcome, None);
    }
}
