//! Subcommand handlers.

use std::io::{BufRead, Write};

use anyhow::{Context, bail};
use overtoe_core::{AiConfig, AiEngine, GameMode, Outcome, Player, TurnController};
use overtoe_history::{GameRepository, HistoryRecorder, Participant, User};
use tracing::{info, instrument, warn};

use crate::cli::{Credentials, PlayArgs};
use crate::play;

/// Signs in with `credentials`.
fn sign_in(repo: &GameRepository, credentials: &Credentials) -> anyhow::Result<User> {
    Ok(repo.authenticate(&credentials.user, &credentials.password)?)
}

/// Works out who sits on each side of a new game.
///
/// In AI modes the engine takes the side opposite `args.symbol`. In
/// two-player modes `--user` takes `args.symbol` and `--opponent` the other
/// side; missing accounts play as guests.
#[instrument(skip(repo, args), fields(mode = %args.game_mode()))]
pub fn seating(
    repo: &GameRepository,
    args: &PlayArgs,
) -> anyhow::Result<(Participant, Participant)> {
    let mode = args.game_mode();
    let sign = |user: &Option<String>, password: &Option<String>| -> anyhow::Result<Participant> {
        match (user, password) {
            (Some(user), Some(password)) => {
                let account = repo.authenticate(user, password)?;
                Ok(Participant::User(*account.id()))
            }
            _ => Ok(Participant::Guest),
        }
    };

    let mine = sign(&args.user, &args.password)?;
    let theirs = if mode.is_ai() {
        if args.opponent.is_some() {
            bail!("--opponent cannot be used in AI mode");
        }
        Participant::Ai
    } else {
        sign(&args.opponent, &args.opponent_password)?
    };

    if mine.id().is_some() && mine.id() == theirs.id() {
        bail!("A player cannot play against themself");
    }

    Ok(match args.symbol {
        Player::X => (mine, theirs),
        Player::O => (theirs, mine),
    })
}

/// Runs one game in the terminal and records it.
#[instrument(skip_all, fields(mode = %args.game_mode()))]
pub fn play<I: BufRead, W: Write>(
    repo: GameRepository,
    ai_config: AiConfig,
    args: &PlayArgs,
    input: I,
    mut out: W,
) -> anyhow::Result<Option<Outcome>> {
    let mode = args.game_mode();
    let (x, o) = seating(&repo, args)?;

    let mut game = TurnController::new(mode);
    if let Some(difficulty) = mode.difficulty() {
        let engine = AiEngine::new(difficulty).with_config(ai_config);
        game = game.with_ai(args.symbol.opponent(), engine);
    }
    let mut game = game.with_recorder(HistoryRecorder::new(repo, x, o));

    let outcome = play::run(&mut game, input, &mut out)?;

    let recorder = game.recorder();
    if let Some(e) = recorder.last_error() {
        warn!(error = %e, "Game not recorded");
        writeln!(out, "Warning: game could not be saved ({})", e.message)?;
    } else if let Some(saved) = recorder.last_saved() {
        writeln!(out, "Saved as game #{}.", saved.id())?;
    }
    Ok(outcome)
}

/// Creates an account.
#[instrument(skip_all, fields(user = %credentials.user))]
pub fn register<W: Write>(
    repo: &GameRepository,
    credentials: &Credentials,
    mut out: W,
) -> anyhow::Result<()> {
    let user = repo.register(&credentials.user, &credentials.password)?;
    info!(user_id = user.id(), "Account created");
    writeln!(out, "Registered {}.", user.username())?;
    Ok(())
}

/// Prints recent games, as a table or as JSON, optionally of one mode only.
#[instrument(skip_all, fields(user = %credentials.user, json = json, mode = ?mode))]
pub fn history<W: Write>(
    repo: &GameRepository,
    credentials: &Credentials,
    json: bool,
    mode: Option<GameMode>,
    mut out: W,
) -> anyhow::Result<()> {
    let user = sign_in(repo, credentials)?;
    let games = repo.game_history(*user.id(), mode)?;

    if json {
        serde_json::to_writer_pretty(&mut out, &games)?;
        writeln!(out)?;
        return Ok(());
    }

    if games.is_empty() {
        writeln!(out, "No games yet.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>5}  {:<19}  {:<12}  {:<12}  {:<12}  {:<14}  {:>5}",
        "ID", "Played", "Mode", "X", "O", "Result", "Moves"
    )?;
    for summary in &games {
        let record = summary.record();
        let mode = record
            .parse_mode()
            .map(|m| m.to_string())
            .unwrap_or_else(|_| record.game_mode().clone());
        let result = match record.parse_outcome() {
            Ok(stored) => match stored.winner() {
                Some(side) if record.seat_of(*user.id()) == Some(side) => "Won".to_string(),
                Some(side) => format!("{} won", side),
                None => stored.to_db_string().replace('_', " "),
            },
            Err(_) => record.outcome().clone(),
        };
        writeln!(
            out,
            "{:>5}  {:<19}  {:<12}  {:<12}  {:<12}  {:<14}  {:>5}",
            record.id(),
            record.played_at().format("%Y-%m-%d %H:%M:%S"),
            mode,
            summary.x_name(),
            summary.o_name(),
            result,
            record.move_count()
        )?;
    }
    Ok(())
}

/// Prints win/loss statistics.
#[instrument(skip_all, fields(user = %credentials.user))]
pub fn stats<W: Write>(
    repo: &GameRepository,
    credentials: &Credentials,
    mut out: W,
) -> anyhow::Result<()> {
    let user = sign_in(repo, credentials)?;
    let stats = repo.user_stats(*user.id())?;
    writeln!(out, "Games:      {}", stats.total_games())?;
    writeln!(out, "Wins:       {}", stats.wins())?;
    writeln!(out, "Losses:     {}", stats.losses())?;
    writeln!(out, "Draws:      {}", stats.draws())?;
    writeln!(out, "Move limit: {}", stats.move_limits())?;
    writeln!(out, "Win rate:   {:.1}%", stats.win_rate())?;
    Ok(())
}

/// Prints every board of a stored game the user took part in.
#[instrument(skip_all, fields(user = %credentials.user, game_id = game_id))]
pub fn replay<W: Write>(
    repo: &GameRepository,
    credentials: &Credentials,
    game_id: i32,
    mut out: W,
) -> anyhow::Result<()> {
    let user = sign_in(repo, credentials)?;
    let record = repo
        .game(game_id)?
        .filter(|record| record.seat_of(*user.id()).is_some())
        .with_context(|| format!("No game #{} for {}", game_id, user.username()))?;
    let mode: GameMode = record.parse_mode()?;
    let replay = record.replay()?;

    writeln!(out, "Game #{} ({}), {} moves", record.id(), mode, replay.len())?;
    for (step, action) in replay.moves().iter().enumerate() {
        if let Some(board) = replay.frame(step + 1) {
            writeln!(out, "\nMove {}: {}\n{}", step + 1, action, board.display())?;
        }
    }
    let result = record.parse_outcome()?;
    writeln!(out, "\nResult: {}", result.to_db_string().replace('_', " "))?;
    Ok(())
}

/// Deletes every game the signed-in user played. The account stays.
#[instrument(skip_all, fields(user = %credentials.user))]
pub fn clear_history<W: Write>(
    repo: &GameRepository,
    credentials: &Credentials,
    mut out: W,
) -> anyhow::Result<()> {
    let user = sign_in(repo, credentials)?;
    let games = repo.delete_games_for_user(*user.id())?;
    info!(games, "History cleared");
    writeln!(out, "Cleared {} game(s) for {}.", games, user.username())?;
    Ok(())
}

/// Deletes the signed-in account and its games.
#[instrument(skip_all, fields(user = %credentials.user))]
pub fn delete_user<W: Write>(
    repo: &GameRepository,
    credentials: &Credentials,
    mut out: W,
) -> anyhow::Result<()> {
    let user = sign_in(repo, credentials)?;
    let games = repo.delete_games_for_user(*user.id())?;
    if !repo.delete_user(user.username())? {
        bail!("Account {} vanished before it could be deleted", user.username());
    }
    info!(games, "Account deleted");
    writeln!(out, "Deleted {} and {} game(s).", user.username(), games)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ModeArg;
    use overtoe_core::Difficulty;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn setup_test_db() -> (NamedTempFile, GameRepository) {
        let db_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = db_file.path().to_str().expect("Invalid path").to_string();
        let repo = GameRepository::open(db_path).expect("Failed to open repository");
        (db_file, repo)
    }

    fn creds(user: &str, password: &str) -> Credentials {
        Credentials {
            user: user.to_string(),
            password: password.to_string(),
        }
    }

    fn play_args(mode: ModeArg, symbol: Player) -> PlayArgs {
        PlayArgs {
            mode,
            difficulty: Difficulty::Hard,
            symbol,
            user: Some("alice".to_string()),
            password: Some("secret".to_string()),
            opponent: None,
            opponent_password: None,
        }
    }

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).expect("utf8 output")
    }

    #[test]
    fn test_seating_ai_mode() {
        let (_db, repo) = setup_test_db();
        let alice = repo.register("alice", "secret").unwrap();

        let (x, o) = seating(&repo, &play_args(ModeArg::Ai, Player::O)).unwrap();
        assert_eq!(x, Participant::Ai);
        assert_eq!(o, Participant::User(*alice.id()));
    }

    #[test]
    fn test_seating_two_accounts() {
        let (_db, repo) = setup_test_db();
        let alice = repo.register("alice", "secret").unwrap();
        let bob = repo.register("bob", "secret").unwrap();

        let mut args = play_args(ModeArg::Overwrite, Player::X);
        args.opponent = Some("bob".to_string());
        args.opponent_password = Some("secret".to_string());
        let (x, o) = seating(&repo, &args).unwrap();
        assert_eq!(x, Participant::User(*alice.id()));
        assert_eq!(o, Participant::User(*bob.id()));

        args.opponent = Some("alice".to_string());
        assert!(seating(&repo, &args).is_err());
    }

    #[test]
    fn test_seating_rejects_bad_password() {
        let (_db, repo) = setup_test_db();
        repo.register("alice", "secret").unwrap();
        let mut args = play_args(ModeArg::Classic, Player::X);
        args.password = Some("nope".to_string());
        assert!(seating(&repo, &args).is_err());
    }

    #[test]
    fn test_play_records_and_lists_game() {
        let (_db, repo) = setup_test_db();
        repo.register("alice", "secret").unwrap();

        let input = Cursor::new("0 0\n1 0\n0 1\n1 1\n0 2\n");
        let mut out = Vec::new();
        let outcome = play(
            repo.clone(),
            AiConfig::default(),
            &play_args(ModeArg::Classic, Player::X),
            input,
            &mut out,
        )
        .unwrap();
        assert_eq!(outcome, Some(Outcome::Winner(Player::X)));
        assert!(text(out).contains("Saved as game #"));

        let mut out = Vec::new();
        history(&repo, &creds("alice", "secret"), false, None, &mut out).unwrap();
        let listing = text(out);
        assert!(listing.contains("Classic"));
        assert!(listing.contains("Guest"));
        assert!(listing.contains("Won"));

        let mut out = Vec::new();
        history(&repo, &creds("alice", "secret"), true, None, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["x_name"], "alice");
        assert_eq!(json[0]["record"]["moves"], "X00,O10,X01,O11,X02");

        let mut out = Vec::new();
        stats(&repo, &creds("alice", "secret"), &mut out).unwrap();
        let report = text(out);
        assert!(report.contains("Wins:       1"));
        assert!(report.contains("100.0%"));
    }

    #[test]
    fn test_replay_prints_each_move() {
        let (_db, repo) = setup_test_db();
        repo.register("alice", "secret").unwrap();
        let input = Cursor::new("1 1\n0 0\n2 2\nq\n");
        play(
            repo.clone(),
            AiConfig::default(),
            &play_args(ModeArg::Overwrite, Player::X),
            input,
            Vec::new(),
        )
        .unwrap();
        // Quit before the end: nothing stored.
        let alice = repo.user_by_name("alice").unwrap().unwrap();
        assert!(repo.game_history(*alice.id(), None).unwrap().is_empty());

        let input = Cursor::new("0 0\n1 0\n0 1\n1 1\n0 2\n");
        play(
            repo.clone(),
            AiConfig::default(),
            &play_args(ModeArg::Overwrite, Player::X),
            input,
            Vec::new(),
        )
        .unwrap();
        let game_id = *repo.game_history(*alice.id(), None).unwrap()[0].record().id();

        let mut out = Vec::new();
        replay(&repo, &creds("alice", "secret"), game_id, &mut out).unwrap();
        let shown = text(out);
        assert!(shown.contains("Overwrite"));
        assert!(shown.contains("Move 5"));
        assert!(shown.contains("Result: x won"));

        repo.register("mallory", "secret").unwrap();
        assert!(replay(&repo, &creds("mallory", "secret"), game_id, Vec::new()).is_err());
    }

    #[test]
    fn test_register_and_delete_user() {
        let (_db, repo) = setup_test_db();
        let mut out = Vec::new();
        register(&repo, &creds("carol", "secret"), &mut out).unwrap();
        assert!(text(out).contains("Registered carol"));
        assert!(register(&repo, &creds("carol", "secret"), Vec::new()).is_err());

        assert!(delete_user(&repo, &creds("carol", "wrong"), Vec::new()).is_err());
        let mut out = Vec::new();
        delete_user(&repo, &creds("carol", "secret"), &mut out).unwrap();
        assert!(text(out).contains("Deleted carol"));
        assert!(repo.user_by_name("carol").unwrap().is_none());
    }

    #[test]
    fn test_history_mode_filter() {
        let (_db, repo) = setup_test_db();
        repo.register("alice", "secret").unwrap();
        let win = "0 0\n1 0\n0 1\n1 1\n0 2\n";
        for mode in [ModeArg::Classic, ModeArg::Overwrite] {
            play(
                repo.clone(),
                AiConfig::default(),
                &play_args(mode, Player::X),
                Cursor::new(win),
                Vec::new(),
            )
            .unwrap();
        }

        let mut out = Vec::new();
        history(
            &repo,
            &creds("alice", "secret"),
            true,
            Some(GameMode::Overwrite),
            &mut out,
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let games = json.as_array().unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0]["record"]["game_mode"], "overwrite");

        let mut out = Vec::new();
        history(
            &repo,
            &creds("alice", "secret"),
            false,
            Some(GameMode::AiHard),
            &mut out,
        )
        .unwrap();
        assert!(text(out).contains("No games yet."));
    }

    #[test]
    fn test_clear_history_keeps_account() {
        let (_db, repo) = setup_test_db();
        repo.register("alice", "secret").unwrap();
        play(
            repo.clone(),
            AiConfig::default(),
            &play_args(ModeArg::Classic, Player::X),
            Cursor::new("0 0\n1 0\n0 1\n1 1\n0 2\n"),
            Vec::new(),
        )
        .unwrap();

        assert!(clear_history(&repo, &creds("alice", "wrong"), Vec::new()).is_err());

        let mut out = Vec::new();
        clear_history(&repo, &creds("alice", "secret"), &mut out).unwrap();
        assert!(text(out).contains("Cleared 1 game(s) for alice."));

        let alice = repo.user_by_name("alice").unwrap().expect("account kept");
        assert!(repo.game_history(*alice.id(), None).unwrap().is_empty());
        assert!(repo.authenticate("alice", "secret").is_ok());

        let mut out = Vec::new();
        clear_history(&repo, &creds("alice", "secret"), &mut out).unwrap();
        assert!(text(out).contains("Cleared 0 game(s)"));
    }
}
