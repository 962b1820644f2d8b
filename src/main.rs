//! RPS Duel
//!
//! Terminal front end. Reads commands from stdin, advances the session
//! clock on a fixed frame interval and prints whatever the session emits.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rps_duel::{
    game::{input::HELP_TEXT, powerup::PowerUpKind},
    Command, DeterministicRng, FileStore, GameConfig, GameSession, ModeState, SessionEvent,
    SystemClock, VERSION,
};

type TerminalSession = GameSession<DeterministicRng, SystemClock, FileStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GameConfig::from_env().context("reading configuration")?;
    let seed = config.seed.unwrap_or_else(rand::random);

    info!("RPS Duel v{}", VERSION);
    info!("Seed: {}", seed);
    info!("Save file: {}", config.save_path.display());

    let mut session: TerminalSession = GameSession::new(
        config.rules.clone(),
        DeterministicRng::new(seed),
        SystemClock,
        FileStore::new(&config.save_path),
    );

    println!("{}", HELP_TEXT);
    let mut last_mode = *session.mode_state();
    print_events(&mut session, &mut last_mode);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut frames = interval(config.frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last_frame).as_millis() as u64;
                last_frame = now;
                session.advance(elapsed);
            }
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    info!("Input closed");
                    break;
                };
                match Command::parse(&line) {
                    Some(Command::Quit) => break,
                    Some(command) => run_command(&mut session, command),
                    None if line.trim().is_empty() => {}
                    None => warn!("Unknown command: {:?} (try `help`)", line.trim()),
                }
            }
        }
        print_events(&mut session, &mut last_mode);
    }

    info!("Goodbye");
    Ok(())
}

fn run_command(session: &mut TerminalSession, command: Command) {
    match command {
        Command::Play(mv) => {
            if session.play(mv).is_none() {
                println!("(wait for the current round to finish)");
            }
        }
        Command::UsePowerUp(kind) => {
            if !session.use_power_up(kind) {
                println!("No {} left", kind);
            }
        }
        Command::CycleMode => {
            session.cycle_mode();
        }
        Command::SetMode(mode) => session.set_mode(mode),
        Command::CycleTheme => {
            println!("Theme: {}", session.cycle_theme());
        }
        Command::ToggleMute => {
            println!("Sound {}", if session.toggle_mute() { "off" } else { "on" });
        }
        Command::ToggleMusic => {
            println!("Music {}", if session.toggle_music() { "on" } else { "off" });
        }
        Command::Reset => session.reset(),
        Command::Share => println!("{}", session.share_text()),
        Command::Status => print_status(session),
        Command::History => {
            for round in session.history().iter() {
                let player = round.player_move.map_or("(timeout)", |mv| mv.name());
                println!("  {:>9} vs {:<8} {:?}", player, round.opponent_move, round.outcome);
            }
        }
        Command::Help => println!("{}", HELP_TEXT),
        Command::Quit => {}
    }
}

fn print_status(session: &TerminalSession) {
    let snapshot = session.snapshot();
    let p = snapshot.progression;
    println!(
        "Level {} ({}/{} XP) | streak {} (best {}) | {} games, {}% wins",
        p.level, p.experience, p.experience_to_next, p.streak, p.longest_streak,
        p.total_games, snapshot.win_percentage
    );
    println!("Mode: {}", snapshot.mode.kind());
    let held: Vec<String> = PowerUpKind::ALL
        .iter()
        .map(|&kind| format!("{} x{}", kind, snapshot.inventory.count(kind)))
        .collect();
    println!("Power-ups: {}", held.join(", "));
    println!(
        "Daily: {}/{}{}",
        snapshot.daily.progress,
        snapshot.daily.target,
        if snapshot.daily.completed { " (done)" } else { "" }
    );
    if !snapshot.badges.is_empty() {
        let badges: Vec<&str> = snapshot.badges.iter().map(|b| b.name()).collect();
        println!("Badges: {}", badges.join(", "));
    }
}

fn print_events(session: &mut TerminalSession, last_mode: &mut ModeState) {
    for event in session.take_events() {
        match event {
            SessionEvent::Notice(notice) => println!("* {}", notice),
            SessionEvent::RoundResolved(report) => {
                let player = report.round.player_move.map_or("(timeout)", |mv| mv.name());
                println!(
                    "{} vs {} -> {:?} | streak {} | level {}",
                    player,
                    report.round.opponent_move,
                    report.outcome(),
                    report.progression.streak,
                    report.progression.level
                );
            }
            SessionEvent::Render(snapshot) => {
                if snapshot.mode != *last_mode {
                    print_mode_line(&snapshot.mode);
                    *last_mode = snapshot.mode;
                }
            }
        }
    }
}

fn print_mode_line(mode: &ModeState) {
    match mode {
        ModeState::Normal => println!("[Normal Mode]"),
        ModeState::Timed(t) => println!("[Timed Mode] {}s", t.remaining),
        ModeState::Challenge(c) => println!(
            "[Challenge Mode] {}/{} wins, {}s left",
            c.current_wins, c.target_wins, c.remaining_sec
        ),
        ModeState::Tournament(t) => println!(
            "[Tournament Mode] round {}/{} ({}W {}L)",
            t.round.min(t.max_rounds), t.max_rounds, t.wins, t.losses
        ),
    }
}
