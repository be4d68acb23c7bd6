//! Headless Salvo runner.
//!
//! Plays a match from a shot script, one `<angle> <force>` pair per line.
//! Blank lines and lines starting with `#` are skipped. A bad line aborts
//! only that turn.
//!
//! ```text
//! salvo [--config match.json] [script.txt]
//! salvo --dump-config
//! ```
//!
//! The script is read from stdin when no file is given. Logging goes to
//! stderr and is controlled by `RUST_LOG` (default `info`); set
//! `LOG_FORMAT=json` for JSON lines.

use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use salvo_core::event::{LossReason, MatchEvent, RenderSink};
use salvo_core::{Duel, MatchConfig};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .with_writer(io::stderr)
            .init();
    }
}

/// Sink that logs every notification.
#[derive(Default)]
struct LogSink {
    cells: u32,
    lost: u32,
}

impl RenderSink for LogSink {
    fn on_event(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::ProjectileMoved { to, .. } => {
                tracing::trace!(x = to.x, y = to.y, "projectile");
            }
            MatchEvent::CellDestroyed { structure, cell } => {
                self.cells += 1;
                tracing::debug!(%structure, x = cell.x, y = cell.y, "cell destroyed");
            }
            MatchEvent::LowLife { combatant } => {
                tracing::warn!(%combatant, "last life point");
            }
            MatchEvent::ProjectileLost { reason, .. } => {
                self.lost += 1;
                let reason = match reason {
                    LossReason::OutOfBounds => "out of bounds",
                    LossReason::StepLimit => "step limit",
                    LossReason::NonFinite => "non-finite",
                };
                tracing::debug!(reason, "projectile lost");
            }
            other => tracing::debug!(event = ?other, "event"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "salvo")]
#[command(about = "Play a Salvo artillery duel from a shot script")]
struct Args {
    /// Match configuration (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Shot script, one `<angle> <force>` pair per line; stdin when omitted
    script: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<MatchConfig> {
    match path {
        Some(path) => MatchConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(MatchConfig::default()),
    }
}

fn open_script(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    let reader: Box<dyn Read> = match path {
        Some(path) => Box::new(
            std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };
    Ok(Box::new(BufReader::new(reader)))
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    if args.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let mut duel = Duel::new(config).context("invalid match configuration")?;
    let mut sink = LogSink::default();
    let script = open_script(args.script.as_ref())?;

    for (number, line) in script.lines().enumerate() {
        let line = line.context("reading script")?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let attacker = duel.attacker();
        match duel.play_scripted_turn(text, &mut sink) {
            Ok(outcome) => tracing::info!(
                line = number + 1,
                %attacker,
                angle = outcome.angle,
                force = outcome.force,
                steps = outcome.steps,
                result = ?outcome.result,
                "turn played"
            ),
            Err(err) => tracing::warn!(line = number + 1, %attacker, %err, "turn skipped"),
        }
        if duel.is_match_over() {
            break;
        }
    }

    let (left, right) = duel.scores();
    let [p1, p2] = duel.players();
    println!("turns:  {}", duel.turns_played());
    println!("scores: {p1}={left} {p2}={right}");
    println!("cells destroyed: {}, shots lost: {}", sink.cells, sink.lost);
    match (duel.is_match_over(), duel.winner()) {
        (true, Some(winner)) => println!("winner: {winner}"),
        (true, None) => println!("result: draw"),
        (false, _) => println!("result: match unfinished"),
    }
    Ok(())
}
