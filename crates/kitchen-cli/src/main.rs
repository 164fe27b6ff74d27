//! Play-session entry point for Kitchen Alchemy.
//!
//! Reads commands from stdin, drives the resolution engine against a
//! JSON-file store, and prints what happened. Everything runs in one task:
//!
//! ```text
//! stdin line --> Command --> Session --> Kitchen --> JSON files
//!                               |
//!                               +--> generation request (in flight)
//! autosave tick ---------------------> Kitchen::autosave
//! ```
//!
//! A generation request is polled by the same `select!` as input and the
//! autosave timer, so the player can keep typing (and clearing) while it
//! runs, and no save can interleave with a reset.

mod command;
mod render;
mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use futures::FutureExt as _;
use futures::future::BoxFuture;
use kitchen_catalog::Catalog;
use kitchen_core::{
    AutosaveTimer, DisabledGenerator, FileBlobStore, GameConfig, GenerationTicket, Generator,
    Kitchen,
};
use kitchen_oracle::{GenerationClient, OracleConfig};
use kitchen_types::{CandidateIngredient, GenerationRequest};
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::command::Command;
use crate::session::{Flow, Session};

/// The generator behind this session: the remote service when one is
/// configured, otherwise nothing.
enum Oracle {
    Remote(GenerationClient),
    Offline(DisabledGenerator),
}

impl Generator for Oracle {
    async fn generate(&self, request: &GenerationRequest) -> Option<CandidateIngredient> {
        match self {
            Self::Remote(client) => client.generate(request).await,
            Self::Offline(disabled) => disabled.generate(request).await,
        }
    }
}

type InFlight = BoxFuture<'static, (GenerationTicket, Option<CandidateIngredient>)>;

/// Application entry point.
///
/// Initializes logging, loads the game configuration (path from the first
/// argument or `KITCHEN_CONFIG`), sets up the generation client from the
/// environment, opens the save directory, and runs the session loop.
///
/// # Errors
///
/// Returns an error if configuration, storage setup, or stdin fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the session on stdout.
    let logs = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr);
    if std::env::var("KITCHEN_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        logs.json().init();
    } else {
        logs.init();
    }

    info!("kitchen starting");

    let mut config = load_game_config()?;
    let oracle = match OracleConfig::from_env().context("invalid generation settings")? {
        Some(oracle_config) => Oracle::Remote(
            GenerationClient::from_config(&oracle_config)
                .context("failed to set up the generation client")?,
        ),
        None => {
            info!("no generation backend configured, unmatched combinations will miss");
            config.generation.enabled = false;
            Oracle::Offline(DisabledGenerator::new())
        }
    };

    let backend = FileBlobStore::open(&config.storage.directory).with_context(|| {
        format!("failed to open save directory {}", config.storage.directory.display())
    })?;
    info!(
        save_dir = %config.storage.directory.display(),
        autosave_secs = config.storage.autosave_interval_secs,
        generation = config.generation.enabled,
        "configuration loaded"
    );

    let kitchen = Kitchen::new(Catalog::standard(), backend, oracle, &config)
        .context("configured achievements are invalid")?;
    let progress = kitchen.progress();
    info!(
        precedence = ?kitchen.precedence(),
        discovered = progress.discovered,
        total = progress.total,
        "progress loaded"
    );

    let timer = AutosaveTimer::new(config.autosave_interval());
    run(Session::new(kitchen), timer).await
}

/// Read the game configuration, falling back to defaults when no file is
/// named, then apply `KITCHEN_SAVE_DIR` from the environment.
fn load_game_config() -> anyhow::Result<GameConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("KITCHEN_CONFIG").ok())
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let config = match path {
        Some(path) => GameConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::parse("").context("invalid default configuration")?,
    };
    Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
}

/// The session loop: input, generation answers, and autosave in one task.
async fn run(
    mut session: Session<FileBlobStore, Oracle>,
    mut timer: AutosaveTimer,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<InFlight> = None;

    println!("Welcome to the kitchen. Type `help` for commands.");
    println!(
        "{}",
        render::bowl(session.kitchen().workspace(), session.kitchen().state())
    );

    loop {
        let mut out = Vec::new();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    session.autosave();
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match session.execute(command, &mut out).await {
                    Flow::Continue => {}
                    Flow::Generate(ticket) => {
                        in_flight = Some(request_generation(session.kitchen().generator(), ticket));
                    }
                    Flow::Reset => timer.postpone(),
                    Flow::Quit => {
                        print_lines(&out);
                        break;
                    }
                }
            }
            answer = async {
                match in_flight.as_mut() {
                    Some(future) => future.await,
                    None => std::future::pending().await,
                }
            }, if in_flight.is_some() => {
                in_flight = None;
                let (ticket, candidate) = answer;
                session.finish(ticket, candidate, &mut out);
            }
            () = timer.tick() => {
                session.autosave();
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "failed to listen for ctrl-c");
                }
                session.autosave();
                break;
            }
        }

        print_lines(&out);
    }

    info!("kitchen stopped");
    Ok(())
}

/// Start a generation request that owns everything it needs.
fn request_generation<G>(generator: Arc<G>, ticket: GenerationTicket) -> InFlight
where
    G: Generator + Send + Sync + 'static,
{
    async move {
        let candidate = generator.generate(ticket.request()).await;
        (ticket, candidate)
    }
    .boxed()
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
