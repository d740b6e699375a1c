use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
    time::{Duration, Instant, SystemTime},
};

use clap::{Parser, Subcommand};
use futures::{executor::LocalPool, future::ready, task::LocalSpawnExt};
use player_ui_core::{
    current_elapsed, rank, AppConfig, MarqueeSync, MarqueeText, PlaybackState, PlayerUiError,
    Release, SearchItem, SkipControl,
};
use tracing_subscriber::EnvFilter;

/// Rough glyph width used to turn text into an overflow in pixels.
const GLYPH_WIDTH_PX: f64 = 8.0;
const VIEWPORT_WIDTH_PX: f64 = 160.0;

fn main() -> player_ui_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Marquee { rounds, texts } => run_marquee(&config, rounds, texts),
        Commands::Search { query, items } => run_search(&query, &items),
        Commands::Skip {
            elapsed,
            reported_at,
            paused,
            deltas,
        } => {
            let state = paused.then_some(PlaybackState::Paused);
            let elapsed = current_elapsed(elapsed, reported_at, state, SystemTime::now());
            run_skip(&config, elapsed, &deltas)
        }
    }
}

fn run_marquee(
    config: &AppConfig,
    rounds: usize,
    texts: Vec<String>,
) -> player_ui_core::Result<()> {
    tracing::info!(rounds, texts = texts.len(), "simulating synced marquees");

    let sync = MarqueeSync::new();
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    let report = Rc::new(RefCell::new(Vec::new()));

    for text in texts {
        let overflow = text.chars().count() as f64 * GLYPH_WIDTH_PX - VIEWPORT_WIDTH_PX;
        let marquee = MarqueeText::new(text, overflow, &sync, config.marquee.clone());
        let report = Rc::clone(&report);

        spawner
            .spawn_local(async move {
                // Virtual clock, nothing actually sleeps.
                let mut clock = Duration::ZERO;
                for round in 1..=rounds {
                    let release = marquee
                        .run_cycle(|step| {
                            clock += step;
                            ready(())
                        })
                        .await;
                    tracing::info!(
                        label = marquee.label(),
                        round,
                        ?release,
                        at_secs = clock.as_secs_f64(),
                        "marquee cycle finished"
                    );
                    if release != Release::Quorum {
                        break;
                    }
                }
                report
                    .borrow_mut()
                    .push((marquee.label().to_string(), marquee.duration(), clock));
            })
            .map_err(|err| PlayerUiError::msg(format!("failed to spawn marquee: {err}")))?;
    }
    pool.run();

    for (label, duration, clock) in report.borrow().iter() {
        println!(
            "{label:<40} scroll {duration:>6.2}s  finished at {:>7.2}s",
            clock.as_secs_f64()
        );
    }
    Ok(())
}

fn run_search(query: &str, items: &Path) -> player_ui_core::Result<()> {
    tracing::info!(query, ?items, "ranking search results");

    let raw = std::fs::read_to_string(items)?;
    let items: Vec<SearchItem> = serde_json::from_str(&raw)?;
    for (score, item) in rank(&items, query) {
        println!("{score:>8.1}  {:<8?} {}", item.media_type, item.name);
    }
    Ok(())
}

fn run_skip(
    config: &AppConfig,
    elapsed: Option<f64>,
    deltas: &[f64],
) -> player_ui_core::Result<()> {
    if deltas.is_empty() {
        return Err(PlayerUiError::InvalidInput(
            "at least one skip delta is required",
        ));
    }

    let mut control = SkipControl::new(&config.skip);
    let now = Instant::now();
    for delta in deltas {
        let seek = control.skip(now, elapsed, *delta);
        println!("skip {delta:+}s -> seek to {}s", seek.position_secs);
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Player front-end helpers", long_about = None)]
struct Cli {
    /// Optional JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a group of marquee texts against one sync barrier.
    Marquee {
        /// Number of loops every text performs.
        #[arg(short, long, default_value_t = 3)]
        rounds: usize,
        /// Texts to scroll; short ones fit the viewport and stay still.
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Rank the items of a JSON file against a query.
    Search {
        query: String,
        /// JSON array of search items.
        items: PathBuf,
    },
    /// Apply a burst of skip presses and print the resulting seeks.
    Skip {
        /// Elapsed time reported by the player, in seconds.
        #[arg(short, long)]
        elapsed: Option<f64>,
        /// When the elapsed time was reported, in seconds since the Unix epoch.
        #[arg(long)]
        reported_at: Option<f64>,
        /// The player is paused, so the reported time does not advance.
        #[arg(long)]
        paused: bool,
        /// Skip amounts in seconds, negative to rewind.
        #[arg(allow_negative_numbers = true)]
        deltas: Vec<f64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_marquee_texts() {
        let cli = Cli::try_parse_from(["player-ui", "marquee", "-r", "2", "one", "two"]).unwrap();
        match cli.command {
            Commands::Marquee { rounds, texts } => {
                assert_eq!(rounds, 2);
                assert_eq!(texts, vec!["one", "two"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_accepts_negative_skips() {
        let cli = Cli::try_parse_from(["player-ui", "skip", "-e", "30", "10", "-5"]).unwrap();
        match cli.command {
            Commands::Skip {
                elapsed,
                reported_at,
                paused,
                deltas,
            } => {
                assert_eq!(elapsed, Some(30.0));
                assert_eq!(reported_at, None);
                assert!(!paused);
                assert_eq!(deltas, vec![10.0, -5.0]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn marquee_simulation_completes() {
        let texts = vec![
            "a title that is long enough to scroll".to_string(),
            "an even longer artist name that certainly scrolls".to_string(),
            "fits".to_string(),
        ];
        run_marquee(&AppConfig::default(), 2, texts).unwrap();
    }

    #[test]
    fn skip_requires_deltas() {
        let err = run_skip(&AppConfig::default(), None, &[]).unwrap_err();
        assert!(matches!(err, PlayerUiError::InvalidInput(_)));
    }
}
