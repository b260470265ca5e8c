//! Baccarat tracker console.
//!
//! Entry point. Loads configuration, initialises structured logging on
//! stderr, and runs the interactive console until `quit`, end of input,
//! or Ctrl+C. Stdin is read off-runtime so Ctrl+C exits without waiting
//! for a line.

use anyhow::Result;
use tokio::io::stdout;
use tracing::info;

use baccarat_tracker::config::AppConfig;
use baccarat_tracker::console::{self, render, Console};

const BANNER: &str = r#"
 ___   _   ___ ___   _   ___    _ _____
| _ ) /_\ / __/ __| /_\ | _ \  /_\_   _|
| _ \/ _ \ (_| (__ / _ \|   / / _ \| |
|___/_/ \_\___\___/_/ \_\_|_\/_/ \_\_|

  Pair dominance tracker with staking ladder
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let config_path = AppConfig::resolve_path();
    let cfg = AppConfig::load_or_default(&config_path)?;

    println!("{BANNER}");
    println!("{}\n", render::HELP);
    info!(
        config = %config_path,
        unit_size = cfg.session.unit_size,
        window = cfg.signal.window,
        "Tracker starting up"
    );

    let mut session = Console::new(&cfg)?;
    let mut out = stdout();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tokio::select! {
        res = console::run(&mut session, console::stdin_lines(), &mut out) => res?,
        _ = &mut shutdown => {
            info!("Shutdown signal received.");
        }
    }

    let stake = session.engine().stake();
    info!(
        rounds = session.engine().rounds_recorded(),
        bankroll = stake.bankroll,
        profit_lock = stake.profit_lock,
        "Tracker shut down cleanly."
    );

    Ok(())
}

/// Initialise the `tracing` subscriber on stderr.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("baccarat_tracker=info"));

    let json_logging = std::env::var("TRACKER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    }
}
