//! surpresinhas: entry point.
//!
//! Loads configuration, initialises structured logging, builds the
//! weighted pool for the configured game (live API → snapshot → uniform),
//! draws the requested combinations and records them in the history
//! directory.

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use surpresinhas::config::AppConfig;
use surpresinhas::engine::{apply_seed, draw_combinations, PoolBuilder};
use surpresinhas::fetcher::guidi::GuidiClient;
use surpresinhas::storage::{HistoryStore, SnapshotCache};
use surpresinhas::types::ProvenanceMode;

const CONFIG_PATH_ENV: &str = "SURPRESINHAS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let cfg = AppConfig::load_or_default(&config_path)?;
    let generation = &cfg.generation;

    info!(
        game = %generation.game,
        surpresinhas = generation.surpresinhas,
        dezenas = generation.dezenas,
        seed = ?generation.seed,
        "surpresinhas starting up"
    );

    // Seed once, before anything is drawn.
    let mut rng = apply_seed(generation.seed);

    let fetcher = GuidiClient::new(
        Some(cfg.api.base_url.clone()),
        Some(cfg.api.user_agent.clone()),
    )
    .context("Failed to build HTTP client for the draw API")?;
    let builder = PoolBuilder::new(Box::new(fetcher), SnapshotCache::from_config(&cfg.storage));

    let (pool, provenance) = builder.build_pool(generation.game).await;
    match provenance.mode {
        ProvenanceMode::Online => info!(mode = %provenance.mode, "{}", provenance.message),
        _ => warn!(mode = %provenance.mode, "{}", provenance.message),
    }

    let combinations = draw_combinations(
        generation.surpresinhas,
        generation.dezenas,
        &pool,
        &mut rng,
    )
    .with_context(|| format!("Failed to generate {} combinations", generation.game))?;

    println!("{}: {}", generation.game, provenance.message);
    for (i, combination) in combinations.iter().enumerate() {
        println!("{:>2}: {combination}", i + 1);
    }

    if cfg.storage.save_history {
        let history = HistoryStore::from_config(&cfg.storage);
        match history.save(
            generation.game,
            &combinations,
            generation.dezenas,
            rng.seed(),
            &provenance,
        ) {
            Ok(path) => println!("Histórico salvo em: {}", path.display()),
            Err(e) => error!(error = %e, "Failed to save history"),
        }
    }

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("surpresinhas=info"));

    let json_logging = std::env::var("SURPRESINHAS_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
