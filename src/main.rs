//! Fintrack main entry point

use anyhow::Context;
use clap::Parser;
use fintrack_client::{Fallback, FallbackPolicy, HttpApi, MockStore};
use fintrack_config::{Config, ConfigError};
use fintrack_core::{AuthContext, FileTokenStore};
use fintrack_web::{start_server, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "fintrack")]
#[command(author = "Fintrack Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight personal-finance web front-end", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,

    /// Override `api.fallback` (never, offline, always)
    #[arg(long)]
    fallback: Option<FallbackPolicy>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (mut config, missing) = match Config::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            eprintln!("[ERROR] {}", e.report());
            return Err(e).with_context(|| format!("Failed to load {}", args.config.display()));
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level)).init();

    if missing {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    } else {
        log::info!("Config loaded from {}", args.config.display());
    }
    if let Some(policy) = args.fallback {
        config.api.fallback = policy;
    }

    let rt = Runtime::new()?;
    rt.block_on(run(config))
}

async fn run(config: Config) -> anyhow::Result<()> {
    let store = Arc::new(FileTokenStore::new(config.session.token_file.clone()));
    let auth = AuthContext::restore(store)
        .await
        .context("Failed to restore session")?;
    if auth.is_authenticated().await {
        log::info!("Restored saved session");
    }

    let http = HttpApi::new(&config.api, auth.clone()).context("Failed to build HTTP client")?;
    log::info!(
        "Finance API at {} (mock fallback: {})",
        http.base_url(),
        config.api.fallback
    );
    let api = Arc::new(Fallback::new(http, MockStore::seeded(), config.api.fallback));

    let state = AppState::new(api, auth, config);
    start_server(state).await.context("Server error")?;
    Ok(())
}
