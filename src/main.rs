use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use tabflow::app::{AppEnvironment, AppReducer, AppState, FeatureSettings};
use tabflow::client::Clients;
use tabflow::config::Config;
use tabflow::logging::init_tracing;
use tabflow::persistence::JsonFileRepository;
use tabflow::shell::Shell;

/// Multi-tab client driven from the terminal.
#[derive(Debug, Parser)]
#[command(name = "tabflow", version, about)]
struct Args {
    /// Config file (default: <config_dir>/tabflow/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Serve built-in fixture data instead of calling the network
    #[arg(long)]
    offline: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let clients = if args.offline {
        tracing::info!("Using offline fixtures");
        Clients::fixtures()
    } else {
        Clients::http(&config).context("Failed to build HTTP clients")?
    };

    let favorites_path = config.persistence.favorites_path();
    tracing::info!(path = %favorites_path.display(), "Favorites storage");

    let env = AppEnvironment {
        clients,
        favorites: Arc::new(JsonFileRepository::new(favorites_path)),
        settings: FeatureSettings::from_config(&config),
    };
    let initial_tab = config
        .defaults
        .tab
        .parse()
        .context("Invalid startup tab")?;
    let store = AppReducer::new(env).into_store(AppState::with_tab(initial_tab));

    let shell = Shell::new(store);
    shell
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("Shell I/O failed")?;

    Ok(())
}
