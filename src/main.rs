use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mongotui::config::Config;
use mongotui::dao::{Dao, MemoryDao, sample_seed};
use mongotui::tui::App;

#[derive(Parser)]
#[command(
    name = "mongotui",
    version,
    about = "Terminal UI for browsing and editing MongoDB-style collections",
    long_about = None
)]
struct Cli {
    /// Seed fixture as a {db: {collection: [documents]}} JSON file
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Database to open at startup
    #[arg(short = 'D', long)]
    database: Option<String>,

    /// Editor program for document edit sessions (falls back to $EDITOR)
    #[arg(short, long, env = "EDITOR")]
    editor: Option<String>,

    /// Directory holding keybindings.json, history.txt and the log file
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.config_dir, cli.editor)?;

    init_tracing(&config, cli.debug)?;

    let dao: Arc<dyn Dao> = Arc::new(load_dao(cli.seed.as_deref())?);

    let mut app = App::new(config, dao).with_initial_database(cli.database);
    app.run()
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_tracing(config: &Config, debug: bool) -> Result<()> {
    if let Some(parent) = config.log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let log_file = fs::File::create(&config.log_path)
        .with_context(|| format!("opening log file {}", config.log_path.display()))?;

    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mongotui={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_dao(seed: Option<&std::path::Path>) -> Result<MemoryDao> {
    match seed {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading seed fixture {}", path.display()))?;
            let fixture = serde_json::from_str(&raw)
                .with_context(|| format!("parsing seed fixture {}", path.display()))?;
            MemoryDao::from_seed(&fixture)
        }
        None => MemoryDao::from_seed(&sample_seed()),
    }
}
