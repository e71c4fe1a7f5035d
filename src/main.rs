use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};

use tally::core::config::{self, CliOverrides, TallyConfig};
use tally::core::state::App;
use tally::storage::{FileStore, KeyValueStore, MemoryStore, Persistence, RetryPolicy, SaveQueue};
use tally::tui;

#[derive(Parser)]
#[command(name = "tally", about = "Named to-do lists in your terminal")]
struct Args {
    /// Directory holding saved lists
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep lists in memory only; nothing is loaded or saved
    #[arg(long)]
    ephemeral: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (TallyConfig::default(), Some(e)),
    };
    let config = config::resolve(
        &file_config,
        &CliOverrides {
            data_dir: args.data_dir,
            log_level: args.log_level,
            ephemeral: args.ephemeral,
        },
    );

    // Initialize file logger
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Some(parent) = config.log_file.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }

    log::info!("Tally starting up (data dir: {})", config.data_dir.display());
    if let Some(e) = config_error {
        log::warn!("Falling back to default config: {}", e);
    }

    let store: Arc<dyn KeyValueStore> = if config.ephemeral {
        log::info!("Ephemeral mode: lists will not be saved");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::new(&config.data_dir))
    };
    let persistence = Persistence::new(store, config.storage_key.clone());
    let lists = persistence.load_or_empty().await;

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let policy = RetryPolicy {
        attempts: config.save_retries,
        backoff: Duration::from_millis(config.retry_backoff_ms),
    };
    let queue = SaveQueue::spawn(persistence, policy, tx);

    let result = tui::run(App::restored(lists), &queue, rx);

    // Flush pending writes even if the terminal loop failed
    queue.shutdown().await;
    log::info!("Tally shut down");
    result
}
