use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use tether::api::{ApiGateway, ConfigCredentials, HttpTransport, ResourceClient, Transport};
use tether::cli::args::{Cli, Commands};
use tether::cli::commands::{self, AppContext};
use tether::config::{Config, Paths};
use tether::error::TetherError;
use tether::storage::Database;
use tether::sync::{NetworkWatcher, OfflineQueue, QueueStore};

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), TetherError> {
    let cli = Cli::parse();

    // Completions need no app state
    if let Commands::Completions { shell } = &cli.command {
        let mut command = Cli::command();
        clap_complete::generate(*shell, &mut command, "tether", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = bootstrap().await?;
    let format = cli.output;

    let output = match cli.command {
        Commands::Tasks(args) => commands::tasks(&ctx, args.command, format).await?,
        Commands::Habits(args) => commands::habits(&ctx, args.command, format).await?,
        Commands::Projects => commands::projects(&ctx, format).await?,
        Commands::Contacts => commands::contacts(&ctx, format).await?,
        Commands::Sync(args) => commands::sync(&ctx, args.command, format).await?,
        Commands::Auth(args) => commands::auth(&ctx, args.command, format)?,
        Commands::Completions { .. } => String::new(),
    };

    if !output.is_empty() {
        println!("{output}");
    }

    // If a command's traffic proved the service reachable, flush whatever
    // is still queued before the process goes away
    if ctx.queue.is_online() && ctx.queue.queue_length() > 0 {
        let replayed = ctx.queue.drain().await;
        if replayed > 0 {
            log::info!("Flushed {replayed} queued request(s) on exit");
        }
    }

    ctx.queue.shutdown();
    Ok(())
}

/// Wire up the application: config, storage, queue, transport, gateway.
///
/// The offline queue is constructed exactly once here and handed around by
/// reference; nothing else owns queue state.
async fn bootstrap() -> Result<AppContext, TetherError> {
    let paths = Paths::new()?;
    paths.ensure_dirs()?;
    let config = Config::load_from_path(&paths.config_file)?;

    let database = Arc::new(Database::open_at(&paths.database)?);
    let store = QueueStore::new(database);

    let queue = Arc::new(OfflineQueue::new(store).with_policy(
        config.sync.max_retries,
        Duration::from_millis(config.sync.retry_delay_ms),
    ));

    // Reachability is unknown until a request settles it; start pessimistic
    // so startup never blocks on a replay pass
    let watcher = NetworkWatcher::new(false);

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?);

    Arc::clone(&queue)
        .initialize(Arc::clone(&transport), &watcher)
        .await?;

    let credentials = Arc::new(ConfigCredentials::new(config.api.auth_token.clone()));
    let gateway = Arc::new(ApiGateway::new(
        transport,
        Arc::clone(&queue),
        watcher.clone(),
        credentials,
    ));
    let resources = ResourceClient::new(Arc::clone(&gateway));

    Ok(AppContext {
        config,
        paths,
        queue,
        watcher,
        gateway,
        resources,
    })
}
