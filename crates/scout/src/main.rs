use anyhow::{bail, Result};
use clap::Parser;
use scout::{
    admin::{start_server, AdminState},
    cli::{Cli, Commands},
    config::{default_config_path, init_config, load_config, ScoutConfig},
    purge::{outcome_notice, HttpPurgeClient, PurgeClient},
    queue::NoticeQueue,
    shutdown::ShutdownController,
    store::FileOptionStore,
};
use std::{path::Path, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        log,
        config,
        command,
    } = Cli::parse();
    let config_path = match config {
        Some(path) => path,
        None => default_config_path()?,
    };

    match command {
        Commands::Init => init_config(&config_path),
        Commands::Daemon(opts) => {
            let mut config = prepare_config(&config_path, log)?;
            config.merge_daemon_opts(opts);
            let _guard = config.telemetry_config().init()?;
            run_daemon(config).await
        }
        Commands::Purge => {
            let config = prepare_config(&config_path, log)?;
            let _guard = config.telemetry_config().init()?;
            let client = HttpPurgeClient::new(&config.remote.base_url, config.remote.timeout())?;
            let outcome = client.purge().await;
            let failed = outcome.is_err();
            println!("{}", outcome_notice(outcome).message);
            if failed {
                bail!("Scout cache purge failed");
            }
            Ok(())
        }
        Commands::Notices => {
            let config = prepare_config(&config_path, log)?;
            let _guard = config.telemetry_config().init()?;
            let queue = notice_queue(&config);
            for notice in queue.drain().await? {
                println!("[{}] {}", notice.severity, notice.message);
            }
            Ok(())
        }
    }
}

fn prepare_config(path: &Path, log: Option<tracing::Level>) -> Result<ScoutConfig> {
    init_config(path)?;
    let mut config = load_config(path)?;
    config.merge_log_level(log);
    Ok(config)
}

fn notice_queue(config: &ScoutConfig) -> NoticeQueue<FileOptionStore> {
    NoticeQueue::with_key(
        FileOptionStore::new(&config.store.path),
        config.store.option_key.clone(),
    )
}

async fn run_daemon(config: ScoutConfig) -> Result<()> {
    info!("Scout endpoint: {}", config.remote.base_url);
    info!("Notice store: {:?}", config.store.path);

    let client = HttpPurgeClient::new(&config.remote.base_url, config.remote.timeout())?;
    let queue = Arc::new(notice_queue(&config));
    let state = Arc::new(AdminState::new(
        client,
        queue,
        &config.server.roles_header,
    )?);

    let shutdown = ShutdownController::new();
    shutdown.install_signal_handler();
    start_server(&config.server, state, shutdown).await
}
