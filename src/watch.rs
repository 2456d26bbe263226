use crate::cli::WatchArgs;
use tracing::info;

use insureflow::config::{AppConfig, ConfigError};
use insureflow::error::AppError;
use insureflow::telemetry;
use insureflow::watcher::{
    CommandLauncher, DirectoryInventory, IntakeWatcher, ProcessedLedger, WatchError,
};

pub(crate) async fn run(mut args: WatchArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    telemetry::init(&config.telemetry)?;

    if let Some(dir) = args.dir.take() {
        config.watcher.source_dir = dir;
    }
    if let Some(ledger) = args.ledger.take() {
        config.watcher.ledger_path = ledger;
    }
    if let Some(interval_secs) = args.interval_secs.take() {
        config.watcher.interval_secs = interval_secs;
    }
    if let Some(command) = args.command.take() {
        config.watcher.pipeline_command = Some(command);
    }

    let command_line = config
        .watcher
        .pipeline_command
        .as_deref()
        .ok_or(ConfigError::MissingWatchCommand)?;
    let launcher =
        CommandLauncher::from_command_line(command_line).ok_or(ConfigError::MissingWatchCommand)?;

    let ledger =
        ProcessedLedger::load(&config.watcher.ledger_path).map_err(WatchError::Ledger)?;
    let inventory = DirectoryInventory::new(&config.watcher.source_dir);

    info!(
        dir = %config.watcher.source_dir.display(),
        ledger = %config.watcher.ledger_path.display(),
        interval_secs = config.watcher.interval_secs,
        "starting intake watcher"
    );

    IntakeWatcher::new(inventory, launcher, ledger, config.watcher.interval())
        .run()
        .await;

    Ok(())
}
