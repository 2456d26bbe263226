//! Intake watcher: polls a source store on a fixed interval and launches the
//! external processing pipeline at most once per discovered item. The dedup
//! ledger is reloaded at the start of every pass and persisted at the end,
//! so a crash between passes can repeat at most one dispatch batch and can
//! never skip a new item.

mod ledger;

pub use ledger::{LedgerError, ProcessedLedger};

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("failed to list intake source: {0}")]
    Inventory(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("failed to spawn pipeline command: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Lists item identifiers currently present in the watched store. The real
/// blob container client lives behind this seam.
pub trait SourceInventory: Send + Sync {
    fn list(&self) -> Result<Vec<String>, WatchError>;
}

/// Hands one newly discovered item to the external processing pipeline.
pub trait PipelineLauncher: Send + Sync {
    fn launch(&self, item: &str) -> Result<(), LaunchError>;
}

/// Inventory over a local drop directory: every regular file is one item.
pub struct DirectoryInventory {
    root: PathBuf,
}

impl DirectoryInventory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceInventory for DirectoryInventory {
    fn list(&self) -> Result<Vec<String>, WatchError> {
        let entries = std::fs::read_dir(&self.root)
            .map_err(|err| WatchError::Inventory(format!("{}: {err}", self.root.display())))?;

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|err| WatchError::Inventory(format!("{}: {err}", self.root.display())))?;
            let is_file = entry.file_type().map(|kind| kind.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                items.push(name.to_string());
            }
        }
        items.sort_unstable();
        Ok(items)
    }
}

/// Launches the configured command with the item identifier appended as the
/// final argument. Fire-and-forget: the child's streams are inherited and a
/// background task logs the exit code.
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
}

impl CommandLauncher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a whitespace-separated command line. Returns `None` for a
    /// blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl PipelineLauncher for CommandLauncher {
    fn launch(&self, item: &str) -> Result<(), LaunchError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(item)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        let item = item.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => info!(%item, code = status.code(), "pipeline task exited"),
                Err(err) => error!(%item, error = %err, "pipeline task could not be awaited"),
            }
        });

        Ok(())
    }
}

/// The polling loop itself: inventory minus ledger, launch, persist.
pub struct IntakeWatcher<I, L> {
    inventory: I,
    launcher: L,
    ledger: ProcessedLedger,
    interval: Duration,
}

impl<I, L> IntakeWatcher<I, L>
where
    I: SourceInventory,
    L: PipelineLauncher,
{
    pub fn new(inventory: I, launcher: L, ledger: ProcessedLedger, interval: Duration) -> Self {
        Self {
            inventory,
            launcher,
            ledger,
            interval,
        }
    }

    /// One polling pass. Every item not yet in the ledger is marked before
    /// its launch is attempted, so a given item is dispatched at most once
    /// even if the launch itself fails; the updated ledger is persisted
    /// before returning. Returns the number of successful launches.
    pub fn poll_once(&mut self) -> Result<usize, WatchError> {
        self.ledger.reload()?;
        let items = self.inventory.list()?;

        let mut dispatched = 0;
        for item in items {
            if !self.ledger.insert(item.clone()) {
                continue;
            }
            match self.launcher.launch(&item) {
                Ok(()) => {
                    info!(%item, "dispatched pipeline task");
                    dispatched += 1;
                }
                Err(err) => {
                    // One bad launch never blocks the rest of the pass.
                    error!(%item, error = %err, "pipeline launch failed");
                }
            }
        }

        self.ledger.persist()?;
        Ok(dispatched)
    }

    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = self.interval.as_secs(), "intake watcher started");
        loop {
            ticker.tick().await;
            match self.poll_once() {
                Ok(0) => debug!("intake poll found nothing new"),
                Ok(count) => info!(dispatched = count, "intake poll complete"),
                Err(err) => error!(error = %err, "intake poll failed"),
            }
        }
    }
}
