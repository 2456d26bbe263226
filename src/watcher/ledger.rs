use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Durable set of already-dispatched item identifiers, persisted as a JSON
/// array. A missing file reads as an empty set; the file is rewritten whole
/// at the end of every polling pass.
#[derive(Debug)]
pub struct ProcessedLedger {
    path: PathBuf,
    entries: HashSet<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("failed to read ledger {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ledger {} is not a JSON array of strings: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to persist ledger {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ProcessedLedger {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let mut ledger = Self {
            path: path.into(),
            entries: HashSet::new(),
        };
        ledger.reload()?;
        Ok(ledger)
    }

    /// Re-read the ledger from disk, discarding in-memory entries. Called at
    /// the start of every polling pass.
    pub fn reload(&mut self) -> Result<(), LedgerError> {
        if !self.path.exists() {
            self.entries.clear();
            return Ok(());
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| LedgerError::Read {
            path: self.path.clone(),
            source,
        })?;
        let entries: Vec<String> =
            serde_json::from_str(&raw).map_err(|source| LedgerError::Parse {
                path: self.path.clone(),
                source,
            })?;
        self.entries = entries.into_iter().collect();
        Ok(())
    }

    pub fn contains(&self, item: &str) -> bool {
        self.entries.contains(item)
    }

    /// Returns false when the item was already present.
    pub fn insert(&mut self, item: String) -> bool {
        self.entries.insert(item)
    }

    pub fn persist(&self) -> Result<(), LedgerError> {
        let mut entries: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        entries.sort_unstable();
        let body = serde_json::to_string_pretty(&entries)
            .expect("string array serialization cannot fail");
        fs::write(&self.path, body).map_err(|source| LedgerError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
