//! Shared, read-only price history snapshot.
//!
//! The history is loaded once and handed out as `Arc<PriceHistory>`. Readers
//! never lock; a reload builds a fresh history and swaps the pointer
//! atomically, so in-flight requests keep the snapshot they started with.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use arc_swap::ArcSwap;
use tracing::{info, warn};

use crate::data::history::{LoadOptions, PriceHistory};
use crate::error::PlanError;
use crate::io::ingest::read_csv;

/// Identity of a source file at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceId {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceId {
    fn probe(path: &Path) -> Result<Self, PlanError> {
        let meta = std::fs::metadata(path)
            .map_err(|e| PlanError::DataFormat(format!("failed to stat '{}': {e}", path.display())))?;
        Ok(Self {
            path: path.to_path_buf(),
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

struct Loaded {
    source: SourceId,
    history: Arc<PriceHistory>,
}

/// Holder of the current price history snapshot for one CSV source.
pub struct HistoryStore {
    path: PathBuf,
    options: LoadOptions,
    current: ArcSwap<Loaded>,
}

impl HistoryStore {
    /// Load the source once.
    pub fn open(path: impl Into<PathBuf>, options: LoadOptions) -> Result<Self, PlanError> {
        let path = path.into();
        let loaded = load(&path, options)?;
        Ok(Self {
            path,
            options,
            current: ArcSwap::from_pointee(loaded),
        })
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<PriceHistory> {
        Arc::clone(&self.current.load().history)
    }

    /// Identity of the source behind the current snapshot.
    pub fn source(&self) -> SourceId {
        self.current.load().source.clone()
    }

    /// Re-read the source if its identity changed; returns whether a swap happened.
    ///
    /// On failure the previous snapshot stays active.
    pub fn reload(&self) -> Result<bool, PlanError> {
        let probed = SourceId::probe(&self.path)?;
        if probed == self.current.load().source {
            return Ok(false);
        }
        self.reload_forced()?;
        Ok(true)
    }

    /// Re-read the source unconditionally and swap the snapshot.
    pub fn reload_forced(&self) -> Result<(), PlanError> {
        match load(&self.path, self.options) {
            Ok(loaded) => {
                info!(path = %self.path.display(), records = loaded.history.len(), "price history reloaded");
                self.current.store(Arc::new(loaded));
                Ok(())
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "reload failed; keeping previous snapshot");
                Err(err)
            }
        }
    }
}

fn load(path: &Path, options: LoadOptions) -> Result<Loaded, PlanError> {
    let source = SourceId::probe(path)?;
    let table = read_csv(path)?;
    let history = PriceHistory::load(&table, options)?;
    Ok(Loaded {
        source,
        history: Arc::new(history),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "date,commodity,state,modal_price\n";

    fn write_csv(path: &Path, rows: &[&str]) {
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
    }

    #[test]
    fn snapshot_is_shared_until_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        write_csv(&path, &["2024-01-01,rice,goa,20"]);

        let store = HistoryStore::open(&path, LoadOptions::default()).unwrap();
        let first_source = store.source();
        assert_eq!(first_source.path, path);
        let a = store.snapshot();
        let b = store.snapshot();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 1);

        // Unchanged source: no swap.
        assert!(!store.reload().unwrap());
        assert!(Arc::ptr_eq(&a, &store.snapshot()));
        assert_eq!(store.source(), first_source);

        write_csv(&path, &["2024-01-01,rice,goa,20", "2024-02-01,rice,goa,24"]);
        assert!(store.reload().unwrap());

        assert_ne!(store.source(), first_source);
        assert!(store.source().len > first_source.len);

        let c = store.snapshot();
        assert_eq!(c.len(), 2);
        // The old handle still sees the old data.
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        write_csv(&path, &["2024-01-01,rice,goa,20"]);
        let store = HistoryStore::open(&path, LoadOptions::default()).unwrap();

        std::fs::write(&path, "when,what\n2024-01-01,rice\n").unwrap();
        assert!(store.reload_forced().is_err());
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn open_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = HistoryStore::open(dir.path().join("nope.csv"), LoadOptions::default()).err().unwrap();
        assert!(matches!(err, PlanError::DataFormat(_)));
    }
}
