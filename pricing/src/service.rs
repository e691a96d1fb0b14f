//! Staleness-guarded owner of the price index. The index is rebuilt when
//! the newest price file in the configured directory changes (new path or
//! advanced mtime); a rebuild swaps in a fresh index wholesale, so callers
//! holding the previous snapshot keep reading consistent data.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use common::price::PriceRecord;
use common::probes::{FileProbe, RowReader};

use crate::index::{PriceIndex, PriceMatch};

pub const PRICE_FILE_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx"];

struct IndexState {
    index: Arc<PriceIndex>,
    source_path: Option<PathBuf>,
    source_mtime: u64,
}

pub struct PriceService {
    prices_dir: PathBuf,
    probe: Box<dyn FileProbe>,
    reader: Box<dyn RowReader>,
    state: Mutex<IndexState>,
}

impl PriceService {
    pub fn new(
        prices_dir: impl Into<PathBuf>,
        probe: Box<dyn FileProbe>,
        reader: Box<dyn RowReader>,
    ) -> Self {
        Self {
            prices_dir: prices_dir.into(),
            probe,
            reader,
            state: Mutex::new(IndexState {
                index: Arc::new(PriceIndex::default()),
                source_path: None,
                source_mtime: 0,
            }),
        }
    }

    /// Current index snapshot, rebuilding first if the backing file moved
    /// on. The staleness check and swap run under the lock; reads of the
    /// returned snapshot do not.
    pub fn current(&self) -> Arc<PriceIndex> {
        let mut state = self.lock_state();

        match self.probe.newest_file(&self.prices_dir, PRICE_FILE_EXTENSIONS) {
            Some((path, mtime)) => {
                let unchanged = state.source_path.as_deref() == Some(path.as_path())
                    && mtime <= state.source_mtime;
                if !unchanged {
                    self.rebuild(&mut state, path, mtime);
                }
            }
            None => {
                if state.source_path.take().is_some() {
                    warn!(
                        "Price file disappeared from {}; clearing index",
                        self.prices_dir.display()
                    );
                    state.index = Arc::new(PriceIndex::default());
                    state.source_mtime = 0;
                } else {
                    debug!("No price file found in {}", self.prices_dir.display());
                }
            }
        }

        Arc::clone(&state.index)
    }

    /// Force a rebuild from the then-current newest file.
    pub fn refresh(&self) {
        let mut state = self.lock_state();

        match self.probe.newest_file(&self.prices_dir, PRICE_FILE_EXTENSIONS) {
            Some((path, mtime)) => self.rebuild(&mut state, path, mtime),
            None => {
                warn!(
                    "No price file found in {}; keeping empty index",
                    self.prices_dir.display()
                );
                state.index = Arc::new(PriceIndex::default());
                state.source_path = None;
                state.source_mtime = 0;
            }
        }
    }

    pub fn lookup(&self, name: &str, set_name: &str, number: &str) -> Option<PriceRecord> {
        self.current().lookup(name, set_name, number)
    }

    pub fn lookup_with_reason(&self, name: &str, set_name: &str, number: &str) -> PriceMatch {
        self.current().lookup_with_reason(name, set_name, number)
    }

    fn rebuild(&self, state: &mut IndexState, path: PathBuf, mtime: u64) {
        let index = match self.reader.read_rows(&path) {
            Ok(rows) => PriceIndex::from_rows(&rows),
            Err(err) => {
                warn!("Failed to read price file {}: {}", path.display(), err);
                PriceIndex::default()
            }
        };

        info!(
            "Loaded {} price rows ({} skipped) from {}",
            index.rows_indexed(),
            index.rows_skipped(),
            path.display()
        );

        state.index = Arc::new(index);
        state.source_path = Some(path);
        state.source_mtime = mtime;
    }

    fn lock_state(&self) -> MutexGuard<'_, IndexState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Convenience check used by callers that only care whether a given path
/// would be picked up at all.
pub fn is_price_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .is_some_and(|ext| PRICE_FILE_EXTENSIONS.contains(&ext.as_str()))
}
