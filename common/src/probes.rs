use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use thiserror::Error;
use tracing::debug;

use crate::row::SourceRow;
use crate::utils::get_current_time;

/// Wall clock in whole seconds. Injected so cache expiry and staleness
/// checks are testable without real time.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        get_current_time()
    }
}

/// Filesystem view of a source directory: which candidate file is newest,
/// and how fresh is it. Injected so rebuild triggers are testable without
/// touching the real filesystem.
pub trait FileProbe: Send + Sync {
    /// Newest file (by modification time) in `dir` whose extension matches
    /// one of `extensions` (lowercase, without the dot). Ties are broken
    /// arbitrarily. None when the directory is missing or empty.
    fn newest_file(&self, dir: &Path, extensions: &[&str]) -> Option<(PathBuf, u64)>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn newest_file(&self, dir: &Path, extensions: &[&str]) -> Option<(PathBuf, u64)> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("Cannot list {}: {}", dir.display(), err);
                return None;
            }
        };

        let mut best: Option<(PathBuf, u64)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_lowercase())
                .is_some_and(|ext| extensions.contains(&ext.as_str()));
            if !matches {
                continue;
            }

            let mtime = entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok())
                .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
                .map(|duration| duration.as_secs())
                .unwrap_or(0);

            if best.as_ref().is_none_or(|(_, current)| mtime > *current) {
                best = Some((path, mtime));
            }
        }

        best
    }
}

#[derive(Error, Debug)]
pub enum RowReadError {
    #[error("failed to read source file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed source file {0}: {1}")]
    Malformed(PathBuf, String),
}

/// Produces pre-parsed rows for a source file. The engine deliberately has
/// no CSV/XLSX code of its own; whichever collaborator knows the format
/// plugs in here.
pub trait RowReader: Send + Sync {
    fn read_rows(&self, path: &Path) -> Result<Vec<SourceRow>, RowReadError>;
}
