//! Load-once cache for the dashboard's source file

use crate::loader::{DataLoader, LoadOutcome};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Holds the loaded table for one source path.
///
/// The first [`DataCache::get`] reads the file; later calls reuse the result
/// until [`DataCache::invalidate`] is called.
#[derive(Debug)]
pub struct DataCache {
    source: PathBuf,
    loaded: OnceCell<LoadOutcome>,
}

impl DataCache {
    pub fn new<P: AsRef<Path>>(source: P) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            loaded: OnceCell::new(),
        }
    }

    /// The cached load outcome, loading the source on first use
    pub fn get(&self) -> &LoadOutcome {
        self.loaded.get_or_init(|| DataLoader::load(&self.source))
    }

    /// Forget the cached table so the next `get` reloads the source
    pub fn invalidate(&mut self) {
        if self.loaded.take().is_some() {
            debug!(path = %self.source.display(), "Invalidated cached fuel table");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}
