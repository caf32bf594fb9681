//! Process-wide store of loaded help indexes.
//!
//! The store hands out immutable snapshots. Reloading builds a new map and
//! swaps it in, so a lint run that already holds a snapshot keeps seeing the
//! indexes it started with.

use crate::error::IndexError;
use crate::models::index::PackageIndex;
use crate::source::FileSource;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Immutable view of every loaded package, keyed by package name.
pub type Catalog = Arc<BTreeMap<String, Arc<PackageIndex>>>;

pub const DEFAULT_INDEX_NAME: &str = "hyperhelp.json";

pub struct IndexStore {
    source: Arc<dyn FileSource + Send>,
    index_name: String,
    packages: RwLock<Catalog>,
}

impl IndexStore {
    /// An empty store; call `reload_all` to populate it.
    pub fn new(source: Arc<dyn FileSource + Send>, index_name: &str) -> Self {
        IndexStore {
            source,
            index_name: index_name.to_string(),
            packages: RwLock::new(Arc::new(BTreeMap::new())),
        }
    }

    /// Create a store and load every index `source` can find.
    pub fn open(source: Arc<dyn FileSource + Send>, index_name: &str) -> Self {
        let store = Self::new(source, index_name);
        store.reload_all();
        store
    }

    pub fn source(&self) -> &dyn FileSource {
        self.source.as_ref()
    }

    pub fn snapshot(&self) -> Catalog {
        self.packages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, package: &str) -> Option<Arc<PackageIndex>> {
        self.snapshot().get(package).cloned()
    }

    fn replace(&self, map: BTreeMap<String, Arc<PackageIndex>>) {
        *self.packages.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(map);
    }

    /// Rescan the source for index files and replace the whole catalog.
    ///
    /// Indexes that fail to load are logged and skipped. Returns the number
    /// of packages loaded.
    pub fn reload_all(&self) -> usize {
        let mut map: BTreeMap<String, Arc<PackageIndex>> = BTreeMap::new();
        for location in self.source.list_resources("", &self.index_name) {
            match self.load(&location) {
                Ok(ix) => {
                    if let Some(prev) = map.get(&ix.package) {
                        tracing::warn!(
                            package = %ix.package,
                            kept = %prev.index_location,
                            ignored = %location,
                            "package has more than one help index"
                        );
                        continue;
                    }
                    map.insert(ix.package.clone(), Arc::new(ix));
                }
                Err(e) => tracing::warn!(error = %e, "skipping help index"),
            }
        }
        tracing::debug!(packages = map.len(), "help indexes loaded");
        let count = map.len();
        self.replace(map);
        count
    }

    /// Re-read the index of one already-loaded package.
    pub fn reload(&self, package: &str) -> Result<Arc<PackageIndex>, IndexError> {
        let current = self
            .get(package)
            .ok_or_else(|| IndexError::UnknownPackage(package.to_string()))?;
        let fresh = Arc::new(self.load(&current.index_location)?);
        let mut map = (*self.snapshot()).clone();
        map.remove(package);
        map.insert(fresh.package.clone(), fresh.clone());
        self.replace(map);
        Ok(fresh)
    }

    fn load(&self, location: &str) -> Result<PackageIndex, IndexError> {
        let text = self
            .source
            .get_content(location)
            .ok_or_else(|| IndexError::Unreadable {
                path: location.to_string(),
            })?;
        PackageIndex::from_json(&text, location)
    }
}
