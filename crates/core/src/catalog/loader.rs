use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tracing::info;

use super::Catalog;
use crate::models::Faction;

/// Thread-safe catalog holder that loads from disk on first use.
#[derive(Clone)]
pub struct CatalogLoader {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    path: PathBuf,
    cache: Option<Arc<Catalog>>,
}

impl CatalogLoader {
    /// Build a new loader for the catalog file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                path: path.into(),
                cache: None,
            })),
        }
    }

    /// Path of the catalog file.
    pub fn path(&self) -> PathBuf {
        self.inner.read().path.clone()
    }

    /// Point the loader at a different catalog file and drop the cached copy.
    pub fn refresh(&self, path: impl Into<PathBuf>) {
        let mut inner = self.inner.write();
        inner.path = path.into();
        inner.cache = None;
    }

    /// Return the catalog, loading and validating it on first use.
    pub fn catalog(&self) -> Result<Arc<Catalog>> {
        if let Some(catalog) = self.inner.read().cache.clone() {
            return Ok(catalog);
        }

        let mut inner = self.inner.write();
        if let Some(catalog) = inner.cache.clone() {
            return Ok(catalog);
        }

        let catalog = Catalog::load(&inner.path)
            .with_context(|| format!("failed to load catalog {}", inner.path.display()))?;
        info!(
            path = %inner.path.display(),
            factions = catalog.factions().len(),
            "loaded catalog"
        );
        let catalog = Arc::new(catalog);
        inner.cache = Some(catalog.clone());
        Ok(catalog)
    }

    /// Filter factions using a case-insensitive substring search.
    pub fn factions_matching(&self, query: &str) -> Result<Vec<Faction>> {
        let catalog = self.catalog()?;
        Ok(catalog
            .factions_matching(query)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn caches_until_refreshed() -> Result<()> {
        let dir = tempdir()?;
        let first = dir.path().join("first.json");
        fs::write(&first, fixtures::catalog_json().to_string())?;

        let loader = CatalogLoader::new(&first);
        let catalog = loader.catalog()?;
        assert_eq!(catalog.factions().len(), 2);

        // A cached catalog survives the file disappearing.
        fs::remove_file(&first)?;
        let cached = loader.catalog()?;
        assert!(Arc::ptr_eq(&catalog, &cached));

        let second = dir.path().join("second.json");
        fs::write(
            &second,
            json!({ "factions": [{ "id": "orks", "name": "Orks" }] }).to_string(),
        )?;
        loader.refresh(&second);
        assert_eq!(loader.path(), second);
        let found = loader.factions_matching("ork")?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "orks");
        Ok(())
    }

    #[test]
    fn missing_file_reports_path() {
        let loader = CatalogLoader::new("/nonexistent/catalog.json");
        let err = loader.catalog().expect_err("missing file");
        assert!(format!("{err:#}").contains("/nonexistent/catalog.json"));
    }
}
