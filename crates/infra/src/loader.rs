//! Catalog file loading.
//!
//! A catalog directory holds any number of `*.json` files, each shaped like
//! `{ "products": [ ... ] }`. Loading is all-or-nothing: one unreadable or
//! malformed file fails the whole attempt so callers never see half a catalog.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use catalogd_core::Product;

/// Extension (without the dot) of files picked up from a catalog directory.
pub const CATALOG_FILE_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read catalog directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read catalog file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse catalog file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog load timed out after {0:?}")]
    TimedOut(Duration),

    #[error("catalog load task aborted: {0}")]
    Aborted(String),
}

/// On-disk shape of a single catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

/// Anything that can produce a full product list on demand.
///
/// Implementations may block (filesystem IO); callers on an async runtime are
/// expected to run them on the blocking pool.
pub trait CatalogSource: Send + Sync + 'static {
    fn load(&self) -> Result<Vec<Product>, LoadError>;

    /// Short human-readable origin, used in logs.
    fn describe(&self) -> String;
}

impl<S> CatalogSource for Arc<S>
where
    S: CatalogSource + ?Sized,
{
    fn load(&self) -> Result<Vec<Product>, LoadError> {
        (**self).load()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Catalog source backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CatalogSource for DirectorySource {
    fn load(&self) -> Result<Vec<Product>, LoadError> {
        load_catalog(&self.dir)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Load every catalog file in `dir` and concatenate the products.
///
/// Files are visited in file-name order; products keep their in-file order.
pub fn load_catalog(dir: &Path) -> Result<Vec<Product>, LoadError> {
    let files = catalog_files(dir)?;

    let mut products = Vec::new();
    for path in &files {
        let mut parsed = read_catalog_file(path)?;
        debug!(file = %path.display(), products = parsed.len(), "parsed catalog file");
        products.append(&mut parsed);
    }

    Ok(products)
}

/// Parse one catalog file.
pub fn read_catalog_file(path: &Path) -> Result<Vec<Product>, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let file: CatalogFile = serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(file.products)
}

fn catalog_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let read_dir_err = |source: io::Error| LoadError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        // Follows symlinks; directories named `*.json` are skipped.
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(OsStr::to_str) == Some(CATALOG_FILE_EXTENSION) {
            files.push(path);
        }
    }

    // All entries share the same parent, so this is file-name order.
    files.sort();
    Ok(files)
}
