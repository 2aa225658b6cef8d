//! Process-wide content catalog.
//!
//! The catalog is built at most once. Callers either install content from a
//! directory with [`init_catalog`] before first use, or let [`catalog`] fall
//! back to the embedded scenario.

use std::path::PathBuf;
use std::sync::OnceLock;

use conquest_core::OracleSnapshot;

use crate::loaders::{ContentFactory, LoadResult};

static CATALOG: OnceLock<OracleSnapshot> = OnceLock::new();

/// Returns the shared catalog, building it from the embedded scenario on
/// first use.
pub fn catalog() -> LoadResult<&'static OracleSnapshot> {
    if let Some(snapshot) = CATALOG.get() {
        return Ok(snapshot);
    }
    let snapshot = ContentFactory::load_embedded()?;
    Ok(CATALOG.get_or_init(|| snapshot))
}

/// Loads content from `data_dir` and installs it as the shared catalog.
///
/// Fails if the catalog was already built.
pub fn init_catalog(data_dir: impl Into<PathBuf>) -> LoadResult<&'static OracleSnapshot> {
    let snapshot = ContentFactory::new(data_dir).load_snapshot()?;
    CATALOG
        .set(snapshot)
        .map_err(|_| anyhow::anyhow!("Content catalog is already initialized"))?;
    catalog()
}
