//! Reference data for the conquest rules engine.
//!
//! This crate houses the default scenario and the loaders that turn data files
//! into oracle snapshots:
//! - Territory graph, capitals and opening garrisons (RON)
//! - Unit table (TOML)
//! - Game configuration (TOML)
//!
//! Content is consumed by the engine through oracles and never appears in game
//! state. Every snapshot is validated before it is handed out.

pub mod validate;

#[cfg(feature = "loaders")]
mod catalog;
#[cfg(feature = "loaders")]
pub mod loaders;

pub use validate::{ContentIssue, issues, validate};

#[cfg(feature = "loaders")]
pub use catalog::{catalog, init_catalog};
#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, MapLoader, UnitLoader};
