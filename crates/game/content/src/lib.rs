//! Data-driven configuration for bureau hosts.
//!
//! Provides loaders that read [`BureauConfig`](bureau_core::BureauConfig) from
//! TOML or RON files. Missing sections and fields fall back to the defaults in
//! `bureau-core`.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigFormat, ConfigLoader, LoadResult};
