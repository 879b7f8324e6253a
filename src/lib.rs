//! housewatch — congressional trading disclosure tracker.
//!
//! Ingests public political-trading disclosures from a paginated remote API,
//! persists them in an embedded SQLite file, incrementally enriches them with
//! per-filer biographical detail and daily price history, and derives
//! holding-period return series.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
