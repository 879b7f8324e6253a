//! Core domain types and batch job logic.

pub mod trade;
pub mod price;
pub mod sync;
pub mod enrich;
pub mod price_cache;
pub mod returns;
pub mod error;
