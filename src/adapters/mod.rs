//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod fmp_client;
pub mod sqlite_store;
pub mod web;
