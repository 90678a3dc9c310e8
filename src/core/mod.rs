//! core
//!
//! Domain leaves shared across the release pipeline: version resolution,
//! package manifests, and product configuration.

pub mod config;
pub mod manifest;
pub mod version;
