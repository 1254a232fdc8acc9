//! Error types for tradewind-core
//!
//! ## Table of Contents
//! 1. TradewindError - Main error enum
//! 2. Result type alias

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for simulation construction and configuration
pub type Result<T> = std::result::Result<T, TradewindError>;

/// Errors raised while building simulators or loading their configuration.
///
/// Stepping never fails: degenerate geometry and missing surface data are
/// handled as no-ops inside the step.
#[derive(Error, Debug)]
pub enum TradewindError {
    /// Sail rows are missing or malformed
    #[error("Invalid sail topology: {0}")]
    InvalidTopology(String),

    /// Head, tack and clew span no area
    #[error("Degenerate sail: head, tack and clew are collinear (area {area})")]
    DegenerateSail { area: f32 },

    /// Hull mesh has too few vertices or out-of-range triangle indices
    #[error("Invalid hull mesh: {0}")]
    InvalidHullMesh(String),

    /// Hull construction lines cannot be meshed
    #[error("Invalid hull lines: {0}")]
    InvalidHullLines(String),

    /// Config file could not be read
    #[error("Failed to read config {0}: {1}")]
    ConfigIo(PathBuf, #[source] std::io::Error),

    /// Config file is not valid TOML for the schema
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config parsed but a tunable is out of range
    #[error("Invalid config value `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}
