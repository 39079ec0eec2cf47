//! Error types for building requests, loading suites and reading config.
//!
//! # Design
//! Build errors are scoped to a single case: the orchestrator reports them
//! against that case and moves on. A malformed header therefore gets its own
//! variant so the message names the exact offending line. Load errors are
//! suite-wide and surface through `Reporter::fatal`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors turning a `RequestSpec` into a `SyntheticRequest`.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid method {method:?}")]
    InvalidMethod { method: String },

    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The header line has no `": "` separator.
    #[error("header {header:?} has invalid format (expected `Key: Value`)")]
    MalformedHeader { header: String },

    /// The header splits correctly but the name or value is not legal HTTP.
    #[error("header {header:?} is not a valid HTTP header: {reason}")]
    InvalidHeader { header: String, reason: String },
}

/// Errors reading or parsing a YAML suite definition.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read suite: {0}")]
    Read(#[from] io::Error),

    #[error("parse suite: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors in `Config` values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
