//! Error types.
//!
//! Stale handles never show up here: a destroyed entity is a normal state that
//! renders as a placeholder. What remains is malformed operator input, faults
//! raised while drawing a window body, and startup failures of the binary.

use std::io;

use thiserror::Error;

/// Rejected edit-field input. The previous value stays in effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("input is empty")]
    Empty,
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("{0} is not a positive number")]
    NonPositive(i64),
}

/// Failure reported by a window content renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("target has been destroyed")]
    Destroyed,
    #[error("render failed: {0}")]
    Render(String),
}

/// Invalid startup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("page limit must be positive")]
    PageLimit,
    #[error("refresh interval must be between {min_ms} and {max_ms} milliseconds")]
    RefreshInterval { min_ms: u64, max_ms: u64 },
    #[error("window size must be at least {min_width}x{min_height}")]
    WindowSize { min_width: u16, min_height: u16 },
}

#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("terminal i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
