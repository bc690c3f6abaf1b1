//! Configuration for an allocation run.
//!
//! Loads configuration from environment variables with defaults matching the
//! reference venue. The binary lets command-line flags override any of it.

use crate::types::TheaterLayout;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default tracing filter when `SEATPLAN_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "seatplan=info";

/// Largest grid, in cells, a run will allocate
pub const MAX_CELLS: usize = 1_000_000;

/// Run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Grid shape and buffer widths
    pub layout: TheaterLayout,
    /// Where results are written
    pub output: OutputConfig,
    /// Tracing filter directive
    pub log_filter: String,
}

/// Output locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Ticket manifest path
    pub tickets_path: PathBuf,
    /// JSON-lines allocation records path, if records are wanted
    pub records_path: Option<PathBuf>,
}

/// Configuration rejected by [`Config::validate`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The grid has no rows
    #[error("row count must be at least 1")]
    ZeroRows,

    /// The grid has no columns
    #[error("column count must be at least 1")]
    ZeroColumns,

    /// Rows times columns is more than [`MAX_CELLS`]
    #[error("a {rows}x{cols} grid exceeds the limit of {max} cells")]
    TooLarge {
        /// Configured rows
        rows: usize,
        /// Configured columns
        cols: usize,
        /// The cell limit
        max: usize,
    },
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = TheaterLayout::default();
        Self {
            layout: TheaterLayout {
                rows: lookup("SEATPLAN_ROWS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.rows),
                cols: lookup("SEATPLAN_COLS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.cols),
                row_buffer: lookup("SEATPLAN_ROW_BUFFER")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.row_buffer),
                col_buffer: lookup("SEATPLAN_COL_BUFFER")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.col_buffer),
            },
            output: OutputConfig {
                tickets_path: lookup("SEATPLAN_TICKETS")
                    .map_or_else(|| PathBuf::from("tickets.txt"), PathBuf::from),
                records_path: lookup("SEATPLAN_RECORDS").map(PathBuf::from),
            },
            log_filter: lookup("SEATPLAN_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Checks the layout holds at least one seat and at most [`MAX_CELLS`]
    ///
    /// Buffer widths of zero are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a grid with zero rows, zero columns, or
    /// more cells than the limit.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        let TheaterLayout { rows, cols, .. } = self.layout;
        if rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if cols == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        match rows.checked_mul(cols) {
            Some(cells) if cells <= MAX_CELLS => Ok(()),
            _ => Err(ConfigError::TooLarge {
                rows,
                cols,
                max: MAX_CELLS,
            }),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
