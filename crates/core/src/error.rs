// crates/core/src/error.rs
use chrono::NaiveDate;
use thiserror::Error;

/// Validation errors raised while interpreting requests or ingested rows.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("Invalid timeframe '{0}': expected one of 7, 14, 28")]
    InvalidTimeframe(String),

    #[error("Unknown metric '{0}'")]
    UnknownMetric(String),

    #[error("Unknown chat mode '{0}': expected one of edit, ask, agent, custom, inline")]
    UnknownChatMode(String),

    #[error("Invalid {table} row for {date}: {reason}")]
    InvalidRow {
        table: &'static str,
        date: NaiveDate,
        reason: String,
    },

    #[error("Message must not be empty")]
    EmptyMessage,
}

impl CoreError {
    pub fn invalid_row(table: &'static str, date: NaiveDate, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            table,
            date,
            reason: reason.into(),
        }
    }
}
