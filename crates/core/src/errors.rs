use chrono::NaiveDate;
use thiserror::Error;

/// Unified error type for the entire wealth-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Unknown asset: {0}")]
    AssetNotFound(String),

    /// No exchange rate is recorded for a date the engine needs.
    /// Converting against a missing rate would silently corrupt cost
    /// basis with zeros, so it is surfaced instead.
    #[error("No exchange rate available for {date}")]
    RateUnavailable { date: NaiveDate },

    /// A sell exceeds the open quantity bought before it for the same
    /// asset and broker. Carries the shortfall so callers can show it.
    #[error(
        "Cannot sell {requested} of {asset_id} at broker {broker_id} on {date} — only {available} held"
    )]
    InsufficientLots {
        asset_id: String,
        broker_id: String,
        date: NaiveDate,
        requested: f64,
        available: f64,
    },

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
