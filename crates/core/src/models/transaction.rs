use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Buying / acquiring an asset
    Buy,
    /// Selling / disposing of an asset
    Sell,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Buy => write!(f, "Buy"),
            Operation::Sell => write!(f, "Sell"),
        }
    }
}

/// The two currencies the engine books in. Every monetary figure is
/// tracked in both; `Currency` picks which side a trade was priced in
/// or which side a report should surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Argentine peso, the local currency
    Ars,
    /// US dollar, the foreign currency
    Usd,
}

impl Currency {
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Currency::Ars)
    }

    #[must_use]
    pub fn is_foreign(&self) -> bool {
        matches!(self, Currency::Usd)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Ars => write!(f, "ARS"),
            Currency::Usd => write!(f, "USD"),
        }
    }
}

/// Sort order for transaction listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionSortOrder {
    /// Newest trade date first (default for display)
    DateDesc,
    /// Oldest trade date first
    DateAsc,
    /// Largest quantity first
    QuantityDesc,
    /// Alphabetical by asset id
    AssetAsc,
}

/// A single buy/sell record in the ledger.
///
/// **Immutable once matched**: the engine never edits a transaction in
/// place; the CRUD layer replaces it through the façade, which triggers a
/// full recomputation. `seq` is assigned by the ledger at insertion and is
/// the deterministic tie-break when two trades share a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: Uuid,

    /// Ledger-assigned insertion sequence number (same-date tie-break)
    pub seq: u64,

    /// Asset being traded (catalog id)
    pub asset_id: String,

    /// Broker the trade settled at
    pub broker_id: String,

    /// Owning portfolio
    pub portfolio_id: String,

    /// Buy or Sell
    pub operation: Operation,

    /// Units traded (always positive; nominal face value for bonds)
    pub quantity: f64,

    /// Price per unit in `trade_currency` (per 100 face value for bonds)
    pub unit_price: f64,

    /// Currency the trade was priced in
    pub trade_currency: Currency,

    /// Settlement date (no time component, daily granularity)
    pub trade_date: NaiveDate,
}

/// Caller-facing input for a new transaction. The façade assigns `id` and
/// `seq` when the record is accepted into the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub asset_id: String,
    pub broker_id: String,
    pub portfolio_id: String,
    pub operation: Operation,
    pub quantity: f64,
    pub unit_price: f64,
    pub trade_currency: Currency,
    pub trade_date: NaiveDate,
}

impl NewTransaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        asset_id: impl Into<String>,
        broker_id: impl Into<String>,
        portfolio_id: impl Into<String>,
        operation: Operation,
        quantity: f64,
        unit_price: f64,
        trade_currency: Currency,
        trade_date: NaiveDate,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            broker_id: broker_id.into(),
            portfolio_id: portfolio_id.into(),
            operation,
            quantity,
            unit_price,
            trade_currency,
            trade_date,
        }
    }

    /// Materialize into a ledger record with a fresh id and the given
    /// sequence number.
    #[must_use]
    pub fn into_transaction(self, seq: u64) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            seq,
            asset_id: self.asset_id,
            broker_id: self.broker_id,
            portfolio_id: self.portfolio_id,
            operation: self.operation,
            quantity: self.quantity,
            unit_price: self.unit_price,
            trade_currency: self.trade_currency,
            trade_date: self.trade_date,
        }
    }
}
