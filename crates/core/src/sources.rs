use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::AssetRef;
use crate::models::rates::ExchangeRate;
use crate::models::transaction::NewTransaction;

/// Trait abstraction for the hosted transaction store.
///
/// The engine computes over an in-memory snapshot fetched once per
/// request; how the records are stored and queried is entirely the
/// embedding application's concern. No ordering is guaranteed; the
/// ledger assigns insertion sequence numbers on receipt.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// All transactions for a portfolio, optionally one broker's subset.
    async fn fetch_transactions(
        &self,
        portfolio_id: &str,
        broker_id: Option<&str>,
    ) -> Result<Vec<NewTransaction>, CoreError>;
}

/// Trait abstraction for the exchange-rate store: all `(date, rate)`
/// pairs for the ARS/USD pair. Populated by the external rate ingestion
/// jobs, which are not part of this library.
#[async_trait]
pub trait ExchangeRateSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, CoreError>;
}

/// Trait abstraction for the asset catalog: instrument type and the two
/// latest market quotes per asset. Quote freshness is the catalog's
/// responsibility.
#[async_trait]
pub trait AssetRefSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_assets(&self) -> Result<Vec<AssetRef>, CoreError>;
}
