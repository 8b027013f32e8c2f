pub mod errors;
pub mod models;
pub mod services;
pub mod sources;

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use errors::CoreError;
use models::{
    asset::AssetRef,
    ledger::Ledger,
    lot::Lot,
    metrics::{Holding, PortfolioMetrics},
    rates::{ExchangeRate, RateTable},
    settings::Settings,
    transaction::{Currency, NewTransaction, Transaction, TransactionSortOrder},
};
use services::{
    currency_service::CurrencyService, lot_service::LotMatcher, metrics_service::MetricsService,
};
use sources::{AssetRefSource, ExchangeRateSource, TransactionSource};

/// Main entry point for the Wealth Tracker core library.
///
/// Owns an in-memory snapshot (ledger, exchange rates, asset catalog)
/// and computes holdings and valuation metrics over it from scratch on
/// demand. Mutations are validated before commit: a sell that exceeds the
/// quantity bought before it, for its asset and broker, is rejected with
/// the shortfall rather than accepted and silently truncated at matching
/// time.
#[must_use]
pub struct WealthTracker {
    ledger: Ledger,
    rates: RateTable,
    assets: HashMap<String, AssetRef>,
    settings: Settings,
    lot_matcher: LotMatcher,
    currency_service: CurrencyService,
    metrics_service: MetricsService,
}

impl std::fmt::Debug for WealthTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WealthTracker")
            .field("transactions", &self.ledger.len())
            .field("rates", &self.rates.len())
            .field("assets", &self.assets.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl WealthTracker {
    /// Create an empty tracker with default settings.
    pub fn new() -> Self {
        Self {
            ledger: Ledger::new(),
            rates: RateTable::new(),
            assets: HashMap::new(),
            settings: Settings::default(),
            lot_matcher: LotMatcher::new(),
            currency_service: CurrencyService::new(),
            metrics_service: MetricsService::new(),
        }
    }

    /// Build a tracker from a pre-fetched snapshot.
    ///
    /// Sequence numbers are assigned in input order and then stick, so the
    /// same snapshot always matches the same way. Every transaction is
    /// validated (positive quantity/price, known asset) and the whole
    /// ledger is checked for oversells before anything is accepted.
    pub fn with_data(
        transactions: Vec<NewTransaction>,
        rates: Vec<ExchangeRate>,
        assets: Vec<AssetRef>,
    ) -> Result<Self, CoreError> {
        let mut tracker = Self::new();
        tracker.rates = RateTable::from_rates(rates);
        for asset in assets {
            tracker.upsert_asset(asset)?;
        }
        tracker.add_transactions(transactions)?;
        Ok(tracker)
    }

    /// Build a tracker by pulling one snapshot through the collaborator
    /// interfaces.
    pub async fn load_from_sources(
        transaction_source: &dyn TransactionSource,
        rate_source: &dyn ExchangeRateSource,
        asset_source: &dyn AssetRefSource,
        portfolio_id: &str,
    ) -> Result<Self, CoreError> {
        let assets = asset_source.fetch_assets().await?;
        let rates = rate_source.fetch_rates().await?;
        let transactions = transaction_source
            .fetch_transactions(portfolio_id, None)
            .await?;
        Self::with_data(transactions, rates, assets)
    }

    // ── Ledger Management ───────────────────────────────────────────

    /// Accept a new transaction into the ledger.
    ///
    /// Rejects non-positive quantity/price, unknown assets, and any sell
    /// that would exceed the open quantity for its (asset, broker) pair.
    /// On rejection the ledger is untouched.
    pub fn add_transaction(&mut self, new: NewTransaction) -> Result<Uuid, CoreError> {
        self.validate_new(&new)?;

        let mut candidate = self.ledger.clone();
        let seq = candidate.allocate_seq();
        let transaction = new.into_transaction(seq);
        let id = transaction.id;
        candidate.insert_sorted(transaction);

        self.lot_matcher
            .validate_sells(&candidate.transactions, None)?;
        self.ledger = candidate;
        Ok(id)
    }

    /// Add multiple transactions at once. All are validated first; if any
    /// fails, none are added (all-or-nothing). Returns the assigned ids.
    pub fn add_transactions(
        &mut self,
        transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Uuid>, CoreError> {
        let mut candidate = self.ledger.clone();
        let mut ids = Vec::with_capacity(transactions.len());

        for new in transactions {
            self.validate_new(&new)?;
            let seq = candidate.allocate_seq();
            let transaction = new.into_transaction(seq);
            ids.push(transaction.id);
            candidate.insert_sorted(transaction);
        }

        self.lot_matcher
            .validate_sells(&candidate.transactions, None)?;
        self.ledger = candidate;
        Ok(ids)
    }

    /// Replace an existing transaction's fields, keeping its id and its
    /// original insertion sequence number (so same-date ordering is
    /// preserved). Validates the replacement ledger before committing; on
    /// failure the ledger is unchanged.
    pub fn update_transaction(&mut self, id: Uuid, new: NewTransaction) -> Result<(), CoreError> {
        self.validate_new(&new)?;

        let mut candidate = self.ledger.clone();
        let old = candidate
            .remove(id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;

        let mut replacement = new.into_transaction(old.seq);
        replacement.id = old.id;
        candidate.insert_sorted(replacement);

        self.lot_matcher
            .validate_sells(&candidate.transactions, None)?;
        self.ledger = candidate;
        Ok(())
    }

    /// Remove a transaction by id. Removing a buy that later sells depend
    /// on is rejected, leaving the ledger unchanged.
    pub fn remove_transaction(&mut self, id: Uuid) -> Result<(), CoreError> {
        let mut candidate = self.ledger.clone();
        candidate
            .remove(id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;

        self.lot_matcher
            .validate_sells(&candidate.transactions, None)?;
        self.ledger = candidate;
        Ok(())
    }

    // ── Ledger Queries ──────────────────────────────────────────────

    /// Get a single transaction by its id.
    #[must_use]
    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.ledger.get(id)
    }

    /// All transactions, newest trade date first.
    #[must_use]
    pub fn transactions(&self) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self.ledger.transactions.iter().collect();
        transactions.reverse(); // internal storage is oldest-first
        transactions
    }

    /// Transactions sorted by a specific order.
    #[must_use]
    pub fn transactions_sorted(&self, order: TransactionSortOrder) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self.ledger.transactions.iter().collect();
        match order {
            TransactionSortOrder::DateDesc => {
                transactions.sort_by(|a, b| (b.trade_date, b.seq).cmp(&(a.trade_date, a.seq)));
            }
            TransactionSortOrder::DateAsc => {
                transactions.sort_by(|a, b| (a.trade_date, a.seq).cmp(&(b.trade_date, b.seq)));
            }
            TransactionSortOrder::QuantityDesc => {
                transactions.sort_by(|a, b| {
                    b.quantity
                        .partial_cmp(&a.quantity)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            TransactionSortOrder::AssetAsc => {
                transactions.sort_by(|a, b| a.asset_id.cmp(&b.asset_id));
            }
        }
        transactions
    }

    /// Transactions for one asset, newest first.
    #[must_use]
    pub fn transactions_for_asset(&self, asset_id: &str) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self
            .ledger
            .transactions
            .iter()
            .filter(|t| t.asset_id == asset_id)
            .collect();
        transactions.reverse();
        transactions
    }

    /// Transactions settled at one broker, newest first.
    #[must_use]
    pub fn transactions_for_broker(&self, broker_id: &str) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self
            .ledger
            .transactions
            .iter()
            .filter(|t| t.broker_id == broker_id)
            .collect();
        transactions.reverse();
        transactions
    }

    /// Transactions within a trade-date range (inclusive), newest first.
    #[must_use]
    pub fn transactions_in_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self
            .ledger
            .transactions
            .iter()
            .filter(|t| t.trade_date >= from && t.trade_date <= to)
            .collect();
        transactions.reverse();
        transactions
    }

    /// Total number of transactions in the ledger.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.ledger.len()
    }

    /// All broker ids appearing in the ledger, sorted, deduplicated.
    #[must_use]
    pub fn broker_ids(&self) -> Vec<&str> {
        let mut brokers: Vec<&str> = self
            .ledger
            .transactions
            .iter()
            .map(|t| t.broker_id.as_str())
            .collect();
        brokers.sort_unstable();
        brokers.dedup();
        brokers
    }

    /// Trade date of the earliest transaction, if any.
    #[must_use]
    pub fn earliest_trade_date(&self) -> Option<NaiveDate> {
        self.ledger.transactions.first().map(|t| t.trade_date)
    }

    /// Trade date of the most recent transaction, if any.
    #[must_use]
    pub fn latest_trade_date(&self) -> Option<NaiveDate> {
        self.ledger.transactions.last().map(|t| t.trade_date)
    }

    // ── Reference Data ──────────────────────────────────────────────

    /// Record the exchange rate (local per foreign) for a date,
    /// overwriting any existing rate for that day.
    pub fn set_rate(&mut self, date: NaiveDate, rate: f64) -> Result<(), CoreError> {
        if rate <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Exchange rate for {date} must be positive, got {rate}"
            )));
        }
        self.rates.set_rate(date, rate);
        Ok(())
    }

    /// The recorded rate for a date, if any.
    #[must_use]
    pub fn rate_on(&self, date: NaiveDate) -> Option<f64> {
        self.rates.get_rate(date)
    }

    /// Number of dated rate points recorded.
    #[must_use]
    pub fn rate_count(&self) -> usize {
        self.rates.len()
    }

    /// Insert or replace an asset in the catalog.
    pub fn upsert_asset(&mut self, asset: AssetRef) -> Result<(), CoreError> {
        if asset.id.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Asset id must not be empty".into(),
            ));
        }
        if asset.latest_quote_local <= 0.0 || asset.latest_quote_foreign <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Quotes for {} must be positive",
                asset.id
            )));
        }
        self.assets.insert(asset.id.clone(), asset);
        Ok(())
    }

    /// Look up an asset in the catalog.
    #[must_use]
    pub fn asset(&self, asset_id: &str) -> Option<&AssetRef> {
        self.assets.get(asset_id)
    }

    /// All catalog asset ids, sorted.
    #[must_use]
    pub fn asset_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.assets.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Convert an amount between the two book currencies at a date's rate.
    pub fn convert(
        &self,
        amount: f64,
        from: Currency,
        to: Currency,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        self.currency_service
            .convert(&self.rates, amount, from, to, date)
    }

    // ── Holdings & Valuation ────────────────────────────────────────

    /// Current holdings across all brokers, recomputed from scratch.
    pub fn holdings(&self) -> Result<Vec<Holding>, CoreError> {
        Ok(self.metrics()?.holdings)
    }

    /// Current holdings scoped to one broker. Matching is re-run over that
    /// broker's transactions only, never filtered out of the global
    /// result, since a sell at one broker must not consume another
    /// broker's lots.
    pub fn holdings_for_broker(&self, broker_id: &str) -> Result<Vec<Holding>, CoreError> {
        Ok(self.metrics_for_broker(broker_id)?.holdings)
    }

    /// Full metrics snapshot: per-asset breakdown plus portfolio totals.
    pub fn metrics(&self) -> Result<PortfolioMetrics, CoreError> {
        self.metrics_service
            .compute(&self.ledger.transactions, &self.rates, &self.assets, None)
    }

    /// Full metrics snapshot scoped to one broker.
    pub fn metrics_for_broker(&self, broker_id: &str) -> Result<PortfolioMetrics, CoreError> {
        self.metrics_service.compute(
            &self.ledger.transactions,
            &self.rates,
            &self.assets,
            Some(broker_id),
        )
    }

    /// Surviving lots for one (asset, broker) pair, oldest first; the
    /// drill-down behind a holding row.
    pub fn open_lots(&self, asset_id: &str, broker_id: &str) -> Result<Vec<Lot>, CoreError> {
        let mut lots = self.lot_matcher.match_lots(
            &self.ledger.transactions,
            &self.assets,
            &self.rates,
            Some(broker_id),
        )?;
        lots.retain(|lot| lot.asset_id == asset_id);
        Ok(lots)
    }

    // ── Display Currency ────────────────────────────────────────────

    /// Set which currency the convenience totals report in. Purely a
    /// presentation toggle; nothing is recomputed.
    pub fn set_display_currency(&mut self, currency: Currency) {
        self.settings.display_currency = currency;
    }

    /// The currency the convenience totals report in.
    #[must_use]
    pub fn display_currency(&self) -> Currency {
        self.settings.display_currency
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Total market value in the display currency.
    pub fn total_market_value(&self) -> Result<f64, CoreError> {
        let metrics = self.metrics()?;
        Ok(metrics.totals.market_value(self.settings.display_currency))
    }

    /// Total cost basis in the display currency.
    pub fn total_cost_basis(&self) -> Result<f64, CoreError> {
        let metrics = self.metrics()?;
        Ok(metrics.totals.cost_basis(self.settings.display_currency))
    }

    /// Total unrealized profit/loss in the display currency.
    pub fn total_unrealized_pnl(&self) -> Result<f64, CoreError> {
        let metrics = self.metrics()?;
        Ok(metrics.totals.unrealized_pnl(self.settings.display_currency))
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Serialize the current metrics snapshot as pretty JSON for the
    /// export/display layer.
    pub fn to_json(&self) -> Result<String, CoreError> {
        let metrics = self.metrics()?;
        serde_json::to_string_pretty(&metrics)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize metrics: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Field-level checks applied before a transaction touches the ledger.
    fn validate_new(&self, new: &NewTransaction) -> Result<(), CoreError> {
        if new.quantity <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Transaction quantity must be positive, got {}",
                new.quantity
            )));
        }
        if new.unit_price <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Transaction unit price must be positive, got {}",
                new.unit_price
            )));
        }
        if new.broker_id.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Transaction broker id must not be empty".into(),
            ));
        }
        if !self.assets.contains_key(&new.asset_id) {
            return Err(CoreError::AssetNotFound(new.asset_id.clone()));
        }
        Ok(())
    }
}

impl Default for WealthTracker {
    fn default() -> Self {
        Self::new()
    }
}
