use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::asset::AssetRef;
use crate::models::lot::Lot;
use crate::models::rates::RateTable;
use crate::models::transaction::{Currency, Operation, Transaction};

use super::currency_service::CurrencyService;

/// Reconstructs, for each `(asset, broker)` pair, the open cost-basis lots
/// implied by the transaction history, using First-In-First-Out matching.
///
/// Each partition's lot queue is a small state machine: a Buy appends a
/// lot, a Sell drains from the head, and the queue persists for as long as
/// transactions exist. Matching is partition-sensitive: a sell recorded
/// against broker A only ever consumes broker A's lots, which is why
/// broker-scoped views re-run the matcher on that broker's subset instead
/// of filtering an already-aggregated result.
pub struct LotMatcher {
    currency_service: CurrencyService,
}

impl LotMatcher {
    pub fn new() -> Self {
        Self {
            currency_service: CurrencyService::new(),
        }
    }

    /// Match the full transaction set (optionally restricted to one
    /// broker) into surviving lots.
    ///
    /// Transactions are partitioned by `(asset_id, broker_id)`, sorted
    /// ascending by `(trade_date, seq)` within each partition, and folded
    /// into FIFO lot queues. Fails with `InsufficientLots` if any sell
    /// exceeds the quantity bought before it, `RateUnavailable` if a buy
    /// date has no exchange rate, and `AssetNotFound` for transactions
    /// referencing an asset missing from the catalog.
    pub fn match_lots(
        &self,
        transactions: &[Transaction],
        assets: &HashMap<String, AssetRef>,
        rates: &RateTable,
        broker: Option<&str>,
    ) -> Result<Vec<Lot>, CoreError> {
        let mut lots = Vec::new();

        for ((asset_id, broker_id), partition) in Self::partition(transactions, broker) {
            debug!(
                "Matching {} transactions for ({asset_id}, {broker_id})",
                partition.len()
            );
            let asset = assets
                .get(asset_id)
                .ok_or_else(|| CoreError::AssetNotFound(asset_id.to_string()))?;

            let mut queue: Vec<Lot> = Vec::new();
            for tx in partition {
                match tx.operation {
                    Operation::Buy => queue.push(self.open_lot(tx, asset, rates)?),
                    Operation::Sell => Self::consume(&mut queue, tx)?,
                }
            }

            lots.extend(queue.into_iter().filter(Lot::is_open));
        }

        Ok(lots)
    }

    /// Quantity-only replay of the FIFO state machines: verifies that no
    /// sell in `transactions` (optionally one broker's subset) exceeds the
    /// open quantity bought before it.
    ///
    /// Needs neither rates nor the asset catalog, so ledger mutations can
    /// be validated even while reference data is incomplete.
    pub fn validate_sells(
        &self,
        transactions: &[Transaction],
        broker: Option<&str>,
    ) -> Result<(), CoreError> {
        for ((asset_id, broker_id), partition) in Self::partition(transactions, broker) {
            let mut open = 0.0_f64;
            for tx in partition {
                match tx.operation {
                    Operation::Buy => open += tx.quantity,
                    Operation::Sell => {
                        if tx.quantity > open + f64::EPSILON {
                            warn!(
                                "Rejecting sell of {} {asset_id} at {broker_id} on {}: only {open} held",
                                tx.quantity, tx.trade_date
                            );
                            return Err(CoreError::InsufficientLots {
                                asset_id: asset_id.to_string(),
                                broker_id: broker_id.to_string(),
                                date: tx.trade_date,
                                requested: tx.quantity,
                                available: open,
                            });
                        }
                        open -= tx.quantity;
                    }
                }
            }
        }
        Ok(())
    }

    /// Partition by `(asset_id, broker_id)` and sort each partition
    /// ascending by `(trade_date, seq)`. A `BTreeMap` keeps the partition
    /// order itself deterministic.
    fn partition<'a>(
        transactions: &'a [Transaction],
        broker: Option<&str>,
    ) -> BTreeMap<(&'a str, &'a str), Vec<&'a Transaction>> {
        let mut partitions: BTreeMap<(&str, &str), Vec<&Transaction>> = BTreeMap::new();
        for tx in transactions {
            if broker.is_some_and(|b| tx.broker_id != b) {
                continue;
            }
            partitions
                .entry((tx.asset_id.as_str(), tx.broker_id.as_str()))
                .or_default()
                .push(tx);
        }
        for partition in partitions.values_mut() {
            partition.sort_by_key(|t| (t.trade_date, t.seq));
        }
        partitions
    }

    /// Open a new lot from a Buy: the quantity × price product (divided by
    /// 100 first for bonds) is converted to both currencies at the trade
    /// date's rate, then divided back by quantity for the per-unit costs.
    fn open_lot(
        &self,
        tx: &Transaction,
        asset: &AssetRef,
        rates: &RateTable,
    ) -> Result<Lot, CoreError> {
        let gross = tx.quantity * tx.unit_price / asset.instrument_type.quote_divisor();
        let gross_local =
            self.currency_service
                .convert(rates, gross, tx.trade_currency, Currency::Ars, tx.trade_date)?;
        let gross_foreign =
            self.currency_service
                .convert(rates, gross, tx.trade_currency, Currency::Usd, tx.trade_date)?;

        Ok(Lot {
            asset_id: tx.asset_id.clone(),
            broker_id: tx.broker_id.clone(),
            origin_transaction_id: tx.id,
            open_date: tx.trade_date,
            original_quantity: tx.quantity,
            remaining_quantity: tx.quantity,
            unit_cost_local: gross_local / tx.quantity,
            unit_cost_foreign: gross_foreign / tx.quantity,
        })
    }

    /// Drain a Sell from the lot queue, oldest lot first. An older lot
    /// always reaches zero before a newer lot is touched.
    fn consume(queue: &mut [Lot], tx: &Transaction) -> Result<(), CoreError> {
        let mut pending = tx.quantity;

        for lot in queue.iter_mut() {
            if pending <= f64::EPSILON {
                break;
            }
            if !lot.is_open() {
                continue;
            }
            let taken = pending.min(lot.remaining_quantity);
            lot.remaining_quantity -= taken;
            pending -= taken;
            debug!(
                "Sell {} consumed {taken} from lot {} ({} remaining)",
                tx.id, lot.origin_transaction_id, lot.remaining_quantity
            );
        }

        if pending > f64::EPSILON {
            let available = tx.quantity - pending;
            warn!(
                "Sell {} of {} {} oversells: {pending} unmatched",
                tx.id, tx.quantity, tx.asset_id
            );
            return Err(CoreError::InsufficientLots {
                asset_id: tx.asset_id.clone(),
                broker_id: tx.broker_id.clone(),
                date: tx.trade_date,
                requested: tx.quantity,
                available,
            });
        }

        Ok(())
    }
}

impl Default for LotMatcher {
    fn default() -> Self {
        Self::new()
    }
}
