use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::asset::AssetRef;
use crate::models::metrics::PortfolioMetrics;
use crate::models::rates::RateTable;
use crate::models::transaction::Transaction;

use super::lot_service::LotMatcher;
use super::valuation_service::ValuationService;

/// Orchestrates the full valuation pipeline over an in-memory snapshot:
/// transactions → partition → sort → FIFO lots → holdings → totals.
///
/// `compute` is a pure function of its inputs with no shared mutable
/// state, so it is safe (and cheap, at personal-portfolio volumes) to
/// re-run from scratch on every data change. Broker scoping re-runs the
/// matcher on that broker's transaction subset; FIFO consumption is not
/// separable after the fact, and filtering an already-aggregated global
/// result would attribute sells to the wrong lots.
pub struct MetricsService {
    lot_matcher: LotMatcher,
    valuation_service: ValuationService,
}

impl MetricsService {
    pub fn new() -> Self {
        Self {
            lot_matcher: LotMatcher::new(),
            valuation_service: ValuationService::new(),
        }
    }

    /// Compute the full metrics snapshot, optionally scoped to one broker.
    pub fn compute(
        &self,
        transactions: &[Transaction],
        rates: &RateTable,
        assets: &HashMap<String, AssetRef>,
        broker: Option<&str>,
    ) -> Result<PortfolioMetrics, CoreError> {
        let lots = self
            .lot_matcher
            .match_lots(transactions, assets, rates, broker)?;
        let holdings = self.valuation_service.holdings(&lots, assets)?;
        let totals = self.valuation_service.totals(&holdings);

        let transaction_count = match broker {
            Some(b) => transactions.iter().filter(|t| t.broker_id == b).count(),
            None => transactions.len(),
        };

        Ok(PortfolioMetrics {
            broker_id: broker.map(String::from),
            transaction_count,
            holdings,
            totals,
        })
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}
