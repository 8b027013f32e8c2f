use serde::{Deserialize, Serialize};

use super::asset::InstrumentType;
use super::transaction::Currency;

/// Aggregate position in one asset, derived from its surviving lots.
///
/// All monetary figures are carried in both currencies side by side; the
/// `Currency`-keyed accessors pick a side without recomputing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Asset identity (echoed from the catalog for direct rendering)
    pub asset_id: String,
    pub symbol: String,
    pub name: String,
    pub instrument_type: InstrumentType,

    /// Units held (sum of surviving lot quantities)
    pub quantity: f64,

    /// Purchase cost of the held quantity
    pub cost_basis_local: f64,
    pub cost_basis_foreign: f64,

    /// Held quantity priced at the latest quotes
    pub market_value_local: f64,
    pub market_value_foreign: f64,

    /// market value − cost basis
    pub unrealized_pnl_local: f64,
    pub unrealized_pnl_foreign: f64,

    /// (pnl_local / cost_basis_local) × 100, zero when cost basis is zero
    pub unrealized_pnl_pct: f64,
}

impl Holding {
    #[must_use]
    pub fn cost_basis(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Ars => self.cost_basis_local,
            Currency::Usd => self.cost_basis_foreign,
        }
    }

    #[must_use]
    pub fn market_value(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Ars => self.market_value_local,
            Currency::Usd => self.market_value_foreign,
        }
    }

    #[must_use]
    pub fn unrealized_pnl(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Ars => self.unrealized_pnl_local,
            Currency::Usd => self.unrealized_pnl_foreign,
        }
    }
}

/// Portfolio- or broker-level totals. Cost bases and market values are
/// summed across constituent holdings first; pnl and pct are derived from
/// the sums, never averaged across positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub cost_basis_local: f64,
    pub cost_basis_foreign: f64,
    pub market_value_local: f64,
    pub market_value_foreign: f64,
    pub unrealized_pnl_local: f64,
    pub unrealized_pnl_foreign: f64,
    pub unrealized_pnl_pct: f64,
}

impl PortfolioTotals {
    #[must_use]
    pub fn cost_basis(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Ars => self.cost_basis_local,
            Currency::Usd => self.cost_basis_foreign,
        }
    }

    #[must_use]
    pub fn market_value(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Ars => self.market_value_local,
            Currency::Usd => self.market_value_foreign,
        }
    }

    #[must_use]
    pub fn unrealized_pnl(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Ars => self.unrealized_pnl_local,
            Currency::Usd => self.unrealized_pnl_foreign,
        }
    }
}

/// Full valuation snapshot produced by the metrics pipeline: per-asset
/// breakdown plus portfolio-level totals, suitable for direct rendering
/// or export by the embedding layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Broker this snapshot was scoped to, if any
    pub broker_id: Option<String>,

    /// Number of transactions that fed the computation
    pub transaction_count: usize,

    /// Per-asset breakdown, largest local market value first.
    /// Fully sold positions (quantity == 0) are excluded.
    pub holdings: Vec<Holding>,

    /// Summed totals across `holdings`
    pub totals: PortfolioTotals,
}
