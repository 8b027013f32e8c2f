use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A surviving (partially or fully unconsumed) purchase lot with its own
/// dual-currency unit cost basis.
///
/// Lots are derived, never persisted: each Buy creates one, later Sells
/// shrink `remaining_quantity` oldest-first, and a lot never grows after
/// creation. Cost basis is always recomputed from `remaining_quantity ×
/// unit_cost`, not carried as a separately mutated total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    /// Asset this lot holds
    pub asset_id: String,

    /// Broker the originating buy settled at
    pub broker_id: String,

    /// The Buy transaction that created this lot
    pub origin_transaction_id: Uuid,

    /// Trade date of the originating buy (lot age for FIFO)
    pub open_date: NaiveDate,

    /// Quantity originally bought
    pub original_quantity: f64,

    /// Quantity not yet consumed by sells (0 ≤ remaining ≤ original)
    pub remaining_quantity: f64,

    /// Purchase cost per unit in local currency (ARS)
    pub unit_cost_local: f64,

    /// Purchase cost per unit in foreign currency (USD)
    pub unit_cost_foreign: f64,
}

impl Lot {
    /// Cost basis of the still-held quantity in local currency.
    #[must_use]
    pub fn cost_basis_local(&self) -> f64 {
        self.remaining_quantity * self.unit_cost_local
    }

    /// Cost basis of the still-held quantity in foreign currency.
    #[must_use]
    pub fn cost_basis_foreign(&self) -> f64 {
        self.remaining_quantity * self.unit_cost_foreign
    }

    /// Whether any quantity survives in this lot (epsilon-guarded so
    /// float dust from repeated partial sells reads as consumed).
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.remaining_quantity > f64::EPSILON
    }
}
