use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::errors::CoreError;
use crate::models::asset::AssetRef;
use crate::models::lot::Lot;
use crate::models::metrics::{Holding, PortfolioTotals};

/// Turns surviving lots plus the latest market quotes into holdings
/// metrics.
///
/// Cost basis is recomputed from the lots on every call (Σ remaining ×
/// unit cost), never carried forward, and portfolio totals are summed
/// before pnl/percentage derivation so positions of different size are
/// weighted correctly.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate lots into per-asset holdings.
    ///
    /// Quantity and both cost bases are summed over each asset's lots;
    /// market value prices the summed quantity at the asset's latest
    /// quotes (per-unit, so the bond per-100 convention is applied by the
    /// quote accessors). Fully consumed positions are skipped. Returns
    /// holdings sorted by local market value, largest first.
    pub fn holdings(
        &self,
        lots: &[Lot],
        assets: &HashMap<String, AssetRef>,
    ) -> Result<Vec<Holding>, CoreError> {
        // (quantity, cost basis local, cost basis foreign) per asset
        let mut by_asset: BTreeMap<&str, (f64, f64, f64)> = BTreeMap::new();
        for lot in lots {
            let entry = by_asset.entry(lot.asset_id.as_str()).or_insert((0.0, 0.0, 0.0));
            entry.0 += lot.remaining_quantity;
            entry.1 += lot.cost_basis_local();
            entry.2 += lot.cost_basis_foreign();
        }

        let mut holdings = Vec::new();
        for (asset_id, (quantity, cost_basis_local, cost_basis_foreign)) in by_asset {
            if quantity <= f64::EPSILON {
                debug!("Skipping fully consumed position in {asset_id}");
                continue;
            }
            let asset = assets
                .get(asset_id)
                .ok_or_else(|| CoreError::AssetNotFound(asset_id.to_string()))?;

            let market_value_local = quantity * asset.unit_quote_local();
            let market_value_foreign = quantity * asset.unit_quote_foreign();
            let unrealized_pnl_local = market_value_local - cost_basis_local;
            let unrealized_pnl_foreign = market_value_foreign - cost_basis_foreign;

            holdings.push(Holding {
                asset_id: asset.id.clone(),
                symbol: asset.symbol.clone(),
                name: asset.name.clone(),
                instrument_type: asset.instrument_type,
                quantity,
                cost_basis_local,
                cost_basis_foreign,
                market_value_local,
                market_value_foreign,
                unrealized_pnl_local,
                unrealized_pnl_foreign,
                unrealized_pnl_pct: Self::pnl_pct(unrealized_pnl_local, cost_basis_local),
            });
        }

        // Largest position first
        holdings.sort_by(|a, b| {
            b.market_value_local
                .partial_cmp(&a.market_value_local)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(holdings)
    }

    /// Sum holdings into portfolio-level totals.
    ///
    /// Cost bases and market values are summed first; pnl and percentage
    /// are derived from the sums, never averaged per position.
    #[must_use]
    pub fn totals(&self, holdings: &[Holding]) -> PortfolioTotals {
        let mut totals = PortfolioTotals::default();
        for holding in holdings {
            totals.cost_basis_local += holding.cost_basis_local;
            totals.cost_basis_foreign += holding.cost_basis_foreign;
            totals.market_value_local += holding.market_value_local;
            totals.market_value_foreign += holding.market_value_foreign;
        }
        totals.unrealized_pnl_local = totals.market_value_local - totals.cost_basis_local;
        totals.unrealized_pnl_foreign = totals.market_value_foreign - totals.cost_basis_foreign;
        totals.unrealized_pnl_pct =
            Self::pnl_pct(totals.unrealized_pnl_local, totals.cost_basis_local);
        totals
    }

    /// Percentage return on the local-currency book figures, with the
    /// explicit zero-guard: a zero (or negative) cost basis yields 0,
    /// never NaN or infinity.
    fn pnl_pct(pnl: f64, cost_basis: f64) -> f64 {
        if cost_basis > 0.0 {
            (pnl / cost_basis) * 100.0
        } else {
            0.0
        }
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
