use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::rates::RateTable;
use crate::models::transaction::Currency;

/// Converts monetary amounts between the two book currencies using the
/// date-keyed exchange-rate table.
///
/// Rates are quoted as local units per 1 foreign unit, so ARS → USD
/// divides and USD → ARS multiplies. The table is an explicit parameter
/// rather than ambient state, which keeps conversions deterministic and
/// unit-testable per call.
pub struct CurrencyService;

impl CurrencyService {
    pub fn new() -> Self {
        Self
    }

    /// Convert `amount` from one currency to the other at `date`'s rate.
    ///
    /// Same-currency conversions return the amount unchanged without a
    /// lookup. A date with no recorded rate (or a recorded rate of zero,
    /// which would poison the divide) fails with `RateUnavailable` instead
    /// of degrading to a zero-valued conversion.
    pub fn convert(
        &self,
        rates: &RateTable,
        amount: f64,
        from: Currency,
        to: Currency,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        if from == to {
            return Ok(amount);
        }

        let rate = rates
            .get_rate(date)
            .filter(|r| *r > 0.0)
            .ok_or(CoreError::RateUnavailable { date })?;

        // from != to here, so the direction is determined by `to` alone
        if to.is_local() {
            Ok(amount * rate)
        } else {
            Ok(amount / rate)
        }
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}
