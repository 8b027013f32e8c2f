use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single exchange-rate point: local units per 1 foreign unit on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub date: NaiveDate,
    pub rate: f64,
}

/// Date-keyed table of exchange rates for the ARS/USD pair.
///
/// One rate per calendar date; dates with no entry are "unknown" and
/// conversions against them fail with `RateUnavailable` rather than
/// degrading to zero. Entries are kept sorted by date so lookups and
/// inserts are O(log n) binary searches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTable {
    /// Rate points sorted ascending by date
    entries: Vec<ExchangeRate>,
}

impl RateTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from unordered points. Later duplicates of a date
    /// overwrite earlier ones.
    #[must_use]
    pub fn from_rates(rates: Vec<ExchangeRate>) -> Self {
        let mut table = Self::new();
        for point in rates {
            table.set_rate(point.date, point.rate);
        }
        table
    }

    /// Get the rate whose date exactly equals `date`. Returns None if no
    /// rate is recorded for that day.
    #[must_use]
    pub fn get_rate(&self, date: NaiveDate) -> Option<f64> {
        self.entries
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.entries[idx].rate)
    }

    /// Insert or overwrite the rate for a date, keeping the table sorted.
    pub fn set_rate(&mut self, date: NaiveDate, rate: f64) {
        match self.entries.binary_search_by_key(&date, |p| p.date) {
            Ok(idx) => {
                self.entries[idx].rate = rate;
            }
            Err(idx) => {
                self.entries.insert(idx, ExchangeRate { date, rate });
            }
        }
    }

    /// Insert multiple rate points at once (e.g., a fetched history).
    pub fn set_rates(&mut self, points: &[ExchangeRate]) {
        for point in points {
            self.set_rate(point.date, point.rate);
        }
    }

    /// All rate points within `[from, to]`, sorted ascending by date.
    #[must_use]
    pub fn rate_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<ExchangeRate> {
        let start = self
            .entries
            .binary_search_by_key(&from, |p| p.date)
            .unwrap_or_else(|pos| pos);
        let end = self
            .entries
            .binary_search_by_key(&to, |p| p.date)
            .map(|pos| pos + 1) // include the exact match
            .unwrap_or_else(|pos| pos);
        self.entries[start..end].to_vec()
    }

    /// Number of dated rate points in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Date of the most recent rate point, if any.
    #[must_use]
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(|p| p.date)
    }

    /// Clear all rate points.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
