use serde::{Deserialize, Serialize};

use super::transaction::Currency;

/// User-configurable presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Which side of the dual-currency figures the convenience getters
    /// surface. Toggling it never recomputes anything; both currencies
    /// are always carried in the underlying metrics.
    pub display_currency: Currency,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_currency: Currency::Ars,
        }
    }
}
