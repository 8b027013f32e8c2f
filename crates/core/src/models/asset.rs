use serde::{Deserialize, Serialize};

/// The kind of instrument an asset is.
/// Determines the quoting convention used in monetary arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentType {
    /// Listed shares (e.g., GGAL, AAPL)
    Equity,
    /// Sovereign/corporate bonds, quoted and traded per 100 of face value
    Bond,
    /// Exchange-traded funds
    Etf,
    /// Anything else (cedears, funds, unclassified)
    Other,
}

impl InstrumentType {
    /// Divisor applied to every quantity × price product for this
    /// instrument. Bonds are priced per 100 units of face value, so the
    /// nominal product is divided by 100 exactly once; everything else
    /// trades per unit.
    #[must_use]
    pub fn quote_divisor(&self) -> f64 {
        match self {
            InstrumentType::Bond => 100.0,
            _ => 1.0,
        }
    }
}

impl std::fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentType::Equity => write!(f, "Equity"),
            InstrumentType::Bond => write!(f, "Bond"),
            InstrumentType::Etf => write!(f, "ETF"),
            InstrumentType::Other => write!(f, "Other"),
        }
    }
}

/// Reference data for a tradeable asset, including the two latest market
/// quotes. Quotes follow the instrument's quoting convention (per 100 of
/// face value for bonds) and are supplied by the external price layer.
///
/// **Equality and hashing** are based solely on `id`, NOT on quotes or
/// display fields, so a quote refresh never changes map lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRef {
    /// Stable identifier assigned by the catalog layer
    pub id: String,

    /// Ticker symbol, uppercased (e.g., "GGAL", "AL30", "SPY")
    pub symbol: String,

    /// Human-readable name (e.g., "Grupo Financiero Galicia")
    pub name: String,

    /// Instrument kind; drives the per-100 bond convention
    pub instrument_type: InstrumentType,

    /// Latest quote in the local currency (ARS)
    pub latest_quote_local: f64,

    /// Latest quote in the foreign currency (USD)
    pub latest_quote_foreign: f64,
}

impl PartialEq for AssetRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AssetRef {}

impl std::hash::Hash for AssetRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl AssetRef {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        instrument_type: InstrumentType,
        latest_quote_local: f64,
        latest_quote_foreign: f64,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            instrument_type,
            latest_quote_local,
            latest_quote_foreign,
        }
    }

    /// Convenience constructors for common instrument types
    pub fn equity(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        quote_local: f64,
        quote_foreign: f64,
    ) -> Self {
        Self::new(id, symbol, name, InstrumentType::Equity, quote_local, quote_foreign)
    }

    pub fn bond(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        quote_local: f64,
        quote_foreign: f64,
    ) -> Self {
        Self::new(id, symbol, name, InstrumentType::Bond, quote_local, quote_foreign)
    }

    pub fn etf(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        quote_local: f64,
        quote_foreign: f64,
    ) -> Self {
        Self::new(id, symbol, name, InstrumentType::Etf, quote_local, quote_foreign)
    }

    /// Latest per-unit price in local currency, with the bond per-100
    /// convention already applied.
    #[must_use]
    pub fn unit_quote_local(&self) -> f64 {
        self.latest_quote_local / self.instrument_type.quote_divisor()
    }

    /// Latest per-unit price in foreign currency, with the bond per-100
    /// convention already applied.
    #[must_use]
    pub fn unit_quote_foreign(&self) -> f64 {
        self.latest_quote_foreign / self.instrument_type.quote_divisor()
    }
}
