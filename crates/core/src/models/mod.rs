pub mod asset;
pub mod ledger;
pub mod lot;
pub mod metrics;
pub mod rates;
pub mod settings;
pub mod transaction;
