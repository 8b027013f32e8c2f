pub mod currency_service;
pub mod lot_service;
pub mod metrics_service;
pub mod valuation_service;
