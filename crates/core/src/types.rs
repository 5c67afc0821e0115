/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts are integral minor units of the configured currency
/// (pence for GBP, cents for USD).
pub type MinorUnits = i64;
