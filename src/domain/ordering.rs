//! Stable chronological ordering for deterministic processing.

use crate::domain::TradeRecord;

/// Sort records by timestamp, ascending.
///
/// The sort is stable: records sharing a timestamp keep their CSV row order.
pub fn sort_records_chronological(records: &mut [TradeRecord]) {
    records.sort_by_key(|r| r.timestamp);
}

/// Returns true if records are already in ascending timestamp order.
pub fn is_chronological(records: &[TradeRecord]) -> bool {
    records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}
