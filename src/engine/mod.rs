//! Pure computation engine: FIFO position matching, aggregation and tax estimation.
//!
//! Every function here is synchronous and infallible on validated input.

use crate::domain::{sort_records_chronological, TimeMs, TradeRecord};

pub mod aggregator;
pub mod matcher;
pub mod tax;

pub use aggregator::{
    aggregate, aggregate_at, AggregateMetrics, CoinBreakdown, Extremes, PnlPoint, Timeframe,
    Totals, WinLoss, DEFAULT_RECENT_POSITIONS,
};
pub use matcher::{match_positions, MatchOutcome, PositionMatcher};
pub use tax::{calculate_tax, TaxBreakdown, TaxSettings, TaxSettingsError};

/// Sort, match and aggregate a parsed record set.
pub fn analyze(records: Vec<TradeRecord>) -> AggregateMetrics {
    analyze_at(records, TimeMs::now())
}

/// [`analyze`] with the empty-history timestamp supplied by the caller.
pub fn analyze_at(mut records: Vec<TradeRecord>, now: TimeMs) -> AggregateMetrics {
    sort_records_chronological(&mut records);
    let outcome = match_positions(&records);
    aggregate_at(&records, outcome, now)
}
