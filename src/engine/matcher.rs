use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, warn};

use crate::domain::ordering::is_chronological;
use crate::domain::{Coin, Decimal, PositionResult, Side, TradeRecord};

/// Quantities at or below this are treated as exhausted.
pub fn lot_epsilon() -> Decimal {
    Decimal::new(rust_decimal::Decimal::new(1, 9))
}

/// Quantity still available from one opening fill.
#[derive(Debug)]
struct OpenLot<'a> {
    trade: &'a TradeRecord,
    remaining: Decimal,
}

/// Output of one matching pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchOutcome {
    /// Closed positions in emission order (chronological by close fill).
    pub positions: Vec<PositionResult>,
    /// Lots left with quantity at the end of the stream.
    pub open_lots_remaining: usize,
}

/// FIFO lot matcher keyed by (coin, side).
///
/// Opposite sides of the same coin are tracked independently; a short close
/// never consumes a long lot.
#[derive(Debug, Default)]
pub struct PositionMatcher<'a> {
    queues: BTreeMap<(Coin, Side), VecDeque<OpenLot<'a>>>,
    positions: Vec<PositionResult>,
}

impl<'a> PositionMatcher<'a> {
    pub fn new() -> Self {
        Self {
            queues: BTreeMap::new(),
            positions: Vec::new(),
        }
    }

    /// Process a single record. Callers must feed records in ascending
    /// timestamp order.
    pub fn process(&mut self, trade: &'a TradeRecord) {
        if trade.is_open() {
            self.handle_open(trade);
        } else {
            self.handle_close(trade);
        }
    }

    fn handle_open(&mut self, trade: &'a TradeRecord) {
        if trade.size <= lot_epsilon() {
            debug!(row = trade.row, coin = %trade.coin, "ignoring zero-size open fill");
            return;
        }
        self.queues
            .entry((trade.coin.clone(), trade.side))
            .or_default()
            .push_back(OpenLot {
                trade,
                remaining: trade.size,
            });
    }

    fn handle_close(&mut self, trade: &'a TradeRecord) {
        let epsilon = lot_epsilon();
        let mut outstanding = trade.size;
        let queue = self
            .queues
            .entry((trade.coin.clone(), trade.side))
            .or_default();

        while outstanding.is_positive() {
            let Some(lot) = queue.front_mut() else {
                self.positions.push(unmatched_close(trade, outstanding));
                break;
            };

            let matched = lot.remaining.min(outstanding);
            let open = lot.trade;

            self.positions.push(PositionResult {
                coin: trade.coin.clone(),
                side: trade.side,
                opened_at: open.timestamp,
                closed_at: trade.timestamp,
                size: matched,
                entry_notional: prorate(open.notional, matched, open.size),
                exit_notional: prorate(trade.notional, matched, trade.size),
                net_pnl: prorate(open.closed_pnl, matched, open.size)
                    + prorate(trade.closed_pnl, matched, trade.size),
                total_fees: prorate(open.fee, matched, open.size)
                    + prorate(trade.fee, matched, trade.size),
            });

            lot.remaining -= matched;
            outstanding -= matched;
            if lot.remaining <= epsilon {
                queue.pop_front();
            }
        }
    }

    /// Number of lots still holding quantity.
    pub fn open_lots_remaining(&self) -> usize {
        let epsilon = lot_epsilon();
        self.queues
            .values()
            .flat_map(|q| q.iter())
            .filter(|lot| lot.remaining > epsilon)
            .count()
    }

    pub fn into_outcome(self) -> MatchOutcome {
        let open_lots_remaining = self.open_lots_remaining();
        MatchOutcome {
            positions: self.positions,
            open_lots_remaining,
        }
    }
}

/// Close quantity with no observed opening lot: the entry is assumed to
/// predate the history window, so the position opens and closes at the close
/// fill's own timestamp with zero entry notional.
fn unmatched_close(trade: &TradeRecord, outstanding: Decimal) -> PositionResult {
    warn!(
        row = trade.row,
        coin = %trade.coin,
        side = %trade.side,
        size = %outstanding,
        "close fill has no matching open lot"
    );
    PositionResult {
        coin: trade.coin.clone(),
        side: trade.side,
        opened_at: trade.timestamp,
        closed_at: trade.timestamp,
        size: outstanding,
        entry_notional: Decimal::zero(),
        exit_notional: prorate(trade.notional, outstanding, trade.size),
        net_pnl: prorate(trade.closed_pnl, outstanding, trade.size),
        total_fees: prorate(trade.fee, outstanding, trade.size),
    }
}

/// Share of `amount` attributable to `part` out of `whole`. `whole` must be
/// positive. Multiplies before dividing to keep exact results exact, and
/// divides first when the intermediate product would not fit.
fn prorate(amount: Decimal, part: Decimal, whole: Decimal) -> Decimal {
    if part == whole {
        return amount;
    }
    match amount.checked_mul(part) {
        Some(scaled) => scaled / whole,
        None => amount * (part / whole),
    }
}

/// Match a chronologically sorted record sequence into closed positions.
pub fn match_positions(records: &[TradeRecord]) -> MatchOutcome {
    debug_assert!(is_chronological(records), "records must be sorted by timestamp");

    let mut matcher = PositionMatcher::new();
    for record in records {
        matcher.process(record);
    }
    let outcome = matcher.into_outcome();
    debug!(
        records = records.len(),
        positions = outcome.positions.len(),
        open_lots = outcome.open_lots_remaining,
        "matched positions"
    );
    outcome
}
