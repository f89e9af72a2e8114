//! Portfolio-level statistics derived from trade records and matched positions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Coin, Decimal, PositionResult, TimeMs, TradeRecord};
use crate::engine::MatchOutcome;

/// Number of positions shown in a "recent positions" view.
pub const DEFAULT_RECENT_POSITIONS: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of record-level reported PnL over every fill.
    pub net_profit: Decimal,
    pub total_closed_pnl: Decimal,
    pub total_fees: Decimal,
    /// Notional of close fills only.
    pub total_volume: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeframe {
    pub start: TimeMs,
    pub end: TimeMs,
    pub trade_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinLoss {
    pub winning: usize,
    pub losing: usize,
    pub breakeven: usize,
    /// Percentage of winning positions, 0..=100.
    pub win_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinBreakdown {
    pub coin: Coin,
    pub net_profit: Decimal,
    pub volume: Decimal,
    pub trades: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlPoint {
    pub timestamp: TimeMs,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extremes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<PositionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst: Option<PositionResult>,
}

/// Everything a dashboard needs about one uploaded trade history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    /// Records in chronological order.
    pub trades: Vec<TradeRecord>,
    pub positions: Vec<PositionResult>,
    pub totals: Totals,
    pub timeframe: Timeframe,
    pub win_loss: WinLoss,
    /// Sorted by net profit, descending.
    pub per_coin: Vec<CoinBreakdown>,
    /// One point per fill, running sum of reported PnL.
    pub cumulative_pnl: Vec<PnlPoint>,
    pub extremes: Extremes,
    pub open_positions_remaining: usize,
}

impl AggregateMetrics {
    /// Zero-valued metrics for an empty history, anchored at `now`.
    pub fn empty(now: TimeMs) -> Self {
        Self {
            trades: Vec::new(),
            positions: Vec::new(),
            totals: Totals::default(),
            timeframe: Timeframe {
                start: now,
                end: now,
                trade_count: 0,
            },
            win_loss: WinLoss::default(),
            per_coin: Vec::new(),
            cumulative_pnl: Vec::new(),
            extremes: Extremes::default(),
            open_positions_remaining: 0,
        }
    }

    /// Latest `limit` positions by close time, newest first.
    pub fn recent_positions(&self, limit: usize) -> Vec<PositionResult> {
        let mut positions = self.positions.clone();
        positions.sort_by(|a, b| b.closed_at.cmp(&a.closed_at));
        positions.truncate(limit);
        positions
    }
}

/// Aggregate chronologically sorted records and their match outcome.
///
/// An empty record set yields zero-valued metrics anchored at the current time.
pub fn aggregate(records: &[TradeRecord], outcome: MatchOutcome) -> AggregateMetrics {
    aggregate_at(records, outcome, TimeMs::now())
}

/// Same as [`aggregate`], with the empty-history timestamp supplied by the caller.
pub fn aggregate_at(records: &[TradeRecord], outcome: MatchOutcome, now: TimeMs) -> AggregateMetrics {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return AggregateMetrics::empty(now);
    };

    let mut totals = Totals::default();
    let mut cumulative_pnl = Vec::with_capacity(records.len());
    let mut per_coin: Vec<CoinBreakdown> = Vec::new();
    let mut coin_index: HashMap<&Coin, usize> = HashMap::new();

    let mut running = Decimal::zero();
    for record in records {
        totals.total_closed_pnl += record.closed_pnl;
        totals.total_fees += record.fee;
        totals.total_volume += record.close_volume();

        running += record.closed_pnl;
        cumulative_pnl.push(PnlPoint {
            timestamp: record.timestamp,
            value: running,
        });

        let idx = *coin_index.entry(&record.coin).or_insert_with(|| {
            per_coin.push(CoinBreakdown {
                coin: record.coin.clone(),
                net_profit: Decimal::zero(),
                volume: Decimal::zero(),
                trades: 0,
            });
            per_coin.len() - 1
        });
        let entry = &mut per_coin[idx];
        entry.net_profit += record.closed_pnl;
        entry.volume += record.close_volume();
        entry.trades += 1;
    }
    totals.net_profit = totals.total_closed_pnl;

    // Stable sort keeps first-seen order among equal profits.
    per_coin.sort_by(|a, b| b.net_profit.cmp(&a.net_profit));

    let win_loss = win_loss(&outcome.positions);
    let extremes = extremes(&outcome.positions);

    AggregateMetrics {
        trades: records.to_vec(),
        positions: outcome.positions,
        totals,
        timeframe: Timeframe {
            start: first.timestamp,
            end: last.timestamp,
            trade_count: records.len(),
        },
        win_loss,
        per_coin,
        cumulative_pnl,
        extremes,
        open_positions_remaining: outcome.open_lots_remaining,
    }
}

fn win_loss(positions: &[PositionResult]) -> WinLoss {
    let winning = positions.iter().filter(|p| p.is_win()).count();
    let losing = positions.iter().filter(|p| p.is_loss()).count();
    let win_rate = if positions.is_empty() {
        Decimal::zero()
    } else {
        Decimal::from_i64(winning as i64) / Decimal::from_i64(positions.len() as i64)
            * Decimal::hundred()
    };

    WinLoss {
        winning,
        losing,
        breakeven: positions.len() - winning - losing,
        win_rate,
    }
}

/// Best and worst by net PnL; the earliest position wins ties.
fn extremes(positions: &[PositionResult]) -> Extremes {
    let mut best: Option<&PositionResult> = None;
    let mut worst: Option<&PositionResult> = None;

    for position in positions {
        if best.map_or(true, |b| position.net_pnl > b.net_pnl) {
            best = Some(position);
        }
        if worst.map_or(true, |w| position.net_pnl < w.net_pnl) {
            worst = Some(position);
        }
    }

    Extremes {
        best: best.cloned(),
        worst: worst.cloned(),
    }
}
