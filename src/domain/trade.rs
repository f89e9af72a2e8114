//! TradeRecord: one validated CSV fill.

use crate::domain::{Action, Coin, Decimal, Side, TimeMs};
use serde::{Deserialize, Serialize};

/// A single trade fill as exported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    /// 1-based data row index within the source CSV (header excluded).
    pub row: u64,
    /// Timestamp text exactly as provided in the CSV.
    pub time_raw: String,
    /// Parsed timestamp, UTC.
    pub timestamp: TimeMs,
    pub coin: Coin,
    /// Raw direction text (e.g. "Open Long").
    pub direction: String,
    pub side: Side,
    pub action: Action,
    /// Execution price.
    pub price: Decimal,
    /// Quantity, never negative.
    pub size: Decimal,
    /// size × price in quote currency, as reported.
    pub notional: Decimal,
    pub fee: Decimal,
    /// Realized PnL reported by the exchange for this fill.
    pub closed_pnl: Decimal,
}

impl TradeRecord {
    pub fn is_open(&self) -> bool {
        self.action == Action::Open
    }

    pub fn is_close(&self) -> bool {
        self.action == Action::Close
    }

    /// Notional counted towards traded volume (close fills only).
    pub fn close_volume(&self) -> Decimal {
        if self.is_close() {
            self.notional
        } else {
            Decimal::zero()
        }
    }
}
