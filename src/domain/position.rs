//! PositionResult: one matched open/close overlap.

use crate::domain::primitives::MS_PER_DAY;
use crate::domain::{Coin, Decimal, Side, TimeMs};
use serde::{Deserialize, Serialize};

/// A closed slice of a position produced by FIFO matching.
///
/// One close fill may produce several of these (one per drained lot), and one
/// open lot may be split across several closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResult {
    pub coin: Coin,
    pub side: Side,
    pub opened_at: TimeMs,
    pub closed_at: TimeMs,
    /// Matched quantity, always > 0.
    pub size: Decimal,
    /// Entry notional prorated to `size` (zero when no opening lot was observed).
    pub entry_notional: Decimal,
    /// Exit notional prorated to `size`.
    pub exit_notional: Decimal,
    /// Reported PnL of both legs, prorated.
    pub net_pnl: Decimal,
    /// Fees of both legs, prorated.
    pub total_fees: Decimal,
}

impl PositionResult {
    /// Holding period in (fractional) days.
    ///
    /// Returns `None` when the pair does not describe a valid duration, i.e.
    /// the close precedes the open.
    pub fn holding_period_days(&self) -> Option<Decimal> {
        let elapsed_ms = self.closed_at.as_i64().checked_sub(self.opened_at.as_i64())?;
        if elapsed_ms < 0 {
            return None;
        }
        Some(Decimal::from_i64(elapsed_ms) / Decimal::from_i64(MS_PER_DAY))
    }

    pub fn is_win(&self) -> bool {
        self.net_pnl.is_positive()
    }

    pub fn is_loss(&self) -> bool {
        self.net_pnl.is_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(opened_at: i64, closed_at: i64, pnl: i64) -> PositionResult {
        PositionResult {
            coin: Coin::new("BTC".to_string()),
            side: Side::Long,
            opened_at: TimeMs::new(opened_at),
            closed_at: TimeMs::new(closed_at),
            size: Decimal::from_i64(1),
            entry_notional: Decimal::from_i64(100),
            exit_notional: Decimal::from_i64(100),
            net_pnl: Decimal::from_i64(pnl),
            total_fees: Decimal::zero(),
        }
    }

    #[test]
    fn test_holding_period_fractional_days() {
        let p = position(0, MS_PER_DAY + MS_PER_DAY / 2, 0);
        assert_eq!(
            p.holding_period_days(),
            Some(Decimal::from_str_canonical("1.5").unwrap())
        );
    }

    #[test]
    fn test_holding_period_zero_duration() {
        assert_eq!(position(5, 5, 0).holding_period_days(), Some(Decimal::zero()));
    }

    #[test]
    fn test_holding_period_invalid_when_close_precedes_open() {
        assert_eq!(position(10, 5, 0).holding_period_days(), None);
        assert_eq!(position(i64::MAX, i64::MIN, 0).holding_period_days(), None);
    }

    #[test]
    fn test_win_loss_flags() {
        assert!(position(0, 1, 5).is_win());
        assert!(position(0, 1, -5).is_loss());
        let flat = position(0, 1, 0);
        assert!(!flat.is_win() && !flat.is_loss());
    }

    #[test]
    fn test_camel_case_serialization() {
        let json = serde_json::to_value(position(0, 1, 5)).unwrap();
        assert!(json.get("openedAt").is_some());
        assert!(json.get("entryNotional").is_some());
        assert_eq!(json["side"], "long");
    }
}
