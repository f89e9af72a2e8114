//! Domain types for the trade PnL and tax ledger.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: TimeMs, Coin, Side, Action
//! - Direction classification from free-text fill directions
//! - TradeRecord and PositionResult
//! - Stable chronological ordering of records

pub mod decimal;
pub mod direction;
pub mod ordering;
pub mod position;
pub mod primitives;
pub mod trade;

pub use decimal::Decimal;
pub use direction::{Direction, DirectionError};
pub use ordering::sort_records_chronological;
pub use position::PositionResult;
pub use primitives::{Action, Coin, Side, TimeMs};
pub use trade::TradeRecord;
