//! Classification of free-text fill directions ("Open Long", "Close Short",
//! "Buy", "Long > Short", ...) into a side and an action.
//!
//! Both axes are resolved independently from an ordered rule table, matched by
//! substring against the trimmed, lower-cased direction text. The first rule
//! that matches wins.

use crate::domain::{Action, Side};
use thiserror::Error;

/// A single substring rule mapping a pattern to an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule<T> {
    pub pattern: &'static str,
    pub outcome: T,
}

const fn rule<T>(pattern: &'static str, outcome: T) -> Rule<T> {
    Rule { pattern, outcome }
}

/// Side rules. Bare "buy"/"sell" (spot style) default to long.
pub const SIDE_RULES: &[Rule<Side>] = &[
    rule("long", Side::Long),
    rule("short", Side::Short),
    rule("buy", Side::Long),
    rule("sell", Side::Long),
];

/// Action rules. Closing patterns are checked before opening ones, so
/// "Long > Short" and "Sell" both classify as a close.
pub const ACTION_RULES: &[Rule<Action>] = &[
    rule("close", Action::Close),
    rule("sell", Action::Close),
    rule("liquidation", Action::Close),
    rule(" > ", Action::Close),
    rule("open", Action::Open),
    rule("buy", Action::Open),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectionError {
    #[error("Unknown side: {0}")]
    UnknownSide(String),
    #[error("Unknown trade action: {0}")]
    UnknownAction(String),
}

/// Classified direction of a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    pub side: Side,
    pub action: Action,
}

impl Direction {
    /// Classify a raw direction string.
    ///
    /// The action axis is resolved first, so text matching neither axis
    /// reports [`DirectionError::UnknownAction`].
    pub fn classify(raw: &str) -> Result<Self, DirectionError> {
        let normalized = raw.trim().to_lowercase();

        let action = first_match(ACTION_RULES, &normalized)
            .ok_or_else(|| DirectionError::UnknownAction(raw.to_string()))?;
        let side = first_match(SIDE_RULES, &normalized)
            .ok_or_else(|| DirectionError::UnknownSide(raw.to_string()))?;

        Ok(Direction { side, action })
    }
}

fn first_match<T: Copy>(rules: &[Rule<T>], normalized: &str) -> Option<T> {
    rules
        .iter()
        .find(|r| normalized.contains(r.pattern))
        .map(|r| r.outcome)
}
