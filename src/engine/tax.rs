//! Short-term / long-term capital gains estimate over closed positions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Decimal, PositionResult};

/// User-adjustable tax assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSettings {
    /// Rate applied to net short-term gains, as a fraction (0.37 = 37%).
    pub short_term_rate: Decimal,
    /// Rate applied to net long-term gains, as a fraction.
    pub long_term_rate: Decimal,
    /// Holding period, in days, at which a position becomes long-term.
    pub threshold_days: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxSettingsError {
    #[error("{0} must be between 0 and 1, got {1}")]
    RateOutOfRange(&'static str, Decimal),
    #[error("thresholdDays must not be negative, got {0}")]
    NegativeThreshold(Decimal),
}

impl TaxSettings {
    pub fn new(short_term_rate: Decimal, long_term_rate: Decimal, threshold_days: Decimal) -> Self {
        Self {
            short_term_rate,
            long_term_rate,
            threshold_days,
        }
    }

    pub fn validate(&self) -> Result<(), TaxSettingsError> {
        let one = Decimal::from_i64(1);
        for (name, rate) in [
            ("shortTermRate", self.short_term_rate),
            ("longTermRate", self.long_term_rate),
        ] {
            if rate.is_negative() || rate > one {
                return Err(TaxSettingsError::RateOutOfRange(name, rate));
            }
        }
        if self.threshold_days.is_negative() {
            return Err(TaxSettingsError::NegativeThreshold(self.threshold_days));
        }
        Ok(())
    }
}

impl Default for TaxSettings {
    /// 37% short-term, 20% long-term, 365-day threshold.
    fn default() -> Self {
        Self {
            short_term_rate: Decimal::new(rust_decimal::Decimal::new(37, 2)),
            long_term_rate: Decimal::new(rust_decimal::Decimal::new(20, 2)),
            threshold_days: Decimal::from_i64(365),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub short_term_net: Decimal,
    pub long_term_net: Decimal,
    pub short_term_tax: Decimal,
    pub long_term_tax: Decimal,
    pub total_tax: Decimal,
    /// total_tax / total net, or 0 when the total net is not positive.
    pub effective_rate: Decimal,
}

/// Bucket positions by holding period and estimate tax owed.
///
/// Losses offset gains within a bucket but never produce negative tax.
/// Positions without a valid holding period are left out of both buckets.
pub fn calculate_tax(positions: &[PositionResult], settings: &TaxSettings) -> TaxBreakdown {
    let mut short_term_net = Decimal::zero();
    let mut long_term_net = Decimal::zero();

    for position in positions {
        let Some(days) = position.holding_period_days() else {
            continue;
        };
        if days >= settings.threshold_days {
            long_term_net += position.net_pnl;
        } else {
            short_term_net += position.net_pnl;
        }
    }

    let short_term_tax = short_term_net.clamp_non_negative() * settings.short_term_rate;
    let long_term_tax = long_term_net.clamp_non_negative() * settings.long_term_rate;
    let total_tax = short_term_tax + long_term_tax;
    let total_net = short_term_net + long_term_net;

    TaxBreakdown {
        short_term_net,
        long_term_net,
        short_term_tax,
        long_term_tax,
        total_tax,
        effective_rate: if total_net.is_positive() {
            total_tax / total_net
        } else {
            Decimal::zero()
        },
    }
}
