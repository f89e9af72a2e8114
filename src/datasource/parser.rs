//! Parsing of exchange trade-history CSV exports into [`TradeRecord`]s.
//!
//! Expected header: `time,coin,dir,px,sz,ntl,fee,closedPnl`. Extra columns are
//! ignored. Parsing is all-or-nothing: the first invalid row aborts the parse.

use crate::domain::{Coin, Decimal, Direction, DirectionError, TimeMs, TradeRecord};
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::debug;

/// Timestamp layout used by the export: `DD/MM/YYYY - HH:mm:ss`, UTC.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y - %H:%M:%S";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unable to parse CSV: {0}")]
    Csv(String),
    #[error("Unable to parse numeric value for {field} on row {row}: {raw}")]
    InvalidNumber {
        row: u64,
        field: &'static str,
        raw: String,
    },
    #[error("Invalid timestamp format on row {row}: {raw}")]
    InvalidTimestamp { row: u64, raw: String },
    #[error("Unknown side on row {row}: {raw}")]
    UnknownSide { row: u64, raw: String },
    #[error("Unknown trade action on row {row}: {raw}")]
    UnknownAction { row: u64, raw: String },
    #[error("Negative size on row {row}: {raw}")]
    NegativeSize { row: u64, raw: String },
}

impl ParseError {
    fn from_direction(row: u64, err: DirectionError) -> Self {
        match err {
            DirectionError::UnknownSide(raw) => ParseError::UnknownSide { row, raw },
            DirectionError::UnknownAction(raw) => ParseError::UnknownAction { row, raw },
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct Row {
    time: String,
    coin: String,
    dir: String,
    px: String,
    sz: String,
    ntl: String,
    fee: String,
    #[serde(rename = "closedPnl")]
    closed_pnl: String,
}

/// Parse a numeric cell: thousands separators and surrounding whitespace are
/// dropped, an empty cell reads as zero.
///
/// Anything outside `[+-]digits[.digits][e[+-]digits]` is rejected, as are
/// values beyond the decimal range (about 7.9e28).
pub fn parse_number(raw: &str) -> Option<Decimal> {
    let normalized: String = raw.chars().filter(|c| *c != ',').collect();
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return Some(Decimal::zero());
    }
    if !is_numeric_literal(normalized) {
        return None;
    }
    Decimal::from_str_lenient(normalized).ok()
}

fn is_numeric_literal(s: &str) -> bool {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };

    let mantissa = mantissa.strip_prefix(['+', '-']).unwrap_or(mantissa);
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits(whole) || !digits(fraction) {
        return false;
    }

    match exponent {
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && digits(exp)
        }
        None => true,
    }
}

/// Parse a `DD/MM/YYYY - HH:mm:ss` timestamp as UTC.
pub fn parse_timestamp(raw: &str) -> Option<TimeMs> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(TimeMs::from_naive_utc)
}

fn number(row: u64, field: &'static str, raw: &str) -> Result<Decimal, ParseError> {
    parse_number(raw).ok_or_else(|| ParseError::InvalidNumber {
        row,
        field,
        raw: raw.to_string(),
    })
}

impl Row {
    fn into_record(self, row: u64) -> Result<TradeRecord, ParseError> {
        let direction =
            Direction::classify(&self.dir).map_err(|e| ParseError::from_direction(row, e))?;
        let timestamp = parse_timestamp(&self.time).ok_or_else(|| ParseError::InvalidTimestamp {
            row,
            raw: self.time.clone(),
        })?;

        let price = number(row, "px", &self.px)?;
        let size = number(row, "sz", &self.sz)?;
        if size.is_negative() {
            return Err(ParseError::NegativeSize { row, raw: self.sz });
        }
        let notional = number(row, "ntl", &self.ntl)?;
        let fee = number(row, "fee", &self.fee)?;
        let closed_pnl = number(row, "closedPnl", &self.closed_pnl)?;

        Ok(TradeRecord {
            row,
            time_raw: self.time,
            timestamp,
            coin: Coin::new(self.coin),
            direction: self.dir,
            side: direction.side,
            action: direction.action,
            price,
            size,
            notional,
            fee,
            closed_pnl,
        })
    }
}

/// Parse CSV text into trade records, in file order.
///
/// # Errors
/// Returns the first [`ParseError`] encountered; no records are returned on failure.
pub fn parse_trade_csv(content: &str) -> Result<Vec<TradeRecord>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<Row>().enumerate() {
        let row = result.map_err(|e| ParseError::Csv(e.to_string()))?;
        records.push(row.into_record(idx as u64 + 1)?);
    }

    debug!(records = records.len(), "parsed trade csv");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Action, Side};

    const HEADER: &str = "time,coin,dir,px,sz,ntl,fee,closedPnl\n";

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_parse_valid_rows() {
        let csv = format!(
            "{HEADER}\
             01/02/2024 - 10:00:00,BTC,Open Long,\"42,000.5\",0.5,\"21,000.25\",1.2,0\n\
             02/02/2024 - 11:30:15,BTC,Close Long,43000,0.5,21500,1.3,499.75\n"
        );
        let records = parse_trade_csv(&csv).unwrap();
        assert_eq!(records.len(), 2);

        let open = &records[0];
        assert_eq!(open.row, 1);
        assert_eq!(open.time_raw, "01/02/2024 - 10:00:00");
        assert_eq!(open.coin.as_str(), "BTC");
        assert_eq!(open.side, Side::Long);
        assert_eq!(open.action, Action::Open);
        assert_eq!(open.price, d("42000.5"));
        assert_eq!(open.notional, d("21000.25"));

        let close = &records[1];
        assert_eq!(close.row, 2);
        assert_eq!(close.action, Action::Close);
        assert_eq!(close.closed_pnl, d("499.75"));
        assert!(close.timestamp > open.timestamp);
    }

    #[test]
    fn test_timestamp_is_day_first_utc() {
        let t = parse_timestamp("02/01/2024 - 03:04:05").unwrap();
        assert_eq!(t.as_i64(), 1_704_164_645_000);
        assert_eq!(parse_timestamp(" 02/01/2024 - 03:04:05 "), Some(t));
    }

    #[test]
    fn test_timestamp_rejects_other_layouts() {
        assert!(parse_timestamp("2024-01-02T03:04:05Z").is_none());
        assert!(parse_timestamp("02/01/2024 03:04:05").is_none());
        assert!(parse_timestamp("31/02/2024 - 00:00:00").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_parse_number_rules() {
        assert_eq!(parse_number(" 1,234.5 "), Some(d("1234.5")));
        assert_eq!(parse_number(""), Some(Decimal::zero()));
        assert_eq!(parse_number("   "), Some(Decimal::zero()));
        assert_eq!(parse_number("-3.25"), Some(d("-3.25")));
        assert_eq!(parse_number("2e3"), Some(d("2000")));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1.5e-2"), Some(d("0.015")));
    }

    #[test]
    fn test_parse_number_rejects_non_numeric_characters() {
        for raw in [
            "1_000", "_1", "1 000", "0x10", "1e", "e5", ".", "-", "1.2.3", "Infinity", "NaN",
            "1e3.5",
        ] {
            assert_eq!(parse_number(raw), None, "{raw:?} should be rejected");
        }
        // Finite but outside the decimal range.
        assert_eq!(parse_number("1e30"), None);

        let csv = "time,coin,dir,px,sz,ntl,fee,closedPnl\n01/01/2024 - 00:00:00,BTC,Open Long,1_000,1,1000,0,0\n";
        match parse_trade_csv(csv) {
            Err(ParseError::InvalidNumber { row, field, raw }) => {
                assert_eq!(row, 1);
                assert_eq!(field, "px");
                assert_eq!(raw, "1_000");
            }
            other => panic!("Expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_numeric_cells_read_as_zero() {
        let csv = format!("{HEADER}01/02/2024 - 10:00:00,ETH,Buy,100,1,100,,\n");
        let records = parse_trade_csv(&csv).unwrap();
        assert_eq!(records[0].fee, Decimal::zero());
        assert_eq!(records[0].closed_pnl, Decimal::zero());
    }

    #[test]
    fn test_invalid_number_names_raw_value() {
        let csv = format!("{HEADER}01/02/2024 - 10:00:00,ETH,Buy,12abc,1,100,0,0\n");
        let err = parse_trade_csv(&csv).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber { row: 1, field: "px", ref raw } if raw == "12abc"
        ));
        assert!(err.to_string().contains("12abc"));
    }

    #[test]
    fn test_invalid_timestamp_names_raw_value() {
        let csv = format!("{HEADER}2024-02-01 10:00,ETH,Buy,1,1,1,0,0\n");
        let err = parse_trade_csv(&csv).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTimestamp { row: 1, .. }));
        assert!(err.to_string().contains("2024-02-01 10:00"));
    }

    #[test]
    fn test_unknown_direction_fails_whole_parse() {
        let csv = format!(
            "{HEADER}\
             01/02/2024 - 10:00:00,ETH,Buy,1,1,1,0,0\n\
             01/02/2024 - 10:00:01,ETH,Funding,1,1,1,0,0\n"
        );
        let err = parse_trade_csv(&csv).unwrap_err();
        assert!(matches!(err, ParseError::UnknownAction { row: 2, ref raw } if raw == "Funding"));
    }

    #[test]
    fn test_unknown_side() {
        let csv = format!("{HEADER}01/02/2024 - 10:00:00,ETH,Open,1,1,1,0,0\n");
        let err = parse_trade_csv(&csv).unwrap_err();
        assert!(matches!(err, ParseError::UnknownSide { row: 1, .. }));
    }

    #[test]
    fn test_negative_size_rejected() {
        let csv = format!("{HEADER}01/02/2024 - 10:00:00,ETH,Buy,1,-1,1,0,0\n");
        let err = parse_trade_csv(&csv).unwrap_err();
        assert!(matches!(err, ParseError::NegativeSize { row: 1, ref raw } if raw == "-1"));
    }

    #[test]
    fn test_missing_column_fails() {
        let csv = "time,coin,dir,px,sz,ntl,fee\n01/02/2024 - 10:00:00,ETH,Buy,1,1,1,0\n";
        let err = parse_trade_csv(csv).unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)));
        assert!(err.to_string().contains("closedPnl"));
    }

    #[test]
    fn test_short_row_fails() {
        let csv = format!("{HEADER}01/02/2024 - 10:00:00,ETH,Buy,1,1\n");
        let err = parse_trade_csv(&csv).unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)));
    }

    #[test]
    fn test_extra_columns_ignored_and_blank_lines_skipped() {
        let csv = "time,coin,dir,px,sz,ntl,fee,closedPnl,feeToken\n\
                   01/02/2024 - 10:00:00,ETH,Open Short,1,2,2,0,0,USDC\n\
                   \n";
        let records = parse_trade_csv(csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].side, Side::Short);
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(parse_trade_csv(HEADER).unwrap().is_empty());
        assert!(parse_trade_csv("").unwrap().is_empty());
    }
}
