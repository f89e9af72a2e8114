use tradetax::engine::match_positions;
use tradetax::{Action, Coin, Decimal, Side, TimeMs, TradeRecord};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

#[allow(clippy::too_many_arguments)]
fn fill(
    time_ms: i64,
    coin: &str,
    side: Side,
    action: Action,
    sz: &str,
    ntl: &str,
    fee: &str,
    closed_pnl: &str,
) -> TradeRecord {
    TradeRecord {
        row: time_ms as u64,
        time_raw: String::new(),
        timestamp: TimeMs::new(time_ms),
        coin: Coin::new(coin.to_string()),
        direction: format!("{} {}", action, side),
        side,
        action,
        price: Decimal::zero(),
        size: d(sz),
        notional: d(ntl),
        fee: d(fee),
        closed_pnl: d(closed_pnl),
    }
}

fn open_long(time_ms: i64, sz: &str, ntl: &str) -> TradeRecord {
    fill(time_ms, "BTC", Side::Long, Action::Open, sz, ntl, "0", "0")
}

fn close_long(time_ms: i64, sz: &str, ntl: &str) -> TradeRecord {
    fill(time_ms, "BTC", Side::Long, Action::Close, sz, ntl, "0", "0")
}

#[test]
fn test_fifo_drains_oldest_lot_first() {
    let records = vec![
        fill(1000, "BTC", Side::Long, Action::Open, "1", "100", "1", "0"),
        fill(2000, "BTC", Side::Long, Action::Open, "2", "240", "2", "0"),
        fill(3000, "BTC", Side::Long, Action::Close, "3", "390", "3", "60"),
    ];
    let outcome = match_positions(&records);

    assert_eq!(outcome.positions.len(), 2);
    assert_eq!(outcome.open_lots_remaining, 0);

    let first = &outcome.positions[0];
    assert_eq!(first.opened_at, TimeMs::new(1000));
    assert_eq!(first.closed_at, TimeMs::new(3000));
    assert_eq!(first.size, d("1"));
    assert_eq!(first.entry_notional, d("100"));
    assert_eq!(first.exit_notional, d("130"));
    assert_eq!(first.total_fees, d("2"));
    assert_eq!(first.net_pnl, d("20"));

    let second = &outcome.positions[1];
    assert_eq!(second.opened_at, TimeMs::new(2000));
    assert_eq!(second.size, d("2"));
    assert_eq!(second.entry_notional, d("240"));
    assert_eq!(second.exit_notional, d("260"));
    assert_eq!(second.total_fees, d("4"));
    assert_eq!(second.net_pnl, d("40"));
}

#[test]
fn test_split_close_prorates_entry_notional() {
    let records = vec![
        open_long(1000, "10", "1000"),
        close_long(2000, "4", "480"),
        close_long(3000, "6", "660"),
    ];
    let outcome = match_positions(&records);

    assert_eq!(outcome.positions.len(), 2);
    let total: Decimal = outcome.positions.iter().map(|p| p.size).sum();
    assert_eq!(total, d("10"));

    assert_eq!(outcome.positions[0].size, d("4"));
    assert_eq!(outcome.positions[0].entry_notional, d("400"));
    assert_eq!(outcome.positions[0].exit_notional, d("480"));
    assert_eq!(outcome.positions[1].size, d("6"));
    assert_eq!(outcome.positions[1].entry_notional, d("600"));
    assert_eq!(outcome.positions[1].opened_at, TimeMs::new(1000));
    assert_eq!(outcome.open_lots_remaining, 0);
}

#[test]
fn test_unmatched_close_fabricates_zero_entry_position() {
    let records = vec![fill(
        5000,
        "ETH",
        Side::Short,
        Action::Close,
        "2",
        "3000",
        "1.5",
        "-12",
    )];
    let outcome = match_positions(&records);

    assert_eq!(outcome.positions.len(), 1);
    let position = &outcome.positions[0];
    assert_eq!(position.entry_notional, Decimal::zero());
    assert_eq!(position.opened_at, position.closed_at);
    assert_eq!(position.closed_at, TimeMs::new(5000));
    assert_eq!(position.size, d("2"));
    assert_eq!(position.exit_notional, d("3000"));
    assert_eq!(position.net_pnl, d("-12"));
    assert_eq!(position.total_fees, d("1.5"));
}

#[test]
fn test_open_lot_leftover_counts_and_emits_nothing() {
    let records = vec![open_long(1000, "1", "100")];
    let outcome = match_positions(&records);

    assert!(outcome.positions.is_empty());
    assert_eq!(outcome.open_lots_remaining, 1);
}

#[test]
fn test_keys_are_per_coin_and_side() {
    let records = vec![
        fill(1, "BTC", Side::Long, Action::Open, "1", "100", "0", "0"),
        fill(2, "BTC", Side::Short, Action::Open, "1", "100", "0", "0"),
        fill(3, "ETH", Side::Long, Action::Open, "1", "10", "0", "0"),
        fill(4, "BTC", Side::Short, Action::Close, "1", "90", "0", "10"),
    ];
    let outcome = match_positions(&records);

    assert_eq!(outcome.positions.len(), 1);
    assert_eq!(outcome.positions[0].side, Side::Short);
    assert_eq!(outcome.positions[0].opened_at, TimeMs::new(2));
    assert_eq!(outcome.positions[0].entry_notional, d("100"));
    // BTC long and ETH long remain.
    assert_eq!(outcome.open_lots_remaining, 2);
}

#[test]
fn test_lot_split_across_many_closes_then_reopened() {
    let records = vec![
        open_long(1, "3", "300"),
        close_long(2, "1", "110"),
        close_long(3, "1", "120"),
        open_long(4, "1", "130"),
        close_long(5, "2", "280"),
    ];
    let outcome = match_positions(&records);

    let sizes: Vec<Decimal> = outcome.positions.iter().map(|p| p.size).collect();
    assert_eq!(sizes, vec![d("1"), d("1"), d("1"), d("1")]);
    let opens: Vec<i64> = outcome
        .positions
        .iter()
        .map(|p| p.opened_at.as_i64())
        .collect();
    assert_eq!(opens, vec![1, 1, 1, 4]);
    assert_eq!(outcome.positions[3].entry_notional, d("130"));
    assert_eq!(outcome.positions[3].exit_notional, d("140"));
    assert_eq!(outcome.open_lots_remaining, 0);
}

#[test]
fn test_matching_is_deterministic() {
    let records = vec![
        open_long(1, "1.5", "150"),
        open_long(2, "0.7", "77"),
        close_long(3, "2", "230"),
        close_long(4, "1", "120"),
    ];
    let first = match_positions(&records);
    let second = match_positions(&records);
    assert_eq!(first, second);
}
