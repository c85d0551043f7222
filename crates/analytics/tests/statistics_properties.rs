//! Property tests for the statistics engine.
//!
//! Uses proptest to verify:
//! 1. Order independence: shuffling the rows never changes the statistics
//! 2. Ranges: drawdown is non-negative, win rates stay within [0, 100]
//! 3. Decomposition: long P&L plus short P&L is the P&L of every row
//! 4. A never-falling cumulative P&L has no drawdown

use analytics::StatisticsEngine;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use core_types::{Direction, Leg, TradeKind, TradeRecord};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn record(slot: u32, long: bool, exit: bool, net_pnl: Decimal, cumulative_pnl: Decimal) -> TradeRecord {
    let direction = if long { Direction::Long } else { Direction::Short };
    let leg = if exit { Leg::Exit } else { Leg::Entry };
    let datetime = base_time() + Duration::hours(i64::from(slot) * 4);
    TradeRecord {
        trade_number: slot / 2 + 1,
        kind: TradeKind::new(direction, leg),
        datetime,
        signal: "EMA".to_string(),
        price: Decimal::ONE_HUNDRED,
        position_size: Decimal::ONE,
        position_value: Decimal::ONE_HUNDRED,
        net_pnl,
        net_pnl_percent: Decimal::ZERO,
        max_profit: Decimal::ZERO,
        max_profit_percent: Decimal::ZERO,
        max_loss: Decimal::ZERO,
        max_loss_percent: Decimal::ZERO,
        cumulative_pnl,
        cumulative_pnl_percent: Decimal::ZERO,
        year: 2019,
    }
}

// ── Strategies (proptest) ────────────────────────────────────────────

/// Rows with distinct timestamps, so every permutation has a single sorted order.
fn arb_trades() -> impl Strategy<Value = Vec<TradeRecord>> {
    prop::collection::vec(
        (
            any::<bool>(),
            any::<bool>(),
            -50_000i64..50_000,
            -200_000i64..200_000,
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (long, exit, net, cumulative))| {
                record(i as u32, long, exit, Decimal::new(net, 2), Decimal::new(cumulative, 2))
            })
            .collect()
    })
}

/// Rows whose cumulative P&L starts at or above zero and never falls.
fn arb_rising_trades() -> impl Strategy<Value = Vec<TradeRecord>> {
    (0i64..10_000, prop::collection::vec(0i64..5_000, 1..30)).prop_map(|(start, steps)| {
        let mut cumulative = Decimal::new(start, 2);
        steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| {
                let net = Decimal::new(step, 2);
                cumulative += net;
                record(i as u32, i % 2 == 0, true, net, cumulative)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn shuffling_rows_does_not_change_statistics(
        (trades, shuffled) in arb_trades().prop_flat_map(|trades| {
            (Just(trades.clone()), Just(trades).prop_shuffle())
        })
    ) {
        let engine = StatisticsEngine::new();
        prop_assert_eq!(engine.calculate(&trades), engine.calculate(&shuffled));
    }

    #[test]
    fn metrics_stay_in_range(trades in arb_trades()) {
        let stats = StatisticsEngine::new().calculate(&trades);
        let hundred = Decimal::ONE_HUNDRED;

        prop_assert!(stats.max_drawdown >= Decimal::ZERO);
        for rate in [stats.win_rate, stats.long_win_rate, stats.short_win_rate] {
            prop_assert!(rate >= Decimal::ZERO && rate <= hundred);
        }
        prop_assert!(stats.avg_loss <= Decimal::ZERO);
        prop_assert!(stats.avg_win >= Decimal::ZERO);
        if !trades.is_empty() {
            prop_assert!(stats.max_loss <= stats.max_win);
        }
    }

    #[test]
    fn empty_partitions_report_zero_win_rate(trades in arb_trades()) {
        let longs_only: Vec<_> = trades.into_iter().filter(|t| t.kind.is_long()).collect();
        let stats = StatisticsEngine::new().calculate(&longs_only);
        prop_assert_eq!(stats.short_win_rate, Decimal::ZERO);
        prop_assert_eq!(stats.short_pnl, Decimal::ZERO);
    }

    #[test]
    fn pnl_decomposes_across_partitions(trades in arb_trades()) {
        let stats = StatisticsEngine::new().calculate(&trades);
        let total: Decimal = trades.iter().map(|t| t.net_pnl).sum();
        let profitable: Decimal = trades.iter().map(|t| t.net_pnl).filter(|p| *p > Decimal::ZERO).sum();
        let losing: Decimal = trades.iter().map(|t| t.net_pnl).filter(|p| *p < Decimal::ZERO).sum();

        prop_assert_eq!(profitable + losing, total);
        prop_assert_eq!(stats.long_pnl + stats.short_pnl, total);
    }

    #[test]
    fn rising_cumulative_pnl_has_no_drawdown(trades in arb_rising_trades()) {
        let stats = StatisticsEngine::new().calculate(&trades);
        prop_assert_eq!(stats.max_drawdown, Decimal::ZERO);
    }
}

#[test]
fn two_step_decline_reports_forty() {
    let trades = vec![
        record(0, true, true, Decimal::new(100, 0), Decimal::new(100, 0)),
        record(1, true, true, Decimal::new(-40, 0), Decimal::new(60, 0)),
    ];
    let stats = StatisticsEngine::new().calculate(&trades);
    assert_eq!(stats.max_drawdown, Decimal::new(40, 0));
}
