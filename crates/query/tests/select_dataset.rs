use analytics::{StatisticsEngine, TradingData};
use chrono::NaiveDate;
use core_types::{Coin, EmaPeriod, SizingMode, TradeKind, TradeRecord, YearFilter};
use query::{DatasetStore, FilterOptions, filter_choices};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::borrow::Cow;

fn row(
    trade_number: u32,
    year: i32,
    month: u32,
    kind: &str,
    net_pnl: Decimal,
    cumulative_pnl: Decimal,
) -> TradeRecord {
    TradeRecord {
        trade_number,
        kind: kind.parse::<TradeKind>().unwrap(),
        datetime: NaiveDate::from_ymd_opt(year, month, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap(),
        signal: "EMA-ATR".to_string(),
        price: dec!(100),
        position_size: dec!(1),
        position_value: dec!(100),
        net_pnl,
        net_pnl_percent: Decimal::ZERO,
        max_profit: Decimal::ZERO,
        max_profit_percent: Decimal::ZERO,
        max_loss: Decimal::ZERO,
        max_loss_percent: Decimal::ZERO,
        cumulative_pnl,
        cumulative_pnl_percent: Decimal::ZERO,
        year,
    }
}

/// Two round-trips in 2020, one in 2021, in the backtester's newest-first order.
fn btc_dataset() -> TradingData {
    let trades = vec![
        row(3, 2021, 4, "多头出场", dec!(300), dec!(800)),
        row(3, 2021, 2, "多头进场", dec!(300), dec!(800)),
        row(2, 2020, 9, "空头出场", dec!(-200), dec!(500)),
        row(2, 2020, 7, "空头进场", dec!(-200), dec!(500)),
        row(1, 2020, 5, "多头出场", dec!(700), dec!(700)),
        row(1, 2020, 3, "多头进场", dec!(700), dec!(700)),
    ];
    let statistics = StatisticsEngine::new().calculate(&trades);
    TradingData {
        coin: Coin::Btc,
        ema_period: EmaPeriod::Ema120,
        mode: SizingMode::Full,
        trades,
        statistics,
    }
}

fn store() -> DatasetStore {
    DatasetStore::new(vec![btc_dataset()])
}

#[test]
fn all_years_returns_the_stored_dataset_untouched() {
    let store = store();
    let selected = store.select_dataset(&FilterOptions::default()).unwrap();

    assert!(matches!(selected, Cow::Borrowed(_)));
    let stored = store.get(&FilterOptions::default().key()).unwrap();
    assert!(std::ptr::eq(selected.as_ref(), stored));
    assert_eq!(selected.trades.len(), 6);
}

#[test]
fn unknown_combination_is_none_not_an_error() {
    let filters = FilterOptions::new(Coin::Ada, EmaPeriod::Ema200, SizingMode::Fixed, YearFilter::All);
    assert!(store().select_dataset(&filters).is_none());
}

#[test]
fn year_view_keeps_only_that_years_exit_legs() {
    let store = store();
    let filters = FilterOptions {
        year: YearFilter::Year(2020),
        ..FilterOptions::default()
    };
    let view = store.select_dataset(&filters).unwrap();

    assert!(matches!(view, Cow::Owned(_)));
    assert_eq!(view.coin, Coin::Btc);
    assert_eq!(view.trades.len(), 2);
    assert!(view.trades.iter().all(|t| t.year == 2020 && t.kind.is_exit()));

    let stats = &view.statistics;
    assert_eq!(stats.win_rate, dec!(50));
    assert_eq!(stats.max_drawdown, dec!(200));
    assert_eq!(stats.total_pnl, dec!(500));
    assert_eq!(stats.total_return, dec!(5));
    assert_eq!(stats.long_pnl, dec!(700));
    assert_eq!(stats.short_pnl, dec!(-200));
}

#[test]
fn later_year_return_is_measured_from_carried_equity() {
    let filters = FilterOptions {
        year: YearFilter::Year(2021),
        ..FilterOptions::default()
    };
    let view = store().select_dataset(&filters).unwrap().into_owned();

    // 500 was earned before 2021, so the base is 10500 and the year adds 300.
    assert_eq!(view.trades.len(), 1);
    assert_eq!(view.statistics.total_pnl, dec!(300));
    assert_eq!(view.statistics.total_return.round_dp(4), dec!(2.8571));
}

#[test]
fn year_without_trades_yields_zero_statistics() {
    let store = store();
    let filters = FilterOptions {
        year: YearFilter::Year(2017),
        ..FilterOptions::default()
    };
    let view = store.select_dataset(&filters).unwrap();

    assert!(view.trades.is_empty());
    assert!(view.statistics.is_zero());
}

#[test]
fn stored_dataset_is_not_modified_by_year_views() {
    let store = store();
    let before = store.get(&FilterOptions::default().key()).unwrap().clone();
    let filters = FilterOptions {
        year: YearFilter::Year(2020),
        ..FilterOptions::default()
    };
    let _ = store.select_dataset(&filters);
    assert_eq!(store.get(&FilterOptions::default().key()).unwrap(), &before);
}

#[test]
fn years_lists_distinct_years_in_order() {
    let store = store();
    assert_eq!(store.years(&FilterOptions::default().key()), vec![2020, 2021]);
    let missing = FilterOptions::new(Coin::Sol, EmaPeriod::Ema120, SizingMode::Full, YearFilter::All);
    assert!(store.years(&missing.key()).is_empty());
}

#[test]
fn duplicate_keys_keep_the_last_dataset() {
    let mut replacement = btc_dataset();
    replacement.trades.truncate(2);
    let store = DatasetStore::new(vec![btc_dataset(), replacement]);
    assert_eq!(store.len(), 1);
    assert_eq!(store.datasets()[0].trades.len(), 2);
}

#[test]
fn filter_choices_cover_every_dimension() {
    let choices = filter_choices();
    assert_eq!(choices.coins.len(), 4);
    assert_eq!(choices.ema_periods.len(), 2);
    assert_eq!(choices.modes.len(), 2);
    assert_eq!(choices.years[0], YearFilter::All);
}

#[test]
fn defaults_match_the_dashboard_start_state() {
    let filters = FilterOptions::default();
    assert_eq!(filters.key().to_string(), "BTC-120-full");
    assert_eq!(filters.year, YearFilter::All);
}
