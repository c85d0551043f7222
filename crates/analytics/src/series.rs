use chrono::NaiveDateTime;
use core_types::{TradeKind, TradeRecord};
use rust_decimal::Decimal;
use serde::Serialize;

/// One completed trade on the P&L chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// 1-based position among the closed trades.
    pub index: usize,
    pub label: String,
    #[serde(with = "core_types::datetime")]
    pub datetime: NaiveDateTime,
    pub net_pnl: Decimal,
    pub cumulative_pnl: Decimal,
    pub price: Decimal,
    pub signal: String,
    #[serde(rename = "type")]
    pub kind: TradeKind,
}

/// Per-trade P&L bars and the cumulative P&L line, one point per closing leg.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Builds the series from exit legs only, oldest first, so each
    /// round-trip appears exactly once.
    pub fn from_trades(trades: &[TradeRecord]) -> Self {
        let mut closed: Vec<&TradeRecord> = trades.iter().filter(|t| t.kind.is_exit()).collect();
        closed.sort_by_key(|trade| trade.datetime);

        let points = closed
            .into_iter()
            .enumerate()
            .map(|(i, trade)| ChartPoint {
                index: i + 1,
                label: format!("Trade {}", i + 1),
                datetime: trade.datetime,
                net_pnl: trade.net_pnl,
                cumulative_pnl: trade.cumulative_pnl,
                price: trade.price,
                signal: trade.signal.clone(),
                kind: trade.kind.clone(),
            })
            .collect();

        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{Direction, Leg};
    use rust_decimal_macros::dec;

    fn row(day: u32, leg: Leg, net_pnl: Decimal, cumulative_pnl: Decimal) -> TradeRecord {
        TradeRecord {
            trade_number: day,
            kind: TradeKind::new(Direction::Long, leg),
            datetime: NaiveDate::from_ymd_opt(2022, 1, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            signal: "Cross".to_string(),
            price: dec!(20),
            position_size: dec!(5),
            position_value: dec!(100),
            net_pnl,
            net_pnl_percent: Decimal::ZERO,
            max_profit: Decimal::ZERO,
            max_profit_percent: Decimal::ZERO,
            max_loss: Decimal::ZERO,
            max_loss_percent: Decimal::ZERO,
            cumulative_pnl,
            cumulative_pnl_percent: Decimal::ZERO,
            year: 2022,
        }
    }

    #[test]
    fn keeps_exit_legs_in_time_order() {
        let trades = vec![
            row(9, Leg::Exit, dec!(-5), dec!(25)),
            row(1, Leg::Entry, Decimal::ZERO, Decimal::ZERO),
            row(3, Leg::Exit, dec!(30), dec!(30)),
        ];
        let series = ChartSeries::from_trades(&trades);

        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].label, "Trade 1");
        assert_eq!(series.points[0].cumulative_pnl, dec!(30));
        assert_eq!(series.points[1].index, 2);
        assert_eq!(series.points[1].net_pnl, dec!(-5));
    }

    #[test]
    fn entry_only_input_gives_empty_series() {
        let series = ChartSeries::from_trades(&[row(2, Leg::Entry, Decimal::ZERO, Decimal::ZERO)]);
        assert!(series.is_empty());
    }
}
