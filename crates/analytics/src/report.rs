use core_types::{Coin, DatasetKey, EmaPeriod, SizingMode, TradeRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The fixed set of summary metrics shown for a dataset or a year of it.
///
/// Currency fields are in the quote currency (USDT); `total_return` and the
/// three win rates are percentages in `[0, 100]` scale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    // I. Period performance
    pub total_return: Decimal,
    pub total_pnl: Decimal,
    pub max_drawdown: Decimal,

    // II. Trade-level statistics
    pub win_rate: Decimal,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    pub max_win: Decimal,
    pub max_loss: Decimal,

    // III. Directional breakdown
    pub long_win_rate: Decimal,
    pub short_win_rate: Decimal,
    pub long_pnl: Decimal,
    pub short_pnl: Decimal,
}

impl Statistics {
    /// All-zero statistics, the result for an empty trade set.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// One backtest dataset together with the statistics derived from its trades.
///
/// This is the unit the dashboard displays and the shape of the converted
/// JSON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingData {
    pub coin: Coin,
    pub ema_period: EmaPeriod,
    pub mode: SizingMode,
    pub trades: Vec<TradeRecord>,
    pub statistics: Statistics,
}

impl TradingData {
    pub fn key(&self) -> DatasetKey {
        DatasetKey::new(self.coin, self.ema_period, self.mode)
    }
}
