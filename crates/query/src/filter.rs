use analytics::{StatisticsEngine, TradingData};
use core_types::{Coin, DatasetKey, EmaPeriod, SizingMode, YearFilter};
use serde::{Deserialize, Serialize};

/// The dashboard's four filter selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub coin: Coin,
    pub ema_period: EmaPeriod,
    pub year: YearFilter,
    pub mode: SizingMode,
}

impl FilterOptions {
    pub fn new(coin: Coin, ema_period: EmaPeriod, mode: SizingMode, year: YearFilter) -> Self {
        Self {
            coin,
            ema_period,
            year,
            mode,
        }
    }

    pub fn key(&self) -> DatasetKey {
        DatasetKey::new(self.coin, self.ema_period, self.mode)
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::new(Coin::Btc, EmaPeriod::Ema120, SizingMode::Full, YearFilter::All)
    }
}

/// Every value each filter can take, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterChoices {
    pub coins: Vec<Coin>,
    pub ema_periods: Vec<EmaPeriod>,
    pub modes: Vec<SizingMode>,
    pub years: Vec<YearFilter>,
}

pub fn filter_choices() -> FilterChoices {
    FilterChoices {
        coins: Coin::ALL.to_vec(),
        ema_periods: EmaPeriod::ALL.to_vec(),
        modes: SizingMode::ALL.to_vec(),
        years: YearFilter::choices(),
    }
}

/// A single calendar year of a dataset, restricted to closing legs, with
/// statistics re-derived from those rows alone.
///
/// Only exit rows are kept because the period-return baseline expects one
/// row per completed round-trip.
pub fn year_view(dataset: &TradingData, year: i32, engine: &StatisticsEngine) -> TradingData {
    let trades: Vec<_> = dataset
        .trades
        .iter()
        .filter(|trade| trade.year == year && trade.kind.is_exit())
        .cloned()
        .collect();
    let statistics = engine.calculate(&trades);

    TradingData {
        coin: dataset.coin,
        ema_period: dataset.ema_period,
        mode: dataset.mode,
        trades,
        statistics,
    }
}
