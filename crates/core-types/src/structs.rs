use crate::enums::{Coin, Direction, EmaPeriod, Leg, SizingMode};
use crate::error::CoreError;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The decoded form of the backtester's free-text trade "type" column.
///
/// Decoding happens once, when a label is parsed; everything downstream
/// matches on `direction` and `leg`. The original label is kept so it can be
/// displayed and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TradeKind {
    pub direction: Direction,
    pub leg: Leg,
    label: String,
}

impl TradeKind {
    /// Builds a kind with the English export's label, e.g. "Exit long".
    pub fn new(direction: Direction, leg: Leg) -> Self {
        let leg_word = match leg {
            Leg::Entry => "Entry",
            Leg::Exit => "Exit",
        };
        let direction_word = match direction {
            Direction::Long => "long",
            Direction::Short => "short",
        };
        Self {
            direction,
            leg,
            label: format!("{leg_word} {direction_word}"),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_long(&self) -> bool {
        self.direction == Direction::Long
    }

    pub fn is_short(&self) -> bool {
        self.direction == Direction::Short
    }

    pub fn is_exit(&self) -> bool {
        self.leg == Leg::Exit
    }
}

const EXIT_MARKERS: [&str; 4] = ["出场", "平仓", "exit", "clos"];
const ENTRY_MARKERS: [&str; 5] = ["进场", "入场", "开仓", "entry", "open"];
const LONG_MARKERS: [&str; 3] = ["多头", "long", "buy"];
const SHORT_MARKERS: [&str; 3] = ["空头", "short", "sell"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

impl FromStr for TradeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let lowered = label.to_lowercase();

        let leg = if contains_any(&lowered, &EXIT_MARKERS) {
            Leg::Exit
        } else if contains_any(&lowered, &ENTRY_MARKERS) {
            Leg::Entry
        } else {
            return Err(CoreError::UnknownTradeType(s.to_string()));
        };

        let direction = if contains_any(&lowered, &LONG_MARKERS) {
            Direction::Long
        } else if contains_any(&lowered, &SHORT_MARKERS) {
            Direction::Short
        } else {
            return Err(CoreError::UnknownTradeType(s.to_string()));
        };

        Ok(Self {
            direction,
            leg,
            label: label.to_string(),
        })
    }
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl From<TradeKind> for String {
    fn from(kind: TradeKind) -> Self {
        kind.label
    }
}

impl TryFrom<String> for TradeKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One row of the backtester's "list of trades" export.
///
/// An entry and its matching exit share the same `trade_number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub trade_number: u32,
    #[serde(rename = "type")]
    pub kind: TradeKind,
    #[serde(with = "crate::datetime")]
    pub datetime: NaiveDateTime,
    pub signal: String,
    pub price: Decimal,
    pub position_size: Decimal,
    pub position_value: Decimal,
    pub net_pnl: Decimal,
    pub net_pnl_percent: Decimal,
    pub max_profit: Decimal,
    pub max_profit_percent: Decimal,
    pub max_loss: Decimal,
    pub max_loss_percent: Decimal,
    /// Running total kept by the backtester in datetime order.
    pub cumulative_pnl: Decimal,
    pub cumulative_pnl_percent: Decimal,
    /// Calendar year of `datetime`, fixed at ingestion.
    pub year: i32,
}

/// Identifies one of the sixteen backtest datasets, e.g. `BTC-120-full`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DatasetKey {
    pub coin: Coin,
    pub ema_period: EmaPeriod,
    pub mode: SizingMode,
}

impl DatasetKey {
    pub fn new(coin: Coin, ema_period: EmaPeriod, mode: SizingMode) -> Self {
        Self {
            coin,
            ema_period,
            mode,
        }
    }

    /// Every coin × EMA period × mode combination, coin-major.
    pub fn all() -> impl Iterator<Item = DatasetKey> {
        Coin::ALL.into_iter().flat_map(|coin| {
            EmaPeriod::ALL.into_iter().flat_map(move |ema_period| {
                SizingMode::ALL
                    .into_iter()
                    .map(move |mode| DatasetKey::new(coin, ema_period, mode))
            })
        })
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.coin, self.ema_period, self.mode)
    }
}

impl FromStr for DatasetKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(coin), Some(ema_period), Some(mode), None) => Ok(Self {
                coin: coin.parse()?,
                ema_period: ema_period.parse()?,
                mode: mode.parse()?,
            }),
            _ => Err(CoreError::InvalidInput(
                "dataset key".to_string(),
                s.to_string(),
            )),
        }
    }
}

impl From<DatasetKey> for String {
    fn from(key: DatasetKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for DatasetKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
