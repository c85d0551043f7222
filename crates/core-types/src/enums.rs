use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The coins the EMA-ATR strategy was backtested on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Coin {
    Btc,
    Eth,
    Sol,
    Ada,
}

impl Coin {
    pub const ALL: [Coin; 4] = [Coin::Btc, Coin::Eth, Coin::Sol, Coin::Ada];

    pub fn as_str(&self) -> &'static str {
        match self {
            Coin::Btc => "BTC",
            Coin::Eth => "ETH",
            Coin::Sol => "SOL",
            Coin::Ada => "ADA",
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Coin {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BTC" => Ok(Coin::Btc),
            "ETH" => Ok(Coin::Eth),
            "SOL" => Ok(Coin::Sol),
            "ADA" => Ok(Coin::Ada),
            _ => Err(CoreError::InvalidInput("coin".to_string(), s.to_string())),
        }
    }
}

/// The EMA period of the trend filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmaPeriod {
    #[serde(rename = "120")]
    Ema120,
    #[serde(rename = "200")]
    Ema200,
}

impl EmaPeriod {
    pub const ALL: [EmaPeriod; 2] = [EmaPeriod::Ema120, EmaPeriod::Ema200];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmaPeriod::Ema120 => "120",
            EmaPeriod::Ema200 => "200",
        }
    }
}

impl fmt::Display for EmaPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmaPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("EMA")
            .or_else(|| trimmed.strip_prefix("ema"))
            .unwrap_or(trimmed);
        match digits {
            "120" => Ok(EmaPeriod::Ema120),
            "200" => Ok(EmaPeriod::Ema200),
            _ => Err(CoreError::InvalidInput("ema period".to_string(), s.to_string())),
        }
    }
}

/// Position sizing mode used by the backtest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    /// All-in: every entry uses the full account equity.
    Full,
    /// Every entry uses a fixed notional.
    Fixed,
}

impl SizingMode {
    pub const ALL: [SizingMode; 2] = [SizingMode::Full, SizingMode::Fixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizingMode::Full => "full",
            SizingMode::Fixed => "fixed",
        }
    }
}

impl fmt::Display for SizingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizingMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(SizingMode::Full),
            "fixed" => Ok(SizingMode::Fixed),
            _ => Err(CoreError::InvalidInput("mode".to_string(), s.to_string())),
        }
    }
}

/// Which side of the market a position was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

/// Whether a trade row opens or closes a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    Entry,
    Exit,
}

/// The year selection of the dashboard: every year, or a single calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl YearFilter {
    /// The years the backtests cover, in the order the dashboard offers them.
    pub const FIRST_YEAR: i32 = 2017;
    pub const LAST_YEAR: i32 = 2025;

    /// `All` followed by every covered year.
    pub fn choices() -> Vec<YearFilter> {
        std::iter::once(YearFilter::All)
            .chain((Self::FIRST_YEAR..=Self::LAST_YEAR).map(YearFilter::Year))
            .collect()
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => f.write_str("all"),
            YearFilter::Year(year) => write!(f, "{year}"),
        }
    }
}

impl FromStr for YearFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed == "全部" {
            return Ok(YearFilter::All);
        }
        trimmed
            .parse::<i32>()
            .map(YearFilter::Year)
            .map_err(|_| CoreError::InvalidInput("year".to_string(), s.to_string()))
    }
}

impl From<YearFilter> for String {
    fn from(filter: YearFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for YearFilter {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
