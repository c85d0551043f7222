//! Sorting and paging for the trade history table.

use crate::error::QueryError;
use core_types::TradeRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A sortable column of the trade history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    TradeNumber,
    Type,
    Datetime,
    Signal,
    Price,
    PositionSize,
    PositionValue,
    NetPnl,
    NetPnlPercent,
    MaxProfit,
    MaxProfitPercent,
    MaxLoss,
    MaxLossPercent,
    CumulativePnl,
    CumulativePnlPercent,
    Year,
}

impl SortField {
    const NAMES: [(&'static str, SortField); 16] = [
        ("tradeNumber", SortField::TradeNumber),
        ("type", SortField::Type),
        ("datetime", SortField::Datetime),
        ("signal", SortField::Signal),
        ("price", SortField::Price),
        ("positionSize", SortField::PositionSize),
        ("positionValue", SortField::PositionValue),
        ("netPnl", SortField::NetPnl),
        ("netPnlPercent", SortField::NetPnlPercent),
        ("maxProfit", SortField::MaxProfit),
        ("maxProfitPercent", SortField::MaxProfitPercent),
        ("maxLoss", SortField::MaxLoss),
        ("maxLossPercent", SortField::MaxLossPercent),
        ("cumulativePnl", SortField::CumulativePnl),
        ("cumulativePnlPercent", SortField::CumulativePnlPercent),
        ("year", SortField::Year),
    ];

    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, field)| field == self)
            .map(|(name, _)| *name)
            .unwrap_or("datetime")
    }

    /// Compares two rows on this column. Text columns ignore case.
    fn compare(&self, a: &TradeRecord, b: &TradeRecord) -> Ordering {
        match self {
            SortField::TradeNumber => a.trade_number.cmp(&b.trade_number),
            SortField::Type => a.kind.label().to_lowercase().cmp(&b.kind.label().to_lowercase()),
            SortField::Datetime => a.datetime.cmp(&b.datetime),
            SortField::Signal => a.signal.to_lowercase().cmp(&b.signal.to_lowercase()),
            SortField::Price => a.price.cmp(&b.price),
            SortField::PositionSize => a.position_size.cmp(&b.position_size),
            SortField::PositionValue => a.position_value.cmp(&b.position_value),
            SortField::NetPnl => a.net_pnl.cmp(&b.net_pnl),
            SortField::NetPnlPercent => a.net_pnl_percent.cmp(&b.net_pnl_percent),
            SortField::MaxProfit => a.max_profit.cmp(&b.max_profit),
            SortField::MaxProfitPercent => a.max_profit_percent.cmp(&b.max_profit_percent),
            SortField::MaxLoss => a.max_loss.cmp(&b.max_loss),
            SortField::MaxLossPercent => a.max_loss_percent.cmp(&b.max_loss_percent),
            SortField::CumulativePnl => a.cumulative_pnl.cmp(&b.cumulative_pnl),
            SortField::CumulativePnlPercent => {
                a.cumulative_pnl_percent.cmp(&b.cumulative_pnl_percent)
            }
            SortField::Year => a.year.cmp(&b.year),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    /// Accepts the camelCase column names as well as their snake_case spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| *c != '_').collect();
        Self::NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&wanted))
            .map(|(_, field)| *field)
            .ok_or_else(|| QueryError::UnknownSortField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(QueryError::UnknownSortOrder(s.to_string())),
        }
    }
}

/// How the trade history should be ordered and which page to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub sort: SortField,
    pub order: SortOrder,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            sort: SortField::Datetime,
            order: SortOrder::Desc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl HistoryQuery {
    /// Selecting the active column flips its order; a new column starts
    /// descending. Either way the view returns to the first page.
    pub fn sorted_by(self, field: SortField) -> Self {
        let order = if field == self.sort {
            self.order.toggled()
        } else {
            SortOrder::Desc
        };
        Self {
            sort: field,
            order,
            page: 1,
            ..self
        }
    }
}

/// One page of the sorted trade history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePage {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_trades: usize,
    pub sort: SortField,
    pub order: SortOrder,
    pub trades: Vec<TradeRecord>,
}

/// Sorts the rows (stable, so ties keep their original order) and cuts out
/// the requested page. The page number is clamped into the valid range.
pub fn paginate(trades: &[TradeRecord], query: &HistoryQuery) -> TradePage {
    let page_size = query.page_size.max(1);
    let total_trades = trades.len();
    let total_pages = total_trades.div_ceil(page_size);
    let page = query.page.clamp(1, total_pages.max(1));

    let mut sorted: Vec<&TradeRecord> = trades.iter().collect();
    match query.order {
        SortOrder::Asc => sorted.sort_by(|a, b| query.sort.compare(a, b)),
        SortOrder::Desc => sorted.sort_by(|a, b| query.sort.compare(b, a)),
    }

    let trades = sorted
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    TradePage {
        page,
        page_size,
        total_pages,
        total_trades,
        sort: query.sort,
        order: query.order,
        trades,
    }
}
