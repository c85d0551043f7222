//! Header resolution for trade-list exports.
//!
//! The backtester names its columns after the UI locale. Each logical column
//! lists every header it is known under; the first match wins.

use csv::StringRecord;

const COLUMN_COUNT: usize = 15;

/// A logical column. Discriminants index `Column::ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
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
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::TradeNumber,
        Column::Type,
        Column::Datetime,
        Column::Signal,
        Column::Price,
        Column::PositionSize,
        Column::PositionValue,
        Column::NetPnl,
        Column::NetPnlPercent,
        Column::MaxProfit,
        Column::MaxProfitPercent,
        Column::MaxLoss,
        Column::MaxLossPercent,
        Column::CumulativePnl,
        Column::CumulativePnlPercent,
    ];

    /// Field name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Column::TradeNumber => "tradeNumber",
            Column::Type => "type",
            Column::Datetime => "datetime",
            Column::Signal => "signal",
            Column::Price => "price",
            Column::PositionSize => "positionSize",
            Column::PositionValue => "positionValue",
            Column::NetPnl => "netPnl",
            Column::NetPnlPercent => "netPnlPercent",
            Column::MaxProfit => "maxProfit",
            Column::MaxProfitPercent => "maxProfitPercent",
            Column::MaxLoss => "maxLoss",
            Column::MaxLossPercent => "maxLossPercent",
            Column::CumulativePnl => "cumulativePnl",
            Column::CumulativePnlPercent => "cumulativePnlPercent",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::TradeNumber => &["交易 #", "Trade #"],
            Column::Type => &["类型", "Type"],
            Column::Datetime => &["日期/时间", "Date/Time", "Date and time"],
            Column::Signal => &["信号", "Signal"],
            Column::Price => &["价格 USDT", "Price USDT", "Price"],
            Column::PositionSize => &["仓位大小（数量）", "Position size (qty)", "Quantity"],
            Column::PositionValue => &["仓位大小（价值）", "Position size (value)", "Position value"],
            Column::NetPnl => &["净损益 USDT", "Net P&L USDT", "Profit USDT"],
            Column::NetPnlPercent => &["净损益 %", "Net P&L %", "Profit %"],
            Column::MaxProfit => &["最大交易获利 USDT", "Run-up USDT"],
            Column::MaxProfitPercent => &["最大交易获利 %", "Run-up %"],
            Column::MaxLoss => &["交易亏损 USDT", "Drawdown USDT"],
            Column::MaxLossPercent => &["交易亏损 %", "Drawdown %"],
            Column::CumulativePnl => &["累计P&L USDT", "Cumulative P&L USDT", "Cum. Profit USDT"],
            Column::CumulativePnlPercent => &["累计P&L %", "Cumulative P&L %", "Cum. Profit %"],
        }
    }

    fn matches(&self, header: &str) -> bool {
        self.aliases()
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(header))
    }
}

/// Position of every logical column in one file's header row.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: [usize; COLUMN_COUNT],
}

impl ColumnMap {
    /// Resolves all columns, or returns the first one the headers lack.
    pub fn from_headers(headers: &StringRecord) -> Result<Self, Column> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut indices = [0; COLUMN_COUNT];

        for column in Column::ALL {
            indices[column as usize] = normalized
                .iter()
                .position(|header| column.matches(header))
                .ok_or(column)?;
        }

        Ok(Self { indices })
    }

    /// The raw cell for `column`, empty when the row is short.
    pub fn get<'r>(&self, record: &'r StringRecord, column: Column) -> &'r str {
        record.get(self.indices[column as usize]).unwrap_or("").trim()
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chinese_headers() -> StringRecord {
        StringRecord::from(vec![
            "\u{feff}交易 #",
            "类型",
            "日期/时间",
            "信号",
            "价格 USDT",
            "仓位大小（数量）",
            "仓位大小（价值）",
            "净损益 USDT",
            "净损益 %",
            "最大交易获利 USDT",
            "最大交易获利 %",
            "交易亏损 USDT",
            "交易亏损 %",
            "累计P&L USDT",
            "累计P&L %",
        ])
    }

    #[test]
    fn resolves_chinese_headers_with_bom() {
        let map = ColumnMap::from_headers(&chinese_headers()).unwrap();
        let row = StringRecord::from(vec![
            "7", "多头出场", "2020-01-01 00:00", "Exit", "1", "2", "3", "4", "5", "6", "7", "8",
            "9", "10", "11",
        ]);
        assert_eq!(map.get(&row, Column::TradeNumber), "7");
        assert_eq!(map.get(&row, Column::Type), "多头出场");
        assert_eq!(map.get(&row, Column::CumulativePnlPercent), "11");
    }

    #[test]
    fn resolves_english_headers_in_any_order() {
        let headers = StringRecord::from(vec![
            "Cumulative P&L %",
            "Cumulative P&L USDT",
            "Drawdown %",
            "Drawdown USDT",
            "Run-up %",
            "Run-up USDT",
            "Net P&L %",
            "Net P&L USDT",
            "Position size (value)",
            "Position size (qty)",
            "Price USDT",
            "Signal",
            "Date/Time",
            "Type",
            "Trade #",
        ]);
        let map = ColumnMap::from_headers(&headers).unwrap();
        let row = StringRecord::from((0..15).map(|i| i.to_string()).collect::<Vec<_>>());
        assert_eq!(map.get(&row, Column::TradeNumber), "14");
        assert_eq!(map.get(&row, Column::CumulativePnlPercent), "0");
    }

    #[test]
    fn reports_the_missing_column() {
        let headers = StringRecord::from(vec!["Trade #", "Type", "Date/Time"]);
        assert_eq!(ColumnMap::from_headers(&headers).unwrap_err(), Column::Signal);
    }
}
