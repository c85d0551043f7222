use crate::columns::{Column, ColumnMap};
use crate::error::IngestError;
use chrono::Datelike;
use core_types::{TradeKind, TradeRecord, datetime};
use csv::StringRecord;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Reads every row of a trade-list export.
pub fn read_trades(path: &Path) -> Result<Vec<TradeRecord>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trades(file, path)
}

/// Parses a trade-list export from any reader. `source` only labels errors.
///
/// Any malformed cell fails the whole file: a silently dropped row would
/// shift every running total computed from it.
pub fn parse_trades<R: Read>(reader: R, source: &Path) -> Result<Vec<TradeRecord>, IngestError> {
    let csv_error = |err: csv::Error| IngestError::Csv {
        path: source.to_path_buf(),
        source: err,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_error)?.clone();
    let columns = ColumnMap::from_headers(&headers).map_err(|column| IngestError::MissingColumn {
        path: source.to_path_buf(),
        column: column.name(),
    })?;

    let mut trades = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_error)?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let row = RowParser {
            columns: &columns,
            record: &record,
            source,
        };
        trades.push(row.parse()?);
    }

    tracing::debug!(path = %source.display(), rows = trades.len(), "Parsed trade list.");
    Ok(trades)
}

struct RowParser<'a> {
    columns: &'a ColumnMap,
    record: &'a StringRecord,
    source: &'a Path,
}

impl RowParser<'_> {
    fn line(&self) -> u64 {
        self.record.position().map(|pos| pos.line()).unwrap_or_default()
    }

    fn text(&self, column: Column) -> &str {
        self.columns.get(self.record, column)
    }

    fn invalid(&self, column: Column) -> IngestError {
        IngestError::InvalidField {
            path: self.source.to_path_buf(),
            line: self.line(),
            column: column.name(),
            value: self.text(column).to_string(),
        }
    }

    fn decimal(&self, column: Column) -> Result<Decimal, IngestError> {
        let raw = self.text(column).replace(',', "");
        if raw.is_empty() {
            return Err(self.invalid(column));
        }
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| self.invalid(column))
    }

    fn parse(&self) -> Result<TradeRecord, IngestError> {
        let invalid_record = |source| IngestError::InvalidRecord {
            path: self.source.to_path_buf(),
            line: self.line(),
            source,
        };

        let trade_number = self
            .text(Column::TradeNumber)
            .parse::<u32>()
            .map_err(|_| self.invalid(Column::TradeNumber))?;
        let kind: TradeKind = self.text(Column::Type).parse().map_err(invalid_record)?;
        let datetime = datetime::parse(self.text(Column::Datetime)).map_err(invalid_record)?;

        Ok(TradeRecord {
            trade_number,
            kind,
            datetime,
            signal: self.text(Column::Signal).to_string(),
            price: self.decimal(Column::Price)?,
            position_size: self.decimal(Column::PositionSize)?,
            position_value: self.decimal(Column::PositionValue)?,
            net_pnl: self.decimal(Column::NetPnl)?,
            net_pnl_percent: self.decimal(Column::NetPnlPercent)?,
            max_profit: self.decimal(Column::MaxProfit)?,
            max_profit_percent: self.decimal(Column::MaxProfitPercent)?,
            max_loss: self.decimal(Column::MaxLoss)?,
            max_loss_percent: self.decimal(Column::MaxLossPercent)?,
            cumulative_pnl: self.decimal(Column::CumulativePnl)?,
            cumulative_pnl_percent: self.decimal(Column::CumulativePnlPercent)?,
            year: datetime.year(),
        })
    }
}
