use crate::{AppState, error::AppError};
use analytics::{ChartSeries, Statistics, TradingData};
use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use core_types::{Coin, DatasetKey, EmaPeriod, SizingMode, YearFilter};
use query::{FilterChoices, FilterOptions, HistoryQuery, TradePage, filter_choices, paginate};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;

/// Raw filter parameters. Absent values fall back to the dashboard defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    coin: Option<String>,
    ema_period: Option<String>,
    mode: Option<String>,
    year: Option<String>,
}

impl FilterParams {
    fn parse(&self) -> Result<FilterOptions, AppError> {
        let defaults = FilterOptions::default();
        Ok(FilterOptions::new(
            parse_or(self.coin.as_deref(), defaults.coin)?,
            parse_or(self.ema_period.as_deref(), defaults.ema_period)?,
            parse_or(self.mode.as_deref(), defaults.mode)?,
            parse_or(self.year.as_deref(), defaults.year)?,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParams {
    sort: Option<String>,
    order: Option<String>,
    page: Option<String>,
    page_size: Option<String>,
}

impl HistoryParams {
    fn parse(&self) -> Result<HistoryQuery, AppError> {
        let defaults = HistoryQuery::default();
        Ok(HistoryQuery {
            sort: parse_or(self.sort.as_deref(), defaults.sort)?,
            order: parse_or(self.order.as_deref(), defaults.order)?,
            page: parse_count("page", self.page.as_deref(), defaults.page)?,
            page_size: parse_count("pageSize", self.page_size.as_deref(), defaults.page_size)?,
        })
    }
}

fn parse_or<T>(raw: Option<&str>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    AppError: From<T::Err>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => Ok(value.parse()?),
    }
}

fn parse_count(name: &'static str, raw: Option<&str>, default: usize) -> Result<usize, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| AppError::InvalidParameter {
            name,
            value: value.to_string(),
        }),
    }
}

/// # GET /api/filters
pub async fn get_filters() -> Json<FilterChoices> {
    Json(filter_choices())
}

/// One loaded dataset without its trade rows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub key: DatasetKey,
    pub coin: Coin,
    pub ema_period: EmaPeriod,
    pub mode: SizingMode,
    pub trade_count: usize,
    pub years: Vec<i32>,
    pub statistics: Statistics,
}

/// # GET /api/datasets
pub async fn get_datasets(State(state): State<Arc<AppState>>) -> Json<Vec<DatasetSummary>> {
    let summaries = state
        .store
        .datasets()
        .into_iter()
        .map(|dataset| {
            let key = dataset.key();
            DatasetSummary {
                key,
                coin: dataset.coin,
                ema_period: dataset.ema_period,
                mode: dataset.mode,
                trade_count: dataset.trades.len(),
                years: state.store.years(&key),
                statistics: dataset.statistics.clone(),
            }
        })
        .collect();
    Json(summaries)
}

/// The dashboard view for one filter selection.
///
/// `data` is `null` when the combination was never converted, which the
/// front end renders as an empty state rather than an error.
#[derive(Debug, Serialize)]
pub struct Dashboard<'a> {
    pub key: DatasetKey,
    pub year: YearFilter,
    pub data: Option<Cow<'a, TradingData>>,
    pub chart: ChartSeries,
}

/// # GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Response, AppError> {
    let filters = params.parse()?;
    let data = state.store.select_dataset(&filters);
    let chart = data
        .as_ref()
        .map(|dataset| ChartSeries::from_trades(&dataset.trades))
        .unwrap_or_default();
    tracing::debug!(key = %filters.key(), year = %filters.year, found = data.is_some(), "Dashboard query.");

    let dashboard = Dashboard {
        key: filters.key(),
        year: filters.year,
        data,
        chart,
    };
    Ok(Json(dashboard).into_response())
}

/// # GET /api/trades
pub async fn get_trades(
    State(state): State<Arc<AppState>>,
    Query(filter_params): Query<FilterParams>,
    Query(history_params): Query<HistoryParams>,
) -> Result<Json<TradePage>, AppError> {
    let filters = filter_params.parse()?;
    let history = history_params.parse()?;
    let page = match state.store.select_dataset(&filters) {
        Some(dataset) => paginate(&dataset.trades, &history),
        None => paginate(&[], &history),
    };
    tracing::debug!(key = %filters.key(), page = page.page, total = page.total_trades, "Trade history query.");
    Ok(Json(page))
}
