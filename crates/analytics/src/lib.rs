//! # EMA Lab Analytics
//!
//! Turns the trade rows of a backtest (or any slice of them) into the
//! dashboard's statistics and chart series.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no shared state. It depends only on `core-types`.
//! - **Order independent:** callers may pass rows in any order; the engine
//!   sorts by datetime itself before computing running metrics.
//!
//! ## Public API
//!
//! - `StatisticsEngine`: the stateless calculator.
//! - `Statistics`: the twelve summary metrics.
//! - `TradingData`: a dataset's trades plus its statistics.
//! - `ChartSeries`: closed trades as chart points.

pub mod engine;
pub mod report;
pub mod series;

pub use engine::{NOMINAL_STARTING_EQUITY, StatisticsEngine};
pub use report::{Statistics, TradingData};
pub use series::{ChartPoint, ChartSeries};
