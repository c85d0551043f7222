use crate::report::Statistics;
use core_types::TradeRecord;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Nominal account size every backtest starts from. Period returns are
/// measured against this plus the P&L carried into the period.
pub const NOMINAL_STARTING_EQUITY: Decimal = dec!(10000);

const HUNDRED: Decimal = dec!(100);

/// A stateless calculator that turns a set of trade rows into `Statistics`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatisticsEngine {}

impl StatisticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating the dashboard statistics.
    ///
    /// The input may be in any order. Running metrics are computed over a
    /// stable datetime-ascending view, so rows sharing a timestamp keep their
    /// input order. An empty slice yields all-zero statistics.
    pub fn calculate(&self, trades: &[TradeRecord]) -> Statistics {
        let mut report = Statistics::zero();

        if trades.is_empty() {
            return report;
        }

        let mut sorted: Vec<&TradeRecord> = trades.iter().collect();
        sorted.sort_by_key(|trade| trade.datetime);

        self.calculate_drawdown(&sorted, &mut report);
        self.calculate_profitability(trades, &mut report);
        self.calculate_directional(trades, &mut report);
        self.calculate_period_return(&sorted, &mut report);

        tracing::debug!(
            trades = trades.len(),
            total_pnl = %report.total_pnl,
            max_drawdown = %report.max_drawdown,
            "Calculated statistics."
        );

        report
    }

    /// Largest peak-to-trough fall of cumulative P&L. The peak starts at zero.
    fn calculate_drawdown(&self, sorted: &[&TradeRecord], report: &mut Statistics) {
        let mut peak = Decimal::ZERO;
        let mut max_drawdown = Decimal::ZERO;

        for trade in sorted {
            if trade.cumulative_pnl > peak {
                peak = trade.cumulative_pnl;
            }
            let drawdown = peak - trade.cumulative_pnl;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }

        report.max_drawdown = max_drawdown;
    }

    /// Win rate, average win/loss and the single best and worst rows.
    fn calculate_profitability(&self, trades: &[TradeRecord], report: &mut Statistics) {
        let all = Tally::over(trades.iter());
        report.win_rate = all.win_rate();

        let (mut gross_profit, mut winners) = (Decimal::ZERO, 0usize);
        let (mut gross_loss, mut losers) = (Decimal::ZERO, 0usize);
        for trade in trades {
            if trade.net_pnl > Decimal::ZERO {
                gross_profit += trade.net_pnl;
                winners += 1;
            } else if trade.net_pnl < Decimal::ZERO {
                gross_loss += trade.net_pnl;
                losers += 1;
            }
        }

        if winners > 0 {
            report.avg_win = gross_profit / Decimal::from(winners);
        }
        if losers > 0 {
            report.avg_loss = gross_loss / Decimal::from(losers);
        }

        report.max_win = trades
            .iter()
            .map(|trade| trade.net_pnl)
            .max()
            .unwrap_or_default();
        report.max_loss = trades
            .iter()
            .map(|trade| trade.net_pnl)
            .min()
            .unwrap_or_default();
    }

    /// Long and short breakdown. Both legs of a position count unless the
    /// caller filtered them beforehand.
    fn calculate_directional(&self, trades: &[TradeRecord], report: &mut Statistics) {
        let long = Tally::over(trades.iter().filter(|trade| trade.kind.is_long()));
        let short = Tally::over(trades.iter().filter(|trade| trade.kind.is_short()));

        report.long_win_rate = long.win_rate();
        report.short_win_rate = short.win_rate();
        report.long_pnl = long.pnl;
        report.short_pnl = short.pnl;
    }

    /// P&L and return of the viewed period, anchored to the cumulative P&L
    /// standing just before its first row.
    fn calculate_period_return(&self, sorted: &[&TradeRecord], report: &mut Statistics) {
        let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
            return;
        };

        let baseline = first.cumulative_pnl - first.net_pnl;
        let period_pnl = last.cumulative_pnl - baseline;
        let baseline_equity = NOMINAL_STARTING_EQUITY + baseline;

        report.total_pnl = period_pnl;
        report.total_return = if baseline_equity > Decimal::ZERO {
            period_pnl / baseline_equity * HUNDRED
        } else {
            Decimal::ZERO
        };
    }
}

/// Count, winners and summed P&L of one partition of the trades.
#[derive(Debug, Default)]
struct Tally {
    count: usize,
    winners: usize,
    pnl: Decimal,
}

impl Tally {
    fn over<'a>(trades: impl Iterator<Item = &'a TradeRecord>) -> Self {
        trades.fold(Self::default(), |mut tally, trade| {
            tally.count += 1;
            if trade.net_pnl > Decimal::ZERO {
                tally.winners += 1;
            }
            tally.pnl += trade.net_pnl;
            tally
        })
    }

    fn win_rate(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.winners) / Decimal::from(self.count) * HUNDRED
    }
}
