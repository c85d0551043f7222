use analytics::{Statistics, TradingData};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::Config;
use core_types::{Coin, EmaPeriod, SizingMode, YearFilter};
use indicatif::{ProgressBar, ProgressStyle};
use ingest::{ConversionEvent, JsonRepository, convert_all};
use query::{DatasetStore, FilterOptions, HistoryQuery, SortField, SortOrder, paginate};
use std::path::PathBuf;

mod display;

/// The main entry point for the EMA Lab dashboard tools.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    let _guard = configuration::init_tracing(&config.telemetry)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Convert(args) => {
            if let Some(dir) = args.source_dir {
                config.data.source_dir = dir;
            }
            if let Some(dir) = args.output_dir {
                config.data.output_dir = dir;
            }
            handle_convert(&config)
        }
        Commands::Stats(args) => handle_stats(&config, args),
        Commands::Trades(args) => handle_trades(&config, args),
        Commands::Serve(args) => {
            if let Some(port) = args.port {
                config.server.port = port;
            }
            handle_serve(config).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Convert and explore EMA trend-following backtest results.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the backtester's CSV exports into JSON datasets.
    Convert(ConvertArgs),
    /// Show the statistics for one filter selection.
    Stats(FilterArgs),
    /// Show one page of the trade history for a filter selection.
    Trades(TradesArgs),
    /// Serve the dashboard API.
    Serve(ServeArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Overrides `data.source_dir`.
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Overrides `data.output_dir`.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
struct FilterArgs {
    /// BTC, ETH, SOL or ADA.
    #[arg(long, default_value = "BTC")]
    coin: Coin,

    /// 120 or 200.
    #[arg(long, default_value = "120")]
    ema_period: EmaPeriod,

    /// full or fixed.
    #[arg(long, default_value = "full")]
    mode: SizingMode,

    /// A year between 2017 and 2025, or "all".
    #[arg(long, default_value = "all")]
    year: YearFilter,
}

impl FilterArgs {
    fn options(&self) -> FilterOptions {
        FilterOptions::new(self.coin, self.ema_period, self.mode, self.year)
    }
}

#[derive(Args)]
struct TradesArgs {
    #[command(flatten)]
    filters: FilterArgs,

    /// Column to sort by, e.g. datetime, netPnl, signal.
    #[arg(long, default_value = "datetime")]
    sort: SortField,

    /// asc or desc.
    #[arg(long, default_value = "desc")]
    order: SortOrder,

    #[arg(long, default_value_t = 1)]
    page: usize,

    #[arg(long, default_value_t = query::history::DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

#[derive(Args)]
struct ServeArgs {
    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_convert(config: &Config) -> anyhow::Result<()> {
    let repository = JsonRepository::new(&config.data.output_dir);
    println!(
        "Converting exports from {} into {}",
        config.data.source_dir.display(),
        repository.dir().display()
    );

    let progress_bar = ProgressBar::new(core_types::DatasetKey::all().count() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = convert_all(&config.data.source_dir, &repository, |event| {
        let message = match event {
            ConversionEvent::Converted { key, trades } => format!("{key}: {trades} trades"),
            ConversionEvent::Missing { key, .. } => format!("{key}: not found"),
            ConversionEvent::Failed { key, .. } => format!("{key}: failed"),
        };
        progress_bar.set_message(message);
        progress_bar.inc(1);
    })?;
    progress_bar.finish_with_message("Conversion complete!");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Dataset", "Status", "Detail"]);
    for (key, trades) in &report.converted {
        table.add_row(vec![key.to_string(), "converted".into(), format!("{trades} trades")]);
    }
    for (key, path) in &report.missing {
        table.add_row(vec![key.to_string(), "missing".into(), path.display().to_string()]);
    }
    for (key, error) in &report.failed {
        table.add_row(vec![key.to_string(), "failed".into(), error.clone()]);
    }
    println!("{table}");
    println!(
        "{} datasets converted ({} trades), {} missing, {} failed.",
        report.converted.len(),
        report.total_trades(),
        report.missing.len(),
        report.failed.len()
    );
    println!("Summary written to {}", report.summary.display());
    tracing::info!(
        converted = report.converted.len(),
        missing = report.missing.len(),
        failed = report.failed.len(),
        "Conversion finished."
    );

    if report.has_failures() {
        anyhow::bail!("{} dataset(s) failed to convert", report.failed.len());
    }
    Ok(())
}

fn load_store(config: &Config) -> anyhow::Result<DatasetStore> {
    let repository = JsonRepository::new(&config.data.output_dir);
    let datasets = repository.load_all().with_context(|| {
        format!(
            "Failed to load datasets from {}",
            config.data.output_dir.display()
        )
    })?;
    Ok(DatasetStore::new(datasets))
}

/// Prints the empty-state notice and returns `None` when there is nothing to show.
fn select<'a>(store: &'a DatasetStore, filters: &FilterOptions) -> Option<std::borrow::Cow<'a, TradingData>> {
    match store.select_dataset(filters) {
        None => {
            println!(
                "No data for {} (year: {}). Run `emalab convert` first.",
                filters.key(),
                filters.year
            );
            None
        }
        Some(dataset) if dataset.trades.is_empty() => {
            println!("No trades for {} in {}.", filters.key(), filters.year);
            None
        }
        Some(dataset) => Some(dataset),
    }
}

fn handle_stats(config: &Config, args: FilterArgs) -> anyhow::Result<()> {
    let store = load_store(config)?;
    let filters = args.options();
    let Some(dataset) = select(&store, &filters) else {
        return Ok(());
    };

    println!("{} (year: {}), {} trades", filters.key(), filters.year, dataset.trades.len());
    println!("{}", statistics_table(&dataset.statistics));
    Ok(())
}

fn statistics_table(stats: &Statistics) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Total return", display::percent(stats.total_return)),
        ("Total P&L", display::currency(stats.total_pnl)),
        ("Max drawdown", display::currency(stats.max_drawdown)),
        ("Win rate", display::win_rate(stats.win_rate)),
        ("Average win", display::currency(stats.avg_win)),
        ("Average loss", display::currency(stats.avg_loss)),
        ("Largest win", display::currency(stats.max_win)),
        ("Largest loss", display::currency(stats.max_loss)),
        ("Long win rate", display::win_rate(stats.long_win_rate)),
        ("Short win rate", display::win_rate(stats.short_win_rate)),
        ("Long P&L", display::currency(stats.long_pnl)),
        ("Short P&L", display::currency(stats.short_pnl)),
    ];
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    table
}

fn handle_trades(config: &Config, args: TradesArgs) -> anyhow::Result<()> {
    let store = load_store(config)?;
    let filters = args.filters.options();
    let Some(dataset) = select(&store, &filters) else {
        return Ok(());
    };

    let history = HistoryQuery {
        sort: args.sort,
        order: args.order,
        page: args.page,
        page_size: args.page_size,
    };
    let page = paginate(&dataset.trades, &history);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "#", "Type", "Date/Time", "Signal", "Price", "Net P&L", "Net P&L %", "Cumulative P&L",
    ]);
    for trade in &page.trades {
        table.add_row(vec![
            trade.trade_number.to_string(),
            trade.kind.label().to_string(),
            core_types::datetime::format(&trade.datetime),
            trade.signal.clone(),
            display::currency(trade.price),
            display::currency(trade.net_pnl),
            display::percent(trade.net_pnl_percent),
            display::currency(trade.cumulative_pnl),
        ]);
    }
    println!("{table}");
    println!(
        "Page {} of {} ({} trades, sorted by {} {})",
        page.page,
        page.total_pages.max(1),
        page.total_trades,
        page.sort,
        page.order
    );
    Ok(())
}

async fn handle_serve(config: Config) -> anyhow::Result<()> {
    let store = load_store(&config)?;
    let addr = config
        .server
        .socket_addr()
        .with_context(|| format!("Invalid server address {}", config.server.address()))?;
    tracing::info!(%addr, datasets = store.len(), "Starting dashboard server.");
    web_server::run_server(addr, store, config.server.static_dir.as_deref()).await
}
