use stock_dashboard::config::Config;
use stock_dashboard::metrics::WindowMetrics;
use stock_dashboard::render;
use stock_dashboard::render::format::{format_number, format_volume};
use stock_dashboard::server::{self, AppState};
use stock_dashboard::services::loader::Loader;
use stock_dashboard::sources::{CsvDirSource, GoogleSheetSource, SheetSource, XlsxSource};
use stock_dashboard::window::Period;

use anyhow::{bail, Context};
use clap::{App, Arg, ArgMatches, SubCommand};
use log::info;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let app = App::new("Stocks Dashboard")
        .version("1.0.0")
        .about("Watchlist and candlestick dashboard over spreadsheet market data")
        .arg(
            Arg::with_name("xlsx")
                .long("xlsx")
                .value_name("PATH")
                .help("Read worksheets from a local workbook")
                .takes_value(true)
                .conflicts_with_all(&["gsheet", "csv-dir"]),
        )
        .arg(
            Arg::with_name("gsheet")
                .long("gsheet")
                .value_name("SPREADSHEET_ID")
                .help("Read worksheets from a published Google Sheet")
                .takes_value(true)
                .conflicts_with("csv-dir"),
        )
        .arg(
            Arg::with_name("csv-dir")
                .long("csv-dir")
                .value_name("DIR")
                .help("Read worksheets from <DIR>/<worksheet>.csv")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("ticker-sheet")
                .long("ticker-sheet")
                .value_name("NAME")
                .help("Name of the ticker worksheet")
                .takes_value(true)
                .default_value("ticker"),
        )
        .arg(
            Arg::with_name("tz")
                .long("tz")
                .value_name("TIMEZONE")
                .help("Timezone defining 'today' for the period window (e.g. Asia/Kolkata)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("currency")
                .long("currency")
                .value_name("SYMBOL")
                .help("Currency symbol used for prices")
                .takes_value(true)
                .default_value("₹"),
        )
        .arg(
            Arg::with_name("cards-per-row")
                .long("cards-per-row")
                .value_name("N")
                .help("Watchlist cards per row")
                .takes_value(true)
                .default_value("4"),
        )
        .arg(
            Arg::with_name("hide-column")
                .long("hide-column")
                .value_name("COLUMN")
                .help("Ticker column to leave out of the overview table (repeatable)")
                .takes_value(true)
                .multiple_occurrences(true),
        );

    // 添加子命令
    let app = app
        .subcommand(
            SubCommand::with_name("render")
                .about("Render the dashboard to a static HTML file")
                .arg(
                    Arg::with_name("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .takes_value(true)
                        .default_value("dashboard.html"),
                )
                .arg(symbol_arg())
                .arg(period_arg()),
        )
        .subcommand(
            SubCommand::with_name("serve")
                .about("Serve the dashboard over HTTP")
                .arg(
                    Arg::with_name("bind")
                        .short('b')
                        .long("bind")
                        .value_name("ADDR")
                        .takes_value(true)
                        .default_value("127.0.0.1:8501"),
                ),
        )
        .subcommand(
            SubCommand::with_name("explore")
                .about("Log a symbol's window rows and metrics")
                .arg(symbol_arg())
                .arg(period_arg())
                .arg(
                    Arg::with_name("limit")
                        .short('l')
                        .long("limit")
                        .value_name("LIMIT")
                        .help("Limit the number of rows to display")
                        .takes_value(true)
                        .default_value("10"),
                ),
        );

    let matches = app.get_matches();

    let timezone = match matches.value_of("tz") {
        Some(name) => Some(
            name.parse::<chrono_tz::Tz>()
                .map_err(|e| anyhow::anyhow!("invalid timezone {}: {}", name, e))?,
        ),
        None => None,
    };

    let cards_per_row = matches
        .value_of("cards-per-row")
        .unwrap_or("4")
        .parse::<usize>()
        .context("parsing --cards-per-row")?;
    if cards_per_row < 1 {
        bail!("--cards-per-row must be at least 1");
    }

    let mut hidden_columns = Config::new().hidden_columns;
    if let Some(columns) = matches.values_of("hide-column") {
        hidden_columns.extend(columns.map(String::from));
    }

    let mut config = Config::new()
        .with_ticker_worksheet(matches.value_of("ticker-sheet").unwrap_or("ticker"))
        .with_timezone(timezone)
        .with_currency_symbol(matches.value_of("currency").unwrap_or("₹"))
        .with_cards_per_row(cards_per_row)
        .with_hidden_columns(hidden_columns);

    let source = build_source(&matches)?;
    info!("Using source {}", source.source_id());

    if let Some(matches) = matches.subcommand_matches("render") {
        let period = parse_period(matches)?;
        let output = matches.value_of("output").unwrap_or("dashboard.html");

        let dataset = Loader::new(&config).load_dataset(source.as_ref()).await?;
        let html = render::render_dashboard(
            &dataset,
            &config,
            matches.value_of("symbol"),
            period,
            config.today(),
            false,
        )?;
        std::fs::write(output, html).with_context(|| format!("writing {}", output))?;
        info!("Dashboard written to {}", output);
    } else if let Some(matches) = matches.subcommand_matches("serve") {
        config = config.with_bind_addr(matches.value_of("bind").unwrap_or("127.0.0.1:8501"));
        server::serve(AppState::new(source, config)).await?;
    } else if let Some(matches) = matches.subcommand_matches("explore") {
        let period = parse_period(matches)?;
        let limit = matches
            .value_of("limit")
            .unwrap_or("10")
            .parse::<usize>()
            .unwrap_or(10);

        let dataset = Loader::new(&config).load_dataset(source.as_ref()).await?;
        info!("Found {} tickers", dataset.tickers().len());

        let symbol = match matches.value_of("symbol") {
            Some(s) => s.to_string(),
            None => match dataset.symbols().next() {
                Some(s) => s.to_string(),
                None => bail!("no tickers in source"),
            },
        };

        let ticker = dataset.ticker(&symbol)?;
        let window = dataset.window(&symbol, period, config.today())?;

        info!("Stock: {} ({}) - {} window", ticker.name, ticker.symbol, period);
        info!("{:-<60}", "");
        info!(
            "{:<12} {:<10} {:<10} {:<10} {:<10} {:<15}",
            "Date", "Open", "High", "Low", "Close", "Volume"
        );
        info!("{:-<60}", "");

        for row in window.iter().take(limit) {
            info!(
                "{:<12} {:<10} {:<10} {:<10} {:<10} {:<15}",
                row.date.format("%Y-%m-%d"),
                fmt_opt(row.open),
                fmt_opt(row.high),
                fmt_opt(row.low),
                fmt_opt(row.close),
                row.volume.map(format_volume).unwrap_or_else(|| "-".to_string()),
            );
        }
        if window.len() > limit {
            info!("... and {} more records", window.len() - limit);
        }

        let metrics = WindowMetrics::compute(ticker, window)?;
        info!("Lowest volume: {}", format_volume(metrics.lowest_volume));
        info!("Highest volume: {}", format_volume(metrics.highest_volume));
        info!("Lowest close: {}", format_number(metrics.lowest_close, 2));
        info!("Highest close: {}", format_number(metrics.highest_close, 2));
        info!("Average volume: {}", format_number(metrics.average_volume as f64, 0));
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}

fn symbol_arg() -> Arg<'static> {
    Arg::with_name("symbol")
        .short('s')
        .long("symbol")
        .value_name("SYMBOL")
        .help("Symbol for the detail view (defaults to the first ticker)")
        .takes_value(true)
}

fn period_arg() -> Arg<'static> {
    Arg::with_name("period")
        .short('p')
        .long("period")
        .value_name("PERIOD")
        .help("Week, Month, Trimester or Year")
        .takes_value(true)
        .default_value("Month")
}

fn parse_period(matches: &ArgMatches) -> anyhow::Result<Period> {
    Ok(matches.value_of("period").unwrap_or("Month").parse::<Period>()?)
}

fn build_source(matches: &ArgMatches) -> anyhow::Result<Arc<dyn SheetSource + Send + Sync>> {
    if let Some(path) = matches.value_of("xlsx") {
        Ok(Arc::new(XlsxSource::new(path)?))
    } else if let Some(id) = matches.value_of("gsheet") {
        Ok(Arc::new(GoogleSheetSource::new(id)?))
    } else if let Some(dir) = matches.value_of("csv-dir") {
        Ok(Arc::new(CsvDirSource::new(dir)))
    } else {
        bail!("one of --xlsx, --gsheet or --csv-dir is required")
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format_number(v, 2))
        .unwrap_or_else(|| "-".to_string())
}
