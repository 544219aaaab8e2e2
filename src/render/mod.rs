//! 仪表盘页面渲染：关注列表卡片、总览表、K线详情与指标

pub mod charts;
pub mod format;
mod styles;

use chrono::NaiveDate;
use std::fmt::Write;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::errors::{DashboardError, Result};
use crate::metrics::WindowMetrics;
use crate::models::table::{Cell, RawTable};
use crate::models::ticker::{TickerRecord, OPEN_SERIES_COLUMN};
use crate::window::Period;

use format::{escape_html, format_currency, format_number, format_percentage, format_volume};

/// 按 `n` 个一组切分，最后一组可以不满；`n` 必须至少为 1
pub fn batched<T>(items: &[T], n: usize) -> Result<std::slice::Chunks<'_, T>> {
    if n < 1 {
        return Err(DashboardError::DataError(
            "batch size must be at least one".to_string(),
        ));
    }
    Ok(items.chunks(n))
}

/// 总览表可见的列：去掉隐藏列（采集元数据等）
pub fn visible_columns(table: &RawTable, hidden: &[String]) -> Vec<usize> {
    table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, name)| !hidden.iter().any(|h| h == *name))
        .map(|(idx, _)| idx)
        .collect()
}

/// 渲染完整页面
///
/// `symbol` 为空时显示第一个代码。`interactive` 为 true 时详情区带选择表单（服务模式），
/// 否则只显示当前选择（静态文件）。
pub fn render_dashboard(
    dataset: &Dataset,
    config: &Config,
    symbol: Option<&str>,
    period: Period,
    today: NaiveDate,
    interactive: bool,
) -> Result<String> {
    let symbol = match symbol {
        Some(s) => s.to_string(),
        None => dataset
            .symbols()
            .next()
            .map(String::from)
            .ok_or_else(|| DashboardError::DataError("No tickers to display".to_string()))?,
    };

    let ticker = dataset.ticker(&symbol)?;
    let window = dataset.window(&symbol, period, today)?;
    let metrics = WindowMetrics::compute(ticker, window)?;

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Stocks Dashboard</title>\n");
    html.push_str("<script src=\"https://cdn.plot.ly/plotly-2.35.2.min.js\"></script>\n");
    let _ = writeln!(html, "<style>{}</style>", styles::STYLES);
    html.push_str("</head>\n<body>\n<h1>Stocks Dashboard</h1>\n");

    html.push_str(&render_watchlist(dataset.tickers(), config)?);
    html.push_str(&render_overview(dataset, config));
    html.push_str("<hr class=\"divider\">\n");
    html.push_str(&render_detail(dataset, config, &symbol, period, interactive));
    html.push_str(&charts::embed("candlestick", &charts::candlestick(window), true));
    html.push_str(&render_metrics(&metrics, &config.currency_symbol));
    html.push_str("</section>\n</body>\n</html>\n");

    Ok(html)
}

fn render_watchlist(tickers: &[TickerRecord], config: &Config) -> Result<String> {
    let mut html = String::from("<section class=\"watchlist\">\n");
    let mut card_no = 0;

    for row in batched(tickers, config.cards_per_row)? {
        let _ = writeln!(
            html,
            "<div class=\"watchlist-row\" style=\"grid-template-columns: repeat({}, 1fr)\">",
            config.cards_per_row
        );
        for ticker in row {
            html.push_str(&render_card(ticker, &config.currency_symbol, card_no));
            card_no += 1;
        }
        html.push_str("</div>\n");
    }

    html.push_str("</section>\n");
    Ok(html)
}

fn render_card(ticker: &TickerRecord, currency: &str, card_no: usize) -> String {
    let falling = ticker.is_falling();
    let (color, icon) = if falling { ("red", "📉") } else { ("green", "📈") };
    let price = match ticker.last_price {
        Some(p) => format!("{} {:.2}", currency, p),
        None => "n/a".to_string(),
    };

    let mut html = String::from("<div class=\"watchlist-card\">\n");
    let _ = writeln!(
        html,
        "<div class=\"card-top\"><div class=\"watchlist-symbol-name\">{}</div>\
         <div class=\"watchlist-ticker\">{}<div class=\"change {}\">{} {}</div></div></div>",
        escape_html(&ticker.name),
        escape_html(&ticker.symbol),
        color,
        icon,
        format_percentage(ticker.change_pct),
    );
    let _ = writeln!(
        html,
        "<div class=\"card-bottom\"><div><div class=\"watchlist-price-label\">Current Value</div>\
         <div class=\"watchlist-price-value\">{}</div></div><div class=\"watchlist-br\">",
        escape_html(&price)
    );
    html.push_str(&charts::embed(
        &format!("spark-{}", card_no),
        &charts::sparkline(&ticker.open_series, currency),
        false,
    ));
    html.push_str("</div></div>\n</div>\n");
    html
}

fn render_overview(dataset: &Dataset, config: &Config) -> String {
    let table = dataset.ticker_table(&config.ticker_worksheet);
    let columns = visible_columns(&table, &config.hidden_columns);
    let price_idx = table.column_index("last_price").ok();
    let change_idx = table.column_index("change_pct").ok();
    let currency = &config.currency_symbol;

    let mut html = String::from("<section class=\"overview\">\n<table>\n<thead><tr>");
    for &idx in &columns {
        let _ = write!(html, "<th>{}</th>", escape_html(&table.columns[idx]));
    }
    let _ = writeln!(
        html,
        "<th title=\"{} Price for last 12 Months\">Last 12 months</th></tr></thead>",
        OPEN_SERIES_COLUMN
    );
    html.push_str("<tbody>\n");

    for (row, ticker) in dataset.tickers().iter().enumerate() {
        let class = if row % 2 != 0 { " class=\"odd\"" } else { "" };
        let _ = write!(html, "<tr{}>", class);
        for &idx in &columns {
            if Some(idx) == price_idx {
                let price = format_currency(currency, ticker.last_price);
                let _ = write!(html, "<td>{}</td>", escape_html(&price));
            } else if Some(idx) == change_idx {
                let color = if ticker.is_falling() { "red" } else { "green" };
                let pct = format_percentage(ticker.change_pct);
                let _ = write!(html, "<td class=\"{}\">{}</td>", color, pct);
            } else {
                let text = cell_text(table.cell(row, idx));
                let _ = write!(html, "<td>{}</td>", escape_html(&text));
            }
        }
        let spark = charts::svg_sparkline(&ticker.open_series, 160, 30);
        let _ = writeln!(html, "<td>{}</td></tr>", spark);
    }

    html.push_str("</tbody>\n</table>\n</section>\n");
    html
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) if n.fract() != 0.0 => format_number(*n, 2),
        Cell::Number(n) => format_number(*n, 0),
        other => other.to_string(),
    }
}

fn render_detail(
    dataset: &Dataset,
    config: &Config,
    symbol: &str,
    period: Period,
    interactive: bool,
) -> String {
    let mut html = String::from("<section class=\"detail\">\n");

    if interactive {
        html.push_str("<form method=\"get\" action=\"/\" class=\"selectors\">\n");
        html.push_str("<label>📑 Currently Showing <select name=\"symbol\">");
        for s in dataset.symbols() {
            let selected = if s == symbol { " selected" } else { "" };
            let _ = write!(
                html,
                "<option value=\"{0}\"{1}>{0}</option>",
                escape_html(s),
                selected
            );
        }
        html.push_str("</select></label>\n<label>⌚ Period <select name=\"period\">");
        for p in Period::ALL {
            let selected = if p == period { " selected" } else { "" };
            let _ = write!(html, "<option value=\"{0}\"{1}>{0}</option>", p, selected);
        }
        html.push_str("</select></label>\n<button type=\"submit\">Show</button>\n</form>\n");
        html.push_str(
            "<form method=\"post\" action=\"/refresh\" class=\"refresh\">\
             <button type=\"submit\">Refresh data</button></form>\n",
        );
    } else {
        let _ = writeln!(
            html,
            "<div class=\"selectors\"><span>📑 Currently Showing: <b>{}</b></span>\
             <span>⌚ Period: <b>{}</b></span></div>",
            escape_html(symbol),
            period
        );
    }

    let _ = writeln!(
        html,
        "<p class=\"caption\">Prices in {}</p>",
        escape_html(&config.currency_symbol)
    );
    html
}

fn render_metrics(metrics: &WindowMetrics, currency: &str) -> String {
    let items = [
        (
            "low-indicator",
            "Lowest Volume Day Trade",
            format_volume(metrics.lowest_volume),
        ),
        (
            "low-indicator",
            "Lowest Close Price",
            format_currency(currency, Some(metrics.lowest_close)),
        ),
        (
            "high-indicator",
            "Highest Volume Day Trade",
            format_volume(metrics.highest_volume),
        ),
        (
            "high-indicator",
            "Highest Close Price",
            format_currency(currency, Some(metrics.highest_close)),
        ),
        (
            "bottom-indicator",
            "Average Daily Volume",
            format_number(metrics.average_volume as f64, 0),
        ),
        (
            "bottom-indicator",
            "Current Market Cap",
            format_currency(currency, metrics.market_cap),
        ),
    ];

    let mut html = String::from("<div class=\"metrics\">\n");
    for (class, label, value) in items {
        let _ = writeln!(
            html,
            "<div class=\"metric {}\"><div class=\"metric-label\">{}</div>\
             <div class=\"metric-value\">{}</div></div>",
            class,
            label,
            escape_html(&value)
        );
    }
    html.push_str("</div>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batched() {
        let items = [1, 2, 3, 4, 5, 6, 7];
        let batches: Vec<&[i32]> = batched(&items, 3).unwrap().collect();
        assert_eq!(batches, vec![&[1, 2, 3][..], &[4, 5, 6][..], &[7][..]]);
        assert!(batched(&items, 0).is_err());
    }

    #[test]
    fn test_visible_columns_hides_metadata() {
        let table = RawTable::new(
            "ticker",
            ["ticker", "_airbyte_raw_id", "eps", "_airbyte_meta"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            vec![],
        );
        let hidden = Config::new().hidden_columns;
        assert_eq!(visible_columns(&table, &hidden), vec![0, 2]);
    }

    #[test]
    fn test_overview_follows_source_columns() {
        use chrono::NaiveDate;
        use std::collections::HashMap;

        let time = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let name = "TCS Ltd".to_string();
        let mut record = TickerRecord::new("TCS".to_string(), name, time, [None; 12]);
        record.last_price = Some(3500.0);
        record.extras = vec![
            ("sector".to_string(), Cell::Text("IT".to_string())),
            ("_airbyte_meta".to_string(), Cell::Text("{}".to_string())),
        ];

        let mut histories = HashMap::new();
        histories.insert("TCS".to_string(), vec![]);
        let columns = ["sector", "ticker", "last_price", "_airbyte_meta"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let dataset = Dataset::new_with_data(vec![record], histories)
            .unwrap()
            .with_ticker_columns(columns);

        let html = render_overview(&dataset, &Config::new());
        let sector = html.find("<th>sector</th>").unwrap();
        let ticker = html.find("<th>ticker</th>").unwrap();
        let price = html.find("<th>last_price</th>").unwrap();
        assert!(sector < ticker && ticker < price);
        assert!(!html.contains("_airbyte_meta"));
        assert!(html.contains("<td>IT</td><td>TCS</td><td>₹ 3,500.00</td>"));
    }

    #[test]
    fn test_metrics_block() {
        let metrics = WindowMetrics {
            lowest_volume: 100.0,
            highest_volume: 300.0,
            lowest_close: 5.0,
            highest_close: 20.0,
            average_volume: 200,
            market_cap: None,
        };
        let html = render_metrics(&metrics, "₹");
        assert!(html.contains("₹ 20.00"));
        assert!(html.contains(">300<"));
        assert_eq!(html.matches("class=\"metric ").count(), 6);
    }
}
