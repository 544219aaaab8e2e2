pub(crate) const STYLES: &str = r#"
body { font-family: "Open Sans", sans-serif; margin: 24px 48px; color: #222; }
h1 { color: #174C4F; }
.watchlist-row { display: grid; gap: 16px; margin-bottom: 16px; }
.watchlist-card { border: 1px solid #ddd; border-radius: 8px; padding: 12px; }
.card-top, .card-bottom { display: grid; grid-template-columns: 2fr 1fr; align-items: center; }
.card-bottom { grid-template-columns: 1fr 1fr; }
.watchlist-symbol-name { font-weight: 600; }
.watchlist-ticker { text-align: right; color: #666; }
.watchlist-price-label { font-size: 0.8em; color: #888; }
.watchlist-price-value { font-size: 1.4em; font-weight: 700; }
.change.red, td.red { color: red; }
.change.green, td.green { color: green; }
.overview { max-height: 250px; overflow-y: auto; }
.overview table { border-collapse: collapse; width: 100%; font-size: 0.9em; }
.overview th, .overview td { padding: 4px 8px; text-align: right; white-space: nowrap; }
.overview tr.odd { background-color: #f8f8f8; }
.divider { margin: 24px 0; border: none; border-top: 1px solid #ddd; }
.selectors { display: flex; gap: 24px; margin-bottom: 12px; }
.refresh { float: right; }
.caption { color: #888; font-size: 0.8em; }
.metrics { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; max-width: 640px; }
.metric { border-left: 4px solid #ccc; padding: 8px 12px; }
.metric.low-indicator { border-color: #e57373; }
.metric.high-indicator { border-color: #81c784; }
.metric.bottom-indicator { border-color: #64b5f6; }
.metric-label { font-size: 0.85em; color: #666; }
.metric-value { font-size: 1.5em; font-weight: 600; }
"#;
