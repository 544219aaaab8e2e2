//! Plotly 图表定义（JSON），以及总览表中使用的内联 SVG 迷你图

use serde_json::{json, Value};
use std::fmt::Write;

use crate::models::history::HistoryRecord;

/// 开盘价面积迷你图，不显示坐标轴
pub fn sparkline(series: &[Option<f64>], currency: &str) -> Value {
    json!({
        "data": [{
            "type": "scatter",
            "y": series,
            "mode": "lines",
            "fill": "tozeroy",
            "line": { "color": "red" },
            "fillcolor": "pink",
            "hovertemplate": format!("Price: {} %{{y:.2f}}<extra></extra>", currency),
        }],
        "layout": {
            "showlegend": false,
            "plot_bgcolor": "white",
            "height": 50,
            "margin": { "t": 10, "l": 10, "b": 10, "r": 10, "pad": 0 },
            "xaxis": { "visible": false, "fixedrange": true },
            "yaxis": { "visible": false, "fixedrange": true },
        }
    })
}

/// 上下两栏：K线（70%）与成交量柱（30%），共享横轴
pub fn candlestick(window: &[HistoryRecord]) -> Value {
    let dates: Vec<String> = window
        .iter()
        .map(|r| r.date.format("%Y-%m-%d").to_string())
        .collect();
    let open: Vec<Option<f64>> = window.iter().map(|r| r.open).collect();
    let high: Vec<Option<f64>> = window.iter().map(|r| r.high).collect();
    let low: Vec<Option<f64>> = window.iter().map(|r| r.low).collect();
    let close: Vec<Option<f64>> = window.iter().map(|r| r.close).collect();
    let volume: Vec<Option<f64>> = window.iter().map(|r| r.volume).collect();

    json!({
        "data": [
            {
                "type": "candlestick",
                "name": "INR",
                "x": dates,
                "open": open,
                "high": high,
                "low": low,
                "close": close,
                "xaxis": "x",
                "yaxis": "y",
            },
            {
                "type": "bar",
                "name": "Volume Traded",
                "x": dates,
                "y": volume,
                "xaxis": "x",
                "yaxis": "y2",
            }
        ],
        "layout": {
            "title": {
                "text": "Stock Price Trend",
                "font": { "family": "Open Sans", "color": "#174C4F", "size": 32 },
            },
            "font": { "size": 16 },
            "showlegend": false,
            "hovermode": "x",
            "height": 500,
            "margin": { "l": 80, "r": 80, "t": 100, "b": 80, "pad": 0 },
            "xaxis": {
                "anchor": "y2",
                "title": { "text": "Date" },
                "rangeslider": { "visible": false },
            },
            "yaxis": { "domain": [0.37, 1.0], "title": { "text": "OHLC" } },
            "yaxis2": { "domain": [0.0, 0.27], "title": { "text": "Volume" } },
        }
    })
}

/// 生成挂载图表的 div 与脚本
pub fn embed(id: &str, figure: &Value, show_mode_bar: bool) -> String {
    // 避免 JSON 中的 "</" 提前结束 script 标签
    let figure_json = figure.to_string().replace("</", "<\\/");
    format!(
        "<div id=\"{id}\" class=\"chart\"></div>\n\
         <script>(function(){{var fig={fig};Plotly.newPlot(\"{id}\",fig.data,fig.layout,\
         {{displayModeBar:{bar},responsive:true}});}})();</script>",
        id = id,
        fig = figure_json,
        bar = show_mode_bar,
    )
}

/// 内联 SVG 面积图，空值处断开
pub fn svg_sparkline(series: &[Option<f64>], width: u32, height: u32) -> String {
    let values: Vec<f64> = series.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return String::new();
    }

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min).min(0.0);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };
    let step = if series.len() > 1 {
        width as f64 / (series.len() - 1) as f64
    } else {
        0.0
    };

    let mut svg = format!(
        "<svg class=\"sparkline\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = width,
        h = height
    );

    let mut segment: Vec<(f64, f64)> = Vec::new();
    let mut segments = Vec::new();
    for (i, value) in series.iter().enumerate() {
        match value.filter(|v| v.is_finite()) {
            Some(v) => {
                let x = i as f64 * step;
                let y = height as f64 - (v - lo) / span * height as f64;
                segment.push((x, y));
            }
            None if !segment.is_empty() => segments.push(std::mem::take(&mut segment)),
            None => {}
        }
    }
    if !segment.is_empty() {
        segments.push(segment);
    }

    for points in segments {
        let mut path = String::new();
        let (first_x, _) = points[0];
        let (last_x, _) = points[points.len() - 1];
        let _ = write!(path, "M{:.1},{}", first_x, height);
        for (x, y) in &points {
            let _ = write!(path, " L{:.1},{:.1}", x, y);
        }
        let _ = write!(path, " L{:.1},{} Z", last_x, height);
        let _ = write!(
            svg,
            "<path d=\"{}\" fill=\"pink\" stroke=\"red\" stroke-width=\"1\"/>",
            path
        );
    }

    svg.push_str("</svg>");
    svg
}
