//! SVG chart rendering for backtest reports.
//!
//! Produces two standalone SVG files: the price with both moving averages
//! and buy/sell markers, and the total equity curve.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::backtest::{BacktestConfig, BacktestRun};
use crate::domain::error::CrossoverError;
use crate::domain::portfolio::PortfolioSeries;
use crate::domain::signal::SignalSeries;
use crate::ports::report_port::ReportPort;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 50.0;
const MARKER_SIZE: f64 = 7.0;

pub const SIGNALS_FILE: &str = "signals.svg";
pub const EQUITY_FILE: &str = "equity.svg";

#[derive(Debug, Default)]
pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for SvgChartAdapter {
    fn write(
        &self,
        run: &BacktestRun,
        config: &BacktestConfig,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, CrossoverError> {
        fs::create_dir_all(output_dir)?;

        let signals_path = output_dir.join(SIGNALS_FILE);
        let title = format!(
            "{} Moving Average Crossover ({}/{})",
            config.ticker, config.short_window, config.long_window
        );
        fs::write(&signals_path, render_signals_chart(&run.signals, &title))?;

        let equity_path = output_dir.join(EQUITY_FILE);
        fs::write(
            &equity_path,
            render_equity_chart(&run.portfolio, "Portfolio Value"),
        )?;

        Ok(vec![signals_path, equity_path])
    }
}

/// Maps series index and value onto the plot area.
struct Scale {
    min: f64,
    max: f64,
    len: usize,
}

impl Scale {
    fn new<I: IntoIterator<Item = f64>>(values: I, len: usize) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        Self { min, max, len }
    }

    fn x(&self, i: usize) -> f64 {
        let plot_width = WIDTH - 2.0 * PADDING;
        if self.len > 1 {
            PADDING + i as f64 * plot_width / (self.len - 1) as f64
        } else {
            PADDING + plot_width / 2.0
        }
    }

    fn y(&self, value: f64) -> f64 {
        let plot_height = HEIGHT - 2.0 * PADDING;
        let range = self.max - self.min;
        if range > 0.0 {
            HEIGHT - PADDING - (value - self.min) * plot_height / range
        } else {
            HEIGHT / 2.0
        }
    }
}

fn polyline(scale: &Scale, values: &[f64], color: &str, label: &str) -> String {
    let points: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| format!("{:.1},{:.1}", scale.x(i), scale.y(v)))
        .collect();
    format!(
        "  <polyline class=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" points=\"{}\"/>\n",
        label,
        color,
        points.join(" ")
    )
}

fn frame(title: &str, body: &str, legend: &[(&str, &str)]) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\">\n",
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        "  <rect width=\"{:.0}\" height=\"{:.0}\" fill=\"white\"/>\n",
        WIDTH, HEIGHT
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.0}\" y=\"{:.0}\" font-size=\"16\" text-anchor=\"middle\">{}</text>\n",
        WIDTH / 2.0,
        PADDING / 2.0,
        escape(title)
    ));
    svg.push_str(&format!(
        "  <line x1=\"{p:.0}\" y1=\"{p:.0}\" x2=\"{p:.0}\" y2=\"{b:.0}\" stroke=\"black\"/>\n",
        p = PADDING,
        b = HEIGHT - PADDING
    ));
    svg.push_str(&format!(
        "  <line x1=\"{p:.0}\" y1=\"{b:.0}\" x2=\"{r:.0}\" y2=\"{b:.0}\" stroke=\"black\"/>\n",
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    ));
    svg.push_str(body);
    for (i, (label, color)) in legend.iter().enumerate() {
        let y = PADDING + 14.0 * (i as f64 + 1.0);
        svg.push_str(&format!(
            "  <text x=\"{:.0}\" y=\"{:.0}\" font-size=\"11\" fill=\"{}\">{}</text>\n",
            PADDING + 10.0,
            y,
            color,
            escape(label)
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn render_signals_chart(signals: &SignalSeries, title: &str) -> String {
    if signals.is_empty() {
        return frame(title, "", &[]);
    }

    let points = &signals.points;
    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let short: Vec<f64> = points.iter().map(|p| p.short_mavg).collect();
    let long: Vec<f64> = points.iter().map(|p| p.long_mavg).collect();

    let scale = Scale::new(
        prices.iter().chain(&short).chain(&long).copied(),
        points.len(),
    );

    let mut body = String::new();
    body.push_str(&polyline(&scale, &prices, "black", "price"));
    body.push_str(&polyline(&scale, &short, "orange", "short-mavg"));
    body.push_str(&polyline(&scale, &long, "purple", "long-mavg"));

    // markers sit on the short moving average
    for (i, p) in points.iter().enumerate() {
        let x = scale.x(i);
        let y = scale.y(p.short_mavg);
        if p.is_buy() {
            body.push_str(&format!(
                "  <polygon class=\"buy\" fill=\"green\" points=\"{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}\"/>\n",
                x,
                y - MARKER_SIZE,
                x - MARKER_SIZE,
                y + MARKER_SIZE,
                x + MARKER_SIZE,
                y + MARKER_SIZE
            ));
        } else if p.is_sell() {
            body.push_str(&format!(
                "  <polygon class=\"sell\" fill=\"red\" points=\"{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}\"/>\n",
                x,
                y + MARKER_SIZE,
                x - MARKER_SIZE,
                y - MARKER_SIZE,
                x + MARKER_SIZE,
                y - MARKER_SIZE
            ));
        }
    }

    let short_label = format!("Short Moving Average ({})", signals.short_window);
    let long_label = format!("Long Moving Average ({})", signals.long_window);
    frame(
        title,
        &body,
        &[
            ("Price", "black"),
            (short_label.as_str(), "orange"),
            (long_label.as_str(), "purple"),
            ("Buy Signal", "green"),
            ("Sell Signal", "red"),
        ],
    )
}

pub fn render_equity_chart(portfolio: &PortfolioSeries, title: &str) -> String {
    if portfolio.is_empty() {
        return frame(title, "", &[]);
    }

    let equity: Vec<f64> = portfolio.equity_curve().collect();
    let scale = Scale::new(equity.iter().copied(), equity.len());
    let body = polyline(&scale, &equity, "blue", "equity");
    frame(title, &body, &[("Portfolio Value", "blue")])
}
