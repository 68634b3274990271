use crate::error::{Result, ScreenerError};
use crate::filters::Direction;
use crate::ranking::StrategyList;
use crate::strategy::{Strategy, StrategyKind};
use colored::Colorize;
use serde::{Serialize, Serializer};
use std::path::Path;

/// Theta magnitudes outside `[SCI_LOW, SCI_HIGH)` print in scientific notation.
pub const SCI_LOW: f64 = 1e-3;
pub const SCI_HIGH: f64 = 1e6;

const LABEL_WIDTH: usize = 44;
const NUM_WIDTH: usize = 11;

/// Flat view of one strategy for display and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySummary {
    pub label: String,
    pub kind: StrategyKind,
    pub direction: Direction,
    #[serde(serialize_with = "serialize_float")]
    pub cost: f64,
    #[serde(serialize_with = "serialize_float")]
    pub debit: f64,
    #[serde(serialize_with = "serialize_float")]
    pub credit: f64,
    #[serde(serialize_with = "serialize_float")]
    pub max_gain: f64,
    #[serde(serialize_with = "serialize_float")]
    pub max_loss: f64,
    #[serde(serialize_with = "serialize_float")]
    pub rr: f64,
    #[serde(serialize_with = "serialize_float")]
    pub net_delta: f64,
    #[serde(serialize_with = "serialize_float")]
    pub net_theta: f64,
    #[serde(serialize_with = "serialize_float")]
    pub net_vega: f64,
    pub avg_iv: Option<f64>,
}

impl From<&Strategy> for StrategySummary {
    fn from(s: &Strategy) -> Self {
        Self {
            label: s.label(),
            kind: s.kind(),
            direction: s.direction(),
            cost: s.cost(),
            debit: s.debit(),
            credit: s.credit(),
            max_gain: s.max_gain(),
            max_loss: s.max_loss(),
            rr: s.risk_reward(),
            net_delta: s.net_delta(),
            net_theta: s.net_theta(),
            net_vega: s.net_vega(),
            avg_iv: s.avg_iv(),
        }
    }
}

pub fn summarize(list: &StrategyList) -> Vec<StrategySummary> {
    list.iter().map(StrategySummary::from).collect()
}

/// JSON has no infinity, so non-finite values become strings.
fn serialize_float<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_str(&format_special(*value))
    }
}

fn format_special(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

/// Fixed two decimals, or inf/-inf/NaN.
pub fn format_number(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        format_special(value)
    }
}

/// Like `format_number`, but tiny or huge magnitudes use scientific notation.
pub fn format_theta(value: f64) -> String {
    if !value.is_finite() {
        return format_special(value);
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && (magnitude < SCI_LOW || magnitude >= SCI_HIGH) {
        format!("{:.3e}", value)
    } else {
        format!("{:.2}", value)
    }
}

pub fn format_iv(value: Option<f64>) -> String {
    match value {
        Some(iv) => format!("{:.4}", iv),
        None => "NaN".to_string(),
    }
}

fn truncate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        label.to_string()
    } else {
        let cut: String = label.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Table rows without colour, one line per summary plus the header.
pub fn render_table(summaries: &[StrategySummary]) -> Vec<String> {
    let mut lines = Vec::with_capacity(summaries.len() + 1);
    lines.push(format!(
        "{:>3}  {:<lw$} {:>nw$} {:>nw$} {:>nw$} {:>nw$} {:>nw$} {:>nw$} {:>nw$} {:>nw$}",
        "#",
        "strategy",
        "cost",
        "max_gain",
        "max_loss",
        "rr",
        "delta",
        "theta",
        "vega",
        "iv",
        lw = LABEL_WIDTH,
        nw = NUM_WIDTH,
    ));

    for (i, s) in summaries.iter().enumerate() {
        lines.push(format!(
            "{:>3}  {:<lw$} {:>nw$} {:>nw$} {:>nw$} {:>nw$} {:>nw$} {:>nw$} {:>nw$} {:>nw$}",
            i,
            truncate(&s.label, LABEL_WIDTH),
            format_number(s.cost),
            format_number(s.max_gain),
            format_number(s.max_loss),
            format_number(s.rr),
            format_number(s.net_delta),
            format_theta(s.net_theta),
            format_number(s.net_vega),
            format_iv(s.avg_iv),
            lw = LABEL_WIDTH,
            nw = NUM_WIDTH,
        ));
    }

    lines
}

pub fn print_table(summaries: &[StrategySummary]) {
    let lines = render_table(summaries);
    let width = lines.first().map(|l| l.chars().count()).unwrap_or(0);

    if let Some((header, rows)) = lines.split_first() {
        println!("{}", header.cyan().bold());
        println!("{}", "-".repeat(width).blue());
        for row in rows {
            println!("{}", row);
        }
    }
}

/// Write summaries as pretty JSON.
pub fn write_json(path: &Path, summaries: &[StrategySummary]) -> Result<()> {
    let text = serde_json::to_string_pretty(summaries).map_err(|source| ScreenerError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| ScreenerError::Io {
        path: path.to_path_buf(),
        source,
    })
}
