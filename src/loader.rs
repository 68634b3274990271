use crate::error::{Result, ScreenerError};
use crate::models::{Greeks, OptionRecord, OptionSide};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Vendor field names tried, in order, for implied volatility.
pub const IV_KEYS: &[&str] = &[
    "mid_iv",
    "bid_iv",
    "ask_iv",
    "smv_vol",
    "implied_volatility",
    "volatility",
];

pub const EXPIRY_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, Deserialize)]
struct RawQuote {
    #[serde(default)]
    bid: Option<f64>,
    #[serde(default)]
    ask: Option<f64>,
    #[serde(default)]
    last: Option<f64>,
}

impl RawQuote {
    /// Bid/ask midpoint, falling back to last trade.
    fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => self.last,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawOption {
    option_type: String,
    strike: f64,
    expiration_date: String,

    #[serde(flatten)]
    quote: RawQuote,

    #[serde(default)]
    volume: Option<f64>,
    #[serde(default)]
    open_interest: Option<f64>,

    #[serde(default)]
    greeks: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    symbols: Vec<String>,
    #[serde(default)]
    underlying: Option<RawQuote>,
    chains: Map<String, Value>,
}

/// One chain snapshot as read from disk.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub symbol: String,
    pub records: Vec<OptionRecord>,
    pub spot: Option<f64>,
    pub source: PathBuf,
}

impl Snapshot {
    /// Spot price, or `MissingSpotPrice` naming the snapshot file.
    pub fn require_spot(&self) -> Result<f64> {
        self.spot.ok_or_else(|| ScreenerError::MissingSpotPrice {
            path: self.source.clone(),
        })
    }
}

/// Load a snapshot with days-to-expiry counted from today.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    load_snapshot_at(path, Local::now().date_naive())
}

pub fn load_snapshot_at(path: &Path, today: NaiveDate) -> Result<Snapshot> {
    let text = std::fs::read_to_string(path).map_err(|source| ScreenerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&text, path, today)
}

/// Parse snapshot text; `path` is only used for error context.
pub fn parse_snapshot(text: &str, path: &Path, today: NaiveDate) -> Result<Snapshot> {
    let json_err = |source: serde_json::Error| ScreenerError::Json {
        path: path.to_path_buf(),
        source,
    };
    let raw: RawSnapshot = serde_json::from_str(text).map_err(json_err)?;

    let symbol = raw
        .symbols
        .first()
        .cloned()
        .ok_or_else(|| ScreenerError::InvalidField {
            field: "symbols".to_string(),
            reason: format!("empty symbol list in {}", path.display()),
        })?;

    let chain = raw
        .chains
        .get(&symbol)
        .and_then(Value::as_object)
        .ok_or_else(|| ScreenerError::InvalidField {
            field: format!("chains.{}", symbol),
            reason: format!("no chain object in {}", path.display()),
        })?;

    let spot = raw.underlying.as_ref().and_then(RawQuote::mid);

    let mut records = Vec::new();
    for (expiry_key, rows) in chain {
        let rows: Vec<RawOption> = serde_json::from_value(rows.clone()).map_err(json_err)?;
        debug!(expiry = %expiry_key, rows = rows.len(), "reading expiry");

        for row in rows {
            if !(row.strike > 0.0) {
                warn!(expiry = %expiry_key, strike = row.strike, "skipping contract with non-positive strike");
                continue;
            }
            records.push(to_record(&symbol, row, today)?);
        }
    }

    Ok(Snapshot {
        symbol,
        records,
        spot,
        source: path.to_path_buf(),
    })
}

fn to_record(symbol: &str, row: RawOption, today: NaiveDate) -> Result<OptionRecord> {
    let side = if row.option_type.eq_ignore_ascii_case("call") {
        OptionSide::Call
    } else {
        OptionSide::Put
    };
    let greeks = row.greeks.unwrap_or_default();
    let greek = |key: &str| greeks.get(key).and_then(Value::as_f64).unwrap_or(0.0);

    Ok(OptionRecord {
        symbol: symbol.to_string(),
        days_to_expiry: days_to_expiry(&row.expiration_date, today)?,
        expiry: row.expiration_date,
        strike: row.strike,
        side,
        mid: row.quote.mid().unwrap_or(0.0),
        iv: extract_iv(&greeks).unwrap_or(0.0),
        volume: row.volume.unwrap_or(0.0),
        oi: row.open_interest.unwrap_or(0.0),
        greeks: Greeks {
            delta: greek("delta"),
            theta: greek("theta"),
            vega: greek("vega"),
            gamma: greek("gamma"),
            rho: greek("rho"),
        },
        bid: row.quote.bid,
        ask: row.quote.ask,
    })
}

/// First strictly positive IV among the vendor's candidate fields.
pub fn extract_iv(greeks: &Map<String, Value>) -> Option<f64> {
    IV_KEYS
        .iter()
        .filter_map(|key| greeks.get(*key).and_then(Value::as_f64))
        .find(|v| *v > 0.0)
}

/// Whole days from `today` to the expiration date; negative once expired.
pub fn days_to_expiry(expiration_date: &str, today: NaiveDate) -> Result<i64> {
    let expiry = NaiveDate::parse_from_str(expiration_date, EXPIRY_DATE_FORMAT).map_err(|source| {
        ScreenerError::InvalidExpiry {
            value: expiration_date.to_string(),
            source,
        }
    })?;
    Ok((expiry - today).num_days())
}
