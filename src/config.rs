use crate::error::{Result, ScreenerError};
use crate::filters::{ConfigFilter, Direction, FilterRange, StrategyFilter};
use crate::ranking::RankKey;
use serde_json::{Map, Value};
use std::path::Path;

// -----------------------------------------------
// CONTRACT
// -----------------------------------------------
/// Shares per contract; premiums and greeks are quoted per share.
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

// -----------------------------------------------
// DEFAULT PATHS
// -----------------------------------------------
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_DATA_PATH: &str = "data/snapshot.json";
pub const DEFAULT_LOG_DIR: &str = "./logs";
pub const LOG_FILE_NAME: &str = "option-screener.log";

// -----------------------------------------------
// RANKING DEFAULTS
// -----------------------------------------------
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_RANK_KEY: RankKey = RankKey::RiskReward;

// -----------------------------------------------
// CONFIG DOCUMENT SECTIONS
// -----------------------------------------------
pub const SECTION_STRATEGY_FILTER: &str = "strategy_filter";
pub const SECTION_CONFIG_FILTER: &str = "config_filter";
pub const SECTION_RANKING: &str = "ranking";

// -----------------------------------------------
// ENVIRONMENT OVERRIDES (read by the CLI)
// -----------------------------------------------
pub const ENV_CONFIG_PATH: &str = "SCREENER_CONFIG";
pub const ENV_DATA_PATH: &str = "SCREENER_DATA";
pub const ENV_LOG_DIR: &str = "SCREENER_LOG_DIR";

/// Ranking settings from the `ranking` section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    pub key: RankKey,
    pub top_n: usize,
    pub reverse: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_RANK_KEY,
            top_n: DEFAULT_TOP_N,
            reverse: true,
        }
    }
}

/// Everything a screening run reads from the config document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenerConfig {
    pub strategy_filter: StrategyFilter,
    pub config_filter: ConfigFilter,
    pub ranking: RankingConfig,
}

/// Load the config document from disk.
pub fn load_config(path: &Path) -> Result<ScreenerConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| ScreenerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_json::from_str(&text).map_err(|source| ScreenerError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&doc)
}

/// Build a config from an already parsed document.
///
/// Each section falls back to the document root when absent, so flat
/// documents work too.
pub fn parse_config(doc: &Value) -> Result<ScreenerConfig> {
    let root = doc.as_object().ok_or_else(|| ScreenerError::InvalidField {
        field: "<root>".to_string(),
        reason: "config document must be a JSON object".to_string(),
    })?;

    let strategy_filter = parse_strategy_filter(section(root, SECTION_STRATEGY_FILTER)?)?;
    let config_filter = parse_config_filter(section(root, SECTION_CONFIG_FILTER)?)?;
    let ranking = match root.get(SECTION_RANKING) {
        Some(Value::Object(obj)) => parse_ranking(obj)?,
        Some(Value::Null) | None => RankingConfig::default(),
        Some(_) => {
            return Err(ScreenerError::InvalidField {
                field: SECTION_RANKING.to_string(),
                reason: "expected an object".to_string(),
            });
        }
    };

    Ok(ScreenerConfig {
        strategy_filter,
        config_filter,
        ranking,
    })
}

fn section<'a>(root: &'a Map<String, Value>, name: &str) -> Result<&'a Map<String, Value>> {
    match root.get(name) {
        Some(Value::Object(obj)) => Ok(obj),
        Some(Value::Null) | None => Ok(root),
        Some(_) => Err(ScreenerError::InvalidField {
            field: name.to_string(),
            reason: "expected an object".to_string(),
        }),
    }
}

/// Missing flags are off.
pub fn parse_strategy_filter(obj: &Map<String, Value>) -> Result<StrategyFilter> {
    Ok(StrategyFilter {
        single_calls: opt_bool(obj, "single_calls")?.unwrap_or(false),
        iron_condors: opt_bool(obj, "iron_condors")?.unwrap_or(false),
        straddles: opt_bool(obj, "straddles")?.unwrap_or(false),
        strangles: opt_bool(obj, "strangles")?.unwrap_or(false),
    })
}

/// Missing or null fields stay unset.
pub fn parse_config_filter(obj: &Map<String, Value>) -> Result<ConfigFilter> {
    let direction = match opt_str(obj, "direction")? {
        Some(s) => Some(s.parse::<Direction>()?),
        None => None,
    };

    Ok(ConfigFilter {
        min_volume: opt_u64(obj, "min_volume")?,
        min_oi: opt_u64(obj, "min_oi")?,
        min_price: opt_f64(obj, "min_price")?,
        expiry: opt_str(obj, "expiry")?.map(str::to_string),
        days_to_expiry_range: opt_range(obj, "days_to_expiry_range")?,
        volume_ratio_range: opt_range(obj, "volume_ratio_range")?,
        max_bid_ask_spread: opt_f64(obj, "max_bid_ask_spread")?,

        direction,
        debit_range: opt_range(obj, "debit_range")?,
        credit_range: opt_range(obj, "credit_range")?,
        potential_gain_range: opt_range(obj, "potential_gain_range")?,
        potential_loss_range: opt_range(obj, "potential_loss_range")?,
        rr_range: opt_range(obj, "rr_range")?,
        net_delta_range: opt_range(obj, "net_delta_range")?,
        net_theta_range: opt_range(obj, "net_theta_range")?,
        net_vega_range: opt_range(obj, "net_vega_range")?,
        iv_range: opt_range(obj, "iv_range")?,
    })
}

fn parse_ranking(obj: &Map<String, Value>) -> Result<RankingConfig> {
    let defaults = RankingConfig::default();
    let key = match opt_str(obj, "key")? {
        Some(s) => s.parse::<RankKey>()?,
        None => defaults.key,
    };
    let top_n = match opt_u64(obj, "top_n")? {
        Some(n) => usize::try_from(n).map_err(|_| ScreenerError::InvalidField {
            field: "top_n".to_string(),
            reason: format!("{} does not fit in usize", n),
        })?,
        None => defaults.top_n,
    };
    Ok(RankingConfig {
        key,
        top_n,
        reverse: opt_bool(obj, "reverse")?.unwrap_or(defaults.reverse),
    })
}

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn invalid(field: &str, expected: &str, got: &Value) -> ScreenerError {
    ScreenerError::InvalidField {
        field: field.to_string(),
        reason: format!("expected {}, got {}", expected, got),
    }
}

fn opt_bool(obj: &Map<String, Value>, field: &str) -> Result<Option<bool>> {
    present(obj, field)
        .map(|v| v.as_bool().ok_or_else(|| invalid(field, "a boolean", v)))
        .transpose()
}

fn opt_str<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<Option<&'a str>> {
    present(obj, field)
        .map(|v| v.as_str().ok_or_else(|| invalid(field, "a string", v)))
        .transpose()
}

fn opt_f64(obj: &Map<String, Value>, field: &str) -> Result<Option<f64>> {
    present(obj, field)
        .map(|v| v.as_f64().ok_or_else(|| invalid(field, "a number", v)))
        .transpose()
}

/// Integral floats such as `10.0` count as integers.
fn opt_u64(obj: &Map<String, Value>, field: &str) -> Result<Option<u64>> {
    present(obj, field)
        .map(|v| as_count(v).ok_or_else(|| invalid(field, "a non-negative integer", v)))
        .transpose()
}

fn as_count(v: &Value) -> Option<u64> {
    v.as_u64().or_else(|| {
        v.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

fn opt_range(obj: &Map<String, Value>, field: &str) -> Result<Option<FilterRange>> {
    present(obj, field).map(|v| parse_range(field, v)).transpose()
}

/// `[lo, hi]` with numeric or "inf"/"-inf" elements.
pub fn parse_range(field: &str, value: &Value) -> Result<FilterRange> {
    let malformed = |reason: String| ScreenerError::MalformedRange {
        field: field.to_string(),
        reason,
    };

    let items = value
        .as_array()
        .ok_or_else(|| malformed(format!("expected a two-element array, got {}", value)))?;
    if items.len() != 2 {
        return Err(malformed(format!("expected 2 elements, got {}", items.len())));
    }

    let bound = |v: &Value| -> Result<f64> {
        match v {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| malformed(format!("bound {} is not representable", n))),
            Value::String(s) => parse_infinity(s)
                .ok_or_else(|| malformed(format!("bound \"{}\" is not numeric", s))),
            other => Err(malformed(format!("bound {} is not numeric", other))),
        }
    };

    Ok(FilterRange::new(bound(&items[0])?, bound(&items[1])?))
}

fn parse_infinity(s: &str) -> Option<f64> {
    match s.trim().to_ascii_lowercase().as_str() {
        "inf" | "+inf" | "infinity" | "+infinity" => Some(f64::INFINITY),
        "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_fields_are_unset() {
        let doc = json!({
            "strategy_filter": { "straddles": true },
            "config_filter": {
                "min_volume": null,
                "min_oi": 5,
                "direction": "short",
                "credit_range": [0, 2500],
                "rr_range": null
            }
        });
        let cfg = parse_config(&doc).unwrap();

        assert_eq!(cfg.strategy_filter, StrategyFilter { straddles: true, ..Default::default() });
        assert_eq!(cfg.config_filter.min_volume, None);
        assert_eq!(cfg.config_filter.min_oi, Some(5));
        assert_eq!(cfg.config_filter.min_price, None);
        assert_eq!(cfg.config_filter.direction, Some(Direction::Short));
        assert_eq!(cfg.config_filter.credit_range, Some(FilterRange::new(0.0, 2500.0)));
        assert_eq!(cfg.config_filter.rr_range, None);
        assert_eq!(cfg.ranking, RankingConfig::default());
    }

    #[test]
    fn test_flat_document_uses_root() {
        let doc = json!({ "iron_condors": true, "min_price": 0.05 });
        let cfg = parse_config(&doc).unwrap();
        assert!(cfg.strategy_filter.iron_condors);
        assert_eq!(cfg.config_filter.min_price, Some(0.05));
    }

    #[test]
    fn test_malformed_ranges() {
        for bad in [json!([1.0]), json!([1.0, 2.0, 3.0]), json!([1.0, "abc"]), json!("0..1")] {
            let err = parse_range("rr_range", &bad).unwrap_err();
            assert!(matches!(err, ScreenerError::MalformedRange { ref field, .. } if field == "rr_range"));
        }
    }

    #[test]
    fn test_infinite_range_bounds() {
        let r = parse_range("rr_range", &json!([1.5, "inf"])).unwrap();
        assert_eq!(r, FilterRange::new(1.5, f64::INFINITY));
        let r = parse_range("net_delta_range", &json!(["-Infinity", 0])).unwrap();
        assert_eq!(r, FilterRange::new(f64::NEG_INFINITY, 0.0));
    }

    #[test]
    fn test_ranking_section() {
        let doc = json!({ "ranking": { "key": "loss", "top_n": 3 } });
        let cfg = parse_config(&doc).unwrap();
        assert_eq!(cfg.ranking.key, RankKey::Loss);
        assert_eq!(cfg.ranking.top_n, 3);
        assert!(cfg.ranking.reverse);

        let doc = json!({ "ranking": { "key": "volume" } });
        assert!(matches!(parse_config(&doc), Err(ScreenerError::UnknownRankKey(_))));
    }

    #[test]
    fn test_integral_floats_are_counts() {
        let doc = json!({ "config_filter": { "min_volume": 10.0, "min_oi": 0 }, "ranking": { "top_n": 5.0 } });
        let cfg = parse_config(&doc).unwrap();
        assert_eq!(cfg.config_filter.min_volume, Some(10));
        assert_eq!(cfg.config_filter.min_oi, Some(0));
        assert_eq!(cfg.ranking.top_n, 5);

        for bad in [json!(10.5), json!(-3), json!(-1.0), json!("10")] {
            let doc = json!({ "config_filter": { "min_volume": bad } });
            assert!(matches!(
                parse_config(&doc),
                Err(ScreenerError::InvalidField { ref field, .. }) if field == "min_volume"
            ));
        }
    }

    #[test]
    fn test_bad_direction() {
        let doc = json!({ "config_filter": { "direction": "flat" } });
        assert!(matches!(parse_config(&doc), Err(ScreenerError::InvalidDirection { .. })));
    }
}
