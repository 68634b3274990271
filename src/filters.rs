use crate::error::ScreenerError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Inclusive numeric bound. Either end may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterRange {
    pub lo: f64,
    pub hi: f64,
}

impl FilterRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// `[lo, +inf]`
    pub fn at_least(lo: f64) -> Self {
        Self::new(lo, f64::INFINITY)
    }

    /// `[-inf, hi]`
    pub fn at_most(hi: f64) -> Self {
        Self::new(f64::NEG_INFINITY, hi)
    }

    /// NaN never matches; infinities compare as IEEE-754 says.
    pub fn matches(&self, value: f64) -> bool {
        !value.is_nan() && self.lo <= value && value <= self.hi
    }

    /// An absent value never matches.
    pub fn matches_opt(&self, value: Option<f64>) -> bool {
        value.is_some_and(|v| self.matches(v))
    }
}

/// Unset range means "no constraint".
pub fn within(range: Option<&FilterRange>, value: f64) -> bool {
    range.is_none_or(|r| r.matches(value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

impl FromStr for Direction {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            _ => Err(ScreenerError::InvalidDirection { value: s.to_string() }),
        }
    }
}

/// Numeric constraints for one screening run.
///
/// Option-level fields prune the chain before strategies are built;
/// strategy-level fields prune built strategies by their aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFilter {
    // ----- option level -----
    pub min_volume: Option<u64>,
    pub min_oi: Option<u64>,
    pub min_price: Option<f64>,
    pub expiry: Option<String>,
    pub days_to_expiry_range: Option<FilterRange>,
    pub volume_ratio_range: Option<FilterRange>,
    pub max_bid_ask_spread: Option<f64>,

    // ----- strategy level -----
    pub direction: Option<Direction>,
    pub debit_range: Option<FilterRange>,
    pub credit_range: Option<FilterRange>,
    pub potential_gain_range: Option<FilterRange>,
    pub potential_loss_range: Option<FilterRange>,
    pub rr_range: Option<FilterRange>,
    pub net_delta_range: Option<FilterRange>,
    pub net_theta_range: Option<FilterRange>,
    pub net_vega_range: Option<FilterRange>,
    pub iv_range: Option<FilterRange>,
}

/// Which generators run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategyFilter {
    pub single_calls: bool,
    pub iron_condors: bool,
    pub straddles: bool,
    pub strangles: bool,
}

impl StrategyFilter {
    pub fn all() -> Self {
        Self {
            single_calls: true,
            iron_condors: true,
            straddles: true,
            strangles: true,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.single_calls || self.iron_condors || self.straddles || self.strangles
    }
}
