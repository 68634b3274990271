use crate::error::ScreenerError;
use crate::strategy::Strategy;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankKey {
    RiskReward,
    Gain,
    Loss,
    Cost,
    Credit,
}

impl RankKey {
    fn value(self, s: &Strategy) -> f64 {
        match self {
            RankKey::RiskReward => s.risk_reward(),
            RankKey::Gain => s.max_gain(),
            RankKey::Loss => s.max_loss(),
            RankKey::Cost => s.cost(),
            RankKey::Credit => s.credit(),
        }
    }

    /// Loss always ranks smallest first; every other key honors `reverse`.
    fn descending(self, reverse: bool) -> bool {
        match self {
            RankKey::Loss => false,
            _ => reverse,
        }
    }
}

impl FromStr for RankKey {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rr" => Ok(RankKey::RiskReward),
            "gain" => Ok(RankKey::Gain),
            "loss" => Ok(RankKey::Loss),
            "cost" => Ok(RankKey::Cost),
            "credit" => Ok(RankKey::Credit),
            _ => Err(ScreenerError::UnknownRankKey(s.to_string())),
        }
    }
}

impl fmt::Display for RankKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RankKey::RiskReward => "rr",
            RankKey::Gain => "gain",
            RankKey::Loss => "loss",
            RankKey::Cost => "cost",
            RankKey::Credit => "credit",
        };
        write!(f, "{}", name)
    }
}

/// Ordering used by `rank`. NaN keys sort last in either direction.
fn compare(a: f64, b: f64, descending: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending { ord.reverse() } else { ord }
        }
    }
}

/// Ordered collection of screened strategies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyList {
    strategies: Vec<Strategy>,
}

impl StrategyList {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// Stable-sorted copy; `self` is left untouched.
    pub fn rank(&self, key: RankKey, reverse: bool) -> StrategyList {
        let descending = key.descending(reverse);
        let mut keyed: Vec<(f64, &Strategy)> =
            self.strategies.iter().map(|s| (key.value(s), s)).collect();
        keyed.sort_by(|a, b| compare(a.0, b.0, descending));

        StrategyList::new(keyed.into_iter().map(|(_, s)| s.clone()).collect())
    }

    /// First `n` entries as independent copies.
    pub fn top(&self, n: usize) -> StrategyList {
        StrategyList::new(self.strategies.iter().take(n).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Strategy> {
        self.strategies.iter()
    }

    pub fn as_slice(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn into_vec(self) -> Vec<Strategy> {
        self.strategies
    }
}
