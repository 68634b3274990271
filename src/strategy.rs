//! Multi-leg option structures and their payoff/greek aggregates.
//!
//! Every metric is a pure function of the legs, so a strategy can be
//! cloned and re-evaluated freely.

use crate::config::CONTRACT_MULTIPLIER;
use crate::filters::Direction;
use crate::models::OptionRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-leg trade side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    pub fn sign(self) -> f64 {
        match self {
            Action::Buy => 1.0,
            Action::Sell => -1.0,
        }
    }

    /// Side taken by a uniformly long or short structure.
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Long => Action::Buy,
            Direction::Short => Action::Sell,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    SingleLeg,
    Straddle,
    Strangle,
    IronCondor,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            StrategyKind::SingleLeg => "Single",
            StrategyKind::Straddle => "Straddle",
            StrategyKind::Strangle => "Strangle",
            StrategyKind::IronCondor => "IronCondor",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    SingleLeg {
        record: OptionRecord,
        action: Action,
        direction: Direction,
    },
    Straddle {
        call: OptionRecord,
        put: OptionRecord,
        direction: Direction,
    },
    Strangle {
        call: OptionRecord,
        put: OptionRecord,
        direction: Direction,
    },
    /// Short legs are always sold and long legs always bought;
    /// `direction` only labels the structure.
    IronCondor {
        short_call: OptionRecord,
        long_call: OptionRecord,
        short_put: OptionRecord,
        long_put: OptionRecord,
        direction: Direction,
    },
}

fn premium(legs: &[&OptionRecord]) -> f64 {
    legs.iter().map(|o| o.price()).sum::<f64>() * CONTRACT_MULTIPLIER
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::SingleLeg { .. } => StrategyKind::SingleLeg,
            Strategy::Straddle { .. } => StrategyKind::Straddle,
            Strategy::Strangle { .. } => StrategyKind::Strangle,
            Strategy::IronCondor { .. } => StrategyKind::IronCondor,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Strategy::SingleLeg { direction, .. }
            | Strategy::Straddle { direction, .. }
            | Strategy::Strangle { direction, .. }
            | Strategy::IronCondor { direction, .. } => *direction,
        }
    }

    /// Legs paired with the side each one is traded on.
    pub fn signed_legs(&self) -> Vec<(&OptionRecord, Action)> {
        match self {
            Strategy::SingleLeg { record, action, .. } => vec![(record, *action)],
            Strategy::Straddle { call, put, direction }
            | Strategy::Strangle { call, put, direction } => {
                let action = Action::for_direction(*direction);
                vec![(call, action), (put, action)]
            }
            Strategy::IronCondor {
                short_call,
                long_call,
                short_put,
                long_put,
                ..
            } => vec![
                (short_call, Action::Sell),
                (long_call, Action::Buy),
                (short_put, Action::Sell),
                (long_put, Action::Buy),
            ],
        }
    }

    pub fn legs(&self) -> Vec<&OptionRecord> {
        self.signed_legs().into_iter().map(|(leg, _)| leg).collect()
    }

    /// Cash paid to open.
    pub fn debit(&self) -> f64 {
        match self {
            Strategy::SingleLeg { record, action, .. } => match action {
                Action::Buy => premium(&[record]),
                Action::Sell => 0.0,
            },
            Strategy::Straddle { call, put, direction }
            | Strategy::Strangle { call, put, direction } => match direction {
                Direction::Long => premium(&[call, put]),
                Direction::Short => 0.0,
            },
            Strategy::IronCondor {
                long_call, long_put, ..
            } => premium(&[long_call, long_put]),
        }
    }

    /// Cash received to open.
    pub fn credit(&self) -> f64 {
        match self {
            Strategy::SingleLeg { record, action, .. } => match action {
                Action::Buy => 0.0,
                Action::Sell => premium(&[record]),
            },
            Strategy::Straddle { call, put, direction }
            | Strategy::Strangle { call, put, direction } => match direction {
                Direction::Long => 0.0,
                Direction::Short => premium(&[call, put]),
            },
            Strategy::IronCondor {
                short_call,
                short_put,
                ..
            } => premium(&[short_call, short_put]),
        }
    }

    /// Positive for a net debit, negative for a net credit.
    pub fn cost(&self) -> f64 {
        self.debit() - self.credit()
    }

    pub fn max_gain(&self) -> f64 {
        match self {
            Strategy::SingleLeg { record, action, .. } => match action {
                Action::Buy if record.is_call() => f64::INFINITY,
                Action::Buy => record.strike * CONTRACT_MULTIPLIER - self.cost(),
                Action::Sell => self.credit(),
            },
            Strategy::Straddle { direction, .. } | Strategy::Strangle { direction, .. } => {
                match direction {
                    Direction::Long => f64::INFINITY,
                    Direction::Short => self.credit(),
                }
            }
            Strategy::IronCondor { .. } => self.credit(),
        }
    }

    pub fn max_loss(&self) -> f64 {
        match self {
            Strategy::SingleLeg { record, action, .. } => match action {
                Action::Buy => self.cost(),
                Action::Sell if record.is_call() => f64::INFINITY,
                Action::Sell => record.strike * CONTRACT_MULTIPLIER - self.cost(),
            },
            Strategy::Straddle { direction, .. } | Strategy::Strangle { direction, .. } => {
                match direction {
                    Direction::Long => self.cost(),
                    Direction::Short => f64::INFINITY,
                }
            }
            Strategy::IronCondor { .. } => self.width() - self.credit(),
        }
    }

    /// Call-wing width in dollars per contract; zero for non-condors.
    pub fn width(&self) -> f64 {
        match self {
            Strategy::IronCondor {
                short_call,
                long_call,
                ..
            } => (long_call.strike - short_call.strike) * CONTRACT_MULTIPLIER,
            _ => 0.0,
        }
    }

    /// Reward per unit of risk; infinite when nothing is at risk.
    pub fn risk_reward(&self) -> f64 {
        let loss = self.max_loss();
        if loss > 0.0 {
            self.max_gain() / loss
        } else {
            f64::INFINITY
        }
    }

    fn net_greek(&self, greek: impl Fn(&OptionRecord) -> f64) -> f64 {
        self.signed_legs()
            .into_iter()
            .map(|(leg, action)| greek(leg) * CONTRACT_MULTIPLIER * action.sign())
            .sum()
    }

    pub fn net_delta(&self) -> f64 {
        self.net_greek(|o| o.greeks.delta)
    }

    pub fn net_theta(&self) -> f64 {
        self.net_greek(|o| o.greeks.theta)
    }

    pub fn net_vega(&self) -> f64 {
        self.net_greek(|o| o.greeks.vega)
    }

    /// Mean IV over legs that have one quoted.
    pub fn avg_iv(&self) -> Option<f64> {
        let ivs: Vec<f64> = self
            .legs()
            .into_iter()
            .map(|o| o.iv)
            .filter(|iv| *iv > 0.0)
            .collect();
        if ivs.is_empty() {
            None
        } else {
            Some(ivs.iter().sum::<f64>() / ivs.len() as f64)
        }
    }

    pub fn label(&self) -> String {
        match self {
            Strategy::SingleLeg { record, action, .. } => format!(
                "Single {} {}@{} exp {}",
                action, record.side, record.strike, record.expiry
            ),
            Strategy::Straddle { call, put, direction } => format!(
                "Straddle {} C:{} P:{} exp {}",
                direction, call.strike, put.strike, call.expiry
            ),
            Strategy::Strangle { call, put, direction } => format!(
                "Strangle {} C:{} P:{} exp {}",
                direction, call.strike, put.strike, call.expiry
            ),
            Strategy::IronCondor {
                short_call,
                long_call,
                short_put,
                long_put,
                ..
            } => format!(
                "IC C:{}/{} P:{}/{} exp {}",
                short_call.strike, long_call.strike, short_put.strike, long_put.strike, short_call.expiry
            ),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} cost={:.2} rr={:.2} Δ={:.3} Θ={:.3} vega={:.3}",
            self.label(),
            self.cost(),
            self.risk_reward(),
            self.net_delta(),
            self.net_theta(),
            self.net_vega()
        )
    }
}
