//! Brute-force enumeration of candidate structures from a filtered chain.
//!
//! Iteration order is fixed: expiry groups in order of first appearance,
//! strikes ascending within a group (stable for equal strikes).

use crate::error::{Result, ScreenerError};
use crate::filters::{ConfigFilter, Direction};
use crate::models::OptionRecord;
use crate::strategy::{Action, Strategy};
use std::collections::HashMap;

pub trait StrategyGenerator {
    fn name(&self) -> &'static str;

    /// Enumerate strategies from records that already passed the option filter.
    fn generate(&self, records: &[OptionRecord], spot: f64, cfg: &ConfigFilter) -> Result<Vec<Strategy>>;

    fn require_direction(&self, cfg: &ConfigFilter) -> Result<Direction> {
        cfg.direction
            .ok_or(ScreenerError::MissingDirection { generator: self.name() })
    }
}

/// Records grouped by expiry, groups in order of first occurrence.
pub fn group_by_expiry(records: &[OptionRecord]) -> Vec<(&str, Vec<&OptionRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&OptionRecord>)> = Vec::new();

    for o in records {
        let slot = *index.entry(o.expiry.as_str()).or_insert_with(|| {
            groups.push((o.expiry.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(o);
    }

    groups
}

/// Calls and puts of one group, each sorted ascending by strike.
fn split_sorted<'a>(chain: &[&'a OptionRecord]) -> (Vec<&'a OptionRecord>, Vec<&'a OptionRecord>) {
    let mut calls: Vec<&OptionRecord> = chain.iter().copied().filter(|o| o.is_call()).collect();
    let mut puts: Vec<&OptionRecord> = chain.iter().copied().filter(|o| o.is_put()).collect();
    calls.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    puts.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    (calls, puts)
}

/// One leg per OTM call, bought when long and sold when short.
pub struct SingleCallsGenerator;

impl StrategyGenerator for SingleCallsGenerator {
    fn name(&self) -> &'static str {
        "single_calls"
    }

    fn generate(&self, records: &[OptionRecord], spot: f64, cfg: &ConfigFilter) -> Result<Vec<Strategy>> {
        let direction = self.require_direction(cfg)?;
        let action = Action::for_direction(direction);

        Ok(records
            .iter()
            .filter(|o| o.is_call() && o.is_otm(spot))
            .map(|o| Strategy::SingleLeg {
                record: o.clone(),
                action,
                direction,
            })
            .collect())
    }
}

/// Call and put at exactly the same strike and expiry.
pub struct StraddlesGenerator;

impl StrategyGenerator for StraddlesGenerator {
    fn name(&self) -> &'static str {
        "straddles"
    }

    fn generate(&self, records: &[OptionRecord], _spot: f64, cfg: &ConfigFilter) -> Result<Vec<Strategy>> {
        let direction = self.require_direction(cfg)?;
        let mut strategies = Vec::new();

        for (_, chain) in group_by_expiry(records) {
            let (calls, puts) = split_sorted(&chain);
            for call in &calls {
                for put in puts.iter().filter(|p| p.strike == call.strike) {
                    strategies.push(Strategy::Straddle {
                        call: (*call).clone(),
                        put: (*put).clone(),
                        direction,
                    });
                }
            }
        }

        Ok(strategies)
    }
}

/// Every OTM call paired with every OTM put of the same expiry.
pub struct StranglesGenerator;

impl StrategyGenerator for StranglesGenerator {
    fn name(&self) -> &'static str {
        "strangles"
    }

    fn generate(&self, records: &[OptionRecord], spot: f64, cfg: &ConfigFilter) -> Result<Vec<Strategy>> {
        let direction = self.require_direction(cfg)?;
        let mut strategies = Vec::new();

        for (_, chain) in group_by_expiry(records) {
            let (calls, puts) = split_sorted(&chain);
            let otm_puts: Vec<&OptionRecord> = puts.into_iter().filter(|p| p.strike < spot).collect();

            for call in calls.into_iter().filter(|c| c.strike > spot) {
                for put in &otm_puts {
                    strategies.push(Strategy::Strangle {
                        call: call.clone(),
                        put: (*put).clone(),
                        direction,
                    });
                }
            }
        }

        Ok(strategies)
    }
}

/// Short OTM call and put, each protected by a further-OTM long wing.
///
/// Enumerates every valid (short call, long call, short put, long put)
/// tuple per expiry with no pruning beyond strike ordering, so the cost
/// is quartic in the chain size.
pub struct IronCondorsGenerator;

impl StrategyGenerator for IronCondorsGenerator {
    fn name(&self) -> &'static str {
        "iron_condors"
    }

    fn generate(&self, records: &[OptionRecord], spot: f64, cfg: &ConfigFilter) -> Result<Vec<Strategy>> {
        let direction = self.require_direction(cfg)?;
        let mut strategies = Vec::new();

        for (_, chain) in group_by_expiry(records) {
            let (calls, puts) = split_sorted(&chain);

            for short_call in calls.iter().filter(|c| c.strike > spot) {
                for long_call in calls.iter().filter(|c| c.strike > short_call.strike) {
                    for short_put in puts.iter().filter(|p| p.strike < spot) {
                        for long_put in puts.iter().filter(|p| p.strike < short_put.strike) {
                            strategies.push(Strategy::IronCondor {
                                short_call: (*short_call).clone(),
                                long_call: (*long_call).clone(),
                                short_put: (*short_put).clone(),
                                long_put: (*long_put).clone(),
                                direction,
                            });
                        }
                    }
                }
            }
        }

        Ok(strategies)
    }
}
