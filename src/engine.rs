use crate::error::Result;
use crate::filters::{within, ConfigFilter, StrategyFilter};
use crate::generators::{
    IronCondorsGenerator, SingleCallsGenerator, StraddlesGenerator, StranglesGenerator, StrategyGenerator,
};
use crate::models::OptionRecord;
use crate::option_filter::OptionFilter;
use crate::ranking::StrategyList;
use crate::strategy::Strategy;
use tracing::{debug, info, warn};

/// Runs the enabled generators over one chain snapshot.
pub struct StrategyEngine<'a> {
    records: &'a [OptionRecord],
    spot: f64,
}

impl<'a> StrategyEngine<'a> {
    pub fn new(records: &'a [OptionRecord], spot: f64) -> Self {
        Self { records, spot }
    }

    /// Enabled generators in processing order.
    fn generators(s_filter: &StrategyFilter) -> Vec<&'static dyn StrategyGenerator> {
        let mut out: Vec<&'static dyn StrategyGenerator> = Vec::new();
        if s_filter.single_calls {
            out.push(&SingleCallsGenerator);
        }
        if s_filter.iron_condors {
            out.push(&IronCondorsGenerator);
        }
        if s_filter.straddles {
            out.push(&StraddlesGenerator);
        }
        if s_filter.strangles {
            out.push(&StranglesGenerator);
        }
        out
    }

    /// Option filter, generate, strategy filter, per enabled generator.
    /// Results are concatenated in generator order.
    pub fn generate(&self, s_filter: &StrategyFilter, c_filter: &ConfigFilter) -> Result<StrategyList> {
        let generators = Self::generators(s_filter);
        if generators.is_empty() {
            warn!("No strategy types enabled, nothing to generate");
            return Ok(StrategyList::default());
        }

        let mut all = Vec::new();
        for generator in generators {
            let chain = OptionFilter::apply(self.records, c_filter);
            debug!(
                generator = generator.name(),
                kept = chain.len(),
                total = self.records.len(),
                "option filter applied"
            );

            let candidates = generator.generate(&chain, self.spot, c_filter)?;
            let generated = candidates.len();
            let kept = filter_strategies(candidates, c_filter);

            info!(
                generator = generator.name(),
                generated,
                kept = kept.len(),
                "strategies screened"
            );
            all.extend(kept);
        }

        Ok(StrategyList::new(all))
    }
}

/// Drop strategies whose aggregates fall outside the configured ranges.
pub fn filter_strategies(strategies: Vec<Strategy>, cfg: &ConfigFilter) -> Vec<Strategy> {
    strategies
        .into_iter()
        .filter(|s| passes_strategy_filter(s, cfg))
        .collect()
}

pub fn passes_strategy_filter(s: &Strategy, cfg: &ConfigFilter) -> bool {
    // A zero debit (or credit) side is not bounded by its range.
    let debit = s.debit();
    if debit > 0.0 && !within(cfg.debit_range.as_ref(), debit) {
        return false;
    }

    let credit = s.credit();
    if credit > 0.0 && !within(cfg.credit_range.as_ref(), credit) {
        return false;
    }

    if !within(cfg.potential_gain_range.as_ref(), s.max_gain())
        || !within(cfg.potential_loss_range.as_ref(), s.max_loss())
        || !within(cfg.rr_range.as_ref(), s.risk_reward())
        || !within(cfg.net_delta_range.as_ref(), s.net_delta())
        || !within(cfg.net_theta_range.as_ref(), s.net_theta())
        || !within(cfg.net_vega_range.as_ref(), s.net_vega())
    {
        return false;
    }

    match &cfg.iv_range {
        Some(range) => range.matches_opt(s.avg_iv()),
        None => true,
    }
}
