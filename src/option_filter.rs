use crate::filters::ConfigFilter;
use crate::models::OptionRecord;

/// Narrows a chain by per-contract attributes before any strategy is built.
pub struct OptionFilter;

impl OptionFilter {
    /// Keep records passing every configured predicate, in input order.
    pub fn apply(records: &[OptionRecord], cfg: &ConfigFilter) -> Vec<OptionRecord> {
        records
            .iter()
            .filter(|o| Self::accepts(o, cfg))
            .cloned()
            .collect()
    }

    pub fn accepts(o: &OptionRecord, cfg: &ConfigFilter) -> bool {
        if let Some(min) = cfg.min_volume {
            if o.volume < min as f64 {
                return false;
            }
        }

        if let Some(min) = cfg.min_oi {
            if o.oi < min as f64 {
                return false;
            }
        }

        if let Some(min) = cfg.min_price {
            if o.price() < min {
                return false;
            }
        }

        if let Some(expiry) = &cfg.expiry {
            if &o.expiry != expiry {
                return false;
            }
        }

        if let Some(range) = &cfg.days_to_expiry_range {
            if !range.matches(o.days_to_expiry as f64) {
                return false;
            }
        }

        // Undefined ratio or spread fails a configured bound
        if let Some(range) = &cfg.volume_ratio_range {
            if !range.matches_opt(o.volume_ratio()) {
                return false;
            }
        }

        if let Some(max) = cfg.max_bid_ask_spread {
            match o.bid_ask_spread() {
                Some(spread) if spread <= max => {}
                _ => return false,
            }
        }

        true
    }
}
