use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionSide {
    Call,
    Put,
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OptionSide::Call => write!(f, "CALL"),
            OptionSide::Put => write!(f, "PUT"),
        }
    }
}

/// Per-contract sensitivities as quoted by the data vendor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Greeks {
    pub delta: f64,
    pub theta: f64,
    pub vega: f64,
    pub gamma: f64,
    pub rho: f64,
}

/// One option contract from a chain snapshot.
///
/// Records are never mutated once built; strategies hold clones of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionRecord {
    pub symbol: String,

    /// Expiry key, only compared for equality and used for grouping.
    pub expiry: String,

    pub strike: f64,
    pub side: OptionSide,

    pub mid: f64,

    /// Implied volatility, 0 when the vendor did not quote one.
    pub iv: f64,

    pub volume: f64,

    #[serde(rename = "open_interest")]
    pub oi: f64,

    pub greeks: Greeks,

    /// Whole days until expiry; negative once expired.
    pub days_to_expiry: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask: Option<f64>,
}

impl OptionRecord {
    pub fn is_call(&self) -> bool {
        self.side == OptionSide::Call
    }

    pub fn is_put(&self) -> bool {
        self.side == OptionSide::Put
    }

    /// Calls are OTM above spot, puts below. At-the-money is neither.
    pub fn is_otm(&self, spot: f64) -> bool {
        match self.side {
            OptionSide::Call => self.strike > spot,
            OptionSide::Put => self.strike < spot,
        }
    }

    /// Premium per share, never negative.
    pub fn price(&self) -> f64 {
        self.mid.max(0.0)
    }

    pub fn liquidity(&self) -> f64 {
        self.volume + self.oi
    }

    pub fn bid_ask_spread(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((ask - bid).abs()),
            _ => None,
        }
    }

    /// Volume relative to open interest; undefined without open interest.
    pub fn volume_ratio(&self) -> Option<f64> {
        if self.oi > 0.0 {
            Some(self.volume / self.oi)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(side: OptionSide, strike: f64) -> OptionRecord {
        OptionRecord {
            symbol: "PLTR".to_string(),
            expiry: "2025-12-19".to_string(),
            strike,
            side,
            mid: 1.25,
            iv: 0.4,
            volume: 50.0,
            oi: 200.0,
            greeks: Greeks::default(),
            days_to_expiry: 30,
            bid: None,
            ask: None,
        }
    }

    #[test]
    fn test_is_otm() {
        let call = record(OptionSide::Call, 105.0);
        let put = record(OptionSide::Put, 95.0);

        assert!(call.is_otm(100.0));
        assert!(!call.is_otm(110.0));
        assert!(put.is_otm(100.0));
        assert!(!put.is_otm(90.0));

        // ATM is not OTM for either side
        assert!(!record(OptionSide::Call, 100.0).is_otm(100.0));
        assert!(!record(OptionSide::Put, 100.0).is_otm(100.0));
    }

    #[test]
    fn test_price_clamps_negative_mid() {
        let mut opt = record(OptionSide::Call, 105.0);
        opt.mid = -0.5;
        assert_eq!(opt.price(), 0.0);
        opt.mid = 2.5;
        assert_eq!(opt.price(), 2.5);
    }

    #[test]
    fn test_bid_ask_spread() {
        let mut opt = record(OptionSide::Put, 95.0);
        assert_eq!(opt.bid_ask_spread(), None);

        opt.bid = Some(1.0);
        assert_eq!(opt.bid_ask_spread(), None);

        opt.ask = Some(1.5);
        assert_eq!(opt.bid_ask_spread(), Some(0.5));
    }

    #[test]
    fn test_volume_ratio_and_liquidity() {
        let mut opt = record(OptionSide::Call, 105.0);
        assert_eq!(opt.volume_ratio(), Some(0.25));
        assert_eq!(opt.liquidity(), 250.0);

        opt.oi = 0.0;
        assert_eq!(opt.volume_ratio(), None);
    }
}
