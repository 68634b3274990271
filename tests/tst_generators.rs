use option_screener::{
    ConfigFilter, Direction, FilterRange, Greeks, IronCondorsGenerator, OptionRecord, OptionSide,
    ScreenerError, StraddlesGenerator, StrategyEngine, StrategyFilter, StrategyGenerator, StrategyKind,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn option(expiry: &str, side: OptionSide, strike: f64, mid: f64) -> OptionRecord {
        OptionRecord {
            symbol: "SPY".to_string(),
            expiry: expiry.to_string(),
            strike,
            side,
            mid,
            iv: 0.25,
            volume: 500.0,
            oi: 1000.0,
            greeks: Greeks {
                delta: if side == OptionSide::Call { 0.3 } else { -0.3 },
                theta: -0.02,
                vega: 0.1,
                ..Greeks::default()
            },
            days_to_expiry: 30,
            bid: Some(mid - 0.05),
            ask: Some(mid + 0.05),
        }
    }

    fn short_filter() -> ConfigFilter {
        ConfigFilter {
            direction: Some(Direction::Short),
            ..Default::default()
        }
    }

    #[test]
    fn test_iron_condor_count() {
        let e = "2025-12-19";
        let mut chain = Vec::new();
        for strike in [105.0, 110.0, 115.0] {
            chain.push(option(e, OptionSide::Call, strike, 1.0));
        }
        for strike in [95.0, 90.0, 85.0] {
            chain.push(option(e, OptionSide::Put, strike, 1.0));
        }

        let condors = IronCondorsGenerator.generate(&chain, 100.0, &short_filter()).unwrap();

        // 3 call spreads x 3 put spreads
        assert_eq!(condors.len(), 9);
        assert!(condors.iter().all(|s| s.kind() == StrategyKind::IronCondor));
        assert_eq!(condors[0].label(), format!("IC C:105/110 P:90/85 exp {}", e));
    }

    #[test]
    fn test_straddle_needs_exact_strike() {
        let e = "2025-12-19";
        let chain = vec![
            option(e, OptionSide::Call, 100.0, 2.0),
            option(e, OptionSide::Put, 100.0, 1.8),
            option(e, OptionSide::Put, 100.5, 2.1),
        ];

        let straddles = StraddlesGenerator.generate(&chain, 100.0, &short_filter()).unwrap();
        assert_eq!(straddles.len(), 1);
        assert_eq!(straddles[0].label(), format!("Straddle SHORT C:100 P:100 exp {}", e));
        assert!((straddles[0].credit() - 380.0).abs() < 1e-9);
        assert_eq!(straddles[0].max_loss(), f64::INFINITY);
    }

    #[test]
    fn test_straddles_stay_within_expiry() {
        let chain = vec![
            option("2025-12-19", OptionSide::Call, 100.0, 2.0),
            option("2026-01-16", OptionSide::Put, 100.0, 2.0),
        ];
        let straddles = StraddlesGenerator.generate(&chain, 100.0, &short_filter()).unwrap();
        assert!(straddles.is_empty());
    }

    #[test]
    fn test_engine_short_end_to_end() {
        let e = "2025-12-19";
        let chain = vec![
            option(e, OptionSide::Call, 100.0, 2.0),
            option(e, OptionSide::Put, 100.0, 1.8),
            option(e, OptionSide::Call, 105.0, 0.8),
            option(e, OptionSide::Put, 95.0, 0.6),
        ];
        let strategy_filter = StrategyFilter {
            single_calls: true,
            straddles: true,
            strangles: true,
            iron_condors: false,
        };

        let engine = StrategyEngine::new(&chain, 100.0);
        let list = engine.generate(&strategy_filter, &short_filter()).unwrap();

        let kinds: Vec<StrategyKind> = list.iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![StrategyKind::SingleLeg, StrategyKind::Straddle, StrategyKind::Strangle]
        );

        let labels: Vec<String> = list.iter().map(|s| s.label()).collect();
        assert_eq!(labels[0], format!("Single SELL CALL@105 exp {}", e));
        assert_eq!(labels[2], format!("Strangle SHORT C:105 P:95 exp {}", e));
    }

    #[test]
    fn test_engine_strategy_filter_prunes() {
        let e = "2025-12-19";
        let chain = vec![
            option(e, OptionSide::Call, 100.0, 2.0),
            option(e, OptionSide::Put, 100.0, 1.8),
            option(e, OptionSide::Call, 105.0, 0.8),
            option(e, OptionSide::Put, 95.0, 0.6),
        ];
        let strategy_filter = StrategyFilter {
            straddles: true,
            strangles: true,
            ..Default::default()
        };
        // Straddle collects 380, strangle 140
        let cfg = ConfigFilter {
            credit_range: Some(FilterRange::at_least(200.0)),
            ..short_filter()
        };

        let list = StrategyEngine::new(&chain, 100.0).generate(&strategy_filter, &cfg).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].kind(), StrategyKind::Straddle);
    }

    #[test]
    fn test_engine_requires_direction() {
        let chain = vec![option("2025-12-19", OptionSide::Call, 105.0, 1.0)];
        let strategy_filter = StrategyFilter {
            single_calls: true,
            ..Default::default()
        };

        let err = StrategyEngine::new(&chain, 100.0)
            .generate(&strategy_filter, &ConfigFilter::default())
            .unwrap_err();
        assert!(matches!(err, ScreenerError::MissingDirection { generator: "single_calls" }));
    }

    #[test]
    fn test_engine_nothing_enabled() {
        let chain = vec![option("2025-12-19", OptionSide::Call, 105.0, 1.0)];
        let list = StrategyEngine::new(&chain, 100.0)
            .generate(&StrategyFilter::default(), &ConfigFilter::default())
            .unwrap();
        assert!(list.is_empty());
    }
}
