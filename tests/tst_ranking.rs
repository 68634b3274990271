use option_screener::{
    Action, Direction, Greeks, OptionRecord, OptionSide, RankKey, Strategy, StrategyList,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn single(strike: f64, mid: f64, action: Action) -> Strategy {
        Strategy::SingleLeg {
            record: OptionRecord {
                symbol: "SPY".to_string(),
                expiry: "2025-12-19".to_string(),
                strike,
                side: OptionSide::Put,
                mid,
                iv: 0.3,
                volume: 10.0,
                oi: 10.0,
                greeks: Greeks::default(),
                days_to_expiry: 30,
                bid: None,
                ask: None,
            },
            action,
            direction: match action {
                Action::Buy => Direction::Long,
                Action::Sell => Direction::Short,
            },
        }
    }

    fn sample() -> StrategyList {
        // Long puts: loss = cost = mid * 100
        StrategyList::new(vec![
            single(90.0, 3.0, Action::Buy),
            single(95.0, 1.0, Action::Buy),
            single(100.0, 2.0, Action::Buy),
        ])
    }

    fn strikes(list: &StrategyList) -> Vec<f64> {
        list.iter().map(|s| s.legs()[0].strike).collect()
    }

    #[test]
    fn test_loss_always_ascending() {
        let list = sample();
        assert_eq!(strikes(&list.rank(RankKey::Loss, true)), vec![95.0, 100.0, 90.0]);
        assert_eq!(strikes(&list.rank(RankKey::Loss, false)), vec![95.0, 100.0, 90.0]);
    }

    #[test]
    fn test_cost_respects_reverse() {
        let list = sample();
        assert_eq!(strikes(&list.rank(RankKey::Cost, true)), vec![90.0, 100.0, 95.0]);
        assert_eq!(strikes(&list.rank(RankKey::Cost, false)), vec![95.0, 100.0, 90.0]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let list = StrategyList::new(vec![
            single(90.0, 1.0, Action::Buy),
            single(95.0, 1.0, Action::Buy),
            single(100.0, 1.0, Action::Buy),
        ]);
        assert_eq!(strikes(&list.rank(RankKey::Cost, true)), vec![90.0, 95.0, 100.0]);
    }

    #[test]
    fn test_rank_leaves_source_untouched() {
        let list = sample();
        let _ = list.rank(RankKey::Cost, true);
        assert_eq!(strikes(&list), vec![90.0, 95.0, 100.0]);
    }

    #[test]
    fn test_top_sizes() {
        let list = sample();
        assert_eq!(list.top(0).len(), 0);
        assert_eq!(list.top(2).len(), 2);
        assert_eq!(list.top(10).len(), 3);
        assert!(StrategyList::default().top(5).is_empty());
    }

    #[test]
    fn test_top_returns_independent_copy() {
        let list = sample();
        let mut top = list.top(2).into_vec();
        if let Strategy::SingleLeg { record, .. } = &mut top[0] {
            record.mid = 50.0;
            record.strike = 1.0;
        }

        assert_eq!(top[0].cost(), 5000.0);
        assert_eq!(list.as_slice()[0].cost(), 300.0);
        assert_eq!(list.as_slice()[0].legs()[0].strike, 90.0);
        assert_eq!(list.as_slice()[0].legs()[0].mid, 3.0);
    }

    #[test]
    fn test_rank_key_parsing() {
        assert_eq!("rr".parse::<RankKey>().unwrap(), RankKey::RiskReward);
        assert_eq!("gain".parse::<RankKey>().unwrap(), RankKey::Gain);
        assert_eq!("credit".parse::<RankKey>().unwrap(), RankKey::Credit);
        assert!("theta".parse::<RankKey>().is_err());
    }
}
