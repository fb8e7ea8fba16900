use crate::{chain::models::Coin, modules::ModuleConfig};

/// What a module should do this tick, derived only from the balances it just
/// observed and its static configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDecision {
    pub should_push: bool,
    /// Always the full observed balance when pushing
    pub sweep_amount: u64,
    /// Fee coins to attach so the contract can pay for its own ICA tx
    pub fee_coins: Vec<Coin>,
}

impl PushDecision {
    /// Push everything once `observed` strictly exceeds the threshold, and
    /// attach `fee` when the gas balance has fallen below the fee buffer
    pub fn evaluate(observed: u64, gas: u64, config: &ModuleConfig, fee: Coin) -> Self {
        if observed <= config.threshold_amount {
            return Self::hold();
        }

        let fee_coins = if gas < config.fee_buffer_amount {
            vec![fee]
        } else {
            vec![]
        };

        Self {
            should_push: true,
            sweep_amount: observed,
            fee_coins,
        }
    }

    pub fn hold() -> Self {
        Self {
            should_push: false,
            sweep_amount: 0,
            fee_coins: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(threshold: u64, fee_buffer: u64) -> ModuleConfig {
        ModuleConfig {
            contract_address: "neutron1pump".to_string(),
            threshold_amount: threshold,
            fee_buffer_amount: fee_buffer,
        }
    }

    fn fee() -> Coin {
        Coin::new(250_000, "untrn")
    }

    #[test]
    fn test_strict_threshold() {
        let cfg = config(1000, 500);

        assert!(!PushDecision::evaluate(0, 0, &cfg, fee()).should_push);
        assert!(!PushDecision::evaluate(999, 0, &cfg, fee()).should_push);
        assert!(!PushDecision::evaluate(1000, 0, &cfg, fee()).should_push);
        assert!(PushDecision::evaluate(1001, 0, &cfg, fee()).should_push);
    }

    #[test]
    fn test_zero_never_pushes_even_with_zero_threshold() {
        let cfg = config(0, 500);
        assert_eq!(PushDecision::evaluate(0, 0, &cfg, fee()), PushDecision::hold());
        assert!(PushDecision::evaluate(1, 0, &cfg, fee()).should_push);
    }

    #[test]
    fn test_full_sweep_amount() {
        let cfg = config(1000, 500);
        for observed in [1001, 1500, 10_000_000, u64::MAX] {
            let decision = PushDecision::evaluate(observed, 10_000, &cfg, fee());
            assert_eq!(decision.sweep_amount, observed);
        }
    }

    #[test]
    fn test_fee_attached_iff_gas_below_buffer() {
        let cfg = config(1000, 500);

        let low = PushDecision::evaluate(1500, 0, &cfg, fee());
        assert_eq!(low.fee_coins, vec![fee()]);

        let just_below = PushDecision::evaluate(1500, 499, &cfg, fee());
        assert_eq!(just_below.fee_coins.len(), 1);

        let at_buffer = PushDecision::evaluate(1500, 500, &cfg, fee());
        assert!(at_buffer.fee_coins.is_empty());

        let plenty = PushDecision::evaluate(1500, 1_000_000, &cfg, fee());
        assert!(plenty.fee_coins.is_empty());
    }

    #[test]
    fn test_fee_amount_independent_of_balance() {
        let cfg = config(1000, 500);
        let small = PushDecision::evaluate(1001, 0, &cfg, fee());
        let large = PushDecision::evaluate(9_999_999, 0, &cfg, fee());
        assert_eq!(small.fee_coins, large.fee_coins);
        assert_eq!(small.fee_coins[0].amount, 250_000);
    }

    #[test]
    fn test_no_fee_when_holding() {
        let cfg = config(1000, 500);
        let decision = PushDecision::evaluate(1000, 0, &cfg, fee());
        assert!(decision.fee_coins.is_empty());
        assert_eq!(decision.sweep_amount, 0);
    }
}
