use custodia_types::state::{
    AccountState, Address, BankConfig, BankState, UNIT,
};
use std::collections::HashMap;

/// Builds the initial bank state. The owner account is funded with enough
/// native balance to bond an initial operator set; everything else starts
/// empty.
pub fn create_genesis_state(owner: Address) -> BankState {
    let config = BankConfig { owner, ..Default::default() };

    let mut accounts = HashMap::new();
    accounts.insert(owner, AccountState {
        nonce: 0,
        native_balance: 1_000_000 * UNIT,
        reward_balance: 0,
        sft_balances: HashMap::new(),
    });

    BankState {
        config,
        accounts,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_is_empty_apart_from_the_owner() {
        let owner = [7u8; 32];
        let state = create_genesis_state(owner);

        assert_eq!(state.config.owner, owner);
        assert_eq!(state.accounts.len(), 1);
        assert!(state.accounts[&owner].native_balance >= state.config.collateral_per_operator);
        assert_eq!(state.total_score, 0);
        assert_eq!(state.bonded_collateral, 0);
        assert!(state.custody.is_empty());
        assert!(state.loans.is_empty());
    }
}
