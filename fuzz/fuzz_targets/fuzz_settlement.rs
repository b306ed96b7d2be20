#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use custodia_execution::{audit, rewards};
use custodia_types::state::BankState;

#[derive(Arbitrary, Debug)]
struct SettlementInput {
    scores: [u16; 4],
    revenue: u32,
    claims: Vec<(u8, u32, bool)>,
}

fuzz_target!(|data: SettlementInput| {
    let mut state = BankState::default();

    let holders: [[u8; 32]; 4] = [[1u8; 32], [2u8; 32], [3u8; 32], [4u8; 32]];
    for (holder, score) in holders.iter().zip(data.scores) {
        if score > 0 {
            rewards::credit(&mut state, holder, score as u64);
        }
    }
    state.revenue_balance = data.revenue as u64;
    let initial_revenue = state.revenue_balance;

    for (who, amount, full) in data.claims.iter().take(64) {
        let holder = holders[(*who % 4) as usize];
        if *full {
            let _ = rewards::claim_revenue(&mut state, &holder);
        } else {
            let _ = rewards::claim_revenue_exact(&mut state, &holder, *amount as u64);
        }
    }

    // Conservation: every unit paid out came from the pool, nothing more.
    let paid: u64 = state.accounts.values().map(|a| a.reward_balance).sum();
    assert_eq!(paid + state.revenue_balance, initial_revenue);

    audit::check_invariants(&state).expect("invariants");
});
