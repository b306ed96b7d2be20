use super::*;
use custodia_types::error::BankError;
use custodia_types::instruction::{BankInstruction, ValueKind};
use custodia_types::state::{Address, BankConfig, BankState};

const OWNER: Address = [0xAA; 32];
const OP1: Address = [0x01; 32];
const OP2: Address = [0x02; 32];
const HOLDER1: Address = [0x11; 32];
const HOLDER2: Address = [0x12; 32];

const CPO: u64 = 1_000;

fn exec(state: &mut BankState, sender: &Address, ix: BankInstruction, timestamp: u64) -> Result<(), BankError> {
    let mut ctx = ExecutionContext { state, timestamp };
    execute_instruction(&ix, sender, &mut ctx)
}

/// Two bonded operators, two holders with ten custodied assets each
/// (ids 1..=10 and 11..=20).
fn setup() -> BankState {
    let mut state = BankState {
        config: BankConfig {
            owner: OWNER,
            collateral_per_operator: CPO,
            fee_per_asset: 0,
            ..Default::default()
        },
        ..Default::default()
    };

    exec(&mut state, &OWNER, BankInstruction::MintValue {
        to: OWNER,
        amount: 10 * CPO,
        kind: ValueKind::Native,
    }, 0).unwrap();
    exec(&mut state, &OWNER, BankInstruction::PostCollateral { amount: 2 * CPO }, 0).unwrap();
    for op in [OP1, OP2] {
        exec(&mut state, &OWNER, BankInstruction::UpdateOperator { operator: op, active: true }, 0).unwrap();
    }

    for (holder, ids) in [(HOLDER1, 1..=10u64), (HOLDER2, 11..=20u64)] {
        let ids: Vec<u64> = ids.collect();
        exec(&mut state, &OWNER, BankInstruction::MintAssets { to: holder, ids: ids.clone() }, 0).unwrap();
        exec(&mut state, &holder, BankInstruction::Deposit { asset_ids: ids }, 0).unwrap();
    }

    audit::check_invariants(&state).unwrap();
    state
}

#[test]
fn borrow_repay_cycle() {
    let mut state = setup();

    // ids 8..10 belong to holder1, 11 to holder2
    assert_eq!(
        exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![8, 9, 10, 11] }, 100),
        Err(BankError::MixedDepositors)
    );

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![7, 8, 9, 10] }, 100).unwrap();
    assert_eq!(state.unique_balance_of(&OP1), 4);
    assert_eq!(state.num_active_operators, 1);

    // a second concurrent loan is rejected
    assert_eq!(
        exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2] }, 110),
        Err(BankError::AlreadyBorrowed)
    );

    exec(&mut state, &OP1, BankInstruction::Repay, 200).unwrap();
    assert_eq!(state.unique_balance_of(&OP1), 0);
    assert_eq!(state.score_of(&HOLDER1), 4);
    assert_eq!(state.total_score, 4);
    assert_eq!(state.num_active_operators, 0);
    audit::check_invariants(&state).unwrap();
}

#[test]
fn over_borrow_rejected() {
    let mut state = setup();
    let before = state.clone();

    assert_eq!(
        exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2, 3, 4, 5, 6, 7] }, 100),
        Err(BankError::BatchTooLarge { len: 7, max: 6 })
    );
    assert_eq!(state, before);
}

#[test]
fn borrow_requires_bonded_operator() {
    let mut state = setup();

    let stranger = [0x77; 32];
    assert_eq!(
        exec(&mut state, &stranger, BankInstruction::Borrow { asset_ids: vec![1] }, 100),
        Err(BankError::NotAuthorized)
    );

    exec(&mut state, &OWNER, BankInstruction::UpdateOperator { operator: OP1, active: false }, 100).unwrap();
    assert_eq!(
        exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1] }, 100),
        Err(BankError::NotAuthorized)
    );

    // re-authorization reuses the still-posted bond
    exec(&mut state, &OWNER, BankInstruction::UpdateOperator { operator: OP1, active: true }, 100).unwrap();
    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1] }, 100).unwrap();
}

#[test]
fn borrow_rejects_unavailable_assets() {
    let mut state = setup();

    // not custodied
    assert_eq!(
        exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![99] }, 100),
        Err(BankError::AssetUnavailable { id: 99 })
    );
    // duplicate id in one batch
    assert_eq!(
        exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 1] }, 100),
        Err(BankError::AssetUnavailable { id: 1 })
    );
    assert_eq!(
        exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![] }, 100),
        Err(BankError::EmptyBatch)
    );

    // already on loan to another operator
    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2] }, 100).unwrap();
    assert_eq!(
        exec(&mut state, &OP2, BankInstruction::Borrow { asset_ids: vec![2, 3] }, 100),
        Err(BankError::AssetUnavailable { id: 2 })
    );
}

#[test]
fn withdraw_assets() {
    let mut state = setup();

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2, 3] }, 100).unwrap();
    assert_eq!(
        exec(&mut state, &HOLDER1, BankInstruction::Withdraw { asset_ids: vec![1, 2, 3] }, 100),
        Err(BankError::OnLoan { id: 1 })
    );

    exec(&mut state, &OP1, BankInstruction::Repay, 200).unwrap();
    assert_eq!(
        exec(&mut state, &HOLDER2, BankInstruction::Withdraw { asset_ids: vec![1, 2, 3] }, 200),
        Err(BankError::NotOwner { id: 1 })
    );

    exec(&mut state, &HOLDER1, BankInstruction::Withdraw { asset_ids: vec![1, 2, 3] }, 200).unwrap();
    for id in [1u64, 2, 3] {
        assert_eq!(state.asset_owner.get(&id), Some(&HOLDER1));
        assert!(!state.custody.contains_key(&id));
    }
    assert_eq!(state.custodied_assets_of(&HOLDER1), vec![4, 5, 6, 7, 8, 9, 10]);
    audit::check_invariants(&state).unwrap();
}

#[test]
fn deposit_requires_ownership() {
    let mut state = setup();

    // id 1 is already custodied (physically held by the ledger)
    assert_eq!(
        exec(&mut state, &HOLDER1, BankInstruction::Deposit { asset_ids: vec![1] }, 0),
        Err(BankError::NotOwner { id: 1 })
    );
    assert_eq!(
        exec(&mut state, &HOLDER1, BankInstruction::Deposit { asset_ids: vec![999] }, 0),
        Err(BankError::NotOwner { id: 999 })
    );
}

#[test]
fn collateral_withdrawal() {
    let mut state = setup();

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2, 3, 4, 5] }, 100).unwrap();
    assert_eq!(state.num_active_operators, 1);

    let owner_before = transfer::balance_of(&state, &OWNER, ValueKind::Native);
    exec(&mut state, &OWNER, BankInstruction::WithdrawCollateral, 100).unwrap();
    let owner_after = transfer::balance_of(&state, &OWNER, ValueKind::Native);
    assert_eq!(owner_after - owner_before, CPO);
    assert_eq!(state.bonded_collateral, CPO);

    // nothing idle remains
    assert_eq!(
        exec(&mut state, &OWNER, BankInstruction::WithdrawCollateral, 100),
        Err(BankError::Locked)
    );

    // the idle operator lost its bond and cannot borrow until re-bonded
    assert_eq!(
        exec(&mut state, &OP2, BankInstruction::Borrow { asset_ids: vec![11] }, 100),
        Err(BankError::NotAuthorized)
    );
    audit::check_invariants(&state).unwrap();
}

#[test]
fn authorization_requires_collateral() {
    let mut state = BankState {
        config: BankConfig { owner: OWNER, collateral_per_operator: CPO, ..Default::default() },
        ..Default::default()
    };

    assert_eq!(
        exec(&mut state, &OWNER, BankInstruction::UpdateOperator { operator: OP1, active: true }, 0),
        Err(BankError::InsufficientCollateral)
    );

    exec(&mut state, &OWNER, BankInstruction::MintValue {
        to: OWNER,
        amount: 2 * CPO,
        kind: ValueKind::Native,
    }, 0).unwrap();
    assert_eq!(
        exec(&mut state, &OWNER, BankInstruction::PostCollateral { amount: CPO - 1 }, 0),
        Err(BankError::InsufficientCollateral)
    );
    exec(&mut state, &OWNER, BankInstruction::PostCollateral { amount: CPO }, 0).unwrap();
    exec(&mut state, &OWNER, BankInstruction::UpdateOperator { operator: OP1, active: true }, 0).unwrap();

    // pool covers one bonded operator, not two
    assert_eq!(
        exec(&mut state, &OWNER, BankInstruction::UpdateOperator { operator: OP2, active: true }, 0),
        Err(BankError::InsufficientCollateral)
    );

    assert_eq!(
        exec(&mut state, &OP1, BankInstruction::UpdateOperator { operator: OP1, active: true }, 0),
        Err(BankError::NotAuthorized)
    );
}

#[test]
fn usage_fee_paid_at_repay() {
    let mut state = setup();
    state.config.fee_per_asset = 5;

    exec(&mut state, &OWNER, BankInstruction::MintValue {
        to: HOLDER1,
        amount: 100,
        kind: ValueKind::Native,
    }, 0).unwrap();

    let owner_before = transfer::balance_of(&state, &OWNER, ValueKind::Native);
    for i in 0..5u64 {
        exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2] }, i * 10).unwrap();
        exec(&mut state, &OP1, BankInstruction::Repay, i * 10 + 5).unwrap();
    }
    let owner_after = transfer::balance_of(&state, &OWNER, ValueKind::Native);

    assert_eq!(owner_after - owner_before, 5 * 10);
    assert_eq!(transfer::balance_of(&state, &HOLDER1, ValueKind::Native), 50);
    assert_eq!(state.score_of(&HOLDER1), 10);
}

#[test]
fn repay_fails_atomically_when_fee_unpayable() {
    let mut state = setup();
    state.config.fee_per_asset = 5;

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2] }, 100).unwrap();
    assert_eq!(
        exec(&mut state, &OP1, BankInstruction::Repay, 200),
        Err(BankError::InsufficientBalance)
    );

    // the loan is still live and no score was credited
    assert!(state.loans.contains_key(&OP1));
    assert_eq!(state.total_score, 0);
    assert_eq!(state.unique_balance_of(&OP1), 2);
    audit::check_invariants(&state).unwrap();
}

#[test]
fn repay_is_not_repeatable() {
    let mut state = setup();

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2, 3] }, 100).unwrap();
    exec(&mut state, &OP1, BankInstruction::Repay, 150).unwrap();
    assert_eq!(state.score_of(&HOLDER1), 3);

    assert_eq!(exec(&mut state, &OP1, BankInstruction::Repay, 160), Err(BankError::NoActiveLoan));
    assert_eq!(state.score_of(&HOLDER1), 3);
    assert_eq!(state.total_score, 3);
}

#[test]
fn compensation_timeout() {
    let mut state = setup();
    let grace = state.config.grace_period_secs;

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2, 3, 4, 5] }, 1_000).unwrap();
    exec(&mut state, &OP2, BankInstruction::Borrow { asset_ids: vec![6, 7, 8, 9, 10] }, 1_000).unwrap();
    assert_eq!(state.num_active_operators, 2);

    assert_eq!(
        exec(&mut state, &HOLDER1, BankInstruction::ClaimCompensation, 1_000 + grace),
        Err(BankError::TooEarly)
    );
    assert_eq!(
        exec(&mut state, &HOLDER2, BankInstruction::ClaimCompensation, 1_000 + grace + 1),
        Err(BankError::NoActiveLoan)
    );

    exec(&mut state, &HOLDER1, BankInstruction::ClaimCompensation, 1_000 + grace + 1).unwrap();
    assert_eq!(transfer::balance_of(&state, &HOLDER1, ValueKind::Native), 2 * CPO);
    assert_eq!(state.num_active_operators, 0);
    assert_eq!(state.bonded_collateral, 0);
    assert!(!state.operators[&OP1].authorized);
    assert!(!state.operators[&OP2].authorized);

    // the unreturned assets left the registry but stayed with the operators
    assert!(!state.custody.contains_key(&1));
    assert_eq!(state.unique_balance_of(&OP1), 5);
    assert_eq!(state.total_score, 0);

    assert_eq!(
        exec(&mut state, &HOLDER1, BankInstruction::ClaimCompensation, 1_000 + grace + 2),
        Err(BankError::NoActiveLoan)
    );
    audit::check_invariants(&state).unwrap();
}

#[test]
fn compensation_only_sweeps_overdue_loans() {
    let mut state = setup();
    let grace = state.config.grace_period_secs;

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2] }, 0).unwrap();
    exec(&mut state, &OP2, BankInstruction::Borrow { asset_ids: vec![3, 4] }, grace).unwrap();

    exec(&mut state, &HOLDER1, BankInstruction::ClaimCompensation, grace + 1).unwrap();
    assert_eq!(transfer::balance_of(&state, &HOLDER1, ValueKind::Native), CPO);
    assert_eq!(state.num_active_operators, 1);
    assert!(state.loans.contains_key(&OP2));
    audit::check_invariants(&state).unwrap();
}

#[test]
fn proportional_settlement() {
    let mut state = setup();

    // holder1 contributes 2 asset-uses, holder2 contributes 4
    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2] }, 0).unwrap();
    exec(&mut state, &OP1, BankInstruction::Repay, 10).unwrap();
    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![11, 12, 13, 14] }, 20).unwrap();
    exec(&mut state, &OP1, BankInstruction::Repay, 30).unwrap();
    assert_eq!(state.total_score, 6);

    exec(&mut state, &OWNER, BankInstruction::MintValue {
        to: OWNER,
        amount: 6,
        kind: ValueKind::Reward,
    }, 40).unwrap();
    exec(&mut state, &OWNER, BankInstruction::DepositRevenue { amount: 6 }, 40).unwrap();

    // exact claim of 2 units surrenders 2 score points (2 * 6/6)
    exec(&mut state, &HOLDER2, BankInstruction::ClaimRevenueExact { amount: 2 }, 50).unwrap();
    assert_eq!(transfer::balance_of(&state, &HOLDER2, ValueKind::Reward), 2);
    assert_eq!(state.score_of(&HOLDER2), 2);
    assert_eq!(state.total_score, 4);
    assert_eq!(state.revenue_balance, 4);

    // full claim pays the remaining entitlement
    exec(&mut state, &HOLDER2, BankInstruction::ClaimRevenue, 60).unwrap();
    assert_eq!(transfer::balance_of(&state, &HOLDER2, ValueKind::Reward), 4);
    assert_eq!(state.score_of(&HOLDER2), 0);
    assert_eq!(state.total_score, 2);
    assert_eq!(state.revenue_balance, 2);

    exec(&mut state, &HOLDER1, BankInstruction::ClaimRevenue, 70).unwrap();
    assert_eq!(transfer::balance_of(&state, &HOLDER1, ValueKind::Reward), 2);
    assert_eq!(state.revenue_balance, 0);
    assert_eq!(state.total_score, 0);
    audit::check_invariants(&state).unwrap();
}

#[test]
fn forty_sixty_split() {
    let mut state = setup();

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2, 3, 4] }, 0).unwrap();
    exec(&mut state, &OP1, BankInstruction::Repay, 10).unwrap();
    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![11, 12, 13, 14, 15, 16] }, 20).unwrap();
    exec(&mut state, &OP1, BankInstruction::Repay, 30).unwrap();

    assert_eq!(state.score_of(&HOLDER1), 4);
    assert_eq!(state.score_of(&HOLDER2), 6);
    assert_eq!(state.total_score, 10);

    exec(&mut state, &OWNER, BankInstruction::MintValue {
        to: OWNER,
        amount: 100,
        kind: ValueKind::Reward,
    }, 40).unwrap();
    exec(&mut state, &OWNER, BankInstruction::DepositRevenue { amount: 100 }, 40).unwrap();

    exec(&mut state, &HOLDER1, BankInstruction::ClaimRevenue, 50).unwrap();
    assert_eq!(transfer::balance_of(&state, &HOLDER1, ValueKind::Reward), 40);

    exec(&mut state, &HOLDER2, BankInstruction::ClaimRevenue, 60).unwrap();
    assert_eq!(transfer::balance_of(&state, &HOLDER2, ValueKind::Reward), 60);
    assert_eq!(state.revenue_balance, 0);
}

#[test]
fn settlement_edge_cases() {
    let mut state = setup();

    assert_eq!(
        exec(&mut state, &HOLDER1, BankInstruction::ClaimRevenue, 0),
        Err(BankError::NoScore)
    );

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2] }, 0).unwrap();
    exec(&mut state, &OP1, BankInstruction::Repay, 10).unwrap();

    // empty pool: any positive exact claim exceeds entitlement
    assert_eq!(
        exec(&mut state, &HOLDER1, BankInstruction::ClaimRevenueExact { amount: 1 }, 20),
        Err(BankError::ExceedsEntitlement)
    );
    // zero-amount claim is a no-op
    exec(&mut state, &HOLDER1, BankInstruction::ClaimRevenueExact { amount: 0 }, 20).unwrap();
    assert_eq!(state.score_of(&HOLDER1), 2);

    exec(&mut state, &OWNER, BankInstruction::MintValue {
        to: OWNER,
        amount: 10,
        kind: ValueKind::Reward,
    }, 30).unwrap();
    exec(&mut state, &OWNER, BankInstruction::DepositRevenue { amount: 10 }, 30).unwrap();

    // more than the pool holds
    assert_eq!(
        exec(&mut state, &HOLDER1, BankInstruction::ClaimRevenueExact { amount: 11 }, 40),
        Err(BankError::ExceedsEntitlement)
    );

    // full claim truncates toward zero, dust stays pooled
    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![11] }, 50).unwrap();
    exec(&mut state, &OP1, BankInstruction::Repay, 60).unwrap();
    // holder1 score 2, holder2 score 1, pool 10: holder2 gets floor(10/3)
    exec(&mut state, &HOLDER2, BankInstruction::ClaimRevenue, 70).unwrap();
    assert_eq!(transfer::balance_of(&state, &HOLDER2, ValueKind::Reward), 3);
    assert_eq!(state.revenue_balance, 7);
    audit::check_invariants(&state).unwrap();
}

#[test]
fn exact_claim_rounds_surrendered_score_up() {
    let mut state = setup();

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2] }, 0).unwrap();
    exec(&mut state, &OP1, BankInstruction::Repay, 10).unwrap();
    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![11] }, 20).unwrap();
    exec(&mut state, &OP1, BankInstruction::Repay, 30).unwrap();
    assert_eq!(state.total_score, 3);

    exec(&mut state, &OWNER, BankInstruction::MintValue {
        to: OWNER,
        amount: 10,
        kind: ValueKind::Reward,
    }, 40).unwrap();
    exec(&mut state, &OWNER, BankInstruction::DepositRevenue { amount: 10 }, 40).unwrap();

    // 1 unit is worth 3/10 of a score point; truncation would surrender
    // nothing, the round-up charges a whole point
    exec(&mut state, &HOLDER1, BankInstruction::ClaimRevenueExact { amount: 1 }, 50).unwrap();
    assert_eq!(transfer::balance_of(&state, &HOLDER1, ValueKind::Reward), 1);
    assert_eq!(state.score_of(&HOLDER1), 1);
    assert_eq!(state.total_score, 2);
    assert_eq!(state.revenue_balance, 9);
    audit::check_invariants(&state).unwrap();
}

#[test]
fn full_claim_against_empty_pool_zeroes_score() {
    let mut state = setup();

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2] }, 0).unwrap();
    exec(&mut state, &OP1, BankInstruction::Repay, 10).unwrap();
    assert_eq!(state.score_of(&HOLDER1), 2);

    // nothing to pay out, but full redemption still retires the score
    exec(&mut state, &HOLDER1, BankInstruction::ClaimRevenue, 20).unwrap();
    assert_eq!(transfer::balance_of(&state, &HOLDER1, ValueKind::Reward), 0);
    assert_eq!(state.score_of(&HOLDER1), 0);
    assert_eq!(state.total_score, 0);
    audit::check_invariants(&state).unwrap();
}

#[test]
fn signed_transaction_envelope() {
    use custodia_crypto::signatures::{generate_keypair, sign};
    use custodia_types::transaction::Transaction;

    let key = generate_keypair();
    let sender = key.verifying_key().to_bytes();

    let mut state = BankState {
        config: BankConfig { owner: sender, collateral_per_operator: CPO, ..Default::default() },
        ..Default::default()
    };

    let mut tx = Transaction {
        sender,
        nonce: 0,
        instruction: BankInstruction::MintValue { to: sender, amount: 50, kind: ValueKind::Native },
        signature: vec![],
    };
    tx.signature = sign(&key, &tx.signing_bytes());

    let mut ctx = ExecutionContext { state: &mut state, timestamp: 0 };
    execute_transaction(&tx, &mut ctx).unwrap();
    assert_eq!(transfer::balance_of(&state, &sender, ValueKind::Native), 50);

    // replay is rejected by the nonce
    let mut ctx = ExecutionContext { state: &mut state, timestamp: 1 };
    assert_eq!(
        execute_transaction(&tx, &mut ctx),
        Err(BankError::InvalidNonce { expected: 1, got: 0 })
    );

    // tampered payload fails signature verification
    let mut bad = tx.clone();
    bad.nonce = 1;
    let mut ctx = ExecutionContext { state: &mut state, timestamp: 2 };
    assert_eq!(execute_transaction(&bad, &mut ctx), Err(BankError::InvalidSignature));

    // a failing instruction still consumes its nonce
    let mut failing = Transaction {
        sender,
        nonce: 1,
        instruction: BankInstruction::Repay,
        signature: vec![],
    };
    failing.signature = sign(&key, &failing.signing_bytes());
    let mut ctx = ExecutionContext { state: &mut state, timestamp: 3 };
    assert_eq!(execute_transaction(&failing, &mut ctx), Err(BankError::NoActiveLoan));
    assert_eq!(state.accounts[&sender].nonce, 2);
}

#[test]
fn semi_fungible_transfers() {
    let mut state = setup();

    state.accounts.entry(HOLDER1).or_default().sft_balances.insert(7, 10);

    let bundle = custodia_types::asset::AssetBundle::SemiFungible { parts: vec![(7, 4)] };
    transfer::move_bundle(&mut state, &HOLDER1, &HOLDER2, &bundle).unwrap();
    assert_eq!(state.accounts[&HOLDER1].sft_balances[&7], 6);
    assert_eq!(state.accounts[&HOLDER2].sft_balances[&7], 4);

    let too_much = custodia_types::asset::AssetBundle::SemiFungible { parts: vec![(7, 100)] };
    assert_eq!(
        transfer::move_bundle(&mut state, &HOLDER1, &HOLDER2, &too_much),
        Err(BankError::InsufficientBalance)
    );
}

#[test]
fn ledger_conserves_value_across_a_full_cycle() {
    let mut state = setup();
    let grace = state.config.grace_period_secs;

    exec(&mut state, &OP1, BankInstruction::Borrow { asset_ids: vec![1, 2, 3] }, 0).unwrap();
    exec(&mut state, &OP1, BankInstruction::Repay, 10).unwrap();
    exec(&mut state, &OP2, BankInstruction::Borrow { asset_ids: vec![4, 5] }, 20).unwrap();
    exec(&mut state, &HOLDER1, BankInstruction::ClaimCompensation, 20 + grace + 1).unwrap();

    // native value: everything minted in setup is still accounted for
    let minted = 10 * CPO;
    let held: u64 = state.accounts.values().map(|a| a.native_balance).sum();
    assert_eq!(held + state.bonded_collateral, minted);
    audit::check_invariants(&state).unwrap();
}
