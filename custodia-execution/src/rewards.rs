//! Score Ledger and Reward Settlement.
//!
//! Settlement uses the instantaneous ratio `revenue_balance / total_score`,
//! recomputed at every claim. Integer division truncates toward zero, so
//! residual dust stays in the pool for later claimants.

use custodia_types::error::BankError;
use custodia_types::instruction::ValueKind;
use custodia_types::state::{Address, BankState};

use crate::transfer;

pub fn credit(state: &mut BankState, holder: &Address, amount: u64) {
    *state.scores.entry(*holder).or_default() += amount;
    state.total_score += amount;
}

pub fn debit(state: &mut BankState, holder: &Address, amount: u64) -> Result<(), BankError> {
    let score = state.scores.get_mut(holder).filter(|s| **s >= amount);
    let Some(score) = score else {
        return Err(BankError::InsufficientScore);
    };
    *score -= amount;
    if *score == 0 {
        state.scores.remove(holder);
    }
    state.total_score -= amount;
    Ok(())
}

pub fn deposit_revenue(state: &mut BankState, sender: &Address, amount: u64) -> Result<(), BankError> {
    transfer::debit_value(state, sender, amount, ValueKind::Reward)?;
    state.revenue_balance += amount;
    Ok(())
}

/// Full redemption: pays out the holder's entire proportional share and
/// zeroes their score. The score is retired even when the pool is empty,
/// so a full claim against zero revenue pays nothing and forfeits the
/// score; use [`claim_revenue_exact`] to redeem without giving up the rest.
pub fn claim_revenue(state: &mut BankState, sender: &Address) -> Result<(), BankError> {
    let score = state.score_of(sender);
    if score == 0 {
        return Err(BankError::NoScore);
    }

    let payout = ((state.revenue_balance as u128 * score as u128)
        / state.total_score as u128) as u64;

    debit(state, sender, score)?;
    state.revenue_balance -= payout;
    transfer::credit_value(state, sender, payout, ValueKind::Reward);
    Ok(())
}

/// Partial redemption: pays exactly `amount` and surrenders the score that
/// amount is worth at the current ratio, rounded up.
pub fn claim_revenue_exact(state: &mut BankState, sender: &Address, amount: u64) -> Result<(), BankError> {
    if amount == 0 {
        return Ok(());
    }
    let score = state.score_of(sender);
    if score == 0 {
        return Err(BankError::NoScore);
    }
    if amount > state.revenue_balance {
        return Err(BankError::ExceedsEntitlement);
    }

    let revenue = state.revenue_balance as u128;
    let required = (amount as u128 * state.total_score as u128).div_ceil(revenue);
    if required > score as u128 {
        return Err(BankError::ExceedsEntitlement);
    }

    debit(state, sender, required as u64)?;
    state.revenue_balance -= amount;
    transfer::credit_value(state, sender, amount, ValueKind::Reward);
    Ok(())
}
