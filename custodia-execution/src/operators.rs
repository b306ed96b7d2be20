//! Operator Registry plus the Collateral & Compensation Controller.
//!
//! Collateral is a pooled bond: `bonded_collateral` must always cover
//! `num_active_operators * collateral_per_operator`. The owner can reclaim
//! anything above that line; holders can seize one bond per defaulted
//! operator once the grace period has elapsed.

use custodia_types::error::BankError;
use custodia_types::instruction::ValueKind;
use custodia_types::state::{Address, BankState};
use tracing::info;

use crate::transfer;

fn bonded_count(state: &BankState) -> u64 {
    state.operators.values().filter(|op| op.collateral_posted).count() as u64
}

pub fn update_operator(
    state: &mut BankState,
    sender: &Address,
    operator: &Address,
    active: bool,
) -> Result<(), BankError> {
    if *sender != state.config.owner {
        return Err(BankError::NotAuthorized);
    }

    if active {
        let already_bonded = state
            .operators
            .get(operator)
            .map(|op| op.collateral_posted)
            .unwrap_or(false);
        if !already_bonded {
            let required = (bonded_count(state) + 1)
                .saturating_mul(state.config.collateral_per_operator);
            if state.bonded_collateral < required {
                return Err(BankError::InsufficientCollateral);
            }
        }
        let entry = state.operators.entry(*operator).or_default();
        entry.authorized = true;
        entry.collateral_posted = true;
    } else if let Some(entry) = state.operators.get_mut(operator) {
        entry.authorized = false;
    }
    Ok(())
}

pub fn post_collateral(state: &mut BankState, sender: &Address, amount: u64) -> Result<(), BankError> {
    let is_operator = state
        .operators
        .get(sender)
        .map(|op| op.authorized)
        .unwrap_or(false);
    if *sender != state.config.owner && !is_operator {
        return Err(BankError::NotAuthorized);
    }
    if amount < state.config.collateral_per_operator {
        return Err(BankError::InsufficientCollateral);
    }

    transfer::debit_value(state, sender, amount, ValueKind::Native)?;
    state.bonded_collateral += amount;
    if let Some(op) = state.operators.get_mut(sender) {
        if op.authorized {
            op.collateral_posted = true;
        }
    }
    Ok(())
}

pub fn withdraw_collateral(state: &mut BankState, sender: &Address) -> Result<(), BankError> {
    if *sender != state.config.owner {
        return Err(BankError::NotAuthorized);
    }
    let required = state
        .num_active_operators
        .saturating_mul(state.config.collateral_per_operator);
    let withdrawable = state.bonded_collateral.checked_sub(required).ok_or(BankError::Locked)?;
    if withdrawable == 0 {
        return Err(BankError::Locked);
    }

    state.bonded_collateral = required;
    let owner = state.config.owner;
    transfer::credit_value(state, &owner, withdrawable, ValueKind::Native);

    // Idle bonds were just reclaimed; only operators with a live loan stay
    // bonded.
    let loans = &state.loans;
    for (addr, op) in state.operators.iter_mut() {
        if !loans.contains_key(addr) {
            op.collateral_posted = false;
        }
    }
    Ok(())
}

/// Seizes the bond of every operator whose loan of the caller's assets has
/// aged past the grace period. The unreturned assets leave the registry;
/// the claim compensates for their loss, it does not recover them.
pub fn claim_compensation(state: &mut BankState, sender: &Address, now: u64) -> Result<(), BankError> {
    let holder_loans: Vec<Address> = state
        .loans
        .iter()
        .filter(|(_, loan)| loan.holder == *sender)
        .map(|(operator, _)| *operator)
        .collect();
    if holder_loans.is_empty() {
        return Err(BankError::NoActiveLoan);
    }

    let grace = state.config.grace_period_secs;
    let overdue: Vec<Address> = holder_loans
        .into_iter()
        .filter(|operator| {
            let loan = &state.loans[operator];
            now.saturating_sub(loan.borrowed_at) > grace
        })
        .collect();
    if overdue.is_empty() {
        return Err(BankError::TooEarly);
    }

    let per_operator = state.config.collateral_per_operator;
    let total = per_operator.saturating_mul(overdue.len() as u64);
    if state.bonded_collateral < total {
        return Err(BankError::InsufficientCollateral);
    }

    for operator in &overdue {
        let Some(loan) = state.loans.remove(operator) else { continue };
        for id in &loan.asset_ids {
            state.custody.remove(id);
        }
        if let Some(op) = state.operators.get_mut(operator) {
            op.authorized = false;
            op.collateral_posted = false;
        }
        state.num_active_operators -= 1;
        info!(operator = %hex::encode(operator), "operator defaulted, bond forfeited");
    }
    state.bonded_collateral -= total;
    transfer::credit_value(state, sender, total, ValueKind::Native);
    Ok(())
}
