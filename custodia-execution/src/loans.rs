//! Loan State Machine: Idle -> Borrowed -> Idle (repay) or Defaulted
//! (compensation, see `operators::claim_compensation`).

use std::collections::HashSet;

use custodia_types::asset::AssetBundle;
use custodia_types::error::BankError;
use custodia_types::instruction::ValueKind;
use custodia_types::state::{Address, AssetId, BankState, Loan, LEDGER_ADDRESS};

use crate::{rewards, transfer};

pub fn borrow(
    state: &mut BankState,
    operator: &Address,
    asset_ids: &[AssetId],
    now: u64,
) -> Result<(), BankError> {
    let bonded = state
        .operators
        .get(operator)
        .map(|op| op.is_bonded())
        .unwrap_or(false);
    if !bonded {
        return Err(BankError::NotAuthorized);
    }
    if state.loans.contains_key(operator) {
        return Err(BankError::AlreadyBorrowed);
    }
    if asset_ids.is_empty() {
        return Err(BankError::EmptyBatch);
    }
    if asset_ids.len() > state.config.max_batch_size {
        return Err(BankError::BatchTooLarge {
            len: asset_ids.len(),
            max: state.config.max_batch_size,
        });
    }

    let mut seen = HashSet::new();
    let mut holder: Option<Address> = None;
    for id in asset_ids {
        if !seen.insert(*id) {
            return Err(BankError::AssetUnavailable { id: *id });
        }
        let rec = state.custody.get(id).ok_or(BankError::AssetUnavailable { id: *id })?;
        if rec.loaned_to.is_some() {
            return Err(BankError::AssetUnavailable { id: *id });
        }
        match holder {
            None => holder = Some(rec.depositor),
            Some(h) if h == rec.depositor => {}
            Some(_) => return Err(BankError::MixedDepositors),
        }
    }
    let holder = holder.ok_or(BankError::EmptyBatch)?;

    transfer::move_bundle(
        state,
        &LEDGER_ADDRESS,
        operator,
        &AssetBundle::Unique { ids: asset_ids.to_vec() },
    )?;
    for id in asset_ids {
        if let Some(rec) = state.custody.get_mut(id) {
            rec.loaned_to = Some(*operator);
        }
    }
    state.loans.insert(
        *operator,
        Loan { holder, asset_ids: asset_ids.to_vec(), borrowed_at: now },
    );
    state.num_active_operators += 1;
    Ok(())
}

pub fn repay(state: &mut BankState, operator: &Address) -> Result<(), BankError> {
    let loan = state.loans.get(operator).cloned().ok_or(BankError::NoActiveLoan)?;
    let bundle = AssetBundle::Unique { ids: loan.asset_ids.clone() };

    // The usage fee is a toll paid by the holder to the owner, independent
    // of score credit. Checked up front so a failed repay changes nothing.
    let fee = state.config.fee_per_asset.saturating_mul(bundle.value_of());
    if fee > 0 && transfer::balance_of(state, &loan.holder, ValueKind::Native) < fee {
        return Err(BankError::InsufficientBalance);
    }

    transfer::move_bundle(state, operator, &LEDGER_ADDRESS, &bundle)?;
    for id in &loan.asset_ids {
        if let Some(rec) = state.custody.get_mut(id) {
            rec.loaned_to = None;
        }
    }
    if fee > 0 {
        transfer::debit_value(state, &loan.holder, fee, ValueKind::Native)?;
        let owner = state.config.owner;
        transfer::credit_value(state, &owner, fee, ValueKind::Native);
    }
    rewards::credit(state, &loan.holder, bundle.value_of());
    state.loans.remove(operator);
    state.num_active_operators -= 1;
    Ok(())
}
