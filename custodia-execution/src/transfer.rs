//! Fungible / unique / semi-fungible movement. Every transfer validates
//! fully before mutating, so a failed move leaves no partial state.

use custodia_types::asset::AssetBundle;
use custodia_types::error::BankError;
use custodia_types::instruction::ValueKind;
use custodia_types::state::{Address, AssetId, BankState};

pub fn balance_of(state: &BankState, addr: &Address, kind: ValueKind) -> u64 {
    state
        .accounts
        .get(addr)
        .map(|acct| match kind {
            ValueKind::Native => acct.native_balance,
            ValueKind::Reward => acct.reward_balance,
        })
        .unwrap_or(0)
}

pub fn credit_value(state: &mut BankState, addr: &Address, amount: u64, kind: ValueKind) {
    let acct = state.accounts.entry(*addr).or_default();
    match kind {
        ValueKind::Native => acct.native_balance += amount,
        ValueKind::Reward => acct.reward_balance += amount,
    }
}

pub fn debit_value(
    state: &mut BankState,
    addr: &Address,
    amount: u64,
    kind: ValueKind,
) -> Result<(), BankError> {
    let acct = state.accounts.entry(*addr).or_default();
    let balance = match kind {
        ValueKind::Native => &mut acct.native_balance,
        ValueKind::Reward => &mut acct.reward_balance,
    };
    if *balance < amount {
        return Err(BankError::InsufficientBalance);
    }
    *balance -= amount;
    Ok(())
}

/// Moves a bundle of any asset kind between two physical holders.
pub fn move_bundle(
    state: &mut BankState,
    from: &Address,
    to: &Address,
    bundle: &AssetBundle,
) -> Result<(), BankError> {
    match bundle {
        AssetBundle::Fungible { kind, amount } => {
            debit_value(state, from, *amount, *kind)?;
            credit_value(state, to, *amount, *kind);
            Ok(())
        }
        AssetBundle::Unique { ids } => {
            for id in ids {
                match state.asset_owner.get(id) {
                    Some(owner) if owner == from => {}
                    _ => return Err(BankError::NotOwner { id: *id }),
                }
            }
            for id in ids {
                state.asset_owner.insert(*id, *to);
            }
            Ok(())
        }
        AssetBundle::SemiFungible { parts } => {
            for (id, amount) in parts {
                let held = state
                    .accounts
                    .get(from)
                    .and_then(|acct| acct.sft_balances.get(id))
                    .copied()
                    .unwrap_or(0);
                if held < *amount {
                    return Err(BankError::InsufficientBalance);
                }
            }
            for (id, amount) in parts {
                let src = state.accounts.entry(*from).or_default();
                *src.sft_balances.entry(*id).or_default() -= amount;
                let dst = state.accounts.entry(*to).or_default();
                *dst.sft_balances.entry(*id).or_default() += amount;
            }
            Ok(())
        }
    }
}

pub fn mint_value(
    state: &mut BankState,
    sender: &Address,
    to: &Address,
    amount: u64,
    kind: ValueKind,
) -> Result<(), BankError> {
    if *sender != state.config.owner {
        return Err(BankError::NotAuthorized);
    }
    credit_value(state, to, amount, kind);
    Ok(())
}

pub fn mint_assets(
    state: &mut BankState,
    sender: &Address,
    to: &Address,
    ids: &[AssetId],
) -> Result<(), BankError> {
    if *sender != state.config.owner {
        return Err(BankError::NotAuthorized);
    }
    for id in ids {
        if state.asset_owner.contains_key(id) {
            return Err(BankError::AssetUnavailable { id: *id });
        }
    }
    for id in ids {
        state.asset_owner.insert(*id, *to);
    }
    Ok(())
}

pub fn transfer_value(
    state: &mut BankState,
    sender: &Address,
    to: &Address,
    amount: u64,
    kind: ValueKind,
) -> Result<(), BankError> {
    move_bundle(state, sender, to, &AssetBundle::Fungible { kind, amount })
}
