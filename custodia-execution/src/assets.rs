//! Asset Registry: which unique assets are custodied and who deposited them.

use custodia_types::asset::AssetBundle;
use custodia_types::error::BankError;
use custodia_types::state::{Address, AssetId, BankState, CustodyRecord, LEDGER_ADDRESS};

use crate::transfer;

pub fn deposit(state: &mut BankState, sender: &Address, asset_ids: &[AssetId]) -> Result<(), BankError> {
    if asset_ids.is_empty() {
        return Err(BankError::EmptyBatch);
    }
    for id in asset_ids {
        match state.asset_owner.get(id) {
            Some(owner) if owner == sender => {}
            _ => return Err(BankError::NotOwner { id: *id }),
        }
        if state.custody.contains_key(id) {
            return Err(BankError::AssetUnavailable { id: *id });
        }
    }

    transfer::move_bundle(
        state,
        sender,
        &LEDGER_ADDRESS,
        &AssetBundle::Unique { ids: asset_ids.to_vec() },
    )?;
    for id in asset_ids {
        state.custody.insert(*id, CustodyRecord { depositor: *sender, loaned_to: None });
    }
    Ok(())
}

pub fn withdraw(state: &mut BankState, sender: &Address, asset_ids: &[AssetId]) -> Result<(), BankError> {
    if asset_ids.is_empty() {
        return Err(BankError::EmptyBatch);
    }
    for id in asset_ids {
        let rec = state.custody.get(id).ok_or(BankError::NotOwner { id: *id })?;
        if rec.depositor != *sender {
            return Err(BankError::NotOwner { id: *id });
        }
        if rec.loaned_to.is_some() {
            return Err(BankError::OnLoan { id: *id });
        }
    }

    transfer::move_bundle(
        state,
        &LEDGER_ADDRESS,
        sender,
        &AssetBundle::Unique { ids: asset_ids.to_vec() },
    )?;
    for id in asset_ids {
        state.custody.remove(id);
    }
    Ok(())
}
