pub mod assets;
pub mod audit;
pub mod loans;
pub mod operators;
pub mod rewards;
pub mod transfer;

#[cfg(test)]
mod tests;

use custodia_types::error::BankError;
use custodia_types::instruction::BankInstruction;
use custodia_types::state::{Address, BankState};
use custodia_types::transaction::Transaction;

pub struct ExecutionContext<'a> {
    pub state: &'a mut BankState,
    pub timestamp: u64,
}

/// Verifies the envelope (signature, strict nonce) and applies the
/// instruction. A consumed nonce is the only effect of a failing
/// instruction; the bank state itself is untouched on error.
pub fn execute_transaction(tx: &Transaction, ctx: &mut ExecutionContext) -> Result<(), BankError> {
    custodia_crypto::signatures::verify_signature(&tx.sender, &tx.signing_bytes(), &tx.signature)
        .map_err(|_| BankError::InvalidSignature)?;

    let account = ctx.state.accounts.entry(tx.sender).or_default();
    if tx.nonce != account.nonce {
        return Err(BankError::InvalidNonce { expected: account.nonce, got: tx.nonce });
    }
    account.nonce += 1;

    execute_instruction(&tx.instruction, &tx.sender, ctx)
}

pub fn execute_instruction(
    ix: &BankInstruction,
    sender: &Address,
    ctx: &mut ExecutionContext,
) -> Result<(), BankError> {
    let state = &mut *ctx.state;
    match ix {
        BankInstruction::MintValue { to, amount, kind } => {
            transfer::mint_value(state, sender, to, *amount, *kind)
        }
        BankInstruction::MintAssets { to, ids } => {
            transfer::mint_assets(state, sender, to, ids)
        }
        BankInstruction::TransferValue { to, amount, kind } => {
            transfer::transfer_value(state, sender, to, *amount, *kind)
        }
        BankInstruction::Deposit { asset_ids } => {
            assets::deposit(state, sender, asset_ids)
        }
        BankInstruction::Withdraw { asset_ids } => {
            assets::withdraw(state, sender, asset_ids)
        }
        BankInstruction::UpdateOperator { operator, active } => {
            operators::update_operator(state, sender, operator, *active)
        }
        BankInstruction::PostCollateral { amount } => {
            operators::post_collateral(state, sender, *amount)
        }
        BankInstruction::WithdrawCollateral => {
            operators::withdraw_collateral(state, sender)
        }
        BankInstruction::ClaimCompensation => {
            operators::claim_compensation(state, sender, ctx.timestamp)
        }
        BankInstruction::Borrow { asset_ids } => {
            loans::borrow(state, sender, asset_ids, ctx.timestamp)
        }
        BankInstruction::Repay => loans::repay(state, sender),
        BankInstruction::DepositRevenue { amount } => {
            rewards::deposit_revenue(state, sender, *amount)
        }
        BankInstruction::ClaimRevenue => rewards::claim_revenue(state, sender),
        BankInstruction::ClaimRevenueExact { amount } => {
            rewards::claim_revenue_exact(state, sender, *amount)
        }
    }
}
