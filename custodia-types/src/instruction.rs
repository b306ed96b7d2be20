use serde::{Serialize, Deserialize};
use crate::state::{Address, AssetId};

/// The two fungible tokens the ledger moves: the native settlement token
/// (collateral, fees, compensation) and the reward token (revenue sharing).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Native,
    Reward,
}

/// All bank operations, each a first-class serialized instruction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BankInstruction {
    // Token scaffolding (owner-gated mints, peer transfers)
    MintValue { to: Address, amount: u64, kind: ValueKind },
    MintAssets { to: Address, ids: Vec<AssetId> },
    TransferValue { to: Address, amount: u64, kind: ValueKind },

    // Asset Registry
    Deposit { asset_ids: Vec<AssetId> },
    Withdraw { asset_ids: Vec<AssetId> },

    // Operator Registry / Collateral Controller
    UpdateOperator { operator: Address, active: bool },
    PostCollateral { amount: u64 },
    WithdrawCollateral,
    ClaimCompensation,

    // Loan State Machine
    Borrow { asset_ids: Vec<AssetId> },
    Repay,

    // Reward Settlement
    DepositRevenue { amount: u64 },
    ClaimRevenue,
    ClaimRevenueExact { amount: u64 },
}
