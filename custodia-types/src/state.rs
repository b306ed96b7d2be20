use serde::{Serialize, Deserialize};
use std::collections::HashMap;

pub type Address = [u8; 32];
pub type AssetId = u64;

/// Physical custodian address for assets held by the ledger itself.
pub const LEDGER_ADDRESS: Address = [0xC5; 32];

/// Smallest fungible unit scale (1 token = 10^9 units).
pub const UNIT: u64 = 1_000_000_000;

pub const DEFAULT_COLLATERAL_PER_OPERATOR: u64 = 100 * UNIT;
pub const DEFAULT_MAX_BATCH_SIZE: usize = 6;
pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 3 * 24 * 3600;
pub const DEFAULT_FEE_PER_ASSET: u64 = UNIT / 100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BankConfig {
    pub owner: Address,
    pub collateral_per_operator: u64,
    pub max_batch_size: usize,
    pub grace_period_secs: u64,
    pub fee_per_asset: u64,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            owner: [0u8; 32],
            collateral_per_operator: DEFAULT_COLLATERAL_PER_OPERATOR,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
            fee_per_asset: DEFAULT_FEE_PER_ASSET,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AccountState {
    pub nonce: u64,
    /// Settlement-token balance (collateral, fees, compensation).
    pub native_balance: u64,
    /// Revenue-token balance (proportional payouts land here).
    pub reward_balance: u64,
    /// Semi-fungible holdings, amount per series id.
    pub sft_balances: HashMap<AssetId, u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OperatorState {
    pub authorized: bool,
    pub collateral_posted: bool,
}

impl OperatorState {
    pub fn is_bonded(&self) -> bool {
        self.authorized && self.collateral_posted
    }
}

/// One outstanding borrow. At most one per operator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Loan {
    pub holder: Address,
    pub asset_ids: Vec<AssetId>,
    pub borrowed_at: u64,
}

/// Registry entry for an asset in ledger custody.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustodyRecord {
    pub depositor: Address,
    pub loaned_to: Option<Address>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BankState {
    pub config: BankConfig,
    pub accounts: HashMap<Address, AccountState>,
    /// Current physical owner of each unique asset (holder, operator, or
    /// LEDGER_ADDRESS while custodied).
    pub asset_owner: HashMap<AssetId, Address>,
    /// Asset Registry: assets in custody, keyed by id.
    pub custody: HashMap<AssetId, CustodyRecord>,
    pub operators: HashMap<Address, OperatorState>,
    /// Live loans keyed by operator.
    pub loans: HashMap<Address, Loan>,
    pub scores: HashMap<Address, u64>,
    pub total_score: u64,
    /// Pooled operator bond, in native units.
    pub bonded_collateral: u64,
    /// Revenue pool awaiting settlement, in reward units.
    pub revenue_balance: u64,
    pub num_active_operators: u64,
}

impl BankState {
    pub fn account(&self, addr: &Address) -> Option<&AccountState> {
        self.accounts.get(addr)
    }

    pub fn score_of(&self, holder: &Address) -> u64 {
        self.scores.get(holder).copied().unwrap_or(0)
    }

    /// Number of unique assets physically held by `addr`.
    pub fn unique_balance_of(&self, addr: &Address) -> usize {
        self.asset_owner.values().filter(|owner| *owner == addr).count()
    }

    /// Asset Registry lookup: ids custodied on behalf of `holder`, sorted.
    pub fn custodied_assets_of(&self, holder: &Address) -> Vec<AssetId> {
        let mut ids: Vec<AssetId> = self
            .custody
            .iter()
            .filter(|(_, rec)| rec.depositor == *holder)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn loan_of(&self, operator: &Address) -> Option<&Loan> {
        self.loans.get(operator)
    }
}
