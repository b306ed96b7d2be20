use serde::{Serialize, Deserialize};
use crate::instruction::ValueKind;
use crate::state::AssetId;

/// A batch of value in any of the three asset kinds the ledger can move.
/// Transfer code matches on the variant once, instead of branching on an
/// integer item-type code at every call site.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum AssetBundle {
    Fungible { kind: ValueKind, amount: u64 },
    Unique { ids: Vec<AssetId> },
    /// (series id, amount) pairs.
    SemiFungible { parts: Vec<(AssetId, u64)> },
}

impl AssetBundle {
    /// Unit count of the bundle: token amount for fungibles, item count for
    /// uniques, summed amounts for semi-fungibles.
    pub fn value_of(&self) -> u64 {
        match self {
            AssetBundle::Fungible { amount, .. } => *amount,
            AssetBundle::Unique { ids } => ids.len() as u64,
            AssetBundle::SemiFungible { parts } => {
                parts.iter().map(|(_, amount)| amount).sum()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value_of() == 0
    }
}
