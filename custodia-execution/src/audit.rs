//! Cross-table invariant checks, used by tests and fuzz targets after every
//! mutation batch.

use anyhow::{bail, Result};
use custodia_types::state::BankState;

pub fn check_invariants(state: &BankState) -> Result<()> {
    let score_sum: u64 = state.scores.values().sum();
    if score_sum != state.total_score {
        bail!("total_score {} != sum of holder scores {}", state.total_score, score_sum);
    }

    if state.num_active_operators != state.loans.len() as u64 {
        bail!(
            "num_active_operators {} != live loans {}",
            state.num_active_operators,
            state.loans.len()
        );
    }

    let required = state
        .num_active_operators
        .saturating_mul(state.config.collateral_per_operator);
    if state.bonded_collateral < required {
        bail!(
            "bonded collateral {} below active requirement {}",
            state.bonded_collateral,
            required
        );
    }

    let mut loaned = std::collections::HashSet::new();
    for (operator, loan) in &state.loans {
        for id in &loan.asset_ids {
            if !loaned.insert(*id) {
                bail!("asset {} referenced by two live loans", id);
            }
            match state.custody.get(id) {
                Some(rec) if rec.loaned_to == Some(*operator) => {}
                _ => bail!("loaned asset {} missing consistent custody record", id),
            }
            if state.asset_owner.get(id) != Some(operator) {
                bail!("loaned asset {} not physically held by its operator", id);
            }
        }
    }

    for (id, rec) in &state.custody {
        if rec.loaned_to.is_none()
            && state.asset_owner.get(id) != Some(&custodia_types::state::LEDGER_ADDRESS)
        {
            bail!("custodied asset {} not physically held by the ledger", id);
        }
    }

    Ok(())
}
