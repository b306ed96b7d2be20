#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use custodia_execution::{audit, execute_instruction, ExecutionContext};
use custodia_types::instruction::{BankInstruction, ValueKind};
use custodia_types::state::{BankConfig, BankState};

#[derive(Arbitrary, Debug)]
struct BorrowInput {
    ids: Vec<u64>,
    operator_choice: bool,
    repay_after: bool,
    timestamp: u32,
}

const OWNER: [u8; 32] = [0xAA; 32];
const OPS: [[u8; 32]; 2] = [[0x01; 32], [0x02; 32]];
const HOLDERS: [[u8; 32]; 2] = [[0x11; 32], [0x12; 32]];

fn seeded_state() -> BankState {
    let mut state = BankState {
        config: BankConfig {
            owner: OWNER,
            collateral_per_operator: 1_000,
            fee_per_asset: 0,
            ..Default::default()
        },
        ..Default::default()
    };

    let seed = [
        BankInstruction::MintValue { to: OWNER, amount: 10_000, kind: ValueKind::Native },
        BankInstruction::PostCollateral { amount: 2_000 },
        BankInstruction::UpdateOperator { operator: OPS[0], active: true },
        BankInstruction::UpdateOperator { operator: OPS[1], active: true },
        BankInstruction::MintAssets { to: HOLDERS[0], ids: (1..=10).collect() },
        BankInstruction::MintAssets { to: HOLDERS[1], ids: (11..=20).collect() },
        BankInstruction::Deposit { asset_ids: (1..=10).collect() },
        BankInstruction::Deposit { asset_ids: (11..=20).collect() },
    ];
    for (i, ix) in seed.iter().enumerate() {
        let sender = match ix {
            BankInstruction::Deposit { asset_ids } if asset_ids[0] <= 10 => HOLDERS[0],
            BankInstruction::Deposit { .. } => HOLDERS[1],
            _ => OWNER,
        };
        let mut ctx = ExecutionContext { state: &mut state, timestamp: i as u64 };
        execute_instruction(ix, &sender, &mut ctx).expect("seed instruction");
    }
    state
}

fuzz_target!(|data: BorrowInput| {
    let mut state = seeded_state();
    let operator = OPS[data.operator_choice as usize];
    let ids: Vec<u64> = data.ids.iter().take(32).map(|id| id % 25).collect();

    {
        let mut ctx = ExecutionContext { state: &mut state, timestamp: data.timestamp as u64 };
        let _ = execute_instruction(&BankInstruction::Borrow { asset_ids: ids }, &operator, &mut ctx);
    }
    if data.repay_after {
        let mut ctx = ExecutionContext { state: &mut state, timestamp: data.timestamp as u64 + 1 };
        let _ = execute_instruction(&BankInstruction::Repay, &operator, &mut ctx);
    }

    audit::check_invariants(&state).expect("invariants");
});
