#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use custodia_execution::{audit, execute_instruction, ExecutionContext};
use custodia_types::instruction::{BankInstruction, ValueKind};
use custodia_types::state::{BankConfig, BankState};

#[derive(Arbitrary, Debug)]
struct Step {
    sender_tag: u8,
    op_tag: u8,
    amount: u32,
    ids: Vec<u8>,
    timestamp: u32,
}

const ACTORS: [[u8; 32]; 5] = [[0xAA; 32], [0x01; 32], [0x02; 32], [0x11; 32], [0x12; 32]];

fn instruction_from(step: &Step) -> BankInstruction {
    let ids: Vec<u64> = step.ids.iter().take(8).map(|id| (*id % 30) as u64).collect();
    let to = ACTORS[(step.sender_tag as usize + 1) % ACTORS.len()];
    match step.op_tag % 12 {
        0 => BankInstruction::MintValue { to, amount: step.amount as u64, kind: ValueKind::Native },
        1 => BankInstruction::MintAssets { to, ids },
        2 => BankInstruction::TransferValue { to, amount: step.amount as u64, kind: ValueKind::Reward },
        3 => BankInstruction::Deposit { asset_ids: ids },
        4 => BankInstruction::Withdraw { asset_ids: ids },
        5 => BankInstruction::UpdateOperator { operator: to, active: step.amount % 2 == 0 },
        6 => BankInstruction::PostCollateral { amount: step.amount as u64 },
        7 => BankInstruction::WithdrawCollateral,
        8 => BankInstruction::Borrow { asset_ids: ids },
        9 => BankInstruction::Repay,
        10 => BankInstruction::ClaimCompensation,
        _ => BankInstruction::ClaimRevenueExact { amount: step.amount as u64 },
    }
}

fuzz_target!(|steps: Vec<Step>| {
    let mut state = BankState {
        config: BankConfig {
            owner: ACTORS[0],
            collateral_per_operator: 1_000,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut clock: u64 = 0;
    for step in steps.iter().take(64) {
        clock += step.timestamp as u64;
        let sender = ACTORS[(step.sender_tag as usize) % ACTORS.len()];
        let ix = instruction_from(step);
        let mut ctx = ExecutionContext { state: &mut state, timestamp: clock };
        let _ = execute_instruction(&ix, &sender, &mut ctx);
    }

    audit::check_invariants(&state).expect("invariants");
});
