use serde::{Serialize, Deserialize};
use crate::instruction::BankInstruction;
use crate::state::Address;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transaction {
    pub sender: Address,
    pub nonce: u64,
    pub instruction: BankInstruction,
    pub signature: Vec<u8>,
}

impl Transaction {
    pub fn signing_bytes(&self) -> Vec<u8> {
        #[derive(Serialize)]
        struct SigningTx<'a> {
            sender: &'a Address,
            nonce: u64,
            instruction: &'a BankInstruction,
        }

        let signing = SigningTx {
            sender: &self.sender,
            nonce: self.nonce,
            instruction: &self.instruction,
        };

        bincode::serialize(&signing).expect("tx signing serialization")
    }

    pub fn id(&self) -> [u8; 32] {
        use blake3::Hasher;
        let mut hasher = Hasher::new();
        hasher.update(&self.signing_bytes());
        hasher.update(&self.signature);
        *hasher.finalize().as_bytes()
    }
}
