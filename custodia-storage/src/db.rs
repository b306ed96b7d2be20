use rocksdb::{DB, Options};
use anyhow::{anyhow, Result};
use custodia_types::state::BankState;
use custodia_types::transaction::Transaction;
use bincode;

pub struct Storage {
    pub db: DB,
}

impl Storage {
    pub fn new(path: &str) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path).map_err(|e| anyhow!("Failed to open DB: {}", e))?;
        Ok(Self { db })
    }

    pub fn save_state(&self, state: &BankState) -> Result<()> {
        let encoded: Vec<u8> = bincode::serialize(state).map_err(|e| anyhow!("Serialization error: {}", e))?;
        self.db.put(b"bank_state", encoded).map_err(|e| anyhow!("DB write error: {}", e))?;
        Ok(())
    }

    pub fn load_state(&self) -> Result<Option<BankState>> {
        match self.db.get(b"bank_state") {
            Ok(Some(value)) => {
                let decoded: BankState = bincode::deserialize(&value).map_err(|e| anyhow!("Deserialization error: {}", e))?;
                Ok(Some(decoded))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(anyhow!("DB read error: {}", e)),
        }
    }

    /// Appends an applied transaction to the journal and returns its index.
    pub fn append_tx(&self, tx: &Transaction) -> Result<u64> {
        let index = self.tx_count()?;
        let key = format!("tx_{:020}", index);
        let hash_key = format!("tx_hash_{}", hex::encode(tx.id()));
        let encoded = bincode::serialize(tx).map_err(|e| anyhow!("Serialization error: {}", e))?;

        self.db.put(key.as_bytes(), &encoded).map_err(|e| anyhow!("DB journal error: {}", e))?;
        self.db.put(hash_key.as_bytes(), &encoded).map_err(|e| anyhow!("DB hash-index error: {}", e))?;
        self.db
            .put(b"tx_count", (index + 1).to_be_bytes())
            .map_err(|e| anyhow!("DB counter error: {}", e))?;
        Ok(index)
    }

    pub fn load_tx(&self, index: u64) -> Result<Option<Transaction>> {
        let key = format!("tx_{:020}", index);
        match self.db.get(key.as_bytes())? {
            Some(v) => Ok(Some(bincode::deserialize(&v)?)),
            None => Ok(None),
        }
    }

    pub fn load_tx_by_hash(&self, hash_hex: &str) -> Result<Option<Transaction>> {
        let key = format!("tx_hash_{}", hash_hex);
        match self.db.get(key.as_bytes())? {
            Some(v) => Ok(Some(bincode::deserialize(&v)?)),
            None => Ok(None),
        }
    }

    pub fn tx_count(&self) -> Result<u64> {
        match self.db.get(b"tx_count")? {
            Some(v) => {
                let bytes: [u8; 8] = v
                    .as_slice()
                    .try_into()
                    .map_err(|_| anyhow!("Corrupt tx counter"))?;
                Ok(u64::from_be_bytes(bytes))
            }
            None => Ok(0),
        }
    }
}
