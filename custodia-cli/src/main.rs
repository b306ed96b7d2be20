use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use custodia_crypto::signatures::{address_of, generate_keypair, sign, SigningKey};
use custodia_types::instruction::{BankInstruction, ValueKind};
use custodia_types::state::Address;
use custodia_types::transaction::Transaction;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Custodia CLI — interact with a Custodia bank node"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, default_value = "http://localhost:3000")]
    node_url: String,
    #[arg(short, long, default_value = "wallet.json")]
    wallet_path: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new wallet
    Init,
    /// Show current wallet info
    Show,
    /// Get account info (defaults to the wallet address)
    Account {
        #[arg(long)]
        address: Option<String>,
    },
    /// Get bank-wide state summary
    State,
    /// List operators
    Operators,
    /// List live loans
    Loans,
    /// Deposit assets into custody
    Deposit {
        #[arg(long, value_delimiter = ',')]
        ids: Vec<u64>,
    },
    /// Withdraw custodied assets
    Withdraw {
        #[arg(long, value_delimiter = ',')]
        ids: Vec<u64>,
    },
    /// Borrow a batch of custodied assets (operator)
    Borrow {
        #[arg(long, value_delimiter = ',')]
        ids: Vec<u64>,
    },
    /// Repay the outstanding loan (operator)
    Repay,
    /// Authorize or revoke an operator (owner)
    Operator {
        #[arg(long)]
        address: String,
        #[arg(long)]
        active: bool,
    },
    /// Bond collateral into the pool
    PostCollateral {
        #[arg(long)]
        amount: u64,
    },
    /// Reclaim idle collateral (owner)
    WithdrawCollateral,
    /// Seize bonds of defaulted operators (holder)
    ClaimCompensation,
    /// Move reward tokens into the revenue pool
    DepositRevenue {
        #[arg(long)]
        amount: u64,
    },
    /// Redeem the full proportional revenue share
    ClaimRevenue,
    /// Redeem an exact payout amount
    ClaimExact {
        #[arg(long)]
        amount: u64,
    },
    /// Mint fungible value (owner)
    MintValue {
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: u64,
        #[arg(long, default_value = "native")]
        kind: String,
    },
    /// Mint unique assets (owner)
    MintAssets {
        #[arg(long)]
        to: String,
        #[arg(long, value_delimiter = ',')]
        ids: Vec<u64>,
    },
}

#[derive(Serialize, Deserialize)]
struct Wallet {
    secret_key: String,
    public_key: String,
}

impl Wallet {
    fn load(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn to_keypair(&self) -> Result<SigningKey> {
        let secret = hex::decode(&self.secret_key)?;
        Ok(SigningKey::from_bytes(secret.as_slice().try_into()?))
    }
}

fn parse_address(hex_addr: &str) -> Result<Address> {
    let mut addr = [0u8; 32];
    hex::decode_to_slice(hex_addr.trim_start_matches("0x"), &mut addr)
        .map_err(|_| anyhow!("Invalid address: {}", hex_addr))?;
    Ok(addr)
}

fn parse_kind(kind: &str) -> Result<ValueKind> {
    match kind.to_lowercase().as_str() {
        "native" => Ok(ValueKind::Native),
        "reward" => Ok(ValueKind::Reward),
        _ => Err(anyhow!("Invalid value kind. Use: native or reward")),
    }
}

async fn fetch_nonce(client: &Client, node_url: &str, address: &Address) -> Result<u64> {
    let res = client
        .get(format!("{}/account/{}", node_url, hex::encode(address)))
        .send()
        .await?;
    if !res.status().is_success() {
        return Ok(0);
    }
    let body: serde_json::Value = res.json().await?;
    Ok(body["nonce"].as_u64().unwrap_or(0))
}

async fn submit(cli: &Cli, client: &Client, instruction: BankInstruction) -> Result<()> {
    let wallet = Wallet::load(&cli.wallet_path)?;
    let kp = wallet.to_keypair()?;
    let sender = address_of(&kp);

    let nonce = fetch_nonce(client, &cli.node_url, &sender).await?;
    let mut tx = Transaction { sender, nonce, instruction, signature: vec![] };
    tx.signature = sign(&kp, &tx.signing_bytes());

    let res = client
        .post(format!("{}/tx", cli.node_url))
        .json(&tx)
        .send()
        .await?;

    println!("Response: {}", res.text().await?);
    Ok(())
}

async fn query(cli: &Cli, client: &Client, path: &str) -> Result<()> {
    let res = client
        .get(format!("{}{}", cli.node_url, path))
        .send()
        .await?
        .text()
        .await?;
    println!("{}", res);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = Client::new();

    match &cli.command {
        Commands::Init => {
            let kp = generate_keypair();
            let wallet = Wallet {
                secret_key: hex::encode(kp.to_bytes()),
                public_key: hex::encode(address_of(&kp)),
            };
            wallet.save(&cli.wallet_path)?;
            println!("Wallet initialized at {:?}", cli.wallet_path);
            println!("Public Key: {}", wallet.public_key);
        }
        Commands::Show => {
            let wallet = Wallet::load(&cli.wallet_path)?;
            println!("Wallet: {:?}", cli.wallet_path);
            println!("Public Key: {}", wallet.public_key);
        }
        Commands::Account { address } => {
            let address = match address {
                Some(addr) => addr.clone(),
                None => Wallet::load(&cli.wallet_path)?.public_key,
            };
            query(&cli, &client, &format!("/account/{}", address)).await?;
        }
        Commands::State => query(&cli, &client, "/state").await?,
        Commands::Operators => query(&cli, &client, "/operators").await?,
        Commands::Loans => query(&cli, &client, "/loans").await?,
        Commands::Deposit { ids } => {
            submit(&cli, &client, BankInstruction::Deposit { asset_ids: ids.clone() }).await?;
        }
        Commands::Withdraw { ids } => {
            submit(&cli, &client, BankInstruction::Withdraw { asset_ids: ids.clone() }).await?;
        }
        Commands::Borrow { ids } => {
            submit(&cli, &client, BankInstruction::Borrow { asset_ids: ids.clone() }).await?;
        }
        Commands::Repay => submit(&cli, &client, BankInstruction::Repay).await?,
        Commands::Operator { address, active } => {
            let operator = parse_address(address)?;
            submit(&cli, &client, BankInstruction::UpdateOperator { operator, active: *active })
                .await?;
        }
        Commands::PostCollateral { amount } => {
            submit(&cli, &client, BankInstruction::PostCollateral { amount: *amount }).await?;
        }
        Commands::WithdrawCollateral => {
            submit(&cli, &client, BankInstruction::WithdrawCollateral).await?;
        }
        Commands::ClaimCompensation => {
            submit(&cli, &client, BankInstruction::ClaimCompensation).await?;
        }
        Commands::DepositRevenue { amount } => {
            submit(&cli, &client, BankInstruction::DepositRevenue { amount: *amount }).await?;
        }
        Commands::ClaimRevenue => submit(&cli, &client, BankInstruction::ClaimRevenue).await?,
        Commands::ClaimExact { amount } => {
            submit(&cli, &client, BankInstruction::ClaimRevenueExact { amount: *amount }).await?;
        }
        Commands::MintValue { to, amount, kind } => {
            let to = parse_address(to)?;
            let kind = parse_kind(kind)?;
            submit(&cli, &client, BankInstruction::MintValue { to, amount: *amount, kind }).await?;
        }
        Commands::MintAssets { to, ids } => {
            let to = parse_address(to)?;
            submit(&cli, &client, BankInstruction::MintAssets { to, ids: ids.clone() }).await?;
        }
    }

    Ok(())
}
