mod service;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::{mpsc, RwLock};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "./data")]
    data_dir: String,
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: SocketAddr,
    /// Hex-encoded owner address used when creating a fresh genesis state.
    #[arg(long)]
    owner: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args = Args::parse();
    info!("Starting Custodia node...");

    // 2. Init Storage
    let storage = Arc::new(
        custodia_storage::db::Storage::new(&args.data_dir).context("Failed to initialize storage")?,
    );
    info!("Storage initialized at {}", args.data_dir);

    // 3. Load or Create State
    let state = match storage.load_state().context("Failed to load state")? {
        Some(state) => {
            info!("Loaded existing state ({} accounts)", state.accounts.len());
            state
        }
        None => {
            let owner = match &args.owner {
                Some(hex_addr) => {
                    let mut owner = [0u8; 32];
                    hex::decode_to_slice(hex_addr.trim_start_matches("0x"), &mut owner)
                        .context("Invalid --owner address")?;
                    owner
                }
                None => [0u8; 32],
            };
            info!("No state found, creating genesis for owner {}", hex::encode(owner));
            let genesis = custodia_genesis::create_genesis_state(owner);
            storage.save_state(&genesis).context("Failed to save genesis state")?;
            genesis
        }
    };
    let shared_state = Arc::new(RwLock::new(state));

    // 4. Executor (single writer: serializes every bank operation)
    let (tx_sender, tx_receiver) = mpsc::channel(1000);
    let executor_state = shared_state.clone();
    let executor_storage = storage.clone();
    tokio::spawn(async move {
        let service = service::ExecutorService::new(executor_state, executor_storage, tx_receiver);
        service.run().await;
    });

    // 5. API
    let api_state = shared_state.clone();
    let api_storage = storage.clone();
    let listen = args.listen;
    tokio::spawn(async move {
        if let Err(e) = custodia_api::start_server(listen, api_state, api_storage, tx_sender).await {
            error!("API server exited: {}", e);
        }
    });

    info!("Node running. Press Ctrl+C to stop.");
    signal::ctrl_c().await?;

    // Final snapshot so a restart picks up where we left off.
    let state = shared_state.read().await;
    storage.save_state(&state).context("Failed to save final snapshot")?;
    Ok(())
}
