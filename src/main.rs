//! SWEEPER: Custodial deposit-wallet sweep engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the gateway, storage, and engine components, and runs the
//! periodic collect loop with graceful shutdown.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use sweeper::chain::gateway::WalletGateway;
use sweeper::chain::master::EnvMasterWallet;
use sweeper::chain::{BalanceService, MasterWalletResolver, TransferService};
use sweeper::config::AppConfig;
use sweeper::engine::cycle::Collector;
use sweeper::engine::locks::WalletLockTable;
use sweeper::engine::policy::SweepPolicy;
use sweeper::engine::scheduler::Scheduler;
use sweeper::storage::{AccountStore, JsonAccountStore};

const BANNER: &str = r#"
 ______        _______ _____ ____  _____ ____
/ ___\ \      / / ____| ____|  _ \| ____|  _ \
\___ \\ \ /\ / /|  _| |  _| | |_) |  _| | |_) |
 ___) |\ V  V / | |___| |___|  __/| |___|  _ <
|____/  \_/\_/  |_____|_____|_|   |_____|_| \_\

  Custodial Deposit-Wallet Sweep Engine
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        cycle_interval_secs = cfg.engine.cycle_interval_secs,
        collect_threshold = %cfg.engine.collect_threshold,
        transfer_fee = %cfg.engine.transfer_fee,
        accounts_file = %cfg.storage.accounts_file,
        gateway = %cfg.chain.gateway_url,
        "Sweeper starting up"
    );

    // -- Wire components --------------------------------------------------

    let gateway = Arc::new(WalletGateway::from_config(&cfg.chain)?);
    let transfers: Arc<dyn TransferService> = gateway.clone();
    let balances: Arc<dyn BalanceService> = gateway;
    let store: Arc<dyn AccountStore> = Arc::new(JsonAccountStore::new(&cfg.storage.accounts_file));
    let master: Arc<dyn MasterWalletResolver> = Arc::new(EnvMasterWallet::from_config(&cfg.chain));

    let collector = Arc::new(Collector::new(
        store,
        master,
        transfers,
        balances,
        Arc::new(WalletLockTable::new()),
        SweepPolicy::new(cfg.engine.collect_threshold, cfg.engine.transfer_fee),
    ));

    // -- Run until shutdown -----------------------------------------------

    let scheduler = Scheduler::new(
        collector,
        Duration::from_secs(cfg.engine.cycle_interval_secs),
    );
    scheduler.start();

    info!("Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received.");

    scheduler.stop().await;
    info!("Sweeper shut down cleanly.");

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sweeper=info"));

    let json_logging = std::env::var("SWEEPER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
