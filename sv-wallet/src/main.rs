mod commands;
mod secmem;
mod storage;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sv_rpc::{RpcConfig, DEFAULT_TIMEOUT, ENV_NODE_PASSWORD, ENV_NODE_URL, ENV_NODE_USER};

/// RingCT/CT confidential-transaction wallet CLI (§6, §7).
#[derive(Parser)]
#[command(name = "sv-wallet", version, about = "RingCT/CT confidential transaction wallet")]
struct Cli {
    /// Path to the encrypted wallet file.
    #[arg(long, global = true, default_value = "wallet.dat")]
    wallet: PathBuf,

    #[arg(long, env = ENV_NODE_URL, global = true, default_value = "http://127.0.0.1:8332")]
    node_url: String,

    #[arg(long, env = ENV_NODE_USER, global = true)]
    node_user: Option<String>,

    #[arg(long, env = ENV_NODE_PASSWORD, global = true)]
    node_password: Option<String>,

    /// Fee rate in fractional units per kilobyte, used by `send`/`sync` consolidation planning.
    #[arg(long, global = true, default_value_t = 1000)]
    fee_per_kb: u64,

    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new wallet, or restore one from its two raw account secrets.
    Init {
        #[arg(long)]
        recover: bool,
    },
    /// Print the wallet's receiving (stealth) address.
    Address,
    /// Scan the watch-only streams and print the current balance.
    Balance,
    /// Build, sign and broadcast a RingCT send.
    Send {
        recipient: String,
        amount: u64,
        #[arg(long, default_value_t = sv_transaction_builder::DEFAULT_RING_SIZE)]
        ring_size: usize,
    },
    /// Advance the wallet's scan position against the node's watch-only streams.
    Sync {
        #[arg(long)]
        full: bool,
    },
    /// Dump the wallet's account secrets, for backup.
    Export {
        #[arg(long)]
        output: Option<String>,
    },
    /// Show known UTXOs and wallet-health grading.
    History,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "sv_wallet={level},sv_ledger_sync={level},sv_rpc={level},sv_transaction_builder={level}"
        )))
        .init();

    let mut rpc_config = RpcConfig::new(cli.node_url.clone()).with_timeout(DEFAULT_TIMEOUT);
    if let (Some(user), Some(password)) = (&cli.node_user, &cli.node_password) {
        rpc_config = rpc_config.with_auth(user.clone(), password.clone());
    }

    match cli.command {
        Commands::Init { recover } => commands::init::run(&cli.wallet, recover),
        Commands::Address => commands::address::run(&cli.wallet),
        Commands::Balance => commands::balance::run(&cli.wallet, &rpc_config).await,
        Commands::Send { recipient, amount, ring_size } => {
            commands::send::run(&cli.wallet, &rpc_config, &recipient, amount, cli.fee_per_kb, ring_size).await
        }
        Commands::Sync { full } => commands::sync::run(&cli.wallet, &rpc_config, full).await,
        Commands::Export { output } => commands::export::run(&cli.wallet, output),
        Commands::History => commands::history::run(&cli.wallet, &rpc_config).await,
    }
}
