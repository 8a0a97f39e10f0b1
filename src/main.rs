//! Wallet Station command line.
//!
//! ```text
//!   convert    ──▶ RestTransport (bank metadata) ──▶ TokenUnitConverter
//!   chain-info ──▶ key type / numeric chain suffix
//!   propose    ──▶ ProposalEncoder ──▶ print envelope
//!                                  └─▶ --broadcast: EvmWallet ──▶ WalletStation ──▶ REST node
//!   wallet     ──▶ FileStore (last connected wallet per HD path)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine;
use clap::{Args, Parser, Subcommand};

use wallet_station::config::{load_or_default, StationConfig};
use wallet_station::observability::logging;
use wallet_station::proposal::{
    CommunityPoolSpendChange, ParameterChange, ProposalContent, ProposalRequest, TextChange,
    UpdateAdminChange,
};
use wallet_station::proto::coin;
use wallet_station::signing::{ChainDescriptor, FixedSignerProvider, WalletStation};
use wallet_station::transport::{RestTransport, TransportError};
use wallet_station::units::{TokenUnitConverter, DEFAULT_PRECISION};
use wallet_station::wallet::{
    extract_numeric_chain_suffix, key_type_for_chain, read_wallet, remove_wallet, write_wallet,
    ConnectedWallet, EvmWallet, FileStore, HdPath, WalletName,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const EVM_HD_PATH: &str = "m/44'/60'/0'/0/0";

#[derive(Parser)]
#[command(name = "wallet-station")]
#[command(about = "Sign, broadcast and inspect Cosmos SDK transactions", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert amounts between units using on-chain denomination metadata
    #[command(subcommand)]
    Convert(ConvertCommand),
    /// Show the public key type and numeric suffix of a chain id
    ChainInfo { chain_id: String },
    /// Build (and optionally broadcast) a governance proposal
    Propose(ProposeArgs),
    /// Inspect the persisted connected wallet
    #[command(subcommand)]
    Wallet(WalletCommand),
}

#[derive(Subcommand)]
enum ConvertCommand {
    /// Base units to the display unit
    Display {
        amount: String,
        denom: String,
        #[arg(long, default_value_t = DEFAULT_PRECISION)]
        precision: u32,
    },
    /// Base units to a named unit
    Unit {
        amount: String,
        denom: String,
        unit: String,
        #[arg(long, default_value_t = DEFAULT_PRECISION)]
        precision: u32,
    },
    /// Any unit back to base units of `base_denom`
    Base {
        amount: String,
        unit: String,
        base_denom: String,
    },
}

#[derive(Args)]
struct ProposeArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    /// Deposit in base units of the fee denomination.
    #[arg(long)]
    deposit: String,
    /// Deposit denomination; defaults to `chain.fee_denom`.
    #[arg(long)]
    denom: Option<String>,
    /// Proposer address; defaults to the broadcasting wallet.
    #[arg(long)]
    proposer: Option<String>,
    /// Governance module account; defaults to `proposals.authority`.
    #[arg(long)]
    authority: Option<String>,
    /// Sign with the key in STATION_PRIVATE_KEY and submit to `chain.rest_endpoint`.
    #[arg(long)]
    broadcast: bool,

    #[command(subcommand)]
    kind: ProposalCommand,
}

#[derive(Subcommand)]
enum ProposalCommand {
    Text,
    UpdateAdmin {
        #[arg(long)]
        contract: String,
        #[arg(long)]
        new_admin: String,
    },
    CommunityPoolSpend {
        #[arg(long)]
        recipient: String,
        /// Amount paid from the pool, in base units.
        #[arg(long)]
        amount: String,
    },
    ParamChange {
        #[arg(long)]
        subspace: String,
        #[arg(long)]
        key: String,
        /// JSON-encoded value.
        #[arg(long)]
        value: String,
    },
}

#[derive(Subcommand)]
enum WalletCommand {
    /// Print the wallet stored under an HD path
    Show {
        #[arg(long)]
        hd_path: Option<String>,
    },
    /// Record a connected wallet
    Remember {
        wallet: WalletName,
        address: String,
        #[arg(long)]
        hd_path: Option<String>,
    },
    /// Delete the wallet stored under an HD path
    Forget {
        #[arg(long)]
        hd_path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    logging::init(&config.observability.log_level);

    tracing::debug!(chain_id = %config.chain.chain_id, endpoint = %config.chain.rest_endpoint, "configuration loaded");

    match cli.command {
        Commands::Convert(command) => convert(&config, command).await?,
        Commands::ChainInfo { chain_id } => {
            println!("key type: {}", key_type_for_chain(&chain_id));
            println!("numeric suffix: {}", extract_numeric_chain_suffix(&chain_id));
        }
        Commands::Propose(args) => propose(&config, args).await?,
        Commands::Wallet(command) => wallet(&config, command)?,
    }

    Ok(())
}

async fn convert(config: &StationConfig, command: ConvertCommand) -> CliResult<()> {
    let transport = RestTransport::new(&config.chain.rest_endpoint, config.transport.timeout_secs)?;
    let converter = TokenUnitConverter::new();

    let converted = match command {
        ConvertCommand::Display {
            amount,
            denom,
            precision,
        } => {
            fetch_metadata(&converter, &transport, &denom).await?;
            converter.to_display(&coin(amount, denom), precision)
        }
        ConvertCommand::Unit {
            amount,
            denom,
            unit,
            precision,
        } => {
            fetch_metadata(&converter, &transport, &denom).await?;
            converter.to_unit(&coin(amount, denom), &unit, precision)
        }
        ConvertCommand::Base {
            amount,
            unit,
            base_denom,
        } => {
            fetch_metadata(&converter, &transport, &base_denom).await?;
            converter.to_base(&base_denom, &coin(amount, unit))
        }
    };

    println!("{} {}", converted.amount, converted.denom);
    Ok(())
}

async fn fetch_metadata(
    converter: &TokenUnitConverter,
    transport: &RestTransport,
    denom: &str,
) -> Result<(), TransportError> {
    if !converter.ensure_metadata(transport, denom).await? {
        eprintln!("warning: no usable metadata for {denom}; amount left unchanged");
    }
    Ok(())
}

async fn propose(config: &StationConfig, args: ProposeArgs) -> CliResult<()> {
    let denom = args
        .denom
        .clone()
        .unwrap_or_else(|| config.chain.fee_denom.clone());
    let authority = args
        .authority
        .clone()
        .or_else(|| config.proposals.authority.clone())
        .ok_or("no authority given (use --authority or proposals.authority)")?;

    let content: ProposalContent = match args.kind {
        ProposalCommand::Text => TextChange {
            title: args.title,
            description: args.description,
            denom,
            amount: args.deposit,
        }
        .into(),
        ProposalCommand::UpdateAdmin {
            contract,
            new_admin,
        } => UpdateAdminChange {
            title: args.title,
            description: args.description,
            contract,
            new_admin,
            denom,
            amount: args.deposit,
        }
        .into(),
        ProposalCommand::CommunityPoolSpend { recipient, amount } => CommunityPoolSpendChange {
            title: args.title,
            description: args.description,
            recipient,
            denom,
            amount,
            deposit: args.deposit,
        }
        .into(),
        ProposalCommand::ParamChange {
            subspace,
            key,
            value,
        } => ParameterChange {
            title: args.title,
            description: args.description,
            subspace,
            key,
            value,
            denom,
            amount: args.deposit,
        }
        .into(),
    };

    if !args.broadcast {
        let proposer = args
            .proposer
            .ok_or("no proposer given (use --proposer, or --broadcast to sign)")?;
        let request = ProposalRequest::new(proposer, authority, content);
        let settings = config.station_settings();
        let envelope = wallet_station::proposal::ProposalEncoder::new(settings.encoder)
            .encode(&request)?;
        let bytes = envelope.encode();
        println!("kind: {}", envelope.kind.as_str());
        println!("hex: {}", hex::encode(&bytes));
        println!(
            "base64: {}",
            base64::engine::general_purpose::STANDARD.encode(&bytes)
        );
        return Ok(());
    }

    let registry = config.station_settings().registry;
    let hd_path: HdPath = EVM_HD_PATH.parse()?;
    let wallet = EvmWallet::from_env(hd_path, config.chain.address_prefix.clone(), registry)?;
    let sender = wallet.address()?;
    if let Some(proposer) = &args.proposer {
        if *proposer != sender {
            return Err(format!("proposer {proposer} does not match signing key {sender}").into());
        }
    }

    let station = WalletStation::new(
        Arc::new(FixedSignerProvider::new(Arc::new(wallet))),
        Arc::new(wallet_station::transport::RestConnector::new(
            config.transport.timeout_secs,
        )),
        config.station_settings(),
    );
    let chain = ChainDescriptor::new(
        config.chain.rest_endpoint.clone(),
        config.chain.chain_id.clone(),
    );
    let request = ProposalRequest::new(sender, authority, content);
    let result = station.submit_proposal(&request, &chain).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.is_success() {
        eprintln!(
            "transaction rejected (code {}): {}",
            result.code, result.raw_log
        );
    }
    Ok(())
}

fn wallet(config: &StationConfig, command: WalletCommand) -> CliResult<()> {
    let store = FileStore::open(&config.wallet.store_path)?;
    match command {
        WalletCommand::Show { hd_path } => {
            let key = hd_path.as_deref().unwrap_or(&config.wallet.default_hd_path);
            let connected = read_wallet(&store, Some(key));
            if connected.is_empty() {
                println!("no wallet connected under {key}");
            } else {
                println!("{}", serde_json::to_string_pretty(&connected)?);
            }
        }
        WalletCommand::Remember {
            wallet,
            address,
            hd_path,
        } => {
            let key = hd_path.unwrap_or_else(|| config.wallet.default_hd_path.clone());
            let connected = ConnectedWallet {
                wallet: Some(wallet),
                cosmos_address: address,
                hd_path: Some(key.clone()),
            };
            write_wallet(&store, &connected, Some(&key))?;
            tracing::info!(wallet = %wallet, hd_path = %key, "wallet remembered");
        }
        WalletCommand::Forget { hd_path } => {
            let key = hd_path.as_deref().unwrap_or(&config.wallet.default_hd_path);
            remove_wallet(&store, Some(key))?;
            tracing::info!(hd_path = %key, "wallet forgotten");
        }
    }
    Ok(())
}
