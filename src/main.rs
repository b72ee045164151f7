//! barcode-ledger - generate, store and decode product barcodes
//!
//! Module structure:
//! - `domain/` - Pattern table, value types, errors
//! - `services/` - Encoder, Decoder, Session
//! - `io/` - Record file, interactive console
//! - `infra/` - Config, Metrics

use anyhow::{bail, Context};
use barcode_ledger::infra::Config;
use barcode_ledger::io::run_menu;
use barcode_ledger::services::Session;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// barcode-ledger - digit barcodes with an append-only record file
#[derive(Parser, Debug)]
#[command(name = "barcode-ledger", version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "CONFIG_FILE", default_value = "config/dev.toml")]
    config: String,

    /// Record file, overriding the configured path
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a code, print it and append it to the store
    Generate { code: String },
    /// Render a code without storing it
    Render { code: String },
    /// List stored records
    List {
        #[arg(long)]
        json: bool,
    },
    /// Decode the stored record at a 1-based index
    Decode {
        index: usize,
        #[arg(long)]
        json: bool,
    },
    /// Decode a barcode given as glyphs
    Scan { visual: String },
    /// Interactive menu (default)
    Menu,
}

fn init_logging(json: bool) {
    // Quiet by default so barcodes on stdout stay readable; RUST_LOG=info for events
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_timer(UtcTime::rfc_3339())
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_timer(UtcTime::rfc_3339())
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    info!(git_hash = env!("GIT_HASH"), "barcode-ledger starting");

    let mut config = Config::load_from_path(&args.config);
    if let Some(store) = args.store {
        config = config.with_store_path(store);
    }

    info!(
        config_file = %config.config_file(),
        store = %config.store_path().display(),
        max_records = config.max_records(),
        max_code_len = config.code_limits().max_code_len,
        allow_empty = config.code_limits().allow_empty,
        "config_loaded"
    );

    let session = Session::from_config(&config);
    let result = run(&session, args.command.unwrap_or(Command::Menu));

    session.metrics().summary().log();
    result
}

fn run(session: &Session, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Generate { code } => {
            let record = session
                .generate(&code)
                .with_context(|| format!("cannot generate barcode for {code:?}"))?;
            println!("{}", record.visual);
        }
        Command::Render { code } => {
            let visual =
                session.render(&code).with_context(|| format!("cannot render {code:?}"))?;
            println!("{visual}");
        }
        Command::List { json } => {
            let records = session.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No records found in {}", session.store().path().display());
            } else {
                for (i, record) in records.iter().enumerate() {
                    println!("{}) Code: {}", i + 1, record.code);
                }
            }
        }
        Command::Decode { index, json } => {
            let decoded = session.decode_selection(index)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&decoded.to_json())?);
            }
            match &decoded.decoded {
                Ok(code) if !json => println!("{code}"),
                Ok(_) => {}
                Err(e) => bail!("record {index} cannot be decoded: {e}"),
            }
        }
        Command::Scan { visual } => {
            let code = session.scan(&visual).context("cannot decode barcode")?;
            println!("{code}");
        }
        Command::Menu => {
            let stdin = io::stdin();
            run_menu(session, &mut stdin.lock(), &mut io::stdout().lock())?;
        }
    }
    Ok(())
}
