//! pulse CLI - Command line interface for pulse_registry
//!
//! Maintains a pincode → merchant registry snapshot and answers
//! serviceability queries against it. Output is JSON so the CLI can be
//! driven by other programs.

use clap::{Parser, Subcommand};
use pulse_registry::{build, ops, store, Config, MerchantId, Pincode, Removal, Session};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a tracing filter for the CLI
const LOG_ENV: &str = "PULSE_LOG";

#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "A prefix-tree registry of merchants by pincode")]
#[command(version)]
struct Cli {
    /// Path to the registry snapshot (overrides the config file)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Do not write the snapshot back after mutating commands
    #[arg(long)]
    no_auto_save: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty registry snapshot
    Init,

    // === Bulk Commands ===
    /// Replace the registry with one built from a CSV table
    /// (column headers are merchant IDs, cells are pincodes)
    Build {
        /// The CSV file
        csv: PathBuf,
    },

    /// Replace the registry with an existing snapshot file
    Import {
        /// The snapshot file to load
        file: PathBuf,
    },

    /// Write the registry to another snapshot file
    Export {
        /// Destination file
        file: PathBuf,
    },

    // === Merchant Commands ===
    /// Register a merchant for every pincode listed in a file
    AddMerchant {
        /// The merchant ID
        id: String,
        /// File of pincodes separated by newlines, commas or spaces
        file: PathBuf,
    },

    /// Replace a merchant's pincodes with those listed in a file
    UpdateMerchant {
        /// The merchant ID
        id: String,
        /// File of pincodes separated by newlines, commas or spaces
        file: PathBuf,
    },

    /// Remove a merchant from every pincode it serves
    RemoveMerchant {
        /// The merchant ID
        id: String,
        /// Check every pincode in a universe file instead of using the
        /// merchant index (defaults to the configured universe)
        #[arg(short, long, num_args = 0..=1)]
        universe: Option<Option<PathBuf>>,
    },

    /// Show the pincodes a merchant serves
    Merchant {
        /// The merchant ID
        id: String,
    },

    // === Pincode Commands ===
    /// Register a merchant for a pincode
    AddPincode {
        /// The merchant ID
        id: String,
        /// The pincode
        pincode: Pincode,
    },

    /// Unregister a merchant from a pincode
    RemovePincode {
        /// The merchant ID
        id: String,
        /// The pincode
        pincode: Pincode,
    },

    /// Move a merchant from one pincode to another
    UpdatePincode {
        /// The merchant ID
        id: String,
        /// Pincode to move from
        old: Pincode,
        /// Pincode to move to
        new: Pincode,
    },

    // === Query Commands ===
    /// Check whether a pincode is serviceable
    Check {
        /// The pincode
        pincode: Pincode,
    },

    /// List the merchants serving a pincode
    Search {
        /// The pincode
        pincode: Pincode,
    },

    /// List every serviceable pincode with its merchants
    Dump {
        /// Maximum number of pincodes to return
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show registry statistics
    Stats,

    /// Show the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config.log_filter);

    let snapshot = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| config.snapshot.clone());

    match cli.command {
        Commands::Init => {
            let mut session = Session::create(&snapshot);
            session.persist()?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "message": format!("Created registry at {}", snapshot.display())
                }),
            )?;
        }

        Commands::Build { csv } => {
            // The existing snapshot is replaced without being read
            let started = Instant::now();
            let registry = build::from_csv_path(&csv)?;
            let elapsed = started.elapsed();
            let stats = registry.stats();
            let mut session = Session::create(&snapshot);
            session.replace(registry);
            save(&mut session, cli.no_auto_save)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "source": csv.display().to_string(),
                    "stats": stats,
                    "elapsed_us": elapsed.as_micros() as u64
                }),
            )?;
        }

        Commands::Import { file } => {
            // The existing snapshot is replaced without being read
            let started = Instant::now();
            let registry = store::load_from_path(&file)?;
            let elapsed = started.elapsed();
            let stats = registry.stats();
            let mut session = Session::create(&snapshot);
            session.replace(registry);
            save(&mut session, cli.no_auto_save)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "source": file.display().to_string(),
                    "stats": stats,
                    "elapsed_us": elapsed.as_micros() as u64
                }),
            )?;
        }

        Commands::Export { file } => {
            let session = Session::open(&snapshot)?;
            store::save_to_path(session.registry(), &file)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "file": file.display().to_string()
                }),
            )?;
        }

        Commands::AddMerchant { id, file } => {
            let mut session = Session::open(&snapshot)?;
            let codes = build::read_code_file(&file)?;
            let merchant = MerchantId::new(&id);
            let added = ops::add_merchant(session.registry_mut(), &codes, &merchant);
            save(&mut session, cli.no_auto_save)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "merchant": id,
                    "added": added
                }),
            )?;
        }

        Commands::UpdateMerchant { id, file } => {
            let mut session = Session::open(&snapshot)?;
            let codes = build::read_code_file(&file)?;
            let merchant = MerchantId::new(&id);
            let dropped = ops::update_merchant(session.registry_mut(), &merchant, &codes);
            let serving = session
                .registry()
                .merchant_codes(&merchant)
                .map_or(0, |c| c.len());
            save(&mut session, cli.no_auto_save)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "merchant": id,
                    "dropped": dropped,
                    "pincodes": serving
                }),
            )?;
        }

        Commands::RemoveMerchant { id, universe } => {
            let mut session = Session::open(&snapshot)?;
            let merchant = MerchantId::new(&id);
            let removed = match universe {
                Some(path) => {
                    let path = path.or(config.universe.clone()).ok_or_else(|| {
                        anyhow::anyhow!("No universe file given and none configured")
                    })?;
                    let universe = build::read_code_file(&path)?;
                    let dropped = ops::remove_merchant_in_universe(
                        session.registry_mut(),
                        &merchant,
                        &universe,
                    );
                    dropped > 0
                }
                None => ops::remove_merchant(session.registry_mut(), &merchant).is_removed(),
            };
            if !removed {
                not_found(&cli.format, format!("Merchant not found: {}", id))?;
            }
            save(&mut session, cli.no_auto_save)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "merchant": id
                }),
            )?;
        }

        Commands::Merchant { id } => {
            let session = Session::open(&snapshot)?;
            let merchant = MerchantId::new(&id);
            let codes: Vec<String> = session
                .registry()
                .merchant_codes(&merchant)
                .map(|codes| codes.iter().map(|c| c.to_string()).collect())
                .unwrap_or_default();
            output(
                &cli.format,
                &serde_json::json!({
                    "merchant": id,
                    "count": codes.len(),
                    "pincodes": codes
                }),
            )?;
        }

        Commands::AddPincode { id, pincode } => {
            let mut session = Session::open(&snapshot)?;
            let added = ops::add_pincode(session.registry_mut(), &pincode, &MerchantId::new(&id));
            save(&mut session, cli.no_auto_save)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "merchant": id,
                    "pincode": pincode.to_string(),
                    "added": added
                }),
            )?;
        }

        Commands::RemovePincode { id, pincode } => {
            let mut session = Session::open(&snapshot)?;
            let outcome =
                ops::remove_pincode(session.registry_mut(), &pincode, &MerchantId::new(&id));
            if outcome == Removal::NotFound {
                not_found(&cli.format, format!("Pincode not found: {}", pincode))?;
            }
            save(&mut session, cli.no_auto_save)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "merchant": id,
                    "pincode": pincode.to_string(),
                    "removed": outcome.is_removed()
                }),
            )?;
        }

        Commands::UpdatePincode { id, old, new } => {
            let mut session = Session::open(&snapshot)?;
            let outcome =
                ops::update_pincode(session.registry_mut(), &old, &new, &MerchantId::new(&id));
            save(&mut session, cli.no_auto_save)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "merchant": id,
                    "old": old.to_string(),
                    "new": new.to_string(),
                    "old_found": outcome.is_found()
                }),
            )?;
        }

        Commands::Check { pincode } => {
            let session = Session::open(&snapshot)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "pincode": pincode.to_string(),
                    "serviceable": ops::is_serviceable(session.registry(), &pincode)
                }),
            )?;
        }

        Commands::Search { pincode } => {
            let session = Session::open(&snapshot)?;
            let merchants: Vec<String> = ops::merchants_for(session.registry(), &pincode)
                .iter()
                .map(|m| m.to_string())
                .collect();
            output(
                &cli.format,
                &serde_json::json!({
                    "pincode": pincode.to_string(),
                    "count": merchants.len(),
                    "merchants": merchants
                }),
            )?;
        }

        Commands::Dump { limit } => {
            let session = Session::open(&snapshot)?;
            let mut entries = session.registry().entries();
            if let Some(limit) = limit {
                entries.truncate(limit);
            }
            let items: Vec<_> = entries
                .iter()
                .map(|(code, merchants)| {
                    serde_json::json!({
                        "pincode": code.to_string(),
                        "merchants": merchants.iter().map(|m| m.to_string()).collect::<Vec<_>>()
                    })
                })
                .collect();
            output(
                &cli.format,
                &serde_json::json!({
                    "count": items.len(),
                    "entries": items
                }),
            )?;
        }

        Commands::Stats => {
            let session = Session::open(&snapshot)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "snapshot": snapshot.display().to_string(),
                    "stats": session.registry().stats()
                }),
            )?;
        }

        Commands::Config => {
            output(
                &cli.format,
                &serde_json::json!({
                    "path": Config::locate().map(|p| p.display().to_string()),
                    "snapshot": snapshot.display().to_string(),
                    "universe": config.universe.as_deref().map(|p: &Path| p.display().to_string()),
                    "log_filter": config.log_filter
                }),
            )?;
        }
    }

    Ok(())
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn save(session: &mut Session, no_auto_save: bool) -> anyhow::Result<()> {
    if !no_auto_save {
        session.persist_if_dirty()?;
    }
    Ok(())
}

fn not_found(format: &OutputFormat, message: String) -> anyhow::Result<()> {
    output(
        format,
        &serde_json::json!({
            "status": "error",
            "message": message
        }),
    )?;
    std::process::exit(1);
}

fn output(format: &OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
