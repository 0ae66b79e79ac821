//! Gridkeep CLI
//!
//! Command-line interface for a persisted entry list:
//! - List, add and remove entries
//! - Attach attributes to an entry
//! - Clear everything behind a confirmation
//! - Inspect the raw stored slot

use clap::{Parser, Subcommand, ValueEnum};
use gridkeep::config::{generate_default_config, Config, LoadReport};
use gridkeep::storage::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridkeep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keep a small list of entries in a key/value store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Slot to operate on
    #[arg(short, long, global = true)]
    pub key: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show all entries
    List,

    /// Add an entry
    Add {
        /// Entry name
        name: String,
        /// Attributes to attach (repeatable)
        #[arg(short, long = "attr")]
        attrs: Vec<String>,
    },

    /// Attach an attribute to an existing entry
    Attr {
        /// Entry id
        id: u64,
        /// Attribute value
        value: String,
    },

    /// Remove an entry by id
    Remove {
        /// Entry id
        id: u64,
    },

    /// Remove all entries
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the stored slot exactly as it is
    Raw,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_report) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, LoadReport::from_path(path)),
        None => Config::load_default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(key) = cli.key {
        config.storage.key = key;
    }

    gridkeep::telemetry::init(&config.logging)?;
    config_report.log();
    tracing::debug!(data_dir = %config.storage.data_dir, key = %config.storage.key, "Starting");

    let store = config.storage.file_store();
    let key = config.storage.key.clone();

    match cli.command {
        Commands::List => {
            let entries: PersistentList<GridEntry, _> = PersistentList::open(store, key);
            print_entries(entries.items(), cli.format)?;
        }

        Commands::Add { name, attrs } => {
            let mut entries: PersistentList<GridEntry, _> = PersistentList::open(store, key);
            let mut entry = GridEntry::new(next_id(entries.items()), name.trim());
            entry.attributes.extend(attrs.into_iter().map(Into::into));

            let id = entry.id;
            let outcome = entries.push(entry);
            let updated = entries.touch_update_time().to_string();
            report(&outcome);
            println!("Added entry {} at {}", id, updated);
        }

        Commands::Attr { id, value } => {
            let mut entries: PersistentList<GridEntry, _> = PersistentList::open(store, key);
            let outcome = entries.update(|items| match items.iter_mut().find(|e| e.id == id) {
                Some(entry) => {
                    entry.attributes.push(value.into());
                    true
                }
                None => false,
            });

            if !outcome.changed() {
                anyhow::bail!("no entry with id {}", id);
            }
            report(&outcome);
            println!("Updated entry {}", id);
        }

        Commands::Remove { id } => {
            let mut entries: PersistentList<GridEntry, _> = PersistentList::open(store, key);
            let outcome = entries.remove_where(|e| e.id == id);
            if !outcome.changed() {
                anyhow::bail!("no entry with id {}", id);
            }
            report(&outcome);
            println!("Removed entry {}", id);
        }

        Commands::Clear { yes } => {
            let mut entries: PersistentList<GridEntry, _> = PersistentList::open(store, key);
            if entries.is_empty() {
                println!("Nothing to clear");
                return Ok(());
            }

            let count = entries.len();
            let outcome = entries.clear(|prompt| yes || confirm(prompt));
            if outcome.changed() {
                report(&outcome);
                println!("Removed {} entries", count);
            } else {
                println!("Cancelled");
            }
        }

        Commands::Raw => match store.get_item(&key)? {
            Some(raw) => println!("{}", raw),
            None => eprintln!("Slot {:?} is empty", key),
        },

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Ask on the terminal; anything but an explicit yes declines
fn confirm(prompt: &str) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// Storage failures are diagnostics, not command failures
fn report(outcome: &Outcome) {
    if let Some(e) = outcome.error() {
        eprintln!("warning: change kept in memory only, not saved: {}", e);
    }
}

fn print_entries(entries: &[GridEntry], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entries)?);
        }
        OutputFormat::Table => {
            if entries.is_empty() {
                println!("No entries");
                return Ok(());
            }

            let name_width = entries
                .iter()
                .map(|e| e.name.len())
                .max()
                .unwrap_or(0)
                .max("NAME".len());

            println!("{:>6}  {:<width$}  ATTRIBUTES", "ID", "NAME", width = name_width);
            for entry in entries {
                println!(
                    "{:>6}  {:<width$}  {}",
                    entry.id,
                    entry.name,
                    entry.attribute_labels().join(", "),
                    width = name_width
                );
            }
        }
    }
    Ok(())
}
