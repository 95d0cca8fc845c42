//! Storekit CLI
//!
//! Document-store queries, nginx log statistics and key-value cache helpers
//! from the command line.

mod commands;
mod stores;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "storekit")]
#[command(author, version, about = "Storekit - document-store and key-value cache helpers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Query and insert schools
    Schools {
        #[command(subcommand)]
        action: SchoolsAction,
    },

    /// Print request statistics of the nginx log collection
    #[command(name = "log-stats")]
    LogStats {
        /// Also list the 10 most frequent client IPs
        #[arg(long)]
        top_ips: bool,
    },

    /// Store and read values through the call-tracked cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Fetch pages through the expiring page cache
    Web {
        #[command(subcommand)]
        action: WebAction,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check connectivity to Redis and MongoDB
    Doctor,
}

#[derive(Subcommand)]
enum SchoolsAction {
    /// List every school
    List,
    /// Insert a school from KEY=VALUE fields
    Insert {
        /// Fields, e.g. name=UCSF address="505 Parnassus Ave" topics=C,Python
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// List schools teaching a topic
    ByTopic { topic: String },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Store values under random keys and print the keys
    Store {
        #[arg(required = true)]
        values: Vec<String>,
        /// Store values as integers
        #[arg(long, conflicts_with = "float")]
        int: bool,
        /// Store values as floats
        #[arg(long)]
        float: bool,
        /// Flush the store first
        #[arg(long)]
        fresh: bool,
    },
    /// Read a stored value
    Get {
        key: String,
        #[arg(long = "as", value_enum, default_value_t = ReadAs::Str)]
        read_as: ReadAs,
    },
    /// Show the recorded store calls
    Replay,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReadAs {
    Str,
    Int,
    Raw,
}

#[derive(Subcommand)]
enum WebAction {
    /// Print a page, served from cache while fresh
    Get { url: String },
    /// Print how many times a page was requested
    Count { url: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective settings
    Show,
    /// Print the settings file path
    Path,
    /// Write the default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "storekit_cli=debug,storekit_core=debug,storekit_storage=debug,storekit_docs=debug,storekit_cache=debug"
        } else {
            "storekit_cli=info,storekit_cache=warn"
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    debug!("Starting storekit CLI");

    let result = match cli.command {
        Commands::Schools { action } => match action {
            SchoolsAction::List => commands::schools::list().await,
            SchoolsAction::Insert { fields } => commands::schools::insert(&fields).await,
            SchoolsAction::ByTopic { topic } => commands::schools::by_topic(&topic).await,
        },
        Commands::LogStats { top_ips } => commands::logs::stats(top_ips).await,
        Commands::Cache { action } => match action {
            CacheAction::Store {
                values,
                int,
                float,
                fresh,
            } => commands::cache::store(&values, int, float, fresh).await,
            CacheAction::Get { key, read_as } => commands::cache::get(&key, read_as).await,
            CacheAction::Replay => commands::cache::replay().await,
        },
        Commands::Web { action } => match action {
            WebAction::Get { url } => commands::web::get(&url).await,
            WebAction::Count { url } => commands::web::count(&url).await,
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show().await,
            ConfigAction::Path => commands::config::path().await,
            ConfigAction::Init { force } => commands::config::init(force).await,
        },
        Commands::Doctor => commands::doctor::execute().await,
    };

    if let Err(ref e) = result {
        error!("Command failed: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}
