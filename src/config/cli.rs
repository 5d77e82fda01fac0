use crate::core::pagination::PageSize;
use crate::domain::model::DEFAULT_LIST_STATUS;
use clap::{Parser, Subcommand};

pub use crate::app::report::OutputFormat;

#[derive(Clone, Parser)]
#[command(name = "directory")]
#[command(about = "Browse, search and curate lists of community services")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Read records from a JSON fixture file instead of the record store
    #[arg(long, global = true)]
    pub fixtures: Option<String>,

    /// Record store API key (overrides RESOURCES_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Record store base id (overrides RESOURCES_BASE_ID)
    #[arg(long, global = true)]
    pub base_id: Option<String>,

    /// Record store endpoint URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[arg(long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("config", &self.config)
            .field("fixtures", &self.fixtures)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_id", &self.base_id)
            .field("endpoint", &self.endpoint)
            .field("format", &self.format)
            .field("verbose", &self.verbose)
            .field("json_logs", &self.json_logs)
            .field("command", &self.command)
            .finish()
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show one services list: a page of services, the filter vocabulary and the map addresses
    ShowList {
        list_id: String,

        /// Case-insensitive text search on name and description
        #[arg(short, long, default_value = "")]
        query: String,

        /// Only services with at least one of these taxonomy tags (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// 5, 10, 25, 50, 100 or "all"
        #[arg(long)]
        page_size: Option<PageSize>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Address id to mark as selected on the map
        #[arg(long)]
        select_address: Option<String>,
    },

    /// List every service in the directory
    Services {
        /// Filter formula passed to the record store verbatim
        #[arg(long)]
        filter: Option<String>,

        #[arg(short, long)]
        query: Option<String>,
    },

    /// List services lists
    Lists {
        #[arg(long)]
        filter: Option<String>,
    },

    /// List taxonomy terms
    Taxonomies {
        #[arg(long)]
        filter: Option<String>,
    },

    /// Create a new services list from selected service ids
    CreateList {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        creator: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Service id to include (repeatable)
        #[arg(long = "service")]
        services: Vec<String>,

        #[arg(long, default_value = DEFAULT_LIST_STATUS)]
        status: String,

        /// Validate and print the payload without writing it
        #[arg(long)]
        dry_run: bool,
    },
}
