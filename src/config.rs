use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobmarket", about = "French data job market collection and analytics")]
pub struct Config {
    /// Search engine URL
    #[arg(long, env = "ES_URL", default_value = "http://localhost:9200")]
    pub es_url: String,

    /// Search engine index name
    #[arg(long, env = "ES_INDEX", default_value = "jobmarket_v3")]
    pub es_index: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the query/analytics API server (default when no subcommand given)
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8000")]
        listen_addr: String,
    },
    /// Collect offers from the upstream source into JSONL files
    Collect {
        /// Search keywords (e.g. "data analyst")
        #[arg(long)]
        keywords: Option<String>,

        /// ROME codes to filter on, comma-separated (e.g. M1419,M1811)
        #[arg(long, value_delimiter = ',')]
        rome_codes: Vec<String>,

        /// Maximum number of offers to collect
        #[arg(long)]
        limit: Option<usize>,

        /// Single small page, for quick inspection
        #[arg(long)]
        sample: bool,

        /// Split the search by contract type and experience code to get
        /// past the upstream per-query result ceiling
        #[arg(long)]
        split_by_contract: bool,

        /// Root directory for the raw/normalized JSONL sinks
        #[arg(long, env = "INGEST_OUTPUT_DIR", default_value = "./data")]
        output_dir: PathBuf,

        /// OAuth2 token endpoint
        #[arg(long, env = "FT_API_TOKEN_URL")]
        token_url: String,

        /// Offer search endpoint
        #[arg(long, env = "FT_API_SEARCH_URL")]
        search_url: String,

        /// OAuth2 client id
        #[arg(long, env = "FT_API_CLIENT_ID")]
        client_id: String,

        /// OAuth2 client secret
        #[arg(long, env = "FT_API_CLIENT_SECRET")]
        client_secret: String,

        /// OAuth2 scope
        #[arg(long, env = "FT_API_SCOPE")]
        scope: Option<String>,
    },
    /// Index normalized JSONL files into the search engine
    Index {
        /// A single file to index (default: every normalized file)
        #[arg(long)]
        file: Option<String>,

        /// Recreate the index before indexing
        #[arg(long)]
        force: bool,

        /// Root directory holding the normalized JSONL files
        #[arg(long, env = "INGEST_OUTPUT_DIR", default_value = "./data")]
        output_dir: PathBuf,
    },
    /// Deduplicate a JSONL file (or every file in a directory) by offer id
    Dedup {
        /// File or directory to deduplicate
        path: PathBuf,
    },
    /// Report offer ids appearing in more than one JSONL file
    Duplicates {
        /// Directory of normalized JSONL files
        dir: PathBuf,
    },
    /// Analyze a normalized JSONL file (data-job share, technologies,
    /// experience levels)
    Analyze {
        /// Normalized JSONL file
        file: PathBuf,
    },
}

impl Config {
    /// Resolve the command, defaulting to Serve if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
        })
    }
}
