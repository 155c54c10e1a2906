pub mod resolved;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_DIR: &str = ".claude-session-logs";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "session-log-hasher")]
#[command(about = "Replace inline base64 payloads in JSON Lines logs with SHA-256 digests")]
#[command(
    after_help = "Objects shaped like {\"type\":\"base64\",\"data\":\"...\"} whose data is longer than \
100 characters get their data replaced with a 64-char hex digest. Lines that are not valid JSON \
are copied unchanged.\n\nOutput: <OUTPUT_DIR>/<name>.hashed.jsonl"
)]
pub struct CliConfig {
    /// Input JSON Lines file
    pub input: Option<String>,

    /// Output directory [default: .claude-session-logs]
    pub output_dir: Option<String>,

    /// Optional TOML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}
