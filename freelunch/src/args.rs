use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Freelunch failover router
#[derive(Debug, Parser)]
#[command(name = "freelunch", about = "Call free-tier LLMs with automatic failover")]
pub struct Args {
    /// Path to the menu file
    #[arg(short, long, default_value = "menu.toml", env = "FREELUNCH_MENU")]
    pub config: PathBuf,

    /// Path to an env file with API keys (process environment wins)
    #[arg(long, default_value = ".env", env = "FREELUNCH_ENV_FILE")]
    pub env_file: PathBuf,

    /// Per-attempt timeout override (e.g. "30s")
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Stream the response as it is generated
    #[arg(long)]
    pub stream: bool,

    /// Capability to invoke
    pub capability: String,

    /// Prompt to send
    pub prompt: String,
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    duration_str::parse(s).map_err(|e| format!("invalid duration '{s}': {e}"))
}
