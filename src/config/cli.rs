use super::{DEFAULT_STORAGE_PATH, DEFAULT_TIMEOUT_SECONDS};
use crate::adapters::DEFAULT_ENDPOINT;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_endpoint_template, validate_path, validate_positive_number, Validate,
};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "cep-lookup")]
#[command(about = "Look up Brazilian postal codes (CEP) and keep a local search history")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, default_value = DEFAULT_STORAGE_PATH)]
    pub storage_path: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    // 設定檔會取代上面三個參數
    #[arg(short, long, help = "TOML config file; replaces the endpoint, storage and timeout options")]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Look up a CEP and record it in the history
    Lookup {
        /// CEP to look up, e.g. 01310-100
        cep: String,
    },
    /// Show the search history, oldest first
    History,
    /// Delete the search history
    Clear,
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn storage_path(&self) -> &str {
        &self.storage_path
    }

    fn timeout_seconds(&self) -> Option<u64> {
        Some(self.timeout_seconds)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_endpoint_template("api_endpoint", &self.api_endpoint)?;
        validate_path("storage_path", &self.storage_path)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        Ok(())
    }
}
