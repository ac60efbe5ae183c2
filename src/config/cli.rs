use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, validate_range, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "channel-registry")]
#[command(about = "Ensures notification channels exist before the app sends notifications")]
pub struct CliConfig {
    /// Path to the TOML channel manifest (built-in channel when omitted)
    #[arg(short, long)]
    pub manifest: Option<String>,

    /// Override the platform API level from the manifest
    #[arg(long)]
    pub api_level: Option<u32>,

    /// Persist channels to this JSON file instead of keeping them in memory
    #[arg(long)]
    pub state_file: Option<String>,

    /// How many initialization hooks run the configuration step
    #[arg(long, default_value = "1")]
    pub passes: usize,

    /// Show what would be registered without touching the platform
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(manifest) = &self.manifest {
            validate_path("manifest", manifest)?;
        }
        if let Some(state_file) = &self.state_file {
            validate_path("state_file", state_file)?;
        }
        if let Some(level) = self.api_level {
            validate_range("api_level", level, 1, 100)?;
        }
        validate_positive_number("passes", self.passes, 1)?;
        Ok(())
    }
}
