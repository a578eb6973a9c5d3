pub mod toml_config;

pub use toml_config::ExportConfig;

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use super::ExportConfig;
    use crate::domain::model::{QuoteEscaping, VotePolicy};
    use crate::utils::error::{ExportError, Result};
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Default, Parser)]
    #[command(name = "retro-etl")]
    #[command(about = "Export the voted cards of a retro board to a CSV-shaped text file")]
    pub struct CliConfig {
        /// Board URL, or a saved board page (.html) / board snapshot (.json)
        pub source: Option<String>,

        /// Output file (defaults to ../<board title>.txt)
        pub output: Option<String>,

        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Copy messages verbatim between quotes instead of doubling embedded quotes
        #[arg(long)]
        pub legacy_quotes: bool,

        /// Fail on vote badges that are not a number instead of counting them as zero
        #[arg(long)]
        pub strict_votes: bool,

        /// Print the export to stdout instead of writing it
        #[arg(long)]
        pub dry_run: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,

        #[arg(long, help = "Log timing and memory for each stage")]
        pub monitor: bool,
    }

    impl CliConfig {
        pub fn source(&self) -> Result<&str> {
            self.source.as_deref().ok_or(ExportError::MissingSource)
        }

        /// 載入 TOML 設定並套用命令列覆蓋
        pub fn export_config(&self) -> Result<ExportConfig> {
            let mut config = match &self.config {
                Some(path) => ExportConfig::from_file(path)?,
                None => ExportConfig::default(),
            };

            if self.legacy_quotes {
                config.format.escaping = QuoteEscaping::Legacy;
            }
            if self.strict_votes {
                config.format.on_invalid_votes = VotePolicy::Reject;
            }

            config.validate()?;
            Ok(config)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            let source = self.source()?;
            if source.contains("://") {
                validation::validate_url("source", source)?;
            } else {
                validation::validate_path("source", source)?;
            }

            if let Some(output) = &self.output {
                validation::validate_path("output", output)?;
            }

            Ok(())
        }
    }

}
