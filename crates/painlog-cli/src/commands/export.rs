//! Export command - Write the journal as a JSON document

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use painlog_core::config::Config;
use painlog_core::ports::RecordFilter;
use painlog_core::usecases::ExportRecords;

use crate::commands::open_store;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Only episodes with at least this severity
    #[arg(long, default_value_t = 0)]
    pub min_pain: u8,

    /// Only episodes starting within the last N days
    #[arg(long, default_value_t = 0)]
    pub days: u32,

    /// Only episodes in this body region
    #[arg(long)]
    pub region: Option<String>,

    /// Only episodes affecting this joint
    #[arg(long)]
    pub joint: Option<String>,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl ExportCommand {
    pub async fn execute(&self, format: OutputFormat, config: &Config) -> Result<()> {
        let formatter = get_formatter(format);
        let store = open_store(config).await?;

        let mut filter = RecordFilter::new()
            .with_min_pain(self.min_pain)
            .with_days(self.days);
        if let Some(region) = &self.region {
            filter = filter.with_region_key(region.clone());
        }
        if let Some(joint) = &self.joint {
            filter = filter.with_joint_key(joint.clone());
        }

        let envelope = match ExportRecords::new(store).execute(filter).await {
            Ok(envelope) => envelope,
            Err(e) => {
                formatter.error(&e.user_message());
                return Ok(());
            }
        };
        let count = envelope.events.len();

        match &self.output {
            Some(path) => {
                let body = envelope.to_json()?;
                std::fs::write(path, body)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                formatter.success(&format!(
                    "Exported {} episode(s) to {}",
                    count,
                    path.display()
                ));
            }
            None => {
                // Document on stdout regardless of --json; the envelope IS
                // the output.
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            }
        }
        Ok(())
    }
}
