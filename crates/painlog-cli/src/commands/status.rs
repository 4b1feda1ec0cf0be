//! Status command - Show remote sync status

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use painlog_core::config::Config;
use painlog_core::usecases::FetchStatus;

use crate::commands::{build_session, open_store};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct StatusCommand {}

fn instant_label(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "never".to_string(),
    }
}

impl StatusCommand {
    pub async fn execute(&self, format: OutputFormat, config: &Config) -> Result<()> {
        let formatter = get_formatter(format);
        let store = open_store(config).await?;
        let session = build_session(config);

        let status = match FetchStatus::new(store, session).execute().await {
            Ok(status) => status,
            Err(e) => {
                formatter.error(&e.user_message());
                return Ok(());
            }
        };

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::to_value(&status)?);
            return Ok(());
        }

        formatter.success("Sync status");
        formatter.info(&format!(
            "Configured:   {}",
            if status.configured { "yes" } else { "no" }
        ));
        formatter.info(&format!(
            "Connected:    {}",
            if status.connected { "yes" } else { "no" }
        ));
        formatter.info(&format!(
            "Folder:       {}",
            status.folder_id.as_deref().unwrap_or("not provisioned")
        ));
        formatter.info(&format!(
            "Document:     {}",
            status.file_id.as_deref().unwrap_or("not provisioned")
        ));
        formatter.info(&format!(
            "Last backup:  {}",
            instant_label(status.last_backup_at)
        ));
        formatter.info(&format!(
            "Last restore: {}",
            instant_label(status.last_restore_at)
        ));
        Ok(())
    }
}
