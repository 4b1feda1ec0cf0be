//! Restore command - Pull the Drive document and merge it into the journal

use anyhow::Result;
use clap::Args;

use painlog_core::config::Config;
use painlog_core::usecases::Restore;

use crate::commands::{build_remote, build_session, open_store};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct RestoreCommand {}

impl RestoreCommand {
    pub async fn execute(&self, format: OutputFormat, config: &Config) -> Result<()> {
        let formatter = get_formatter(format);
        let store = open_store(config).await?;
        let session = build_session(config);
        let (remote, provisioner) = build_remote(config, store.clone());

        let usecase = Restore::new(store, remote, session, provisioner);
        match usecase.execute().await {
            Ok(outcome) => {
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::json!({ "imported": outcome.imported }));
                } else {
                    formatter.success(&format!(
                        "Restore completed, {} episode(s) imported",
                        outcome.imported
                    ));
                }
                Ok(())
            }
            Err(e) => {
                formatter.error(&e.user_message());
                Ok(())
            }
        }
    }
}
