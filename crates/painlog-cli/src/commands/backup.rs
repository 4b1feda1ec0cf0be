//! Backup command - Push the full journal to Google Drive

use anyhow::Result;
use clap::Args;

use painlog_core::config::Config;
use painlog_core::usecases::Backup;

use crate::commands::{build_remote, build_session, open_store};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct BackupCommand {}

impl BackupCommand {
    pub async fn execute(&self, format: OutputFormat, config: &Config) -> Result<()> {
        let formatter = get_formatter(format);
        let store = open_store(config).await?;
        let session = build_session(config);
        let (remote, provisioner) = build_remote(config, store.clone());

        let usecase = Backup::new(store, remote, session, provisioner);
        match usecase.execute().await {
            Ok(()) => {
                formatter.success("Backup completed");
                Ok(())
            }
            Err(e) => {
                formatter.error(&e.user_message());
                Ok(())
            }
        }
    }
}
