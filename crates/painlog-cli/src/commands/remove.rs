//! Remove command - Delete an episode by id

use anyhow::Result;
use clap::Args;

use painlog_core::config::Config;
use painlog_core::domain::RecordId;
use painlog_core::ports::RecordStore;

use crate::commands::open_store;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Id of the episode to remove
    pub id: String,
}

impl RemoveCommand {
    pub async fn execute(&self, format: OutputFormat, config: &Config) -> Result<()> {
        let formatter = get_formatter(format);
        let store = open_store(config).await?;

        // Deletion is idempotent: removing an already-absent id succeeds.
        match store.delete(&RecordId::new(self.id.clone())).await {
            Ok(()) => {
                formatter.success(&format!("Removed episode {}", self.id));
                Ok(())
            }
            Err(e) => {
                formatter.error(&e.user_message());
                Ok(())
            }
        }
    }
}
