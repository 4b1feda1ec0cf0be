//! Add command - Record a new pain episode

use anyhow::Result;
use clap::Args;

use painlog_core::config::Config;
use painlog_core::domain::NewRecord;
use painlog_core::ports::RecordStore;

use crate::commands::{field_value, open_store, parse_instant};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct AddCommand {
    /// When the episode started (RFC 3339, or "now")
    #[arg(long, default_value = "now")]
    pub start: String,

    /// When the episode ended, if it has
    #[arg(long)]
    pub end: Option<String>,

    /// Severity, 0-10
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub pain: u8,

    /// Body region key
    #[arg(long)]
    pub region: String,

    /// Free text when the region key is "other"
    #[arg(long)]
    pub region_text: Option<String>,

    /// Joint key within the region
    #[arg(long)]
    pub joint: Option<String>,

    /// Free text when the joint key is "other"
    #[arg(long)]
    pub joint_text: Option<String>,

    /// Symptom quality key
    #[arg(long)]
    pub symptom: String,

    /// Free text when the symptom key is "other"
    #[arg(long)]
    pub symptom_text: Option<String>,

    /// Suspected trigger key
    #[arg(long)]
    pub trigger: Option<String>,

    /// Free text when the trigger key is "other"
    #[arg(long)]
    pub trigger_text: Option<String>,

    /// Free-text notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl AddCommand {
    pub async fn execute(&self, format: OutputFormat, config: &Config) -> Result<()> {
        let formatter = get_formatter(format);
        let store = open_store(config).await?;

        let values = NewRecord {
            start_at: parse_instant(&self.start)?,
            end_at: self.end.as_deref().map(parse_instant).transpose()?,
            pain: self.pain,
            region: field_value(&self.region, self.region_text.as_deref()),
            joint: self
                .joint
                .as_deref()
                .map(|key| field_value(key, self.joint_text.as_deref())),
            symptom: field_value(&self.symptom, self.symptom_text.as_deref()),
            trigger: self
                .trigger
                .as_deref()
                .map(|key| field_value(key, self.trigger_text.as_deref())),
            notes: self.notes.clone(),
        };

        match store.create(values).await {
            Ok(record) => {
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::to_value(&record)?);
                } else {
                    formatter.success(&format!("Recorded episode {}", record.id));
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
