//! Edit command - Amend an existing pain episode

use anyhow::Result;
use clap::Args;

use painlog_core::config::Config;
use painlog_core::domain::{RecordId, RecordPatch};
use painlog_core::ports::RecordStore;

use crate::commands::{field_value, open_store, parse_instant};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the episode to amend
    pub id: String,

    /// New start instant (RFC 3339, or "now")
    #[arg(long)]
    pub start: Option<String>,

    /// New end instant
    #[arg(long, conflicts_with = "clear_end")]
    pub end: Option<String>,

    /// Mark the episode as ongoing again
    #[arg(long)]
    pub clear_end: bool,

    /// New severity, 0-10
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub pain: Option<u8>,

    /// New body region key
    #[arg(long)]
    pub region: Option<String>,

    /// Free text when the region key is "other"
    #[arg(long, requires = "region")]
    pub region_text: Option<String>,

    /// New joint key within the region
    #[arg(long, conflicts_with = "clear_joint")]
    pub joint: Option<String>,

    /// Free text when the joint key is "other"
    #[arg(long, requires = "joint")]
    pub joint_text: Option<String>,

    /// Remove the joint from the episode
    #[arg(long)]
    pub clear_joint: bool,

    /// New symptom quality key
    #[arg(long)]
    pub symptom: Option<String>,

    /// Free text when the symptom key is "other"
    #[arg(long, requires = "symptom")]
    pub symptom_text: Option<String>,

    /// New suspected trigger key
    #[arg(long, conflicts_with = "clear_trigger")]
    pub trigger: Option<String>,

    /// Free text when the trigger key is "other"
    #[arg(long, requires = "trigger")]
    pub trigger_text: Option<String>,

    /// Remove the trigger from the episode
    #[arg(long)]
    pub clear_trigger: bool,

    /// New free-text notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl EditCommand {
    /// Translates the supplied flags into a patch; omitted flags leave the
    /// stored field untouched
    fn patch(&self) -> Result<RecordPatch> {
        let end_at = if self.clear_end {
            Some(None)
        } else {
            self.end
                .as_deref()
                .map(parse_instant)
                .transpose()?
                .map(Some)
        };
        let joint = if self.clear_joint {
            Some(None)
        } else {
            self.joint
                .as_deref()
                .map(|key| Some(field_value(key, self.joint_text.as_deref())))
        };
        let trigger = if self.clear_trigger {
            Some(None)
        } else {
            self.trigger
                .as_deref()
                .map(|key| Some(field_value(key, self.trigger_text.as_deref())))
        };

        Ok(RecordPatch {
            start_at: self.start.as_deref().map(parse_instant).transpose()?,
            end_at,
            pain: self.pain,
            region: self
                .region
                .as_deref()
                .map(|key| field_value(key, self.region_text.as_deref())),
            joint,
            symptom: self
                .symptom
                .as_deref()
                .map(|key| field_value(key, self.symptom_text.as_deref())),
            trigger,
            notes: self.notes.clone(),
        })
    }

    pub async fn execute(&self, format: OutputFormat, config: &Config) -> Result<()> {
        let formatter = get_formatter(format);
        let store = open_store(config).await?;
        let patch = self.patch()?;

        match store.update(&RecordId::new(self.id.clone()), patch).await {
            Ok(record) => {
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::to_value(&record)?);
                } else {
                    formatter.success(&format!("Updated episode {}", record.id));
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
