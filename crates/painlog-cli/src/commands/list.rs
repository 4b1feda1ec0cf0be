//! List command - Show recorded episodes

use anyhow::Result;
use clap::Args;

use painlog_core::config::Config;
use painlog_core::domain::{FieldValue, PainRecord};
use painlog_core::ports::{RecordFilter, RecordStore, SortOrder};

use crate::commands::open_store;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ListCommand {
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
}

impl ListCommand {
    fn filter(&self) -> RecordFilter {
        let mut filter = RecordFilter::new()
            .with_min_pain(self.min_pain)
            .with_days(self.days);
        if let Some(region) = &self.region {
            filter = filter.with_region_key(region.clone());
        }
        if let Some(joint) = &self.joint {
            filter = filter.with_joint_key(joint.clone());
        }
        filter
    }

    pub async fn execute(&self, format: OutputFormat, config: &Config) -> Result<()> {
        let formatter = get_formatter(format);
        let store = open_store(config).await?;

        match store.list(&self.filter(), SortOrder::NewestFirst).await {
            Ok(records) => {
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::to_value(&records)?);
                } else if records.is_empty() {
                    formatter.info("No episodes recorded");
                } else {
                    formatter.success(&format!("{} episode(s)", records.len()));
                    for record in &records {
                        formatter.info(&describe(record));
                    }
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

fn field_label(value: &FieldValue) -> &str {
    value.custom_text.as_deref().unwrap_or(&value.key)
}

/// One human-readable line per episode
fn describe(record: &PainRecord) -> String {
    let mut line = format!(
        "{}  pain {}/10  {}",
        record.start_at.format("%Y-%m-%d %H:%M"),
        record.pain,
        field_label(&record.region),
    );
    if let Some(joint) = &record.joint {
        line.push_str(&format!("/{}", field_label(joint)));
    }
    line.push_str(&format!("  {}", field_label(&record.symptom)));
    if !record.notes.is_empty() {
        line.push_str(&format!("  ({})", record.notes));
    }
    line.push_str(&format!("  [{}]", record.id));
    line
}
