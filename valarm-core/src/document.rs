//! Alarm documents: one event and the alarms attached to it.
//!
//! ```toml
//! [event]
//! summary = "Dentist"
//! timezone = "Europe/Berlin"
//!
//! [[alarms]]
//! type = "display"
//! trigger = "PT15M"
//!
//! [[alarms]]
//! type = "audio"
//! trigger_after = 300
//! attach = { uri = "http://example.com/bell.mp3", mime = "audio/mpeg" }
//! ```
//!
//! Files ending in `.json` are read as JSON, everything else as TOML.

use std::path::Path;
use std::sync::Arc;

use ::config::{Config, File, FileFormat};
use serde::Deserialize;

use crate::alarm::{Alarm, AlarmData, AlarmSnapshot};
use crate::error::{AlarmError, AlarmResult};
use crate::event::{EventContext, EventInfo};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    event: Option<EventSection>,
    #[serde(default)]
    alarms: Vec<AlarmData>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventSection {
    summary: String,
    timezone: Option<String>,
}

/// A loaded document with every alarm already validated.
#[derive(Debug, Clone)]
pub struct AlarmDocument {
    event: Arc<EventInfo>,
    alarms: Vec<Alarm>,
}

impl AlarmDocument {
    /// Load a document from disk.
    pub fn load(path: &Path) -> AlarmResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let doc = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        log::debug!(
            "Loaded {} alarm(s) for '{}' from {}",
            doc.alarms.len(),
            doc.event.summary(),
            path.display()
        );
        Ok(doc)
    }

    pub fn from_toml_str(content: &str) -> AlarmResult<Self> {
        Self::parse(content, FileFormat::Toml)
    }

    pub fn from_json_str(content: &str) -> AlarmResult<Self> {
        Self::parse(content, FileFormat::Json)
    }

    fn parse(content: &str, format: FileFormat) -> AlarmResult<Self> {
        let raw: RawDocument = Config::builder()
            .add_source(File::from_str(content, format))
            .build()
            .map_err(|e| AlarmError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AlarmError::Config(e.to_string()))?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDocument) -> AlarmResult<Self> {
        let section = raw.event.ok_or_else(|| {
            AlarmError::Construction("`event` section required to build alarms".into())
        })?;

        let mut event = EventInfo::new(section.summary);
        if let Some(ref tz) = section.timezone {
            event = event.with_timezone(tz)?;
        }
        let event = Arc::new(event);

        let alarms = raw
            .alarms
            .into_iter()
            .map(|data| {
                let ctx: Arc<dyn EventContext> = event.clone();
                Alarm::from_data(data, ctx)
            })
            .collect::<AlarmResult<Vec<_>>>()?;

        Ok(AlarmDocument { event, alarms })
    }

    pub fn event(&self) -> &EventInfo {
        &self.event
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    /// All VALARM blocks, in document order. Fails if any alarm fails.
    pub fn render(&self) -> AlarmResult<String> {
        self.alarms.iter().map(Alarm::to_ics).collect()
    }

    pub fn snapshots(&self) -> Vec<AlarmSnapshot> {
        self.alarms.iter().map(Alarm::to_snapshot).collect()
    }
}
