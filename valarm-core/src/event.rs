//! The slice of an event that an alarm needs to see.
//!
//! An alarm never owns its event. It holds a narrow capability exposing the
//! two things rendering depends on: the timezone used for absolute triggers
//! and the summary used as fallback DESCRIPTION text.

use chrono_tz::Tz;

use crate::error::{AlarmError, AlarmResult};

/// Read-only view of the owning event.
pub trait EventContext: Send + Sync {
    /// Timezone absolute triggers are rendered in. `None` renders UTC.
    fn timezone(&self) -> Option<Tz>;

    /// Event summary, used when a display alarm has no description.
    fn summary(&self) -> &str;
}

/// Plain event context: a summary and an optional IANA timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInfo {
    summary: String,
    timezone: Option<Tz>,
}

impl EventInfo {
    pub fn new(summary: impl Into<String>) -> Self {
        EventInfo {
            summary: summary.into(),
            timezone: None,
        }
    }

    /// Attach an IANA timezone (e.g. "Europe/Berlin").
    pub fn with_timezone(mut self, name: &str) -> AlarmResult<Self> {
        let tz = name.parse::<Tz>().map_err(|_| {
            AlarmError::Construction(format!("Unknown timezone for event: '{}'", name))
        })?;
        self.timezone = Some(tz);
        Ok(self)
    }

    pub fn with_tz(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz);
        self
    }
}

impl EventContext for EventInfo {
    fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    fn summary(&self) -> &str {
        &self.summary
    }
}
