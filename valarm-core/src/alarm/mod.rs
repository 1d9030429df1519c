//! The alarm record and its validated accessors.
//!
//! Each field has a getter and a setter. Setters validate their own input
//! and nothing else; constraints spanning several fields (REPEAT needs
//! DURATION and vice versa) are only checked when the alarm is rendered.

mod data;
mod trigger;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::custom::{CustomAttribute, CustomAttributes};
use crate::error::{AlarmError, AlarmResult};
use crate::event::EventContext;

pub use data::{AlarmData, AttachData, CustomAttributesData, IntervalData, TriggerData};
pub use trigger::{StoredTrigger, Trigger, TriggerInput};

/// VALARM action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmType {
    Display,
    Audio,
}

impl AlarmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmType::Display => "display",
            AlarmType::Audio => "audio",
        }
    }

    /// Value of the ACTION property.
    pub fn as_ics_str(&self) -> &'static str {
        match self {
            AlarmType::Display => "DISPLAY",
            AlarmType::Audio => "AUDIO",
        }
    }
}

impl fmt::Display for AlarmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlarmType {
    type Err = AlarmError;

    fn from_str(s: &str) -> AlarmResult<Self> {
        match s {
            "display" => Ok(AlarmType::Display),
            "audio" => Ok(AlarmType::Audio),
            other => Err(AlarmError::Validation(format!(
                "`type` is not correct, must be either `display` or `audio`, got '{}'",
                other
            ))),
        }
    }
}

/// Sound (or other resource) played by an audio alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub uri: String,
    pub mime: Option<String>,
}

impl Attachment {
    pub fn new(uri: impl Into<String>) -> Self {
        Attachment {
            uri: uri.into(),
            mime: None,
        }
    }

    pub fn with_mime(uri: impl Into<String>, mime: impl Into<String>) -> Self {
        Attachment {
            uri: uri.into(),
            mime: Some(mime.into()),
        }
    }
}

impl From<&str> for Attachment {
    fn from(uri: &str) -> Self {
        Attachment::new(uri)
    }
}

impl From<String> for Attachment {
    fn from(uri: String) -> Self {
        Attachment::new(uri)
    }
}

/// A reminder attached to one event.
///
/// The alarm keeps a shared handle to its event's [`EventContext`] and only
/// reads from it while rendering.
#[derive(Clone)]
pub struct Alarm {
    alarm_type: Option<AlarmType>,
    trigger: Option<StoredTrigger>,
    repeat: Option<u32>,
    interval: Option<u32>,
    attach: Option<Attachment>,
    description: Option<String>,
    custom: CustomAttributes,
    event: Arc<dyn EventContext>,
}

impl fmt::Debug for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alarm")
            .field("alarm_type", &self.alarm_type)
            .field("trigger", &self.trigger)
            .field("repeat", &self.repeat)
            .field("interval", &self.interval)
            .field("attach", &self.attach)
            .field("description", &self.description)
            .field("custom", &self.custom)
            .field("event", &self.event.summary())
            .finish()
    }
}

impl Alarm {
    /// Empty alarm bound to `event`. Type and trigger must be set before it
    /// can be rendered.
    pub fn new(event: Arc<dyn EventContext>) -> Self {
        Alarm {
            alarm_type: None,
            trigger: None,
            repeat: None,
            interval: None,
            attach: None,
            description: None,
            custom: CustomAttributes::new(),
            event,
        }
    }

    /// Build an alarm from data, running every field through its setter.
    pub fn from_data(data: AlarmData, event: Arc<dyn EventContext>) -> AlarmResult<Self> {
        let mut alarm = Alarm::new(event);
        data.apply_to(&mut alarm)?;
        Ok(alarm)
    }

    pub fn event(&self) -> &dyn EventContext {
        self.event.as_ref()
    }

    // --- type ---

    pub fn alarm_type(&self) -> Option<AlarmType> {
        self.alarm_type
    }

    /// `None` clears the type.
    pub fn set_alarm_type(&mut self, alarm_type: Option<AlarmType>) -> &mut Self {
        self.alarm_type = alarm_type;
        self
    }

    // --- trigger ---

    /// Absolute instants come back unchanged. Offsets come back with the
    /// stored sign inverted: positive means "before start".
    pub fn trigger(&self) -> Option<Trigger> {
        self.trigger.map(trigger::read_trigger)
    }

    /// Fire at an instant, or `n` seconds / a duration before the event starts.
    pub fn set_trigger(&mut self, trigger: impl Into<TriggerInput>) -> AlarmResult<&mut Self> {
        self.trigger = Some(trigger::resolve_trigger(trigger.into())?);
        Ok(self)
    }

    pub fn clear_trigger(&mut self) -> &mut Self {
        self.trigger = None;
        self
    }

    pub fn trigger_before(&self) -> Option<Trigger> {
        self.trigger()
    }

    pub fn set_trigger_before(
        &mut self,
        trigger: impl Into<TriggerInput>,
    ) -> AlarmResult<&mut Self> {
        self.set_trigger(trigger)
    }

    /// Stored value as is: positive means "after end".
    pub fn trigger_after(&self) -> Option<Trigger> {
        self.trigger.map(trigger::read_trigger_after)
    }

    /// Fire at an instant, or `n` seconds / a duration after the event ends.
    pub fn set_trigger_after(
        &mut self,
        trigger: impl Into<TriggerInput>,
    ) -> AlarmResult<&mut Self> {
        self.trigger = Some(trigger::resolve_trigger_after(trigger.into())?);
        Ok(self)
    }

    /// The canonical stored trigger, as used by the serializer.
    pub fn stored_trigger(&self) -> Option<StoredTrigger> {
        self.trigger
    }

    // --- repeat / interval ---

    pub fn repeat(&self) -> Option<u32> {
        self.repeat
    }

    /// `None` or `0` clears. Negative or oversized counts are rejected.
    pub fn set_repeat(&mut self, repeat: Option<i64>) -> AlarmResult<&mut Self> {
        self.repeat = match repeat {
            None | Some(0) => None,
            Some(n) if n < 0 => {
                return Err(AlarmError::Validation(format!(
                    "`repeat` must be a positive number, got {}",
                    n
                )));
            }
            Some(n) => Some(u32::try_from(n).map_err(|_| {
                AlarmError::Validation(format!("`repeat` is out of range: {}", n))
            })?),
        };
        Ok(self)
    }

    /// Seconds between repetitions.
    pub fn interval(&self) -> Option<u32> {
        self.interval
    }

    /// `None` or `0` clears. Negative or oversized values are rejected.
    pub fn set_interval(&mut self, interval: Option<i64>) -> AlarmResult<&mut Self> {
        self.interval = match interval {
            None | Some(0) => None,
            Some(n) if n < 0 => {
                return Err(AlarmError::Validation(format!(
                    "`interval` must be a positive number of seconds, got {}",
                    n
                )));
            }
            Some(n) => Some(u32::try_from(n).map_err(|_| {
                AlarmError::Validation(format!("`interval` is out of range: {}", n))
            })?),
        };
        Ok(self)
    }

    // --- attach ---

    pub fn attach(&self) -> Option<&Attachment> {
        self.attach.as_ref()
    }

    /// A bare string is a URI without MIME type. An empty MIME type counts
    /// as none; an empty URI is rejected.
    pub fn set_attach(&mut self, attach: impl Into<Attachment>) -> AlarmResult<&mut Self> {
        let attach = attach.into();
        if attach.uri.is_empty() {
            return Err(AlarmError::Validation("`attach.uri` is empty".into()));
        }
        self.attach = Some(Attachment {
            uri: attach.uri,
            mime: attach.mime.filter(|m| !m.is_empty()),
        });
        Ok(self)
    }

    pub fn clear_attach(&mut self) -> &mut Self {
        self.attach = None;
        self
    }

    // --- description ---

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// An empty string clears the description.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    pub fn clear_description(&mut self) -> &mut Self {
        self.description = None;
        self
    }

    // --- custom attributes ---

    pub fn custom_attributes(&self) -> &[CustomAttribute] {
        self.custom.as_slice()
    }

    /// Append one `X-` property. Existing entries with the same key stay.
    pub fn add_custom_attribute(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> AlarmResult<&mut Self> {
        self.custom.push(key, value)?;
        Ok(self)
    }

    /// Append several `X-` properties from a map or a list of pairs.
    pub fn extend_custom_attributes<I, K, V>(&mut self, pairs: I) -> AlarmResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.custom.extend(pairs)?;
        Ok(self)
    }

    pub(crate) fn custom(&self) -> &CustomAttributes {
        &self.custom
    }

    // --- export ---

    /// Plain copy of the alarm. The trigger goes through [`Alarm::trigger`],
    /// sign inversion included.
    pub fn to_snapshot(&self) -> AlarmSnapshot {
        AlarmSnapshot {
            alarm_type: self.alarm_type,
            trigger: self.trigger(),
            repeat: self.repeat,
            interval: self.interval,
            attach: self.attach.clone(),
            description: self.description.clone(),
            x: self.custom.as_slice().to_vec(),
        }
    }

    pub fn to_json(&self) -> AlarmResult<serde_json::Value> {
        serde_json::to_value(self.to_snapshot())
            .map_err(|e| AlarmError::Serialization(e.to_string()))
    }
}

/// Serializable copy of an [`Alarm`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmSnapshot {
    #[serde(rename = "type")]
    pub alarm_type: Option<AlarmType>,
    pub trigger: Option<Trigger>,
    pub repeat: Option<u32>,
    pub interval: Option<u32>,
    pub attach: Option<Attachment>,
    pub description: Option<String>,
    pub x: Vec<CustomAttribute>,
}
