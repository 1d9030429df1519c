//! Data-driven alarm construction.
//!
//! [`AlarmData`] is the loose, deserializable shape of an alarm as it shows
//! up in documents. Applying it runs every field through the same setter a
//! caller would use, in a fixed order, and stops at the first failure.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Alarm, AlarmType, Attachment, TriggerInput};
use crate::custom::CustomAttribute;
use crate::error::{AlarmError, AlarmResult};

/// Every field is optional; unset fields leave the alarm untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlarmData {
    #[serde(default, rename = "type")]
    pub alarm_type: Option<String>,
    #[serde(default)]
    pub trigger: Option<TriggerData>,
    #[serde(default)]
    pub trigger_before: Option<TriggerData>,
    #[serde(default)]
    pub trigger_after: Option<TriggerData>,
    #[serde(default)]
    pub repeat: Option<i64>,
    #[serde(default)]
    pub interval: Option<IntervalData>,
    #[serde(default)]
    pub attach: Option<AttachData>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub x: Option<CustomAttributesData>,
}

/// Trigger as written in a document: seconds (whole, possibly written as a
/// float), a TOML date-time, an RFC 3339 instant, or an ISO-8601 duration
/// such as `PT15M` / `-PT5M`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerData {
    Seconds(i64),
    Float(f64),
    Datetime(toml::value::Datetime),
    Text(String),
}

/// Interval as seconds or an ISO-8601 duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntervalData {
    Seconds(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttachData {
    Uri(String),
    Object {
        uri: String,
        #[serde(default)]
        mime: Option<String>,
    },
}

/// Custom attributes as a list of pairs or as a table (applied in key order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomAttributesData {
    List(Vec<CustomAttribute>),
    Map(BTreeMap<String, String>),
}

impl AlarmData {
    pub fn apply_to(self, alarm: &mut Alarm) -> AlarmResult<()> {
        if let Some(t) = self.alarm_type {
            alarm.set_alarm_type(Some(t.parse::<AlarmType>()?));
        }
        if let Some(t) = self.trigger {
            alarm.set_trigger(t.into_input()?)?;
        }
        if let Some(t) = self.trigger_before {
            alarm.set_trigger_before(t.into_input()?)?;
        }
        if let Some(t) = self.trigger_after {
            alarm.set_trigger_after(t.into_input()?)?;
        }
        if let Some(n) = self.repeat {
            alarm.set_repeat(Some(n))?;
        }
        if let Some(i) = self.interval {
            alarm.set_interval(Some(i.into_seconds()?))?;
        }
        if let Some(a) = self.attach {
            alarm.set_attach(Attachment::from(a))?;
        }
        if let Some(d) = self.description {
            alarm.set_description(d);
        }
        match self.x {
            Some(CustomAttributesData::List(list)) => {
                alarm.extend_custom_attributes(list.into_iter().map(|a| (a.key, a.value)))?;
            }
            Some(CustomAttributesData::Map(map)) => {
                alarm.extend_custom_attributes(map)?;
            }
            None => {}
        }
        Ok(())
    }
}

impl TriggerData {
    pub fn into_input(self) -> AlarmResult<TriggerInput> {
        match self {
            TriggerData::Seconds(s) => Ok(TriggerInput::Seconds(s)),
            TriggerData::Float(f) => TriggerInput::try_from(f),
            TriggerData::Datetime(dt) => {
                let text = dt.to_string();
                DateTime::parse_from_rfc3339(&text)
                    .map(|dt| TriggerInput::Instant(dt.with_timezone(&Utc)))
                    .map_err(|_| {
                        AlarmError::Validation(format!(
                            "`trigger` date-time '{}' needs a date, a time and an offset",
                            text
                        ))
                    })
            }
            TriggerData::Text(text) => {
                if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
                    return Ok(TriggerInput::Instant(dt.with_timezone(&Utc)));
                }
                parse_signed_duration(&text)
                    .map(TriggerInput::Seconds)
                    .ok_or_else(|| {
                        AlarmError::Validation(format!(
                            "`trigger` '{}' is neither an RFC 3339 date-time \
                             nor an ISO-8601 duration",
                            text
                        ))
                    })
            }
        }
    }
}

impl IntervalData {
    pub fn into_seconds(self) -> AlarmResult<i64> {
        match self {
            IntervalData::Seconds(s) => Ok(s),
            IntervalData::Text(text) => parse_signed_duration(&text).ok_or_else(|| {
                AlarmError::Validation(format!(
                    "`interval` '{}' is not an ISO-8601 duration",
                    text
                ))
            }),
        }
    }
}

impl From<AttachData> for Attachment {
    fn from(data: AttachData) -> Self {
        match data {
            AttachData::Uri(uri) => Attachment::new(uri),
            AttachData::Object { uri, mime } => Attachment { uri, mime },
        }
    }
}

/// Parse `[+-]P...` into signed seconds.
fn parse_signed_duration(text: &str) -> Option<i64> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let duration = iso8601::duration(rest).ok()?;
    let std_duration: std::time::Duration = duration.into();
    let seconds = i64::try_from(std_duration.as_secs()).ok()?;

    Some(if negative { -seconds } else { seconds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::Trigger;
    use crate::event::EventInfo;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn build(data: AlarmData) -> AlarmResult<Alarm> {
        Alarm::from_data(data, Arc::new(EventInfo::new("Dentist")))
    }

    #[test]
    fn test_parse_signed_duration() {
        assert_eq!(parse_signed_duration("PT15M"), Some(900));
        assert_eq!(parse_signed_duration("-PT5M"), Some(-300));
        assert_eq!(parse_signed_duration("P1DT1H"), Some(90_000));
        assert_eq!(parse_signed_duration("soon"), None);
    }

    #[test]
    fn test_apply_full_data() {
        let data: AlarmData = toml::from_str(
            r#"
            type = "audio"
            trigger_before = "PT15M"
            repeat = 2
            interval = "PT5M"
            attach = { uri = "http://x/y.mp3", mime = "audio/mpeg" }
            x = [{ key = "KEY", value = "A" }]
            "#,
        )
        .unwrap();

        let alarm = build(data).unwrap();
        assert_eq!(alarm.alarm_type(), Some(AlarmType::Audio));
        assert_eq!(alarm.trigger(), Some(Trigger::Seconds(900)));
        assert_eq!(alarm.repeat(), Some(2));
        assert_eq!(alarm.interval(), Some(300));
        assert_eq!(alarm.attach().unwrap().mime.as_deref(), Some("audio/mpeg"));
        assert_eq!(alarm.custom_attributes()[0].key, "X-KEY");
    }

    #[test]
    fn test_apply_trigger_after_and_instant() {
        let alarm = build(AlarmData {
            trigger_after: Some(TriggerData::Seconds(300)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(alarm.trigger(), Some(Trigger::Seconds(-300)));

        let alarm = build(AlarmData {
            trigger: Some(TriggerData::Text("2025-03-20T15:00:00+01:00".into())),
            ..Default::default()
        })
        .unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 3, 20, 14, 0, 0).unwrap();
        assert_eq!(alarm.trigger(), Some(Trigger::Instant(expected)));
    }

    #[test]
    fn test_apply_unquoted_toml_datetime() {
        let data: AlarmData = toml::from_str("trigger = 2025-03-20T14:45:00Z").unwrap();
        assert!(
            matches!(data.trigger, Some(TriggerData::Datetime(_))),
            "Got {:?}",
            data.trigger
        );

        let alarm = build(data).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 3, 20, 14, 45, 0).unwrap();
        assert_eq!(alarm.trigger(), Some(Trigger::Instant(expected)));
    }

    #[test]
    fn test_apply_toml_datetime_without_offset_is_rejected() {
        let data: AlarmData = toml::from_str("trigger = 2025-03-20T14:45:00").unwrap();
        assert!(matches!(build(data).unwrap_err(), AlarmError::Validation(_)));
    }

    #[test]
    fn test_apply_float_seconds() {
        let data: AlarmData = serde_json::from_str(r#"{"trigger_after": 90.0}"#).unwrap();
        let alarm = build(data).unwrap();
        assert_eq!(alarm.trigger_after(), Some(Trigger::Seconds(90)));

        let data: AlarmData = serde_json::from_str(r#"{"trigger": 1.5}"#).unwrap();
        assert!(
            matches!(data.trigger, Some(TriggerData::Float(_))),
            "Got {:?}",
            data.trigger
        );
        assert!(matches!(build(data).unwrap_err(), AlarmError::Validation(_)));
    }

    #[test]
    fn test_apply_custom_attribute_table() {
        let data: AlarmData = toml::from_str("[x]\nB = \"2\"\nA = \"1\"").unwrap();
        let alarm = build(data).unwrap();
        let keys: Vec<_> = alarm.custom_attributes().iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["X-A", "X-B"]);
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let bad_type = AlarmData {
            alarm_type: Some("email".into()),
            ..Default::default()
        };
        assert!(matches!(build(bad_type).unwrap_err(), AlarmError::Validation(_)));

        let bad_trigger = AlarmData {
            trigger: Some(TriggerData::Text("tomorrow-ish".into())),
            ..Default::default()
        };
        assert!(matches!(build(bad_trigger).unwrap_err(), AlarmError::Validation(_)));

        let empty_uri = AlarmData {
            attach: Some(AttachData::Object {
                uri: String::new(),
                mime: None,
            }),
            ..Default::default()
        };
        assert!(matches!(build(empty_uri).unwrap_err(), AlarmError::Validation(_)));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let parsed: Result<AlarmData, _> = toml::from_str("sound = \"Basso\"");
        assert!(parsed.is_err());
    }
}
