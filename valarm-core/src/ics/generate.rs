//! VALARM generation.

use crate::alarm::{Alarm, AlarmType, StoredTrigger};
use crate::error::{AlarmError, AlarmResult};
use crate::ics::format::{escape_text, format_date_time, format_duration};

/// ATTACH value used by audio alarms that carry no attachment of their own.
pub const DEFAULT_SOUND: &str = "Basso";

const CRLF: &str = "\r\n";

/// Render an alarm as a `BEGIN:VALARM` ... `END:VALARM` block.
///
/// Every line ends with CRLF. Lines are not folded. Either the whole block is
/// returned or an error; nothing partial is produced.
pub fn generate_valarm(alarm: &Alarm) -> AlarmResult<String> {
    let alarm_type = alarm.alarm_type().ok_or_else(|| {
        AlarmError::SerializationPrecondition("No value for `type` in alarm given".into())
    })?;
    let trigger = alarm.stored_trigger().ok_or_else(|| {
        AlarmError::SerializationPrecondition("No value for `trigger` in alarm given".into())
    })?;

    let mut lines: Vec<String> = Vec::new();

    // ACTION
    lines.push(format!("ACTION:{}", alarm_type.as_ics_str()));

    // TRIGGER
    match trigger {
        StoredTrigger::Instant(at) => {
            let value = format_date_time(alarm.event().timezone(), &at);
            lines.push(format!("TRIGGER;VALUE=DATE-TIME:{}", value));
        }
        StoredTrigger::Offset(seconds) if seconds >= 0 => {
            lines.push(format!("TRIGGER;RELATED=END:{}", format_duration(seconds)));
        }
        StoredTrigger::Offset(seconds) => {
            lines.push(format!("TRIGGER:{}", format_duration(seconds)));
        }
    }

    // REPEAT and DURATION only make sense together
    if alarm.repeat().is_some() && alarm.interval().is_none() {
        return Err(AlarmError::SerializationPrecondition(
            "No value for `interval` in alarm given, but required for `repeat`".into(),
        ));
    }
    if let Some(repeat) = alarm.repeat() {
        lines.push(format!("REPEAT:{}", repeat));
    }

    if alarm.interval().is_some() && alarm.repeat().is_none() {
        return Err(AlarmError::SerializationPrecondition(
            "No value for `repeat` in alarm given, but required for `interval`".into(),
        ));
    }
    if let Some(interval) = alarm.interval() {
        lines.push(format!("DURATION:{}", format_duration(i64::from(interval))));
    }

    // ATTACH (audio only)
    if alarm_type == AlarmType::Audio {
        match alarm.attach() {
            Some(attach) => match attach.mime.as_deref() {
                Some(mime) => lines.push(format!("ATTACH;FMTTYPE={}:{}", mime, attach.uri)),
                None => lines.push(format!("ATTACH;VALUE=URI:{}", attach.uri)),
            },
            None => lines.push(format!("ATTACH;VALUE=URI:{}", DEFAULT_SOUND)),
        }
    }

    // DESCRIPTION (display only), falling back to the event summary
    if alarm_type == AlarmType::Display {
        let text = alarm.description().unwrap_or_else(|| alarm.event().summary());
        lines.push(format!("DESCRIPTION:{}", escape_text(text)));
    }

    // X- properties, in insertion order
    for attr in alarm.custom() {
        lines.push(format!("{}:{}", attr.key, escape_text(&attr.value)));
    }

    let mut output = String::from("BEGIN:VALARM");
    output.push_str(CRLF);
    for line in &lines {
        output.push_str(line);
        output.push_str(CRLF);
    }
    output.push_str("END:VALARM");
    output.push_str(CRLF);

    log::debug!(
        "Rendered {} alarm for '{}' ({} properties)",
        alarm_type,
        alarm.event().summary(),
        lines.len()
    );

    Ok(output)
}

impl Alarm {
    /// Render this alarm as a VALARM block. See [`generate_valarm`].
    pub fn to_ics(&self) -> AlarmResult<String> {
        generate_valarm(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::Attachment;
    use crate::event::EventInfo;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn make_alarm(alarm_type: AlarmType) -> Alarm {
        let event = EventInfo::new("Team Sync; weekly, room \"B\"");
        let mut alarm = Alarm::new(Arc::new(event));
        alarm.set_alarm_type(Some(alarm_type));
        alarm.set_trigger(600).unwrap();
        alarm
    }

    #[test]
    fn test_generate_display_alarm_exact_output() {
        let mut alarm = make_alarm(AlarmType::Display);
        alarm.set_description("Leave now");

        let ics = alarm.to_ics().unwrap();
        assert_eq!(
            ics,
            concat!(
                "BEGIN:VALARM\r\n",
                "ACTION:DISPLAY\r\n",
                "TRIGGER:-PT10M\r\n",
                "DESCRIPTION:Leave now\r\n",
                "END:VALARM\r\n",
            )
        );
    }

    #[test]
    fn test_generate_requires_type_and_trigger() {
        let mut alarm = Alarm::new(Arc::new(EventInfo::new("x")));
        let err = alarm.to_ics().unwrap_err();
        assert!(matches!(err, AlarmError::SerializationPrecondition(_)));

        alarm.set_alarm_type(Some(AlarmType::Display));
        let err = alarm.to_ics().unwrap_err();
        assert!(
            matches!(err, AlarmError::SerializationPrecondition(ref m) if m.contains("trigger")),
            "Got {:?}",
            err
        );

        alarm.clear_trigger().set_alarm_type(None);
        alarm.set_trigger(60).unwrap();
        assert!(alarm.to_ics().is_err());
    }

    #[test]
    fn test_generate_trigger_after_end() {
        let mut alarm = make_alarm(AlarmType::Display);
        alarm.set_trigger_after(300).unwrap();

        let ics = alarm.to_ics().unwrap();
        assert!(
            ics.contains("TRIGGER;RELATED=END:PT5M\r\n"),
            "Should trigger relative to end. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn test_generate_trigger_absolute_uses_event_timezone() {
        let at = Utc.with_ymd_and_hms(2025, 3, 20, 14, 45, 0).unwrap();

        let mut alarm = make_alarm(AlarmType::Display);
        alarm.set_trigger(at).unwrap();
        assert!(alarm.to_ics().unwrap().contains("TRIGGER;VALUE=DATE-TIME:20250320T144500Z\r\n"));

        let event = EventInfo::new("Standup").with_tz(chrono_tz::Europe::Berlin);
        let mut alarm = Alarm::new(Arc::new(event));
        alarm.set_alarm_type(Some(AlarmType::Display));
        alarm.set_trigger(at).unwrap();
        assert!(alarm.to_ics().unwrap().contains("TRIGGER;VALUE=DATE-TIME:20250320T154500\r\n"));
    }

    #[test]
    fn test_generate_repeat_needs_interval() {
        let mut alarm = make_alarm(AlarmType::Display);
        alarm.set_repeat(Some(3)).unwrap();

        let err = alarm.to_ics().unwrap_err();
        assert!(
            matches!(err, AlarmError::SerializationPrecondition(ref m) if m.contains("interval")),
            "Got {:?}",
            err
        );

        alarm.set_interval(Some(60)).unwrap();
        let ics = alarm.to_ics().unwrap();
        assert!(
            ics.contains("REPEAT:3\r\nDURATION:PT1M\r\n"),
            "REPEAT should be followed by DURATION. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn test_generate_interval_needs_repeat() {
        let mut alarm = make_alarm(AlarmType::Display);
        alarm.set_interval(Some(60)).unwrap();

        let err = alarm.to_ics().unwrap_err();
        assert!(
            matches!(err, AlarmError::SerializationPrecondition(ref m) if m.contains("repeat")),
            "Got {:?}",
            err
        );
    }

    #[test]
    fn test_generate_audio_attachment_forms() {
        let mut alarm = make_alarm(AlarmType::Audio);
        assert!(alarm.to_ics().unwrap().contains("ATTACH;VALUE=URI:Basso\r\n"));

        alarm.set_attach("http://x/y.mp3").unwrap();
        assert!(alarm.to_ics().unwrap().contains("ATTACH;VALUE=URI:http://x/y.mp3\r\n"));

        alarm
            .set_attach(Attachment::with_mime("http://x/y.mp3", "audio/mpeg"))
            .unwrap();
        let ics = alarm.to_ics().unwrap();
        assert!(ics.contains("ATTACH;FMTTYPE=audio/mpeg:http://x/y.mp3\r\n"));
        assert!(!ics.contains("VALUE=URI"));
        assert!(!ics.contains("DESCRIPTION"), "Audio alarms carry no DESCRIPTION");
    }

    #[test]
    fn test_generate_display_falls_back_to_escaped_summary() {
        let mut alarm = make_alarm(AlarmType::Display);
        alarm.set_attach("http://x/y.mp3").unwrap();

        let ics = alarm.to_ics().unwrap();
        assert!(
            ics.contains(concat!(r#"DESCRIPTION:Team Sync\; weekly\, room \"B\""#, "\r\n")),
            "Should use escaped event summary. ICS:\n{}",
            ics
        );
        assert!(!ics.contains("ATTACH"), "Display alarms carry no ATTACH");
    }

    #[test]
    fn test_generate_custom_attributes_in_call_order() {
        let mut alarm = make_alarm(AlarmType::Display);
        alarm.add_custom_attribute("KEY", "A").unwrap();
        alarm.add_custom_attribute("KEY", "B,C").unwrap();

        let ics = alarm.to_ics().unwrap();
        assert!(
            ics.contains("X-KEY:A\r\nX-KEY:B\\,C\r\nEND:VALARM\r\n"),
            "Custom attributes should close the block in call order. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn test_generate_full_line_order() {
        let mut alarm = make_alarm(AlarmType::Audio);
        alarm.set_repeat(Some(2)).unwrap();
        alarm.set_interval(Some(300)).unwrap();
        alarm.set_attach("Glass").unwrap();
        alarm.add_custom_attribute("X-APPLE-DEFAULT-ALARM", "TRUE").unwrap();

        let ics = alarm.to_ics().unwrap();
        let names: Vec<&str> = ics
            .split("\r\n")
            .filter(|l| !l.is_empty())
            .map(|l| l.split([':', ';']).next().unwrap_or(""))
            .collect();
        assert_eq!(
            names,
            vec![
                "BEGIN",
                "ACTION",
                "TRIGGER",
                "REPEAT",
                "DURATION",
                "ATTACH",
                "X-APPLE-DEFAULT-ALARM",
                "END"
            ]
        );
    }
}
