use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use owo_colors::OwoColorize;
use valarm_core::config::ValarmConfig;
use valarm_core::ics::DEFAULT_SOUND;
use valarm_core::{Alarm, AlarmType, Attachment, EventContext, EventInfo};

#[derive(Parser, Debug)]
#[command(name = "new")]
pub struct NewArgs {
    /// Alarm type: "display" or "audio"
    #[arg(short = 't', long = "type", default_value = "display")]
    pub alarm_type: String,

    /// Fire this long before the event starts (e.g. "15m", "1h 30m")
    #[arg(short, long, conflicts_with_all = ["after", "at"])]
    pub before: Option<String>,

    /// Fire this long after the event ends
    #[arg(short, long, conflicts_with = "at")]
    pub after: Option<String>,

    /// Fire at an absolute time (RFC 3339, e.g. "2025-03-20T14:45:00Z")
    #[arg(long)]
    pub at: Option<String>,

    /// Number of additional repetitions (needs --interval)
    #[arg(short, long)]
    pub repeat: Option<i64>,

    /// Time between repetitions (e.g. "5m")
    #[arg(short, long)]
    pub interval: Option<String>,

    /// Sound URI for audio alarms
    #[arg(long)]
    pub attach: Option<String>,

    /// MIME type of the attachment
    #[arg(long, requires = "attach")]
    pub mime: Option<String>,

    /// Text shown by display alarms (defaults to the event summary)
    #[arg(short, long)]
    pub description: Option<String>,

    /// Extension property as KEY=VALUE (repeatable)
    #[arg(long = "x", value_name = "KEY=VALUE")]
    pub x: Vec<String>,

    /// Event summary (defaults to the configured summary)
    #[arg(short, long)]
    pub summary: Option<String>,

    /// Event timezone, IANA name (defaults to the configured timezone)
    #[arg(long)]
    pub timezone: Option<String>,
}

pub fn run(args: NewArgs) -> Result<()> {
    let config = ValarmConfig::load()?;
    let alarm = build_alarm(&args, &config)?;

    if alarm.alarm_type() == Some(AlarmType::Audio) && alarm.attach().is_none() {
        eprintln!(
            "{}",
            format!("No --attach given, using default sound \"{}\"", DEFAULT_SOUND).dimmed()
        );
    }

    print!("{}", alarm.to_ics()?);
    Ok(())
}

/// Build the alarm described by the flags, filling event details from config.
fn build_alarm(args: &NewArgs, config: &ValarmConfig) -> Result<Alarm> {
    let mut event = EventInfo::new(
        args.summary
            .clone()
            .unwrap_or_else(|| config.summary.clone()),
    );
    if let Some(tz) = args.timezone.as_deref().or(config.timezone.as_deref()) {
        event = event.with_timezone(tz)?;
    }
    let event: Arc<dyn EventContext> = Arc::new(event);

    let mut alarm = Alarm::new(event);
    alarm.set_alarm_type(Some(args.alarm_type.parse::<AlarmType>()?));

    if let Some(ref before) = args.before {
        alarm.set_trigger_before(parse_duration(before)?)?;
    } else if let Some(ref after) = args.after {
        alarm.set_trigger_after(parse_duration(after)?)?;
    } else if let Some(ref at) = args.at {
        let at = DateTime::parse_from_rfc3339(at)
            .with_context(|| format!("Could not parse date-time: \"{}\"", at))?;
        alarm.set_trigger(at.with_timezone(&Utc))?;
    } else {
        anyhow::bail!("One of --before, --after or --at is required");
    }

    alarm.set_repeat(args.repeat)?;
    if let Some(ref interval) = args.interval {
        alarm.set_interval(Some(parse_duration(interval)?.num_seconds()))?;
    }

    if let Some(ref uri) = args.attach {
        let attach = match args.mime {
            Some(ref mime) => Attachment::with_mime(uri.as_str(), mime.as_str()),
            None => Attachment::new(uri.as_str()),
        };
        alarm.set_attach(attach)?;
    }

    if let Some(ref description) = args.description {
        alarm.set_description(description.as_str());
    }

    let pairs = args
        .x
        .iter()
        .map(|kv| parse_custom_attribute(kv))
        .collect::<Result<Vec<_>>>()?;
    alarm.extend_custom_attributes(pairs)?;

    Ok(alarm)
}

/// Parse a human duration like "15m" or "1h 30m".
fn parse_duration(input: &str) -> Result<Duration> {
    let std_dur = humantime::parse_duration(input)
        .map_err(|e| anyhow::anyhow!("Could not parse duration \"{}\": {}", input, e))?;
    Duration::from_std(std_dur).context("Duration too large")
}

fn parse_custom_attribute(input: &str) -> Result<(&str, &str)> {
    input
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Expected KEY=VALUE, got \"{}\"", input))
}
