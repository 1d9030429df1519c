//! Value formatting for ICS property lines.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Escape a TEXT value: backslash, semicolon, comma and double quote get a
/// leading backslash, line breaks become a literal `\n`.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' | ';' | ',' | '"' => {
                out.push('\\');
                out.push(c);
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }

    out
}

/// Format an instant as an ICS DATE-TIME.
///
/// With a timezone the local wall time is written without suffix; without one
/// the instant is written in UTC with a trailing `Z`.
pub fn format_date_time(timezone: Option<Tz>, instant: &DateTime<Utc>) -> String {
    match timezone {
        Some(tz) => instant
            .with_timezone(&tz)
            .format("%Y%m%dT%H%M%S")
            .to_string(),
        None => instant.format("%Y%m%dT%H%M%SZ").to_string(),
    }
}

/// Format a signed number of seconds as an ISO-8601 duration.
///
/// Hours are never folded into days, zero components are left out and a zero
/// duration is written as `P0D`.
pub fn format_duration(seconds: i64) -> String {
    if seconds == 0 {
        return "P0D".to_string();
    }

    let abs = seconds.unsigned_abs();
    let hours = abs / 3600;
    let minutes = (abs % 3600) / 60;
    let secs = abs % 60;

    let mut out = String::new();
    if seconds < 0 {
        out.push('-');
    }
    out.push_str("PT");
    if hours > 0 {
        out.push_str(&format!("{}H", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}M", minutes));
    }
    if secs > 0 {
        out.push_str(&format!("{}S", secs));
    }

    out
}
