//! Trigger normalization.
//!
//! Callers hand in absolute instants, signed durations or raw seconds. They
//! are all folded into one stored form, [`StoredTrigger`]:
//!
//! - absolute instants are kept as they are;
//! - offsets are kept as signed seconds where a negative value means "before
//!   the event starts" and a non-negative value means "after the event ends"
//!   (`RELATED=END`).
//!
//! `trigger(n)` and `trigger_before(n)` store `-n`; `trigger_after(n)` stores
//! `n`. Reading through [`read_trigger`] flips the sign back, so
//! `trigger_after(300)` reads back as `-300`.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AlarmError, AlarmResult};

/// Anything an alarm trigger can be set from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerInput {
    /// Fire at an absolute point in time.
    Instant(DateTime<Utc>),
    /// Signed offset, positive meaning "before".
    Duration(chrono::Duration),
    /// Signed offset in seconds, positive meaning "before".
    Seconds(i64),
}

/// A trigger as seen through the getters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Trigger {
    Instant(DateTime<Utc>),
    Seconds(i64),
}

impl Trigger {
    pub fn as_seconds(&self) -> Option<i64> {
        match self {
            Trigger::Seconds(s) => Some(*s),
            Trigger::Instant(_) => None,
        }
    }

    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Trigger::Instant(dt) => Some(*dt),
            Trigger::Seconds(_) => None,
        }
    }
}

/// Canonical stored trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredTrigger {
    Instant(DateTime<Utc>),
    /// Negative: seconds before start. Zero or positive: seconds after end.
    Offset(i64),
}

impl<Z: TimeZone> From<DateTime<Z>> for TriggerInput {
    fn from(dt: DateTime<Z>) -> Self {
        TriggerInput::Instant(dt.with_timezone(&Utc))
    }
}

impl From<chrono::Duration> for TriggerInput {
    fn from(duration: chrono::Duration) -> Self {
        TriggerInput::Duration(duration)
    }
}

impl From<i64> for TriggerInput {
    fn from(seconds: i64) -> Self {
        TriggerInput::Seconds(seconds)
    }
}

impl From<i32> for TriggerInput {
    fn from(seconds: i32) -> Self {
        TriggerInput::Seconds(seconds.into())
    }
}

impl From<u32> for TriggerInput {
    fn from(seconds: u32) -> Self {
        TriggerInput::Seconds(seconds.into())
    }
}

impl TryFrom<f64> for TriggerInput {
    type Error = AlarmError;

    fn try_from(seconds: f64) -> AlarmResult<Self> {
        if !seconds.is_finite() {
            return Err(AlarmError::Validation(format!(
                "`trigger` must be a finite number of seconds, got {}",
                seconds
            )));
        }
        if seconds.fract() != 0.0 {
            return Err(AlarmError::Validation(format!(
                "`trigger` must be a whole number of seconds, got {}",
                seconds
            )));
        }
        if seconds < i64::MIN as f64 || seconds >= i64::MAX as f64 {
            return Err(AlarmError::Validation(format!(
                "`trigger` is out of range: {}",
                seconds
            )));
        }
        Ok(TriggerInput::Seconds(seconds as i64))
    }
}

/// Normalize input given to `trigger` / `trigger_before`.
pub fn resolve_trigger(input: TriggerInput) -> AlarmResult<StoredTrigger> {
    let stored = match input {
        TriggerInput::Instant(dt) => StoredTrigger::Instant(dt),
        TriggerInput::Duration(d) => StoredTrigger::Offset(negate(d.num_seconds())?),
        TriggerInput::Seconds(s) => StoredTrigger::Offset(negate(s)?),
    };
    log::trace!("Resolved trigger {:?} to {:?}", input, stored);
    Ok(stored)
}

/// Normalize input given to `trigger_after`.
///
/// Offsets are negated first and then go through [`resolve_trigger`], so the
/// stored value ends up positive (after the event ends).
pub fn resolve_trigger_after(input: TriggerInput) -> AlarmResult<StoredTrigger> {
    let before = match input {
        TriggerInput::Instant(dt) => TriggerInput::Instant(dt),
        TriggerInput::Duration(d) => TriggerInput::Seconds(negate(d.num_seconds())?),
        TriggerInput::Seconds(s) => TriggerInput::Seconds(negate(s)?),
    };
    resolve_trigger(before)
}

/// Getter view for `trigger` / `trigger_before`: offsets come back with the
/// stored sign inverted.
pub fn read_trigger(stored: StoredTrigger) -> Trigger {
    match stored {
        StoredTrigger::Instant(dt) => Trigger::Instant(dt),
        StoredTrigger::Offset(s) => Trigger::Seconds(s.saturating_neg()),
    }
}

/// Getter view for `trigger_after`: the stored value as is.
pub fn read_trigger_after(stored: StoredTrigger) -> Trigger {
    match stored {
        StoredTrigger::Instant(dt) => Trigger::Instant(dt),
        StoredTrigger::Offset(s) => Trigger::Seconds(s),
    }
}

fn negate(seconds: i64) -> AlarmResult<i64> {
    seconds
        .checked_neg()
        .ok_or_else(|| AlarmError::Validation(format!("`trigger` is out of range: {}", seconds)))
}
