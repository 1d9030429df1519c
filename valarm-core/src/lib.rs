//! VALARM generation for calendar events.
//!
//! This crate turns a mutable reminder description into an RFC 5545 VALARM
//! block:
//! - `Alarm` and its validated accessors, including trigger normalization
//! - `ics` module for rendering alarms and the value formatters it uses
//! - `AlarmDocument` for loading an event with its alarms from TOML or JSON

pub mod alarm;
pub mod config;
pub mod custom;
pub mod document;
pub mod error;
pub mod event;
pub mod ics;

pub use alarm::{Alarm, AlarmData, AlarmSnapshot, AlarmType, Attachment, Trigger, TriggerInput};
pub use custom::CustomAttribute;
pub use document::AlarmDocument;
pub use error::{AlarmError, AlarmResult};
pub use event::{EventContext, EventInfo};
