//! ICS text generation for VALARM components (RFC 5545 §3.6.6).

mod format;
mod generate;

pub use format::{escape_text, format_date_time, format_duration};
pub use generate::{DEFAULT_SOUND, generate_valarm};
