//! Extension (`X-`) properties attached to an alarm.
//!
//! Pairs are kept in insertion order and never deduplicated: two unrelated
//! callers may both append the same key and both lines are emitted.

use serde::{Deserialize, Serialize};

use crate::error::{AlarmError, AlarmResult};

const X_PREFIX: &str = "X-";

/// A single extension property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttribute {
    /// Normalized property name, always uppercase and starting with `X-`.
    pub key: String,
    pub value: String,
}

/// Ordered list of extension properties. Duplicate keys are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomAttributes {
    entries: Vec<CustomAttribute>,
}

impl CustomAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CustomAttribute> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[CustomAttribute] {
        &self.entries
    }

    /// Append one pair.
    pub fn push(&mut self, key: &str, value: impl Into<String>) -> AlarmResult<()> {
        let key = normalize_key(key)?;
        self.entries.push(CustomAttribute {
            key,
            value: value.into(),
        });
        Ok(())
    }

    /// Append several pairs. Either all of them are appended or none.
    pub fn extend<I, K, V>(&mut self, pairs: I) -> AlarmResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let staged = pairs
            .into_iter()
            .map(|(key, value)| {
                Ok(CustomAttribute {
                    key: normalize_key(key.as_ref())?,
                    value: value.into(),
                })
            })
            .collect::<AlarmResult<Vec<_>>>()?;

        self.entries.extend(staged);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CustomAttributes {
    type Item = &'a CustomAttribute;
    type IntoIter = std::slice::Iter<'a, CustomAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Uppercase the key and make sure it carries the `X-` prefix.
fn normalize_key(key: &str) -> AlarmResult<String> {
    let upper = key.trim().to_ascii_uppercase();
    let name = upper.strip_prefix(X_PREFIX).unwrap_or(upper.as_str());

    if name.is_empty() {
        return Err(AlarmError::Validation(format!(
            "Custom attribute key '{}' is empty",
            key
        )));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(AlarmError::Validation(format!(
            "Custom attribute key '{}' may only contain letters, digits and '-'",
            key
        )));
    }

    Ok(format!("{}{}", X_PREFIX, name))
}
