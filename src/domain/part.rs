use serde::{Deserialize, Serialize};

use crate::error::{BumpvError, Result};

/// Bump and reset rules for one version component.
///
/// A part without `values` is numeric. A part with `values` cycles through
/// that list in order and cannot be bumped past its last entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PartSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_value: Option<String>,

    /// Value that counts as absent when choosing a serialize template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_value: Option<String>,
}

impl PartSpec {
    /// Numeric part with an explicit starting value
    pub fn numeric(first_value: impl Into<String>) -> Self {
        PartSpec {
            first_value: Some(first_value.into()),
            ..Default::default()
        }
    }

    /// Part restricted to an ordered list of values
    pub fn with_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PartSpec {
            values: values.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Builder-style setter for the optional value
    pub fn optional(mut self, value: impl Into<String>) -> Self {
        self.optional_value = Some(value.into());
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.values.is_empty()
    }

    /// The value a part takes when a higher-order part is bumped.
    ///
    /// Resolution order: `first_value`, `optional_value`, the first entry of
    /// `values`, then `"0"`.
    pub fn initial_value(&self) -> &str {
        self.first_value
            .as_deref()
            .or(self.optional_value.as_deref())
            .or(self.values.first().map(String::as_str))
            .unwrap_or("0")
    }

    /// Whether `value` counts as present for serialization.
    pub fn is_present(&self, value: Option<&str>) -> bool {
        match value {
            Some(value) => self.optional_value.as_deref() != Some(value),
            None => false,
        }
    }

    /// Compute the successor of `current` for the part called `name`.
    ///
    /// An absent current value bumps from the initial value.
    pub fn bump(&self, name: &str, current: Option<&str>) -> Result<String> {
        let current = current.unwrap_or_else(|| self.initial_value());
        if self.is_numeric() {
            increment_numeric(name, current)
        } else {
            self.next_value(name, current)
        }
    }

    fn next_value(&self, name: &str, current: &str) -> Result<String> {
        let index = self
            .values
            .iter()
            .position(|v| v == current)
            .ok_or_else(|| BumpvError::NonNumericPart {
                part: name.to_string(),
                value: current.to_string(),
            })?;

        self.values
            .get(index + 1)
            .cloned()
            .ok_or_else(|| BumpvError::PartExhausted {
                part: name.to_string(),
                value: current.to_string(),
                values: self.values.clone(),
            })
    }

    /// Position of `value` in `values`, used for ordering non-numeric parts.
    pub fn rank(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }
}

/// Add one to a decimal value, keeping zero-padding width.
fn increment_numeric(name: &str, value: &str) -> Result<String> {
    let non_numeric = || BumpvError::NonNumericPart {
        part: name.to_string(),
        value: value.to_string(),
    };

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(non_numeric());
    }

    let number: u64 = value.parse().map_err(|_| non_numeric())?;
    let bumped = number.checked_add(1).ok_or_else(non_numeric)?;

    if value.len() > 1 && value.starts_with('0') {
        Ok(format!("{:0width$}", bumped, width = value.len()))
    } else {
        Ok(bumped.to_string())
    }
}
