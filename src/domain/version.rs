use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::pattern::VersionPattern;
use crate::error::{BumpvError, Result};
use crate::template;

/// An immutable parsed version.
///
/// Values are kept as raw strings so leading zeros and non-numeric parts
/// survive a parse/serialize cycle. The pattern is shared with every
/// version derived from it.
#[derive(Debug, Clone)]
pub struct Version {
    pattern: Arc<VersionPattern>,
    values: Vec<Option<String>>,
}

impl Version {
    /// Build a version from values aligned with the pattern's components.
    pub(crate) fn from_parts(pattern: Arc<VersionPattern>, values: Vec<Option<String>>) -> Self {
        Version { pattern, values }
    }

    /// Parse `current_version` with a freshly compiled pattern.
    pub fn from_config<S: AsRef<str>>(
        current_version: &str,
        parse: &str,
        serialize: &[S],
    ) -> Result<Self> {
        let pattern = Arc::new(VersionPattern::new(parse, serialize)?);
        pattern.parse(current_version)
    }

    pub fn pattern(&self) -> &Arc<VersionPattern> {
        &self.pattern
    }

    /// Raw values in declaration order
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Value of a component, `None` when absent or unknown.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pattern
            .position(name)
            .and_then(|i| self.values[i].as_deref())
    }

    /// `(name, value)` pairs in declaration order, absent values included.
    pub fn components(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.pattern
            .components()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Option::as_deref))
    }

    /// Present components as a name → value map
    pub fn to_map(&self) -> HashMap<String, String> {
        self.components()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v.to_string())))
            .collect()
    }

    /// Return a new version with `part` incremented.
    ///
    /// Components declared after `part` are reset to their initial value;
    /// components before it are kept.
    pub fn bump(&self, part: &str) -> Result<Version> {
        let index = self
            .pattern
            .position(part)
            .ok_or_else(|| BumpvError::UnknownPart {
                part: part.to_string(),
                valid: self.pattern.components().to_vec(),
            })?;

        let bumped = self
            .pattern
            .part(part)
            .bump(part, self.values[index].as_deref())?;

        let reset = |omit: bool| -> Vec<Option<String>> {
            self.pattern
                .components()
                .iter()
                .zip(&self.values)
                .enumerate()
                .map(|(i, (name, value))| match i.cmp(&index) {
                    Ordering::Less => value.clone(),
                    Ordering::Equal => Some(bumped.clone()),
                    Ordering::Greater if omit => self.pattern.reset_value(name),
                    Ordering::Greater => Some(self.pattern.initial_value(name)),
                })
                .collect()
        };

        // Dropping omittable components must not produce a string the
        // pattern cannot parse back.
        let values = reset(true);
        let values = if self.pattern.round_trips(&values) {
            values
        } else {
            reset(false)
        };

        Ok(Version::from_parts(Arc::clone(&self.pattern), values))
    }

    /// Serialize with the pattern's first satisfiable template.
    pub fn serialize(&self) -> Result<String> {
        self.pattern.serialize(&self.values)
    }

    /// Render a tag name such as `v{new_version}` for this version.
    ///
    /// The template sees `new_version` plus every present component.
    pub fn get_tag(&self, tag_template: &str) -> Result<String> {
        let mut context = self.to_map();
        context.insert("new_version".to_string(), self.serialize()?);
        template::format(tag_template, &context)
    }

    fn compare_component(&self, name: &str, a: Option<&str>, b: Option<&str>) -> Ordering {
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            (a, b) => return a.is_some().cmp(&b.is_some()),
        };

        let spec = self.pattern.part(name);
        if let (Some(a), Some(b)) = (spec.rank(a), spec.rank(b)) {
            return a.cmp(&b);
        }
        match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => a.cmp(b),
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    /// Precedence compares components in declaration order; numeric values
    /// compare as numbers and listed values by their list position.
    fn cmp(&self, other: &Self) -> Ordering {
        for ((name, a), (_, b)) in self.components().zip(other.components()) {
            match self.compare_component(name, a, b) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }
        self.values.len().cmp(&other.values.len())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.serialize() {
            Ok(s) => f.write_str(&s),
            Err(_) => f
                .debug_map()
                .entries(self.components().filter_map(|(k, v)| v.map(|v| (k, v))))
                .finish(),
        }
    }
}
