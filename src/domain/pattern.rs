use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use regex::Regex;

use crate::domain::part::PartSpec;
use crate::domain::version::Version;
use crate::error::{BumpvError, Result};
use crate::template::Template;

/// Default parse pattern: `major.minor.patch`
pub const DEFAULT_PARSE: &str = r"(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)";

/// Default serialize template
pub const DEFAULT_SERIALIZE: &str = "{major}.{minor}.{patch}";

/// A compiled parse pattern plus its serialize templates.
///
/// Component order is the order named groups appear in the parse pattern.
/// Construction fails unless at least one template can be satisfied when
/// every component is present.
#[derive(Debug, Clone)]
pub struct VersionPattern {
    source: String,
    regex: Regex,
    components: Vec<String>,
    serialize: Vec<Template>,
    parts: BTreeMap<String, PartSpec>,
}

impl VersionPattern {
    /// Compile a pattern with default rules for every part.
    pub fn new<S: AsRef<str>>(parse: &str, serialize: &[S]) -> Result<Self> {
        Self::with_parts(parse, serialize, BTreeMap::new())
    }

    /// Compile a pattern with per-part rules.
    ///
    /// Entries in `parts` naming no capture group are ignored.
    pub fn with_parts<S: AsRef<str>>(
        parse: &str,
        serialize: &[S],
        parts: BTreeMap<String, PartSpec>,
    ) -> Result<Self> {
        let invalid = |reason: String| BumpvError::InvalidPattern {
            pattern: parse.to_string(),
            reason,
        };

        let regex = Regex::new(&format!("^(?:{})$", parse)).map_err(|e| invalid(e.to_string()))?;
        let components: Vec<String> = regex.capture_names().flatten().map(String::from).collect();
        if components.is_empty() {
            return Err(invalid("pattern has no named groups".to_string()));
        }

        if serialize.is_empty() {
            return Err(BumpvError::config("at least one serialize template is required"));
        }
        let serialize = serialize
            .iter()
            .map(|s| Template::parse(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let pattern = VersionPattern {
            source: parse.to_string(),
            regex,
            components,
            serialize,
            parts,
        };

        if !pattern
            .serialize
            .iter()
            .any(|t| t.is_satisfied_by(|name| pattern.has_component(name)))
        {
            return Err(pattern.serialize_error(&pattern.components));
        }

        Ok(pattern)
    }

    /// The parse pattern as configured (without anchoring)
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Component names in declaration order
    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.components.iter().any(|c| c == name)
    }

    /// Position of a component in declaration order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|c| c == name)
    }

    pub fn serialize_templates(&self) -> &[Template] {
        &self.serialize
    }

    /// Rules for a component, defaulting to a plain numeric part.
    pub fn part(&self, name: &str) -> PartSpec {
        self.parts.get(name).cloned().unwrap_or_default()
    }

    pub fn parts(&self) -> &BTreeMap<String, PartSpec> {
        &self.parts
    }

    /// The value a component takes when reset.
    pub fn initial_value(&self, name: &str) -> String {
        self.part(name).initial_value().to_string()
    }

    /// The value a component takes when a higher-order component is bumped.
    ///
    /// A component with no configured rules that some serialize template
    /// leaves out resets to absent. Everything else resets to its initial
    /// value.
    pub fn reset_value(&self, name: &str) -> Option<String> {
        if !self.parts.contains_key(name) && self.is_omittable(name) {
            return None;
        }
        Some(self.initial_value(name))
    }

    /// Whether at least one serialize template does not reference `name`.
    pub fn is_omittable(&self, name: &str) -> bool {
        self.serialize
            .iter()
            .any(|t| t.placeholders().all(|p| p != name))
    }

    /// Whether `values` serialize to a string this pattern parses again.
    pub fn round_trips(&self, values: &[Option<String>]) -> bool {
        self.serialize(values)
            .map(|s| self.regex.is_match(&s))
            .unwrap_or(false)
    }

    /// Parse `raw` into a [`Version`] backed by this pattern.
    ///
    /// Unmatched optional groups stay absent. The result must be
    /// serializable by at least one template.
    pub fn parse(self: &Arc<Self>, raw: &str) -> Result<Version> {
        let parse_error = || BumpvError::Parse {
            version: raw.to_string(),
            pattern: self.source.clone(),
        };

        let captures = self.regex.captures(raw).ok_or_else(parse_error)?;
        let values: Vec<Option<String>> = self
            .components
            .iter()
            .map(|name| captures.name(name).map(|m| m.as_str().to_string()))
            .collect();

        let version = Version::from_parts(Arc::clone(self), values);
        if self.select_template(version.values()).is_none() {
            return Err(parse_error());
        }
        Ok(version)
    }

    /// Serialize component values with the first satisfiable template.
    ///
    /// `values` is aligned with [`components`](Self::components).
    pub fn serialize(&self, values: &[Option<String>]) -> Result<String> {
        let template = self.select_template(values).ok_or_else(|| {
            let available: Vec<String> = self
                .components
                .iter()
                .zip(values)
                .filter(|(name, value)| self.part(name).is_present(value.as_deref()))
                .map(|(name, _)| name.clone())
                .collect();
            self.serialize_error(&available)
        })?;

        template.render(&self.context(values))
    }

    /// Serialize component values from another pattern by name.
    ///
    /// Used when a file uses its own serialize templates for the global
    /// version's components.
    pub fn serialize_named(&self, named: &HashMap<String, String>) -> Result<String> {
        let values: Vec<Option<String>> = self
            .components
            .iter()
            .map(|name| named.get(name).cloned())
            .collect();
        self.serialize(&values)
    }

    fn select_template(&self, values: &[Option<String>]) -> Option<&Template> {
        let present = |name: &str| {
            self.position(name)
                .and_then(|i| values.get(i))
                .is_some_and(|value| self.part(name).is_present(value.as_deref()))
        };
        self.serialize.iter().find(|t| t.is_satisfied_by(present))
    }

    fn context(&self, values: &[Option<String>]) -> HashMap<String, String> {
        self.components
            .iter()
            .zip(values)
            .filter_map(|(name, value)| value.clone().map(|v| (name.clone(), v)))
            .collect()
    }

    fn serialize_error(&self, available: &[String]) -> BumpvError {
        BumpvError::Serialize {
            templates: self.serialize.iter().map(|t| t.as_str().to_string()).collect(),
            available: available.to_vec(),
        }
    }
}
