//! `{placeholder}` substitution used for serialize, search, replace, tag and
//! commit message templates.
//!
//! Placeholders are identifiers wrapped in braces (`{major}`,
//! `{new_version}`). Literal braces are written doubled (`{{` and `}}`).

use std::collections::HashMap;

use crate::error::{BumpvError, Result};

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed format template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template, rejecting unbalanced braces and malformed names.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(BumpvError::template(source, "unterminated '{'"));
                    }
                    if !is_identifier(&name) {
                        return Err(BumpvError::template(
                            source,
                            format!("invalid placeholder name '{}'", name),
                        ));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => {
                    return Err(BumpvError::template(source, "unmatched '}'"));
                }
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template {
            source: source.to_string(),
            segments,
        })
    }

    /// The original template text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names referenced by this template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether every placeholder is answered by `is_present`.
    pub fn is_satisfied_by(&self, is_present: impl Fn(&str) -> bool) -> bool {
        self.placeholders().all(is_present)
    }

    /// Substitute placeholders from `context`.
    ///
    /// Fails with a template error naming the first placeholder missing
    /// from `context`.
    pub fn render<V: AsRef<str>>(&self, context: &HashMap<String, V>) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = context.get(name).ok_or_else(|| {
                        BumpvError::template(
                            &self.source,
                            format!("no value for placeholder '{}'", name),
                        )
                    })?;
                    out.push_str(value.as_ref());
                }
            }
        }
        Ok(out)
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse and render in one step.
pub fn format<V: AsRef<str>>(template: &str, context: &HashMap<String, V>) -> Result<String> {
    Template::parse(template)?.render(context)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_placeholders() {
        let ctx = context(&[("major", "1"), ("minor", "2"), ("patch", "3")]);
        assert_eq!(format("{major}.{minor}.{patch}", &ctx).unwrap(), "1.2.3");
    }

    #[test]
    fn test_render_with_prefix() {
        let ctx = context(&[("new_version", "2.0.0")]);
        assert_eq!(format("v{new_version}", &ctx).unwrap(), "v2.0.0");
    }

    #[test]
    fn test_escaped_braces() {
        let ctx = context(&[("v", "1")]);
        assert_eq!(format("{{v}} = {v}", &ctx).unwrap(), "{v} = 1");
    }

    #[test]
    fn test_missing_placeholder_is_reported() {
        let ctx = context(&[("major", "1")]);
        let err = format("{major}.{minor}", &ctx).unwrap_err();
        assert!(err.to_string().contains("minor"));
        assert!(err.to_string().contains("{major}.{minor}"));
    }

    #[test]
    fn test_unbalanced_braces_rejected() {
        assert!(Template::parse("{major").is_err());
        assert!(Template::parse("major}").is_err());
        assert!(Template::parse("{ma-jor}").is_err());
        assert!(Template::parse("{}").is_err());
    }

    #[test]
    fn test_placeholders_in_order() {
        let template = Template::parse("{major}.{minor}-{label}").unwrap();
        let names: Vec<&str> = template.placeholders().collect();
        assert_eq!(names, vec!["major", "minor", "label"]);
    }

    #[test]
    fn test_is_satisfied_by() {
        let template = Template::parse("{major}.{minor}").unwrap();
        assert!(template.is_satisfied_by(|name| name == "major" || name == "minor"));
        assert!(!template.is_satisfied_by(|name| name == "major"));
    }

    #[test]
    fn test_template_without_placeholders() {
        let template = Template::parse("release").unwrap();
        assert_eq!(template.render(&context(&[])).unwrap(), "release");
    }
}
