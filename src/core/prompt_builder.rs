// src/core/prompt_builder.rs
//! Placeholder substitution for model prompts.
//!
//! Placeholders are `{name}` where `name` is ASCII alphanumerics or `_`.
//! Any other brace (JSON examples in a prompt, for instance) is literal text.
//! Substitution is a single pass, so a value that itself looks like a
//! placeholder is inserted verbatim and never expanded.

use std::collections::HashMap;

use crate::error::{CoachError, Result};

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn new(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            match placeholder_name(after) {
                Some(name) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                    rest = &after[name.len() + 1..];
                }
                None => {
                    literal.push('{');
                    rest = after;
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Names of all placeholders, in order of appearance, without duplicates.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Fill every placeholder. Extra values are ignored; a missing one is an error.
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String> {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder(name) => {
                    let value = values.get(name.as_str()).ok_or_else(|| {
                        CoachError::Template(format!("no value supplied for placeholder '{}'", name))
                    })?;
                    output.push_str(value);
                }
            }
        }
        Ok(output)
    }
}

/// `after` starts right past a `{`; returns the name if `name}` follows.
fn placeholder_name(after: &str) -> Option<&str> {
    let end = after.find('}')?;
    let name = &after[..end];
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let template = PromptTemplate::new("Hello {name}, you have {count} years.");
        let rendered = template
            .render(&values(&[("name", "Ada"), ("count", "7")]))
            .unwrap();
        assert_eq!(rendered, "Hello Ada, you have 7 years.");
    }

    #[test]
    fn test_missing_placeholder_is_error() {
        let template = PromptTemplate::new("Hello {name}");
        let err = template.render(&HashMap::new()).unwrap_err();
        assert!(matches!(err, CoachError::Template(_)));
    }

    #[test]
    fn test_extra_values_ignored() {
        let template = PromptTemplate::new("Only {a}");
        let rendered = template.render(&values(&[("a", "x"), ("b", "y")])).unwrap();
        assert_eq!(rendered, "Only x");
    }

    #[test]
    fn test_json_braces_are_literal() {
        let raw = "Example:\n[\n  {\n    \"title\": \"Dev\"\n  }\n]\nProfile: {profile}";
        let template = PromptTemplate::new(raw);
        assert_eq!(template.placeholders(), vec!["profile"]);
        let rendered = template.render(&values(&[("profile", "P")])).unwrap();
        assert_eq!(rendered, raw.replace("{profile}", "P"));
    }

    #[test]
    fn test_values_inserted_verbatim() {
        let template = PromptTemplate::new("{a} and {b}");
        let rendered = template
            .render(&values(&[("a", "{b}"), ("b", "second")]))
            .unwrap();
        assert_eq!(rendered, "{b} and second");
    }

    #[test]
    fn test_repeated_placeholder() {
        let template = PromptTemplate::new("{x}-{x}");
        assert_eq!(template.placeholders(), vec!["x"]);
        assert_eq!(template.render(&values(&[("x", "1")])).unwrap(), "1-1");
    }
}
