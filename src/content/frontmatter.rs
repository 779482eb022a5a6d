//! Front-matter parsing for content entries

use serde_json::{Map, Value};

/// Split a markdown document into its YAML front matter and body.
///
/// Returns `None` when the document does not open with a `---` fence
/// that is closed later on.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start_matches('\u{feff}');
    let rest = content.strip_prefix("---")?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    // The closing fence is a line holding exactly `---`
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let body = &rest[offset + line.len()..];
            return Some((&rest[..offset], body.trim_start_matches(['\r', '\n'])));
        }
        offset += line.len();
    }
    None
}

/// Parse front matter into a JSON object ready for schema validation.
///
/// A document without front matter yields an empty object; schema
/// validation then reports the missing fields.
pub fn parse(content: &str) -> Result<(Value, &str), String> {
    let Some((yaml, body)) = split(content) else {
        return Ok((Value::Object(Map::new()), content));
    };

    if yaml.trim().is_empty() {
        return Ok((Value::Object(Map::new()), body));
    }

    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| format!("invalid YAML front matter: {}", e))?;
    let value = yaml_to_json(yaml_value)?;

    match value {
        Value::Object(_) => Ok((value, body)),
        Value::Null => Ok((Value::Object(Map::new()), body)),
        other => Err(format!(
            "front matter must be a mapping, found {}",
            json_type_name(&other)
        )),
    }
}

/// Convert a YAML document into JSON so every collection validates the same way
pub fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| format!("unsupported YAML value: {}", e))
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
description: First post
---

This is the content.
"#;

        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm["title"], "Hello World");
        assert_eq!(fm["description"], "First post");
        assert!(body.starts_with("This is the content."));
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = parse("Just a body.").unwrap();
        assert_eq!(fm, Value::Object(Map::new()));
        assert_eq!(body, "Just a body.");
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = parse("---\n---\nBody").unwrap();
        assert_eq!(fm, Value::Object(Map::new()));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unclosed_frontmatter_is_body() {
        let content = "---\ntitle: Oops\nno closing fence";
        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm, Value::Object(Map::new()));
        assert_eq!(body, content);
    }

    #[test]
    fn test_dashes_inside_yaml_do_not_close() {
        let content = "---\ntitle: Rules\ndescription: |\n  ----\n  --- not a fence\n---\r\nBody\n---\nmore";
        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm["title"], "Rules");
        assert_eq!(fm["description"], "----\n--- not a fence\n");
        assert_eq!(body, "Body\n---\nmore");
    }

    #[test]
    fn test_fence_at_end_of_input() {
        let (fm, body) = parse("---\ntitle: Only\n---").unwrap();
        assert_eq!(fm["title"], "Only");
        assert_eq!(body, "");
    }

    #[test]
    fn test_scalar_frontmatter_rejected() {
        let err = parse("---\njust a string\n---\nBody").unwrap_err();
        assert!(err.contains("mapping"));
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        assert!(parse("---\ntitle: [unclosed\n---\nBody").is_err());
    }
}
