//! Query string parsing
//!
//! Request queries use bracket notation, e.g.
//! `populate[cover][fields][0]=url&sort=title:desc`, and are parsed into a
//! nested JSON object. Brackets holding only digits (or nothing) build
//! arrays. Values are kept as strings.

use lazy_static::lazy_static;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A request query object
pub type Query = Map<String, Value>;

lazy_static! {
    static ref KEY_RE: Regex = Regex::new(r"^([^\[\]]+)((?:\[[^\[\]]*\])*)$").unwrap();
    static ref SEGMENT_RE: Regex = Regex::new(r"\[([^\[\]]*)\]").unwrap();
}

/// Parse a raw query string (without the leading `?`)
pub fn parse_query(raw: &str) -> Result<Query, ApiError> {
    let mut root = Value::Object(Map::new());

    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(key)?;
        let value = decode(value)?;

        let segments = key_segments(&key)?;
        insert(&mut root, &segments, value, &key)?;
    }

    match into_arrays(root) {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

fn decode(s: &str) -> Result<String, ApiError> {
    let s = s.replace('+', " ");
    percent_decode_str(&s)
        .decode_utf8()
        .map(|c| c.into_owned())
        .map_err(|_| ApiError::BadRequest(format!("Invalid encoding in query: {}", s)))
}

fn key_segments(key: &str) -> Result<Vec<String>, ApiError> {
    let captures = KEY_RE
        .captures(key)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid query parameter: {}", key)))?;

    let mut segments = vec![captures[1].to_string()];
    for segment in SEGMENT_RE.captures_iter(&captures[2]) {
        segments.push(segment[1].to_string());
    }
    Ok(segments)
}

fn insert(node: &mut Value, segments: &[String], value: String, key: &str) -> Result<(), ApiError> {
    let conflict = || ApiError::BadRequest(format!("Conflicting query parameter: {}", key));
    let Value::Object(map) = node else {
        return Err(conflict());
    };

    // `[]` appends
    let name = match segments[0].as_str() {
        "" => map.len().to_string(),
        s => s.to_string(),
    };

    if segments.len() == 1 {
        match map.get_mut(&name) {
            None => {
                map.insert(name, Value::String(value));
            }
            // Repeated keys collect into a list
            Some(existing) => match existing {
                Value::String(_) => {
                    let first = std::mem::take(existing);
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
                Value::Array(items) => items.push(Value::String(value)),
                _ => return Err(conflict()),
            },
        }
        return Ok(());
    }

    let child = map
        .entry(name)
        .or_insert_with(|| Value::Object(Map::new()));
    insert(child, &segments[1..], value, key)
}

/// Objects whose keys are all indices become arrays, ordered by index
fn into_arrays(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let is_list = !map.is_empty() && map.keys().all(|k| k.parse::<usize>().is_ok());
            if is_list {
                let mut items: Vec<(usize, Value)> = map
                    .into_iter()
                    .filter_map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, into_arrays(v))))
                    .collect();
                items.sort_by_key(|(i, _)| *i);
                Value::Array(items.into_iter().map(|(_, v)| v).collect())
            } else {
                Value::Object(map.into_iter().map(|(k, v)| (k, into_arrays(v))).collect())
            }
        }
        other => other,
    }
}
