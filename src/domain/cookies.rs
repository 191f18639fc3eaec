//! Session cookie handling.
//!
//! Operators paste cookies either as a JSON object copied from browser dev
//! tools or as a raw `name=value; name=value` header line. Keys are matched
//! case-insensitively because the gateway is not consistent about header
//! casing; we normalize to lowercase on insert.

use std::collections::BTreeMap;

/// Case-insensitive cookie set for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    entries: BTreeMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse operator input in either supported shape.
    ///
    /// A leading `{` selects JSON-object parsing; on JSON failure the input
    /// falls through to `name=value; name=value` parsing. Segments without
    /// an `=` are dropped.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::new();
        }

        if input.starts_with('{') && input.ends_with('}') {
            if let Ok(serde_json::Value::Object(object)) = serde_json::from_str(input) {
                let mut jar = Self::new();
                for (name, value) in object {
                    let value = match value {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    jar.insert(name, value);
                }
                return jar;
            }
            // fall back to semi-colon parsing
        }

        let mut jar = Self::new();
        for segment in input.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            if let Some((name, value)) = segment.split_once('=') {
                jar.insert(name.trim(), value.trim());
            }
        }
        jar
    }

    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the jar as a `Cookie` header value.
    pub fn header(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
