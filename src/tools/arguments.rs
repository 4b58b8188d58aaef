//! Typed accessors over a tool call's JSON argument payload.

use crate::error::{Result, ZorvaError};

/// Wrapper around a tool call's argument object.
#[derive(Debug, Clone)]
pub struct ToolArguments(serde_json::Value);

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Required string argument.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.0
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ZorvaError::Validation(format!("missing string argument '{key}'")))
    }

    /// Optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    /// Optional string argument with a default.
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_str_opt(key).unwrap_or(default)
    }

    /// Optional integer argument with a default.
    pub fn get_i64_or(&self, key: &str, default: i64) -> i64 {
        self.0.get(key).and_then(|v| v.as_i64()).unwrap_or(default)
    }

    /// Required array-of-strings argument.
    pub fn get_str_vec(&self, key: &str) -> Result<Vec<String>> {
        let items = self
            .0
            .get(key)
            .and_then(|v| v.as_array())
            .ok_or_else(|| ZorvaError::Validation(format!("missing array argument '{key}'")))?;
        Ok(items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect())
    }

    /// Raw underlying value.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}
