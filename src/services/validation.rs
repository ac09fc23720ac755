use crate::errors::ToolError;
use serde_json::{Map, Value};

/// Argument coercion shared by the tool handlers.
#[derive(Clone, Default)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_string(
        &self,
        value: Option<&Value>,
        label: &str,
        trim: bool,
    ) -> Result<String, ToolError> {
        let text = value.and_then(Value::as_str).ok_or_else(|| {
            ToolError::invalid_params(format!("{} must be a non-empty string", label))
        })?;
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(if trim {
            normalized.to_string()
        } else {
            text.to_string()
        })
    }

    /// Absent, null and blank strings all read as `None`.
    pub fn ensure_optional_string(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<String>, ToolError> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(val) => self.ensure_string(Some(val), label, true).map(Some),
        }
    }

    /// Result cap; accepts integers and numeric strings, falls back to `default`.
    pub fn ensure_limit(
        &self,
        value: Option<&Value>,
        default: usize,
    ) -> Result<usize, ToolError> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Ok(default);
        };
        let numeric = value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
            .filter(|n| n.is_finite() && *n >= 0.0)
            .ok_or_else(|| ToolError::invalid_params("limit must be a non-negative number"))?;
        Ok(numeric.floor() as usize)
    }

    pub fn ensure_optional_object(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Map<String, Value>, ToolError> {
        match value {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(_) => Err(ToolError::invalid_params(format!(
                "{} must be an object",
                label
            ))),
        }
    }
}
