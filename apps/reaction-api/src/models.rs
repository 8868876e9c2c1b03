//! Request bodies for the reaction-time API

use reaction_core::Error;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// Body of `POST /submit`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitRequest {
    /// Reaction time in milliseconds. Kept loosely typed so a missing or
    /// mistyped value gets a domain error instead of a deserializer message.
    #[serde(default)]
    pub time: Option<Value>,
}

impl SubmitRequest {
    /// The submitted time as a number. `None` when absent; numeric strings
    /// are accepted, any other type is rejected.
    pub fn time(&self) -> Result<Option<f64>, ApiError> {
        match &self.time {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| {
                Error::InvalidInput(format!("'{}' is not a number", s)).into()
            }),
            Some(other) => {
                Err(Error::InvalidInput(format!("expected a number, got {}", other)).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> SubmitRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_numeric_time() {
        assert_eq!(request(json!({"time": 250})).time().unwrap(), Some(250.0));
        assert_eq!(request(json!({"time": 250.5})).time().unwrap(), Some(250.5));
    }

    #[test]
    fn test_string_time() {
        assert_eq!(request(json!({"time": " 312.25 "})).time().unwrap(), Some(312.25));
        assert!(request(json!({"time": "fast"})).time().is_err());
    }

    #[test]
    fn test_missing_time() {
        assert_eq!(request(json!({})).time().unwrap(), None);
        assert_eq!(request(json!({"time": null})).time().unwrap(), None);
    }

    #[test]
    fn test_wrong_type() {
        assert!(request(json!({"time": [1, 2]})).time().is_err());
        assert!(request(json!({"time": true})).time().is_err());
    }
}
