use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiError;

pub fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid id: {}. Id must be a positive integer",
            id
        )));
    }
    Ok(id)
}

/// Typed decode of an already-parsed JSON body. Shape mismatches are a
/// client error (400), not axum's default 422.
pub fn parse_payload<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::validation(format!("Invalid {what} data: {e}")))
}
