//! DTOs for the login endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login credentials.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Bearer token issued on successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fail_validation() {
        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        let errors = req.validate().unwrap_err();

        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_complete_request_is_valid() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"intern@dacoid.com","password":"Test123"}"#).unwrap();

        assert!(req.validate().is_ok());
    }
}
