//! Authentication request/response models.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::serde_helpers::{deserialize_optional_secret, serialize_secret};

/// Credentials sent to the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

/// Body returned by the login endpoint.
///
/// Fields other than the token pair are kept in [`LoginResponse::extra`]
/// so callers see the full response.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    /// Bearer token, when the backend issued one.
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub access_token: Option<SecretString>,
    /// Token type (normally `bearer`).
    #[serde(default)]
    pub token_type: Option<String>,
    /// Any other fields of the response.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Generic `{ "message": ... }` acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Human-readable message.
    pub message: String,
}

/// Backend health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// `healthy` when the backend is up.
    pub status: String,
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret as _;

    use super::*;

    #[test]
    fn login_request_wire_shape() {
        let request = LoginRequest {
            email: "owner@toko.id".to_owned(),
            password: SecretString::from("hunter2"),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "email": "owner@toko.id", "password": "hunter2" })
        );
        assert!(!format!("{request:?}").contains("hunter2"));
    }

    #[test]
    fn login_response_keeps_extra_fields() {
        let json = r#"{"access_token": "tok", "token_type": "bearer", "user": {"id": 1}}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token.unwrap().expose_secret(), "tok");
        assert_eq!(response.token_type.as_deref(), Some("bearer"));
        assert_eq!(response.extra["user"]["id"], 1);
    }

    #[test]
    fn login_response_without_token() {
        let response: LoginResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(response.access_token.is_none());
        assert_eq!(response.extra["status"], "ok");
    }
}
