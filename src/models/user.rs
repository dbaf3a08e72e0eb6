use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

// ==============================================================================
// Auth Request / Response Models
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Generic acknowledgement body returned by register / reset-password.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthMessage {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_full_name() {
        let user = User {
            email: "ada@example.com".to_string(),
            full_name: Some("Ada Lovelace".to_string()),
        };
        assert_eq!(user.display_name(), "Ada Lovelace");

        let blank = User {
            email: "ada@example.com".to_string(),
            full_name: Some("  ".to_string()),
        };
        assert_eq!(blank.display_name(), "ada@example.com");
    }

    #[test]
    fn test_login_response_ignores_unknown_user_fields() {
        let json = r#"{
            "access_token": "abc",
            "token_type": "bearer",
            "user": {"id": 12, "email": "a@b.io", "full_name": null, "created_at": "2024-01-01"}
        }"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.access_token, "abc");
        assert_eq!(response.user.email, "a@b.io");
        assert!(response.user.full_name.is_none());
    }
}
