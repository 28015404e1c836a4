use serde::Deserialize;

use super::{AuthenticatedUser, CartItem, Product};
use crate::error::{ClientError, ClientResult};

/// Conventional `{ success, message }` envelope returned by mutating endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ActionResponse {
    /// Requires an explicit `success: true`, yielding the server message.
    pub fn into_result(self, fallback: &str) -> ClientResult<String> {
        if self.success == Some(true) {
            Ok(self.message.unwrap_or_default())
        } else {
            Err(ClientError::Application(non_empty_or(self.message, fallback)))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<AuthenticatedUser>,
}

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";

impl LoginResponse {
    /// Buyer login signals success through its message only; farmer login
    /// sets `success`.
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
            || (self.success.is_none() && self.message.as_deref() == Some(LOGIN_SUCCESS_MESSAGE))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cart: Vec<CartItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaUploadResponse {
    #[serde(default)]
    pub secure_url: Option<String>,
    #[serde(default)]
    pub error: Option<MediaUploadError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaUploadError {
    #[serde(default)]
    pub message: Option<String>,
}

pub(crate) fn non_empty_or(message: Option<String>, fallback: &str) -> String {
    message
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_response_success() {
        let response: ActionResponse =
            serde_json::from_value(json!({ "success": true, "message": "Cart updated" })).unwrap();
        assert_eq!(response.into_result("unused").unwrap(), "Cart updated");
    }

    #[test]
    fn test_action_response_failure_uses_fallback() {
        let response: ActionResponse =
            serde_json::from_value(json!({ "success": false, "message": "" })).unwrap();
        let err = response.into_result("Failed to add product.").unwrap_err();
        assert_eq!(err, ClientError::Application("Failed to add product.".to_string()));

        let missing: ActionResponse = serde_json::from_value(json!({})).unwrap();
        assert!(missing.into_result("x").is_err());
    }

    #[test]
    fn test_login_success_detection() {
        let buyer: LoginResponse =
            serde_json::from_value(json!({ "message": "Login successful" })).unwrap();
        assert!(buyer.is_success());

        let rejected: LoginResponse =
            serde_json::from_value(json!({ "success": false, "message": "Login successful" }))
                .unwrap();
        assert!(!rejected.is_success());

        let other: LoginResponse =
            serde_json::from_value(json!({ "message": "Account locked" })).unwrap();
        assert!(!other.is_success());
    }
}
