//! Wire types for the `/api/chat` contract shared by client and server.

use serde::{Deserialize, Serialize};

/// Status value that marks a successful chat response.
pub const STATUS_SUCCESS: &str = "success";
/// Status value the server uses for failures.
pub const STATUS_ERROR: &str = "error";

/// Request body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// What the user typed.
    #[serde(default)]
    pub message: String,
    /// `men`, `women` or `unisex`.
    #[serde(default)]
    pub gender: Option<String>,
}

/// Response body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    /// `success` or `error`.
    pub status: String,
    /// Generated text on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn success(response: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            response: Some(response.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            response: None,
            error: Some(error.into()),
        }
    }

    /// The generated text, if this response is a success carrying text.
    pub fn text(&self) -> Option<&str> {
        if self.status != STATUS_SUCCESS {
            return None;
        }
        self.response.as_deref().filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_without_text_is_not_text() {
        let resp: ChatResponse = serde_json::from_str(r#"{"status":"success","response":""}"#).unwrap();
        assert_eq!(resp.text(), None);
    }

    #[test]
    fn error_response_omits_response_field() {
        let json = serde_json::to_value(ChatResponse::error("No message provided")).unwrap();
        assert_eq!(json, serde_json::json!({"status": "error", "error": "No message provided"}));
    }

    #[test]
    fn request_tolerates_missing_gender() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(req.message, "hi");
        assert!(req.gender.is_none());
    }
}
