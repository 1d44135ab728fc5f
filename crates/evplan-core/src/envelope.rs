//! The `{ok, data?, error?}` wrapper used on every generate response.

use serde::{Deserialize, Serialize};

/// Uniform response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{EventPlan, mock_plan};
    use serde_json::json;

    #[test]
    fn failure_omits_data() {
        let body = serde_json::to_value(ApiResponse::<u32>::failure("nope")).unwrap();
        assert_eq!(body, json!({ "ok": false, "error": "nope" }));
    }

    #[test]
    fn success_omits_error() {
        let body = serde_json::to_value(ApiResponse::success(7)).unwrap();
        assert_eq!(body, json!({ "ok": true, "data": 7 }));
    }

    #[test]
    fn decodes_plan_envelope() {
        let plan = mock_plan("Farewell");
        let body = serde_json::to_string(&ApiResponse::success(plan.clone())).unwrap();
        let resp: ApiResponse<EventPlan> = serde_json::from_str(&body).unwrap();
        assert_eq!(resp, ApiResponse::success(plan));

        let resp: ApiResponse<EventPlan> =
            serde_json::from_str(r#"{"ok":false,"error":"boom"}"#).unwrap();
        assert_eq!(resp, ApiResponse::failure("boom"));
    }

    #[test]
    fn decodes_bare_failure() {
        let resp: ApiResponse<u32> = serde_json::from_str(r#"{"ok":false}"#).unwrap();
        assert!(!resp.ok);
        assert!(resp.error.is_none());
    }
}
