use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure body returned by the registry on non-success statuses.
///
/// `detail` is usually a string, but validation failures may carry a list of
/// objects instead; only the string form is surfaced to users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    pub fn detail_text(&self) -> Option<&str> {
        self.detail.as_ref().and_then(Value::as_str)
    }

    /// Extracts the string detail from a raw failure body, if any.
    pub fn detail_from_bytes(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.detail_text().map(str::to_string))
    }
}
