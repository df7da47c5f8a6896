use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `POST /state/user/{session}/interact` call.
#[derive(Serialize, Debug, Clone)]
pub struct InteractRequest {
    pub request: RequestAction,
}

#[derive(Serialize, Debug, Clone)]
pub struct RequestAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: String,
}

impl InteractRequest {
    pub fn text(payload: impl Into<String>) -> Self {
        Self {
            request: RequestAction {
                kind: "text".to_string(),
                payload: payload.into(),
            },
        }
    }
}

/// One unit of output from the dialogue service.
///
/// The service emits many trace kinds (`text`, `speak`, `visual`, `choice`,
/// `end`, ...). Only the message-bearing ones are interpreted; every other
/// kind is accepted and ignored, so the payload is kept loose.
#[derive(Deserialize, Debug, Clone)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Option<Value>,
}

impl Trace {
    pub fn is_message(&self) -> bool {
        matches!(self.kind.as_str(), "text" | "speak")
    }

    pub fn message(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(|payload| payload.get("message"))
            .and_then(Value::as_str)
    }
}
