//! Wire shape of progress channel messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Literal `message` value that completes a session.
pub const TASK_COMPLETED: &str = "Task completed";

/// `{progress_percentage?, message?}` JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressMessage {
    /// Passed through as received, including non-numeric values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProgressMessage {
    pub fn progress(percentage: impl Into<Value>) -> Self {
        Self {
            progress_percentage: Some(percentage.into()),
            message: None,
        }
    }

    pub fn completed() -> Self {
        Self {
            progress_percentage: None,
            message: Some(TASK_COMPLETED.to_string()),
        }
    }

    pub fn is_completion(&self) -> bool {
        self.message.as_deref() == Some(TASK_COMPLETED)
    }

    pub fn to_value(&self) -> Value {
        let mut object = serde_json::Map::new();
        if let Some(percentage) = &self.progress_percentage {
            object.insert("progress_percentage".to_string(), percentage.clone());
        }
        if let Some(message) = &self.message {
            object.insert("message".to_string(), Value::String(message.clone()));
        }
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::ProgressMessage;
    use serde_json::json;

    #[test]
    fn progress_serializes_without_message_field() {
        let encoded = serde_json::to_value(ProgressMessage::progress(42)).expect("serialize");
        assert_eq!(encoded, json!({"progress_percentage": 42}));
        assert_eq!(ProgressMessage::progress(42).to_value(), encoded);
    }

    #[test]
    fn completion_shape_matches_literal() {
        let completed = ProgressMessage::completed();
        assert!(completed.is_completion());
        assert_eq!(completed.to_value(), json!({"message": "Task completed"}));
    }
}
