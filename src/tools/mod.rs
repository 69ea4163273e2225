use serde::Serialize;
use serde_json::{Value, json};

pub mod batch_convert_to_webp;
pub mod convert_base64_to_webp;
pub mod convert_to_webp;

pub fn error_result(
    kind: &'static str,
    message: impl Into<String>,
    source: Option<&str>,
) -> Value {
    let message = message.into();
    let mut error = json!({
        "kind": kind,
        "message": message,
    });

    if let Some(source) = source
        && let Some(obj) = error.as_object_mut()
    {
        obj.insert("source".to_string(), json!(source));
    }

    json!({
        "content": [{"type": "text", "text": format!("Error: {message}")}],
        "structuredContent": {"error": error},
        "isError": true
    })
}

/// Wraps result records in a tool envelope: the pretty-printed JSON goes in a
/// single text block, the same data in `structuredContent`.
pub fn record_result<T: Serialize>(records: &T, structured: Value, is_error: bool) -> Value {
    let text = match serde_json::to_string_pretty(records) {
        Ok(text) => text,
        Err(err) => {
            return error_result(
                crate::mcp::errors::INTERNAL_ERROR,
                format!("failed to serialize result: {err}"),
                None,
            );
        }
    };

    json!({
        "content": [{"type": "text", "text": text}],
        "structuredContent": structured,
        "isError": is_error
    })
}
