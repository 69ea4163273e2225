use serde_json::json;

pub mod contracts;
pub mod errors;

pub fn tool_definitions() -> Vec<serde_json::Value> {
    vec![
        json!({
            "name": contracts::TOOL_CONVERT_TO_WEBP,
            "description": "Convert a single PNG/JPEG image file to WebP format.",
            "inputSchema": contracts::convert_to_webp_schema()
        }),
        json!({
            "name": contracts::TOOL_BATCH_CONVERT_TO_WEBP,
            "description": "Convert multiple PNG/JPEG image files to WebP format, one result per input.",
            "inputSchema": contracts::batch_convert_to_webp_schema()
        }),
        json!({
            "name": contracts::TOOL_CONVERT_BASE64_TO_WEBP,
            "description": "Convert a base64 encoded image to a WebP file.",
            "inputSchema": contracts::convert_base64_to_webp_schema()
        }),
    ]
}
