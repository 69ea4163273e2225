use serde_json::json;

pub const TOOL_CONVERT_TO_WEBP: &str = "convert_to_webp";
pub const TOOL_BATCH_CONVERT_TO_WEBP: &str = "batch_convert_to_webp";
pub const TOOL_CONVERT_BASE64_TO_WEBP: &str = "convert_base64_to_webp";

pub const DEFAULT_QUALITY: i64 = 80;

pub fn convert_to_webp_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "image_path": { "type": "string" },
            "quality": { "type": "integer", "default": DEFAULT_QUALITY },
            "lossless": { "type": "boolean", "default": false },
            "output_dir": { "type": ["string", "null"], "default": null },
            "keep_original": { "type": "boolean", "default": false }
        },
        "required": ["image_path"],
        "additionalProperties": false
    })
}

pub fn batch_convert_to_webp_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "image_paths": {
                "type": "array",
                "items": { "type": "string" }
            },
            "quality": { "type": "integer", "default": DEFAULT_QUALITY },
            "lossless": { "type": "boolean", "default": false },
            "output_dir": { "type": ["string", "null"], "default": null },
            "keep_original": { "type": "boolean", "default": false }
        },
        "required": ["image_paths"],
        "additionalProperties": false
    })
}

pub fn convert_base64_to_webp_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "base64_image": { "type": "string" },
            "output_path": { "type": "string" },
            "quality": { "type": "integer", "default": DEFAULT_QUALITY },
            "lossless": { "type": "boolean", "default": false }
        },
        "required": ["base64_image", "output_path"],
        "additionalProperties": false
    })
}
