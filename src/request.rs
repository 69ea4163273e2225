use crate::convert::FileSettings;
use crate::mcp::contracts::DEFAULT_QUALITY;
use crate::mcp::errors;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertToWebpArgs {
    pub image_path: String,
    #[serde(default = "default_quality")]
    pub quality: i64,
    #[serde(default)]
    pub lossless: bool,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub keep_original: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConvertToWebpArgs {
    pub image_paths: Vec<String>,
    #[serde(default = "default_quality")]
    pub quality: i64,
    #[serde(default)]
    pub lossless: bool,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub keep_original: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertBase64ToWebpArgs {
    pub base64_image: String,
    pub output_path: String,
    #[serde(default = "default_quality")]
    pub quality: i64,
    #[serde(default)]
    pub lossless: bool,
}

impl ConvertToWebpArgs {
    pub fn settings(&self) -> FileSettings {
        FileSettings {
            quality: self.quality,
            lossless: self.lossless,
            output_dir: self.output_dir.clone(),
            keep_original: self.keep_original,
        }
    }
}

impl BatchConvertToWebpArgs {
    pub fn settings(&self) -> FileSettings {
        FileSettings {
            quality: self.quality,
            lossless: self.lossless,
            output_dir: self.output_dir.clone(),
            keep_original: self.keep_original,
        }
    }
}

fn default_quality() -> i64 {
    DEFAULT_QUALITY
}

#[derive(Debug, Clone)]
pub struct RequestError {
    pub kind: &'static str,
    pub message: String,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for RequestError {}

/// Parses tool arguments into their typed form. Wrong primitive types,
/// missing required fields and unknown fields are all `invalid_input`.
pub fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T, RequestError> {
    if !args.is_object() {
        return Err(RequestError {
            kind: errors::INVALID_INPUT,
            message: "arguments must be an object".to_string(),
        });
    }
    T::deserialize(args).map_err(|err| RequestError {
        kind: errors::INVALID_INPUT,
        message: err.to_string(),
    })
}
