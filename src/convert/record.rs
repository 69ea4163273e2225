use super::error::ConvertError;
use serde::{Serialize, Serializer};
use std::path::Path;

/// Outcome of one conversion, self-describing for whoever reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    File(FileConversion),
    Base64(Base64Conversion),
    Failed(ConversionFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileConversion {
    pub input_path: String,
    pub output_path: String,
    pub size_before: u64,
    pub size_after: u64,
    pub quality: i64,
    pub lossless: bool,
    /// Set when the output was written but the source could not be deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Base64Conversion {
    pub output_path: String,
    pub size: u64,
    pub quality: i64,
    pub lossless: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionFailure {
    pub error: String,
    pub error_kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

impl ConversionResult {
    pub fn failed_input(error: &ConvertError, input_path: &Path) -> Self {
        ConversionResult::Failed(ConversionFailure {
            error: error.to_string(),
            error_kind: error.kind(),
            input_path: Some(display_path(input_path)),
            output_path: None,
        })
    }

    pub fn failed_output(error: &ConvertError, output_path: &Path) -> Self {
        ConversionResult::Failed(ConversionFailure {
            error: error.to_string(),
            error_kind: error.kind(),
            input_path: None,
            output_path: Some(display_path(output_path)),
        })
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, ConversionResult::Failed(_))
    }
}

impl Serialize for ConversionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Record<'a, T> {
            success: bool,
            #[serde(flatten)]
            body: &'a T,
        }

        match self {
            ConversionResult::File(body) => Record {
                success: true,
                body,
            }
            .serialize(serializer),
            ConversionResult::Base64(body) => Record {
                success: true,
                body,
            }
            .serialize(serializer),
            ConversionResult::Failed(body) => Record {
                success: false,
                body,
            }
            .serialize(serializer),
        }
    }
}

pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
impl ConversionResult {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ConversionResult::Failed(failure) => Some(failure.error.as_str()),
            _ => None,
        }
    }

    pub fn output_path(&self) -> Option<&str> {
        match self {
            ConversionResult::File(file) => Some(file.output_path.as_str()),
            ConversionResult::Base64(base64) => Some(base64.output_path.as_str()),
            ConversionResult::Failed(failure) => failure.output_path.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn file_record_serializes_flat_with_success_flag() {
        let record = ConversionResult::File(FileConversion {
            input_path: "/tmp/a.png".to_string(),
            output_path: "/tmp/a.webp".to_string(),
            size_before: 120,
            size_after: 40,
            quality: 75,
            lossless: false,
            warning: None,
        });
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(
            value,
            json!({
                "success": true,
                "input_path": "/tmp/a.png",
                "output_path": "/tmp/a.webp",
                "size_before": 120,
                "size_after": 40,
                "quality": 75,
                "lossless": false
            })
        );
    }

    #[test]
    fn failure_record_keeps_only_known_path() {
        let error = ConvertError::NotFound {
            path: PathBuf::from("/tmp/missing.png"),
        };
        let record = ConversionResult::failed_input(&error, Path::new("/tmp/missing.png"));
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error_kind"], json!("not_found"));
        assert_eq!(value["input_path"], json!("/tmp/missing.png"));
        assert!(value.get("output_path").is_none());
        assert!(
            value["error"]
                .as_str()
                .expect("error string")
                .contains("/tmp/missing.png")
        );
        assert!(!record.is_success());
    }
}
