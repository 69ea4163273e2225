use crate::mcp::errors;
use std::io;
use std::path::PathBuf;

/// Everything that can go wrong while converting one image.
///
/// Never crosses the executor boundary: each variant ends up as the `error`
/// and `error_kind` of a failure record.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("input file is missing: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported image format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("webp conversion failed: {0}")]
    Codec(String),

    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("output path already written by an earlier item in this batch: {}", path.display())]
    OutputCollision { path: PathBuf },
}

impl ConvertError {
    pub fn filesystem(context: impl Into<String>, source: io::Error) -> Self {
        Self::Filesystem {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::NotFound { .. } => errors::NOT_FOUND,
            ConvertError::UnsupportedFormat { .. } => errors::UNSUPPORTED_FORMAT,
            ConvertError::DecodeFailed(_) => errors::DECODE_FAILED,
            ConvertError::Codec(_) => errors::CODEC_ERROR,
            ConvertError::Filesystem { .. } => errors::FILESYSTEM_ERROR,
            ConvertError::OutputCollision { .. } => errors::OUTPUT_COLLISION,
        }
    }
}
