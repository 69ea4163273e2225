use super::codec::{Codec, EncodeOptions};
use super::error::ConvertError;
use super::record::{Base64Conversion, ConversionResult, FileConversion, display_path};
use super::resolve::{FileTarget, absolute_path, resolve_base64, resolve_file};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings shared by single-file and batch conversions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSettings {
    pub quality: i64,
    pub lossless: bool,
    pub output_dir: Option<String>,
    pub keep_original: bool,
}

impl FileSettings {
    fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            quality: self.quality,
            lossless: self.lossless,
        }
    }
}

/// Converts one image file. Never fails: errors come back as a failure record.
pub fn convert_file(codec: &dyn Codec, source: &str, settings: &FileSettings) -> ConversionResult {
    convert_file_claiming(codec, source, settings, None)
}

/// Same as [`convert_file`], but refuses to write an output path already in
/// `claimed` and records the output path there on success.
pub(crate) fn convert_file_claiming(
    codec: &dyn Codec,
    source: &str,
    settings: &FileSettings,
    claimed: Option<&mut HashSet<PathBuf>>,
) -> ConversionResult {
    let absolute = match absolute_path(source) {
        Ok(path) => path,
        Err(err) => return failed_file(&err, Path::new(source)),
    };
    tracing::info!(input = %absolute.display(), "converting image to webp");

    let target = match resolve_file(&absolute, settings.output_dir.as_deref()) {
        Ok(target) => target,
        Err(err) => return failed_file(&err, &absolute),
    };

    let key = claim_key(&target.output);
    let claimed = match claimed {
        Some(claimed) if claimed.contains(&key) => {
            let err = ConvertError::OutputCollision {
                path: target.output.clone(),
            };
            return failed_file(&err, &absolute);
        }
        other => other,
    };

    match transcode_file(codec, &target, settings) {
        Ok(conversion) => {
            if let Some(claimed) = claimed {
                claimed.insert(key);
            }
            tracing::info!(
                output = %conversion.output_path,
                size_before = conversion.size_before,
                size_after = conversion.size_after,
                "converted image"
            );
            ConversionResult::File(conversion)
        }
        Err(err) => failed_file(&err, &absolute),
    }
}

/// Output paths compared through the canonical parent directory, so `a/../x.webp`
/// and `x.webp` count as the same file. The parent exists once resolved.
fn claim_key(output: &Path) -> PathBuf {
    let canonical_parent = output.parent().and_then(|parent| fs::canonicalize(parent).ok());
    match (canonical_parent, output.file_name()) {
        (Some(parent), Some(name)) => parent.join(name),
        _ => output.to_path_buf(),
    }
}

fn transcode_file(
    codec: &dyn Codec,
    target: &FileTarget,
    settings: &FileSettings,
) -> Result<FileConversion, ConvertError> {
    codec.transcode_file(&target.source, &target.output, settings.encode_options())?;

    // Measured before the source may be deleted.
    let size_before = file_size(&target.source)?;

    let warning = if settings.keep_original {
        None
    } else {
        match fs::remove_file(&target.source) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(
                    input = %target.source.display(),
                    error = %err,
                    "converted image but could not delete the original"
                );
                Some(format!(
                    "converted, but failed to delete original {}: {err}",
                    target.source.display()
                ))
            }
        }
    };

    let size_after = file_size(&target.output)?;

    Ok(FileConversion {
        input_path: display_path(&target.source),
        output_path: display_path(&target.output),
        size_before,
        size_after,
        quality: settings.quality,
        lossless: settings.lossless,
        warning,
    })
}

/// Decodes a base64 (or data-URI) payload and writes it as WebP at
/// `output_path`. Never fails: errors come back as a failure record.
pub fn convert_base64(
    codec: &dyn Codec,
    payload: &str,
    output_path: &str,
    quality: i64,
    lossless: bool,
) -> ConversionResult {
    let options = EncodeOptions { quality, lossless };
    let result = resolve_base64(payload, output_path).and_then(|target| {
        codec.transcode_bytes(&target.bytes, &target.output, options)?;
        let size = file_size(&target.output)?;
        Ok(Base64Conversion {
            output_path: display_path(&target.output),
            size,
            quality,
            lossless,
        })
    });

    match result {
        Ok(conversion) => {
            tracing::info!(
                output = %conversion.output_path,
                size = conversion.size,
                "converted base64 image"
            );
            ConversionResult::Base64(conversion)
        }
        Err(err) => {
            tracing::warn!(output = output_path, error = %err, "base64 conversion failed");
            ConversionResult::failed_output(&err, Path::new(output_path))
        }
    }
}

fn failed_file(err: &ConvertError, input: &Path) -> ConversionResult {
    tracing::warn!(input = %input.display(), error = %err, "image conversion failed");
    ConversionResult::failed_input(err, input)
}

fn file_size(path: &Path) -> Result<u64, ConvertError> {
    fs::metadata(path)
        .map(|metadata| metadata.len())
        .map_err(|err| ConvertError::filesystem(format!("failed to stat {}", path.display()), err))
}
