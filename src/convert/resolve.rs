//! Turns caller-supplied sources into absolute, validated locations and
//! deterministic `.webp` output paths. Destination directories are created
//! here, before any codec work starts.

use super::error::ConvertError;
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Extensions accepted as conversion sources, compared lowercased.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

pub const OUTPUT_EXTENSION: &str = "webp";

const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    pub source: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Target {
    pub bytes: Vec<u8>,
    pub output: PathBuf,
}

/// Rewrites `/` into the host separator and anchors relative paths at the
/// current working directory. An empty path is the working directory itself.
pub fn absolute_path(raw: &str) -> Result<PathBuf, ConvertError> {
    if raw.is_empty() {
        return std::env::current_dir()
            .map_err(|err| ConvertError::filesystem("failed to read working directory", err));
    }
    let normalized: String = raw
        .chars()
        .map(|ch| if ch == '/' { MAIN_SEPARATOR } else { ch })
        .collect();
    let path = PathBuf::from(normalized);
    if path.is_absolute() {
        return Ok(path);
    }
    std::path::absolute(&path)
        .map_err(|err| ConvertError::filesystem(format!("failed to resolve {raw}"), err))
}

pub fn resolve_file(source: &Path, output_dir: Option<&str>) -> Result<FileTarget, ConvertError> {
    if !source.exists() {
        return Err(ConvertError::NotFound {
            path: source.to_path_buf(),
        });
    }

    let extension = source
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    let supported = extension
        .as_deref()
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
    if !supported {
        return Err(ConvertError::UnsupportedFormat {
            extension: extension
                .map(|ext| format!(".{ext}"))
                .unwrap_or_else(|| "(none)".to_string()),
        });
    }

    let directory = match output_dir.filter(|dir| !dir.trim().is_empty()) {
        Some(dir) => absolute_path(dir)?,
        None => source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(MAIN_SEPARATOR.to_string())),
    };
    let output = directory.join(output_file_name(source));

    ensure_directory(&directory)?;

    Ok(FileTarget {
        source: source.to_path_buf(),
        output,
    })
}

pub fn resolve_base64(payload: &str, output_path: &str) -> Result<Base64Target, ConvertError> {
    let data = strip_data_uri(payload);
    let compact: String = data.chars().filter(|ch| !ch.is_ascii_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|err| ConvertError::DecodeFailed(format!("invalid base64 payload: {err}")))?;

    let output = absolute_path(output_path)?;
    if let Some(directory) = output.parent() {
        ensure_directory(directory)?;
    }

    Ok(Base64Target { bytes, output })
}

/// `photo.PNG` becomes `photo.webp`.
pub fn output_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}.{OUTPUT_EXTENSION}")
}

/// Drops a leading `data:image/<subtype>;base64,` header when present.
pub fn strip_data_uri(payload: &str) -> &str {
    let Some(rest) = payload.strip_prefix("data:image/") else {
        return payload;
    };
    let Some((subtype, data)) = rest.split_once(";base64,") else {
        return payload;
    };
    let valid_subtype = !subtype.is_empty()
        && subtype
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if valid_subtype { data } else { payload }
}

fn ensure_directory(directory: &Path) -> Result<(), ConvertError> {
    fs::create_dir_all(directory).map_err(|err| {
        ConvertError::filesystem(
            format!("failed to create directory {}", directory.display()),
            err,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn output_name_replaces_extension_case_insensitively() {
        assert_eq!(output_file_name(Path::new("/a/photo.png")), "photo.webp");
        assert_eq!(output_file_name(Path::new("/a/photo.JPG")), "photo.webp");
        assert_eq!(output_file_name(Path::new("/a/my.photo.Jpeg")), "my.photo.webp");
    }

    #[test]
    fn relative_path_is_anchored_at_cwd() {
        let resolved = absolute_path("images/cat.png").expect("absolute");
        assert!(resolved.is_absolute());
        let cwd = std::env::current_dir().expect("cwd");
        assert_eq!(resolved, cwd.join("images").join("cat.png"));
    }

    #[test]
    fn empty_path_is_cwd() {
        let resolved = absolute_path("").expect("absolute");
        assert_eq!(resolved, std::env::current_dir().expect("cwd"));
    }

    #[test]
    fn missing_source_is_not_found() {
        let dir = tempdir().expect("tempdir");
        let source = dir.path().join("missing.png");
        let err = resolve_file(&source, None).expect_err("error");
        assert!(matches!(err, ConvertError::NotFound { .. }));
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        let dir = tempdir().expect("tempdir");
        for name in ["anim.gif", "noext"] {
            let source = dir.path().join(name);
            File::create(&source).expect("file");
            let err = resolve_file(&source, None).expect_err("error");
            assert!(matches!(err, ConvertError::UnsupportedFormat { .. }));
        }
        let err = resolve_file(&dir.path().join("noext"), None).expect_err("error");
        assert_eq!(err.to_string(), "unsupported image format: (none)");
    }

    #[test]
    fn output_sits_next_to_source_by_default() {
        let dir = tempdir().expect("tempdir");
        let source = dir.path().join("shot.JPEG");
        File::create(&source).expect("file");
        let target = resolve_file(&source, None).expect("target");
        assert_eq!(target.output, dir.path().join("shot.webp"));
    }

    #[test]
    fn output_dir_is_created_and_reused() {
        let dir = tempdir().expect("tempdir");
        let source = dir.path().join("shot.png");
        File::create(&source).expect("file");
        let out_dir = dir.path().join("nested").join("out");
        let out_dir_str = out_dir.to_string_lossy().into_owned();

        let first = resolve_file(&source, Some(&out_dir_str)).expect("first");
        let second = resolve_file(&source, Some(&out_dir_str)).expect("second");
        assert!(out_dir.is_dir());
        assert_eq!(first.output, out_dir.join("shot.webp"));
        assert_eq!(first, second);
    }

    #[test]
    fn blank_output_dir_is_ignored() {
        let dir = tempdir().expect("tempdir");
        let source = dir.path().join("shot.png");
        File::create(&source).expect("file");
        let target = resolve_file(&source, Some("")).expect("target");
        assert_eq!(target.output, dir.path().join("shot.webp"));
    }

    #[test]
    fn data_uri_header_is_stripped() {
        assert_eq!(strip_data_uri("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("data:image/jpeg;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri("QUJD"), "QUJD");
        assert_eq!(
            strip_data_uri("data:image/svg+xml;base64,QUJD"),
            "data:image/svg+xml;base64,QUJD"
        );
    }

    #[test]
    fn base64_payload_decodes_and_creates_parent() {
        let dir = tempdir().expect("tempdir");
        let output = dir.path().join("deep").join("out.webp");
        let payload = format!("data:image/png;base64,{}", STANDARD.encode(b"hello"));
        let target =
            resolve_base64(&payload, &output.to_string_lossy()).expect("target");
        assert_eq!(target.bytes, b"hello");
        assert_eq!(target.output, output);
        assert!(dir.path().join("deep").is_dir());
    }

    #[test]
    fn unpadded_base64_is_accepted() {
        let dir = tempdir().expect("tempdir");
        let output = dir.path().join("out.webp");
        let target = resolve_base64("aGk", &output.to_string_lossy()).expect("target");
        assert_eq!(target.bytes, b"hi");
    }

    #[test]
    fn malformed_base64_is_decode_failure() {
        let dir = tempdir().expect("tempdir");
        let output = dir.path().join("out.webp");
        let err = resolve_base64("not@@@", &output.to_string_lossy()).expect_err("error");
        assert!(matches!(err, ConvertError::DecodeFailed(_)));
    }
}
