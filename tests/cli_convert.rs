use image::{ImageFormat, Rgb, RgbImage};
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_convert_prints_record() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file_path = dir.path().join("sample.png");
    RgbImage::from_pixel(4, 4, Rgb([9, 9, 9])).save_with_format(&file_path, ImageFormat::Png)?;

    let output = Command::new(env!("CARGO_BIN_EXE_mcp-webp"))
        .args([
            "convert",
            "--path",
            file_path.to_string_lossy().as_ref(),
            "--quality",
            "60",
            "--keep-original",
        ])
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let record: serde_json::Value = serde_json::from_str(stdout.trim())?;
    assert_eq!(record.get("success").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(record.get("quality").and_then(|v| v.as_i64()), Some(60));
    assert!(file_path.exists());
    assert!(dir.path().join("sample.webp").exists());
    Ok(())
}

#[test]
fn cli_convert_missing_file_exits_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let missing = dir.path().join("nope.png");

    let output = Command::new(env!("CARGO_BIN_EXE_mcp-webp"))
        .args(["convert", "--path", missing.to_string_lossy().as_ref()])
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("input file is missing"));
    Ok(())
}

#[test]
fn cli_batch_convert_reports_every_item() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let good = dir.path().join("good.jpg");
    RgbImage::from_pixel(4, 4, Rgb([9, 9, 9])).save_with_format(&good, ImageFormat::Jpeg)?;
    let missing = dir.path().join("missing.jpg");

    let output = Command::new(env!("CARGO_BIN_EXE_mcp-webp"))
        .args([
            "batch-convert",
            good.to_string_lossy().as_ref(),
            missing.to_string_lossy().as_ref(),
        ])
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let records: Vec<serde_json::Value> = serde_json::from_str(stdout.trim())?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("success").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(records[1].get("success").and_then(|v| v.as_bool()), Some(false));
    Ok(())
}
