use crate::convert::{Codec, WebpCodec, convert_file};
use crate::request::{ConvertToWebpArgs, parse_args};
use crate::tools::{error_result, record_result};
use serde_json::{Value, json};

pub fn call(args: &Value) -> Value {
    call_with(&WebpCodec, args)
}

pub fn call_with(codec: &dyn Codec, args: &Value) -> Value {
    let args: ConvertToWebpArgs = match parse_args(args) {
        Ok(args) => args,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let record = convert_file(codec, &args.image_path, &args.settings());
    let structured = serde_json::to_value(&record).unwrap_or_else(|_| json!({}));
    record_result(&record, structured, !record.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::executor::tests::FakeCodec;
    use tempfile::tempdir;

    #[test]
    fn text_block_is_pretty_json_record() {
        let dir = tempdir().expect("tempdir");
        let source = dir.path().join("icon.PNG");
        std::fs::write(&source, b"png").expect("write");

        let result = call_with(
            &FakeCodec::default(),
            &json!({"image_path": source.to_string_lossy(), "quality": 90}),
        );

        assert_eq!(result["isError"], json!(false));
        let text = result["content"][0]["text"].as_str().expect("text");
        assert!(text.contains('\n'));
        let record: Value = serde_json::from_str(text).expect("json text");
        assert_eq!(record, result["structuredContent"]);
        assert_eq!(record["success"], json!(true));
        assert_eq!(record["quality"], json!(90));
        assert_eq!(
            record["output_path"],
            json!(dir.path().join("icon.webp").to_string_lossy())
        );
    }

    #[test]
    fn failure_record_marks_envelope_as_error() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("gone.jpg");

        let result = call_with(
            &FakeCodec::default(),
            &json!({"image_path": missing.to_string_lossy()}),
        );

        assert_eq!(result["isError"], json!(true));
        assert_eq!(result["structuredContent"]["success"], json!(false));
        assert_eq!(result["structuredContent"]["error_kind"], json!("not_found"));
    }

    #[test]
    fn missing_image_path_is_invalid_input() {
        let result = call_with(&FakeCodec::default(), &json!({"quality": 80}));
        assert_eq!(result["isError"], json!(true));
        assert_eq!(
            result["structuredContent"]["error"]["kind"],
            json!("invalid_input")
        );
    }
}
