use crate::convert::{Codec, WebpCodec, convert_base64};
use crate::request::{ConvertBase64ToWebpArgs, parse_args};
use crate::tools::{error_result, record_result};
use serde_json::{Value, json};

pub fn call(args: &Value) -> Value {
    call_with(&WebpCodec, args)
}

pub fn call_with(codec: &dyn Codec, args: &Value) -> Value {
    let args: ConvertBase64ToWebpArgs = match parse_args(args) {
        Ok(args) => args,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let record = convert_base64(
        codec,
        &args.base64_image,
        &args.output_path,
        args.quality,
        args.lossless,
    );
    let structured = serde_json::to_value(&record).unwrap_or_else(|_| json!({}));
    record_result(&record, structured, !record.is_success())
}
