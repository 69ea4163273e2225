use crate::convert::{Codec, WebpCodec, convert_batch};
use crate::request::{BatchConvertToWebpArgs, parse_args};
use crate::tools::{error_result, record_result};
use serde_json::{Value, json};

pub fn call(args: &Value) -> Value {
    call_with(&WebpCodec, args)
}

/// Item failures live inside the records; the envelope is only an error when
/// the arguments themselves are unusable.
pub fn call_with(codec: &dyn Codec, args: &Value) -> Value {
    let args: BatchConvertToWebpArgs = match parse_args(args) {
        Ok(args) => args,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let records = convert_batch(codec, &args.image_paths, &args.settings());
    let structured = json!({ "results": records });
    record_result(&records, structured, false)
}
