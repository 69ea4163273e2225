pub const INVALID_INPUT: &str = "invalid_input";
pub const NOT_FOUND: &str = "not_found";
pub const UNSUPPORTED_FORMAT: &str = "unsupported_format";
pub const DECODE_FAILED: &str = "decode_failed";
pub const CODEC_ERROR: &str = "codec_error";
pub const FILESYSTEM_ERROR: &str = "filesystem_error";
pub const OUTPUT_COLLISION: &str = "output_collision";
pub const INTERNAL_ERROR: &str = "internal_error";

pub const METHOD_NOT_FOUND: i64 = -32601;
