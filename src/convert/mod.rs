//! PNG/JPEG to WebP conversion: path resolution, codec invocation, source
//! retention and result records.

pub mod batch;
pub mod codec;
pub mod error;
pub mod executor;
pub mod record;
pub mod resolve;

pub use batch::convert_batch;
pub use codec::{Codec, WebpCodec};
pub use executor::{FileSettings, convert_base64, convert_file};
