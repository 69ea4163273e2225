use super::error::ConvertError;
use image::DynamicImage;
use std::fs;
use std::path::Path;
use webp::Encoder;

/// The only codec knobs callers may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub quality: i64,
    pub lossless: bool,
}

/// Pixel-level transcoding to WebP. Implementations write the encoded image
/// to `output`, replacing any file already there.
pub trait Codec {
    fn transcode_file(
        &self,
        source: &Path,
        output: &Path,
        options: EncodeOptions,
    ) -> Result<(), ConvertError>;

    fn transcode_bytes(
        &self,
        bytes: &[u8],
        output: &Path,
        options: EncodeOptions,
    ) -> Result<(), ConvertError>;
}

/// libwebp encoder fed by the `image` decoders.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebpCodec;

impl Codec for WebpCodec {
    fn transcode_file(
        &self,
        source: &Path,
        output: &Path,
        options: EncodeOptions,
    ) -> Result<(), ConvertError> {
        let bytes = fs::read(source).map_err(|err| {
            ConvertError::filesystem(format!("failed to read {}", source.display()), err)
        })?;
        let image = image::load_from_memory(&bytes)
            .map_err(|err| ConvertError::Codec(format!("{}: {err}", source.display())))?;
        write_webp(&image, output, options)
    }

    fn transcode_bytes(
        &self,
        bytes: &[u8],
        output: &Path,
        options: EncodeOptions,
    ) -> Result<(), ConvertError> {
        let image = image::load_from_memory(bytes)
            .map_err(|err| ConvertError::DecodeFailed(err.to_string()))?;
        write_webp(&image, output, options)
    }
}

fn write_webp(
    image: &DynamicImage,
    output: &Path,
    options: EncodeOptions,
) -> Result<(), ConvertError> {
    let encoded = encode(image, options)?;
    fs::write(output, &encoded).map_err(|err| {
        ConvertError::Codec(format!("failed to write {}: {err}", output.display()))
    })
}

fn encode(image: &DynamicImage, options: EncodeOptions) -> Result<Vec<u8>, ConvertError> {
    let (width, height) = (image.width(), image.height());
    // libwebp only takes 8-bit RGB or RGBA buffers.
    let pixels = if image.color().has_alpha() {
        image.to_rgba8().into_raw()
    } else {
        image.to_rgb8().into_raw()
    };
    let encoder = if image.color().has_alpha() {
        Encoder::from_rgba(&pixels, width, height)
    } else {
        Encoder::from_rgb(&pixels, width, height)
    };

    let memory = encoder
        .encode_simple(options.lossless, options.quality as f32)
        .map_err(|err| {
            ConvertError::Codec(format!(
                "libwebp rejected the image (quality {}, lossless {}): {err:?}",
                options.quality, options.lossless
            ))
        })?;
    Ok(memory.to_vec())
}
