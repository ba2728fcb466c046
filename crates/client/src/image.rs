//! Input image preparation for image-to-3D requests.
//!
//! The remote API takes a base64 payload with a hard size limit, so raw
//! host images are normalized first: decoded, composited onto white (the
//! service treats transparency as background), downscaled so the longest
//! edge fits [`MAX_IMAGE_EDGE`], and re-encoded as JPEG.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::error::ClientError;

/// Longest edge of the submitted image, in pixels.
pub const MAX_IMAGE_EDGE: u32 = 1024;

/// JPEG quality of the re-encoded payload.
pub const JPEG_QUALITY: u8 = 85;

/// Encoded payload size above which a warning is logged (the documented
/// remote limit is 4 MiB).
pub const PAYLOAD_WARN_BYTES: usize = 4 * 1024 * 1024;

/// Normalize raw image bytes into the base64 payload the API expects.
///
/// Accepts any format the `image` crate is built with (png/jpeg/webp/bmp).
/// Fails with [`ClientError::Submission`] when the bytes are not a
/// decodable image — nothing is sent over the network in that case.
pub fn encode_image_payload(bytes: &[u8]) -> Result<String, ClientError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ClientError::Submission(format!("Unsupported input image: {e}")))?;

    let decoded = if decoded.width().max(decoded.height()) > MAX_IMAGE_EDGE {
        tracing::debug!(
            width = decoded.width(),
            height = decoded.height(),
            "Downscaling input image",
        );
        decoded.resize(MAX_IMAGE_EDGE, MAX_IMAGE_EDGE, FilterType::Lanczos3)
    } else {
        decoded
    };

    let flattened = flatten_onto_white(&decoded);

    let mut jpeg = Vec::new();
    flattened
        .write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY))
        .map_err(|e| ClientError::Submission(format!("Failed to encode image payload: {e}")))?;

    let payload = BASE64.encode(&jpeg);
    if payload.len() > PAYLOAD_WARN_BYTES {
        tracing::warn!(
            payload_bytes = payload.len(),
            limit = PAYLOAD_WARN_BYTES,
            "Encoded image payload exceeds the documented API limit",
        );
    }

    Ok(payload)
}

/// Composite an image onto a white background, dropping alpha.
fn flatten_onto_white(img: &image::DynamicImage) -> image::RgbImage {
    let rgba = img.to_rgba8();
    let mut rgb = image::RgbImage::new(rgba.width(), rgba.height());

    for (x, y, px) in rgba.enumerate_pixels() {
        let a = px[3] as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a)) / 255) as u8;
        rgb.put_pixel(x, y, image::Rgb([blend(px[0]), blend(px[1]), blend(px[2])]));
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;

    fn png_bytes(width: u32, height: u32, pixel: image::Rgba<u8>) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, pixel);
        let mut out = Vec::new();
        img.write_with_encoder(PngEncoder::new(&mut out)).unwrap();
        out
    }

    fn decode_payload(payload: &str) -> image::DynamicImage {
        let jpeg = BASE64.decode(payload).unwrap();
        image::load_from_memory(&jpeg).unwrap()
    }

    #[test]
    fn small_image_keeps_dimensions() {
        let payload =
            encode_image_payload(&png_bytes(64, 48, image::Rgba([10, 20, 30, 255]))).unwrap();
        let round_tripped = decode_payload(&payload);
        assert_eq!(round_tripped.width(), 64);
        assert_eq!(round_tripped.height(), 48);
    }

    #[test]
    fn oversized_image_is_downscaled_preserving_aspect() {
        let payload =
            encode_image_payload(&png_bytes(2000, 1000, image::Rgba([10, 20, 30, 255]))).unwrap();
        let round_tripped = decode_payload(&payload);
        assert_eq!(round_tripped.width(), MAX_IMAGE_EDGE);
        assert_eq!(round_tripped.height(), MAX_IMAGE_EDGE / 2);
    }

    #[test]
    fn transparency_flattens_to_white() {
        let payload =
            encode_image_payload(&png_bytes(8, 8, image::Rgba([0, 0, 0, 0]))).unwrap();
        let round_tripped = decode_payload(&payload).to_rgb8();
        // JPEG is lossy; fully transparent input must still come back
        // near-white rather than near-black.
        let px = round_tripped.get_pixel(4, 4);
        assert!(px[0] > 240 && px[1] > 240 && px[2] > 240, "pixel = {px:?}");
    }

    #[test]
    fn garbage_bytes_rejected_as_submission_error() {
        let result = encode_image_payload(b"not an image at all");
        assert!(matches!(result, Err(ClientError::Submission(_))));
    }

    #[test]
    fn payload_is_valid_base64() {
        let payload =
            encode_image_payload(&png_bytes(16, 16, image::Rgba([200, 10, 10, 255]))).unwrap();
        assert!(BASE64.decode(&payload).is_ok());
    }
}
