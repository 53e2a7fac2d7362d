//! Frame encoding for the prediction request payload.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::camera::Frame;

/// JPEG quality used for every prediction upload.
pub const JPEG_QUALITY: u8 = 80;

/// Data URL prefix for the encoded payload.
const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Errors that can occur while encoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Frame buffer does not match its dimensions ({width}x{height})")]
    InvalidFrame { width: u32, height: u32 },

    #[error("JPEG encoding failed: {0}")]
    Jpeg(#[from] image::ImageError),
}

/// Encode a captured frame as a base64 JPEG data URL.
///
/// The frame is compressed at fixed quality; the result goes into the
/// `image` field of the prediction request body verbatim.
pub fn frame_to_data_url(frame: &Frame) -> Result<String, EncodeError> {
    let expected_len = frame.width as usize * frame.height as usize * frame.bytes_per_pixel();
    if frame.data.len() != expected_len || expected_len == 0 {
        return Err(EncodeError::InvalidFrame {
            width: frame.width,
            height: frame.height,
        });
    }

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder.encode(
        &frame.data,
        frame.width,
        frame.height,
        ExtendedColorType::Rgb8,
    )?;

    Ok(format!("{}{}", DATA_URL_PREFIX, BASE64.encode(&jpeg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FrameFormat;
    use base64::Engine as _;
    use std::time::Instant;

    fn rgb_frame(data: Vec<u8>, width: u32, height: u32) -> Frame {
        Frame {
            data,
            width,
            height,
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn test_data_url_has_jpeg_prefix_and_valid_base64() {
        let frame = rgb_frame(vec![128; 4 * 4 * 3], 4, 4);
        let url = frame_to_data_url(&frame).unwrap();

        assert!(url.starts_with("data:image/jpeg;base64,"));

        let payload = &url["data:image/jpeg;base64,".len()..];
        let bytes = BASE64.decode(payload).expect("payload should be base64");
        // JPEG SOI marker.
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_mismatched_buffer_is_rejected() {
        let frame = rgb_frame(vec![0; 5], 4, 4);
        let result = frame_to_data_url(&frame);
        assert!(matches!(
            result,
            Err(EncodeError::InvalidFrame {
                width: 4,
                height: 4
            })
        ));
    }

    #[test]
    fn test_empty_frame_is_rejected() {
        let frame = rgb_frame(Vec::new(), 0, 0);
        assert!(frame_to_data_url(&frame).is_err());
    }
}
