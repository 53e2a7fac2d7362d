//! Frame conversion and transformation utilities.

use nokhwa::pixel_format::RgbFormat;
use std::time::Instant;

use super::types::{Frame, FrameFormat};

/// Convert a nokhwa buffer to an RGB [`Frame`].
///
/// nokhwa's `decode_image` handles whatever wire format the camera delivers
/// (MJPEG, YUYV, NV12, ...). Returns `None` on corrupt or unsupported data.
pub fn convert_to_rgb(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let decoded = buffer.decode_image::<RgbFormat>().ok()?;
    let resolution = buffer.resolution();

    Some(Frame {
        data: decoded.into_raw(),
        width: resolution.width(),
        height: resolution.height(),
        format: FrameFormat::Rgb,
        timestamp: Instant::now(),
    })
}

/// Mirror a frame horizontally (flip left-right) for selfie mode.
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width as usize;
    let bpp = frame.bytes_per_pixel();
    let row_len = width * bpp;

    for row in frame.data.chunks_exact_mut(row_len) {
        for x in 0..width / 2 {
            let left = x * bpp;
            let right = (width - 1 - x) * bpp;
            for channel in 0..bpp {
                row.swap(left + channel, right + channel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_mirror_swaps_row_endpoints() {
        // 3x1: red, green, blue becomes blue, green, red.
        let mut frame = rgb_frame(vec![255, 0, 0, 0, 255, 0, 0, 0, 255], 3, 1);
        mirror_horizontal(&mut frame);
        assert_eq!(frame.data, vec![0, 0, 255, 0, 255, 0, 255, 0, 0]);
    }

    #[test]
    fn test_mirror_is_per_row() {
        // 2x2 with distinct pixels; rows must flip independently.
        let mut frame = rgb_frame(
            vec![
                1, 1, 1, 2, 2, 2, // row 0
                3, 3, 3, 4, 4, 4, // row 1
            ],
            2,
            2,
        );
        mirror_horizontal(&mut frame);
        assert_eq!(
            frame.data,
            vec![
                2, 2, 2, 1, 1, 1, // row 0 flipped
                4, 4, 4, 3, 3, 3, // row 1 flipped
            ]
        );
    }

    #[test]
    fn test_mirror_twice_restores_frame() {
        let original = vec![9, 8, 7, 6, 5, 4, 3, 2, 1];
        let mut frame = rgb_frame(original.clone(), 3, 1);
        mirror_horizontal(&mut frame);
        mirror_horizontal(&mut frame);
        assert_eq!(frame.data, original);
    }

    #[test]
    fn test_mirror_single_pixel_unchanged() {
        let mut frame = rgb_frame(vec![10, 20, 30], 1, 1);
        mirror_horizontal(&mut frame);
        assert_eq!(frame.data, vec![10, 20, 30]);
    }
}
