//! Half-block cell composition of camera frames and detection overlays.
//!
//! The video area renders as `▀` characters: each terminal cell carries two
//! vertically stacked color samples (foreground = top, background = bottom),
//! doubling the effective vertical resolution. Detection boxes are stroked
//! into the same sample grid and labels composited over the finished cells,
//! so video and overlay share one coordinate transform and stay aligned at
//! any terminal size.
//!
//! The grid is rebuilt from scratch on every draw; an empty detection list
//! therefore yields a clean frame with no leftover shapes.

use crate::camera::Frame;
use crate::overlay::BoxShape;

/// RGB color of one downsampled sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Stroke and label color for detection overlays.
pub const OVERLAY_COLOR: CellColor = CellColor {
    r: 0x34,
    g: 0xd3,
    b: 0x99,
};

/// Fill color while no frame has been captured yet.
const BLANK_COLOR: CellColor = CellColor {
    r: 0x10,
    g: 0x10,
    b: 0x10,
};

/// Upper half block: foreground paints the top sample, background the bottom.
const HALF_BLOCK: char = '▀';

/// One composed terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoCell {
    pub ch: char,
    pub fg: CellColor,
    pub bg: CellColor,
}

/// Composed cell grid for the video area.
#[derive(Debug, Clone)]
pub struct VideoGrid {
    cells: Vec<VideoCell>,
    width: u16,
    height: u16,
}

impl VideoGrid {
    /// Compose one full video grid: frame samples, then box strokes in
    /// input order (later boxes over earlier ones), then labels.
    pub fn compose(
        frame: Option<&Frame>,
        shapes: &[BoxShape],
        frame_dims: (u32, u32),
        cols: u16,
        rows: u16,
    ) -> Self {
        let sample_rows = rows as usize * 2;
        let mut samples = sample_frame(frame, cols, rows);

        for shape in shapes {
            stroke_box(&mut samples, cols as usize, sample_rows, shape, frame_dims);
        }

        let mut grid = cells_from_samples(&samples, cols, rows);

        for shape in shapes {
            grid.draw_label(shape, frame_dims);
        }

        grid
    }

    /// Grid width in terminal columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in terminal rows.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Cell at `(x, y)`, row-major.
    pub fn cell(&self, x: u16, y: u16) -> &VideoCell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Composite one label's characters over the finished cells.
    fn draw_label(&mut self, shape: &BoxShape, frame_dims: (u32, u32)) {
        let (frame_w, frame_h) = frame_dims;
        if frame_w == 0 || frame_h == 0 || self.width == 0 || self.height == 0 {
            return;
        }

        let cols = self.width as usize;
        let rows = self.height as usize;

        let col = (((shape.label_x / frame_w as f64) * cols as f64).floor().max(0.0) as usize)
            .min(cols - 1);
        let row = (((shape.label_y / frame_h as f64) * rows as f64).floor().max(0.0) as usize)
            .min(rows - 1);

        for (i, ch) in shape.label.chars().enumerate() {
            let x = col + i;
            if x >= cols {
                break;
            }
            let cell = &mut self.cells[row * cols + x];
            cell.ch = ch;
            cell.fg = OVERLAY_COLOR;
        }
    }
}

/// Downsample a frame into `cols x (rows * 2)` color samples by averaging
/// each sample's pixel region. Without a frame, every sample is the blank
/// fill color.
fn sample_frame(frame: Option<&Frame>, cols: u16, rows: u16) -> Vec<CellColor> {
    let sample_rows = rows as usize * 2;
    let total = cols as usize * sample_rows;

    let frame = match frame {
        Some(f) if f.width > 0 && f.height > 0 && cols > 0 && rows > 0 => f,
        _ => return vec![BLANK_COLOR; total],
    };

    let cell_w = frame.width as f64 / cols as f64;
    let cell_h = frame.height as f64 / sample_rows as f64;
    let bpp = frame.bytes_per_pixel();

    let mut samples = Vec::with_capacity(total);
    for sy in 0..sample_rows {
        for sx in 0..cols as usize {
            let x_start = (sx as f64 * cell_w) as u32;
            let x_end = (((sx + 1) as f64 * cell_w) as u32)
                .max(x_start + 1)
                .min(frame.width);
            let y_start = (sy as f64 * cell_h) as u32;
            let y_end = (((sy + 1) as f64 * cell_h) as u32)
                .max(y_start + 1)
                .min(frame.height);

            let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
            for py in y_start..y_end {
                for px in x_start..x_end {
                    let idx = (py as usize * frame.width as usize + px as usize) * bpp;
                    if idx + 2 < frame.data.len() {
                        r += frame.data[idx] as u64;
                        g += frame.data[idx + 1] as u64;
                        b += frame.data[idx + 2] as u64;
                        count += 1;
                    }
                }
            }

            samples.push(if count > 0 {
                CellColor {
                    r: (r / count) as u8,
                    g: (g / count) as u8,
                    b: (b / count) as u8,
                }
            } else {
                BLANK_COLOR
            });
        }
    }
    samples
}

/// Map a pixel-space box onto the sample grid as a half-open rectangle.
///
/// Boxes thinner than one sample still occupy one, so small detections stay
/// visible.
fn to_sample_rect(
    shape: &BoxShape,
    frame_dims: (u32, u32),
    cols: usize,
    sample_rows: usize,
) -> Option<(usize, usize, usize, usize)> {
    let (frame_w, frame_h) = frame_dims;
    if frame_w == 0 || frame_h == 0 || cols == 0 || sample_rows == 0 {
        return None;
    }

    let scale_x = cols as f64 / frame_w as f64;
    let scale_y = sample_rows as f64 / frame_h as f64;

    let x0 = ((shape.x * scale_x).floor().max(0.0) as usize).min(cols - 1);
    let y0 = ((shape.y * scale_y).floor().max(0.0) as usize).min(sample_rows - 1);
    let x1 = (((shape.x + shape.width) * scale_x).ceil().max(0.0) as usize).clamp(x0 + 1, cols);
    let y1 = (((shape.y + shape.height) * scale_y).ceil().max(0.0) as usize)
        .clamp(y0 + 1, sample_rows);

    Some((x0, y0, x1, y1))
}

/// Stroke a box outline into the sample grid.
fn stroke_box(
    samples: &mut [CellColor],
    cols: usize,
    sample_rows: usize,
    shape: &BoxShape,
    frame_dims: (u32, u32),
) {
    let Some((x0, y0, x1, y1)) = to_sample_rect(shape, frame_dims, cols, sample_rows) else {
        return;
    };

    for x in x0..x1 {
        samples[y0 * cols + x] = OVERLAY_COLOR;
        samples[(y1 - 1) * cols + x] = OVERLAY_COLOR;
    }
    for y in y0..y1 {
        samples[y * cols + x0] = OVERLAY_COLOR;
        samples[y * cols + (x1 - 1)] = OVERLAY_COLOR;
    }
}

/// Pair up vertically adjacent samples into half-block cells.
fn cells_from_samples(samples: &[CellColor], cols: u16, rows: u16) -> VideoGrid {
    let width = cols as usize;
    let mut cells = Vec::with_capacity(width * rows as usize);

    for row in 0..rows as usize {
        for col in 0..width {
            let top = samples[(row * 2) * width + col];
            let bottom = samples[(row * 2 + 1) * width + col];
            cells.push(VideoCell {
                ch: HALF_BLOCK,
                fg: top,
                bg: bottom,
            });
        }
    }

    VideoGrid {
        cells,
        width: cols,
        height: rows,
    }
}
