// ============================================================================
// PIXEL CANVAS & LABEL FONT
// ============================================================================

use std::path::{Path, PathBuf};

use rusttype::{point, Font, PositionedGlyph, Scale};
use tracing::{debug, info};

use crate::config::Color;
use crate::error::ThermometerError;
use crate::layout::Rect;
use crate::scene::{Surface, TextMetrics};

/// Places a sans-serif font usually lives, tried in order.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// The font every label is drawn and measured with
pub struct LabelFont {
    font: Font<'static>,
}

impl LabelFont {
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(data).map(|font| Self { font })
    }

    pub fn load(path: &Path) -> Result<Self, ThermometerError> {
        let data = std::fs::read(path)?;
        let font =
            Self::from_bytes(data).ok_or_else(|| ThermometerError::InvalidFont(path.to_path_buf()))?;
        info!(path = %path.display(), "loaded label font");
        Ok(font)
    }

    /// Load `path` if given, otherwise the first parsable font found in the
    /// usual system locations.
    pub fn discover(path: Option<&Path>) -> Result<Self, ThermometerError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        FONT_SEARCH_PATHS
            .iter()
            .map(PathBuf::from)
            .filter(|candidate| candidate.is_file())
            .find_map(|candidate| match Self::load(&candidate) {
                Ok(font) => Some(font),
                Err(err) => {
                    debug!(path = %candidate.display(), %err, "skipping font");
                    None
                }
            })
            .ok_or(ThermometerError::FontNotFound)
    }

    fn glyphs(&self, text: &str, size: f64, x: f32, baseline: f32) -> Vec<PositionedGlyph<'_>> {
        self.font
            .layout(text, Scale::uniform(size as f32), point(x, baseline))
            .collect()
    }
}

impl TextMetrics for LabelFont {
    fn text_width(&self, text: &str, size: f64) -> f64 {
        let glyphs = self.glyphs(text, size, 0.0, 0.0);
        match (glyphs.first(), glyphs.last()) {
            (Some(first), Some(last)) => f64::from(
                last.position().x - first.position().x
                    + last.unpositioned().h_metrics().advance_width,
            ),
            _ => 0.0,
        }
    }

    fn line_height(&self, size: f64) -> f64 {
        let v_metrics = self.font.v_metrics(Scale::uniform(size as f32));
        f64::from(v_metrics.ascent - v_metrics.descent + v_metrics.line_gap)
    }
}

/// An RGBA8 frame the scene is rasterized into. All coordinates handed to
/// the drawing methods are shifted by `origin`.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    origin: (f64, f64),
    font: Option<&'a LabelFont>,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
            origin: (0.0, 0.0),
            font: None,
        }
    }

    /// Text is only drawn, and only measures non-zero, once a font is set.
    pub fn with_font(mut self, font: &'a LabelFont) -> Self {
        self.font = Some(font);
        self
    }

    /// Translate subsequent drawing by `(x, y)`.
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.origin = (x, y);
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Pixel span covered by `rect` after translation, clipped to the frame.
    fn span(&self, rect: Rect) -> (i32, i32, i32, i32) {
        let x0 = (rect.x + self.origin.0).floor().max(0.0) as i32;
        let y0 = (rect.y + self.origin.1).floor().max(0.0) as i32;
        let x1 = (rect.right() + self.origin.0).ceil().min(self.width as f64) as i32;
        let y1 = (rect.bottom() + self.origin.1).ceil().min(self.height as f64) as i32;
        (x0, y0, x1, y1)
    }

    /// Fill `rect` with `coverage(px, py)` evaluated at each pixel centre, in
    /// widget coordinates.
    fn fill_with(&mut self, rect: Rect, color: Color, coverage: impl Fn(f64, f64) -> f64) {
        if rect.is_empty() {
            return;
        }
        let (x0, y0, x1, y1) = self.span(rect);
        for y in y0..y1 {
            for x in x0..x1 {
                let px = f64::from(x) + 0.5 - self.origin.0;
                let py = f64::from(y) + 0.5 - self.origin.1;
                let alpha = coverage(px, py).clamp(0.0, 1.0);
                if alpha > 0.01 {
                    set_pixel(self.frame, self.width, x as usize, y as usize, color, alpha as f32);
                }
            }
        }
    }
}

impl TextMetrics for Canvas<'_> {
    fn text_width(&self, text: &str, size: f64) -> f64 {
        self.font.map_or(0.0, |font| font.text_width(text, size))
    }

    fn line_height(&self, size: f64) -> f64 {
        self.font.map_or(0.0, |font| font.line_height(size))
    }
}

impl Surface for Canvas<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        // Partial coverage along the edges keeps fractional rectangles crisp
        self.fill_with(rect, color, |px, py| {
            let cx = (px + 0.5).min(rect.right()) - (px - 0.5).max(rect.x);
            let cy = (py + 0.5).min(rect.bottom()) - (py - 0.5).max(rect.y);
            cx.clamp(0.0, 1.0) * cy.clamp(0.0, 1.0)
        });
    }

    fn fill_round_rect(&mut self, rect: Rect, arc: f64, color: Color) {
        let radius = (arc / 2.0).min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        let inner = Rect::new(
            rect.x + radius,
            rect.y + radius,
            rect.width - 2.0 * radius,
            rect.height - 2.0 * radius,
        );
        self.fill_with(rect, color, |px, py| {
            let dx = px - px.clamp(inner.x, inner.right());
            let dy = py - py.clamp(inner.y, inner.bottom());
            let dist = (dx * dx + dy * dy).sqrt();
            radius - dist + 0.5
        });
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Color) {
        let (rx, ry) = (rect.width / 2.0, rect.height / 2.0);
        let (cx, cy) = (rect.center_x(), rect.center_y());
        let edge = rx.min(ry);
        self.fill_with(rect, color, |px, py| {
            let nx = (px - cx) / rx;
            let ny = (py - cy) / ry;
            let dist = (nx * nx + ny * ny).sqrt();
            (1.0 - dist) * edge + 0.5
        });
    }

    fn draw_text(&mut self, x: f64, baseline: f64, text: &str, size: f64, color: Color) {
        let Some(font) = self.font else {
            return;
        };
        if size <= 0.0 || text.is_empty() {
            return;
        }
        let x = (x + self.origin.0) as f32;
        let baseline = (baseline + self.origin.1) as f32;
        for glyph in font.glyphs(text, size, x, baseline) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                let (width, height) = (self.width as i32, self.height as i32);
                let frame = &mut *self.frame;
                glyph.draw(|gx, gy, v| {
                    let px = bb.min.x + gx as i32;
                    let py = bb.min.y + gy as i32;
                    if px >= 0 && px < width && py >= 0 && py < height && v > 0.001 {
                        set_pixel(frame, width as usize, px as usize, py as usize, color, v);
                    }
                });
            }
        }
    }

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, thickness: f64, color: Color) {
        let (x0, y0) = (x0 + self.origin.0, y0 + self.origin.1);
        let (x1, y1) = (x1 + self.origin.0, y1 + self.origin.1);
        let pad = thickness.ceil() + 1.0;
        let min_x = (x0.min(x1) - pad).floor().max(0.0) as i32;
        let max_x = (x0.max(x1) + pad).ceil().min(self.width as f64 - 1.0) as i32;
        let min_y = (y0.min(y1) - pad).floor().max(0.0) as i32;
        let max_y = (y0.max(y1) + pad).ceil().min(self.height as f64 - 1.0) as i32;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = dx * dx + dy * dy;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (px, py) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                let t = if len_sq > 0.0 {
                    (((px - x0) * dx + (py - y0) * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (lx, ly) = (x0 + t * dx, y0 + t * dy);
                let dist = ((lx - px).powi(2) + (ly - py).powi(2)).sqrt();
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    set_pixel(self.frame, self.width, x as usize, y as usize, color, aa as f32);
                }
            }
        }
    }
}

fn set_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, color: Color, alpha: f32) {
    if x < width && y < frame.len() / (width * 4) {
        let idx = (y * width + x) * 4;
        let src = [f32::from(color.r), f32::from(color.g), f32::from(color.b)];
        let a = alpha.clamp(0.0, 1.0);
        let mut out = [0xff; 4];
        for channel in 0..3 {
            let dst = f32::from(frame[idx + channel]);
            out[channel] = (src[channel] * a + dst * (1.0 - a)).round() as u8;
        }
        frame[idx..idx + 4].copy_from_slice(&out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_pixel_blends_and_clips() {
        let mut frame = vec![0xff; 2 * 2 * 4];
        set_pixel(&mut frame, 2, 0, 0, Color::BLACK, 1.0);
        assert_eq!(&frame[0..4], &[0, 0, 0, 0xff]);
        set_pixel(&mut frame, 2, 1, 0, Color::BLACK, 0.5);
        assert_eq!(&frame[4..8], &[128, 128, 128, 0xff]);
        // outside the frame
        set_pixel(&mut frame, 2, 5, 5, Color::BLACK, 1.0);
        assert_eq!(frame.len(), 16);
    }

    #[test]
    fn missing_font_file_is_an_io_error() {
        let err = LabelFont::load(Path::new("/nonexistent/font.ttf"))
            .err()
            .expect("loading must fail");
        assert!(matches!(err, ThermometerError::Io(_)));
    }

    #[test]
    fn rect_fill_is_translated_by_origin() {
        let mut frame = vec![0xff; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4);
        canvas.set_origin(1.0, 2.0);
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        let idx = (2 * 4 + 1) * 4;
        assert_eq!(&frame[idx..idx + 3], &[0, 0, 0]);
        let painted = frame.chunks_exact(4).filter(|px| px[0] == 0).count();
        assert_eq!(painted, 1);
    }

    #[test]
    fn empty_shapes_paint_nothing() {
        let mut frame = vec![0xff; 8 * 8 * 4];
        let mut canvas = Canvas::new(&mut frame, 8, 8);
        canvas.fill_rect(Rect::new(2.0, 2.0, 0.0, 5.0), Color::BLACK);
        canvas.fill_round_rect(Rect::new(2.0, 2.0, 0.0, 0.0), 0.0, Color::BLACK);
        canvas.fill_ellipse(Rect::new(4.0, 4.0, 0.0, 0.0), Color::BLACK);
        canvas.draw_text(1.0, 5.0, "42", 12.0, Color::BLACK);
        assert!(frame.iter().all(|&b| b == 0xff));
    }

    #[test]
    fn ellipse_covers_its_centre_not_its_corners() {
        let mut frame = vec![0xff; 10 * 10 * 4];
        let mut canvas = Canvas::new(&mut frame, 10, 10);
        canvas.fill_ellipse(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK);
        let at = |x: usize, y: usize| frame[(y * 10 + x) * 4];
        assert_eq!(at(5, 5), 0);
        assert_eq!(at(0, 0), 0xff);
        assert_eq!(at(9, 9), 0xff);
    }

    #[test]
    fn garbage_is_not_a_font() {
        assert!(LabelFont::from_bytes(vec![0, 1, 2, 3]).is_none());
    }
}
