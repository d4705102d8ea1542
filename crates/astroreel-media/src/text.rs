//! Font loading, text wrapping and drawing.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use tracing::{debug, warn};

/// System font candidates, tried in order. A missing font degrades to a
/// frame without a text overlay rather than failing the render.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Average glyph width as a fraction of the font size, used to estimate
/// line widths when no font could be loaded.
const FALLBACK_GLYPH_WIDTH: f32 = 0.55;

/// A font (when one was found) plus the size to draw at.
pub struct TextStyle {
    font: Option<Font<'static>>,
    pub scale: Scale,
}

impl TextStyle {
    /// Load the first available system font at the given pixel size.
    pub fn load(size: f32) -> Self {
        for candidate in FONT_CANDIDATES {
            if let Ok(data) = std::fs::read(candidate) {
                if let Some(font) = Font::try_from_vec(data) {
                    debug!("Loaded font {candidate}");
                    return Self {
                        font: Some(font),
                        scale: Scale::uniform(size),
                    };
                }
            }
        }
        warn!("No usable system font found, text overlay will be skipped");
        Self::without_font(size)
    }

    /// A style with no font; widths are estimated and drawing is a no-op.
    pub fn without_font(size: f32) -> Self {
        Self {
            font: None,
            scale: Scale::uniform(size),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Vertical step between wrapped lines.
    pub fn line_height(&self) -> i32 {
        (self.scale.y * 1.25) as i32
    }

    fn line_width(&self, text: &str) -> i32 {
        match &self.font {
            Some(font) => text_size(self.scale, font, text).0,
            None => (text.chars().count() as f32 * self.scale.x * FALLBACK_GLYPH_WIDTH) as i32,
        }
    }

    /// Greedy word wrap to fit `max_width`. A single word wider than the
    /// limit gets its own line rather than being split.
    pub fn wrap(&self, text: &str, max_width: i32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if self.line_width(&candidate) <= max_width || current.is_empty() {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Draw lines horizontally centered, starting at `top_y`.
    pub fn draw_centered(
        &self,
        frame: &mut RgbaImage,
        lines: &[String],
        top_y: i32,
        color: Rgba<u8>,
    ) {
        let Some(font) = &self.font else {
            return;
        };
        let frame_width = frame.width() as i32;
        for (i, line) in lines.iter().enumerate() {
            let width = text_size(self.scale, font, line).0;
            let x = (frame_width - width) / 2;
            let y = top_y + i as i32 * self.line_height();
            draw_text_mut(frame, color, x.max(0), y, self.scale, font, line);
        }
    }
}
