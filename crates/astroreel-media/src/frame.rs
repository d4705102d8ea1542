//! Still-frame composition: background, branding, content image, text.

use std::path::Path;

use astroreel_models::ContentItem;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::warn;

use crate::text::TextStyle;

/// Dark space-blue used when no branding background is available.
const BACKGROUND_COLOR: Rgba<u8> = Rgba([10, 10, 26, 255]);

/// Circular profile picture size and vertical position.
const PROFILE_SIZE: u32 = 400;
const PROFILE_Y: i64 = 200;

/// Content image bounding box and vertical position.
const CONTENT_MAX_SIZE: u32 = 600;
const CONTENT_Y: i64 = 700;

/// Branding watermark size and margin (branding-background mode).
const WATERMARK_SIZE: u32 = 150;
const WATERMARK_MARGIN: i64 = 30;

/// Title text vertical position, side padding and line cap.
const TEXT_Y: i32 = 1300;
const TEXT_SIDE_PADDING: i32 = 50;
const MAX_TEXT_LINES: usize = 3;

const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Geometry of the composed frame.
#[derive(Debug, Clone)]
pub struct FrameLayout {
    pub width: u32,
    pub height: u32,
    /// Branding image as full background plus watermark, instead of a
    /// dark background with a circular profile picture.
    pub use_branding_background: bool,
}

impl FrameLayout {
    pub fn new(width: u32, height: u32, use_branding_background: bool) -> Self {
        Self {
            width,
            height,
            use_branding_background,
        }
    }
}

/// Compose a single reel frame.
///
/// Every input is optional except the item itself: a missing branding
/// image degrades to a solid background, a missing content image leaves
/// the middle section empty, and a missing font skips the text overlay.
/// The output is always exactly `layout.width` x `layout.height`.
pub fn compose_frame(
    item: &ContentItem,
    branding_path: &Path,
    content_image_path: Option<&Path>,
    layout: &FrameLayout,
    text: &TextStyle,
) -> RgbaImage {
    let branding = load_rgba(branding_path);

    let mut frame = match (&branding, layout.use_branding_background) {
        (Some(img), true) => imageops::resize(img, layout.width, layout.height, FilterType::Lanczos3),
        _ => RgbaImage::from_pixel(layout.width, layout.height, BACKGROUND_COLOR),
    };

    match &branding {
        Some(img) if layout.use_branding_background => {
            // Small watermark top-right over the full-bleed background.
            let mark = thumbnail_rgba(img, WATERMARK_SIZE);
            let x = layout.width as i64 - mark.width() as i64 - WATERMARK_MARGIN;
            imageops::overlay(&mut frame, &mark, x, WATERMARK_MARGIN);
        }
        Some(img) => {
            let circle = circle_crop(img, PROFILE_SIZE);
            let x = (layout.width as i64 - circle.width() as i64) / 2;
            imageops::overlay(&mut frame, &circle, x, PROFILE_Y);
        }
        None => warn!("Branding image unavailable: {}", branding_path.display()),
    }

    if let Some(path) = content_image_path {
        match load_rgba(path) {
            Some(img) => {
                let thumb = thumbnail_rgba(&img, CONTENT_MAX_SIZE);
                let x = (layout.width as i64 - thumb.width() as i64) / 2;
                imageops::overlay(&mut frame, &thumb, x, CONTENT_Y);
            }
            None => warn!("Content image unreadable: {}", path.display()),
        }
    }

    let max_text_width = layout.width as i32 - 2 * TEXT_SIDE_PADDING;
    let mut lines = text.wrap(&item.title, max_text_width);
    lines.truncate(MAX_TEXT_LINES);
    text.draw_centered(&mut frame, &lines, TEXT_Y, TEXT_COLOR);

    frame
}

fn load_rgba(path: &Path) -> Option<RgbaImage> {
    if !path.exists() {
        return None;
    }
    match image::open(path) {
        Ok(img) => Some(img.to_rgba8()),
        Err(e) => {
            warn!("Failed to decode {}: {}", path.display(), e);
            None
        }
    }
}

/// Shrink preserving aspect ratio so the longer side fits `max_size`.
fn thumbnail_rgba(img: &RgbaImage, max_size: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w <= max_size && h <= max_size {
        return img.clone();
    }
    let scale = max_size as f64 / w.max(h) as f64;
    let nw = ((w as f64 * scale).round() as u32).max(1);
    let nh = ((h as f64 * scale).round() as u32).max(1);
    imageops::resize(img, nw, nh, FilterType::Lanczos3)
}

/// Resize to a square and zero the alpha of everything outside the
/// inscribed circle (elliptical mask of the shorter dimension).
fn circle_crop(img: &RgbaImage, size: u32) -> RgbaImage {
    let mut square = imageops::resize(img, size, size, FilterType::Lanczos3);
    let center = size as f64 / 2.0;
    let radius = center;

    for (x, y, pixel) in square.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - center;
        let dy = y as f64 + 0.5 - center;
        if dx * dx + dy * dy > radius * radius {
            pixel.0[3] = 0;
        }
    }
    square
}
