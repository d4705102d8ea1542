//! Top-level reel rendering: compose one frame, encode it as a video.

use std::path::PathBuf;

use astroreel_models::{ContentItem, RenderedReel, REEL_HEIGHT, REEL_WIDTH};
use image::codecs::jpeg::JpegEncoder;
use image::ColorType;
use tracing::{info, warn};

use crate::avi::write_still_video;
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::download::fetch_image;
use crate::error::{MediaError, MediaResult};
use crate::frame::{compose_frame, FrameLayout};
use crate::text::TextStyle;

/// JPEG quality for the composed frame.
const FRAME_JPEG_QUALITY: u8 = 90;

/// How many recent JPEGs to keep in the work dir between runs.
const KEEP_RECENT_JPEGS: usize = 2;

/// Rendering parameters, resolved once from settings.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub duration_secs: u32,
    /// Use the branding image as a full background (with watermark)
    /// instead of a circular profile picture on a dark background.
    pub use_branding_background: bool,
    pub branding_path: PathBuf,
    pub work_dir: PathBuf,
    /// Remote service upload limit; outputs over this fail the render.
    pub max_output_bytes: u64,
    /// Sanity floor; an output below this is considered corrupt.
    pub min_output_bytes: u64,
    pub ffmpeg_timeout_secs: u64,
    pub title_text_size: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: REEL_WIDTH,
            height: REEL_HEIGHT,
            fps: 30,
            duration_secs: 15,
            use_branding_background: false,
            branding_path: PathBuf::from("profile_pic.jpg"),
            work_dir: PathBuf::from("output"),
            max_output_bytes: 100 * 1024 * 1024,
            min_output_bytes: 1024,
            ffmpeg_timeout_secs: 60,
            title_text_size: 44.0,
        }
    }
}

/// Render a reel for the given content item.
///
/// A missing content image or branding image degrades the frame, never
/// the run; encoder failures fall back from FFmpeg to the in-process
/// writer. Oversized output is deleted and reported as an error.
pub async fn render(item: &ContentItem, opts: &RenderOptions) -> MediaResult<RenderedReel> {
    tokio::fs::create_dir_all(&opts.work_dir).await?;

    let content_image = match item.image_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => {
            let dest = opts.work_dir.join("content_image.jpg");
            match fetch_image(&reqwest::Client::new(), url, &dest).await {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Content image unavailable, rendering without it: {e}");
                    None
                }
            }
        }
        None => None,
    };

    let layout = FrameLayout::new(opts.width, opts.height, opts.use_branding_background);
    let text = TextStyle::load(opts.title_text_size);
    let frame = compose_frame(
        item,
        &opts.branding_path,
        content_image.as_deref(),
        &layout,
        &text,
    );

    let frame_rgb = image::DynamicImage::ImageRgba8(frame).to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, FRAME_JPEG_QUALITY).encode(
        frame_rgb.as_raw(),
        opts.width,
        opts.height,
        ColorType::Rgb8,
    )?;

    let frame_path = opts.work_dir.join("reel_frame.jpg");
    tokio::fs::write(&frame_path, &jpeg).await?;

    // The previous run's reel must be gone before a new one appears.
    let mp4_path = opts.work_dir.join("reel.mp4");
    let avi_path = opts.work_dir.join("reel.avi");
    for stale in [&mp4_path, &avi_path] {
        if stale.exists() {
            tokio::fs::remove_file(stale).await?;
        }
    }

    let cmd = FfmpegCommand::new(&frame_path, &mp4_path)
        .loop_image()
        .duration(opts.duration_secs)
        .frame_rate(opts.fps)
        .scale_pad(opts.width, opts.height)
        .video_codec("libx264")
        .pixel_format("yuv420p")
        .preset("medium")
        .no_audio();

    let output = match FfmpegRunner::new()
        .with_timeout(opts.ffmpeg_timeout_secs)
        .run(&cmd)
        .await
    {
        Ok(()) => {
            info!("Encoded reel with ffmpeg: {}", mp4_path.display());
            mp4_path
        }
        Err(e) if e.wants_fallback_encoder() => {
            warn!("FFmpeg unavailable or failed ({e}), using in-process encoder");
            // A failed ffmpeg run can leave a partial mp4 behind; only
            // one reel may exist on disk at a time.
            if mp4_path.exists() {
                tokio::fs::remove_file(&mp4_path).await?;
            }
            write_still_video(
                &avi_path,
                &jpeg,
                opts.width,
                opts.height,
                opts.fps,
                opts.duration_secs,
            )?;
            info!("Encoded reel in-process: {}", avi_path.display());
            avi_path
        }
        Err(e) => return Err(e),
    };

    prune_jpegs(&opts.work_dir, KEEP_RECENT_JPEGS);

    let size_bytes = match tokio::fs::metadata(&output).await {
        Ok(meta) => meta.len(),
        Err(_) => return Err(MediaError::FileNotFound(output)),
    };
    if size_bytes > opts.max_output_bytes {
        let _ = tokio::fs::remove_file(&output).await;
        return Err(MediaError::TooLarge {
            size_bytes,
            limit_bytes: opts.max_output_bytes,
        });
    }
    if size_bytes < opts.min_output_bytes {
        let _ = tokio::fs::remove_file(&output).await;
        return Err(MediaError::TooSmall { size_bytes });
    }

    Ok(RenderedReel {
        path: output,
        width: opts.width,
        height: opts.height,
        fps: opts.fps,
        duration_secs: opts.duration_secs,
        size_bytes,
    })
}

/// Remove old JPEGs from the work dir, keeping the most recent few.
fn prune_jpegs(dir: &std::path::Path, keep_recent: usize) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut jpegs: Vec<(std::time::SystemTime, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "jpg") {
                let modified = entry.metadata().ok()?.modified().ok()?;
                Some((modified, path))
            } else {
                None
            }
        })
        .collect();
    jpegs.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, path) in jpegs.into_iter().skip(keep_recent) {
        if let Err(e) = std::fs::remove_file(&path) {
            warn!("Failed to prune {}: {e}", path.display());
        }
    }
}
