//! Frame composition and video encoding for reels.
//!
//! This crate provides:
//! - Still-frame composition (background, branding, content image, text)
//! - An FFmpeg command builder and runner with subprocess timeout
//! - An in-process MJPEG/AVI fallback encoder
//! - Content image download
//! - Output validation against the upload size limit

pub mod avi;
pub mod command;
pub mod download;
pub mod error;
pub mod frame;
pub mod renderer;
pub mod text;

#[cfg(all(test, unix))]
pub(crate) mod test_support;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use frame::FrameLayout;
pub use renderer::{render, RenderOptions};
