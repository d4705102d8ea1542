//! Rendered reel metadata.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reel width in pixels (9:16 portrait).
pub const REEL_WIDTH: u32 = 1080;

/// Reel height in pixels.
pub const REEL_HEIGHT: u32 = 1920;

/// A finished video file on disk together with its known parameters.
///
/// Created by the renderer; ownership transfers to the publisher for
/// upload. The orchestrator deletes the file after every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedReel {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub duration_secs: u32,
    pub size_bytes: u64,
}

impl RenderedReel {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }

    pub fn frame_count(&self) -> u32 {
        self.fps * self.duration_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_and_frame_count() {
        let reel = RenderedReel {
            path: PathBuf::from("/tmp/reel.mp4"),
            width: REEL_WIDTH,
            height: REEL_HEIGHT,
            fps: 30,
            duration_secs: 15,
            size_bytes: 2 * 1024 * 1024,
        };
        assert_eq!(reel.frame_count(), 450);
        assert!((reel.size_mb() - 2.0).abs() < f64::EPSILON);
    }
}
