//! In-process fallback encoder: a still frame as an MJPEG/AVI file.
//!
//! Used when the external FFmpeg encoder is unavailable or fails. The
//! video is a single JPEG frame shown for the whole duration; every
//! index entry references the same frame chunk, so the file stays close
//! to the size of one JPEG instead of `frames x JPEG`.

use std::path::Path;

use crate::error::{MediaError, MediaResult};

/// AVIF_HASINDEX | AVIF_MUSTUSEINDEX: players must resolve frames
/// through idx1, which is what makes the shared-chunk trick valid.
const AVI_FLAGS: u32 = 0x10 | 0x20;

/// AVIIF_KEYFRAME; every MJPEG frame is independently decodable.
const INDEX_KEYFRAME: u32 = 0x10;

/// Write a fixed-frame MJPEG/AVI video.
///
/// `jpeg` must be a baseline JPEG of exactly `width` x `height` pixels.
pub fn write_still_video(
    path: impl AsRef<Path>,
    jpeg: &[u8],
    width: u32,
    height: u32,
    fps: u32,
    duration_secs: u32,
) -> MediaResult<()> {
    if fps == 0 || duration_secs == 0 {
        return Err(MediaError::EncodeFailed(
            "fps and duration must be non-zero".to_string(),
        ));
    }
    let frames = fps * duration_secs;
    let padded_len = jpeg.len() + jpeg.len() % 2;

    // avih: MainAVIHeader (56 bytes).
    let mut avih = Vec::with_capacity(56);
    put_u32(&mut avih, 1_000_000 / fps); // dwMicroSecPerFrame
    put_u32(&mut avih, jpeg.len() as u32 * fps); // dwMaxBytesPerSec
    put_u32(&mut avih, 0); // dwPaddingGranularity
    put_u32(&mut avih, AVI_FLAGS);
    put_u32(&mut avih, frames); // dwTotalFrames
    put_u32(&mut avih, 0); // dwInitialFrames
    put_u32(&mut avih, 1); // dwStreams
    put_u32(&mut avih, padded_len as u32); // dwSuggestedBufferSize
    put_u32(&mut avih, width);
    put_u32(&mut avih, height);
    avih.extend_from_slice(&[0u8; 16]); // dwReserved[4]

    // strh: AVISTREAMHEADER (56 bytes).
    let mut strh = Vec::with_capacity(56);
    strh.extend_from_slice(b"vids");
    strh.extend_from_slice(b"MJPG");
    put_u32(&mut strh, 0); // dwFlags
    put_u32(&mut strh, 0); // wPriority + wLanguage
    put_u32(&mut strh, 0); // dwInitialFrames
    put_u32(&mut strh, 1); // dwScale
    put_u32(&mut strh, fps); // dwRate
    put_u32(&mut strh, 0); // dwStart
    put_u32(&mut strh, frames); // dwLength
    put_u32(&mut strh, padded_len as u32); // dwSuggestedBufferSize
    put_u32(&mut strh, u32::MAX); // dwQuality (default)
    put_u32(&mut strh, 0); // dwSampleSize
    put_u16(&mut strh, 0); // rcFrame.left
    put_u16(&mut strh, 0); // rcFrame.top
    put_u16(&mut strh, width as u16); // rcFrame.right
    put_u16(&mut strh, height as u16); // rcFrame.bottom

    // strf: BITMAPINFOHEADER (40 bytes).
    let mut strf = Vec::with_capacity(40);
    put_u32(&mut strf, 40); // biSize
    put_u32(&mut strf, width); // biWidth
    put_u32(&mut strf, height); // biHeight
    put_u16(&mut strf, 1); // biPlanes
    put_u16(&mut strf, 24); // biBitCount
    strf.extend_from_slice(b"MJPG"); // biCompression
    put_u32(&mut strf, width * height * 3); // biSizeImage
    strf.extend_from_slice(&[0u8; 16]); // resolution/palette fields

    let strl = list(b"strl", &[chunk(b"strh", &strh), chunk(b"strf", &strf)].concat());
    let hdrl = list(b"hdrl", &[chunk(b"avih", &avih), strl].concat());

    // movi: the frame chunk is written once.
    let movi = list(b"movi", &chunk(b"00dc", jpeg));

    // idx1: one entry per displayed frame, all pointing at that chunk.
    // Offsets are relative to the "movi" fourcc; the first chunk sits
    // right after it, at offset 4.
    let mut idx = Vec::with_capacity(frames as usize * 16);
    for _ in 0..frames {
        idx.extend_from_slice(b"00dc");
        put_u32(&mut idx, INDEX_KEYFRAME);
        put_u32(&mut idx, 4);
        put_u32(&mut idx, jpeg.len() as u32);
    }
    let idx1 = chunk(b"idx1", &idx);

    let body = [b"AVI ".to_vec(), hdrl, movi, idx1].concat();
    let mut file = Vec::with_capacity(body.len() + 8);
    file.extend_from_slice(b"RIFF");
    put_u32(&mut file, body.len() as u32);
    file.extend_from_slice(&body);

    std::fs::write(path, file)?;
    Ok(())
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// A RIFF chunk: fourcc, little-endian size, payload, even padding.
fn chunk(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 9);
    out.extend_from_slice(id);
    put_u32(&mut out, payload.len() as u32);
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
    out
}

/// A RIFF LIST chunk wrapping `payload` under a list type fourcc.
fn list(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut inner = Vec::with_capacity(payload.len() + 4);
    inner.extend_from_slice(kind);
    inner.extend_from_slice(payload);
    chunk(b"LIST", &inner)
}
