// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! A camera made of still images.
//!
//! The feed cycles through the images of one directory in file-name order.
//! Each snapshot is scaled to the capture surface width (height keeps the
//! aspect ratio) and exported as JPEG, which is what the vision service
//! decodes.

use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};

use cube_session::{CaptureError, MediaSource};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info};

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Media source backed by a directory of frames.
#[derive(Debug)]
pub struct FrameDirCamera {
    frames: Vec<PathBuf>,
    cursor: usize,
    live: bool,
}

impl FrameDirCamera {
    /// Camera over an explicit, non-empty list of frames.
    pub fn new(frames: Vec<PathBuf>) -> Self {
        Self {
            frames,
            cursor: 0,
            live: true,
        }
    }
}

fn is_frame(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn open_error(dir: &Path, err: &std::io::Error) -> CaptureError {
    let what = format!("{}: {err}", dir.display());
    if err.kind() == ErrorKind::PermissionDenied {
        CaptureError::Denied(what)
    } else {
        CaptureError::Unsupported(what)
    }
}

/// Open the camera feed rooted at `dir`.
pub async fn acquire(dir: Option<PathBuf>) -> Result<Box<dyn MediaSource>, CaptureError> {
    let Some(dir) = dir else {
        return Err(CaptureError::Unsupported(
            "no frame directory configured (use --frames)".into(),
        ));
    };
    let mut entries = tokio::fs::read_dir(&dir)
        .await
        .map_err(|err| open_error(&dir, &err))?;
    let mut frames = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| open_error(&dir, &err))?
    {
        let path = entry.path();
        if is_frame(&path) {
            frames.push(path);
        }
    }
    if frames.is_empty() {
        return Err(CaptureError::Unsupported(format!(
            "{}: no png/jpeg frames",
            dir.display()
        )));
    }
    frames.sort();
    info!(dir = %dir.display(), frames = frames.len(), "camera opened");
    Ok(Box::new(FrameDirCamera::new(frames)))
}

impl MediaSource for FrameDirCamera {
    fn capture_frame(&mut self, width: u32) -> Result<Vec<u8>, CaptureError> {
        if !self.live {
            return Err(CaptureError::Snapshot("camera is stopped".into()));
        }
        if width == 0 {
            return Err(CaptureError::Snapshot("capture surface has zero width".into()));
        }
        let Some(path) = self.frames.get(self.cursor % self.frames.len().max(1)) else {
            return Err(CaptureError::Snapshot("no frames".into()));
        };
        self.cursor = self.cursor.wrapping_add(1);

        let snapshot = |err: image::ImageError| {
            CaptureError::Snapshot(format!("{}: {err}", path.display()))
        };
        let img = image::open(path).map_err(snapshot)?;
        if img.width() == 0 {
            return Err(CaptureError::Snapshot(format!("{}: empty image", path.display())));
        }
        let height = (f64::from(img.height()) * f64::from(width) / f64::from(img.width()))
            .round()
            .max(1.0) as u32;
        let scaled = img.resize_exact(width, height, FilterType::Triangle);

        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(scaled.to_rgb8())
            .write_to(&mut out, ImageFormat::Jpeg)
            .map_err(snapshot)?;
        debug!(path = %path.display(), width, height, "snapshot");
        Ok(out.into_inner())
    }

    fn stop(&mut self) {
        if self.live {
            debug!("camera stopped");
        }
        self.live = false;
    }
}
