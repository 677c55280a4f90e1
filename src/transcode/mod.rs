//! DASH Transcoder
//!
//! Thin wrapper around the external `ffmpeg` binary. Converts one source
//! video into an adaptive-streaming set: a `manifest.mpd` plus init and
//! media segments, all written into the given output directory.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{ContentError, Result};

/// Name of the manifest file every transcode produces.
pub const MANIFEST_FILENAME: &str = "manifest.mpd";

pub struct DashTranscoder;

impl DashTranscoder {
    pub fn new() -> Self {
        Self
    }

    /// Transcodes `input` into DASH output under `output_dir`.
    ///
    /// H.264 video at 3 Mb/s, AAC audio at 128 kb/s, 4-second segments,
    /// keyframes pinned every 120 frames so segment boundaries align.
    pub async fn transcode(&self, input: &Path, output_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(output_dir).await?;
        let manifest_path = output_dir.join(MANIFEST_FILENAME);

        let status = Command::new("ffmpeg")
            .arg("-i")
            .arg(input)
            .args([
                "-c:v", "libx264",
                "-c:a", "aac",
                "-bf", "1",
                "-keyint_min", "120",
                "-g", "120",
                "-sc_threshold", "0",
                "-b:v", "3000k",
                "-b:a", "128k",
                "-f", "dash",
                "-use_timeline", "1",
                "-use_template", "1",
                "-init_seg_name", "init-$RepresentationID$.m4s",
                "-media_seg_name", "chunk-$RepresentationID$-$Number%05d$.m4s",
                "-seg_duration", "4",
            ])
            .arg(&manifest_path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| ContentError::Transcode(format!("failed to run ffmpeg: {e}")))?;

        if !status.success() {
            return Err(ContentError::Transcode(format!(
                "ffmpeg exited with {status}"
            )));
        }

        if !tokio::fs::try_exists(&manifest_path).await.unwrap_or(false) {
            return Err(ContentError::Transcode(format!(
                "manifest was not created at {}",
                manifest_path.display()
            )));
        }

        Ok(())
    }
}

impl Default for DashTranscoder {
    fn default() -> Self {
        Self::new()
    }
}
