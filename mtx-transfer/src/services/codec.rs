//! External codec collaborator
//!
//! Conversion is delegated to an external encoder (ffmpeg by default) treated
//! as a black box: it either produces the output file and exits 0, or fails.

use mtx_common::config::EncoderSettings;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Codec invocation errors
#[derive(Debug, Error)]
pub enum CodecError {
    /// Encoder binary could not be started
    #[error("Failed to launch encoder: {0}")]
    Launch(#[from] std::io::Error),

    /// Encoder ran and reported failure
    #[error("Encoder failed: {0}")]
    Failed(String),
}

/// Converts one audio file into the target format
///
/// Implementations must be usable from several worker threads at once.
pub trait Codec: Send + Sync {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), CodecError>;
}

/// ffmpeg-backed codec
#[derive(Debug, Clone)]
pub struct FfmpegCodec {
    settings: EncoderSettings,
}

impl FfmpegCodec {
    pub fn new(settings: EncoderSettings) -> Self {
        Self { settings }
    }

    /// Command-line arguments for one conversion
    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-nostdin".into(),
            "-loglevel".into(),
            "quiet".into(),
            "-i".into(),
            input.as_os_str().to_owned(),
            "-codec:a".into(),
            self.settings.codec.clone().into(),
            "-q:a".into(),
            self.settings.quality.to_string().into(),
            output.as_os_str().to_owned(),
        ]
    }
}

impl Codec for FfmpegCodec {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), CodecError> {
        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            "Running encoder"
        );

        let status = Command::new(&self.settings.program)
            .args(self.args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(CodecError::Failed(status.to_string()))
        }
    }
}
