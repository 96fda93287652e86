use axum::extract::multipart::Field;
use tanya_chat::{AudioInput, DEFAULT_AUDIO_FILENAME};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::error::{ApiError, ApiResult};

pub const INVALID_AUDIO_TYPE: &str =
    "Upload an audio/video file (Content-Type audio/* or video/*)";

/// `audio/*` and `video/*` only
pub fn is_audio_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim().to_ascii_lowercase();
    content_type.starts_with("audio/") || content_type.starts_with("video/")
}

/// Temp-file suffix from the upload name, e.g. `.webm`
fn suffix_for(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!(".{}", ext),
        _ => String::new(),
    }
}

/// An uploaded audio part spooled to disk.
///
/// The backing temp file is removed when this value is dropped.
#[derive(Debug)]
pub struct AudioUpload {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    file: Option<NamedTempFile>,
}

impl AudioUpload {
    /// Check the declared content type, then stream the part to a temp file
    pub async fn from_field(mut field: Field<'_>) -> ApiResult<Self> {
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_audio_content_type(&content_type) {
            return Err(ApiError::BadRequest(INVALID_AUDIO_TYPE.to_string()));
        }

        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_AUDIO_FILENAME)
            .to_string();

        let temp = tempfile::Builder::new()
            .prefix("tanya-upload-")
            .suffix(&suffix_for(&filename))
            .tempfile()
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create temp file");
                ApiError::Internal
            })?;
        let std_file = temp.reopen().map_err(|e| {
            tracing::error!(error = %e, "Failed to open temp file");
            ApiError::Internal
        })?;

        let mut upload = Self {
            filename,
            content_type,
            size: 0,
            file: Some(temp),
        };

        let mut writer = tokio::fs::File::from_std(std_file);
        while let Some(chunk) = field.chunk().await? {
            writer.write_all(&chunk).await.map_err(|e| {
                tracing::error!(error = %e, "Failed to spool upload");
                ApiError::Internal
            })?;
            upload.size += chunk.len() as u64;
        }
        writer.flush().await.map_err(|_| ApiError::Internal)?;

        tracing::debug!(
            filename = %upload.filename,
            content_type = %upload.content_type,
            size = upload.size,
            "Audio upload spooled"
        );
        Ok(upload)
    }

    /// Read the spooled bytes back for the provider call
    pub async fn into_audio_input(self) -> ApiResult<AudioInput> {
        let path = self.file.as_ref().ok_or(ApiError::Internal)?.path().to_path_buf();
        let data = tokio::fs::read(&path).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read spooled upload");
            ApiError::Internal
        })?;

        Ok(AudioInput::new(
            Some(self.filename.clone()),
            self.content_type.clone(),
            data,
        ))
    }
}

impl Drop for AudioUpload {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                tracing::debug!(path = %path.display(), error = %e, "Failed to remove temp file");
            }
        }
    }
}
