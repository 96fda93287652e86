use uuid::Uuid;

/// Download route served by the API when no public base URL is configured
pub const AUDIO_ROUTE_PREFIX: &str = "/api/v1/chat/audio";

/// Uploaded audio waiting to be stored
#[derive(Debug, Clone)]
pub struct AudioBlob {
    /// Per-upload id, so repeated filenames in one thread never share a key
    pub id: Uuid,
    pub user_id: String,
    pub thread_id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl AudioBlob {
    pub fn new(
        user_id: impl Into<String>,
        thread_id: Uuid,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            thread_id,
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Storage key: `{user_id}/{thread_id}/{id}-{filename}`
    pub fn key(&self) -> String {
        let filename: String = self
            .filename
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        format!("{}/{}/{}-{}", self.user_id, self.thread_id, self.id, filename)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredAudio {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Durable reference for a stored key
pub fn audio_reference(public_base_url: Option<&str>, key: &str) -> String {
    match public_base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
        None => format!("{}/{}", AUDIO_ROUTE_PREFIX, key),
    }
}
