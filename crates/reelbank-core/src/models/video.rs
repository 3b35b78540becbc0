use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// A stored video on the remote platform.
///
/// The content `hash` identifies the uploaded bytes: registering the same
/// hash into another dataset creates a new asset record without
/// retransmission. Two assets may share a hash but never an id, and may
/// carry distinct names and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoAsset {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub name: String,
    pub hash: String,
    pub file_size: i64,
    pub frame_count: i64,
    pub frame_width: i32,
    pub frame_height: i32,
    pub duration: Option<f64>,
    /// Arbitrary key-value metadata supplied at upload time.
    #[serde(default)]
    pub metadata: JsonValue,
    pub uploaded_at: DateTime<Utc>,
}

/// One frame of a batched frame download, as returned on the wire.
/// The image bytes are a base64-encoded PNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramePayload {
    pub index: u64,
    pub image_base64: String,
}

/// Outcome of a batch delete. The server continues past missing ids and
/// reports them instead of aborting the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoveReport {
    pub removed: Vec<Uuid>,
    pub missing: Vec<Uuid>,
}

impl RemoveReport {
    pub fn all_removed(&self) -> bool {
        self.missing.is_empty()
    }
}
