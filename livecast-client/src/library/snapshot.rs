use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Clinical context a snapshot is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotContext {
    pub hospital_id: i64,
    pub uid: String,
    pub visit_id: i64,
    pub procedure_id: i64,
}

impl Default for SnapshotContext {
    fn default() -> Self {
        Self {
            hospital_id: 1,
            uid: "default-mf".to_owned(),
            visit_id: 1,
            procedure_id: 0,
        }
    }
}

/// Body of `POST /api/save-snapshots/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotUpload {
    pub hospital_id: i64,
    pub uid: String,
    pub visit_id: i64,
    pub procedure_id: i64,
    pub procedure_datetime: String,
    pub file_type: String,
    pub file_status: String,
    pub annotation_data: String,
    /// `data:image/png;base64,...`
    #[serde(rename = "Img")]
    pub img: String,
    pub filename: String,
}

impl SnapshotUpload {
    pub fn from_png(png: &[u8], context: SnapshotContext) -> Self {
        Self::from_png_at(png, context, Utc::now())
    }

    pub fn from_png_at(png: &[u8], context: SnapshotContext, taken_at: DateTime<Utc>) -> Self {
        Self {
            hospital_id: context.hospital_id,
            uid: context.uid,
            visit_id: context.visit_id,
            procedure_id: context.procedure_id,
            procedure_datetime: taken_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            file_type: "image/png".to_owned(),
            file_status: "main".to_owned(),
            annotation_data: String::new(),
            img: format!("data:image/png;base64,{}", STANDARD.encode(png)),
            filename: format!("snapshot_{}.png", taken_at.timestamp_millis()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    pub id: i64,
    pub file_src: String,
}

/// Body of `GET /api/snapshots/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnapshotList {
    #[serde(default)]
    pub mediafiles: Vec<Snapshot>,
}
