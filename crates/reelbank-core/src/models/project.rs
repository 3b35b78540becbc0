use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// What a project holds. Only video collections are used by this client,
/// but the platform distinguishes media kinds at the project level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Videos,
    Images,
}

impl Display for ProjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProjectKind::Videos => write!(f, "videos"),
            ProjectKind::Images => write!(f, "images"),
        }
    }
}

/// Policy applied when a create call collides with an existing name.
/// Under `Rename` the server appends a disambiguating suffix; under
/// `Reject` the call fails with a name-conflict error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NameConflict {
    Rename,
    Reject,
}

impl Display for NameConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            NameConflict::Rename => write!(f, "rename"),
            NameConflict::Reject => write!(f, "reject"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub workspace_id: i64,
    /// Server-confirmed name; may differ from the requested one when the
    /// rename conflict policy appended a suffix.
    pub name: String,
    pub kind: ProjectKind,
    pub created_at: DateTime<Utc>,
}
