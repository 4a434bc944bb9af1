//! Wire snapshots produced by the crawl server.
use serde::{Deserialize, Deserializer, Serialize};

/// One poll snapshot of the server-side job.
///
/// The client never mutates a snapshot; it only renders it and evaluates
/// [`JobStatus::is_complete`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub total: u32,
    /// Label of the unit currently being processed. Empty labels decode as `None`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub current_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    /// Present only once an artifact exists. Empty paths decode as `None`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub result_file: Option<String>,
}

impl JobStatus {
    /// Terminal detection: the job stopped after doing at least one unit of work.
    ///
    /// `is_running == false` with `progress == 0` is the pre-start condition and
    /// never counts as completion.
    pub fn is_complete(&self) -> bool {
        !self.is_running && self.progress > 0
    }
}

/// Answer to a start request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StartResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

/// One artifact in the server's output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Opaque modification label, displayed verbatim.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub modified: String,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.is_empty()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_requires_stopped_and_progress() {
        let mut status = JobStatus::default();
        assert!(!status.is_complete());

        status.is_running = true;
        status.progress = 3;
        assert!(!status.is_complete());

        status.is_running = false;
        assert!(status.is_complete());

        status.progress = 0;
        assert!(!status.is_complete());
    }

    #[test]
    fn status_tolerates_nulls_and_blank_labels() {
        let status: JobStatus = serde_json::from_str(
            r#"{"is_running":true,"progress":1,"total":4,"current_date":"","message":null,"result_file":null}"#,
        )
        .unwrap();
        assert_eq!(status.current_date, None);
        assert_eq!(status.message, "");
        assert_eq!(status.result_file, None);
        assert_eq!(status.total, 4);
    }
}
