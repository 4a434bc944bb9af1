use crate::status::JobStatus;

/// Shown instead of the current unit when the server reports none.
pub const CURRENT_DATE_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub count: u32,
    pub total: u32,
    pub percent: u32,
    pub current_date: String,
    pub message: String,
}

/// `round(progress / total * 100)`, or 0 when `total` is 0.
///
/// Integer arithmetic rounds halves up, like the page's `Math.round`.
pub fn percent(progress: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = u64::from(progress) * 200 + u64::from(total);
    let rounded = scaled / (u64::from(total) * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Pure mapping from a snapshot to what the progress panel shows.
pub fn render_progress(status: &JobStatus) -> ProgressView {
    ProgressView {
        count: status.progress,
        total: status.total,
        percent: percent(status.progress, status.total),
        current_date: status
            .current_date
            .clone()
            .unwrap_or_else(|| CURRENT_DATE_PLACEHOLDER.to_string()),
        message: status.message.clone(),
    }
}
