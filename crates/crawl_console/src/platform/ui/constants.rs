use std::time::Duration;

pub const APP_TITLE: &str = "Reservation Crawl Console";
pub const PROGRESS_BAR_WIDTH: usize = 30;
/// How long the console waits for an engine event before re-checking for settlement.
pub const EVENT_WAIT: Duration = Duration::from_millis(200);

pub const TITLE_FORM: &str = "Crawl settings";
pub const TITLE_PROGRESS: &str = "Progress";
pub const TITLE_RESULT: &str = "Result";
pub const TITLE_FILES: &str = "Saved files";
pub const TITLE_DOWNLOAD: &str = "Download";
