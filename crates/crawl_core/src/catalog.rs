use crate::status::FileEntry;

pub const LOADING_FILES_MESSAGE: &str = "Loading the file list...";
pub const NO_FILES_MESSAGE: &str = "No saved files yet.";
pub const FILES_ERROR_MESSAGE: &str = "Could not load the file list.";

/// Identifies one file listing request. Only the newest request's answer is applied.
pub type ListingId = u64;

/// Lifecycle of the file listing. Exactly one state is shown at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogState {
    #[default]
    NotRequested,
    Loading,
    /// Entries in server order; never re-sorted.
    Populated(Vec<FileEntry>),
    Empty,
    Error(String),
}

impl CatalogState {
    pub fn from_listing(files: Vec<FileEntry>) -> Self {
        if files.is_empty() {
            CatalogState::Empty
        } else {
            CatalogState::Populated(files)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CatalogState::Loading)
    }

    pub fn view(&self) -> CatalogView {
        match self {
            CatalogState::NotRequested => CatalogView::NotRequested,
            CatalogState::Loading => CatalogView::Loading,
            CatalogState::Populated(files) => {
                CatalogView::Populated(files.iter().map(FileRowView::from_entry).collect())
            }
            CatalogState::Empty => CatalogView::Empty,
            CatalogState::Error(_) => CatalogView::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView {
    NotRequested,
    Loading,
    Populated(Vec<FileRowView>),
    Empty,
    Error,
}

impl CatalogView {
    /// Inline status line for the non-populated states.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            CatalogView::Loading => Some(LOADING_FILES_MESSAGE),
            CatalogView::Empty => Some(NO_FILES_MESSAGE),
            CatalogView::Error => Some(FILES_ERROR_MESSAGE),
            CatalogView::NotRequested | CatalogView::Populated(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub name: String,
    pub size_label: String,
    pub modified: String,
}

impl FileRowView {
    fn from_entry(entry: &FileEntry) -> Self {
        Self {
            name: entry.name.clone(),
            size_label: format_size_kb(entry.size),
            modified: entry.modified.clone(),
        }
    }
}

/// `bytes / 1024` with two decimals, e.g. `"1.50 KB"`.
pub fn format_size_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}
