use crate::catalog::CatalogView;
use crate::progress::ProgressView;
use crate::result::ResultView;
use crate::FormInput;

/// Everything a binding layer needs to draw the page. `None` panels are hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub form: FormView,
    /// Start and quick-start buttons.
    pub controls_enabled: bool,
    pub progress: Option<ProgressView>,
    pub result: Option<ResultView>,
    pub catalog: CatalogView,
    pub last_download: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub input: FormInput,
    /// Advisory unit count for the current range and mode.
    pub estimated_count: Option<u32>,
    pub sheets_url_visible: bool,
}
