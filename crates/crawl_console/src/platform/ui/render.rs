use std::collections::BTreeMap;
use std::io::{self, Write};

use crawl_core::{AppViewModel, CatalogView, FormView, ProgressView, ResultView};
use crawl_engine::download_url;
use url::Url;

use super::layout::{progress_bar, section_header, Section};

/// Builds download links against the server base URL.
pub struct DownloadLinks {
    base: Option<Url>,
}

impl DownloadLinks {
    pub fn new(server: &str) -> Self {
        Self {
            base: Url::parse(server).ok(),
        }
    }

    pub fn link(&self, filename: &str) -> Option<String> {
        let base = self.base.as_ref()?;
        download_url(base, filename).ok().map(String::from)
    }
}

pub fn render(view: &AppViewModel, links: &DownloadLinks) -> Vec<(Section, Vec<String>)> {
    let mut sections = vec![(Section::Form, form_lines(&view.form, view.controls_enabled))];
    if let Some(progress) = &view.progress {
        sections.push((Section::Progress, progress_lines(progress)));
    }
    if let Some(result) = &view.result {
        sections.push((Section::Result, result_lines(result, links)));
    }
    if let Some(lines) = catalog_lines(&view.catalog, links) {
        sections.push((Section::Files, lines));
    }
    if let Some(saved_to) = &view.last_download {
        sections.push((Section::Download, vec![format!("Saved to {saved_to}")]));
    }
    sections
}

fn form_lines(form: &FormView, controls_enabled: bool) -> Vec<String> {
    let input = &form.input;
    let store = if input.store_name.trim().is_empty() {
        "(server default)"
    } else {
        input.store_name.as_str()
    };
    let estimate = match form.estimated_count {
        Some(count) => format!("about {count} unit(s)"),
        None => "no estimate".to_string(),
    };

    let mut lines = vec![
        format!("Store: {store}"),
        format!("Period: {} .. {}", input.start_date, input.end_date),
        format!("Mode: {} ({estimate})", input.mode_or_default()),
        format!("Format: {}", or_default(&input.output_format, "csv")),
    ];
    if form.sheets_url_visible {
        lines.push(format!(
            "Google Sheets: {}",
            or_default(&input.sheets_url, "(missing url)")
        ));
    }
    lines.push(if controls_enabled {
        "Launch: ready".to_string()
    } else {
        "Launch: crawl in progress".to_string()
    });
    lines
}

fn progress_lines(progress: &ProgressView) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} {}/{} ({}%)",
            progress_bar(progress.percent),
            progress.count,
            progress.total,
            progress.percent
        ),
        format!("Current date: {}", progress.current_date),
    ];
    if !progress.message.is_empty() {
        lines.push(progress.message.clone());
    }
    lines
}

fn result_lines(result: &ResultView, links: &DownloadLinks) -> Vec<String> {
    let mut lines = vec![result.message.clone()];
    if let Some(filename) = &result.download {
        lines.push(match links.link(filename) {
            Some(link) => format!("Download: {filename} <{link}>"),
            None => format!("Download: {filename}"),
        });
    }
    lines
}

fn catalog_lines(catalog: &CatalogView, links: &DownloadLinks) -> Option<Vec<String>> {
    match catalog {
        CatalogView::NotRequested => None,
        CatalogView::Populated(rows) => Some(
            rows.iter()
                .map(|row| {
                    let link = links.link(&row.name).unwrap_or_default();
                    format!("{}  {}  {}  {}", row.name, row.size_label, row.modified, link)
                        .trim_end()
                        .to_string()
                })
                .collect(),
        ),
        other => other.message().map(|message| vec![message.to_string()]),
    }
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Prints only the sections whose lines changed since the previous render.
#[derive(Default)]
pub struct TextRenderer {
    shown: BTreeMap<Section, Vec<String>>,
}

impl TextRenderer {
    pub fn draw(&mut self, sections: Vec<(Section, Vec<String>)>) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for (section, lines) in self.changed(sections) {
            writeln!(out, "{}", section_header(section))?;
            for line in &lines {
                writeln!(out, "  {line}")?;
            }
        }
        out.flush()
    }

    fn changed(&mut self, sections: Vec<(Section, Vec<String>)>) -> Vec<(Section, Vec<String>)> {
        let mut changed = Vec::new();
        for (section, lines) in sections {
            if self.shown.get(&section) != Some(&lines) {
                self.shown.insert(section, lines.clone());
                changed.push((section, lines));
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawl_core::{
        render_progress, AppState, FileEntry, FileRowView, FormInput, JobStatus, Msg,
    };

    fn links() -> DownloadLinks {
        DownloadLinks::new("http://localhost:5000")
    }

    fn sections_of(view: &AppViewModel) -> Vec<Section> {
        render(view, &links())
            .into_iter()
            .map(|(section, _)| section)
            .collect()
    }

    #[test]
    fn fresh_page_shows_only_the_form() {
        let view = AppState::new().view();
        assert_eq!(sections_of(&view), vec![Section::Form]);
    }

    #[test]
    fn form_shows_sheets_url_only_when_enabled() {
        let state = AppState::new();
        let mut view = state.view();
        view.form.input = FormInput {
            google_sheets: true,
            sheets_url: "https://sheets.example/abc".to_string(),
            ..FormInput::default()
        };
        view.form.sheets_url_visible = true;
        let lines = form_lines(&view.form, true);
        assert!(lines.iter().any(|l| l == "Google Sheets: https://sheets.example/abc"));
        assert!(lines.iter().any(|l| l == "Store: (server default)"));

        view.form.sheets_url_visible = false;
        let lines = form_lines(&view.form, false);
        assert!(!lines.iter().any(|l| l.starts_with("Google Sheets")));
        assert_eq!(lines.last().map(String::as_str), Some("Launch: crawl in progress"));
    }

    #[test]
    fn progress_line_carries_bar_count_and_percent() {
        let progress = render_progress(&JobStatus {
            is_running: true,
            progress: 1,
            total: 3,
            current_date: None,
            message: String::new(),
            result_file: None,
        });
        let lines = progress_lines(&progress);
        assert!(lines[0].ends_with("1/3 (33%)"), "{}", lines[0]);
        assert_eq!(lines[1], "Current date: -");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn result_links_to_download_route() {
        let result = ResultView {
            message: "Done: 12 rows".to_string(),
            download: Some("reservations 2024.csv".to_string()),
        };
        let lines = result_lines(&result, &links());
        assert_eq!(
            lines,
            vec![
                "Done: 12 rows".to_string(),
                "Download: reservations 2024.csv <http://localhost:5000/api/download/reservations%202024.csv>"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn catalog_rows_and_messages() {
        let rows = CatalogView::Populated(vec![FileRowView {
            name: "a.csv".to_string(),
            size_label: "1.00 KB".to_string(),
            modified: "2024-01-02 10:00:00".to_string(),
        }]);
        let lines = catalog_lines(&rows, &links()).unwrap();
        assert_eq!(
            lines,
            vec!["a.csv  1.00 KB  2024-01-02 10:00:00  http://localhost:5000/api/download/a.csv"]
        );

        assert_eq!(
            catalog_lines(&CatalogView::Empty, &links()),
            Some(vec![crawl_core::NO_FILES_MESSAGE.to_string()])
        );
        assert_eq!(catalog_lines(&CatalogView::NotRequested, &links()), None);
    }

    #[test]
    fn unparsable_server_drops_links() {
        let links = DownloadLinks::new("not a url");
        assert_eq!(links.link("a.csv"), None);
    }

    #[test]
    fn renderer_reprints_only_changed_sections() {
        let (state, _) = crawl_core::update(AppState::new(), Msg::Started);
        let (state, _) = crawl_core::update(
            state,
            Msg::FilesLoaded {
                request: 1,
                files: vec![FileEntry {
                    name: "a.csv".to_string(),
                    size: 2048,
                    modified: "2024-01-02".to_string(),
                }],
            },
        );
        let view = state.view();

        let mut renderer = TextRenderer::default();
        let first = renderer.changed(render(&view, &links()));
        assert_eq!(
            first.iter().map(|(s, _)| *s).collect::<Vec<_>>(),
            vec![Section::Form, Section::Files]
        );
        assert!(renderer.changed(render(&view, &links())).is_empty());
    }
}
