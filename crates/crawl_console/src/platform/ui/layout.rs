use super::constants::*;

/// Panels of the console page, in the order they are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Form,
    Progress,
    Result,
    Files,
    Download,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Form => TITLE_FORM,
            Section::Progress => TITLE_PROGRESS,
            Section::Result => TITLE_RESULT,
            Section::Files => TITLE_FILES,
            Section::Download => TITLE_DOWNLOAD,
        }
    }
}

pub fn banner() -> Vec<String> {
    let rule = "=".repeat(APP_TITLE.len());
    vec![rule.clone(), APP_TITLE.to_string(), rule]
}

pub fn section_header(section: Section) -> String {
    format!("-- {} --", section.title())
}

/// Fixed-width bar; `percent` above 100 renders full.
pub fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize * PROGRESS_BAR_WIDTH) / 100;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0), format!("[{}]", "-".repeat(PROGRESS_BAR_WIDTH)));
        assert_eq!(progress_bar(100), format!("[{}]", "#".repeat(PROGRESS_BAR_WIDTH)));
        let half = progress_bar(50);
        assert_eq!(half.matches('#').count(), PROGRESS_BAR_WIDTH / 2);
        assert_eq!(half.len(), PROGRESS_BAR_WIDTH + 2);
    }

    #[test]
    fn overfull_progress_is_clamped() {
        assert_eq!(progress_bar(250), progress_bar(100));
    }

    #[test]
    fn header_names_the_section() {
        assert_eq!(section_header(Section::Files), "-- Saved files --");
    }
}
