use chrono::{Datelike, NaiveDate};

use crate::form::{parse_optional_date, CadenceMode, FormInput};

/// Advisory number of crawl units for a date range. Never gates submission.
///
/// Returns `None` when either date is missing or the range is inverted.
pub fn estimate_count(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    mode: CadenceMode,
) -> Option<u32> {
    let (start, end) = (start?, end?);
    if start > end {
        return None;
    }

    let days = (end - start).num_days() + 1;
    let count = match mode {
        CadenceMode::Daily => days,
        CadenceMode::Weekly => (days + 6) / 7,
        CadenceMode::Monthly => {
            let years = i64::from(end.year() - start.year());
            let months = i64::from(end.month()) - i64::from(start.month());
            years * 12 + months + 1
        }
    };
    u32::try_from(count).ok()
}

/// Estimate straight from the raw form; unparseable dates count as missing.
pub fn estimate_for_form(form: &FormInput) -> Option<u32> {
    let start = parse_optional_date(&form.start_date).ok().flatten();
    let end = parse_optional_date(&form.end_date).ok().flatten();
    estimate_count(start, end, form.mode_or_default())
}
