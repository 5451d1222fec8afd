use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";

/// Full image URL for a TMDB file path; an empty path stays empty so callers
/// can skip rendering.
pub fn tmdb_image_src(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    format!("{IMAGE_BASE}/{path}")
}

pub fn youtube_thumbnail(key: &str) -> String {
    format!("https://img.youtube.com/vi/{key}/mqdefault.jpg")
}

/// Embeddable player URL for the trailer modal.
pub fn youtube_embed(key: &str) -> String {
    format!("https://www.youtube.com/embed/{key}?autoplay=0")
}

/// `day/month/year` without zero padding, e.g. `2020-01-05` -> `5/1/2020`.
/// Input that isn't a date renders as `NaN/NaN/NaN`.
pub fn format_date(val: &str) -> String {
    match parse_date(val) {
        Some(d) => format!("{}/{}/{}", d.day(), d.month(), d.year()),
        None => "NaN/NaN/NaN".to_string(),
    }
}

pub fn release_year(val: &str) -> Option<i32> {
    parse_date(val).map(|d| d.year())
}

fn parse_date(val: &str) -> Option<NaiveDate> {
    let val = val.trim();
    // offsets are folded into UTC before taking the calendar day
    if let Ok(dt) = DateTime::parse_from_rfc3339(val) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(val, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    calendar_date(val)
}

/// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, `-` or `/` separated. A day past the end
/// of its month rolls into the next month (`2020-02-30` is 1 March).
fn calendar_date(val: &str) -> Option<NaiveDate> {
    let mut parts = val.split(['-', '/']);
    let year = parts.next().filter(|y| y.len() == 4)?.parse::<i32>().ok()?;
    let month = parts.next().map_or(Some(1), |m| m.parse::<u32>().ok())?;
    let day = parts.next().map_or(Some(1), |d| d.parse::<u32>().ok())?;
    if parts.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(day - 1)))
}
