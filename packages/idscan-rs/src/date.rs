//! Normalization of the many date shapes printed on ID cards into ISO `YYYY-MM-DD`.
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static MONTH_NAME_RE: OnceLock<Regex> = OnceLock::new();
static ISO_NUMERIC_RE: OnceLock<Regex> = OnceLock::new();
static LOCAL_NUMERIC_RE: OnceLock<Regex> = OnceLock::new();
static ISO_SHAPE_RE: OnceLock<Regex> = OnceLock::new();

fn month_name_re() -> &'static Regex {
    MONTH_NAME_RE.get_or_init(|| {
        Regex::new(
            r"\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+([0-9]{1,3})\s+([0-9]{4})\b",
        )
        .expect("month-name date pattern")
    })
}

fn iso_numeric_re() -> &'static Regex {
    ISO_NUMERIC_RE.get_or_init(|| {
        Regex::new(r"([0-9]{4})[/\-]([0-9]{1,2})[/\-]([0-9]{1,2})").expect("iso numeric date pattern")
    })
}

fn local_numeric_re() -> &'static Regex {
    LOCAL_NUMERIC_RE.get_or_init(|| {
        Regex::new(r"([0-9]{1,2})[/\-]([0-9]{1,2})[/\-]([0-9]{4}|[0-9]{2})\b").expect("local numeric date pattern")
    })
}

fn iso_shape_re() -> &'static Regex {
    ISO_SHAPE_RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("iso shape pattern"))
}

fn month_index(token: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| m.starts_with(&token[..token.len().min(3)]))
        .map(|i| i as u32 + 1)
}

/// Day numbers read as three digits are usually a glyph merged onto a real
/// day ("315" for "31"); fall back to the leading two digits.
fn day_with_fallback(raw: &str) -> Option<u32> {
    let day: u32 = raw.parse().ok()?;
    if (1..=31).contains(&day) {
        return Some(day);
    }
    if raw.len() >= 2 {
        let candidate: u32 = raw[..2].parse().ok()?;
        if (1..=31).contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn parse_month_name(cleaned: &str) -> Option<NaiveDate> {
    month_name_re().captures_iter(cleaned).find_map(|caps| {
        let month = month_index(&caps[1])?;
        let day = day_with_fallback(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// `None` when there is no year-first token; `Some(None)` when there is one
/// but it names no real day.
fn parse_iso_numeric(cleaned: &str) -> Option<Option<NaiveDate>> {
    let caps = iso_numeric_re().captures(cleaned)?;
    let ymd = || NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?);
    Some(ymd())
}

fn parse_local_numeric(cleaned: &str) -> Option<NaiveDate> {
    let caps = local_numeric_re().captures(cleaned)?;
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year_raw = &caps[3];
    let year: i32 = if year_raw.len() == 2 {
        2000 + year_raw.parse::<i32>().ok()?
    } else {
        year_raw.parse().ok()?
    };

    // Month-first as printed on local cards; day-first when that is impossible.
    NaiveDate::from_ymd_opt(year, first, second).or_else(|| NaiveDate::from_ymd_opt(year, second, first))
}

/// Parses `text` into a calendar date, trying month-name, ISO-ordered numeric
/// and local numeric shapes in that order.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let cleaned = text.trim().replace(',', "").to_lowercase();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(date) = parse_month_name(&cleaned) {
        return Some(date);
    }
    // A year-first token is never re-read in another field order.
    match parse_iso_numeric(&cleaned) {
        Some(date) => date,
        None => parse_local_numeric(&cleaned),
    }
}

/// Returns the ISO form of the first date found in `text`, or `""`.
pub fn normalize_date(text: &str) -> String {
    parse_date(text)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// True when `value` is exactly `YYYY-MM-DD` and names a real calendar day.
pub fn is_iso_calendar_date(value: &str) -> bool {
    iso_shape_re().is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
