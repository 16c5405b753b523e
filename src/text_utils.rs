use std::ops::Index;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use unidecode::unidecode;

lazy_static! {
    static ref DATE_TIME_REGEX: Regex = Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})[ T](\d{1,2}):(\d{1,2}):(\d{1,2})(\.\d{0,9})?$"
    ).unwrap();
    static ref SLUG_INVALID_CHARS: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref SLUG_SEPARATORS: Regex = Regex::new(r"[\s-]+").unwrap();
}

/// Turns a human label into a URL segment.
///
/// `"Café résumé"` becomes `"cafe-resume"`. The result only contains `[a-z0-9-]`,
/// never starts or ends with a hyphen, and `slugify(slugify(s)) == slugify(s)`.
pub fn slugify(value: &str) -> String {
    let ascii = unidecode(value.trim()).to_lowercase();
    let cleaned = SLUG_INVALID_CHARS.replace_all(&ascii, "");
    let collapsed = SLUG_SEPARATORS.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    let Some(caps) = DATE_TIME_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = to_u32(caps.index(4))?;
    let mn: u32 = to_u32(caps.index(5))?;
    let s: u32 = to_u32(caps.index(6))?;

    let date = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| format!("Invalid date in {}", buf))?;
    let time = NaiveTime::from_hms_opt(h, mn, s)
        .ok_or_else(|| format!("Invalid time in {}", buf))?;

    Ok(NaiveDateTime::new(date, time))
}

pub fn format_date(date_time: &NaiveDateTime) -> String {
    date_time.format("%Y-%m-%d").to_string()
}

/// Normalizes a frontmatter date.
///
/// Date-times collapse to `YYYY-MM-DD`, anything else is only trimmed.
/// Blank input means "no date".
pub fn normalize_date(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date_time) = parse_date_time(value) {
        return Some(format_date(&date_time));
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(format_date(&date_time.naive_local()));
    }

    Some(value.to_string())
}

const FR_MONTHS: [&str; 12] = ["janvier", "février", "mars", "avril", "mai", "juin",
    "juillet", "août", "septembre", "octobre", "novembre", "décembre"];
const FR_MONTHS_ABBR: [&str; 12] = ["janv.", "févr.", "mars", "avr.", "mai", "juin",
    "juil.", "août", "sept.", "oct.", "nov.", "déc."];
const FR_WEEKDAYS: [&str; 7] = ["lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche"];
const EN_MONTHS: [&str; 12] = ["January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December"];
const EN_MONTHS_ABBR: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
const EN_WEEKDAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

pub const DEFAULT_DATE_STYLE: &str = "long";
pub const DEFAULT_DATE_LANG: &str = "fr";

struct DateNames {
    months: [&'static str; 12],
    months_abbr: [&'static str; 12],
    weekdays: [&'static str; 7],
}

/// `fr`, `fr_FR` and `fr-CA` all use the French names. Unknown languages get English.
fn date_names(lang: &str) -> DateNames {
    let base = lang.split(['_', '-']).next().unwrap_or_default().to_lowercase();
    match base.as_str() {
        "fr" => DateNames { months: FR_MONTHS, months_abbr: FR_MONTHS_ABBR, weekdays: FR_WEEKDAYS },
        _ => DateNames { months: EN_MONTHS, months_abbr: EN_MONTHS_ABBR, weekdays: EN_WEEKDAYS },
    }
}

/// Formats a `YYYY-MM-DD` date (a date-time is cut to its date) for display.
///
/// Styles: `full` (`mardi 25 novembre 2025`), `long` (`25 novembre 2025`),
/// `medium` (`25 nov. 2025`), `short` (`25/11/2025`). Unknown styles fall back
/// to `long`.
pub fn format_display_date(value: &str, style: &str, lang: &str) -> Result<String, String> {
    let normalized = normalize_date(value).ok_or_else(|| "Empty date".to_string())?;
    let date = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date {}: {}", value, e))?;

    let names = date_names(lang);
    let month = date.month0() as usize;
    let day = date.day();
    let year = date.year();

    let formatted = match style {
        "short" => date.format("%d/%m/%Y").to_string(),
        "medium" => format!("{} {} {}", day, names.months_abbr[month], year),
        "full" => {
            let weekday = names.weekdays[date.weekday().num_days_from_monday() as usize];
            format!("{} {} {} {}", weekday, day, names.months[month], year)
        }
        _ => format!("{} {} {}", day, names.months[month], year),
    };
    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_time() {
        let date_time = parse_date_time("2017-09-10 10:42:32.123").unwrap();
        assert_eq!(format_date(&date_time), "2017-09-10");

        let date_time = parse_date_time("2017-09-10T10:42:32").unwrap();
        assert_eq!(date_time.format("%H:%M:%S").to_string(), "10:42:32");

        assert!(parse_date_time("2017-09-10").is_err());
        assert!(parse_date_time("2017-13-10 10:42:32").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World!"), "hello-world");
        assert_eq!(slugify("Café résumé"), "cafe-resume");
        assert_eq!(slugify("mot-clé1"), "mot-cle1");
        assert_eq!(slugify("  --Ça   va -- Très bien--  "), "ca-va-tres-bien");
        assert_eq!(slugify("snake_case_label"), "snakecaselabel");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_idempotent() {
        for label in ["Hello World!", "Économie Sociale & Solidaire", "a  -  b", "Zürich 2024", ""] {
            let once = slugify(label);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn test_labels_collapse_to_one_slug() {
        assert_eq!(slugify("Économie"), slugify("economie"));
        assert_eq!(slugify("Rust Lang"), slugify("rust-lang"));
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("2025-11-25"), Some("2025-11-25".to_string()));
        assert_eq!(normalize_date("  2025-11-25  "), Some("2025-11-25".to_string()));
        assert_eq!(normalize_date("2025-11-25 14:30:00"), Some("2025-11-25".to_string()));
        assert_eq!(normalize_date("2025-11-25T14:30:00+02:00"), Some("2025-11-25".to_string()));
        assert_eq!(normalize_date("next week"), Some("next week".to_string()));
        assert_eq!(normalize_date("   "), None);
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date("2025-11-25", "long", "fr_FR").unwrap(), "25 novembre 2025");
        assert_eq!(format_display_date("2025-11-25", "full", "fr").unwrap(), "mardi 25 novembre 2025");
        assert_eq!(format_display_date("2025-02-03", "medium", "fr").unwrap(), "3 févr. 2025");
        assert_eq!(format_display_date("2025-11-25", "short", "en_US").unwrap(), "25/11/2025");
        assert_eq!(format_display_date("2025-11-25 10:00:00", "long", "en").unwrap(), "25 November 2025");
        assert_eq!(format_display_date("2025-11-25", "unknown", "de").unwrap(), "25 November 2025");
        assert!(format_display_date("next week", "long", "fr").is_err());
        assert!(format_display_date("", "long", "fr").is_err());
    }
}
