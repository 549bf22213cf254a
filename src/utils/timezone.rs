use regex::Regex;
use std::sync::OnceLock;

/// Single source of truth for recognized timezone abbreviations.
const TIMEZONE_TABLE: &[(&str, f64)] = &[
    ("EST", -5.0),
    ("EDT", -4.0),
    ("CST", -6.0),
    ("CDT", -5.0),
    ("MST", -7.0),
    ("MDT", -6.0),
    ("PST", -8.0),
    ("PDT", -7.0),
    ("AKST", -9.0),
    ("AKDT", -8.0),
    ("HST", -10.0),
    ("GMT", 0.0),
    ("UTC", 0.0),
    ("CET", 1.0),
    ("CEST", 2.0),
    ("EET", 2.0),
    ("EEST", 3.0),
    ("IST", 5.5),
    ("JST", 9.0),
    ("AEST", 10.0),
    ("AEDT", 11.0),
];

fn offset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:UTC|GMT)\s?([+-])(\d{1,2})(?::(\d{2}))?").expect("valid offset pattern")
    })
}

/// Parses a timezone string (abbreviation or `UTC±H[:MM]` form) into a UTC
/// offset in hours. Unrecognized input yields `None`, never an error.
pub fn parse_utc_offset(raw: &str) -> Option<f64> {
    let normalized = raw.trim().to_uppercase();
    if normalized.is_empty() {
        return None;
    }

    if let Some((_, offset)) = TIMEZONE_TABLE.iter().find(|(name, _)| *name == normalized) {
        return Some(*offset);
    }

    let caps = offset_pattern().captures(&normalized)?;
    let hours: f64 = caps[2].parse().ok()?;
    let minutes: f64 = caps
        .get(3)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);
    let offset = hours + minutes / 60.0;

    Some(if &caps[1] == "-" { -offset } else { offset })
}
