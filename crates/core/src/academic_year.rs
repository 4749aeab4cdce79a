//! Academic years are `"YYYY-YYYY"` strings; ordering uses the start year.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static START_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)").expect("valid regex"));

/// Parse the leading start year of an academic-year string.
pub fn start_year(academic_year: &str) -> Option<i32> {
    START_YEAR_RE
        .captures(academic_year)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Sort academic years newest first by start year.
///
/// Values without a parseable start year go last, keeping their relative order.
pub fn sort_years_desc(mut years: Vec<String>) -> Vec<String> {
    years.sort_by(|a, b| match (start_year(a), start_year(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    years
}
