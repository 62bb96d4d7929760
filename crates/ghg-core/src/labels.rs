//! Year extraction from free-text fiscal year labels.
//!
//! Labels are kept verbatim in extraction results. This module only derives
//! a calendar year for spreadsheet columns and sorting; it is never used to
//! accept or reject a record.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Japanese era year, e.g. 令和5年度, 平成30年, 令和元年度
    static ref ERA_PATTERN: Regex = Regex::new(
        r"(令和|平成|昭和)\s*(元|\d{1,2})\s*年"
    ).unwrap();

    /// Western year with 年 suffix, e.g. 2023年度, 2024年3月期
    static ref KANJI_YEAR_PATTERN: Regex = Regex::new(
        r"((?:19|20|21)\d{2})\s*年"
    ).unwrap();

    /// Fiscal year prefix, e.g. FY2023, FY 2023, FY23
    static ref FY_PATTERN: Regex = Regex::new(
        r"(?i)\bFY\s*'?(\d{4}|\d{2})\b"
    ).unwrap();

    /// Any standalone four-digit year
    static ref BARE_YEAR_PATTERN: Regex = Regex::new(
        r"(?:^|[^\d])((?:19|20|21)\d{2})(?:[^\d]|$)"
    ).unwrap();
}

/// First year of each supported era, minus one.
fn era_offset(era: &str) -> Option<i32> {
    match era {
        "令和" => Some(2018),
        "平成" => Some(1988),
        "昭和" => Some(1925),
        _ => None,
    }
}

/// Replace full-width digits with ASCII digits.
fn normalize_digits(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            _ => c,
        })
        .collect()
}

/// The calendar year named in a fiscal year label.
///
/// For labels such as `2024年3月期` the year as written (2024) is returned;
/// no fiscal-to-calendar shifting is applied.
pub fn calendar_year(label: &str) -> Option<i32> {
    let label = normalize_digits(label);

    if let Some(caps) = ERA_PATTERN.captures(&label) {
        let offset = era_offset(&caps[1])?;
        let number = match &caps[2] {
            "元" => 1,
            n => n.parse::<i32>().ok()?,
        };
        return Some(offset + number);
    }

    if let Some(caps) = KANJI_YEAR_PATTERN.captures(&label) {
        return caps[1].parse().ok();
    }

    if let Some(caps) = FY_PATTERN.captures(&label) {
        let digits = &caps[1];
        let year: i32 = digits.parse().ok()?;
        return Some(if digits.len() == 2 { 2000 + year } else { year });
    }

    BARE_YEAR_PATTERN
        .captures(&label)
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_western_labels() {
        assert_eq!(calendar_year("2023年度"), Some(2023));
        assert_eq!(calendar_year("2024年3月期"), Some(2024));
        assert_eq!(calendar_year("２０２２年度"), Some(2022));
    }

    #[test]
    fn test_fy_labels() {
        assert_eq!(calendar_year("FY2023"), Some(2023));
        assert_eq!(calendar_year("fy 2021"), Some(2021));
        assert_eq!(calendar_year("FY23"), Some(2023));
    }

    #[test]
    fn test_era_labels() {
        assert_eq!(calendar_year("令和5年度"), Some(2023));
        assert_eq!(calendar_year("令和元年度"), Some(2019));
        assert_eq!(calendar_year("平成30年度"), Some(2018));
    }

    #[test]
    fn test_bare_year() {
        assert_eq!(calendar_year("2019 (base year)"), Some(2019));
    }

    #[test]
    fn test_unparseable_labels() {
        assert_eq!(calendar_year("当期"), None);
        assert_eq!(calendar_year("前年度比"), None);
        assert_eq!(calendar_year("12345"), None);
    }
}
