//! Calendar dates from front matter.
//!
//! Posts and projects carry a `date = "YYYY-MM-DD"` field. It drives
//! ordering (newest first), the long form shown on pages
//! ("January 15, 2025"), RFC 2822 timestamps in the RSS feed and W3C dates
//! in sitemaps. Dates are treated as midnight UTC; no time zone handling.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    Format(String),
    #[error("invalid date '{0}': day or month out of range")]
    Range(String),
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// A proleptic Gregorian calendar date. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
}

impl Date {
    pub fn new(year: i32, month: u8, day: u8) -> Option<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// `January 15, 2025`
    pub fn long_form(&self) -> String {
        format!(
            "{} {}, {}",
            MONTHS[usize::from(self.month - 1)],
            self.day,
            self.year
        )
    }

    /// `Wed, 15 Jan 2025 00:00:00 GMT`, as used by RSS `pubDate`.
    pub fn to_rfc2822(&self) -> String {
        format!(
            "{}, {:02} {} {} 00:00:00 GMT",
            WEEKDAYS[self.weekday_index()],
            self.day,
            &MONTHS[usize::from(self.month - 1)][..3],
            self.year
        )
    }

    /// Days since 1970-01-01 (negative before).
    pub fn days_since_epoch(&self) -> i64 {
        // Howard Hinnant's days_from_civil.
        let y = i64::from(self.year) - i64::from(self.month <= 2);
        let m = i64::from(self.month);
        let d = i64::from(self.day);
        let era = y.div_euclid(400);
        let yoe = y - era * 400;
        let doy = (153 * (m + if m > 2 { -3 } else { 9 }) + 2) / 5 + d - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }

    /// 0 = Monday.
    fn weekday_index(&self) -> usize {
        // 1970-01-01 was a Thursday.
        (self.days_since_epoch() + 3).rem_euclid(7) as usize
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Accepts `YYYY-MM-DD`, optionally followed by a `T…` time part which
    /// is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let day_part = s.split_once('T').map_or(s, |(d, _)| d);
        let mut parts = day_part.splitn(3, '-');
        let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DateError::Format(s.to_string()));
        };
        let digits = |p: &str, len: usize| p.len() == len && p.bytes().all(|b| b.is_ascii_digit());
        if !(digits(y, 4) && digits(m, 2) && digits(d, 2)) {
            return Err(DateError::Format(s.to_string()));
        }
        let parse = |p: &str| {
            p.parse::<u16>()
                .map_err(|_| DateError::Format(s.to_string()))
        };
        let (year, month, day) = (parse(y)?, parse(m)?, parse(d)?);
        let month = u8::try_from(month).map_err(|_| DateError::Range(s.to_string()))?;
        let day = u8::try_from(day).map_err(|_| DateError::Range(s.to_string()))?;
        Date::new(i32::from(year), month, day).ok_or_else(|| DateError::Range(s.to_string()))
    }
}

/// ISO form, `2025-01-15`.
impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn parses_iso_date() {
        let d = date("2025-01-15");
        assert_eq!(Some(d), Date::new(2025, 1, 15));
        assert_eq!(d.year(), 2025);
    }

    #[test]
    fn ignores_time_part() {
        assert_eq!(date("2024-12-20T09:30:00Z"), date("2024-12-20"));
    }

    #[test]
    fn rejects_bad_format() {
        for s in [
            "",
            "2025/01/15",
            "25-01-15",
            "2025-1-15",
            "2025-01-xx",
            "+202-01-01",
            "2025-+1-01",
            "2025-01-+5",
        ] {
            assert!(matches!(s.parse::<Date>(), Err(DateError::Format(_))), "{s}");
        }
    }

    #[test]
    fn rejects_out_of_range() {
        for s in ["2025-13-01", "2025-00-10", "2025-02-29", "2025-04-31"] {
            assert!(matches!(s.parse::<Date>(), Err(DateError::Range(_))), "{s}");
        }
        assert!("2024-02-29".parse::<Date>().is_ok());
    }

    #[test]
    fn long_form() {
        assert_eq!(date("2025-01-15").long_form(), "January 15, 2025");
        assert_eq!(date("2024-12-01").long_form(), "December 1, 2024");
    }

    #[test]
    fn rfc2822_has_weekday() {
        assert_eq!(
            date("2025-01-15").to_rfc2822(),
            "Wed, 15 Jan 2025 00:00:00 GMT"
        );
        assert_eq!(
            date("2000-02-29").to_rfc2822(),
            "Tue, 29 Feb 2000 00:00:00 GMT"
        );
        assert_eq!(
            date("1970-01-01").to_rfc2822(),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn days_since_epoch() {
        assert_eq!(date("1970-01-01").days_since_epoch(), 0);
        assert_eq!(date("1970-01-02").days_since_epoch(), 1);
        assert_eq!(date("1969-12-31").days_since_epoch(), -1);
        assert_eq!(date("2000-03-01").days_since_epoch(), 11_017);
    }

    #[test]
    fn orders_chronologically() {
        let mut dates = vec![date("2024-12-20"), date("2025-01-15"), date("2023-09-20")];
        dates.sort();
        let shown: Vec<String> = dates.iter().map(Date::to_string).collect();
        assert_eq!(shown, vec!["2023-09-20", "2024-12-20", "2025-01-15"]);
    }

    #[test]
    fn serde_round_trip_through_toml() {
        #[derive(Serialize, Deserialize)]
        struct Doc {
            date: Date,
        }
        let doc: Doc = toml::from_str(r#"date = "2024-06-20""#).unwrap();
        assert_eq!(doc.date, date("2024-06-20"));
        assert!(toml::to_string(&doc).unwrap().contains("2024-06-20"));
        assert!(toml::from_str::<Doc>(r#"date = "2024-06-31""#).is_err());
    }
}
