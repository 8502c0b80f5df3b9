use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// A plain year/month/day triple.
///
/// No calendar validation is performed: values are echoed verbatim in both
/// the current-layout object form (`{"y", "m", "d"}`) and the legacy
/// `yyyy-MM-dd` string form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarDate {
    #[serde(rename = "y")]
    pub year: u16,
    #[serde(rename = "m")]
    pub month: u8,
    #[serde(rename = "d")]
    pub day: u8,
}

impl CalendarDate {
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// The current local date.
    pub fn today() -> Self {
        let now = chrono::Local::now().date_naive();
        Self {
            year: now.year().clamp(0, u16::MAX as i32) as u16,
            month: now.month() as u8,
            day: now.day() as u8,
        }
    }

    /// Legacy string form, zero-padded: `2020-01-05`.
    pub fn format_iso(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// Parse the legacy `yyyy-MM-dd` form.
    pub fn parse_iso(s: &str) -> CodecResult<Self> {
        let malformed = || CodecError::MalformedDate(s.to_string());

        let bytes = s.as_bytes();
        if !s.is_ascii() || bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(malformed());
        }
        let digits = |range: std::ops::Range<usize>| -> CodecResult<u16> {
            let part = &s[range];
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse::<u16>().map_err(|_| malformed())
        };

        Ok(Self {
            year: digits(0..4)?,
            month: digits(5..7)? as u8,
            day: digits(8..10)? as u8,
        })
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_iso())
    }
}
