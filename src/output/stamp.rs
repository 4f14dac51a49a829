//! Run stamps used to name and correlate artifacts

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fmt;

/// Stamp format: lexicographic order equals chronological order
pub const RUN_STAMP_FORMAT: &str = "%Y%m%d-%H%M";

/// Minute-resolution timestamp prefixed to every artifact file name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunStamp(String);

impl RunStamp {
    /// Stamp for the current local time
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(at.format(RUN_STAMP_FORMAT).to_string())
    }

    /// Parses a stamp string such as `20241017-0930`
    pub fn parse(value: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(value, RUN_STAMP_FORMAT).ok()?;
        // Reject non-canonical spellings the parser tolerates
        (value.len() == 13).then(|| Self(value.to_string()))
    }

    /// Splits `{stamp}-{rest}` into the stamp and the rest
    ///
    /// The stamp is the first two `-`-separated segments of the name.
    pub fn split_file_name(file_name: &str) -> Option<(Self, &str)> {
        let mut parts = file_name.splitn(3, '-');
        let date = parts.next()?;
        let time = parts.next()?;
        let rest = parts.next()?;
        let stamp = Self::parse(&format!("{}-{}", date, time))?;
        Some((stamp, rest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_from_datetime() {
        let at = Utc.with_ymd_and_hms(2024, 10, 17, 9, 30, 59).unwrap();
        assert_eq!(RunStamp::from_datetime(&at).as_str(), "20241017-0930");
    }

    #[test]
    fn test_now_round_trips_through_parse() {
        let stamp = RunStamp::now();
        assert_eq!(RunStamp::parse(stamp.as_str()), Some(stamp));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(RunStamp::parse("20241317-0930"), None);
        assert_eq!(RunStamp::parse("2024101-0930"), None);
        assert_eq!(RunStamp::parse("word-data"), None);
        assert_eq!(RunStamp::parse(""), None);
    }

    #[test]
    fn test_split_file_name() {
        let (stamp, rest) = RunStamp::split_file_name("20241017-0930-word-data.csv").unwrap();
        assert_eq!(stamp.as_str(), "20241017-0930");
        assert_eq!(rest, "word-data.csv");

        assert!(RunStamp::split_file_name("word-data.csv").is_none());
        assert!(RunStamp::split_file_name("20241017-0930").is_none());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let earlier = RunStamp::parse("20241017-0959").unwrap();
        let later = RunStamp::parse("20241017-1000").unwrap();
        assert!(earlier < later);
    }
}
