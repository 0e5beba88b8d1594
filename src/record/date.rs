use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::HarvestError;

/// A validated publication date and the year that goes into the journal reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationDate {
    /// ISO 8601 at the precision of the input: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub iso: String,
    pub year: i32,
}

impl PublicationDate {
    pub fn parse(raw: &str) -> Result<Self, HarvestError> {
        let iso = normalise(raw.trim()).ok_or_else(|| HarvestError::DateParse {
            raw: raw.to_string(),
        })?;
        let year = iso
            .get(0..4)
            .and_then(|y| y.parse().ok())
            .ok_or_else(|| HarvestError::DateParse {
                raw: raw.to_string(),
            })?;
        Ok(PublicationDate { iso, year })
    }
}

fn normalise(t: &str) -> Option<String> {
    static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());
    static YEAR_MONTH: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})$").unwrap());

    if YEAR.is_match(t) {
        return Some(t.to_string());
    }
    if let Some(c) = YEAR_MONTH.captures(t) {
        let month: u32 = c[2].parse().ok()?;
        return (1..=12)
            .contains(&month)
            .then(|| format!("{}-{:02}", &c[1], month));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }
    const FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%B %d, %Y", "%d %b %Y", "%b %d, %Y"];
    FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(t, f).ok())
        .map(|d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_iso_date() {
        let d = PublicationDate::parse("2016-03-04").unwrap();
        assert_eq!(d.iso, "2016-03-04");
        assert_eq!(d.year, 2016);
    }

    #[test]
    fn partial_dates_keep_their_precision() {
        assert_eq!(PublicationDate::parse("2014").unwrap().iso, "2014");
        assert_eq!(PublicationDate::parse("2014-3").unwrap().iso, "2014-03");
        assert_eq!(PublicationDate::parse(" 2014/11 ").unwrap().iso, "2014-11");
    }

    #[test]
    fn other_spellings() {
        assert_eq!(
            PublicationDate::parse("2014-03-19T10:00:00Z").unwrap().iso,
            "2014-03-19"
        );
        assert_eq!(PublicationDate::parse("4 March 2016").unwrap().iso, "2016-03-04");
        assert_eq!(PublicationDate::parse("March 4, 2016").unwrap().iso, "2016-03-04");
        assert_eq!(PublicationDate::parse("2016/03/04").unwrap().iso, "2016-03-04");
    }

    #[test]
    fn rejects_impossible_dates() {
        for raw in ["2016-02-30", "2016-13", "", "yesterday"] {
            let err = PublicationDate::parse(raw).unwrap_err();
            assert!(matches!(err, HarvestError::DateParse { .. }), "{raw}");
        }
    }
}
