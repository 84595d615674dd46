use chrono::{NaiveDate, NaiveDateTime};

/// Date layouts the daily exports have been seen using.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m/%d/%y", "%d %b %Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Permissive parse of a cell into a calendar date.
///
/// Tries each known layout in turn; anything unparseable is `None` so the
/// caller can treat it as a missing value rather than an error.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim().trim_matches('"');
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_layouts() {
        let expect = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(parse_date("2024-01-31"), Some(expect));
        assert_eq!(parse_date("2024/01/31"), Some(expect));
        assert_eq!(parse_date("01/31/2024"), Some(expect));
        assert_eq!(parse_date(" 2024-01-31 "), Some(expect));
        assert_eq!(parse_date("2024-01-31 08:15:00"), Some(expect));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("bad-date"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("0.42"), None);
    }
}
