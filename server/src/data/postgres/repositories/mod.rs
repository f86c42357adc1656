//! PostgreSQL repositories
//!
//! Free async functions over `&PgPool`. Row structs live in `data::types`.
//! Calendar dates cross the repository boundary as `chrono::NaiveDate` and are
//! stored as TEXT 'YYYY-MM-DD'.

pub mod achievement;
pub mod completion;
pub mod custom_task;
pub mod group;
pub mod membership;
pub mod progress;
pub mod settings;
pub mod user;

use chrono::NaiveDate;

use super::PostgresError;

/// Parse a stored 'YYYY-MM-DD' date column
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, PostgresError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| PostgresError::Decode(format!("Invalid stored date '{}': {}", s, e)))
}

/// Parse an optional stored date column
pub(crate) fn parse_date_opt(s: Option<&str>) -> Result<Option<NaiveDate>, PostgresError> {
    s.map(parse_date).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-14").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()
        );
        assert!(parse_date("2024-1-14").is_err());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn test_parse_date_opt() {
        assert_eq!(parse_date_opt(None).unwrap(), None);
        assert_eq!(
            parse_date_opt(Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_date_opt(Some("2023-02-29")).is_err());
    }
}
