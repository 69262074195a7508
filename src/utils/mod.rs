//! Project-specific utilities live here.

use biblio_http::error::AppError;
use biblio_store::RecordId;

/// English ordinal rendering of a day of month ("1st", "22nd", "13th").
pub fn ordinal_day(day: u8) -> String {
    let suffix = match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{day}{suffix}")
}

/// Parse a path-supplied record id.
///
/// A malformed id names a document that cannot exist, so it surfaces as the
/// same not-found error as a well-formed but absent one.
pub fn parse_record_id(raw: &str, not_found_message: &str) -> Result<RecordId, AppError> {
    raw.parse()
        .map_err(|_| AppError::not_found(not_found_message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_day_covers_teens_and_edges() {
        assert_eq!(ordinal_day(1), "1st");
        assert_eq!(ordinal_day(2), "2nd");
        assert_eq!(ordinal_day(3), "3rd");
        assert_eq!(ordinal_day(4), "4th");
        assert_eq!(ordinal_day(11), "11th");
        assert_eq!(ordinal_day(12), "12th");
        assert_eq!(ordinal_day(13), "13th");
        assert_eq!(ordinal_day(21), "21st");
        assert_eq!(ordinal_day(22), "22nd");
        assert_eq!(ordinal_day(31), "31st");
    }

    #[test]
    fn malformed_record_id_maps_to_not_found() {
        let err = parse_record_id("not-a-uuid", "Genre not found").unwrap_err();
        match err {
            AppError::NotFound { message } => assert_eq!(message, "Genre not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
