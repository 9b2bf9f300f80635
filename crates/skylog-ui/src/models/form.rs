//! Form input validation and the edit-modal draft.

use chrono::NaiveDate;
use skylog_core::ValidationError;
use skylog_services::{HistoryRecord, RecordId};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Parse both dates and reject a range that starts after it ends.
/// Runs before any request is made.
pub fn validate_date_range(
    start: &str,
    end: &str,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;

    if start > end {
        return Err(ValidationError::StartAfterEnd);
    }
    Ok((start, end))
}

/// Location must contain something other than whitespace. The text itself is sent untouched.
pub fn validate_location(raw: &str) -> Result<(), ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyLocation);
    }
    Ok(())
}

/// Field values of the update modal, hydrated from the cached record.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDraft {
    pub id: RecordId,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
}

impl From<&HistoryRecord> for UpdateDraft {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            id: record.id.clone(),
            location: record.location.clone(),
            start_date: record.start_date.format(DATE_FORMAT).to_string(),
            end_date: record.end_date.format(DATE_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_after_end_is_rejected() {
        assert_eq!(
            validate_date_range("2024-03-10", "2024-03-01"),
            Err(ValidationError::StartAfterEnd)
        );
    }

    #[test]
    fn ordered_range_proceeds() {
        let (start, end) = validate_date_range("2024-03-01", "2024-03-10").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn same_day_range_is_allowed() {
        assert!(validate_date_range("2024-02-29", "2024-02-29").is_ok());
    }

    #[test]
    fn dates_compare_as_calendar_dates() {
        assert_eq!(
            validate_date_range("2024-12-01", "2025-01-01").map(|(_, e)| e),
            Ok(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        );
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert_eq!(
            validate_date_range("yesterday", "2024-03-01"),
            Err(ValidationError::InvalidDate("yesterday".into()))
        );
        assert!(matches!(
            validate_date_range("2024-03-01", "2024-02-30"),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn blank_location_is_rejected() {
        assert_eq!(validate_location("   "), Err(ValidationError::EmptyLocation));
        assert!(validate_location(" Oslo ").is_ok());
    }

    #[test]
    fn draft_from_record() {
        let record = HistoryRecord {
            id: RecordId::from(5),
            location: "Porto, Portugal".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            temperatures: "{}".to_string(),
        };

        let draft = UpdateDraft::from(&record);
        assert_eq!(draft.id.as_str(), "5");
        assert_eq!(draft.start_date, "2024-01-05");
        assert_eq!(draft.end_date, "2024-01-07");
    }
}
