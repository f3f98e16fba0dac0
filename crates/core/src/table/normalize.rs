//! Raw-row normalization: trimming, date conversion, and typed rejection.
//!
//! Every way a row can fail carries a reason, so the driver can surface a
//! drop count without changing the happy-path output shape.

use thiserror::Error;

use crate::record::Record;
use crate::table::rows::RawRow;

/// Why a row was dropped instead of becoming a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("empty {field} field")]
    EmptyField { field: &'static str },

    #[error("date {value:?} does not split into day/month/year")]
    MalformedDate { value: String },

    #[error("unknown month name {month:?} in date {value:?}")]
    UnknownMonth { month: String, value: String },
}

/// Turn one raw row into a candidate record.
///
/// The name field is used as-is (it was already trimmed during extraction);
/// date fields are converted from `"DD MonthName YYYY"` to ISO-8601. Any
/// failure rejects the whole row and carries the reason -- never the page.
pub fn normalize_row(raw: &RawRow) -> Result<Record, RowError> {
    if raw.primary_name.is_empty() {
        return Err(RowError::EmptyField {
            field: "primary name",
        });
    }

    let start_date = iso_date(&raw.start_date)?;
    let end_date = iso_date(&raw.end_date)?;

    Ok(Record::new(&raw.primary_name, start_date, end_date))
}

/// Convert `"DD MonthName YYYY"` into `"YYYY-MM-DD"`.
///
/// The field must split into exactly three whitespace-separated tokens and
/// the month name must resolve through the fixed lookup. The day is
/// zero-padded to two digits. No semantic validation beyond that: this is a
/// format conversion, not a calendar check.
fn iso_date(value: &str) -> Result<String, RowError> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let &[day, month, year] = tokens.as_slice() else {
        return Err(RowError::MalformedDate {
            value: value.to_string(),
        });
    };

    let month_number = month_number(month).ok_or_else(|| RowError::UnknownMonth {
        month: month.to_string(),
        value: value.to_string(),
    })?;

    Ok(format!("{year}-{month_number}-{day:0>2}"))
}

/// Fixed month-name lookup. Accepts the abbreviated and full English forms,
/// case-insensitively.
fn month_number(name: &str) -> Option<&'static str> {
    let number = match name.to_ascii_lowercase().as_str() {
        "jan" | "january" => "01",
        "feb" | "february" => "02",
        "mar" | "march" => "03",
        "apr" | "april" => "04",
        "may" => "05",
        "jun" | "june" => "06",
        "jul" | "july" => "07",
        "aug" | "august" => "08",
        "sep" | "september" => "09",
        "oct" | "october" => "10",
        "nov" | "november" => "11",
        "dec" | "december" => "12",
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, start: &str, end: &str) -> RawRow {
        RawRow {
            primary_name: name.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[test]
    fn converts_abbreviated_month() {
        let record = normalize_row(&raw("Example Market", "05 Aug 2021", "06 Aug 2021")).unwrap();
        assert_eq!(record.start_date, "2021-08-05");
        assert_eq!(record.end_date, "2021-08-06");
    }

    #[test]
    fn converts_full_month_name() {
        let record =
            normalize_row(&raw("Example Market", "5 August 2021", "6 August 2021")).unwrap();
        assert_eq!(record.start_date, "2021-08-05");
    }

    #[test]
    fn zero_pads_single_digit_day() {
        let record = normalize_row(&raw("Example Market", "5 Jan 2021", "7 Jan 2021")).unwrap();
        assert_eq!(record.start_date, "2021-01-05");
        assert_eq!(record.end_date, "2021-01-07");
    }

    #[test]
    fn two_token_date_drops_row() {
        let err = normalize_row(&raw("Example Market", "05 Aug", "06 Aug 2021")).unwrap_err();
        assert!(matches!(err, RowError::MalformedDate { .. }));
    }

    #[test]
    fn four_token_date_drops_row() {
        let err =
            normalize_row(&raw("Example Market", "05 Aug 2021 extra", "06 Aug 2021")).unwrap_err();
        assert!(matches!(err, RowError::MalformedDate { .. }));
    }

    #[test]
    fn unknown_month_drops_row() {
        let err = normalize_row(&raw("Example Market", "05 Avg 2021", "06 Aug 2021")).unwrap_err();
        assert_eq!(
            err,
            RowError::UnknownMonth {
                month: "Avg".to_string(),
                value: "05 Avg 2021".to_string(),
            }
        );
    }

    #[test]
    fn empty_name_drops_row() {
        let err = normalize_row(&raw("", "05 Aug 2021", "06 Aug 2021")).unwrap_err();
        assert!(matches!(err, RowError::EmptyField { .. }));
    }

    #[test]
    fn empty_date_drops_row() {
        let err = normalize_row(&raw("Example Market", "", "06 Aug 2021")).unwrap_err();
        assert!(matches!(err, RowError::MalformedDate { .. }));
    }

    #[test]
    fn record_id_is_derived_from_normalized_fields() {
        let record = normalize_row(&raw("Example Market", "01 Jan 2021", "02 Jan 2021")).unwrap();
        assert_eq!(
            record.id,
            crate::record::record_id("Example Market", "2021-01-01", "2021-01-02")
        );
    }
}
