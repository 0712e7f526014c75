//! CSV bulk import: validation pipeline and row upserts.
//!
//! Expected schema is `User ID,Username,Display Name,Month,Day` with one
//! optional header row. The display name may be double-quoted to embed
//! commas; one quoted field per row is honored. Validation produces per
//! row errors and warnings; any hard error rejects the whole batch,
//! warnings never block.

use confetti_db::Database;
use confetti_types::{CanonDate, Error, ImportReport, Result, ValidationReport};
use tracing::{info, warn};

/// Canonical header, used for templates and header detection.
pub const HEADER: &str = "User ID,Username,Display Name,Month,Day";

/// A template with representative rows, one demonstrating an embedded
/// comma via quoting.
pub fn template() -> String {
    format!(
        "{HEADER}\n\
         U12345678,johndoe,John Doe,12,25\n\
         U87654321,janedoe,\"Doe, Jane\",1,15\n\
         UABCDEF12,bobsmith,Bob Smith,7,4\n"
    )
}

/// Check a CSV batch without touching the database.
pub fn validate(text: &str) -> ValidationReport {
    parse(text).1
}

/// Validate, then upsert every row in input order (the last row for a
/// user wins). Any hard validation error rejects the whole batch. A
/// per-row persistence failure is recorded and does not stop the rest.
pub fn import(db: &Database, text: &str) -> Result<ImportReport> {
    let (rows, report) = parse(text);
    if !report.is_valid {
        return Err(Error::ValidationFailed { report });
    }

    let mut imported = 0;
    let mut errors = Vec::new();
    for row in &rows {
        let result = db.upsert_birthday(
            &row.user_id,
            &row.username,
            row.display_name.as_deref(),
            &row.date.to_string(),
        );
        match result {
            Ok(()) => imported += 1,
            Err(e) => {
                warn!("Import failed for {}: {}", row.user_id, e);
                errors.push(format!("{}: {}", row.user_id, e));
            }
        }
    }

    info!("Imported {} birthdays ({} row failures)", imported, errors.len());
    Ok(ImportReport {
        imported,
        errors,
        warnings: report.warnings,
    })
}

struct ParsedRow {
    user_id: String,
    username: String,
    display_name: Option<String>,
    date: CanonDate,
}

fn parse(text: &str) -> (Vec<ParsedRow>, ValidationReport) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut rows = Vec::new();

    if text.trim().is_empty() {
        return (
            rows,
            ValidationReport {
                is_valid: false,
                errors: vec!["CSV data is empty".into()],
                warnings,
            },
        );
    }

    // Data rows are 1-indexed with the header excluded
    let mut row_no = 0usize;
    let mut first_content = true;
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if std::mem::take(&mut first_content) && is_header(line) {
            continue;
        }
        row_no += 1;

        let (fields, unterminated) = split_row(line);
        if unterminated {
            warnings.push(format!("Line {row_no}: Unterminated quoted field"));
        }
        if fields.len() < 5 {
            errors.push(format!("Line {row_no}: Not enough columns (expected 5)"));
            continue;
        }

        let user_id = fields[0].clone();
        if !user_id.starts_with('U') || user_id.len() < 8 {
            warnings.push(format!(
                "Line {row_no}: User ID \"{user_id}\" may not be valid. \
                 Workspace user IDs typically start with U and are 9+ characters."
            ));
        }

        let Ok(month) = fields[3].parse::<u32>() else {
            errors.push(format!("Line {row_no}: Invalid month (must be 1-12)"));
            continue;
        };
        let Ok(day) = fields[4].parse::<u32>() else {
            errors.push(format!("Line {row_no}: Invalid day (must be 1-31)"));
            continue;
        };

        let date = match CanonDate::new(month, day) {
            Ok(date) => date,
            Err(_) if !(1..=12).contains(&month) => {
                errors.push(format!("Line {row_no}: Invalid month (must be 1-12)"));
                continue;
            }
            Err(_) if !(1..=31).contains(&day) => {
                errors.push(format!("Line {row_no}: Invalid day (must be 1-31)"));
                continue;
            }
            Err(_) => {
                errors.push(format!("Line {row_no}: Day {day} is not valid for month {month}"));
                continue;
            }
        };

        rows.push(ParsedRow {
            user_id,
            username: fields[1].clone(),
            display_name: (!fields[2].is_empty()).then(|| fields[2].clone()),
            date,
        });
    }

    if row_no == 0 {
        errors.push("CSV must include at least one data row".into());
    }

    let report = ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    };
    (rows, report)
}

fn is_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.starts_with("user id") || lower.starts_with("userid")
}

/// Split one line on commas, honoring a double-quoted field that may
/// span segments. Returns the fields and whether a quote was left open.
fn split_row(line: &str) -> (Vec<String>, bool) {
    let mut fields = Vec::new();
    let mut unterminated = false;

    let mut segments = line.split(',');
    while let Some(segment) = segments.next() {
        let trimmed = segment.trim();
        let Some(rest) = trimmed.strip_prefix('"') else {
            fields.push(trimmed.to_string());
            continue;
        };

        // Closed within the same segment
        if let Some(inner) = rest.strip_suffix('"') {
            fields.push(inner.to_string());
            continue;
        }

        // Merge subsequent segments until one closes the quote
        let mut merged = rest.to_string();
        let mut closed = false;
        for next in segments.by_ref() {
            merged.push(',');
            if let Some(body) = next.trim_end().strip_suffix('"') {
                merged.push_str(body);
                closed = true;
                break;
            }
            merged.push_str(next);
        }
        if !closed {
            unterminated = true;
        }
        fields.push(merged);
    }

    (fields, unterminated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_template_validates_cleanly() {
        let report = validate(&template());
        assert!(report.is_valid, "errors: {:?}", report.errors);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_quoted_display_name_keeps_embedded_comma() {
        let (_dir, db) = open_test_db();
        let csv = "U1,alice,Alice A,12,25\nU2,bob,\"Lee, Bob\",1,15";

        let report = validate(csv);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());

        let result = import(&db, csv).unwrap();
        assert_eq!(result.imported, 2);

        let row = db.get_birthday("U2").unwrap().unwrap();
        assert_eq!(row.display_name.as_deref(), Some("Lee, Bob"));
        assert_eq!(row.birthdate, "2000-01-15");
    }

    #[test]
    fn test_invalid_month_rejects_whole_batch() {
        let (_dir, db) = open_test_db();
        let csv = "U12345678,alice,Alice A,12,25\nU3,carl,Carl C,13,1";

        let report = validate(csv);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Invalid month"));
        assert!(report.errors[0].starts_with("Line 2:"));

        let err = import(&db, csv).unwrap_err();
        assert!(matches!(err, Error::ValidationFailed { .. }));
        assert!(db.get_birthday("U12345678").unwrap().is_none());
    }

    #[test]
    fn test_day_not_valid_for_month_is_hard_error() {
        for csv in ["U12345678,a,A,2,30,", "U12345678,a,A,4,31"] {
            let report = validate(csv);
            assert!(!report.is_valid, "expected rejection for {csv}");
        }

        // Leap day is always importable
        assert!(validate("U12345678,a,A,2,29").is_valid);
    }

    #[test]
    fn test_short_user_id_is_warning_only() {
        let report = validate("U1,alice,Alice A,12,25");
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("U1"));

        let report = validate("X1234567,alice,Alice A,12,25");
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_header_row_is_skipped() {
        let (_dir, db) = open_test_db();
        let csv = format!("{HEADER}\nU12345678,alice,Alice A,12,25");

        let report = validate(&csv);
        assert!(report.is_valid, "errors: {:?}", report.errors);

        let result = import(&db, &csv).unwrap();
        assert_eq!(result.imported, 1);

        // Leading blank lines do not hide the header
        let padded = format!("\n  \n{HEADER}\nU12345678,alice,Alice A,12,25");
        assert!(validate(&padded).is_valid);
    }

    #[test]
    fn test_unterminated_quote_is_warning() {
        let report = validate("U12345678,alice,\"Alice, A,12,25");
        assert!(report.warnings.iter().any(|w| w.contains("Unterminated")));
        // The merged remainder swallows the rest of the line
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("Not enough columns"));
    }

    #[test]
    fn test_not_enough_columns() {
        let report = validate("U12345678,alice,12,25");
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("Not enough columns"));
    }

    #[test]
    fn test_unparseable_month_and_day() {
        let report = validate("U12345678,alice,Alice A,dec,25");
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("Invalid month"));

        let report = validate("U12345678,alice,Alice A,12,xmas");
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("Invalid day"));
    }

    #[test]
    fn test_empty_and_headerless_inputs() {
        assert!(!validate("").is_valid);
        assert!(!validate("   \n  ").is_valid);
        assert!(!validate(HEADER).is_valid);

        // No header at all is fine
        assert!(validate("U12345678,alice,Alice A,12,25").is_valid);
    }

    #[test]
    fn test_last_row_wins_for_duplicate_user() {
        let (_dir, db) = open_test_db();
        let csv = "U12345678,alice,Alice A,12,25\nU12345678,alice,Alice B,1,2";

        let result = import(&db, csv).unwrap();
        assert_eq!(result.imported, 2);

        let row = db.get_birthday("U12345678").unwrap().unwrap();
        assert_eq!(row.birthdate, "2000-01-02");
        assert_eq!(row.display_name.as_deref(), Some("Alice B"));
    }

    #[test]
    fn test_empty_display_name_stored_as_null() {
        let (_dir, db) = open_test_db();
        import(&db, "U12345678,alice,,12,25").unwrap();

        let row = db.get_birthday("U12345678").unwrap().unwrap();
        assert_eq!(row.display_name, None);
    }
}
