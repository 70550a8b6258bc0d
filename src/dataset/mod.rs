//! Passenger manifest loading
//!
//! Reads the comma-separated manifest format: a header row naming the
//! columns, then one passenger per record. Columns may come in any order and
//! unknown columns are ignored.
//!
//! - Integer columns: `PassengerId`, `Survived`, `Pclass`, `SibSp`, `Parch`
//! - Real columns: `Age`, `Fare` (empty = unknown)
//! - Everything else is text (empty = absent)
//!
//! Quoting follows RFC 4180, so names such as `"Braund, Mr. Owen Harris"`
//! keep their comma and a quoted field may span lines. Fields are trimmed.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{VoyageError, VoyageResult};
use crate::models::{Passenger, RawPassenger};
use crate::pipeline::ensure_unique_ids;

/// Columns that must appear in the header
const REQUIRED_COLUMNS: &[&str] = &["PassengerId", "Pclass", "Sex"];

/// One manifest record as it appears on disk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ManifestRow {
    #[serde(rename = "PassengerId")]
    passenger_id: Option<u32>,

    #[serde(rename = "Survived")]
    survived: Option<u8>,

    #[serde(rename = "Pclass")]
    pclass: Option<u8>,

    #[serde(rename = "Name")]
    name: Option<String>,

    #[serde(rename = "Sex")]
    sex: Option<String>,

    #[serde(rename = "Age")]
    age: Option<f64>,

    #[serde(rename = "SibSp")]
    sib_sp: Option<u32>,

    #[serde(rename = "Parch")]
    parch: Option<u32>,

    #[serde(rename = "Ticket")]
    ticket: Option<String>,

    #[serde(rename = "Fare")]
    fare: Option<f64>,

    #[serde(rename = "Cabin")]
    cabin: Option<String>,

    #[serde(rename = "Embarked")]
    embarked: Option<String>,
}

impl ManifestRow {
    fn into_raw(self, line: u64) -> VoyageResult<RawPassenger> {
        let survived = match self.survived {
            None => None,
            Some(0) => Some(false),
            Some(1) => Some(true),
            Some(other) => {
                return Err(malformed_line(
                    line,
                    format!("Survived must be 0 or 1, got {other}"),
                ))
            }
        };

        Ok(RawPassenger {
            id: self.passenger_id,
            survived,
            pclass: self.pclass,
            name: self.name,
            sex: self.sex,
            age: non_negative(line, "Age", self.age)?,
            sib_sp: self.sib_sp,
            parch: self.parch,
            ticket: self.ticket,
            fare: non_negative(line, "Fare", self.fare)?,
            cabin: self.cabin,
            embarked: self.embarked,
        })
    }
}

/// Load and validate every passenger of a manifest file
pub fn load_csv(path: &Path) -> VoyageResult<Vec<Passenger>> {
    let text = std::fs::read_to_string(path)?;
    let passengers = parse_csv(&text)?;
    info!("Loaded {} passengers from {}", passengers.len(), path.display());
    Ok(passengers)
}

/// Parse and validate a manifest held in memory
pub fn parse_csv(text: &str) -> VoyageResult<Vec<Passenger>> {
    let passengers = parse_raw(text)?
        .into_iter()
        .map(|(line, raw)| {
            Passenger::try_from(raw).map_err(|e| match e {
                VoyageError::MalformedInput { record, reason } => {
                    VoyageError::malformed(format!("line {line} ({record})"), reason)
                }
                other => other,
            })
        })
        .collect::<VoyageResult<Vec<_>>>()?;
    ensure_unique_ids(&passengers)?;
    Ok(passengers)
}

/// Read a manifest into raw records, paired with the line each record starts on
pub fn parse_raw(text: &str) -> VoyageResult<Vec<(usize, RawPassenger)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_error)?.clone();
    if headers.is_empty() {
        debug!("Empty manifest");
        return Ok(Vec::new());
    }
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(VoyageError::malformed(
                "header (line 1)",
                format!("missing required column {column}"),
            ));
        }
    }

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record).map_err(csv_error)? {
        let line = record.position().map_or(0, |p| p.line());
        let row: ManifestRow = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed_line(line, deserialize_reason(e)))?;
        rows.push((line as usize, row.into_raw(line)?));
    }
    Ok(rows)
}

fn non_negative(line: u64, column: &str, value: Option<f64>) -> VoyageResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(malformed_line(
            line,
            format!("{column} is not a valid non-negative number: '{v}'"),
        )),
        other => Ok(other),
    }
}

fn malformed_line(line: u64, reason: impl Into<String>) -> VoyageError {
    VoyageError::malformed(format!("line {line}"), reason)
}

/// Reader failures: I/O stays I/O, everything else is a malformed record
fn csv_error(err: csv::Error) -> VoyageError {
    let line = err.position().map_or(0, |p| p.line());
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => VoyageError::Io(e),
        _ => malformed_line(line, message),
    }
}

/// The field-level cause of a deserialize error, without the reader's framing
fn deserialize_reason(err: csv::Error) -> String {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked";

    #[test]
    fn test_quoted_fields() {
        let text = format!(
            "{HEADER}\n\
             1,0,3,\"Braund, Mr. Owen Harris\",male,22,1,0,A/5 21171,7.25,,S\n\
             2,1,1,\"O'Brien, Mrs. Thomas (Johanna \"\"Hannah\"\" Godfrey)\",female,,1,0,370365,15.5,,Q\n"
        );
        let passengers = parse_csv(&text).unwrap();
        assert_eq!(passengers[0].name.as_deref(), Some("Braund, Mr. Owen Harris"));
        assert_eq!(
            passengers[1].name.as_deref(),
            Some(r#"O'Brien, Mrs. Thomas (Johanna "Hannah" Godfrey)"#)
        );
    }

    #[test]
    fn test_quoted_field_spanning_lines() {
        let text = "PassengerId,Pclass,Sex,Name\n1,3,male,\"Braund,\nMr. Owen\"\n2,1,female,\"Cumings, Mrs. John\"\n";
        let passengers = parse_csv(text).unwrap();
        assert_eq!(passengers.len(), 2);
        assert_eq!(passengers[0].name.as_deref(), Some("Braund,\nMr. Owen"));
        assert_eq!(passengers[1].id, 2);
    }

    #[test]
    fn test_line_numbers_follow_record_starts() {
        let text = "PassengerId,Pclass,Sex,Name\n1,3,male,\"Braund,\nMr. Owen\"\n2,3,,x\n";
        let err = parse_csv(text).unwrap_err();
        assert!(err.to_string().contains("line 4"), "{err}");
    }

    #[test]
    fn test_parse_typical_rows() {
        let text = format!(
            "{HEADER}\n\
             1,0,3,\"Braund, Mr. Owen Harris\",male,22,1,0,A/5 21171,7.25,,S\n\
             2,1,1,\"Cumings, Mrs. John Bradley (Florence Briggs Thayer)\",female,38,1,0,PC 17599,71.2833,C85,C\r\n\
             6,0,3,\"Moran, Mr. James\",male,,0,0,330877,8.4583,,Q\n"
        );
        let passengers = parse_csv(&text).unwrap();
        assert_eq!(passengers.len(), 3);

        let braund = &passengers[0];
        assert_eq!(braund.id, 1);
        assert_eq!(braund.survived, Some(false));
        assert_eq!(braund.name.as_deref(), Some("Braund, Mr. Owen Harris"));
        assert_eq!(braund.age, Some(22.0));
        assert_eq!(braund.sib_sp, Some(1));
        assert_eq!(braund.cabin, None);
        assert_eq!(braund.embarked.as_deref(), Some("S"));

        assert_eq!(passengers[1].cabin.as_deref(), Some("C85"));
        assert_eq!(passengers[1].embarked.as_deref(), Some("C"));
        assert_eq!(passengers[2].age, None);
    }

    #[test]
    fn test_columns_in_any_order() {
        let text = "Sex,Pclass,PassengerId,Extra\nfemale,2,10,whatever\n";
        let passengers = parse_csv(text).unwrap();
        assert_eq!(passengers[0].id, 10);
        assert_eq!(passengers[0].pclass, 2);
        assert_eq!(passengers[0].fare, None);
        assert_eq!(passengers[0].survived, None);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let text = " PassengerId , Pclass , Sex , Embarked \n 7 , 1 , male ,   \n";
        let passengers = parse_csv(text).unwrap();
        assert_eq!(passengers[0].id, 7);
        assert_eq!(passengers[0].sex, "male");
        assert_eq!(passengers[0].embarked, None);
    }

    #[test]
    fn test_missing_required_value_is_malformed() {
        let text = format!("{HEADER}\n1,0,3,\"Braund, Mr. Owen Harris\",,22,1,0,A/5,7.25,,S\n");
        let err = parse_csv(&text).unwrap_err();
        assert!(matches!(err, VoyageError::MalformedInput { .. }));
        assert!(err.to_string().contains("line 2"), "{err}");
        assert!(err.to_string().contains("Sex"), "{err}");
    }

    #[test]
    fn test_missing_required_column_is_malformed() {
        let err = parse_csv("PassengerId,Sex\n1,male\n").unwrap_err();
        assert!(err.to_string().contains("Pclass"), "{err}");
    }

    #[test]
    fn test_bad_numbers_are_malformed() {
        for row in [
            "1,0,3,x,male,abc,0,0,t,7.25,,S",
            "1,0,3,x,male,22,-1,0,t,7.25,,S",
            "1,0,3,x,male,22,0,0,t,NaN,,S",
            "1,0,3,x,male,22,0,0,t,-5,,S",
            "1,2,3,x,male,22,0,0,t,5,,S",
            "1,0,7,x,male,22,0,0,t,5,,S",
            "1,0,3,x,male,22,0,0,t,5,,S,extra",
        ] {
            let text = format!("{HEADER}\n{row}\n");
            let result = parse_csv(&text);
            assert!(
                matches!(result, Err(VoyageError::MalformedInput { .. })),
                "{row}: {result:?}"
            );
        }
    }

    #[test]
    fn test_huge_family_counts_load() {
        let passengers = parse_csv("PassengerId,Pclass,Sex,SibSp,Parch\n1,3,male,4294967295,0\n").unwrap();
        assert_eq!(passengers[0].sib_sp, Some(u32::MAX));
        assert_eq!(crate::features::derive(&passengers[0]).family_size, None);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let text = format!("{HEADER}\n1,0,3,a,male,,,,,,,\n1,1,2,b,female,,,,,,,\n");
        let err = parse_csv(&text).unwrap_err();
        assert!(err.to_string().contains("duplicate"), "{err}");
    }

    #[test]
    fn test_empty_and_header_only() {
        assert!(parse_csv("").unwrap().is_empty());
        assert!(parse_csv(&format!("{HEADER}\n\n")).unwrap().is_empty());
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, VoyageError::Io(_)));
    }
}
