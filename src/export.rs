/// Grouped CSV export.
///
/// Builds the presentation table from the processed rows: fixed column
/// order, one blank record between consecutive address groups, and a
/// semicolon-separated CSV file. The semicolon keeps the output readable
/// in spreadsheet locales that use the comma as decimal separator.

use std::path::{Path, PathBuf};

use crate::model::{MeasurementRow, MeetboutError};

impl From<csv::Error> for MeetboutError {
    fn from(e: csv::Error) -> Self {
        MeetboutError::Io(e.to_string())
    }
}

/// Presentation column order of the output file.
pub const OUTPUT_COLUMNS: [&str; 10] = [
    "meetbout",
    "status",
    "adres",
    "datum",
    "hoeveelsteMeting",
    "hoogteTovNap",
    "zakkingCumulatief",
    "zakking",
    "zakkingssnelheid",
    "zakkingLaatstePeriode",
];

/// Builds the output table from rows that are already grouped by address
/// and date-ordered (the order `compute_recent_rates` produces).
///
/// A fully blank record precedes the first row of every address group
/// except the very first, so distinct addresses read as visually
/// separated blocks. The blank-record count always equals the number of
/// distinct addresses minus one.
pub fn build_table(rows: &[MeasurementRow]) -> Vec<Vec<String>> {
    let mut table = Vec::with_capacity(rows.len());
    let mut last_address: Option<&str> = None;

    for row in rows {
        if let Some(prev) = last_address {
            if prev != row.address {
                table.push(blank_record());
            }
        }
        last_address = Some(&row.address);
        table.push(to_record(row));
    }

    table
}

/// One row in presentation column order. All values use the type's
/// default rendering; an absent supplied rate becomes the empty string.
fn to_record(row: &MeasurementRow) -> Vec<String> {
    vec![
        row.device_id.clone(),
        row.device_status.clone(),
        row.address.clone(),
        row.datum.clone(),
        row.measurement_index.to_string(),
        row.height_above_nap.to_string(),
        row.cumulative_subsidence.to_string(),
        row.subsidence.to_string(),
        row.supplied_rate.map(|r| r.to_string()).unwrap_or_default(),
        row.recent_rate.to_string(),
    ]
}

fn blank_record() -> Vec<String> {
    vec![String::new(); OUTPUT_COLUMNS.len()]
}

/// Writes the header and table to `path` as semicolon-separated CSV.
/// No index column is emitted.
///
/// The records go to a sibling temporary file first, renamed into place
/// only after a complete write, so a failed run never leaves a partial
/// output file at `path`.
pub fn write_csv(path: &Path, table: &[Vec<String>]) -> Result<(), MeetboutError> {
    let tmp = tmp_path(path);
    if let Err(e) = write_records(&tmp, table) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    std::fs::rename(&tmp, path).map_err(|e| MeetboutError::Io(e.to_string()))
}

fn write_records(path: &Path, table: &[Vec<String>]) -> Result<(), MeetboutError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)?;

    writer.write_record(OUTPUT_COLUMNS)?;
    for record in table {
        writer.write_record(record)?;
    }
    writer.flush().map_err(|e| MeetboutError::Io(e.to_string()))?;

    Ok(())
}

/// Sibling path for the in-progress write (`output.csv` → `output.csv.tmp`).
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::meetbouten::parse_datum;

    fn row(address: &str, datum: &str) -> MeasurementRow {
        MeasurementRow {
            address: address.to_string(),
            height_above_nap: 1.234,
            device_id: "10381459".to_string(),
            device_status: "Actueel".to_string(),
            cumulative_subsidence: 4.6,
            subsidence: 0.25,
            supplied_rate: Some(1.3),
            datum: datum.to_string(),
            date: parse_datum(datum),
            measurement_index: 2,
            recent_rate: 0.5,
        }
    }

    #[test]
    fn test_record_follows_presentation_column_order() {
        let record = to_record(&row("Kerkstraat 1", "2021-06-14"));
        assert_eq!(
            record,
            vec![
                "10381459",
                "Actueel",
                "Kerkstraat 1",
                "2021-06-14",
                "2",
                "1.234",
                "4.6",
                "0.25",
                "1.3",
                "0.5",
            ]
        );
        assert_eq!(record.len(), OUTPUT_COLUMNS.len());
    }

    #[test]
    fn test_absent_supplied_rate_renders_empty() {
        let mut r = row("Kerkstraat 1", "2021-06-14");
        r.supplied_rate = None;
        assert_eq!(to_record(&r)[8], "");
    }

    #[test]
    fn test_infinite_subsidence_renders_as_inf() {
        let mut r = row("Kerkstraat 1", "2021-06-14");
        r.subsidence = f64::INFINITY;
        assert_eq!(to_record(&r)[7], "inf");
    }

    #[test]
    fn test_blank_record_between_groups_only() {
        // Groups of sizes 2 and 1: exactly one blank record, placed
        // between the last row of the first group and the first row of
        // the second. No leading blank before the first group.
        let rows = vec![
            row("Kerkstraat 1", "2020-01-01"),
            row("Kerkstraat 1", "2021-01-01"),
            row("Kerkstraat 3", "2020-06-01"),
        ];
        let table = build_table(&rows);

        assert_eq!(table.len(), 4);
        assert_eq!(table[0][2], "Kerkstraat 1");
        assert_eq!(table[1][2], "Kerkstraat 1");
        assert_eq!(table[2], blank_record());
        assert_eq!(table[3][2], "Kerkstraat 3");
    }

    #[test]
    fn test_blank_record_count_is_groups_minus_one() {
        let rows = vec![
            row("A", "2020-01-01"),
            row("B", "2020-01-01"),
            row("B", "2021-01-01"),
            row("C", "2020-01-01"),
        ];
        let table = build_table(&rows);

        let blanks = table.iter().filter(|r| r.iter().all(String::is_empty)).count();
        assert_eq!(blanks, 2);
        assert!(!table[0].iter().all(String::is_empty));
    }

    #[test]
    fn test_blank_record_spans_all_columns() {
        assert_eq!(blank_record().len(), OUTPUT_COLUMNS.len());
    }

    #[test]
    fn test_empty_input_builds_empty_table() {
        assert!(build_table(&[]).is_empty());
    }

    #[test]
    fn test_write_csv_uses_semicolons_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");

        let rows = vec![row("Kerkstraat 1", "2021-06-14")];
        write_csv(&path, &build_table(&rows)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), OUTPUT_COLUMNS.join(";"));
        assert_eq!(
            lines.next().unwrap(),
            "10381459;Actueel;Kerkstraat 1;2021-06-14;2;1.234;4.6;0.25;1.3;0.5"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_successful_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");

        write_csv(&path, &build_table(&[row("Kerkstraat 1", "2021-06-14")])).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_produces_no_output_file() {
        let dir = tempfile::tempdir().unwrap();
        // Nonexistent parent directory: the write must fail and leave
        // nothing behind, neither the output file nor the temporary.
        let path = dir.path().join("missing").join("output.csv");

        let result = write_csv(&path, &build_table(&[row("Kerkstraat 1", "2021-06-14")]));

        assert!(matches!(result, Err(MeetboutError::Io(_))));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
