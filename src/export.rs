use crate::record::{Direction, Record};
use serde::Serialize;
use std::path::Path;

pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Flat row shape for CSV output. Unlike the JSON payload form, absent
/// fields must still occupy a cell so every row has the same width.
#[derive(Serialize)]
struct CsvRow<'a> {
    index: Option<u32>,
    datetime: &'a str,
    exercise: &'a str,
    reps: Option<u32>,
    duration: Option<u32>,
    direction: Option<Direction>,
    note: Option<&'a str>,
}

impl<'a> From<&'a Record> for CsvRow<'a> {
    fn from(r: &'a Record) -> Self {
        Self {
            index: r.index,
            datetime: &r.datetime,
            exercise: &r.exercise,
            reps: r.reps,
            duration: r.duration,
            direction: r.direction,
            note: r.note.as_deref(),
        }
    }
}

/// Save the cached record set as CSV, one fixed-width row per record.
pub fn save_records_csv<P: AsRef<Path>>(path: P, records: &[Record]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in records {
        wtr.serialize(CsvRow::from(r))?;
    }
    wtr.flush().map_err(Into::into)
}

pub fn save_records_json<P: AsRef<Path>>(path: P, records: &[Record]) -> std::io::Result<()> {
    write_json(records, path)
}

/// Write the raw CSV blob returned by the server's `/export-csv` route.
pub fn save_server_csv<P: AsRef<Path>>(path: P, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Direction;

    fn sample_records() -> Vec<Record> {
        vec![
            Record {
                index: Some(0),
                datetime: "2024-05-02T08:00".into(),
                exercise: "lunge".into(),
                reps: Some(12),
                direction: Some(Direction::Both),
                ..Record::default()
            },
            Record {
                index: Some(1),
                datetime: "2024-05-01T08:00".into(),
                exercise: "plank".into(),
                duration: Some(60),
                note: Some("hold steady".into()),
                ..Record::default()
            },
        ]
    }

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        save_records_csv(&path, &sample_records()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("datetime"));
        assert!(lines[1].contains("lunge"));
        assert!(lines[2].contains("hold steady"));
    }

    #[test]
    fn json_round_trips_through_serde() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let records = sample_records();
        save_records_json(&path, &records).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn server_blob_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.csv");
        let blob = b"datetime,exercise\n2024-05-01T08:00,plank\n";
        save_server_csv(&path, blob).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), blob);
    }
}
