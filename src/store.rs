use crate::record::{Record, sort_newest_first};

/// In-memory cache of the full record set.
///
/// The collection is rebuilt wholesale on every fetch; there is no
/// incremental update. A failed fetch keeps the previous data on screen
/// and records the failure for a visible notice instead of clearing the
/// table.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    last_error: Option<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, index: u32) -> Option<&Record> {
        self.records.iter().find(|r| r.index == Some(index))
    }

    /// Replace the cache with a fresh fetch, newest first.
    pub fn replace(&mut self, mut records: Vec<Record>) {
        sort_newest_first(&mut records);
        self.records = records;
        self.last_error = None;
    }

    /// Record a failed fetch without touching the cached data.
    pub fn fail(&mut self, message: String) {
        log::warn!("record fetch failed: {message}");
        self.last_error = Some(message);
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: u32, datetime: &str) -> Record {
        Record {
            index: Some(index),
            datetime: datetime.into(),
            exercise: "squat".into(),
            reps: Some(10),
            ..Record::default()
        }
    }

    #[test]
    fn replace_sorts_newest_first() {
        let mut store = RecordStore::new();
        store.replace(vec![
            record(0, "2024-05-01T08:00"),
            record(1, "2024-05-03T08:00"),
            record(2, "2024-05-02T08:00"),
        ]);
        let dates: Vec<&str> = store.records().iter().map(|r| r.datetime.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2024-05-03T08:00", "2024-05-02T08:00", "2024-05-01T08:00"]
        );
    }

    #[test]
    fn failure_keeps_previous_records() {
        let mut store = RecordStore::new();
        store.replace(vec![record(0, "2024-05-01T08:00")]);
        store.fail("connection refused".into());
        assert_eq!(store.len(), 1);
        assert_eq!(store.last_error(), Some("connection refused"));
    }

    #[test]
    fn successful_reload_clears_the_error() {
        let mut store = RecordStore::new();
        store.fail("connection refused".into());
        store.replace(Vec::new());
        assert_eq!(store.last_error(), None);
    }

    #[test]
    fn find_matches_on_server_index() {
        let mut store = RecordStore::new();
        store.replace(vec![record(3, "2024-05-01T08:00"), record(7, "2024-05-02T08:00")]);
        assert_eq!(store.find(7).unwrap().index, Some(7));
        assert!(store.find(99).is_none());
    }
}
