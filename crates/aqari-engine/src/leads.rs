//! Append-only lead collection.

use aqari_core::model::LeadRecord;
use std::sync::Mutex;

/// Process-wide buffer of completed conversation records.
///
/// Durable storage is a downstream concern; exporters read snapshots
/// through [`LeadSink::all`].
#[derive(Default)]
pub struct LeadSink {
    records: Mutex<Vec<LeadRecord>>,
}

impl LeadSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: LeadRecord) {
        self.records
            .lock()
            .expect("lead sink lock poisoned")
            .push(record);
    }

    /// Snapshot copy of all records — never a live view.
    pub fn all(&self) -> Vec<LeadRecord> {
        self.records
            .lock()
            .expect("lead sink lock poisoned")
            .clone()
    }

    pub fn count(&self) -> usize {
        self.records.lock().expect("lead sink lock poisoned").len()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .expect("lead sink lock poisoned")
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqari_core::model::{Lang, LeadPayload, LeadRecord};

    fn sample(sender: &str) -> LeadRecord {
        LeadRecord::new(
            sender,
            Lang::Ar,
            LeadPayload::Property {
                details: "فيلا في الرياض".into(),
            },
        )
    }

    #[test]
    fn test_append_and_count() {
        let sink = LeadSink::new();
        assert_eq!(sink.count(), 0);
        sink.append(sample("a"));
        sink.append(sample("b"));
        assert_eq!(sink.count(), 2);
    }

    #[test]
    fn test_all_is_a_snapshot() {
        let sink = LeadSink::new();
        sink.append(sample("a"));

        let mut snapshot = sink.all();
        snapshot.clear();
        assert_eq!(sink.count(), 1, "mutating a snapshot must not affect the sink");
    }

    #[test]
    fn test_clear() {
        let sink = LeadSink::new();
        sink.append(sample("a"));
        sink.clear();
        assert_eq!(sink.count(), 0);
        assert!(sink.all().is_empty());
    }
}
