use skylog_services::{HistoryRecord, RecordId};

/// Local mirror of the persisted history, replaced wholesale on every refresh.
///
/// Refreshes are numbered. Only the completion of the most recently started
/// refresh is applied, so an older list that arrives late never overwrites a
/// newer one.
#[derive(Debug, Default)]
pub struct HistoryStore {
    records: Vec<HistoryRecord>,
    latest_seq: u64,
    applied_seq: u64,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh and get its sequence number.
    pub fn begin_refresh(&mut self) -> u64 {
        self.latest_seq += 1;
        self.latest_seq
    }

    /// Replace the cache with a completed fetch. Returns `false` if a newer
    /// refresh has been started since.
    pub fn apply_refresh(&mut self, seq: u64, records: Vec<HistoryRecord>) -> bool {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "stale history refresh discarded");
            return false;
        }

        tracing::info!("History refreshed: {} records", records.len());
        self.records = records;
        self.applied_seq = seq;
        true
    }

    /// Records in backend order.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn find_by_id(&self, id: &RecordId) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the latest started refresh has been applied.
    pub fn is_current(&self) -> bool {
        self.applied_seq == self.latest_seq
    }
}
