use crate::alarm::{AlarmId, AlarmRecord};

/// widget state for one row, copied straight from its record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub time_label: String,
    pub enabled: bool,
    pub repeating: bool,
}

/// the alarms currently on screen
///
/// the sequence is only ever replaced as a whole, a row is addressed by its position
#[derive(Debug, Default)]
pub struct AlarmList {
    records: Option<Vec<AlarmRecord>>,
    revision: u64,
}

impl AlarmList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// replaces every row, all of them have to be bound again
    pub fn set_displayed_sequence(&mut self, records: Vec<AlarmRecord>) {
        log::debug!("displaying {} alarms", records.len());
        self.records = Some(records);
        self.revision += 1;
    }

    /// 0 until a sequence has been set
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.records.as_ref().map_or(0, Vec::len)
    }

    /// false until the first [`Self::set_displayed_sequence`], an empty sequence counts as set
    #[must_use]
    pub const fn has_sequence(&self) -> bool {
        self.records.is_some()
    }

    /// bumped on every [`Self::set_displayed_sequence`]
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// # Panics
    /// if `row_index` is past the end of the sequence
    #[must_use]
    pub fn bind_row(&self, row_index: usize, time_format: &str) -> RowView {
        let record = self.record(row_index);
        RowView {
            time_label: record.time_label(time_format),
            enabled: record.enabled,
            repeating: record.repeating,
        }
    }

    /// # Panics
    /// if `row_index` is past the end of the sequence
    #[must_use]
    pub fn record(&self, row_index: usize) -> &AlarmRecord {
        &self.records()[row_index]
    }

    /// # Panics
    /// if `row_index` is past the end of the sequence
    pub fn record_mut(&mut self, row_index: usize) -> &mut AlarmRecord {
        let records: &mut [AlarmRecord] = self.records.as_deref_mut().unwrap_or_default();
        &mut records[row_index]
    }

    #[must_use]
    pub fn position_of(&self, id: AlarmId) -> Option<usize> {
        self.records().iter().position(|record| record.id == id)
    }

    #[must_use]
    pub fn records(&self) -> &[AlarmRecord] {
        self.records.as_deref().unwrap_or_default()
    }
}
