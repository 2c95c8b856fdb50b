use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::alarm::{next_occurrence, AlarmId, AlarmRecord};

/// the thing that actually makes an alarm go off
pub trait AlarmScheduler {
    /// creates or replaces the schedule entry for `record.id`
    fn arm(&mut self, record: &AlarmRecord);
    /// removes the schedule entry for `id`, doing nothing if there is none
    fn cancel(&mut self, id: AlarmId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    time: NaiveTime,
    fire_at: NaiveDateTime,
    repeating: bool,
}

/// an alarm that came due in [`LocalScheduler::fire_due`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: AlarmId,
    pub time: NaiveTime,
    pub repeating: bool,
}

/// keeps schedule entries in process, the gui polls it every frame
#[derive(Debug, Default)]
pub struct LocalScheduler {
    entries: HashMap<AlarmId, Entry>,
}

impl LocalScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_at(&mut self, record: &AlarmRecord, now: NaiveDateTime) {
        let entry = Entry {
            time: record.time,
            fire_at: next_occurrence(record.time, now),
            repeating: record.repeating,
        };
        log::debug!("arming alarm {} for {}", record.id, entry.fire_at);
        self.entries.insert(record.id, entry);
    }

    /// removes one-shot alarms that are due and pushes repeating ones to their next day
    pub fn fire_due(&mut self, now: NaiveDateTime) -> Vec<Fired> {
        let mut fired = Vec::new();
        self.entries.retain(|&id, entry| {
            if entry.fire_at > now {
                return true;
            }
            fired.push(Fired {
                id,
                time: entry.time,
                repeating: entry.repeating,
            });
            if entry.repeating {
                while entry.fire_at <= now {
                    entry.fire_at += Duration::days(1);
                }
            }
            entry.repeating
        });
        fired.sort_by_key(|fired| fired.id);
        fired
    }

    #[must_use]
    pub fn next_fire(&self, id: AlarmId) -> Option<NaiveDateTime> {
        self.entries.get(&id).map(|entry| entry.fire_at)
    }

    #[must_use]
    pub fn is_armed(&self, id: AlarmId) -> bool {
        self.entries.contains_key(&id)
    }

    /// makes the entries match `records`: enabled alarms are armed, everything else is dropped,
    /// including ids that are no longer in `records` at all
    pub fn sync_at(&mut self, records: &[AlarmRecord], now: NaiveDateTime) {
        let before = self.entries.len();
        self.entries
            .retain(|id, _| records.iter().any(|record| record.id == *id && record.enabled));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            log::debug!("dropped {dropped} stale schedule entries");
        }
        for record in records.iter().filter(|record| record.enabled) {
            self.arm_at(record, now);
        }
    }

    pub fn sync(&mut self, records: &[AlarmRecord]) {
        self.sync_at(records, chrono::Local::now().naive_local());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AlarmScheduler for LocalScheduler {
    fn arm(&mut self, record: &AlarmRecord) {
        self.arm_at(record, chrono::Local::now().naive_local());
    }

    fn cancel(&mut self, id: AlarmId) {
        if self.entries.remove(&id).is_some() {
            log::debug!("cancelled alarm {id}");
        }
    }
}
