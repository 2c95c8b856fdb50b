//! Turns gestures on a row into state changes and side effects.
//!
//! [`reduce`] decides what a gesture does, [`RowPresenter`] carries it out
//! against the scheduler and the persist queue.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};

use crate::{
    alarm::{format_time_until, time_until, AlarmId, AlarmRecord},
    list::AlarmList,
    scheduler::AlarmScheduler,
    writer::{PersistQueue, WriteTicket},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    TimeTapped,
    EnabledToggled(bool),
    RepeatToggled(bool),
}

/// who flipped a switch
///
/// only the user's own changes act on alarms, rebinding a row must not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    User,
    Programmatic,
}

/// a short message shown after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AlarmSet { time: NaiveTime },
    Repeating,
}

impl Notice {
    #[must_use]
    pub fn message(&self, now: NaiveDateTime) -> String {
        match self {
            Self::AlarmSet { time } => {
                format!("alarm set: {} from now", format_time_until(time_until(*time, now)))
            }
            Self::Repeating => "alarm repeating".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RowTapped { position: usize, id: AlarmId },
    Arm(AlarmRecord),
    Cancel(AlarmId),
    Persist(AlarmRecord),
    Notify(Notice),
}

/// what `gesture` does to the alarm at `position`, effects are listed in the order they must run
#[must_use]
pub fn reduce(record: &AlarmRecord, position: usize, gesture: Gesture) -> (AlarmRecord, Vec<Effect>) {
    let mut updated = record.clone();
    let mut effects = Vec::new();
    match gesture {
        Gesture::TimeTapped => effects.push(Effect::RowTapped {
            position,
            id: record.id,
        }),
        Gesture::EnabledToggled(on) => {
            updated.enabled = on;
            if on {
                effects.push(Effect::Arm(updated.clone()));
                effects.push(Effect::Notify(Notice::AlarmSet { time: updated.time }));
            } else {
                effects.push(Effect::Cancel(updated.id));
            }
            effects.push(Effect::Persist(updated.clone()));
        }
        Gesture::RepeatToggled(repeating) => {
            updated.repeating = repeating;
            if updated.enabled {
                effects.push(Effect::Cancel(updated.id));
                effects.push(Effect::Arm(updated.clone()));
            }
            effects.push(Effect::Persist(updated.clone()));
            if repeating {
                effects.push(Effect::Notify(Notice::Repeating));
            }
        }
    }
    (updated, effects)
}

pub struct RowPresenter<S> {
    scheduler: S,
    writer: PersistQueue,
    on_row_tapped: Box<dyn FnMut(usize, AlarmId)>,
    notices: Vec<Notice>,
}

impl<S> fmt::Debug for RowPresenter<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowPresenter")
            .field("scheduler", &self.scheduler)
            .field("writer", &self.writer)
            .field("notices", &self.notices)
            .finish_non_exhaustive()
    }
}

impl<S: AlarmScheduler> RowPresenter<S> {
    pub fn new(
        scheduler: S,
        writer: PersistQueue,
        on_row_tapped: impl FnMut(usize, AlarmId) + 'static,
    ) -> Self {
        Self {
            scheduler,
            writer,
            on_row_tapped: Box::new(on_row_tapped),
            notices: Vec::new(),
        }
    }

    /// # Panics
    /// if `row_index` is past the end of the list
    pub fn on_time_tapped(&mut self, list: &AlarmList, row_index: usize) {
        let (_, effects) = reduce(list.record(row_index), row_index, Gesture::TimeTapped);
        self.apply(effects);
    }

    /// # Panics
    /// if `row_index` is past the end of the list
    pub fn on_enabled_toggled(
        &mut self,
        list: &mut AlarmList,
        row_index: usize,
        new_value: bool,
        origin: ChangeOrigin,
    ) -> Option<WriteTicket> {
        if origin != ChangeOrigin::User {
            return None;
        }
        self.handle(list, row_index, Gesture::EnabledToggled(new_value))
    }

    /// # Panics
    /// if `row_index` is past the end of the list
    pub fn on_repeat_toggled(
        &mut self,
        list: &mut AlarmList,
        row_index: usize,
        new_value: bool,
        origin: ChangeOrigin,
    ) -> Option<WriteTicket> {
        if origin != ChangeOrigin::User {
            return None;
        }
        self.handle(list, row_index, Gesture::RepeatToggled(new_value))
    }

    /// a one-shot alarm went off, so it is no longer armed and the row has to say so
    pub fn on_alarm_fired(&mut self, list: &mut AlarmList, id: AlarmId) -> Option<WriteTicket> {
        let record = list.record_mut(list.position_of(id)?);
        if record.repeating || !record.enabled {
            return None;
        }
        record.enabled = false;
        Some(self.writer.enqueue(record.clone()))
    }

    fn handle(&mut self, list: &mut AlarmList, row_index: usize, gesture: Gesture) -> Option<WriteTicket> {
        log::debug!("row {row_index}: {gesture:?}");
        let record = list.record_mut(row_index);
        let (updated, effects) = reduce(record, row_index, gesture);
        *record = updated;
        self.apply(effects)
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Option<WriteTicket> {
        let mut ticket = None;
        for effect in effects {
            match effect {
                Effect::RowTapped { position, id } => (self.on_row_tapped)(position, id),
                Effect::Arm(record) => self.scheduler.arm(&record),
                Effect::Cancel(id) => self.scheduler.cancel(id),
                Effect::Persist(record) => ticket = Some(self.writer.enqueue(record)),
                Effect::Notify(notice) => self.notices.push(notice),
            }
        }
        ticket
    }

    /// notices raised since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn seven() -> NaiveTime {
        NaiveTime::from_hms_opt(7, 0, 0).unwrap()
    }

    fn alarm(enabled: bool, repeating: bool) -> AlarmRecord {
        AlarmRecord {
            enabled,
            repeating,
            ..AlarmRecord::new(1, seven())
        }
    }

    #[test]
    fn switching_on_arms_then_persists() {
        let (updated, effects) = reduce(&alarm(false, false), 0, Gesture::EnabledToggled(true));
        assert_eq!(updated, alarm(true, false));
        assert_eq!(
            effects,
            vec![
                Effect::Arm(alarm(true, false)),
                Effect::Notify(Notice::AlarmSet { time: seven() }),
                Effect::Persist(alarm(true, false)),
            ]
        );
    }

    #[test]
    fn switching_off_cancels_then_persists() {
        let (updated, effects) = reduce(&alarm(true, true), 0, Gesture::EnabledToggled(false));
        assert_eq!(
            effects,
            vec![Effect::Cancel(1), Effect::Persist(updated.clone())]
        );
        assert!(!updated.enabled);
    }

    #[test]
    fn repeat_on_enabled_alarm_rearms() {
        let (updated, effects) = reduce(&alarm(true, false), 0, Gesture::RepeatToggled(true));
        assert_eq!(
            effects,
            vec![
                Effect::Cancel(1),
                Effect::Arm(updated.clone()),
                Effect::Persist(updated),
                Effect::Notify(Notice::Repeating),
            ]
        );
    }

    #[test]
    fn repeat_off_on_disabled_alarm_only_persists() {
        let (updated, effects) = reduce(&alarm(false, true), 0, Gesture::RepeatToggled(false));
        assert_eq!(effects, vec![Effect::Persist(updated)]);
    }

    #[test]
    fn tapping_the_time_changes_nothing() {
        let (updated, effects) = reduce(&alarm(true, false), 4, Gesture::TimeTapped);
        assert_eq!(updated, alarm(true, false));
        assert_eq!(effects, vec![Effect::RowTapped { position: 4, id: 1 }]);
    }

    #[test]
    fn notice_messages() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(4, 30, 0)
            .unwrap();
        assert_eq!(
            Notice::AlarmSet { time: seven() }.message(now),
            "alarm set: 2 hours and 30 minutes from now"
        );
        assert_eq!(Notice::Repeating.message(now), "alarm repeating");
    }
}
