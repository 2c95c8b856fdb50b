use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};

use crate::{alarm::AlarmRecord, store::AlarmStore};

struct Job {
    record: AlarmRecord,
    done: Sender<bool>,
}

/// completion signal for one queued write
///
/// dropping it is fine, the write still happens
#[derive(Debug)]
pub struct WriteTicket(Receiver<bool>);

impl WriteTicket {
    /// blocks until the write has been attempted
    /// returns whether it was stored
    #[must_use]
    pub fn wait(self) -> bool {
        self.0.recv().unwrap_or(false)
    }
}

/// background threads that write alarms to the store
///
/// writes are fire and forget: failures are logged and dropped, and
/// two writes for the same alarm can land in either order
#[derive(Debug)]
pub struct PersistQueue {
    sender: Option<Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl PersistQueue {
    #[must_use]
    pub fn spawn(store: Arc<dyn AlarmStore>, workers: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        let workers = (0..workers.max(1))
            .map(|_| {
                let (store, receiver) = (Arc::clone(&store), receiver.clone());
                thread::spawn(move || {
                    for Job { record, done } in receiver {
                        let stored = match store.update(&record) {
                            Ok(()) => true,
                            Err(e) => {
                                log::warn!("dropping write for alarm {}: {e}", record.id);
                                false
                            }
                        };
                        // nobody waiting on the ticket is fine
                        let _ = done.send(stored);
                    }
                })
            })
            .collect();
        Self {
            sender: Some(sender),
            workers,
        }
    }

    pub fn enqueue(&self, record: AlarmRecord) -> WriteTicket {
        let (done, ticket) = crossbeam_channel::bounded(1);
        let id = record.id;
        if let Some(sender) = &self.sender {
            if sender.send(Job { record, done }).is_err() {
                log::warn!("persist workers are gone, dropping write for alarm {id}");
            }
        }
        WriteTicket(ticket)
    }
}

impl Drop for PersistQueue {
    fn drop(&mut self) {
        // closing the channel lets the workers drain what is left and exit
        self.sender.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("a persist worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::store::MemoryAlarmStore;

    fn record(id: u64) -> AlarmRecord {
        AlarmRecord::new(id, NaiveTime::from_hms_opt(7, 0, 0).unwrap())
    }

    #[test]
    fn ticket_reports_stored_write() {
        let store = Arc::new(MemoryAlarmStore::new(vec![record(1)]));
        let queue = PersistQueue::spawn(store.clone(), 2);

        let mut off = record(1);
        off.enabled = false;
        assert!(queue.enqueue(off.clone()).wait());
        assert_eq!(store.load_all().unwrap(), vec![off]);
    }

    #[test]
    fn failed_write_is_dropped() {
        let store = Arc::new(MemoryAlarmStore::default());
        let queue = PersistQueue::spawn(store.clone(), 1);
        assert!(!queue.enqueue(record(3)).wait());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn dropping_the_queue_flushes_pending_writes() {
        let store = Arc::new(MemoryAlarmStore::new(vec![record(1), record(2)]));
        let queue = PersistQueue::spawn(store.clone(), 3);
        for id in [1, 2] {
            let mut off = record(id);
            off.repeating = true;
            let _ticket = queue.enqueue(off);
        }
        drop(queue);
        assert!(store.load_all().unwrap().iter().all(|alarm| alarm.repeating));
    }
}
