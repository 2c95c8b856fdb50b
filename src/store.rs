use std::{
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::{
    alarm::AlarmRecord,
    error::{Error, Result},
};

/// durable storage for alarms, keyed by [`AlarmRecord::id`]
///
/// writes happen on background threads, so implementations must be shareable
pub trait AlarmStore: Send + Sync {
    /// # Errors
    /// if the backing storage can't be read
    fn load_all(&self) -> Result<Vec<AlarmRecord>>;

    /// replaces the stored alarm with the same id
    ///
    /// # Errors
    /// [`Error::UnknownAlarm`] if no such alarm is stored, or a storage error
    fn update(&self, record: &AlarmRecord) -> Result<()>;

    /// stores a new enabled alarm under a fresh id
    ///
    /// # Errors
    /// if the backing storage can't be read or written
    fn insert(&self, time: NaiveTime, repeating: bool) -> Result<AlarmRecord>;
}

fn next_id(alarms: &[AlarmRecord]) -> u64 {
    alarms.iter().map(|alarm| alarm.id).max().unwrap_or(0) + 1
}

fn replace(alarms: &mut [AlarmRecord], record: &AlarmRecord) -> Result<()> {
    let stored = alarms
        .iter_mut()
        .find(|alarm| alarm.id == record.id)
        .ok_or(Error::UnknownAlarm(record.id))?;
    stored.clone_from(record);
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct AlarmFile {
    #[serde(default)]
    alarms: Vec<AlarmRecord>,
}

/// stores alarms as `[[alarms]]` tables in a toml file
#[derive(Debug)]
pub struct TomlAlarmStore {
    path: PathBuf,
    // serializes read-modify-write cycles between writer threads
    lock: Mutex<()>,
}

impl TomlAlarmStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // the guarded data is `()`, a panicking writer can't leave it inconsistent
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> Result<Vec<AlarmRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let file: AlarmFile = toml::from_str(&contents).map_err(|source| Error::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(file.alarms)
    }

    fn write(&self, alarms: Vec<AlarmRecord>) -> Result<()> {
        let contents = toml::to_string(&AlarmFile { alarms })?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl AlarmStore for TomlAlarmStore {
    fn load_all(&self) -> Result<Vec<AlarmRecord>> {
        let _guard = self.lock();
        self.read()
    }

    fn update(&self, record: &AlarmRecord) -> Result<()> {
        let _guard = self.lock();
        let mut alarms = self.read()?;
        replace(&mut alarms, record)?;
        self.write(alarms)
    }

    fn insert(&self, time: NaiveTime, repeating: bool) -> Result<AlarmRecord> {
        let _guard = self.lock();
        let mut alarms = self.read()?;
        let record = AlarmRecord {
            repeating,
            ..AlarmRecord::new(next_id(&alarms), time)
        };
        alarms.push(record.clone());
        self.write(alarms)?;
        log::info!("added alarm {} at {}", record.id, record.time);
        Ok(record)
    }
}

/// keeps alarms in memory only, used when nothing needs to survive a restart
#[derive(Debug, Default)]
pub struct MemoryAlarmStore {
    alarms: Mutex<Vec<AlarmRecord>>,
}

impl MemoryAlarmStore {
    #[must_use]
    pub const fn new(alarms: Vec<AlarmRecord>) -> Self {
        Self {
            alarms: Mutex::new(alarms),
        }
    }

    fn alarms(&self) -> MutexGuard<'_, Vec<AlarmRecord>> {
        self.alarms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AlarmStore for MemoryAlarmStore {
    fn load_all(&self) -> Result<Vec<AlarmRecord>> {
        Ok(self.alarms().clone())
    }

    fn update(&self, record: &AlarmRecord) -> Result<()> {
        replace(&mut self.alarms(), record)
    }

    fn insert(&self, time: NaiveTime, repeating: bool) -> Result<AlarmRecord> {
        let mut alarms = self.alarms();
        let record = AlarmRecord {
            repeating,
            ..AlarmRecord::new(next_id(&alarms), time)
        };
        alarms.push(record.clone());
        Ok(record)
    }
}
