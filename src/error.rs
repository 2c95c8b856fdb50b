use std::{io, path::PathBuf};

use thiserror::Error;

use crate::alarm::AlarmId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("couldn't parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("couldn't serialize: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no alarm with id {0}")]
    UnknownAlarm(AlarmId),

    #[error("invalid alarm time `{0}`, expected HH:MM")]
    InvalidTime(String),

    #[error("couldn't determine the config directory")]
    NoProjectDirs,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
