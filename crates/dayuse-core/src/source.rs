//! Loading session lists.
//!
//! Reading sessions is the caller's side of an aggregation request: it happens
//! once, before the engine runs, and any failure ends the request.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::UsageError;
use crate::session::Session;

/// A place sessions can be loaded from.
pub trait SessionSource {
    fn load_sessions(&self) -> Result<Vec<Session>, UsageError>;
}

/// A JSON file holding an array of sessions.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSource for JsonFileSource {
    fn load_sessions(&self) -> Result<Vec<Session>, UsageError> {
        let file = File::open(&self.path).map_err(|source| UsageError::SourceUnavailable {
            path: self.path.clone(),
            source,
        })?;
        let sessions = read_sessions(BufReader::new(file), &self.path)?;
        tracing::debug!(path = %self.path.display(), count = sessions.len(), "loaded sessions");
        Ok(sessions)
    }
}

/// Decodes a JSON array of sessions. `origin` is only used in errors.
pub fn read_sessions<R: Read>(reader: R, origin: &Path) -> Result<Vec<Session>, UsageError> {
    serde_json::from_reader(reader).map_err(|source| {
        if source.is_io() {
            UsageError::SourceUnavailable {
                path: origin.to_path_buf(),
                source: source.into(),
            }
        } else {
            UsageError::MalformedSource {
                path: origin.to_path_buf(),
                source,
            }
        }
    })
}
