// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use crate::store::{SnapshotStore, parse_payload, validate_key};
use cocolu::DeskSnapshot;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores each snapshot as `<key>.json` in a data directory.
///
/// Writes go to a temporary file that is then renamed over the target, so
/// a crash mid-write never leaves a truncated snapshot behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, PersistenceError> {
        let dir: PathBuf = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a key is stored in.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        Ok(self.dir.join(format!("{}.json", validate_key(key)?)))
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, key: &str, snapshot: &DeskSnapshot) -> Result<(), PersistenceError> {
        let path: PathBuf = self.path_for(key)?;
        let temp: PathBuf = path.with_extension("json.tmp");
        let payload: String = serde_json::to_string_pretty(snapshot)?;

        fs::write(&temp, payload)?;
        fs::rename(&temp, &path)?;

        debug!(path = %path.display(), "Wrote snapshot file");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<DeskSnapshot>, PersistenceError> {
        let path: PathBuf = self.path_for(key)?;
        let payload: String = match fs::read_to_string(&path) {
            Ok(payload) => payload,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        parse_payload(&payload).map(Some)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}
