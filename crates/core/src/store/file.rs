use crate::{CoreError, CoreResult, SessionKey, SessionStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Session store persisted as a JSON object of string entries.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so readers never observe a half-written file. The in-memory view
/// only changes once the write has reached disk.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "Opened session store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CoreError::storage_error("file session store lock poisoned"))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: SessionKey) -> CoreResult<Option<String>> {
        Ok(self.lock()?.get(key.as_str()).cloned())
    }

    fn set(&self, key: SessionKey, value: &str) -> CoreResult<()> {
        let mut entries = self.lock()?;
        let mut staged = entries.clone();
        staged.insert(key.as_str().to_string(), value.to_string());
        self.persist(&staged)?;
        *entries = staged;
        Ok(())
    }

    fn remove(&self, key: SessionKey) -> CoreResult<()> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key.as_str()) {
            return Ok(());
        }
        let mut staged = entries.clone();
        staged.remove(key.as_str());
        self.persist(&staged)?;
        *entries = staged;
        Ok(())
    }
}
