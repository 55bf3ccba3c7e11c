use crate::app_dirs::AppDirs;
use crate::corpus::{Level, Selection};
use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const LANGUAGE_KEY: &str = "lang";
pub const LEVEL_KEY: &str = "level";

/// String key-value store that carries the selection between runs
pub trait SessionStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store backed by a JSON object on disk
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_path(AppDirs::state_path())
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let Ok(bytes) = fs::read(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), %err, "ignoring unreadable session store");
            BTreeMap::new()
        })
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all();
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&values)?)?;
        Ok(())
    }
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: BTreeMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The persisted selection, when both keys are present, non-blank and the level parses
pub fn restore_selection(store: &dyn SessionStore) -> Option<Selection> {
    let language = store.get(LANGUAGE_KEY).filter(|v| !v.trim().is_empty())?;
    let level = store.get(LEVEL_KEY).filter(|v| !v.trim().is_empty())?;

    match level.parse::<Level>() {
        Ok(level) => Some(Selection::new(language.trim(), level)),
        Err(err) => {
            warn!(%err, "ignoring persisted selection");
            None
        }
    }
}

pub fn persist_selection(store: &mut dyn SessionStore, selection: &Selection) -> Result<()> {
    store.set(LEVEL_KEY, &selection.level.to_string())?;
    store.set(LANGUAGE_KEY, &selection.language)
}
