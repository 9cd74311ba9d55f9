//! Persistent key-value settings: one `key=value` per line, currently only
//! the runtime and engine-artifact paths.
//!
//! The store is an explicit object over an injectable backend, so embedders
//! and tests swap the file for an in-memory cell. The file backend holds an
//! exclusive lock across each read-modify-write, which keeps concurrent
//! writers from losing updates.
use std::cell::RefCell;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::Result;

/// Raw storage for the settings text.
pub trait SettingsBackend {
    /// `None` when nothing has ever been stored.
    fn read(&self) -> Result<Option<String>>;
    /// Atomically rewrite the stored text from its current value.
    fn update(&self, apply: &dyn Fn(Option<String>) -> String) -> Result<()>;
}

/// File-backed settings, the production backend.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsBackend for FileBackend {
    fn read(&self) -> Result<Option<String>> {
        let mut file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        file.lock_shared()?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        file.unlock()?;
        Ok(Some(content))
    }

    fn update(&self, apply: &dyn Fn(Option<String>) -> String) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let mut current = String::new();
        file.read_to_string(&mut current)?;
        let existing = if current.is_empty() {
            None
        } else {
            Some(current)
        };
        let next = apply(existing);
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(next.as_bytes())?;
        file.unlock()?;
        Ok(())
    }
}

/// In-memory settings for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    cell: RefCell<Option<String>>,
}

impl SettingsBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.cell.borrow().clone())
    }

    fn update(&self, apply: &dyn Fn(Option<String>) -> String) -> Result<()> {
        let mut cell = self.cell.borrow_mut();
        let next = apply(cell.take());
        *cell = Some(next);
        Ok(())
    }
}

/// Named string parameters over any backend.
#[derive(Debug)]
pub struct SettingsStore<B: SettingsBackend> {
    backend: B,
}

impl SettingsStore<FileBackend> {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(path))
    }
}

impl<B: SettingsBackend> SettingsStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .backend
            .read()?
            .and_then(|text| lookup(&text, key)))
    }

    /// Idempotent: re-setting a key replaces its single line in place; the
    /// order of other lines is preserved.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.backend
            .update(&move |existing| upsert(existing.as_deref(), &key, &value))
    }
}

fn lookup(text: &str, key: &str) -> Option<String> {
    text.lines()
        .filter_map(|l| l.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
}

fn upsert(text: Option<&str>, key: &str, value: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut replaced = false;
    for line in text.unwrap_or("").lines() {
        match line.split_once('=') {
            Some((k, _)) if k == key => {
                if !replaced {
                    lines.push(format!("{}={}", key, value));
                    replaced = true;
                }
                // A stray duplicate from a hand-edited file collapses here.
            }
            _ if line.trim().is_empty() => {}
            _ => lines.push(line.to_string()),
        }
    }
    if !replaced {
        lines.push(format!("{}={}", key, value));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Per-user settings file for the CLI and default sessions.
pub fn default_settings_path() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(dir).join("landpro").join("settings.conf")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home)
            .join(".config")
            .join("landpro")
            .join("settings.conf")
    } else if let Some(appdata) = std::env::var_os("APPDATA") {
        PathBuf::from(appdata).join("landpro").join("settings.conf")
    } else {
        std::env::temp_dir().join("landpro").join("settings.conf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let store = SettingsStore::new(MemoryBackend::default());
        assert_eq!(store.get("runtime_path").unwrap(), None);
        store.set("runtime_path", "/usr/bin/java").unwrap();
        assert_eq!(
            store.get("runtime_path").unwrap().as_deref(),
            Some("/usr/bin/java")
        );
    }

    #[test]
    fn set_is_idempotent_single_line() {
        let backend = MemoryBackend::default();
        let store = SettingsStore::new(backend);
        store.set("runtime_path", "/old").unwrap();
        store.set("runtime_path", "/new").unwrap();
        let text = store.backend.read().unwrap().unwrap();
        assert_eq!(text, "runtime_path=/new\n");
    }

    #[test]
    fn set_preserves_other_keys() {
        let store = SettingsStore::new(MemoryBackend::default());
        store.set("runtime_path", "/usr/bin/java").unwrap();
        store.set("engine_path", "/opt/engine.jar").unwrap();
        store.set("runtime_path", "/usr/local/bin/java").unwrap();
        let text = store.backend.read().unwrap().unwrap();
        assert_eq!(
            text,
            "runtime_path=/usr/local/bin/java\nengine_path=/opt/engine.jar\n"
        );
    }

    #[test]
    fn file_backend_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("nested").join("settings.conf"));
        assert_eq!(store.get("runtime_path").unwrap(), None);
        store.set("runtime_path", "/usr/bin/java").unwrap();
        assert_eq!(
            store.get("runtime_path").unwrap().as_deref(),
            Some("/usr/bin/java")
        );
    }
}
