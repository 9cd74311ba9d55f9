//! High-level, ergonomic entry points: build a treatment request, serialize
//! it, and hand it to the engine in one call. Prefer these over wiring the
//! locator, serializer and dispatcher by hand.
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::builder::TreatmentRequest;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::properties::write_record;
use crate::runtime::RuntimeLocator;
use crate::settings::{FileBackend, SettingsBackend, SettingsStore, default_settings_path};

/// Build and serialize a request without dispatching it. Returns the path of
/// the written properties file.
pub fn build_properties<R: TreatmentRequest>(
    request: &R,
    target: Option<&Path>,
) -> Result<PathBuf> {
    let record = request.build()?;
    write_record(&record, target)
}

/// A configured engine front-end: settings store, runtime resolution, and an
/// optional run timeout.
pub struct Session<B: SettingsBackend = FileBackend> {
    locator: RuntimeLocator<B>,
    timeout: Option<Duration>,
}

impl Session<FileBackend> {
    /// File-backed session over the per-user settings path.
    pub fn new() -> Self {
        Self::with_store(SettingsStore::open(default_settings_path()))
    }
}

impl Default for Session<FileBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: SettingsBackend> Session<B> {
    /// Session over an injected settings store (in-memory for tests, or an
    /// embedder-managed file).
    pub fn with_store(store: SettingsStore<B>) -> Self {
        Self {
            locator: RuntimeLocator::new(store),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn locator(&self) -> &RuntimeLocator<B> {
        &self.locator
    }

    /// Persist the runtime path for this and future sessions.
    pub fn set_runtime(&self, path: &Path) -> Result<()> {
        self.locator.set_runtime(path)
    }

    /// Build, serialize to a scratch file, and run.
    pub fn run<R: TreatmentRequest>(&self, request: &R) -> Result<()> {
        let path = build_properties(request, None)?;
        self.dispatcher()?.dispatch(&path)
    }

    /// Build, serialize to a caller-chosen properties path, and run.
    pub fn run_to<R: TreatmentRequest>(&self, request: &R, target: &Path) -> Result<()> {
        let path = build_properties(request, Some(target))?;
        self.dispatcher()?.dispatch(&path)
    }

    /// Dispatch already-serialized properties files, sequentially; a failing
    /// file never aborts the rest.
    pub fn run_files(&self, files: &[PathBuf]) -> Result<Vec<(PathBuf, Result<()>)>> {
        Ok(self.dispatcher()?.dispatch_all(files))
    }

    fn dispatcher(&self) -> Result<Dispatcher> {
        let dispatcher = Dispatcher::from_locator(&self.locator)?;
        Ok(match self.timeout {
            Some(t) => dispatcher.with_timeout(t),
            None => dispatcher,
        })
    }
}
