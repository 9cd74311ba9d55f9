//! Runtime locator: finds the executable that launches the engine artifact.
//!
//! Resolution order is fixed: a previously persisted path wins and is
//! returned as stored, then a platform PATH scan, then failure with both
//! remediation paths named in the error.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::settings::{SettingsBackend, SettingsStore};

/// Settings key for the persisted runtime executable.
pub const RUNTIME_KEY: &str = "runtime_path";
/// Settings key for an explicitly registered engine artifact.
pub const ENGINE_KEY: &str = "engine_path";

/// Default runtime program looked up on PATH.
pub const DEFAULT_PROGRAM: &str = "java";
/// Artifact filename expected next to the current executable when no
/// explicit engine path has been registered.
pub const ENGINE_ARTIFACT: &str = "landpro-engine.jar";

pub struct RuntimeLocator<B: SettingsBackend> {
    store: SettingsStore<B>,
    program: String,
}

impl<B: SettingsBackend> RuntimeLocator<B> {
    pub fn new(store: SettingsStore<B>) -> Self {
        Self {
            store,
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// Override the runtime program name. Tests use this to force a PATH miss.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn store(&self) -> &SettingsStore<B> {
        &self.store
    }

    /// A validated runtime path: persisted value first, then PATH.
    pub fn resolve(&self) -> Result<PathBuf> {
        if let Some(stored) = self.store.get(RUNTIME_KEY)? {
            debug!("runtime resolved from settings: {}", stored);
            return Ok(PathBuf::from(stored));
        }
        if let Some(found) = find_on_path(&self.program, std::env::var_os("PATH")) {
            debug!("runtime resolved from PATH: {}", found.display());
            return Ok(found);
        }
        Err(Error::RuntimeNotFound {
            program: self.program.clone(),
        })
    }

    /// Persist (or overwrite) the runtime path for future invocations.
    pub fn set_runtime(&self, path: &Path) -> Result<()> {
        self.store.set(RUNTIME_KEY, &path.display().to_string())
    }

    /// The engine artifact: an explicitly registered path wins, else the
    /// bundled jar next to the current executable.
    pub fn engine_artifact(&self) -> Result<PathBuf> {
        if let Some(stored) = self.store.get(ENGINE_KEY)? {
            return Ok(PathBuf::from(stored));
        }
        let bundled = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|d| d.join(ENGINE_ARTIFACT)));
        match bundled {
            Some(path) if path.is_file() => Ok(path),
            Some(path) => Err(Error::EngineArtifactNotFound { path }),
            None => Err(Error::EngineArtifactNotFound {
                path: PathBuf::from(ENGINE_ARTIFACT),
            }),
        }
    }
}

/// Scan a PATH-style variable for the program, returning the first hit.
/// On Windows the `.exe`-suffixed name is tried as well.
fn find_on_path(program: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let candidate = dir.join(format!("{}.exe", program));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemoryBackend;

    fn memory_locator() -> RuntimeLocator<MemoryBackend> {
        RuntimeLocator::new(SettingsStore::new(MemoryBackend::default()))
    }

    #[test]
    fn persisted_path_wins_without_touching_path() {
        let locator = memory_locator().with_program("landpro-no-such-binary");
        locator.set_runtime(Path::new("/usr/bin/x")).unwrap();
        assert_eq!(locator.resolve().unwrap(), PathBuf::from("/usr/bin/x"));
    }

    #[test]
    fn nothing_persisted_nothing_on_path_fails() {
        let locator = memory_locator().with_program("landpro-no-such-binary");
        let err = locator.resolve().unwrap_err();
        assert!(
            matches!(err, Error::RuntimeNotFound { program } if program == "landpro-no-such-binary")
        );
    }

    #[test]
    fn runtime_not_found_names_both_remediations() {
        let locator = memory_locator().with_program("landpro-no-such-binary");
        let message = locator.resolve().unwrap_err().to_string();
        assert!(message.contains("Install"));
        assert!(message.contains("set-runtime"));
    }

    #[test]
    fn find_on_path_scans_directories() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("fake-runtime");
        std::fs::write(&exe, b"").unwrap();
        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(
            find_on_path("fake-runtime", Some(path_var)),
            Some(exe)
        );
        assert_eq!(
            find_on_path("fake-runtime", None),
            None
        );
    }

    #[test]
    fn registered_engine_path_is_returned_verbatim() {
        let locator = memory_locator();
        locator
            .store()
            .set(ENGINE_KEY, "/opt/engine/landpro-engine.jar")
            .unwrap();
        assert_eq!(
            locator.engine_artifact().unwrap(),
            PathBuf::from("/opt/engine/landpro-engine.jar")
        );
    }
}
