//! Engine dispatcher: one synchronous subprocess per properties file.
//!
//! The invocation is always `[runtime, "-jar", artifact, properties]`; the
//! constructed command is logged before launch. A non-zero exit status is an
//! error for that file, never a retry. Batch dispatch is sequential and a
//! failing file does not abort the files after it.
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::runtime::RuntimeLocator;
use crate::settings::SettingsBackend;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct Dispatcher {
    runtime: PathBuf,
    artifact: PathBuf,
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(runtime: impl Into<PathBuf>, artifact: impl Into<PathBuf>) -> Self {
        Self {
            runtime: runtime.into(),
            artifact: artifact.into(),
            timeout: None,
        }
    }

    /// Resolve runtime and artifact through the locator.
    pub fn from_locator<B: SettingsBackend>(locator: &RuntimeLocator<B>) -> Result<Self> {
        Ok(Self::new(locator.resolve()?, locator.engine_artifact()?))
    }

    /// Kill the engine and fail with `TimedOut` when a run exceeds `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Launch the engine on one properties file and block until it exits.
    pub fn dispatch(&self, properties: &Path) -> Result<()> {
        info!(
            "launching engine: {} -jar {} {}",
            self.runtime.display(),
            self.artifact.display(),
            properties.display()
        );
        let mut command = Command::new(&self.runtime);
        command.arg("-jar").arg(&self.artifact).arg(properties);

        let status = match self.timeout {
            None => command.status()?,
            Some(timeout) => {
                let mut child = command.spawn()?;
                let started = Instant::now();
                loop {
                    if let Some(status) = child.try_wait()? {
                        break status;
                    }
                    if started.elapsed() >= timeout {
                        warn!(
                            "engine exceeded {}s on {}, killing",
                            timeout.as_secs(),
                            properties.display()
                        );
                        child.kill()?;
                        child.wait()?;
                        return Err(Error::TimedOut {
                            seconds: timeout.as_secs(),
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        };

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(Error::EngineExit { code }),
            // Terminated by a signal; there is no code to report.
            None => Err(Error::EngineExit { code: -1 }),
        }
    }

    /// Dispatch each file in order. A failure is recorded and the remaining
    /// files still run; results come back in input order.
    pub fn dispatch_all(&self, files: &[PathBuf]) -> Vec<(PathBuf, Result<()>)> {
        let mut results = Vec::with_capacity(files.len());
        for file in files {
            let outcome = self.dispatch(file);
            if let Err(e) = &outcome {
                warn!("engine run failed for {}: {}", file.display(), e);
            }
            results.push((file.clone(), outcome));
        }
        results
    }
}
