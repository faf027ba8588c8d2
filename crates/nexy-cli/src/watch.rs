//! Watch mode: recompile components whose sources change.
//!
//! The project is polled at a fixed interval. A source whose modification
//! time changed is recompiled, a source that disappeared has its artifacts
//! removed. Compiles run one at a time on the polling thread.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant, SystemTime},
};

use log::{debug, error, info};

use nexy::{Compiler, NexyError, config::NexyConfig, discover_sources};

use crate::error_adapter;

/// Suppresses repeated triggers for the same path.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    last: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last: HashMap::new(),
        }
    }

    /// Returns `true` and records the trigger unless `path` last fired
    /// less than the quiet interval before `now`.
    pub fn should_trigger(&mut self, path: &Path, now: Instant) -> bool {
        if let Some(last) = self.last.get(path)
            && now.saturating_duration_since(*last) < self.quiet
        {
            return false;
        }
        self.last.insert(path.to_path_buf(), now);
        true
    }
}

/// What one poll did for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Compiled(PathBuf),
    Failed(PathBuf),
    Removed(PathBuf),
}

/// Polls a project and keeps its artifacts up to date.
#[derive(Debug)]
pub struct Watcher {
    compiler: Compiler,
    debouncer: Debouncer,
    snapshot: HashMap<PathBuf, SystemTime>,
    interval: Duration,
}

impl Watcher {
    /// Create a watcher. Sources that exist now count as up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the project root cannot be walked.
    pub fn new(config: NexyConfig) -> Result<Self, NexyError> {
        let watch = config.watch();
        let debouncer = Debouncer::new(Duration::from_millis(watch.debounce_ms()));
        let interval = Duration::from_millis(watch.poll_interval_ms());
        let snapshot = snapshot(&config)?;

        Ok(Self {
            compiler: Compiler::new(config),
            debouncer,
            snapshot,
            interval,
        })
    }

    /// Detect and handle the changes since the previous poll.
    ///
    /// A change suppressed by the debouncer stays pending and is picked up
    /// by a later poll.
    ///
    /// # Errors
    ///
    /// Returns an error if the project root cannot be walked. Compile
    /// failures are reported and returned as [`Change::Failed`].
    pub fn poll(&mut self) -> Result<Vec<Change>, NexyError> {
        let current = snapshot(self.compiler.config())?;
        let now = Instant::now();
        let mut changes = Vec::new();

        let mut modified: Vec<&PathBuf> = current
            .iter()
            .filter(|(path, mtime)| self.snapshot.get(*path) != Some(*mtime))
            .map(|(path, _)| path)
            .collect();
        modified.sort();

        for path in modified {
            if !self.debouncer.should_trigger(path, now) {
                debug!(path:? = path; "Change debounced");
                continue;
            }
            self.snapshot.insert(path.clone(), current[path]);
            changes.push(self.compile(path));
        }

        let mut removed: Vec<PathBuf> = self
            .snapshot
            .keys()
            .filter(|path| !current.contains_key(*path))
            .cloned()
            .collect();
        removed.sort();

        for path in removed {
            self.snapshot.remove(&path);
            match self.compiler.remove(&path) {
                Ok(()) => {
                    info!(path:? = path; "Removed artifacts of deleted component");
                    changes.push(Change::Removed(path));
                }
                Err(err) => report(&path, &err),
            }
        }

        Ok(changes)
    }

    /// Poll forever.
    ///
    /// # Errors
    ///
    /// Returns when the project root can no longer be walked.
    pub fn run(mut self) -> Result<(), NexyError> {
        info!(
            root:? = self.compiler.config().project_root(),
            interval_ms = self.interval.as_millis();
            "Watching for changes"
        );
        loop {
            self.poll()?;
            thread::sleep(self.interval);
        }
    }

    fn compile(&self, path: &Path) -> Change {
        match self.compiler.compile(path) {
            Ok(output) => {
                info!(source = output.source(); "Recompiled component");
                Change::Compiled(path.to_path_buf())
            }
            Err(err) => {
                report(path, &err);
                Change::Failed(path.to_path_buf())
            }
        }
    }
}

fn snapshot(config: &NexyConfig) -> Result<HashMap<PathBuf, SystemTime>, NexyError> {
    Ok(discover_sources(config)?
        .into_iter()
        .filter_map(|path| {
            let modified = path.metadata().and_then(|meta| meta.modified()).ok()?;
            Some((path, modified))
        })
        .collect())
}

fn report(path: &Path, err: &NexyError) {
    for rendered in error_adapter::render(err) {
        error!(path:? = path; "{rendered}");
    }
}
