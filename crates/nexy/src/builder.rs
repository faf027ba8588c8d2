//! Whole-project builds.

use std::path::PathBuf;

use log::{error, info, warn};

use crate::{
    compiler::{CompileOutput, Compiler},
    config::NexyConfig,
    discovery,
    error::NexyError,
};

/// Outcome of a project build.
///
/// A build compiles every source even when some of them fail, so the
/// report holds both the compiled outputs and the failures.
#[derive(Debug, Default)]
pub struct BuildReport {
    compiled: Vec<CompileOutput>,
    failures: Vec<(PathBuf, NexyError)>,
}

impl BuildReport {
    pub fn compiled(&self) -> &[CompileOutput] {
        &self.compiled
    }

    /// Sources that failed, with their errors, in discovery order.
    pub fn failures(&self) -> &[(PathBuf, NexyError)] {
        &self.failures
    }

    pub fn total(&self) -> usize {
        self.compiled.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Converts a failed report into [`NexyError::Build`].
    ///
    /// # Errors
    ///
    /// Returns [`NexyError::Build`] if any source failed.
    pub fn into_result(self) -> Result<Vec<CompileOutput>, NexyError> {
        if self.is_success() {
            Ok(self.compiled)
        } else {
            Err(NexyError::Build {
                failed: self.failures.len(),
                total: self.total(),
            })
        }
    }
}

/// Builder that compiles every component source of a project.
///
/// # Examples
///
/// ```rust,no_run
/// use nexy::{ProjectBuilder, config::NexyConfig};
///
/// let report = ProjectBuilder::new(NexyConfig::default())
///     .build()
///     .expect("Failed to read the project");
///
/// for (path, err) in report.failures() {
///     eprintln!("{}: {err}", path.display());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    compiler: Compiler,
}

impl ProjectBuilder {
    pub fn new(config: NexyConfig) -> Self {
        Self {
            compiler: Compiler::new(config),
        }
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Compile every discovered source in order.
    ///
    /// # Errors
    ///
    /// Only discovery failures are returned as errors. Failures of single
    /// sources are collected in the [`BuildReport`].
    pub fn build(&self) -> Result<BuildReport, NexyError> {
        let sources = discovery::discover_sources(self.compiler.config())?;
        info!(sources = sources.len(); "Building project");

        let mut report = BuildReport::default();
        for source in sources {
            match self.compiler.compile(&source) {
                Ok(output) => report.compiled.push(output),
                Err(err) => {
                    warn!(path:? = source, err:% = err; "Component failed to compile");
                    report.failures.push((source, err));
                }
            }
        }

        if report.is_success() {
            info!(compiled = report.compiled.len(); "Build finished");
        } else {
            error!(
                failed = report.failures.len(),
                total = report.total();
                "Build finished with failures"
            );
        }
        Ok(report)
    }
}
