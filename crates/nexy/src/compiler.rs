//! Per-file compilation of component sources.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};

use nexy_core::{component::extension_of, naming};
use nexy_parser::ParserConfig;

use crate::{
    config::NexyConfig,
    error::NexyError,
    generator::{self, GeneratedArtifacts, Generator},
};

/// Source extensions and the template artifact extension each compiles to.
const TARGETS: &[(&str, &str)] = &[(".nexy", ".html"), (".mdx", ".md")];

/// Returns `true` if `path` is a component source the compiler accepts.
pub fn is_component_source(path: &Path) -> bool {
    path.to_str()
        .is_some_and(|path| template_extension(path).is_some())
}

fn template_extension(path: &str) -> Option<&'static str> {
    let extension = extension_of(path);
    TARGETS
        .iter()
        .find(|(source, _)| *source == extension)
        .map(|(_, template)| *template)
}

/// Result of compiling one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    source: String,
    artifacts: GeneratedArtifacts,
}

impl CompileOutput {
    /// Project-relative path of the compiled source.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn artifacts(&self) -> &GeneratedArtifacts {
        &self.artifacts
    }
}

/// Compiles single component sources of one project.
///
/// A compiler holds no state besides its configuration, so independent
/// files can be compiled by independent compilers.
///
/// # Examples
///
/// ```rust,no_run
/// use nexy::{Compiler, config::NexyConfig};
///
/// let compiler = Compiler::new(NexyConfig::default());
/// let output = compiler.compile("src/routes/index.nexy").expect("Failed to compile");
/// println!("{}", output.artifacts().template().display());
/// ```
#[derive(Debug, Clone)]
pub struct Compiler {
    config: NexyConfig,
    parser_config: ParserConfig,
}

impl Compiler {
    pub fn new(config: NexyConfig) -> Self {
        let parser_config = config.parser_config();
        Self {
            config,
            parser_config,
        }
    }

    pub fn config(&self) -> &NexyConfig {
        &self.config
    }

    /// Compile one `.nexy` or `.mdx` source.
    ///
    /// `input` is either relative to the project root or a path below it.
    ///
    /// # Errors
    ///
    /// - [`NexyError::UnsupportedFile`] for any other extension
    /// - [`NexyError::Io`] if the source cannot be read
    /// - [`NexyError::Parse`] with the source text when parsing fails
    /// - [`NexyError::Generation`] when an artifact cannot be written
    pub fn compile(&self, input: impl AsRef<Path>) -> Result<CompileOutput, NexyError> {
        let source_path = self.relative_source(input.as_ref());
        let template_path = self.template_path(&source_path)?;

        info!(source = source_path, template = template_path; "Compiling component");

        let source = fs::read_to_string(self.config.project_root().join(&source_path))?;
        let component = nexy_parser::parse(&source, &source_path, &self.parser_config)
            .map_err(|err| NexyError::new_parse_error(err, source.as_str(), source_path.as_str()))?;

        let artifacts = Generator::new(&self.config).generate(&template_path, &component)?;

        Ok(CompileOutput {
            source: source_path,
            artifacts,
        })
    }

    /// Delete the artifacts of a deleted source.
    ///
    /// Artifacts that do not exist are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`NexyError::UnsupportedFile`] for non-component paths and
    /// [`NexyError::Io`] if an existing artifact cannot be removed.
    pub fn remove(&self, input: impl AsRef<Path>) -> Result<(), NexyError> {
        let source_path = self.relative_source(input.as_ref());
        let template_path = self.template_path(&source_path)?;
        let module_path = generator::module_path_for(&template_path);

        for artifact in [template_path, module_path] {
            let path = self.config.project_root().join(&artifact);
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = artifact; "Removed artifact"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Project-relative template artifact path of a project-relative source.
    ///
    /// The source path is mirrored under the namespace with every segment
    /// normalized, and the extension replaced.
    ///
    /// ```
    /// # use nexy::{Compiler, config::NexyConfig};
    /// let compiler = Compiler::new(NexyConfig::default());
    /// assert_eq!(
    ///     compiler.template_path("src/routes/blog/[slug].nexy").unwrap(),
    ///     "__nexy__/src/routes/blog/dyn_slug.html"
    /// );
    /// ```
    pub fn template_path(&self, source_path: &str) -> Result<String, NexyError> {
        let template_extension = template_extension(source_path)
            .ok_or_else(|| NexyError::UnsupportedFile(source_path.to_string()))?;

        let normalized = naming::normalize_path(&naming::clean_path(source_path));
        let stem = &normalized[..normalized.len() - extension_of(&normalized).len()];
        Ok(format!("{}/{stem}{template_extension}", self.config.namespace()))
    }

    /// `/`-separated path of `input` relative to the project root.
    fn relative_source(&self, input: &Path) -> String {
        let relative = input
            .strip_prefix(self.config.project_root())
            .map_or_else(|_| input.to_path_buf(), PathBuf::from);
        naming::posix_path(&relative)
    }
}
