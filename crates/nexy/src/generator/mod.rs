//! Artifact generation for parsed components.
//!
//! A component compiles into two files next to each other:
//!
//! - the template artifact (`.html` for markup, `.md` for Markdown), the
//!   transformed template text as it is
//! - the render module (`.py`), a function that builds an explicit context
//!   and renders the template, wrapped in the innermost route layout for
//!   markup pages
//!
//! Write failures are logged and returned as [`NexyError::Generation`]
//! so that a batch build can carry on with the next component.

mod layout;
mod logic;
mod template;

pub use layout::{FsModuleResolver, LayoutChain, ModuleResolver};

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, error};

use nexy_core::{ParsedComponent, component::extension_of};

use crate::{config::NexyConfig, error::NexyError};

/// Extension of the render module.
const MODULE_EXTENSION: &str = "py";

/// Paths of the files written for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    template: PathBuf,
    module: PathBuf,
}

impl GeneratedArtifacts {
    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn module(&self) -> &Path {
        &self.module
    }
}

/// Writes the artifacts of parsed components below the project root.
#[derive(Debug)]
pub struct Generator<'c> {
    config: &'c NexyConfig,
}

impl<'c> Generator<'c> {
    pub fn new(config: &'c NexyConfig) -> Self {
        Self { config }
    }

    /// Generate both artifacts of `component`.
    ///
    /// # Arguments
    ///
    /// * `template_path` - Project-relative, `/`-separated path of the
    ///   template artifact, e.g. `__nexy__/src/routes/index.html`
    /// * `component` - The parsed component
    ///
    /// # Errors
    ///
    /// Returns [`NexyError::Generation`] naming the file that could not be
    /// written. Files written before the failure are left in place.
    pub fn generate(
        &self,
        template_path: &str,
        component: &ParsedComponent,
    ) -> Result<GeneratedArtifacts, NexyError> {
        let root = self.config.project_root();
        let module_path = module_path_for(template_path);

        let layouts = LayoutChain::for_template(
            template_path,
            self.config.namespace(),
            self.config.routes_dir(),
        );
        let source = logic::render_module(template_path, component, layouts.as_ref());

        let template = template::write_template(root, template_path, component.template())
            .map_err(|err| generation_error(root.join(template_path), err))?;

        let module = root.join(&module_path);
        fs::write(&module, source).map_err(|err| generation_error(module.clone(), err))?;

        debug!(
            template = template_path,
            module = module_path,
            layouts = layouts.as_ref().map_or(0, |chain| chain.candidates().len());
            "Generated component artifacts"
        );

        Ok(GeneratedArtifacts { template, module })
    }
}

/// The render module path that belongs to a template artifact path.
pub(crate) fn module_path_for(template_path: &str) -> String {
    let stem = &template_path[..template_path.len() - extension_of(template_path).len()];
    format!("{stem}.{MODULE_EXTENSION}")
}

fn generation_error(path: PathBuf, source: io::Error) -> NexyError {
    error!(path:? = path, err:% = source; "Failed to write component artifact");
    NexyError::Generation { path, source }
}
