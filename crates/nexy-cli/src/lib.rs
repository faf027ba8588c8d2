//! CLI logic for the Nexy compiler.
//!
//! This module contains the core CLI logic: loading the configuration and
//! dispatching the [`Command`] to the library.

pub mod error_adapter;
pub mod watch;

mod args;
mod config;

pub use args::{Args, Command};

use log::{error, info};

use nexy::{Compiler, NexyError, ProjectBuilder, RouteTable, config::NexyConfig};

/// Run the Nexy CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `NexyError` for:
/// - Configuration loading errors
/// - Parse and generation errors of a single compiled file
/// - [`NexyError::Build`] when any component of a build fails
/// - Route conflicts
pub fn run(args: &Args) -> Result<(), NexyError> {
    let config = load_config(args)?;

    match &args.command {
        Command::Build => build(config),
        Command::Compile { input } => {
            let output = Compiler::new(config).compile(input)?;
            info!(
                source = output.source(),
                template:? = output.artifacts().template(),
                module:? = output.artifacts().module();
                "Component compiled"
            );
            Ok(())
        }
        Command::Routes => {
            let table = RouteTable::discover(&config)?;
            for route in table.routes() {
                let layout = route
                    .layout()
                    .map(|layout| format!(" (layout {layout})"))
                    .unwrap_or_default();
                println!(
                    "{:<10} {:<30} {}{layout}",
                    route.kind().to_string(),
                    route.pattern(),
                    route.handler()
                );
            }
            Ok(())
        }
        Command::Watch => {
            build(config.clone())?;
            watch::Watcher::new(config)?.run()
        }
    }
}

fn load_config(args: &Args) -> Result<NexyConfig, NexyError> {
    let config = config::load_config(args.config.as_ref())?;
    Ok(match &args.root {
        Some(root) => config.with_project_root(root),
        None => config,
    })
}

/// Compile the whole project, reporting every failing component.
fn build(config: NexyConfig) -> Result<(), NexyError> {
    let report = ProjectBuilder::new(config).build()?;

    for (path, err) in report.failures() {
        for rendered in error_adapter::render(err) {
            error!(path:? = path; "{rendered}");
        }
    }

    let compiled = report.into_result()?;
    info!(compiled = compiled.len(); "Build succeeded");
    Ok(())
}
