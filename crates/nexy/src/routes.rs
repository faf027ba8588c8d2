//! File-based route discovery.
//!
//! The routes directory maps onto URL path patterns:
//!
//! | file                              | pattern             |
//! |-----------------------------------|---------------------|
//! | `index.nexy`                      | `/`                 |
//! | `about.nexy`                      | `/about`            |
//! | `blog/[slug].nexy`                | `/blog/{slug}`      |
//! | `docs/[...path].mdx`              | `/docs/{path:path}` |
//! | `(marketing)/pricing/index.nexy`  | `/pricing`          |
//! | `api/users.py`                    | `/api/users`        |
//!
//! `error.nexy` and `notfound.nexy` are not routes of their own; they
//! handle failures for the pattern of their directory and everything
//! below it.

use std::{fmt, path::Path};

use indexmap::IndexMap;
use log::{debug, info};

use nexy_core::{component::extension_of, naming};

use crate::{
    compiler::Compiler,
    config::NexyConfig,
    discovery,
    error::NexyError,
    generator::{FsModuleResolver, LayoutChain},
};

/// Source extensions that define routes.
const ROUTE_EXTENSIONS: &[&str] = &[".nexy", ".mdx", ".py"];

/// Translate a routes-relative file path into a URL path pattern.
///
/// Group segments `(name)` are removed, a trailing `index` is dropped,
/// `[...name]` becomes `{name:path}` and `[name]` becomes `{name}`.
///
/// ```
/// use nexy::routes::route_pattern;
///
/// assert_eq!(route_pattern("index.nexy"), "/");
/// assert_eq!(route_pattern("(shop)/products/[id].nexy"), "/products/{id}");
/// assert_eq!(route_pattern("docs/[...rest]/index.mdx"), "/docs/{rest:path}");
/// ```
pub fn route_pattern(relative: &str) -> String {
    let without_extension = &relative[..relative.len() - extension_of(relative).len()];
    let mut segments: Vec<String> = without_extension
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .filter(|segment| !(segment.starts_with('(') && segment.ends_with(')')))
        .map(pattern_segment)
        .collect();

    if segments.last().is_some_and(|last| last == "index") {
        segments.pop();
    }
    format!("/{}", segments.join("/"))
}

fn pattern_segment(segment: &str) -> String {
    if let Some(name) = segment
        .strip_prefix("[...")
        .and_then(|rest| rest.strip_suffix(']'))
    {
        format!("{{{name}:path}}")
    } else if let Some(name) = segment
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        format!("{{{name}}}")
    } else {
        segment.to_string()
    }
}

/// What a route file provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteKind {
    /// A compiled component rendered for `GET` requests
    Page,
    /// A backend module exporting one handler per HTTP method
    Api,
    /// Component rendered when a request below its scope fails
    Error,
    /// Component rendered when nothing below its scope matches
    NotFound,
}

impl RouteKind {
    fn of(file_name: &str) -> Self {
        match file_name.to_lowercase().as_str() {
            "error.nexy" => Self::Error,
            "notfound.nexy" => Self::NotFound,
            _ if extension_of(file_name) == ".py" => Self::Api,
            _ => Self::Page,
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Page => "page",
            Self::Api => "api",
            Self::Error => "error",
            Self::NotFound => "not-found",
        };
        f.write_str(name)
    }
}

/// Module and symbol that serve a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    module: String,
    symbol: Option<String>,
}

impl Handler {
    /// Dotted module path, e.g. `__nexy__.src.routes.index`.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Render function of a component; `None` for API modules.
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{}:{symbol}", self.module),
            None => f.write_str(&self.module),
        }
    }
}

/// One entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pattern: String,
    handler: Handler,
    kind: RouteKind,
    source: String,
    layout: Option<String>,
}

impl Route {
    /// URL path pattern, or the scope of error and not-found handlers.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    /// Project-relative source path.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Module of the layout that wraps a page, if one is compiled.
    pub fn layout(&self) -> Option<&str> {
        self.layout.as_deref()
    }
}

/// All routes of a project, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Walk the routes directory and build the table.
    ///
    /// Layouts are looked up among the compiled modules, so pages report
    /// their layout only after the project has been built.
    ///
    /// # Errors
    ///
    /// - [`NexyError::Io`] if the routes directory cannot be read
    /// - [`NexyError::Route`] if two files of the same kind map onto the
    ///   same pattern
    pub fn discover(config: &NexyConfig) -> Result<Self, NexyError> {
        let routes_root = config.project_root().join(config.routes_dir());
        let compiler = Compiler::new(config.clone());
        let resolver = FsModuleResolver::new(config.project_root());

        let files = discovery::walk(&routes_root, config, |path| {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();
            ROUTE_EXTENSIONS.contains(&extension_of(&file_name))
                && !config.is_route_exception(&file_name)
        })?;

        let mut seen: IndexMap<(RouteKind, String), String> = IndexMap::new();
        let mut routes = Vec::with_capacity(files.len());
        for file in files {
            let route = route_for(&file, &routes_root, config, &compiler, &resolver)?;

            let key = (route.kind, route.pattern.clone());
            if let Some(existing) = seen.get(&key) {
                return Err(NexyError::Route(format!(
                    "{} route `{}` is defined by both `{existing}` and `{}`",
                    route.kind, route.pattern, route.source
                )));
            }
            seen.insert(key, route.source.clone());

            debug!(pattern = route.pattern, kind:% = route.kind, source = route.source; "Discovered route");
            routes.push(route);
        }

        info!(routes = routes.len(); "Route table built");
        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Routes of one kind.
    pub fn of_kind(&self, kind: RouteKind) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(move |route| route.kind == kind)
    }

    /// The handler of `kind` whose scope is the longest prefix of `path`.
    ///
    /// Only meaningful for [`RouteKind::Error`] and [`RouteKind::NotFound`].
    pub fn scoped_handler(&self, kind: RouteKind, path: &str) -> Option<&Route> {
        self.of_kind(kind)
            .filter(|route| in_scope(route.pattern(), path))
            .max_by_key(|route| route.pattern().len())
    }
}

fn in_scope(scope: &str, path: &str) -> bool {
    if scope == "/" {
        return true;
    }
    path.strip_prefix(scope)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn route_for(
    file: &Path,
    routes_root: &Path,
    config: &NexyConfig,
    compiler: &Compiler,
    resolver: &FsModuleResolver,
) -> Result<Route, NexyError> {
    let relative = naming::posix_path(file.strip_prefix(routes_root).unwrap_or(file));
    let source = format!("{}/{relative}", config.routes_dir());
    let file_name = relative.rsplit('/').next().unwrap_or(&relative);
    let kind = RouteKind::of(file_name);

    let pattern = match kind {
        RouteKind::Error | RouteKind::NotFound => {
            let scope = relative.rsplit_once('/').map_or("", |(directory, _)| directory);
            route_pattern(scope)
        }
        RouteKind::Page | RouteKind::Api => route_pattern(&relative),
    };

    let (handler, layout) = if kind == RouteKind::Api {
        let handler = Handler {
            module: naming::module_path(&source),
            symbol: None,
        };
        (handler, None)
    } else {
        let template_path = compiler.template_path(&source)?;
        let handler = Handler {
            module: naming::module_path(&template_path),
            symbol: Some(naming::function_name(Path::new(&template_path))),
        };
        let layout = LayoutChain::for_template(&template_path, config.namespace(), config.routes_dir())
            .filter(|_| kind == RouteKind::Page)
            .and_then(|chain| chain.find(resolver).map(|(module, _)| module.to_string()));
        (handler, layout)
    };

    Ok(Route {
        pattern,
        handler,
        kind,
        source,
        layout,
    })
}
