//! Layout-chain lookup for pages in the routes tree.
//!
//! Every directory of the routes tree may hold a `layout.nexy` component.
//! A page is wrapped by exactly one of them: the innermost layout found
//! walking from the page's own directory up to the routes root. A layout
//! is never its own candidate, so a nested layout is wrapped by the next
//! one up.
//!
//! The walk is emitted into the generated module so it runs at render
//! time. [`LayoutChain::find`] and [`LayoutChain::compose`] run the same
//! walk in Rust over a [`ModuleResolver`].

use std::{fs, path::PathBuf};

use nexy_core::{component::extension_of, naming};

/// Stem of layout components.
const LAYOUT_STEM: &str = "layout";

/// Name of the callable a layout module exports.
const LAYOUT_SYMBOL: &str = "Layout";

/// Looks up the `Layout` callable of a compiled module.
pub trait ModuleResolver {
    /// What the resolver hands back for a module exporting a layout.
    type Layout;

    /// Returns the layout exported by the dotted module path `module`, or
    /// `None` if the module does not exist or exports no callable layout.
    fn resolve_layout(&self, module: &str) -> Option<Self::Layout>;
}

/// Candidate layout modules of one template, innermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutChain {
    candidates: Vec<String>,
}

impl LayoutChain {
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    /// Computes the chain of a markup template artifact.
    ///
    /// Returns `None` for templates outside `<namespace>/<routes_dir>`, for
    /// Markdown artifacts and when there is no candidate directory.
    ///
    /// ```
    /// # use nexy::generator::LayoutChain;
    /// let chain = LayoutChain::for_template(
    ///     "__nexy__/src/routes/blog/index.html",
    ///     "__nexy__",
    ///     "src/routes",
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     chain.candidates(),
    ///     ["__nexy__.src.routes.blog.layout", "__nexy__.src.routes.layout"]
    /// );
    /// ```
    pub fn for_template(template_path: &str, namespace: &str, routes_dir: &str) -> Option<Self> {
        if extension_of(template_path) != ".html" {
            return None;
        }

        let root = format!("{namespace}/{}", naming::normalize_path(routes_dir));
        let (directory, file_name) = template_path.rsplit_once('/')?;
        if directory != root && !directory.starts_with(&format!("{root}/")) {
            return None;
        }

        let stem = &file_name[..file_name.len() - extension_of(file_name).len()];
        let mut directories = Vec::new();
        let mut current = directory;
        loop {
            directories.push(current);
            if current == root {
                break;
            }
            match current.rsplit_once('/') {
                Some((parent, _)) => current = parent,
                None => break,
            }
        }
        if stem == LAYOUT_STEM {
            directories.remove(0);
        }

        let candidates: Vec<String> = directories
            .into_iter()
            .map(|directory| naming::module_path(&format!("{directory}/{LAYOUT_STEM}")))
            .collect();
        (!candidates.is_empty()).then(|| Self::new(candidates))
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The first candidate, innermost first, that resolves to a layout.
    pub fn find<'c, R: ModuleResolver>(&'c self, resolver: &R) -> Option<(&'c str, R::Layout)> {
        self.candidates.iter().find_map(|module| {
            resolver
                .resolve_layout(module)
                .map(|layout| (module.as_str(), layout))
        })
    }

    /// Wraps `inner` in the innermost layout, or returns it unchanged when
    /// no candidate resolves.
    pub fn compose<R>(&self, resolver: &R, inner: String) -> String
    where
        R: ModuleResolver,
        R::Layout: FnOnce(String) -> String,
    {
        match self.find(resolver) {
            Some((_, layout)) => layout(inner),
            None => inner,
        }
    }
}

/// Resolves layouts among compiled modules on disk.
///
/// A module resolves when its `.py` file exists under `root` and defines
/// the layout function.
#[derive(Debug, Clone)]
pub struct FsModuleResolver {
    root: PathBuf,
}

impl FsModuleResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn module_file(&self, module: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(module.split('.'));
        path.set_extension("py");
        path
    }
}

impl ModuleResolver for FsModuleResolver {
    type Layout = PathBuf;

    fn resolve_layout(&self, module: &str) -> Option<PathBuf> {
        let path = self.module_file(module);
        let source = fs::read_to_string(&path).ok()?;
        defines_layout(&source).then_some(path)
    }
}

fn defines_layout(source: &str) -> bool {
    source.lines().any(|line| {
        line.strip_prefix("def ")
            .and_then(|rest| rest.strip_prefix(LAYOUT_SYMBOL))
            .is_some_and(|rest| rest.starts_with('('))
    })
}
