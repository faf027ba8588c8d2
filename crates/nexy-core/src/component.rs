//! Component model types.
//!
//! These types describe what the parser learned about a single component
//! source file. They are created fresh for every compile and never cached.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// The kind of component an import refers to.
///
/// Classification first looks at the file extension and falls back to the
/// framework name recorded by the loader call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentType {
    /// A compiled Nexy component (`.nexy`).
    Nexy,
    Vue,
    Svelte,
    /// React component (`.tsx` / `.jsx`).
    React,
    Json,
    #[default]
    Unknown,
}

impl ComponentType {
    /// Classifies a file extension (with or without the leading dot).
    ///
    /// Returns `None` for extensions with no fixed classification.
    ///
    /// # Examples
    ///
    /// ```
    /// use nexy_core::ComponentType;
    ///
    /// assert_eq!(ComponentType::from_extension(".tsx"), Some(ComponentType::React));
    /// assert_eq!(ComponentType::from_extension("svelte"), Some(ComponentType::Svelte));
    /// assert_eq!(ComponentType::from_extension(".css"), None);
    /// ```
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "nexy" => Some(Self::Nexy),
            "vue" => Some(Self::Vue),
            "svelte" => Some(Self::Svelte),
            "tsx" | "jsx" => Some(Self::React),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Classifies a framework name as written in a loader call.
    pub fn from_framework(framework: &str) -> Option<Self> {
        framework.parse().ok().filter(|kind| *kind != Self::Unknown)
    }

    /// Classifies an import using its extension, then its framework name.
    pub fn classify(extension: &str, framework: Option<&str>) -> Self {
        Self::from_extension(extension)
            .or_else(|| framework.and_then(Self::from_framework))
            .unwrap_or_default()
    }

    /// Framework name used by the client-side mounting runtime.
    ///
    /// Only foreign-framework extensions have a framework; everything else
    /// maps to `"unknown"`.
    pub fn framework_for_extension(extension: &str) -> &'static str {
        match Self::from_extension(extension) {
            Some(Self::React) => "react",
            Some(Self::Vue) => "vue",
            Some(Self::Svelte) => "svelte",
            _ => "unknown",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nexy => "nexy",
            Self::Vue => "vue",
            Self::Svelte => "svelte",
            Self::React => "react",
            Self::Json => "json",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a component type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown component type `{0}`")]
pub struct UnknownComponentType(String);

impl FromStr for ComponentType {
    type Err = UnknownComponentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nexy" => Ok(Self::Nexy),
            "vue" => Ok(Self::Vue),
            "svelte" => Ok(Self::Svelte),
            "react" => Ok(Self::React),
            "json" => Ok(Self::Json),
            "unknown" => Ok(Self::Unknown),
            other => Err(UnknownComponentType(other.to_string())),
        }
    }
}

/// A declared component input: `name: prop[T] = default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NexyProp {
    name: String,
    type_text: String,
    default: Option<String>,
}

impl NexyProp {
    pub fn new(
        name: impl Into<String>,
        type_text: impl Into<String>,
        default: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The textual type expression found inside `prop[...]`.
    pub fn type_text(&self) -> &str {
        &self.type_text
    }

    /// The textual default expression, if one was assigned.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Renders the prop as a function parameter: `name: type = default`.
    pub fn to_parameter(&self) -> String {
        match &self.default {
            Some(default) => format!("{}: {} = {}", self.name, self.type_text, default),
            None => format!("{}: {}", self.name, self.type_text),
        }
    }
}

/// A reference to another component file discovered in the logic block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NexyImport {
    path: String,
    specifier: String,
    symbol: Option<String>,
    alias: Option<String>,
    extension: String,
    component_type: ComponentType,
}

impl NexyImport {
    /// Creates an import record.
    ///
    /// # Arguments
    ///
    /// * `path` - Project-root relative path after alias resolution
    /// * `specifier` - The path exactly as written in the source
    /// * `symbol` - The imported name
    /// * `alias` - The local binding name, if different from the symbol
    /// * `component_type` - Classification of the target file
    pub fn new(
        path: impl Into<String>,
        specifier: impl Into<String>,
        symbol: Option<String>,
        alias: Option<String>,
        component_type: ComponentType,
    ) -> Self {
        let path = path.into();
        let extension = extension_of(&path).to_string();
        Self {
            path,
            specifier: specifier.into(),
            symbol,
            alias,
            extension,
            component_type,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn specifier(&self) -> &str {
        &self.specifier
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The extension of `path` including the leading dot, or `""`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    /// The name this import is visible under in the template.
    pub fn local_name(&self) -> Option<&str> {
        self.alias().or(self.symbol())
    }
}

/// Returns the extension of the last path segment, including the dot.
///
/// Dots in directory names are ignored, dot-files have no extension and an
/// extension must be alphanumeric (so `[...slug]` has none).
pub fn extension_of(path: &str) -> &str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(index) if index > 0 => {
            let extension = &file_name[index..];
            let is_extension = extension.len() > 1
                && extension[1..].chars().all(|c| c.is_ascii_alphanumeric());
            if is_extension { extension } else { "" }
        }
        _ => "",
    }
}

/// The parsed form of one component source file.
///
/// This is the contract between the parser and the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedComponent {
    frontmatter: String,
    template: String,
    props: Vec<NexyProp>,
    bindings: Vec<String>,
    imports: Vec<NexyImport>,
}

impl ParsedComponent {
    pub fn new(
        frontmatter: String,
        template: String,
        props: Vec<NexyProp>,
        bindings: Vec<String>,
        imports: Vec<NexyImport>,
    ) -> Self {
        Self {
            frontmatter,
            template,
            props,
            bindings,
            imports,
        }
    }

    /// The rendered logic source, with prop declarations removed.
    pub fn frontmatter(&self) -> &str {
        &self.frontmatter
    }

    /// The transformed template text.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Props in declaration order.
    pub fn props(&self) -> &[NexyProp] {
        &self.props
    }

    /// Names bound at the top level of the logic block, sorted.
    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }

    pub fn imports(&self) -> &[NexyImport] {
        &self.imports
    }
}
