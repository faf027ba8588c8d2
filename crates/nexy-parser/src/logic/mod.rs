//! Logic block analysis.
//!
//! The logic block is sanitized, tokenized and split into top-level
//! statements. Each statement is then classified:
//!
//! - `name: prop[T] = default` declares a component prop and is removed from
//!   the rendered source
//! - `X = __Import(...)` and `X = __nexy_loader__.import_component(...)`
//!   record a foreign component import
//! - assignments, definitions and imports contribute their names to the
//!   top-level bindings
//!
//! Everything except prop declarations is kept, in source order, with string
//! literals that span lines rewritten onto one line.

mod lexer;
mod literal;
mod statement;
mod tokens;

use std::{
    borrow::Cow,
    collections::{BTreeSet, HashMap},
};

use indexmap::IndexMap;
use log::debug;

use nexy_core::{ComponentType, NexyImport, NexyProp, component::extension_of};

use crate::{
    config::ParserConfig,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    sanitizer::{IMPORT_CALL, Sanitized, Sanitizer},
    span::{Span, Spanned},
};
use statement::{Statement, split_top_level};
use tokens::{PositionedToken, Token};

const LOADER_OBJECT: &str = "__nexy_loader__";
const LOADER_METHOD: &str = "import_component";
const PROP_MARKER: &str = "prop";

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

type Tokens<'t, 'a> = &'t [PositionedToken<'a>];

/// What the logic parser learned about a logic block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicResult {
    /// Component imports in source order, with spans in the component file.
    pub nexy_imports: Vec<Spanned<NexyImport>>,
    /// Props in declaration order.
    pub props: Vec<NexyProp>,
    /// Sorted names bound at the top level of the block.
    pub bindings: Vec<String>,
    /// The sanitized block without prop declarations.
    pub rendered_logic_source: String,
}

/// Parses the logic block of a component.
#[derive(Debug, Clone, Copy)]
pub struct LogicParser<'c> {
    config: &'c ParserConfig,
}

impl<'c> LogicParser<'c> {
    pub fn new(config: &'c ParserConfig) -> Self {
        Self { config }
    }

    /// Analyse `logic`, the trimmed logic block found at byte `offset` of
    /// the component file `current_file`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] with `E1xx` diagnostics, spanned in the
    /// component file, when the block is not well formed.
    pub fn process(
        &self,
        logic: &str,
        offset: usize,
        current_file: &str,
    ) -> Result<LogicResult, ParseError> {
        if logic.trim().is_empty() {
            return Ok(LogicResult::default());
        }

        let sanitized = Sanitizer::new(self.config).sanitize(logic, current_file);
        let to_file = |span: Span| sanitized.original_span(span).shift(offset);

        let statements =
            statement::statements(sanitized.source()).map_err(|err| err.map_spans(to_file))?;

        let mut analysis = Analysis::new(&sanitized);
        for statement in &statements {
            analysis.statement(statement);
        }
        let Analysis {
            props,
            bindings,
            loader_imports,
            kept,
            diagnostics,
            ..
        } = analysis;
        diagnostics.finish().map_err(|err| err.map_spans(to_file))?;

        let mut nexy_imports: Vec<Spanned<NexyImport>> = sanitized
            .imports()
            .iter()
            .map(|import| Spanned::new(import.inner().clone(), import.span().shift(offset)))
            .chain(
                loader_imports
                    .into_iter()
                    .map(|import| {
                        let span = to_file(import.span());
                        Spanned::new(import.into_inner(), span)
                    }),
            )
            .collect();
        nexy_imports.sort_by_key(|import| import.span().start());

        debug!(
            file = current_file,
            props = props.len(),
            imports = nexy_imports.len(),
            bindings = bindings.len();
            "Analysed logic block"
        );

        Ok(LogicResult {
            nexy_imports,
            props: props.into_values().map(|(prop, _)| prop).collect(),
            bindings: bindings.into_iter().collect(),
            rendered_logic_source: kept.join("\n"),
        })
    }
}

/// Per-block classification state.
struct Analysis<'s> {
    sanitized: &'s Sanitized,
    props: IndexMap<String, (NexyProp, Span)>,
    bindings: BTreeSet<String>,
    loader_imports: Vec<Spanned<NexyImport>>,
    kept: Vec<Cow<'s, str>>,
    diagnostics: DiagnosticCollector,
}

impl<'s> Analysis<'s> {
    fn new(sanitized: &'s Sanitized) -> Self {
        Self {
            sanitized,
            props: IndexMap::new(),
            bindings: BTreeSet::new(),
            loader_imports: Vec::new(),
            kept: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn source(&self) -> &'s str {
        self.sanitized.source()
    }

    fn statement(&mut self, statement: &Statement<'_>) {
        let keep = if statement.is_compound() {
            self.definition(statement.tokens());
            true
        } else {
            self.simple(statement)
        };
        if keep {
            self.kept.push(statement.rendered(self.source()));
        }
    }

    fn bind(&mut self, name: &str) {
        self.bindings.insert(name.to_string());
    }

    /// `def`, `async def` and `class` bind their name.
    fn definition(&mut self, header: Tokens<'_, '_>) {
        let name = match header {
            [async_kw, def_kw, name, ..] if async_kw.is_name("async") && def_kw.is_name("def") => {
                name
            }
            [kw, name, ..] if kw.is_name("def") || kw.is_name("class") => name,
            _ => return,
        };
        if let Token::Name(name) = name.token {
            self.bind(name);
        }
    }

    /// Classify a simple statement. Returns `false` if it must be removed.
    fn simple(&mut self, statement: &Statement<'_>) -> bool {
        let tokens = statement.tokens();
        match tokens.first().map(|t| t.token) {
            Some(Token::Name("import")) => self.import(&tokens[1..]),
            Some(Token::Name("from")) => self.from_import(tokens),
            Some(Token::Name(keyword)) if KEYWORDS.contains(&keyword) => {}
            Some(_) => {
                if let Some(colon) = find_top_level(tokens, ":") {
                    let target = &tokens[..colon];
                    if target_names(target).is_some_and(|names| names.len() <= 1) {
                        return self.annotated(statement, target, &tokens[colon + 1..]);
                    }
                }
                self.assignment(statement);
            }
            None => {}
        }
        true
    }

    /// `import a.b, c as d` binds `a` and `d`.
    fn import(&mut self, rest: Tokens<'_, '_>) {
        for part in split_top_level(rest, ",") {
            match part {
                [.., as_kw, alias] if as_kw.is_name("as") => {
                    if let Token::Name(alias) = alias.token {
                        self.bind(alias);
                    }
                }
                [first, ..] => {
                    if let Token::Name(name) = first.token {
                        self.bind(name);
                    }
                }
                [] => {}
            }
        }
    }

    /// `from m import (a, b as c)` binds `a` and `c`.
    fn from_import(&mut self, tokens: Tokens<'_, '_>) {
        let Some(import) = tokens.iter().position(|t| t.is_name("import")) else {
            return;
        };
        let mut names = &tokens[import + 1..];
        if let [open, inner @ .., close] = names
            && open.token == Token::Open('(')
            && close.token == Token::Close(')')
        {
            names = inner;
        }
        self.import(names);
    }

    /// Handle `target: annotation [= value]`.
    fn annotated(
        &mut self,
        statement: &Statement<'_>,
        target: Tokens<'_, '_>,
        rest: Tokens<'_, '_>,
    ) -> bool {
        let (annotation, value) = match find_top_level(rest, "=") {
            Some(eq) => (&rest[..eq], Some(&rest[eq + 1..])),
            None => (rest, None),
        };

        if is_prop_annotation(annotation) {
            self.prop(statement, target, annotation, value);
            return false;
        }

        if value.is_some()
            && let [name] = target
            && let Token::Name(name) = name.token
        {
            self.bind(name);
        }
        true
    }

    fn prop(
        &mut self,
        statement: &Statement<'_>,
        target: Tokens<'_, '_>,
        annotation: Tokens<'_, '_>,
        value: Option<Tokens<'_, '_>>,
    ) {
        let span = statement.span();
        let invalid = |message: String, help: &str| {
            Diagnostic::error(message)
                .with_code(ErrorCode::E108)
                .with_label(span, ErrorCode::E108.description())
                .with_help(help.to_string())
        };

        let name = match target {
            [name] => match name.token {
                Token::Name(name) => name,
                _ => {
                    self.diagnostics.emit(invalid(
                        "a property must be declared on a plain name".to_string(),
                        "use `name: prop[T] = default`",
                    ));
                    return;
                }
            },
            _ => {
                self.diagnostics.emit(invalid(
                    "a property must be declared on a plain name".to_string(),
                    "use `name: prop[T] = default`",
                ));
                return;
            }
        };

        // `prop [ ... ]`: the brackets are the second and last tokens.
        let arguments = &annotation[2..annotation.len() - 1];
        let parts = split_top_level(arguments, ",");
        let (Some(first), Some(last), 1) = (arguments.first(), arguments.last(), parts.len())
        else {
            self.diagnostics.emit(invalid(
                format!("property `{name}` must declare exactly one type"),
                "write the type as `prop[T]`",
            ));
            return;
        };
        let type_text = self.text(first.span.union(last.span));

        let default = match value {
            None => None,
            Some([first, .., last]) => Some(self.text(first.span.union(last.span))),
            Some([only]) => Some(self.text(only.span)),
            Some([]) => {
                self.diagnostics.emit(invalid(
                    format!("property `{name}` is missing its default value"),
                    "remove the `=` or add a default",
                ));
                return;
            }
        };

        self.register_prop(NexyProp::new(name, type_text, default), span);
    }

    fn register_prop(&mut self, prop: NexyProp, span: Span) {
        if let Some((_, first)) = self.props.get(prop.name()) {
            self.diagnostics.emit(
                Diagnostic::error(format!(
                    "property `{}` is declared multiple times",
                    prop.name()
                ))
                .with_code(ErrorCode::E106)
                .with_label(span, "duplicate declaration")
                .with_secondary_label(*first, "first declared here")
                .with_help("remove the duplicate or rename it"),
            );
            return;
        }

        if prop.default().is_none()
            && let Some((previous, previous_span)) =
                self.props.values().find(|(p, _)| p.default().is_some())
        {
            self.diagnostics.emit(
                Diagnostic::error(format!(
                    "property `{}` without a default follows property `{}` with a default",
                    prop.name(),
                    previous.name()
                ))
                .with_code(ErrorCode::E107)
                .with_label(span, ErrorCode::E107.description())
                .with_secondary_label(*previous_span, "default given here")
                .with_help(format!(
                    "give `{}` a default value or declare it before `{}`",
                    prop.name(),
                    previous.name()
                )),
            );
        }

        self.props.insert(prop.name().to_string(), (prop, span));
    }

    /// Handle `a = b = value` and record loader calls.
    fn assignment(&mut self, statement: &Statement<'_>) {
        let segments = split_top_level(statement.tokens(), "=");
        let Some((value, targets)) = segments.split_last() else {
            return;
        };

        let mut bound = Vec::new();
        for (index, target) in targets.iter().enumerate() {
            match target_names(target) {
                Some(names) => bound.extend(names),
                // `f = lambda a=1: a`: the rest belongs to the value.
                None if index > 0 => break,
                None => return,
            }
        }
        for name in &bound {
            self.bind(name);
        }

        if let ([target], [name]) = (targets, bound.as_slice())
            && target.len() == 1
        {
            self.loader_call(statement, name, value);
        }
    }

    fn loader_call(&mut self, statement: &Statement<'_>, alias: &str, value: Tokens<'_, '_>) {
        let Some(arguments) = loader_arguments(value) else {
            return;
        };
        let (Some(path), Some(symbol)) = (arguments.get("path"), arguments.get("symbol")) else {
            return;
        };

        let framework = arguments.get("framework").map(String::as_str);
        let component_type = ComponentType::classify(extension_of(path), framework);
        let specifier = self.sanitized.specifier_for(path).unwrap_or(path.as_str());
        let import = NexyImport::new(
            path.as_str(),
            specifier,
            Some(symbol.clone()),
            Some(alias.to_string()),
            component_type,
        );
        self.loader_imports
            .push(Spanned::new(import, statement.span()));
    }

    fn text(&self, span: Span) -> String {
        self.source()[span.range()].trim().to_string()
    }
}

fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Position of the first `op` outside of brackets.
fn find_top_level(tokens: Tokens<'_, '_>, op: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        match token.token {
            Token::Open(_) => depth += 1,
            Token::Close(_) => depth = depth.saturating_sub(1),
            Token::Op(o) if depth == 0 && o == op => return Some(index),
            _ => {}
        }
    }
    None
}

/// Index of the bracket closing the one opened at `open`.
fn matching_close(tokens: Tokens<'_, '_>, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        match token.token {
            Token::Open(_) => depth += 1,
            Token::Close(_) => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// `prop[...]`
fn is_prop_annotation(annotation: Tokens<'_, '_>) -> bool {
    matches!(annotation, [marker, open, ..]
        if marker.is_name(PROP_MARKER) && open.token == Token::Open('['))
        && matching_close(annotation, 1) == Some(annotation.len() - 1)
}

/// Names bound by an assignment target list, or `None` if `tokens` is not
/// a valid target list.
fn target_names<'a>(tokens: Tokens<'_, 'a>) -> Option<Vec<&'a str>> {
    let parts = split_top_level(tokens, ",");
    if let [single] = parts.as_slice() {
        return single_target(single);
    }

    let mut names = Vec::new();
    let last = parts.len() - 1;
    for (index, part) in parts.iter().enumerate() {
        if part.is_empty() && index == last {
            continue;
        }
        names.extend(single_target(part)?);
    }
    Some(names)
}

fn single_target<'a>(tokens: Tokens<'_, 'a>) -> Option<Vec<&'a str>> {
    match tokens {
        [] => None,
        [token] => match token.token {
            Token::Name(name) if !is_keyword(name) => Some(vec![name]),
            _ => None,
        },
        [star, rest @ ..] if star.is_op("*") => single_target(rest),
        [open, inner @ .., close]
            if matches!(
                (open.token, close.token),
                (Token::Open('('), Token::Close(')')) | (Token::Open('['), Token::Close(']'))
            ) && matching_close(tokens, 0) == Some(tokens.len() - 1) =>
        {
            if inner.is_empty() {
                Some(Vec::new())
            } else {
                target_names(inner)
            }
        }
        _ => is_reference(tokens).then(Vec::new),
    }
}

/// An attribute or subscript target such as `a.b`, `a[0]` or `f().x`.
fn is_reference(tokens: Tokens<'_, '_>) -> bool {
    let mut index = match tokens.first().map(|t| t.token) {
        Some(Token::Name(name)) if !is_keyword(name) => 1,
        Some(Token::Open('(')) => match matching_close(tokens, 0) {
            Some(close) => close + 1,
            None => return false,
        },
        _ => return false,
    };

    let mut assignable = false;
    while index < tokens.len() {
        match tokens[index].token {
            Token::Op(".") => match tokens.get(index + 1).map(|t| t.token) {
                Some(Token::Name(_)) => {
                    index += 2;
                    assignable = true;
                }
                _ => return false,
            },
            Token::Open(bracket @ ('[' | '(')) => {
                let Some(close) = matching_close(tokens, index) else {
                    return false;
                };
                index = close + 1;
                assignable = bracket == '[';
            }
            _ => return false,
        }
    }
    assignable
}

/// Keyword arguments of a loader call whose values are plain string
/// literals.
fn loader_arguments(value: Tokens<'_, '_>) -> Option<HashMap<String, String>> {
    let open = match value {
        [callee, ..] if callee.is_name(IMPORT_CALL) => 1,
        [object, dot, method, ..]
            if object.is_name(LOADER_OBJECT) && dot.is_op(".") && method.is_name(LOADER_METHOD) =>
        {
            3
        }
        _ => return None,
    };
    if value.get(open).map(|t| t.token) != Some(Token::Open('('))
        || matching_close(value, open) != Some(value.len() - 1)
    {
        return None;
    }

    let mut arguments = HashMap::new();
    for argument in split_top_level(&value[open + 1..value.len() - 1], ",") {
        if let [key, eq, literal] = argument
            && eq.is_op("=")
            && let (Token::Name(key), Token::String(literal)) = (key.token, literal.token)
            && let Some(text) = string_value(literal)
        {
            arguments.insert(key.to_string(), text);
        }
    }
    Some(arguments)
}

/// The value of a string literal token. Byte strings and f-strings have no
/// constant text value.
fn string_value(literal: &str) -> Option<String> {
    let quote_start = literal.find(['"', '\''])?;
    let prefix = literal[..quote_start].to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }

    let body = &literal[quote_start..];
    let quote = if body.starts_with(r#"""""#) || body.starts_with("'''") {
        &body[..3]
    } else {
        &body[..1]
    };
    let inner = body.strip_prefix(quote)?.strip_suffix(quote)?;
    if prefix.contains('r') {
        return Some(inner.to_string());
    }
    Some(unescape(inner))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(escaped @ ('\\' | '\'' | '"')) => out.push(escaped),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_FILE: &str = "src/routes/index.nexy";

    fn process(logic: &str) -> LogicResult {
        let config = ParserConfig::default();
        LogicParser::new(&config)
            .process(logic, 0, CURRENT_FILE)
            .unwrap()
    }

    fn process_err(logic: &str, offset: usize) -> ParseError {
        let config = ParserConfig::default();
        LogicParser::new(&config)
            .process(logic, offset, CURRENT_FILE)
            .unwrap_err()
    }

    fn first_code(err: &ParseError) -> Option<ErrorCode> {
        err.diagnostics()[0].code()
    }

    #[test]
    fn test_props_extracted_and_removed() {
        let result = process(
            "title: prop[str] = \"Home\"\ncount: prop[int] = 0\nmessage = f'{title}!'",
        );

        assert_eq!(
            result.props,
            vec![
                NexyProp::new("title", "str", Some("\"Home\"".to_string())),
                NexyProp::new("count", "int", Some("0".to_string())),
            ]
        );
        assert_eq!(result.rendered_logic_source, "message = f'{title}!'");
        assert_eq!(result.bindings, vec!["message"]);
    }

    #[test]
    fn test_prop_complex_type_and_no_default() {
        let result = process("items: prop[list[dict[str, int]]]\nlimit: prop[int | None] = None");
        assert_eq!(result.props[0].type_text(), "list[dict[str, int]]");
        assert_eq!(result.props[0].default(), None);
        assert_eq!(result.props[1].type_text(), "int | None");
        assert_eq!(result.rendered_logic_source, "");
    }

    #[test]
    fn test_duplicate_prop() {
        let err = process_err("title: prop[str]\ntitle: prop[int]", 0);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E106));
        assert_eq!(diag.labels()[0].span(), Span::new(17..33));
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.labels()[1].span(), Span::new(0..16));
    }

    #[test]
    fn test_required_prop_after_default() {
        let err = process_err("size: prop[int] = 1\nlabel: prop[str]", 0);
        assert_eq!(first_code(&err), Some(ErrorCode::E107));
    }

    #[test]
    fn test_invalid_prop_declarations() {
        let err = process_err("size: prop[int, str] = 1", 0);
        assert_eq!(first_code(&err), Some(ErrorCode::E108));

        let err = process_err("self.size: prop[int] = 1", 0);
        assert_eq!(first_code(&err), Some(ErrorCode::E108));

        let err = process_err("size: prop[] = 1", 0);
        assert_eq!(first_code(&err), Some(ErrorCode::E108));
    }

    #[test]
    fn test_sanitized_foreign_import_recorded() {
        let result = process("from \"./Card.svelte\" import Card\nx = 1");
        assert_eq!(result.nexy_imports.len(), 1);

        let import = result.nexy_imports[0].inner();
        assert_eq!(import.path(), "src/routes/Card.svelte");
        assert_eq!(import.specifier(), "./Card.svelte");
        assert_eq!(import.symbol(), Some("Card"));
        assert_eq!(import.alias(), Some("Card"));
        assert_eq!(import.component_type(), ComponentType::Svelte);
        assert_eq!(result.nexy_imports[0].span(), Span::new(0..32));
        assert_eq!(result.bindings, vec!["Card", "x"]);
        assert!(
            result
                .rendered_logic_source
                .starts_with(r#"Card = __Import(path="src/routes/Card.svelte""#)
        );
    }

    #[test]
    fn test_explicit_loader_calls() {
        let result = process(
            "Chart = __nexy_loader__.import_component(path='src/Chart.vue', symbol='Chart')\n\
             Gauge = __Import(path=\"src/gauge.js\", framework=\"react\", symbol=\"Gauge\")",
        );
        assert_eq!(result.nexy_imports.len(), 2);
        assert_eq!(
            result.nexy_imports[0].inner().component_type(),
            ComponentType::Vue
        );
        assert_eq!(
            result.nexy_imports[1].inner().component_type(),
            ComponentType::React
        );
        assert_eq!(result.nexy_imports[1].inner().specifier(), "src/gauge.js");
    }

    #[test]
    fn test_loader_call_without_symbol_ignored() {
        let result = process("Chart = __Import(path=\"src/Chart.vue\")");
        assert!(result.nexy_imports.is_empty());
        assert_eq!(result.bindings, vec!["Chart"]);
    }

    #[test]
    fn test_nexy_import_spans_shifted_to_file() {
        let config = ParserConfig::default();
        let result = LogicParser::new(&config)
            .process("from \"@/Card.nexy\" import Card", 4, CURRENT_FILE)
            .unwrap();
        assert_eq!(result.nexy_imports[0].span(), Span::new(4..34));
    }

    #[test]
    fn test_bindings() {
        let result = process(
            "import os.path, json as j\n\
             from typing import (List, Optional as Opt)\n\
             a, (b, *rest) = 1, (2, 3)\n\
             x = y = 0\n\
             obj.attr = 1\n\
             items[0] = 2\n\
             counter += 1\n\
             f = lambda n=1: n\n\
             total: int = 3\n\
             declared: int\n\
             _hidden = 4\n\
             def helper():\n    inner = 1\n\
             async def fetch():\n    pass\n\
             class Card:\n    pass\n\
             return_value = helper() if x == 0 else None\n\
             del x",
        );
        assert_eq!(
            result.bindings,
            vec![
                "Card", "List", "Opt", "_hidden", "a", "b", "f", "fetch", "helper", "j", "os",
                "rest", "return_value", "total", "x", "y",
            ]
        );
    }

    #[test]
    fn test_compound_statements_kept_verbatim() {
        let logic = "if True:\n    value = 1\nelse:\n    value = 2\nshown = value";
        let result = process(logic);
        assert_eq!(result.rendered_logic_source, logic);
        assert_eq!(result.bindings, vec!["shown"]);
    }

    #[test]
    fn test_multiline_strings_rendered_on_one_line() {
        let result = process("banner = \"\"\"line one\nline two\n\nline four\"\"\"\nrows = [\n    1,\n]");
        assert_eq!(
            result.rendered_logic_source,
            "banner = \"\"\"line one\\nline two\\n\\nline four\"\"\"\nrows = [\n    1,\n]"
        );
        assert_eq!(result.bindings, vec!["banner", "rows"]);
    }

    #[test]
    fn test_empty_logic_block() {
        assert_eq!(process("  \n "), LogicResult::default());
    }

    #[test]
    fn test_error_span_in_file_coordinates() {
        let err = process_err("x = (1", 10);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(diag.labels()[0].span(), Span::new(14..15));
    }

    #[test]
    fn test_error_span_after_rewritten_import() {
        let err = process_err("from \"./Card.svelte\" import Card\ny = [", 4);
        assert_eq!(err.diagnostics()[0].labels()[0].span(), Span::new(41..42));
    }

    #[test]
    fn test_string_value() {
        assert_eq!(string_value(r#""a.vue""#).as_deref(), Some("a.vue"));
        assert_eq!(string_value(r#"'it\'s'"#).as_deref(), Some("it's"));
        assert_eq!(string_value(r#"r"C:\dir""#).as_deref(), Some(r"C:\dir"));
        assert_eq!(string_value(r#"'''x'''"#).as_deref(), Some("x"));
        assert_eq!(string_value(r#"f"{x}""#), None);
        assert_eq!(string_value(r#"b"x""#), None);
    }
}
