//! Tests for the complete parsing pipeline.
//!
//! These tests run [`crate::parse`] on whole component sources, with small
//! projects on disk where imports have to resolve.

use std::{fs, path::Path};

use nexy_core::{ComponentType, NexyProp, ParsedComponent};
use tempfile::TempDir;

use crate::{ParseError, ParserConfig, Phase, parse};

const INDEX: &str = "src/routes/index.nexy";

/// Create a project with empty files at the given paths.
fn project(files: &[&str]) -> TempDir {
    let root = tempfile::tempdir().expect("temporary project directory");
    for file in files {
        let path = root.path().join(file);
        fs::create_dir_all(path.parent().expect("file has a parent")).expect("create parent");
        fs::write(path, "").expect("write project file");
    }
    root
}

fn config_for(root: &Path) -> ParserConfig {
    ParserConfig {
        project_root: root.to_path_buf(),
        ..ParserConfig::default()
    }
}

/// Parse `source` as the index page of a project containing `files`.
fn parse_in_project(source: &str, files: &[&str]) -> Result<ParsedComponent, ParseError> {
    let root = project(files);
    parse(source, INDEX, &config_for(root.path()))
}

fn assert_parses_successfully(source: &str) -> ParsedComponent {
    match parse_in_project(source, &[]) {
        Ok(component) => component,
        Err(err) => panic!("Expected parsing to succeed, but got error: {err}"),
    }
}

fn assert_parse_fails(source: &str, phase: Phase) -> ParseError {
    match parse_in_project(source, &[]) {
        Ok(_) => panic!("Expected parsing to fail, but it succeeded"),
        Err(err) => {
            assert_eq!(err.phase(), Some(phase), "unexpected error: {err}");
            err
        }
    }
}

/// The source text under the primary label of the first diagnostic.
fn primary_text<'s>(source: &'s str, err: &ParseError) -> &'s str {
    let label = &err.diagnostics()[0].labels()[0];
    &source[label.span().range()]
}

mod pipeline_tests {
    use super::*;

    #[test]
    fn test_simple_binding() {
        let component =
            assert_parses_successfully("---\ntitle = \"Nexy\"\n---\n<h1>{{ title }}</h1>\n");

        assert_eq!(component.frontmatter(), "title = \"Nexy\"");
        assert_eq!(component.template(), "<h1>{{ title }}</h1>");
        assert_eq!(component.bindings(), ["title"]);
        assert!(component.props().is_empty());
        assert!(component.imports().is_empty());
    }

    #[test]
    fn test_props_removed_from_frontmatter() {
        let component = assert_parses_successfully(
            "---\ntitle: prop[str] = \"Home\"\nheading = title.upper()\n---\n<h1>{{ heading }}</h1>",
        );

        assert_eq!(
            component.props(),
            [NexyProp::new("title", "str", Some("\"Home\"".to_string()))]
        );
        assert_eq!(component.frontmatter(), "heading = title.upper()");
        assert!(!component.frontmatter().contains("prop["));
    }

    #[test]
    fn test_svelte_component_import() {
        let component = parse_in_project(
            "---\nfrom \"./Card.svelte\" import Card\n---\n<Card title=\"x\"/>",
            &["src/routes/Card.svelte"],
        )
        .unwrap();

        assert_eq!(
            component.frontmatter(),
            r#"Card = __Import(path="src/routes/Card.svelte", framework="svelte", symbol="Card")"#
        );
        assert_eq!(component.template(), r#"{{ Card(title="x") }}"#);
        assert_eq!(component.imports().len(), 1);
        assert_eq!(
            component.imports()[0].component_type(),
            ComponentType::Svelte
        );
    }

    #[test]
    fn test_react_import_keeps_path() {
        let component = parse_in_project(
            "---\nfrom \"src/components/Button.tsx\" import Button as Btn\n---\n<Btn label='go'/>",
            &["src/components/Button.tsx"],
        )
        .unwrap();

        assert_eq!(
            component.frontmatter(),
            r#"Btn = __Import(path="src/components/Button.tsx", framework="react", symbol="Button")"#
        );
        assert_eq!(component.template(), "{{ Btn(label='go') }}");
    }

    #[test]
    fn test_nexy_component_and_local_definition() {
        let source = "---\n\
                      from \"@/Card.nexy\" import Card\n\
                      def Helper(text):\n    return text\n\
                      ---\n\
                      <Card><Helper/></Card>";
        let component = parse_in_project(source, &["src/components/Card.nexy"]).unwrap();

        assert!(
            component
                .frontmatter()
                .starts_with("from __nexy__.src.components.Card import Card\ndef Helper(text):")
        );
        assert_eq!(
            component.template(),
            "{% call Card() %}{{ Helper() }}{% endcall %}"
        );
        assert_eq!(component.imports()[0].path(), "src/components/Card.nexy");
        assert_eq!(component.bindings(), ["Card", "Helper"]);
    }

    #[test]
    fn test_markdown_template_keeps_rules() {
        let component =
            assert_parses_successfully("---\nname = \"docs\"\n---\n# {{ name }}\n\n---\n\nText");
        assert_eq!(component.template(), "# {{ name }}\n\n---\n\nText");
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_missing_delimiters() {
        assert_parse_fails("<h1>Hello</h1>", Phase::Format);
        assert_parse_fails("---\nx = 1\n<h1>Hello</h1>", Phase::Format);
    }

    #[test]
    fn test_logic_error_span() {
        let source = "---\nitems = (1, 2\n---\n<p/>";
        let err = assert_parse_fails(source, Phase::LogicParse);
        assert_eq!(primary_text(source, &err), "(");
    }

    #[test]
    fn test_duplicate_prop_span() {
        let source = "---\ntitle: prop[str]\ntitle: prop[int]\n---\n<p/>";
        let err = assert_parse_fails(source, Phase::LogicParse);
        assert_eq!(primary_text(source, &err), "title: prop[int]");
    }

    #[test]
    fn test_missing_import() {
        let source = "---\nfrom \"./Missing.nexy\" import Missing\n---\n<Missing/>";
        let err = parse_in_project(source, &["src/routes/index.nexy"]).unwrap_err();

        assert_eq!(err.phase(), Some(Phase::ImportValidation));
        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(
            primary_text(source, &err),
            "from \"./Missing.nexy\" import Missing"
        );
    }

    #[test]
    fn test_unknown_component_span() {
        let source = "---\ntitle = 1\n---\n<div>\n  <Crad/>\n</div>";
        let err = assert_parse_fails(source, Phase::TemplateSyntax);
        assert_eq!(primary_text(source, &err), "<Crad/>");
    }

    #[test]
    fn test_unbalanced_component_tags() {
        let source = "---\nfrom \"@/Card.nexy\" import Card\n---\n<Card>open";
        let err = parse_in_project(source, &["src/components/Card.nexy"]).unwrap_err();
        assert_eq!(err.phase(), Some(Phase::TemplateSyntax));
        assert_eq!(primary_text(source, &err), "<Card>");
    }
}

mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn component_name() -> impl Strategy<Value = String> {
        "[A-Z][a-zA-Z0-9_]{0,10}"
            .prop_filter("not a constant keyword", |name| {
                !matches!(name.as_str(), "True" | "False" | "None")
            })
    }

    fn check_known_component_accepted(name: &str) -> Result<(), TestCaseError> {
        let source = format!("---\n{name} = make()\n---\n<{name} size=\"2\"/>");
        let component = parse(&source, INDEX, &ParserConfig::default());
        prop_assert!(component.is_ok(), "parse failed: {:?}", component.err());

        let expected = format!("{{{{ {name}(size=\"2\") }}}}");
        let component = component.unwrap();
        prop_assert_eq!(component.template(), expected.as_str());
        Ok(())
    }

    fn check_unknown_component_rejected(name: &str) -> Result<(), TestCaseError> {
        let source = format!("---\nvalue = 1\n---\n<{name}/>");
        let result = parse(&source, INDEX, &ParserConfig::default());
        prop_assert!(result.is_err());
        prop_assert_eq!(result.unwrap_err().phase(), Some(Phase::TemplateSyntax));
        Ok(())
    }

    proptest! {
        #[test]
        fn known_component_accepted(name in component_name()) {
            check_known_component_accepted(&name)?;
        }

        #[test]
        fn unknown_component_rejected(name in component_name()) {
            check_unknown_component_rejected(&name)?;
        }
    }
}
