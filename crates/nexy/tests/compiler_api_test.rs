//! Integration tests for the Compiler and ProjectBuilder API
//!
//! Each test lays out a small project in a temporary directory and checks
//! the artifacts written for it.

use std::{fs, path::Path};

use tempfile::TempDir;

use nexy::{Compiler, NexyError, ProjectBuilder, RouteKind, RouteTable, config::NexyConfig};
use nexy_parser::Phase;

fn project(files: &[(&str, &str)]) -> TempDir {
    let root = tempfile::tempdir().expect("Failed to create temp directory");
    for (path, content) in files {
        let path = root.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    root
}

fn config(root: &Path) -> NexyConfig {
    NexyConfig::default().with_project_root(root)
}

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap_or_else(|err| panic!("{path}: {err}"))
}

#[test]
fn test_compile_binding_into_context() {
    let root = project(&[(
        "src/routes/index.nexy",
        "---\ntitle = \"Nexy\"\n---\n<div>{{ title }}</div>",
    )]);

    let output = Compiler::new(config(root.path()))
        .compile("src/routes/index.nexy")
        .expect("Failed to compile");

    assert_eq!(read(root.path(), "__nexy__/src/routes/index.html"), "<div>{{ title }}</div>");
    let module = read(root.path(), "__nexy__/src/routes/index.py");
    assert!(module.contains("def Index() -> str:"));
    assert!(module.contains("__context = {\"title\": title}"));
    assert!(module.contains("__Template(\"__nexy__/src/routes/index.html\", __context)"));
    assert_eq!(output.artifacts().module(), root.path().join("__nexy__/src/routes/index.py"));
}

#[test]
fn test_compile_svelte_component() {
    let root = project(&[
        ("src/routes/Card.svelte", "<p>card</p>"),
        (
            "src/routes/index.nexy",
            "---\nfrom \"./Card.svelte\" import Card\n---\n<Card title=\"x\"/>",
        ),
    ]);

    Compiler::new(config(root.path()))
        .compile("src/routes/index.nexy")
        .expect("Failed to compile");

    let module = read(root.path(), "__nexy__/src/routes/index.py");
    assert!(module.contains(
        "Card = __Import(path=\"src/routes/Card.svelte\", framework=\"svelte\", symbol=\"Card\")"
    ));
    assert!(module.contains("\"Card\": Card"));
    assert_eq!(read(root.path(), "__nexy__/src/routes/index.html"), "{{ Card(title=\"x\") }}");
}

#[test]
fn test_compile_markdown_component() {
    let root = project(&[(
        "src/routes/docs/intro.mdx",
        "---\nversion: prop[str] = \"1.0\"\n---\n# Intro {{ version }}\n\n---\n",
    )]);

    Compiler::new(config(root.path()))
        .compile("src/routes/docs/intro.mdx")
        .expect("Failed to compile");

    assert_eq!(read(root.path(), "__nexy__/src/routes/docs/intro.md"), "# Intro {{ version }}\n\n---");
    let module = read(root.path(), "__nexy__/src/routes/docs/intro.py");
    assert!(module.contains("def Intro(version: str = \"1.0\") -> str:"));
    assert!(!module.contains("prop["));
    assert!(!module.contains("__import_module"));
}

#[test]
fn test_build_continues_after_failure() {
    let root = project(&[
        ("src/routes/index.nexy", "---\ntitle = \"Home\"\n---\n<h1>{{ title }}</h1>"),
        (
            "src/routes/broken.nexy",
            "---\nfrom \"./Missing.nexy\" import Missing\n---\n<Missing/>",
        ),
        ("src/components/Card.nexy", "---\nlabel: prop[str]\n---\n<div>{{ label }}</div>"),
    ]);

    let report = ProjectBuilder::new(config(root.path()))
        .build()
        .expect("Failed to discover sources");

    assert!(!report.is_success());
    assert_eq!(report.total(), 3);
    assert_eq!(report.compiled().len(), 2);
    assert_eq!(report.failures().len(), 1);

    let (path, err) = &report.failures()[0];
    assert!(path.ends_with("src/routes/broken.nexy"));
    match err {
        NexyError::Parse { err, path, .. } => {
            assert_eq!(err.phase(), Some(Phase::ImportValidation));
            assert_eq!(err.diagnostics().len(), 1);
            assert_eq!(path, "src/routes/broken.nexy");
        }
        other => panic!("Expected parse error, got {other:?}"),
    }

    assert!(root.path().join("__nexy__/src/routes/index.py").is_file());
    assert!(root.path().join("__nexy__/src/components/Card.py").is_file());
    assert!(!root.path().join("__nexy__/src/routes/broken.py").exists());
    assert!(matches!(
        report.into_result(),
        Err(NexyError::Build { failed: 1, total: 3 })
    ));
}

#[test]
fn test_routes_after_build() {
    let root = project(&[
        (
            "src/routes/layout.nexy",
            "---\nchildren: prop[str] = \"\"\n---\n<main>{{ children }}</main>",
        ),
        ("src/routes/index.nexy", "---\ntitle = \"Home\"\n---\n<h1>{{ title }}</h1>"),
        ("src/routes/api/health.py", "def GET():\n    return {}\n"),
    ]);
    let config = config(root.path());

    let report = ProjectBuilder::new(config.clone()).build().unwrap();
    assert!(report.is_success(), "{:?}", report.failures());

    let table = RouteTable::discover(&config).unwrap();
    let pages: Vec<_> = table.of_kind(RouteKind::Page).collect();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].pattern(), "/");
    assert_eq!(pages[0].layout(), Some("__nexy__.src.routes.layout"));
    assert_eq!(table.of_kind(RouteKind::Api).count(), 1);
}

#[test]
fn test_multiline_literals_keep_their_value() {
    let root = project(&[(
        "src/components/Banner.nexy",
        "---\nbanner = \"\"\"line one\nline two\n\nline four\"\"\"\npattern = r'''\\d+\n\\w+'''\n\ndef shout():\n    '''Upper-case\n    the banner.'''\n    return banner.upper()\n---\n<pre>{{ banner }}</pre>",
    )]);

    Compiler::new(config(root.path()))
        .compile("src/components/Banner.nexy")
        .expect("Failed to compile");

    let module = read(root.path(), "__nexy__/src/components/Banner.py");
    assert!(module.contains("\n    banner = \"\"\"line one\\nline two\\n\\nline four\"\"\"\n"));
    assert!(module.contains("\n    pattern = (r'''\\d+''' '\\n' r'''\\w+''')\n"));
    assert!(module.contains("\n    def shout():\n        '''Upper-case\\n    the banner.'''\n        return banner.upper()\n"));
    // Every body line sits inside the render function.
    assert!(
        module
            .lines()
            .skip_while(|line| !line.starts_with("def Banner("))
            .skip(1)
            .all(|line| line.is_empty() || line.starts_with("    "))
    );
}
