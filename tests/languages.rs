//! Built-in and configured language packs driving navigation and edits.

use treepath::lang::QueryCategory;
use treepath::{
    config, EditError, Grammar, LanguagePack, LanguagePackRegistry, NormalizedKind, TreeEditor,
};
use std::path::Path;
use std::sync::Arc;

#[test]
fn extensions_select_packs() {
    let registry = LanguagePackRegistry::builtin();
    let cases = [
        ("app.ts", "typescript"),
        ("view.tsx", "tsx"),
        ("index.mjs", "javascript"),
        ("component.jsx", "javascript"),
        ("tool.py", "python"),
        ("main.rs", "rust"),
    ];
    for (file, language) in cases {
        assert_eq!(registry.for_path(Path::new(file)).unwrap().language, language, "{file}");
    }
    assert!(registry.for_path(Path::new("notes.txt")).is_err());
    assert!(registry.for_path(Path::new("Makefile")).is_err());
}

#[test]
fn typescript_interface_append() {
    let source = "interface Shape {\n  area(): number;\n}\n";
    let editor = TreeEditor::for_language("ts", source).unwrap();

    let edited = editor.append_child("Shape", "perimeter(): number;").unwrap();
    assert_eq!(
        edited.text(),
        "interface Shape {\n  area(): number;\n  perimeter(): number;\n}\n"
    );
    let found = edited.find_nodes_by_semantic_path("Shape.perimeter");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].description, "perimeter method in interface Shape");
}

#[test]
fn tsx_uses_typescript_rules() {
    let source = "class Panel {\n  title: string = \"\";\n  render() { return <div />; }\n}\n";
    let editor = TreeEditor::for_language("tsx", source).unwrap();
    assert!(!editor.tree().has_errors());
    assert_eq!(
        editor.all_semantic_paths(),
        vec!["Panel", "Panel.title", "Panel.render"]
    );
}

#[test]
fn rust_struct_and_impl_share_a_name() {
    let source = "struct Counter {\n    count: u32,\n}\n\nimpl Counter {\n    fn bump(&mut self) {}\n}\n";
    let editor = TreeEditor::for_language("rust", source).unwrap();

    let err = editor.append_child("Counter", "fn reset(&mut self) {}").unwrap_err();
    assert!(matches!(err, EditError::AmbiguousPath { .. }));

    // the structural path picks the impl block
    let edited = editor
        .append_child("source_file[0]/impl_item[1]", "fn reset(&mut self) {\n    self.count = 0;\n}")
        .unwrap();
    assert!(edited.text().ends_with(
        "impl Counter {\n    fn bump(&mut self) {}\n    fn reset(&mut self) {\n        self.count = 0;\n    }\n}\n"
    ));
    assert!(edited.validate().is_ok());
    assert_eq!(edited.find_nodes_by_semantic_path("Counter.reset").len(), 1);
}

#[test]
fn nodes_by_kind_follow_the_kind_map() {
    let editor = TreeEditor::for_language(
        "python",
        "class A:\n    def one(self):\n        pass\n\n    def two(self):\n        pass\n",
    )
    .unwrap();
    let tree = editor.tree();
    assert_eq!(tree.find_nodes_by_kind(NormalizedKind::Class).len(), 1);
    assert_eq!(tree.find_nodes_by_type("function_definition").len(), 2);
}

#[test]
fn statements_are_not_declarations_by_kind() {
    let editor = TreeEditor::for_language("python", "class A:\n    x = 1\n\nprint(1)\n").unwrap();
    assert!(editor.tree().find_nodes_by_kind(NormalizedKind::Property).is_empty());
    // the property query still finds class-level assignments
    assert_eq!(editor.find_nodes_by_semantic_path("A.x")[0].kind, NormalizedKind::Property);

    let editor = TreeEditor::for_language("javascript", "let n = 1;\nconst f = () => n;\n").unwrap();
    assert!(editor.tree().find_nodes_by_kind(NormalizedKind::Function).is_empty());
    let f = editor.find_nodes_by_semantic_path("f");
    assert_eq!(f.len(), 1);
    assert_eq!(f[0].kind, NormalizedKind::Function);
    assert_eq!(f[0].description, "f function");
}

#[test]
fn derived_pack_composes_over_a_builtin() {
    let registry = LanguagePackRegistry::builtin();
    let js = registry.get("javascript").unwrap();

    let pack = js
        .derive("specs", Grammar::JavaScript)
        .with_query(
            QueryCategory::Blocks,
            r#"(call_expression
  function: (identifier) @callee
  arguments: (arguments . (string) @name)) @block"#,
        );
    let pack: Arc<LanguagePack> = Arc::new(pack);

    // blocks no longer need a callback argument
    let editor = TreeEditor::parse(&pack, "suite(\"io\");\nsuite(\"net\");\n").unwrap();
    assert_eq!(
        editor.all_semantic_paths(),
        vec![r#"suite("io")"#, r#"suite("net")"#]
    );
    // the base pack is untouched
    let base = TreeEditor::parse(&js, "suite(\"io\");\n").unwrap();
    assert!(base.all_semantic_paths().is_empty());
}

#[test]
fn configured_pack_is_used_for_its_extension() {
    let input = r#"
[meta]
name = "fixtures"

[[packs]]
language = "jsfixture"
extends = "javascript"
extensions = ["fixture"]
indent_unit = "    "
"#;
    let config = config::load_from_str(input).unwrap();
    let registry = config::merge_into(&config, LanguagePackRegistry::builtin()).unwrap();
    let pack = registry.for_path(Path::new("data.fixture")).unwrap();
    assert_eq!(pack.language, "jsfixture");

    let editor = TreeEditor::parse(&pack, "class A {}\n").unwrap();
    let edited = editor.append_child("A", "run() {}").unwrap();
    assert_eq!(edited.text(), "class A {\n    run() {}\n}\n");
}

#[test]
fn broken_queries_in_a_pack_match_nothing() {
    let js = LanguagePackRegistry::builtin().get("javascript").unwrap();
    let pack = Arc::new(
        js.derive("broken", Grammar::JavaScript)
            .with_query(QueryCategory::Properties, "(no_such_node) @property"),
    );
    let editor = TreeEditor::parse(&pack, "class A {\n  x = 1;\n  run() {}\n}\n").unwrap();
    assert_eq!(editor.all_semantic_paths(), vec!["A", "A.run"]);
}
