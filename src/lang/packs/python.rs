use crate::lang::kind::{BodyRule, NormalizedKind};
use crate::lang::pack::{Grammar, LanguagePack, QueryCategory};

const CLASSES: &str = r#"
(class_definition
  name: (identifier) @name) @class
"#;

const METHODS: &str = r#"
(function_definition
  name: (identifier) @name) @method
"#;

// Class-level attributes only; instance attributes live inside methods.
const PROPERTIES: &str = r#"
(class_definition
  body: (block
    (expression_statement
      (assignment
        left: (identifier) @name)) @property))
"#;

// `with name(...)` context blocks, which is how pytest-style suites group code.
const BLOCKS: &str = r#"
(with_statement
  (with_clause
    (with_item
      value: (call
        function: (identifier) @callee
        arguments: (argument_list . (string) @name))))) @block
"#;

pub fn pack() -> LanguagePack {
    LanguagePack::new("python", Grammar::Python)
        .with_extensions(["py", "pyi", "pyw"])
        .with_query(QueryCategory::Classes, CLASSES)
        .with_query(QueryCategory::Methods, METHODS)
        .with_query(QueryCategory::Properties, PROPERTIES)
        .with_query(QueryCategory::Blocks, BLOCKS)
        .with_kinds([
            ("class_definition", NormalizedKind::Class),
            ("function_definition", NormalizedKind::Function),
            ("with_statement", NormalizedKind::Block),
            ("block", NormalizedKind::Body),
        ])
        .with_body_rules([
            ("class_definition", vec![BodyRule::field("body")]),
            ("function_definition", vec![BodyRule::field("body")]),
            ("decorated_definition", vec![BodyRule::FunctionBody]),
            ("with_statement", vec![BodyRule::field("body")]),
            ("block", vec![BodyRule::SelfNode]),
            ("module", vec![BodyRule::SelfNode]),
        ])
        .with_string_unwrap("string_content")
}
