use crate::lang::kind::{BodyRule, NormalizedKind};
use crate::lang::pack::{Grammar, LanguagePack, QueryCategory};

const CLASSES: &str = r#"
(class_declaration
  name: (_) @name) @class
"#;

const METHODS: &str = r#"
(method_definition
  name: (_) @name) @method

(function_declaration
  name: (identifier) @name) @method

(generator_function_declaration
  name: (identifier) @name) @method

(lexical_declaration
  (variable_declarator
    name: (identifier) @name
    value: [(arrow_function) (function_expression)])) @method
"#;

const PROPERTIES: &str = r#"
(field_definition
  property: (_) @name) @property
"#;

// `describe("name", fn)` style calls, plus parameterless `beforeEach(fn)`.
// A labeled call needs a second argument, so `require("fs")` is not a block.
// The callback may be a function literal or a reference to one; without a
// label only literals count, or every `f(x)` would be a block.
const BLOCKS: &str = r#"
(call_expression
  function: (identifier) @callee
  arguments: (arguments
    . [(string) (template_string)] @name
    [(arrow_function) (function_expression) (identifier) (member_expression)])) @block

(call_expression
  function: (identifier) @callee
  arguments: (arguments . [(arrow_function) (function_expression)])) @block
"#;

/// Pack for JavaScript (and JSX, which the JavaScript grammar covers).
pub fn pack() -> LanguagePack {
    LanguagePack::new("javascript", Grammar::JavaScript)
        .with_extensions(["js", "mjs", "cjs", "jsx"])
        .with_query(QueryCategory::Classes, CLASSES)
        .with_query(QueryCategory::Methods, METHODS)
        .with_query(QueryCategory::Properties, PROPERTIES)
        .with_query(QueryCategory::Blocks, BLOCKS)
        .with_kinds([
            ("class_declaration", NormalizedKind::Class),
            ("method_definition", NormalizedKind::Method),
            ("function_declaration", NormalizedKind::Function),
            ("generator_function_declaration", NormalizedKind::Function),
            ("field_definition", NormalizedKind::Property),
            ("call_expression", NormalizedKind::Block),
            ("class_body", NormalizedKind::Body),
            ("statement_block", NormalizedKind::Body),
        ])
        .with_body_rules([
            ("class_declaration", vec![BodyRule::field("body")]),
            ("class", vec![BodyRule::field("body")]),
            ("method_definition", vec![BodyRule::field("body")]),
            ("function_declaration", vec![BodyRule::field("body")]),
            ("generator_function_declaration", vec![BodyRule::field("body")]),
            ("function_expression", vec![BodyRule::field("body")]),
            ("arrow_function", vec![BodyRule::FunctionBody]),
            ("lexical_declaration", vec![BodyRule::FunctionBody]),
            ("call_expression", vec![BodyRule::CallCallbackBody]),
            ("class_body", vec![BodyRule::SelfNode]),
            ("statement_block", vec![BodyRule::SelfNode]),
            ("program", vec![BodyRule::SelfNode]),
        ])
        .with_string_unwrap("string_fragment")
        .with_indent_unit("  ")
}
