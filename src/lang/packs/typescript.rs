use crate::lang::kind::{BodyRule, NormalizedKind};
use crate::lang::pack::{Grammar, LanguagePack, QueryCategory};
use crate::lang::packs::javascript;

const CLASSES: &str = r#"
(class_declaration
  name: (_) @name) @class

(abstract_class_declaration
  name: (_) @name) @class

(interface_declaration
  name: (_) @name) @class

(enum_declaration
  name: (_) @name) @class
"#;

const EXTRA_METHODS: &str = r#"
(method_signature
  name: (_) @name) @method

(abstract_method_signature
  name: (_) @name) @method

(function_signature
  name: (identifier) @name) @method
"#;

const PROPERTIES: &str = r#"
(public_field_definition
  name: (_) @name) @property

(property_signature
  name: (_) @name) @property
"#;

/// TypeScript: the JavaScript pack with type-level constructs merged in.
pub fn pack() -> LanguagePack {
    let base = javascript::pack();
    let methods = format!("{}\n{}", base.queries.methods, EXTRA_METHODS);

    base.derive("typescript", Grammar::TypeScript)
        .with_extensions(["ts", "mts", "cts"])
        .with_query(QueryCategory::Classes, CLASSES)
        .with_query(QueryCategory::Methods, methods)
        .with_query(QueryCategory::Properties, PROPERTIES)
        .with_kinds([
            ("abstract_class_declaration", NormalizedKind::Class),
            ("interface_declaration", NormalizedKind::Interface),
            ("enum_declaration", NormalizedKind::Class),
            ("method_signature", NormalizedKind::Method),
            ("abstract_method_signature", NormalizedKind::Method),
            ("function_signature", NormalizedKind::Function),
            ("public_field_definition", NormalizedKind::Property),
            ("property_signature", NormalizedKind::Property),
            ("interface_body", NormalizedKind::Body),
            ("object_type", NormalizedKind::Body),
            ("enum_body", NormalizedKind::Body),
        ])
        .with_body_rules([
            ("abstract_class_declaration", vec![BodyRule::field("body")]),
            ("interface_declaration", vec![BodyRule::field("body")]),
            ("enum_declaration", vec![BodyRule::field("body")]),
            ("interface_body", vec![BodyRule::SelfNode]),
            ("object_type", vec![BodyRule::SelfNode]),
            ("enum_body", vec![BodyRule::SelfNode]),
        ])
}

/// TSX shares every TypeScript rule; only the grammar differs.
pub fn tsx_pack() -> LanguagePack {
    pack().derive("tsx", Grammar::Tsx).with_extensions(["tsx"])
}
