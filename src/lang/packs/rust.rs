use crate::lang::kind::{BodyRule, NormalizedKind};
use crate::lang::pack::{Grammar, LanguagePack, QueryCategory};

// `impl Foo` blocks count as classes so that `Foo.method` finds methods
// declared in an impl for `Foo`.
const CLASSES: &str = r#"
(struct_item
  name: (type_identifier) @name) @class

(enum_item
  name: (type_identifier) @name) @class

(trait_item
  name: (type_identifier) @name) @class

(impl_item
  type: (type_identifier) @name) @class

(impl_item
  type: (generic_type
    type: (type_identifier) @name)) @class
"#;

const METHODS: &str = r#"
(function_item
  name: (identifier) @name) @method

(function_signature_item
  name: (identifier) @name) @method
"#;

const PROPERTIES: &str = r#"
(field_declaration
  name: (field_identifier) @name) @property

(enum_variant
  name: (identifier) @name) @property
"#;

// Rust has no call-with-callback grouping idiom.
const BLOCKS: &str = "";

pub fn pack() -> LanguagePack {
    LanguagePack::new("rust", Grammar::Rust)
        .with_extensions(["rs"])
        .with_query(QueryCategory::Classes, CLASSES)
        .with_query(QueryCategory::Methods, METHODS)
        .with_query(QueryCategory::Properties, PROPERTIES)
        .with_query(QueryCategory::Blocks, BLOCKS)
        .with_kinds([
            ("struct_item", NormalizedKind::Class),
            ("enum_item", NormalizedKind::Class),
            ("impl_item", NormalizedKind::Class),
            ("trait_item", NormalizedKind::Interface),
            ("function_item", NormalizedKind::Function),
            ("function_signature_item", NormalizedKind::Function),
            ("field_declaration", NormalizedKind::Property),
            ("enum_variant", NormalizedKind::Property),
            ("declaration_list", NormalizedKind::Body),
            ("field_declaration_list", NormalizedKind::Body),
            ("enum_variant_list", NormalizedKind::Body),
            ("block", NormalizedKind::Body),
        ])
        .with_body_rules([
            ("struct_item", vec![BodyRule::field("body")]),
            ("enum_item", vec![BodyRule::field("body")]),
            ("impl_item", vec![BodyRule::field("body")]),
            ("trait_item", vec![BodyRule::field("body")]),
            ("function_item", vec![BodyRule::field("body")]),
            ("mod_item", vec![BodyRule::field("body")]),
            ("declaration_list", vec![BodyRule::SelfNode]),
            ("field_declaration_list", vec![BodyRule::SelfNode]),
            ("enum_variant_list", vec![BodyRule::SelfNode]),
            ("block", vec![BodyRule::SelfNode]),
        ])
        .with_string_unwrap("string_content")
}
