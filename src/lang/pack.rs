use crate::lang::kind::{BodyRule, NormalizedKind};
use ast_grep_language::{LanguageExt, SupportLang};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Grammar a language pack parses with.
///
/// Grammars come from `ast-grep-language`, which pins the tree-sitter
/// version all of them are built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    Bash,
    C,
    Cpp,
    CSharp,
    Go,
    Java,
    JavaScript,
    Kotlin,
    Lua,
    Php,
    Python,
    Ruby,
    Rust,
    Scala,
    Swift,
    Tsx,
    TypeScript,
}

impl Grammar {
    pub fn support_lang(self) -> SupportLang {
        match self {
            Grammar::Bash => SupportLang::Bash,
            Grammar::C => SupportLang::C,
            Grammar::Cpp => SupportLang::Cpp,
            Grammar::CSharp => SupportLang::CSharp,
            Grammar::Go => SupportLang::Go,
            Grammar::Java => SupportLang::Java,
            Grammar::JavaScript => SupportLang::JavaScript,
            Grammar::Kotlin => SupportLang::Kotlin,
            Grammar::Lua => SupportLang::Lua,
            Grammar::Php => SupportLang::Php,
            Grammar::Python => SupportLang::Python,
            Grammar::Ruby => SupportLang::Ruby,
            Grammar::Rust => SupportLang::Rust,
            Grammar::Scala => SupportLang::Scala,
            Grammar::Swift => SupportLang::Swift,
            Grammar::Tsx => SupportLang::Tsx,
            Grammar::TypeScript => SupportLang::TypeScript,
        }
    }

    /// The tree-sitter language object for this grammar.
    pub fn ts_language(self) -> tree_sitter::Language {
        self.support_lang().get_ts_language()
    }
}

impl Grammar {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grammar::Bash => "bash",
            Grammar::C => "c",
            Grammar::Cpp => "cpp",
            Grammar::CSharp => "csharp",
            Grammar::Go => "go",
            Grammar::Java => "java",
            Grammar::JavaScript => "javascript",
            Grammar::Kotlin => "kotlin",
            Grammar::Lua => "lua",
            Grammar::Php => "php",
            Grammar::Python => "python",
            Grammar::Ruby => "ruby",
            Grammar::Rust => "rust",
            Grammar::Scala => "scala",
            Grammar::Swift => "swift",
            Grammar::Tsx => "tsx",
            Grammar::TypeScript => "typescript",
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four query families a pack provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryCategory {
    Classes,
    Methods,
    Properties,
    Blocks,
}

impl QueryCategory {
    pub const ALL: [QueryCategory; 4] = [
        QueryCategory::Classes,
        QueryCategory::Methods,
        QueryCategory::Properties,
        QueryCategory::Blocks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryCategory::Classes => "classes",
            QueryCategory::Methods => "methods",
            QueryCategory::Properties => "properties",
            QueryCategory::Blocks => "blocks",
        }
    }
}

/// Query strings of a pack, one per [`QueryCategory`].
///
/// Capture conventions: `@name` holds the identifier (or string literal for
/// blocks), `@callee` the called function of a block, and any other capture
/// marks the matched construct itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackQueries {
    #[serde(default)]
    pub classes: String,
    #[serde(default)]
    pub methods: String,
    #[serde(default)]
    pub properties: String,
    #[serde(default)]
    pub blocks: String,
}

impl PackQueries {
    pub fn get(&self, category: QueryCategory) -> &str {
        match category {
            QueryCategory::Classes => &self.classes,
            QueryCategory::Methods => &self.methods,
            QueryCategory::Properties => &self.properties,
            QueryCategory::Blocks => &self.blocks,
        }
    }

    pub fn set(&mut self, category: QueryCategory, query: impl Into<String>) {
        let slot = match category {
            QueryCategory::Classes => &mut self.classes,
            QueryCategory::Methods => &mut self.methods,
            QueryCategory::Properties => &mut self.properties,
            QueryCategory::Blocks => &mut self.blocks,
        };
        *slot = query.into();
    }

    pub fn is_empty(&self) -> bool {
        QueryCategory::ALL
            .iter()
            .all(|category| self.get(*category).trim().is_empty())
    }
}

const DEFAULT_INDENT: &str = "    ";

/// Declarative per-language configuration.
///
/// Packs are plain data. A pack for a derived language is built by copying
/// a base pack with [`LanguagePack::derive`] and overriding keys; nothing is
/// inherited at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePack {
    /// Canonical lowercase language id (`typescript`, `python`, ...).
    pub language: String,
    pub grammar: Grammar,
    /// File extensions (without dot) that alias to this pack.
    pub extensions: Vec<String>,
    pub queries: PackQueries,
    /// Raw node type -> normalized kind.
    pub kind_map: BTreeMap<String, NormalizedKind>,
    /// Raw node type -> ordered body rules.
    pub body_map: BTreeMap<String, Vec<BodyRule>>,
    /// Raw type of the child that holds a string literal's contents, used
    /// when a literal cannot be unquoted symmetrically (`f"..."`).
    pub string_unwrap: Option<String>,
    /// One level of indentation for synthesized body members.
    pub indent_unit: String,
}

impl LanguagePack {
    pub fn new(language: impl Into<String>, grammar: Grammar) -> Self {
        Self {
            language: language.into().to_lowercase(),
            grammar,
            extensions: Vec::new(),
            queries: PackQueries::default(),
            kind_map: BTreeMap::new(),
            body_map: BTreeMap::new(),
            string_unwrap: None,
            indent_unit: DEFAULT_INDENT.to_string(),
        }
    }

    /// Copy this pack under a new language id and grammar.
    ///
    /// Queries, kind map, body map, unwrap hint and indentation carry over;
    /// extensions do not, since they identify the new language.
    pub fn derive(&self, language: impl Into<String>, grammar: Grammar) -> Self {
        Self {
            language: language.into().to_lowercase(),
            grammar,
            extensions: Vec::new(),
            ..self.clone()
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn with_query(mut self, category: QueryCategory, query: impl Into<String>) -> Self {
        self.queries.set(category, query);
        self
    }

    pub fn with_kinds<'a, I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, NormalizedKind)>,
    {
        for (raw, kind) in kinds {
            self.kind_map.insert(raw.to_string(), kind);
        }
        self
    }

    pub fn with_body_rules<'a, I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Vec<BodyRule>)>,
    {
        for (raw, list) in rules {
            self.body_map.insert(raw.to_string(), list);
        }
        self
    }

    pub fn with_string_unwrap(mut self, child_type: impl Into<String>) -> Self {
        self.string_unwrap = Some(child_type.into());
        self
    }

    pub fn with_indent_unit(mut self, unit: impl Into<String>) -> Self {
        self.indent_unit = unit.into();
        self
    }

    /// Normalize a raw node type; unmapped types become `Unknown`.
    pub fn kind_of(&self, raw_type: &str) -> NormalizedKind {
        self.kind_map
            .get(raw_type)
            .copied()
            .unwrap_or(NormalizedKind::Unknown)
    }

    /// Every raw type that normalizes to `kind`, in sorted order.
    pub fn raw_types_for(&self, kind: NormalizedKind) -> Vec<&str> {
        self.kind_map
            .iter()
            .filter(|(_, mapped)| **mapped == kind)
            .map(|(raw, _)| raw.as_str())
            .collect()
    }

    pub fn body_rules(&self, raw_type: &str) -> &[BodyRule] {
        self.body_map
            .get(raw_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> LanguagePack {
        LanguagePack::new("Base", Grammar::JavaScript)
            .with_extensions([".js"])
            .with_query(QueryCategory::Classes, "(class_declaration) @class")
            .with_kinds([("class_declaration", NormalizedKind::Class)])
            .with_body_rules([("class_declaration", vec![BodyRule::field("body")])])
    }

    #[test]
    fn derive_copies_data_but_not_extensions() {
        let derived = base()
            .derive("derived", Grammar::TypeScript)
            .with_kinds([("interface_declaration", NormalizedKind::Interface)]);

        assert_eq!(derived.language, "derived");
        assert!(derived.extensions.is_empty());
        assert_eq!(derived.queries.classes, "(class_declaration) @class");
        assert_eq!(derived.kind_of("class_declaration"), NormalizedKind::Class);
        assert_eq!(
            derived.kind_of("interface_declaration"),
            NormalizedKind::Interface
        );

        // The base is untouched by the merge.
        assert_eq!(base().kind_of("interface_declaration"), NormalizedKind::Unknown);
    }

    #[test]
    fn language_and_extensions_are_normalized() {
        let pack = base();
        assert_eq!(pack.language, "base");
        assert_eq!(pack.extensions, vec!["js".to_string()]);
    }

    #[test]
    fn unknown_raw_type_degrades() {
        let pack = base();
        assert_eq!(pack.kind_of("nonexistent"), NormalizedKind::Unknown);
        assert!(pack.body_rules("nonexistent").is_empty());
        assert_eq!(pack.raw_types_for(NormalizedKind::Class), vec!["class_declaration"]);
    }

    #[test]
    fn empty_queries_detected() {
        assert!(PackQueries::default().is_empty());
        assert!(!base().queries.is_empty());
    }
}
