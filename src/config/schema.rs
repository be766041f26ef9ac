use crate::lang::{
    BodyRule, Grammar, LanguagePack, LanguagePackRegistry, NormalizedKind, PackError,
    QueryCategory,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// A TOML file of extra or overriding language packs.
///
/// ```toml
/// [meta]
/// name = "team packs"
///
/// [[packs]]
/// language = "gjs"
/// extends = "javascript"
/// extensions = ["gjs"]
///
/// [packs.kind_map]
/// glimmer_template = "body"
/// ```
#[derive(Debug, Deserialize, Default, Clone)]
pub struct PackConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub packs: Vec<PackDefinition>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PackDefinition {
    pub language: String,
    /// Existing pack to copy before applying this definition's keys.
    pub extends: Option<String>,
    /// Required unless `extends` is given.
    pub grammar: Option<Grammar>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub queries: QueryOverrides,
    #[serde(default)]
    pub kind_map: BTreeMap<String, NormalizedKind>,
    #[serde(default)]
    pub body_map: BTreeMap<String, Vec<BodyRule>>,
    pub string_unwrap: Option<String>,
    pub indent_unit: Option<String>,
}

/// Per-category query replacements; absent categories keep the base query.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct QueryOverrides {
    pub classes: Option<String>,
    pub methods: Option<String>,
    pub properties: Option<String>,
    pub blocks: Option<String>,
}

impl QueryOverrides {
    fn get(&self, category: QueryCategory) -> Option<&str> {
        match category {
            QueryCategory::Classes => self.classes.as_deref(),
            QueryCategory::Methods => self.methods.as_deref(),
            QueryCategory::Properties => self.properties.as_deref(),
            QueryCategory::Blocks => self.blocks.as_deref(),
        }
    }

    fn any_non_empty(&self) -> bool {
        QueryCategory::ALL
            .iter()
            .any(|c| self.get(*c).is_some_and(|q| !q.trim().is_empty()))
    }
}

impl PackConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.packs.is_empty() {
            issues.push(ValidationIssue::EmptyPackList);
        }

        for pack in &self.packs {
            let id = || {
                let trimmed = pack.language.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            };

            if pack.language.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    language: None,
                    field: "language",
                });
            }

            if pack.extends.is_none() {
                if pack.grammar.is_none() {
                    issues.push(ValidationIssue::MissingField {
                        language: id(),
                        field: "grammar",
                    });
                }
                if !pack.queries.any_non_empty() {
                    issues.push(ValidationIssue::InvalidCombo {
                        language: id(),
                        message: "a pack without 'extends' must define at least one query"
                            .to_string(),
                    });
                }
            }

            for (raw, rules) in &pack.body_map {
                if rules.is_empty() {
                    issues.push(ValidationIssue::InvalidCombo {
                        language: id(),
                        message: format!("body_map.{raw} has no rules"),
                    });
                }
            }

            if let Some(unit) = &pack.indent_unit {
                if unit.is_empty() || !unit.chars().all(|c| c == ' ' || c == '\t') {
                    issues.push(ValidationIssue::InvalidCombo {
                        language: id(),
                        message: "indent_unit must be spaces or tabs".to_string(),
                    });
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Build packs, resolving `extends` against packs defined earlier in
    /// this file first and then against `base`.
    pub fn build_packs(&self, base: &LanguagePackRegistry) -> Result<Vec<LanguagePack>, PackError> {
        let mut built: Vec<LanguagePack> = Vec::with_capacity(self.packs.len());

        for def in &self.packs {
            let language = def.language.trim().to_lowercase();

            let start = match &def.extends {
                Some(parent) => {
                    let key = parent.trim().to_lowercase();
                    let parent_pack = match built.iter().rev().find(|p| p.language == key) {
                        Some(pack) => pack.clone(),
                        None => base
                            .get(&key)
                            .map(|pack| (*pack).clone())
                            .map_err(|_| PackError::UnknownBase {
                                language: language.clone(),
                                base: parent.clone(),
                            })?,
                    };
                    let grammar = def.grammar.unwrap_or(parent_pack.grammar);
                    parent_pack.derive(&language, grammar)
                }
                None => match def.grammar {
                    Some(grammar) => LanguagePack::new(&language, grammar),
                    None => {
                        return Err(PackError::UnsupportedLanguage {
                            language: language.clone(),
                        })
                    }
                },
            };

            let mut pack = start
                .with_extensions(def.extensions.iter().cloned())
                .with_kinds(def.kind_map.iter().map(|(raw, kind)| (raw.as_str(), *kind)))
                .with_body_rules(
                    def.body_map
                        .iter()
                        .map(|(raw, rules)| (raw.as_str(), rules.clone())),
                );

            for category in QueryCategory::ALL {
                if let Some(query) = def.queries.get(category) {
                    pack = pack.with_query(category, query);
                }
            }
            if let Some(child) = &def.string_unwrap {
                pack = pack.with_string_unwrap(child);
            }
            if let Some(unit) = &def.indent_unit {
                pack = pack.with_indent_unit(unit);
            }

            tracing::debug!(
                language = %pack.language,
                grammar = %pack.grammar,
                extends = def.extends.as_deref().unwrap_or("-"),
                "built language pack from config"
            );
            built.push(pack);
        }

        Ok(built)
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyPackList,
    MissingField {
        language: Option<String>,
        field: &'static str,
    },
    InvalidCombo {
        language: Option<String>,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyPackList => write!(f, "pack config contains no packs"),
            ValidationIssue::MissingField { language, field } => match language {
                Some(lang) => write!(f, "pack '{lang}' missing required field '{field}'"),
                None => write!(f, "pack missing required field '{field}'"),
            },
            ValidationIssue::InvalidCombo { language, message } => match language {
                Some(lang) => write!(f, "pack '{lang}' has invalid configuration: {message}"),
                None => write!(f, "invalid pack configuration: {message}"),
            },
        }
    }
}
