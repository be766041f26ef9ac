use crate::lang::errors::PackError;
use crate::lang::pack::LanguagePack;
use crate::lang::packs;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

static BUILTIN: Lazy<LanguagePackRegistry> =
    Lazy::new(|| LanguagePackRegistry::from_packs(packs::builtin()));

/// Lookup table from language names and file extensions to packs.
///
/// A registry is immutable once built; the built-in one is initialized on
/// first use and shared by every thread.
#[derive(Debug, Clone, Default)]
pub struct LanguagePackRegistry {
    packs: BTreeMap<String, Arc<LanguagePack>>,
    aliases: HashMap<String, String>,
}

impl LanguagePackRegistry {
    /// The process-wide registry of built-in packs.
    pub fn builtin() -> &'static LanguagePackRegistry {
        &BUILTIN
    }

    /// Build a registry from packs. Later packs replace earlier ones with the
    /// same language id, and later extension aliases win.
    pub fn from_packs(packs: impl IntoIterator<Item = LanguagePack>) -> Self {
        let mut registry = Self::default();
        for pack in packs {
            registry.insert(pack);
        }
        registry
    }

    /// Copy of this registry with `packs` merged over it.
    pub fn with_packs(&self, packs: impl IntoIterator<Item = LanguagePack>) -> Self {
        let mut registry = self.clone();
        for pack in packs {
            registry.insert(pack);
        }
        registry
    }

    fn insert(&mut self, pack: LanguagePack) {
        for ext in &pack.extensions {
            self.aliases.insert(ext.clone(), pack.language.clone());
        }
        self.packs.insert(pack.language.clone(), Arc::new(pack));
    }

    /// Look up a pack by language name or file extension, case-insensitively.
    pub fn get(&self, language_or_extension: &str) -> Result<Arc<LanguagePack>, PackError> {
        let key = normalize(language_or_extension);
        let language = self.aliases.get(&key).unwrap_or(&key);

        self.packs
            .get(language)
            .or_else(|| self.packs.get(&key))
            .cloned()
            .ok_or_else(|| PackError::UnsupportedLanguage {
                language: language_or_extension.to_string(),
            })
    }

    /// Look up a pack from a file path's extension.
    pub fn for_path(&self, path: &Path) -> Result<Arc<LanguagePack>, PackError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| PackError::UnsupportedLanguage {
                language: path.display().to_string(),
            })?;
        self.get(ext)
    }

    /// Canonical language ids, sorted.
    pub fn languages(&self) -> Vec<&str> {
        self.packs.keys().map(String::as_str).collect()
    }

    pub fn packs(&self) -> impl Iterator<Item = &Arc<LanguagePack>> {
        self.packs.values()
    }
}

fn normalize(name: &str) -> String {
    name.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::pack::Grammar;

    #[test]
    fn extension_aliases_resolve() {
        let registry = LanguagePackRegistry::builtin();
        assert_eq!(registry.get("ts").unwrap().language, "typescript");
        assert_eq!(registry.get("py").unwrap().language, "python");
        assert_eq!(registry.get(".js").unwrap().language, "javascript");
        assert_eq!(registry.get("jsx").unwrap().language, "javascript");
        assert_eq!(registry.get("tsx").unwrap().language, "tsx");
        assert_eq!(registry.get("rs").unwrap().language, "rust");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = LanguagePackRegistry::builtin();
        assert_eq!(registry.get("TypeScript").unwrap().language, "typescript");
        assert_eq!(registry.get("PY").unwrap().language, "python");
    }

    #[test]
    fn unknown_language_is_reported() {
        let registry = LanguagePackRegistry::builtin();
        let err = registry.get("cobol").unwrap_err();
        assert_eq!(
            err,
            PackError::UnsupportedLanguage {
                language: "cobol".to_string()
            }
        );
    }

    #[test]
    fn for_path_uses_extension() {
        let registry = LanguagePackRegistry::builtin();
        let pack = registry.for_path(Path::new("src/app.test.ts")).unwrap();
        assert_eq!(pack.grammar, Grammar::TypeScript);
        assert!(registry.for_path(Path::new("Makefile")).is_err());
    }

    #[test]
    fn with_packs_overrides_without_touching_builtin() {
        let custom = LanguagePack::new("python", Grammar::Python).with_extensions(["py"]);
        let registry = LanguagePackRegistry::builtin().with_packs([custom]);

        assert!(registry.get("python").unwrap().queries.is_empty());
        assert!(!LanguagePackRegistry::builtin()
            .get("python")
            .unwrap()
            .queries
            .is_empty());
    }

    #[test]
    fn builtin_languages_listed() {
        let languages = LanguagePackRegistry::builtin().languages();
        assert_eq!(
            languages,
            vec!["javascript", "python", "rust", "tsx", "typescript"]
        );
    }
}
