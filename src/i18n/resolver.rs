//! Translation resolver: default-language fallback over a [`TranslationStore`].
//!
//! Lookups follow a strict two-level chain:
//!
//! 1. the requested language, if the key has a value for it;
//! 2. otherwise the default language, if one is configured and has a value;
//! 3. otherwise `Error::ValueNotFound`.
//!
//! There is no fuzzy matching: `"en-gb"` does not fall back to `"en"`.

use crate::error::{Error, Result};
use crate::i18n::accept_language::AcceptLanguage;
use crate::i18n::metrics::LookupMetrics;
use crate::i18n::store::{RebuildReport, TranslationStore, ValueSet};
use std::sync::{Arc, PoisonError, RwLock};

/// The full lookup capability: key resolution plus session languages.
///
/// Implemented by [`TranslationResolver`] and by decorators such as
/// [`LoggingTranslator`](crate::i18n::LoggingTranslator).
pub trait Translator {
    /// Resolve `key` in the current language.
    ///
    /// # Errors
    /// `LanguageNotSet` when no current language is configured, otherwise the
    /// same errors as [`get_by_language`](Self::get_by_language).
    fn get(&self, key: &str) -> Result<String>;

    /// Resolve `key` in an explicit language, ignoring the current language.
    fn get_by_language(&self, key: &str, language: &str) -> Result<String>;

    /// Every translation of `key`.
    fn get_all(&self, key: &str) -> Result<ValueSet>;

    /// Resolve `key` for a weighted preference list.
    ///
    /// Accepted languages are tried for an exact match in priority order;
    /// when none matches, the default-language fallback applies.
    fn get_preferred(&self, key: &str, preference: &AcceptLanguage) -> Result<String>;

    fn language(&self) -> Option<String>;

    /// Set the current language. An empty string clears it.
    fn set_language(&self, language: &str);

    fn clear_language(&self);

    fn default_language(&self) -> Option<String>;

    /// Set the default language. An empty string clears it.
    fn set_default_language(&self, language: &str);

    fn clear_default_language(&self);
}

/// Current and default language, always read and written as a pair.
#[derive(Debug, Clone, Default)]
struct Languages {
    current: Option<String>,
    default: Option<String>,
}

/// How a successful lookup was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Exact,
    Default,
}

/// Default [`Translator`] backed by a shared [`TranslationStore`].
#[derive(Debug)]
pub struct TranslationResolver {
    store: Arc<TranslationStore>,
    languages: RwLock<Languages>,
    metrics: LookupMetrics,
}

impl TranslationResolver {
    /// Create a resolver with no current or default language.
    pub fn new(store: Arc<TranslationStore>) -> Self {
        Self {
            store,
            languages: RwLock::new(Languages::default()),
            metrics: LookupMetrics::new(),
        }
    }

    /// Set the current language (builder style).
    pub fn with_language(self, language: &str) -> Self {
        self.set_language(language);
        self
    }

    /// Set the default language (builder style).
    pub fn with_default_language(self, language: &str) -> Self {
        self.set_default_language(language);
        self
    }

    pub fn store(&self) -> &Arc<TranslationStore> {
        &self.store
    }

    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }

    /// Rebuild the underlying store.
    pub fn rebuild(&self) -> RebuildReport {
        self.store.rebuild()
    }

    fn languages(&self) -> Languages {
        self.languages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update_languages(&self, update: impl FnOnce(&mut Languages)) {
        let mut languages = self.languages.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut languages);
    }

    fn resolve<'a>(
        &self,
        key: &str,
        candidates: impl IntoIterator<Item = &'a str>,
        requested: &str,
        default_language: Option<&str>,
    ) -> Result<String> {
        let snapshot = self.store.snapshot();
        let result = snapshot
            .get(key)
            .ok_or_else(|| Error::KeyNotFound {
                key: key.to_string(),
            })
            .and_then(|values| pick(key, values, candidates, requested, default_language));

        match result {
            Ok((value, Resolution::Exact)) => {
                self.metrics.record_exact_hit();
                Ok(value)
            }
            Ok((value, Resolution::Default)) => {
                self.metrics.record_default_fallback();
                Ok(value)
            }
            Err(e) => {
                self.metrics.record_miss();
                Err(e)
            }
        }
    }
}

/// Apply the fallback chain to one key's value set.
fn pick<'a>(
    key: &str,
    values: &ValueSet,
    candidates: impl IntoIterator<Item = &'a str>,
    requested: &str,
    default_language: Option<&str>,
) -> Result<(String, Resolution)> {
    for language in candidates {
        if let Some(value) = values.get(language) {
            return Ok((value.clone(), Resolution::Exact));
        }
    }

    match default_language {
        Some(default) => values
            .get(default)
            .map(|value| (value.clone(), Resolution::Default))
            .ok_or_else(|| Error::ValueNotFound {
                key: key.to_string(),
                language: requested.to_string(),
                default_language: Some(default.to_string()),
            }),
        None => Err(Error::ValueNotFound {
            key: key.to_string(),
            language: requested.to_string(),
            default_language: None,
        }),
    }
}

fn non_empty(language: &str) -> Option<String> {
    (!language.is_empty()).then(|| language.to_string())
}

impl Translator for TranslationResolver {
    fn get(&self, key: &str) -> Result<String> {
        let languages = self.languages();
        let Some(current) = languages.current.as_deref() else {
            self.metrics.record_miss();
            return Err(Error::LanguageNotSet);
        };
        self.resolve(key, [current], current, languages.default.as_deref())
    }

    fn get_by_language(&self, key: &str, language: &str) -> Result<String> {
        let languages = self.languages();
        self.resolve(key, [language], language, languages.default.as_deref())
    }

    fn get_all(&self, key: &str) -> Result<ValueSet> {
        self.store.lookup_all(key)
    }

    fn get_preferred(&self, key: &str, preference: &AcceptLanguage) -> Result<String> {
        let languages = self.languages();
        self.resolve(
            key,
            preference.accepted_languages(),
            preference.as_str(),
            languages.default.as_deref(),
        )
    }

    fn language(&self) -> Option<String> {
        self.languages().current
    }

    fn set_language(&self, language: &str) {
        self.update_languages(|languages| languages.current = non_empty(language));
    }

    fn clear_language(&self) {
        self.update_languages(|languages| languages.current = None);
    }

    fn default_language(&self) -> Option<String> {
        self.languages().default
    }

    fn set_default_language(&self, language: &str) {
        self.update_languages(|languages| languages.default = non_empty(language));
    }

    fn clear_default_language(&self) {
        self.update_languages(|languages| languages.default = None);
    }
}
