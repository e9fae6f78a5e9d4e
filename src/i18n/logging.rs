//! Logging decorator for any [`Translator`].

use crate::error::Result;
use crate::i18n::accept_language::AcceptLanguage;
use crate::i18n::resolver::Translator;
use crate::i18n::store::ValueSet;
use tracing::{debug, warn};

/// Wraps a translator and logs every failed lookup at `warn`.
///
/// Also adds `*_or_key` helpers for display code that must always render
/// something: on failure they log and return the key itself.
#[derive(Debug, Clone)]
pub struct LoggingTranslator<T> {
    inner: T,
}

impl<T: Translator> LoggingTranslator<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    /// [`Translator::get`], or the key itself when the lookup fails.
    pub fn get_or_key(&self, key: &str) -> String {
        self.get(key).unwrap_or_else(|_| key.to_string())
    }

    /// [`Translator::get_by_language`], or the key itself when the lookup fails.
    pub fn get_by_language_or_key(&self, key: &str, language: &str) -> String {
        self.get_by_language(key, language)
            .unwrap_or_else(|_| key.to_string())
    }

    /// [`Translator::get_preferred`], or the key itself when the lookup fails.
    pub fn get_preferred_or_key(&self, key: &str, preference: &AcceptLanguage) -> String {
        self.get_preferred(key, preference)
            .unwrap_or_else(|_| key.to_string())
    }
}

fn logged<V>(operation: &str, key: &str, result: Result<V>) -> Result<V> {
    if let Err(e) = &result {
        warn!("{} failed for key {}: {}", operation, key, e);
    }
    result
}

impl<T: Translator> Translator for LoggingTranslator<T> {
    fn get(&self, key: &str) -> Result<String> {
        logged("get", key, self.inner.get(key))
    }

    fn get_by_language(&self, key: &str, language: &str) -> Result<String> {
        logged(
            "get_by_language",
            key,
            self.inner.get_by_language(key, language),
        )
    }

    fn get_all(&self, key: &str) -> Result<ValueSet> {
        logged("get_all", key, self.inner.get_all(key))
    }

    fn get_preferred(&self, key: &str, preference: &AcceptLanguage) -> Result<String> {
        logged(
            "get_preferred",
            key,
            self.inner.get_preferred(key, preference),
        )
    }

    fn language(&self) -> Option<String> {
        self.inner.language()
    }

    fn set_language(&self, language: &str) {
        debug!("Setting current language to {:?}", language);
        self.inner.set_language(language);
    }

    fn clear_language(&self) {
        debug!("Clearing current language");
        self.inner.clear_language();
    }

    fn default_language(&self) -> Option<String> {
        self.inner.default_language()
    }

    fn set_default_language(&self, language: &str) {
        debug!("Setting default language to {:?}", language);
        self.inner.set_default_language(language);
    }

    fn clear_default_language(&self) {
        debug!("Clearing default language");
        self.inner.clear_default_language();
    }
}

impl<T: Translator + ?Sized> Translator for &T {
    fn get(&self, key: &str) -> Result<String> {
        (**self).get(key)
    }

    fn get_by_language(&self, key: &str, language: &str) -> Result<String> {
        (**self).get_by_language(key, language)
    }

    fn get_all(&self, key: &str) -> Result<ValueSet> {
        (**self).get_all(key)
    }

    fn get_preferred(&self, key: &str, preference: &AcceptLanguage) -> Result<String> {
        (**self).get_preferred(key, preference)
    }

    fn language(&self) -> Option<String> {
        (**self).language()
    }

    fn set_language(&self, language: &str) {
        (**self).set_language(language)
    }

    fn clear_language(&self) {
        (**self).clear_language()
    }

    fn default_language(&self) -> Option<String> {
        (**self).default_language()
    }

    fn set_default_language(&self, language: &str) {
        (**self).set_default_language(language)
    }

    fn clear_default_language(&self) {
        (**self).clear_default_language()
    }
}
