//! Error types for lookups, preference parsing and resource loading.

use thiserror::Error;

/// Errors returned synchronously by lookups and preference parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `get` was called before a current language was configured
    #[error("language is not set")]
    LanguageNotSet,

    /// The key is absent from the translation table
    #[error("could not find mapping for key ({key})")]
    KeyNotFound { key: String },

    /// The key exists but neither the requested nor the default language has a value
    #[error("{}", value_not_found_message(.key, .language, .default_language.as_deref()))]
    ValueNotFound {
        key: String,
        language: String,
        default_language: Option<String>,
    },

    /// The weighted language list could not be parsed
    #[error("malformed language preference list \"{input}\": {reason}")]
    MalformedPreferenceList { input: String, reason: String },
}

fn value_not_found_message(key: &str, language: &str, default_language: Option<&str>) -> String {
    match default_language {
        Some(default) => format!(
            "did not find value for key ({}) in language ({}) and default language ({})",
            key, language, default
        ),
        None => format!(
            "did not find value for key ({}) in language ({}); no default language set",
            key, language
        ),
    }
}

/// Convenience alias used by the lookup and parsing APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// A per-document or per-source failure during a rebuild.
///
/// These never abort a rebuild. They are logged and collected in the
/// [`RebuildReport`](crate::i18n::RebuildReport).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("could not open resource {document}: {source}")]
    Io {
        document: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode resource {document}: {source}")]
    Decode {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not refresh source {source_name}: {reason}")]
    Refresh { source_name: String, reason: String },
}

impl SourceError {
    /// Name of the document or source the failure belongs to.
    pub fn origin(&self) -> &str {
        match self {
            SourceError::Io { document, .. } | SourceError::Decode { document, .. } => document,
            SourceError::Refresh { source_name, .. } => source_name,
        }
    }
}
