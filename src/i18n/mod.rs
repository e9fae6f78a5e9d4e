//! Internationalization (i18n) lookup core.
//!
//! # Architecture
//!
//! - `source`: Resource sources that supply JSON translation documents
//! - `store`: Concurrency-safe key→language→value table, rebuilt from sources
//! - `resolver`: The `Translator` capability and its default-language fallback
//! - `logging`: Logging decorator over any `Translator`
//! - `accept_language`: Weighted language preference list parsing
//! - `metrics`: Per-resolver lookup statistics
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use translation_resolver::i18n::{
//!     AcceptLanguage, MemorySource, TranslationResolver, TranslationStore, Translator,
//! };
//!
//! let source = MemorySource::new("embedded")
//!     .with_document("greeting.json", r#"{"hello": {"en": "hello", "de": "hallo"}}"#);
//! let (store, _report) = TranslationStore::load(vec![Box::new(source)]);
//!
//! let resolver = TranslationResolver::new(Arc::new(store)).with_default_language("en");
//! assert_eq!(resolver.get_by_language("hello", "es").unwrap(), "hello");
//!
//! let preference = AcceptLanguage::parse("fr, de;q=0.8").unwrap();
//! assert_eq!(resolver.get_preferred("hello", &preference).unwrap(), "hallo");
//! ```

mod accept_language;
mod logging;
mod metrics;
mod resolver;
mod source;
mod store;

pub use accept_language::{AcceptLanguage, AcceptedLanguages, LanguageQuality, DEFAULT_QUALITY};
pub use logging::LoggingTranslator;
pub use metrics::{LookupMetrics, MetricsReport};
pub use resolver::{TranslationResolver, Translator};
pub use source::{
    DirectorySource, Document, FileDocument, MemoryDocument, MemorySource, ResourceSource,
};
pub use store::{RebuildReport, TableSnapshot, TranslationStore, TranslationTable, ValueSet};
