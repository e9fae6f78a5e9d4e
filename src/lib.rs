//! Localized string resolution.
//!
//! Builds a key→language→value table from JSON translation documents and
//! resolves keys with a default-language fallback. Also parses weighted
//! language preference lists (`Accept-Language` style) so callers can pick
//! which language to ask for.

pub mod config;
pub mod error;
pub mod i18n;

pub use error::{Error, Result, SourceError};
