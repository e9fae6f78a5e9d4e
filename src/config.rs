use crate::i18n::{DirectorySource, ResourceSource};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Sources
    pub translations_dirs: Vec<PathBuf>,
    pub file_extension: String,

    // Languages
    pub default_language: Option<String>,
    pub language: Option<String>,
    pub accept_language: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Sources - comma-separated directories, merged in the given order
        let dirs = lookup("TRANSLATIONS_DIRS").context("TRANSLATIONS_DIRS not set")?;
        let translations_dirs: Vec<PathBuf> = dirs
            .split(',')
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .collect();
        if translations_dirs.is_empty() {
            bail!("TRANSLATIONS_DIRS does not name any directory");
        }

        Ok(Self {
            translations_dirs,
            file_extension: lookup("TRANSLATION_FILE_EXTENSION")
                .filter(|ext| !ext.trim().is_empty())
                .unwrap_or_else(|| "json".to_string()),

            // Languages - an empty DEFAULT_LANGUAGE disables the fallback
            default_language: match lookup("DEFAULT_LANGUAGE") {
                Some(lang) => non_empty(lang),
                None => Some("en".to_string()),
            },
            language: lookup("LANGUAGE").and_then(non_empty),
            accept_language: lookup("ACCEPT_LANGUAGE").and_then(non_empty),
        })
    }

    /// One directory source per configured directory, in order.
    pub fn sources(&self) -> Vec<Box<dyn ResourceSource>> {
        self.translations_dirs
            .iter()
            .map(|dir| {
                Box::new(DirectorySource::with_extension(
                    dir.clone(),
                    self.file_extension.clone(),
                )) as Box<dyn ResourceSource>
            })
            .collect()
    }
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
