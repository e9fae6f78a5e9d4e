//! Weighted language preference lists (`Accept-Language` style).
//!
//! Parses strings such as `"da, en-gb;q=0.8, en;q=0.7"` into an immutable
//! [`AcceptLanguage`] whose entries are ordered by descending quality. Entries
//! with equal quality keep their input order.

use crate::error::{Error, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Quality assumed when an entry has no `;q=` parameter.
pub const DEFAULT_QUALITY: f32 = 1.0;

static QUALITY_REGEX: OnceLock<Regex> = OnceLock::new();

/// One language tag with its quality weight.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageQuality {
    pub language: String,
    pub quality: f32,
}

/// A parsed weighted language list.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptLanguage {
    /// The unparsed input
    header_value: String,

    /// Entries ordered by descending quality; q=0 included
    entries: Vec<LanguageQuality>,
}

impl AcceptLanguage {
    /// Parse a comma-separated list of `tag` or `tag;q=<float>` entries.
    ///
    /// # Errors
    /// `Error::MalformedPreferenceList` if the input is blank, an entry has
    /// an empty tag or more than one parameter, the parameter is not `q=`,
    /// or the quality is not a number within `[0, 1]`.
    ///
    /// # Example
    /// ```
    /// use translation_resolver::i18n::AcceptLanguage;
    ///
    /// let header = AcceptLanguage::parse("en-gb;q=0.8, ru;q=0, da").unwrap();
    /// let languages: Vec<_> = header.accepted_languages().collect();
    /// assert_eq!(languages, vec!["da", "en-gb"]);
    /// ```
    pub fn parse(header_value: &str) -> Result<Self> {
        if header_value.trim().is_empty() {
            return Err(malformed(header_value, "value can not be empty"));
        }

        let mut entries = header_value
            .split(',')
            .map(|entry| parse_entry(header_value, entry))
            .collect::<Result<Vec<_>>>()?;

        // Vec::sort_by is stable, so equal qualities keep their input order
        entries.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));

        Ok(Self {
            header_value: header_value.to_string(),
            entries,
        })
    }

    /// Languages from most to least preferred, leaving out `q=0` entries.
    ///
    /// Every call starts a fresh iteration over the same parsed list.
    pub fn accepted_languages(&self) -> AcceptedLanguages<'_> {
        AcceptedLanguages {
            entries: self.entries.iter(),
        }
    }

    /// All entries, including `q=0`, ordered by descending quality.
    pub fn entries(&self) -> &[LanguageQuality] {
        &self.entries
    }

    /// Highest quality given to `language`, if it was listed.
    pub fn quality_of(&self, language: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|entry| entry.language == language)
            .map(|entry| entry.quality)
    }

    /// The original, unparsed input.
    pub fn as_str(&self) -> &str {
        &self.header_value
    }
}

impl FromStr for AcceptLanguage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for AcceptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header_value)
    }
}

/// Iterator returned by [`AcceptLanguage::accepted_languages`].
#[derive(Debug, Clone)]
pub struct AcceptedLanguages<'a> {
    entries: std::slice::Iter<'a, LanguageQuality>,
}

impl<'a> Iterator for AcceptedLanguages<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries
            .find(|entry| entry.quality > 0.0)
            .map(|entry| entry.language.as_str())
    }
}

fn parse_entry(header_value: &str, entry: &str) -> Result<LanguageQuality> {
    let entry = entry.trim();
    let mut segments = entry.split(';');

    let language = segments.next().unwrap_or_default().trim();
    if language.is_empty() {
        return Err(malformed(header_value, "empty language tag"));
    }
    if language.contains(char::is_whitespace) {
        return Err(malformed(
            header_value,
            format!("language tag \"{}\" contains whitespace", language),
        ));
    }

    let quality = match (segments.next(), segments.next()) {
        (None, _) => DEFAULT_QUALITY,
        (Some(parameter), None) => parse_quality(header_value, parameter.trim())?,
        (Some(_), Some(_)) => {
            return Err(malformed(
                header_value,
                format!("language entry \"{}\" has too many parameters", entry),
            ))
        }
    };

    Ok(LanguageQuality {
        language: language.to_string(),
        quality,
    })
}

fn parse_quality(header_value: &str, parameter: &str) -> Result<f32> {
    let regex = QUALITY_REGEX
        .get_or_init(|| Regex::new(r"^q\s*=\s*(\S*)$").expect("quality pattern is valid"));

    let value = regex
        .captures(parameter)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            malformed(
                header_value,
                format!("expected \"q=<quality>\", found \"{}\"", parameter),
            )
        })?;

    let quality: f32 = value.parse().map_err(|_| {
        malformed(
            header_value,
            format!("could not parse quality \"{}\"", value),
        )
    })?;

    if !quality.is_finite() || !(0.0..=1.0).contains(&quality) {
        return Err(malformed(
            header_value,
            format!("quality {} is outside [0, 1]", value),
        ));
    }

    Ok(quality)
}

fn malformed(header_value: &str, reason: impl Into<String>) -> Error {
    Error::MalformedPreferenceList {
        input: header_value.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn accepted(header: &str) -> Vec<String> {
        AcceptLanguage::parse(header)
            .expect("Should parse")
            .accepted_languages()
            .map(str::to_string)
            .collect()
    }

    fn assert_malformed(header: &str) {
        let result = AcceptLanguage::parse(header);
        assert!(
            matches!(result, Err(Error::MalformedPreferenceList { .. })),
            "expected {:?} to be rejected, got {:?}",
            header,
            result
        );
    }

    // ==================== Display Tests ====================

    #[test]
    fn test_display_returns_original_value() {
        let header = AcceptLanguage::parse("en").unwrap();
        assert_eq!(header.to_string(), "en");
        assert_eq!(header.as_str(), "en");

        let raw = "en-gb;q=0.8, ru;q=0 ,en;q=0.7";
        let header: AcceptLanguage = raw.parse().unwrap();
        assert_eq!(header.to_string(), raw);
    }

    // ==================== Ordering Tests ====================

    #[test]
    fn test_single_language() {
        let header = AcceptLanguage::parse("en").unwrap();
        let mut languages = header.accepted_languages();

        assert_eq!(languages.next(), Some("en"));
        assert_eq!(languages.next(), None);
        assert_eq!(header.quality_of("en"), Some(DEFAULT_QUALITY));
    }

    #[test]
    fn test_http_header_order() {
        assert_eq!(accepted("da, en-gb;q=0.8, en;q=0.7"), vec!["da", "en-gb", "en"]);
    }

    #[test]
    fn test_http_header_unordered() {
        assert_eq!(accepted("en-gb;q=0.8, da;q=1, en;q=0.7"), vec!["da", "en-gb", "en"]);
    }

    #[test]
    fn test_http_header_q0_excluded() {
        assert_eq!(
            accepted("en-gb;q=0.8, ru;q=0, en;q=0.7, da;q=.9"),
            vec!["da", "en-gb", "en"]
        );
        assert_eq!(
            accepted("en-gb;q=0.8, ru;q=0 ,en;q=0.7, da;q=.9"),
            vec!["da", "en-gb", "en"]
        );
    }

    #[test]
    fn test_q0_entries_retained_in_entries() {
        let header = AcceptLanguage::parse("ru;q=0, en").unwrap();

        assert_eq!(header.entries().len(), 2);
        assert_eq!(header.entries()[0].language, "en");
        assert_eq!(header.entries()[1].language, "ru");
        assert_eq!(header.quality_of("ru"), Some(0.0));
    }

    #[test]
    fn test_equal_quality_keeps_input_order() {
        assert_eq!(
            accepted("fr;q=0.5, de, it;q=0.5, en, es;q=0.5"),
            vec!["de", "en", "fr", "it", "es"]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let header = AcceptLanguage::parse("en;q=0.3, de, en;q=0.9").unwrap();

        let languages: Vec<_> = header.accepted_languages().collect();
        assert_eq!(languages, vec!["de", "en", "en"]);
        assert_eq!(header.quality_of("en"), Some(0.9));
    }

    #[test]
    fn test_leading_dot_quality() {
        let header = AcceptLanguage::parse("da;q=.9").unwrap();
        assert_eq!(header.quality_of("da"), Some(0.9));
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(accepted("  da ;  q = 0.4 ,en  ;q=0.6  "), vec!["en", "da"]);
    }

    #[test]
    fn test_accepted_languages_is_restartable() {
        let header = AcceptLanguage::parse("da, en;q=0.5").unwrap();

        let first: Vec<_> = header.accepted_languages().collect();
        let second: Vec<_> = header.accepted_languages().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_zero_produces_nothing() {
        assert!(accepted("en;q=0, de;q=0.0").is_empty());
    }

    // ==================== Malformed Input Tests ====================

    #[test]
    fn test_empty_value_rejected() {
        assert_malformed("");
        assert_malformed("   ");
    }

    #[test]
    fn test_unparseable_quality_rejected() {
        assert_malformed("en;q=notanumber");
        assert_malformed("en;q=");
    }

    #[test]
    fn test_extra_parameter_rejected() {
        assert_malformed("en;q=0.5;extra");
        assert_malformed("da, en;q=0.5;level=1");
    }

    #[test]
    fn test_non_quality_parameter_rejected() {
        assert_malformed("en;level=1");
        assert_malformed("en;0.5");
    }

    #[test]
    fn test_empty_tag_rejected() {
        assert_malformed("en,,de");
        assert_malformed(";q=0.5");
        assert_malformed("en,");
    }

    #[test]
    fn test_out_of_range_quality_rejected() {
        assert_malformed("en;q=1.5");
        assert_malformed("en;q=-0.1");
        assert_malformed("en;q=NaN");
        assert_malformed("en;q=inf");
    }

    #[test]
    fn test_error_carries_input() {
        let err = AcceptLanguage::parse("en;q=x").unwrap_err();
        match err {
            Error::MalformedPreferenceList { input, reason } => {
                assert_eq!(input, "en;q=x");
                assert!(reason.contains("\"x\""));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    // ==================== Property Tests ====================

    fn entry_strategy() -> impl Strategy<Value = (String, Option<u8>)> {
        ("[a-z]{2}(-[a-z]{2})?", proptest::option::of(0u8..=10))
    }

    proptest! {
        #[test]
        fn prop_accepted_languages_sorted_and_stable(entries in proptest::collection::vec(entry_strategy(), 1..8)) {
            let header = entries
                .iter()
                .map(|(tag, q)| match q {
                    Some(q) => format!("{};q={}", tag, *q as f32 / 10.0),
                    None => tag.clone(),
                })
                .collect::<Vec<_>>()
                .join(", ");

            let parsed = AcceptLanguage::parse(&header).unwrap();
            prop_assert_eq!(parsed.entries().len(), entries.len());

            // Expected order: stable sort of the input by descending quality
            let mut expected: Vec<(usize, &String, u8)> = entries
                .iter()
                .enumerate()
                .map(|(i, (tag, q))| (i, tag, q.unwrap_or(10)))
                .collect();
            expected.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
            let expected: Vec<&str> = expected
                .iter()
                .filter(|(_, _, q)| *q > 0)
                .map(|(_, tag, _)| tag.as_str())
                .collect();

            let produced: Vec<&str> = parsed.accepted_languages().collect();
            prop_assert_eq!(produced, expected);
        }
    }
}
