/*!
 * Translation lookups for the overlay's translation line.
 *
 * Translations are produced outside this crate. A [`Translator`] only hands
 * back a ready-made string for a phrase and a target language:
 * - `NoopTranslator`: never translates
 * - `FileTranslator`: reads translations from a JSON file
 */

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;

use crate::errors::TranslationError;
use crate::language_utils;

/// Common trait for all translation sources
///
/// Implementations must be shareable across tasks so the controller can
/// translate several videos concurrently.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` into `target_language`
    ///
    /// # Returns
    /// * `Ok(String)` - the translation, empty when none is available
    /// * `Err(TranslationError)` - when the source itself is unusable
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError>;
}

/// Translator that never produces a translation
#[derive(Debug, Default, Clone)]
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, _text: &str, _target_language: &str) -> Result<String, TranslationError> {
        Ok(String::new())
    }
}

/// JSON layout: `{ "<language>": { "<phrase>": "<translation>" } }`
#[derive(Debug, Deserialize, Default)]
#[serde(transparent)]
struct TranslationTable(BTreeMap<String, BTreeMap<String, String>>);

/// Translator backed by a pre-computed translation table
#[derive(Debug, Default)]
pub struct FileTranslator {
    table: TranslationTable,
}

impl FileTranslator {
    /// Parse a translation table from JSON text
    pub fn from_json(json: &str) -> Result<Self, TranslationError> {
        let table: TranslationTable = serde_json::from_str(json)
            .map_err(|e| TranslationError::ParseError(e.to_string()))?;
        let langs: Vec<&String> = table.0.keys().collect();
        for (i, lang) in langs.iter().enumerate() {
            language_utils::validate_language_code(lang)
                .map_err(|_| TranslationError::UnsupportedLanguage((*lang).clone()))?;
            // One table per language, whichever ISO code names it
            if let Some(other) = langs[..i].iter().find(|other| language_utils::language_codes_match(other, lang)) {
                return Err(TranslationError::ParseError(format!(
                    "Duplicate language entries: {} and {}",
                    other, lang
                )));
            }
        }
        Ok(Self { table })
    }

    /// Load a translation table from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TranslationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::LoadFailed(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    fn entries_for(&self, target_language: &str) -> Option<&BTreeMap<String, String>> {
        self.table
            .0
            .iter()
            .find(|(lang, _)| language_utils::language_codes_match(lang, target_language))
            .map(|(_, entries)| entries)
    }

    fn lookup(&self, text: &str, target_language: &str) -> Option<&str> {
        let entries = self.entries_for(target_language)?;
        if let Some(found) = entries.get(text) {
            return Some(found);
        }
        let wanted = text.trim().to_lowercase();
        entries
            .iter()
            .find(|(phrase, _)| phrase.trim().to_lowercase() == wanted)
            .map(|(_, translation)| translation.as_str())
    }
}

#[async_trait]
impl Translator for FileTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            debug!("Empty text for translation, returning an empty string");
            return Ok(String::new());
        }

        match self.lookup(text, target_language) {
            Some(translation) => {
                debug!("Translation found for '{}' ({}): {}", text, target_language, translation);
                Ok(translation.to_string())
            }
            None => {
                warn!("No {} translation available for '{}'", target_language, text);
                Ok(String::new())
            }
        }
    }
}
