use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Result, TypteaError};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// On-disk shape of a bundled language file.
#[derive(Deserialize, Clone, Debug)]
struct LanguageFile {
    name: String,
    words: Vec<String>,
}

/// Ranked word list for one language. Never empty.
///
/// Position is rank: index 0 is the most frequent word. Only the ranked
/// default language gives that order any meaning when sampling.
#[derive(Clone, Debug, PartialEq)]
pub struct WordBank {
    code: String,
    name: String,
    words: Arc<[String]>,
}

impl WordBank {
    /// Entries are split on whitespace so every word is a single token;
    /// blank entries are dropped.
    pub fn new(code: impl Into<String>, name: impl Into<String>, words: Vec<String>) -> Result<Self> {
        let code = code.into().to_lowercase();
        let words: Vec<String> = words
            .iter()
            .flat_map(|w| w.split_whitespace())
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            return Err(TypteaError::EmptyWordBank(code));
        }
        Ok(Self {
            code,
            name: name.into(),
            words: words.into(),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Source of word banks, keyed by language code.
pub trait LanguageProvider {
    fn load_language(&mut self, code: &str) -> Result<WordBank>;

    /// Sorted list of language codes this provider can load.
    fn list_available(&self) -> Vec<String>;

    fn is_available(&self, code: &str) -> bool {
        let code = code.to_lowercase();
        self.list_available().iter().any(|c| *c == code)
    }
}

/// Languages bundled into the binary, parsed lazily and cached per code.
#[derive(Debug, Default)]
pub struct EmbeddedLanguages {
    loaded: HashMap<String, WordBank>,
}

impl EmbeddedLanguages {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LanguageProvider for EmbeddedLanguages {
    fn load_language(&mut self, code: &str) -> Result<WordBank> {
        let code = code.to_lowercase();
        if let Some(bank) = self.loaded.get(&code) {
            return Ok(bank.clone());
        }

        let file = LANG_DIR
            .get_file(format!("{code}.json"))
            .ok_or_else(|| TypteaError::LanguageLoad {
                code: code.clone(),
                reason: "no bundled word list".to_string(),
            })?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| TypteaError::LanguageLoad {
                code: code.clone(),
                reason: "word list is not valid UTF-8".to_string(),
            })?;

        let parsed: LanguageFile = serde_json::from_str(contents)?;
        let bank = WordBank::new(code.clone(), parsed.name, parsed.words)?;
        debug!(language = %code, words = bank.len(), "loaded language");

        self.loaded.insert(code, bank.clone());
        Ok(bank)
    }

    fn list_available(&self) -> Vec<String> {
        let mut codes: Vec<String> = LANG_DIR
            .files()
            .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|f| f.path().file_stem())
            .map(|stem| stem.to_string_lossy().to_lowercase())
            .collect();
        codes.sort();
        codes
    }
}

/// In-memory provider for callers that bring their own word lists.
#[derive(Debug, Default, Clone)]
pub struct StaticLanguages {
    languages: HashMap<String, Vec<String>>,
}

impl StaticLanguages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language<S: AsRef<str>>(mut self, code: &str, words: &[S]) -> Self {
        self.languages.insert(
            code.to_lowercase(),
            words.iter().map(|w| w.as_ref().to_string()).collect(),
        );
        self
    }
}

impl LanguageProvider for StaticLanguages {
    fn load_language(&mut self, code: &str) -> Result<WordBank> {
        let code = code.to_lowercase();
        let words = self
            .languages
            .get(&code)
            .cloned()
            .ok_or_else(|| TypteaError::LanguageLoad {
                code: code.clone(),
                reason: "not registered".to_string(),
            })?;
        WordBank::new(code.clone(), code, words)
    }

    fn list_available(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.languages.keys().cloned().collect();
        codes.sort();
        codes
    }
}
