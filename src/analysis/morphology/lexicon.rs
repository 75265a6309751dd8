//! Dictionary-backed morphological analyzer.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use super::{MorphAnalyzer, PartOfSpeech};
use crate::error::{LectioError, Result};

/// Morphological analyzer that looks words up in a word → tag table.
///
/// The lexicon format is one entry per line, `word<TAB>TAG`, where `TAG` is
/// an OpenCorpora part-of-speech tag. Blank lines and lines starting with
/// `#` are ignored. When a word is listed more than once the first entry is
/// kept, so exports ordered by parse probability keep their best parse.
///
/// Words missing from the table are delegated to an optional fallback
/// analyzer, otherwise they are reported as unknown.
#[derive(Clone)]
pub struct LexiconMorphAnalyzer {
    entries: HashMap<String, PartOfSpeech>,
    case_insensitive: bool,
    fallback: Option<Arc<dyn MorphAnalyzer>>,
}

impl LexiconMorphAnalyzer {
    /// Build an analyzer from in-memory entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, PartOfSpeech)>,
        S: Into<String>,
    {
        let mut table = HashMap::new();
        for (word, pos) in entries {
            table.entry(word.into()).or_insert(pos);
        }
        LexiconMorphAnalyzer {
            entries: table,
            case_insensitive: false,
            fallback: None,
        }
    }

    /// Parse a tab-separated lexicon from a reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut entries = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (word, tag) = line.split_once('\t').ok_or_else(|| {
                LectioError::analysis(format!(
                    "Malformed lexicon entry on line {}: expected `word<TAB>TAG`",
                    line_num + 1
                ))
            })?;
            entries.push((word.trim().to_string(), tag.parse::<PartOfSpeech>()?));
        }
        Ok(Self::from_entries(entries))
    }

    /// Load a tab-separated lexicon file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            LectioError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot open lexicon {}: {e}", path.display()),
            ))
        })?;
        let analyzer = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "Loaded {} lexicon entries from {}",
            analyzer.len(),
            path.display()
        );
        Ok(analyzer)
    }

    /// Fold words to lowercase before lookup. Table keys are folded too.
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        if enabled && !self.case_insensitive {
            let mut folded = HashMap::with_capacity(self.entries.len());
            for (word, pos) in self.entries.drain() {
                folded.entry(word.to_lowercase()).or_insert(pos);
            }
            self.entries = folded;
        }
        self.case_insensitive = enabled;
        self
    }

    /// Consult `fallback` for words missing from the table.
    pub fn with_fallback(mut self, fallback: Arc<dyn MorphAnalyzer>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Number of lexicon entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MorphAnalyzer for LexiconMorphAnalyzer {
    fn part_of_speech(&self, word: &str) -> Result<Option<PartOfSpeech>> {
        let found = if self.case_insensitive {
            self.entries.get(&word.to_lowercase())
        } else {
            self.entries.get(word)
        };

        match (found, &self.fallback) {
            (Some(pos), _) => Ok(Some(*pos)),
            (None, Some(fallback)) => fallback.part_of_speech(word),
            (None, None) => Ok(None),
        }
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

impl std::fmt::Debug for LexiconMorphAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexiconMorphAnalyzer")
            .field("entries", &self.entries.len())
            .field("case_insensitive", &self.case_insensitive)
            .field("fallback", &self.fallback.as_ref().map(|a| a.name()))
            .finish()
    }
}
