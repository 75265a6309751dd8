//! Morphological analysis capability consumed by the text normalizer.
//!
//! The pipeline never performs morphology itself. It asks a
//! [`MorphAnalyzer`] for the most likely grammatical category of each word
//! and drops function words. Callers own the analyzer and inject it, so a
//! full dictionary-backed tagger and a small test double are
//! interchangeable.
//!
//! Two implementations ship with the crate:
//!
//! - [`FunctionWordAnalyzer`] - built-in Russian and English closed-class
//!   word lists (prepositions, conjunctions, particles, interjections)
//! - [`LexiconMorphAnalyzer`] - a word → tag table, usually loaded from a
//!   tab-separated lexicon file exported from a full tagger

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LectioError, Result};

pub mod function_words;
pub mod lexicon;

pub use function_words::FunctionWordAnalyzer;
pub use lexicon::LexiconMorphAnalyzer;

/// Grammatical categories, following the OpenCorpora tag set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    #[serde(rename = "NOUN")]
    Noun,
    #[serde(rename = "ADJF")]
    FullAdjective,
    #[serde(rename = "ADJS")]
    ShortAdjective,
    #[serde(rename = "COMP")]
    Comparative,
    #[serde(rename = "VERB")]
    Verb,
    #[serde(rename = "INFN")]
    Infinitive,
    #[serde(rename = "PRTF")]
    FullParticiple,
    #[serde(rename = "PRTS")]
    ShortParticiple,
    #[serde(rename = "GRND")]
    Gerund,
    #[serde(rename = "NUMR")]
    Numeral,
    #[serde(rename = "ADVB")]
    Adverb,
    #[serde(rename = "NPRO")]
    Pronoun,
    #[serde(rename = "PRED")]
    Predicative,
    #[serde(rename = "PREP")]
    Preposition,
    #[serde(rename = "CONJ")]
    Conjunction,
    #[serde(rename = "PRCL")]
    Particle,
    #[serde(rename = "INTJ")]
    Interjection,
}

impl PartOfSpeech {
    /// All categories, in tag-set order.
    pub const ALL: [PartOfSpeech; 17] = [
        PartOfSpeech::Noun,
        PartOfSpeech::FullAdjective,
        PartOfSpeech::ShortAdjective,
        PartOfSpeech::Comparative,
        PartOfSpeech::Verb,
        PartOfSpeech::Infinitive,
        PartOfSpeech::FullParticiple,
        PartOfSpeech::ShortParticiple,
        PartOfSpeech::Gerund,
        PartOfSpeech::Numeral,
        PartOfSpeech::Adverb,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Predicative,
        PartOfSpeech::Preposition,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Particle,
        PartOfSpeech::Interjection,
    ];

    /// Categories the normalizer removes by default.
    pub const FUNCTION_WORDS: [PartOfSpeech; 4] = [
        PartOfSpeech::Preposition,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Particle,
        PartOfSpeech::Interjection,
    ];

    /// The short tag for this category.
    pub fn tag(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::FullAdjective => "ADJF",
            PartOfSpeech::ShortAdjective => "ADJS",
            PartOfSpeech::Comparative => "COMP",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Infinitive => "INFN",
            PartOfSpeech::FullParticiple => "PRTF",
            PartOfSpeech::ShortParticiple => "PRTS",
            PartOfSpeech::Gerund => "GRND",
            PartOfSpeech::Numeral => "NUMR",
            PartOfSpeech::Adverb => "ADVB",
            PartOfSpeech::Pronoun => "NPRO",
            PartOfSpeech::Predicative => "PRED",
            PartOfSpeech::Preposition => "PREP",
            PartOfSpeech::Conjunction => "CONJ",
            PartOfSpeech::Particle => "PRCL",
            PartOfSpeech::Interjection => "INTJ",
        }
    }

    /// Whether this is one of the closed-class categories in
    /// [`PartOfSpeech::FUNCTION_WORDS`].
    pub fn is_function_word(&self) -> bool {
        Self::FUNCTION_WORDS.contains(self)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PartOfSpeech {
    type Err = LectioError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|pos| pos.tag() == upper)
            .ok_or_else(|| LectioError::analysis(format!("Unknown part-of-speech tag: {s}")))
    }
}

/// A morphological analyzer that reports the best-ranked grammatical
/// category for a single word.
///
/// Implementations must be deterministic per call. `Ok(None)` means the
/// analyzer has no opinion about the word; the normalizer keeps such words.
pub trait MorphAnalyzer: Send + Sync {
    /// Most likely part of speech of `word`.
    fn part_of_speech(&self, word: &str) -> Result<Option<PartOfSpeech>>;

    /// Get the name of this analyzer (for debugging and logging).
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip_through_from_str() {
        for pos in PartOfSpeech::ALL {
            assert_eq!(pos.tag().parse::<PartOfSpeech>().unwrap(), pos);
        }
        assert_eq!("prep".parse::<PartOfSpeech>().unwrap(), PartOfSpeech::Preposition);
        assert!("LATN".parse::<PartOfSpeech>().is_err());
    }

    #[test]
    fn test_function_word_categories() {
        assert!(PartOfSpeech::Preposition.is_function_word());
        assert!(PartOfSpeech::Conjunction.is_function_word());
        assert!(PartOfSpeech::Particle.is_function_word());
        assert!(PartOfSpeech::Interjection.is_function_word());
        assert!(!PartOfSpeech::Noun.is_function_word());
        assert!(!PartOfSpeech::Pronoun.is_function_word());
    }

    #[test]
    fn test_serde_uses_tags() {
        let json = serde_json::to_string(&PartOfSpeech::Particle).unwrap();
        assert_eq!(json, "\"PRCL\"");
        let pos: PartOfSpeech = serde_json::from_str("\"INFN\"").unwrap();
        assert_eq!(pos, PartOfSpeech::Infinitive);
    }
}
