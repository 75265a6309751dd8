//! Article text normalizer.
//!
//! Extracts single-script words from raw article text, drops function words
//! according to an injected morphological analyzer, and joins the survivors
//! with single spaces in their original order. Surviving words are not
//! lemmatized or case-folded.

use std::sync::Arc;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::morphology::{MorphAnalyzer, PartOfSpeech};
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::PartOfSpeechFilter;
use crate::analysis::tokenizer::RegexTokenizer;
use crate::error::Result;

/// Normalizes raw documents into space-joined content words.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use lectio::analysis::analyzer::TextNormalizer;
/// use lectio::analysis::morphology::FunctionWordAnalyzer;
///
/// let normalizer = TextNormalizer::new(Arc::new(FunctionWordAnalyzer::new())).unwrap();
/// let text = normalizer.normalize("<p>Стартап и инвесторы: 5 раундов</p>").unwrap();
/// assert_eq!(text, "p Стартап инвесторы раундов p");
/// ```
#[derive(Clone, Debug)]
pub struct TextNormalizer {
    pipeline: PipelineAnalyzer,
}

impl TextNormalizer {
    /// Create a normalizer with the default word pattern that removes
    /// prepositions, conjunctions, particles and interjections.
    pub fn new(morph: Arc<dyn MorphAnalyzer>) -> Result<Self> {
        Self::with_pattern(morph, crate::analysis::tokenizer::WORD_PATTERN)
    }

    /// Create a normalizer with a custom token pattern.
    pub fn with_pattern(morph: Arc<dyn MorphAnalyzer>, pattern: &str) -> Result<Self> {
        Self::with_options(morph, pattern, PartOfSpeech::FUNCTION_WORDS)
    }

    /// Create a normalizer with a custom token pattern and excluded categories.
    pub fn with_options<I>(
        morph: Arc<dyn MorphAnalyzer>,
        pattern: &str,
        excluded: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = PartOfSpeech>,
    {
        let tokenizer = Arc::new(RegexTokenizer::with_pattern(pattern)?);
        let pipeline = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(PartOfSpeechFilter::with_excluded(morph, excluded)))
            .with_name("text_normalizer");
        Ok(TextNormalizer { pipeline })
    }

    /// Wrap a custom analysis pipeline.
    pub fn from_pipeline(pipeline: PipelineAnalyzer) -> Self {
        TextNormalizer { pipeline }
    }

    /// Normalize one document. Stopped tokens are left out.
    pub fn normalize(&self, text: &str) -> Result<String> {
        let words: Vec<String> = self
            .pipeline
            .analyze(text)?
            .filter(|t| !t.is_stopped())
            .map(|t| t.text)
            .collect();
        Ok(words.join(" "))
    }
}

impl Analyzer for TextNormalizer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.pipeline.analyze(text)
    }

    fn name(&self) -> &'static str {
        "text_normalizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::morphology::{FunctionWordAnalyzer, LexiconMorphAnalyzer};
    use crate::analysis::tokenizer::Tokenizer;
    use crate::error::LectioError;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(Arc::new(FunctionWordAnalyzer::new())).unwrap()
    }

    #[test]
    fn test_normalize_keeps_order_and_surface_forms() {
        let text = normalizer()
            .normalize("Компании вышли на рынок, но инвесторы не торопятся.")
            .unwrap();
        assert_eq!(text, "Компании вышли рынок инвесторы торопятся");
    }

    #[test]
    fn test_normalize_empty_and_symbol_only() {
        assert_eq!(normalizer().normalize("").unwrap(), "");
        assert_eq!(normalizer().normalize("2024 -- 100% !!!").unwrap(), "");
    }

    #[test]
    fn test_output_never_longer_and_no_excluded_tokens() {
        let morph = Arc::new(FunctionWordAnalyzer::new());
        let normalizer = TextNormalizer::new(morph.clone()).unwrap();
        let tokenizer = RegexTokenizer::new().unwrap();

        let samples = [
            "Oh, and the product is great with support",
            "Ах, в городе и на даче было бы лучше",
            "mixed текст with и без words",
        ];
        for sample in samples {
            let input_count = tokenizer.tokenize(sample).unwrap().count();
            let output = normalizer.normalize(sample).unwrap();
            let kept: Vec<&str> = output.split_whitespace().collect();
            assert!(kept.len() <= input_count);
            for word in kept {
                let pos = morph.part_of_speech(word).unwrap();
                assert!(!pos.is_some_and(|p| p.is_function_word()), "{word}");
            }
        }
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let normalizer = normalizer();
        let text = "Рынок и технологии в России";
        assert_eq!(
            normalizer.normalize(text).unwrap(),
            normalizer.normalize(text).unwrap()
        );
    }

    struct FailingAnalyzer;

    impl MorphAnalyzer for FailingAnalyzer {
        fn part_of_speech(&self, _word: &str) -> Result<Option<PartOfSpeech>> {
            Err(LectioError::analysis("dictionary unavailable"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_analyzer_failure_propagates() {
        let normalizer = TextNormalizer::new(Arc::new(FailingAnalyzer)).unwrap();
        assert!(matches!(
            normalizer.normalize("word"),
            Err(LectioError::Analysis(_))
        ));
        // No tokens means no analyzer queries.
        assert_eq!(normalizer.normalize("123").unwrap(), "");
    }

    #[test]
    fn test_stopped_tokens_are_not_emitted() {
        let morph = Arc::new(FunctionWordAnalyzer::new());
        let pipeline = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new().unwrap()))
            .add_filter(Arc::new(PartOfSpeechFilter::new(morph).remove_stopped(false)));
        let marking = TextNormalizer::from_pipeline(pipeline);

        let text = "Компании вышли на рынок, но инвесторы не торопятся.";
        assert_eq!(marking.analyze(text).unwrap().count(), 8);
        assert_eq!(
            marking.normalize(text).unwrap(),
            "Компании вышли рынок инвесторы торопятся"
        );
        assert_eq!(
            marking.normalize(text).unwrap(),
            normalizer().normalize(text).unwrap()
        );
    }

    #[test]
    fn test_custom_exclusions() {
        let lexicon = LexiconMorphAnalyzer::from_entries([("быстро", PartOfSpeech::Adverb)]);
        let normalizer = TextNormalizer::with_options(
            Arc::new(lexicon),
            crate::analysis::tokenizer::WORD_PATTERN,
            [PartOfSpeech::Adverb],
        )
        .unwrap();
        assert_eq!(normalizer.normalize("бежал быстро").unwrap(), "бежал");
    }
}
