//! Built-in closed-class word lists.
//!
//! Prepositions, conjunctions, particles and interjections form small,
//! closed vocabularies, so a fixed table answers the only question the
//! normalizer asks without a full dictionary. Open-class words are not
//! classified: [`FunctionWordAnalyzer`] returns `None` for them.
//!
//! # Examples
//!
//! ```
//! use lectio::analysis::morphology::{FunctionWordAnalyzer, MorphAnalyzer, PartOfSpeech};
//!
//! let analyzer = FunctionWordAnalyzer::new();
//! assert_eq!(analyzer.part_of_speech("Через").unwrap(), Some(PartOfSpeech::Preposition));
//! assert_eq!(analyzer.part_of_speech("стартап").unwrap(), None);
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{MorphAnalyzer, PartOfSpeech};
use crate::error::Result;

const RUSSIAN_PREPOSITIONS: &[&str] = &[
    "без", "безо", "близ", "в", "во", "вместо", "вне", "для", "до", "за", "из", "изо", "к",
    "ко", "кроме", "между", "меж", "на", "над", "надо", "о", "об", "обо", "от", "ото", "перед",
    "пред", "передо", "по", "под", "подо", "при", "про", "ради", "с", "со", "сквозь", "среди",
    "у", "через", "чрез", "около", "возле", "вокруг", "после", "против", "вдоль", "мимо",
    "внутри", "накануне", "вследствие", "благодаря", "согласно", "вопреки",
];

const RUSSIAN_CONJUNCTIONS: &[&str] = &[
    "и", "а", "но", "или", "либо", "что", "чтобы", "чтоб", "если", "когда", "как", "хотя",
    "хоть", "потому", "зато", "однако", "тоже", "также", "ибо", "пока", "будто", "словно",
    "лишь", "коли", "ежели", "причем", "притом", "то", "нежели", "дабы",
];

const RUSSIAN_PARTICLES: &[&str] = &[
    "не", "ни", "же", "ли", "ль", "бы", "б", "вот", "вон", "даже", "уж", "уже", "ведь", "разве",
    "неужели", "только", "именно", "почти", "де", "мол", "дескать", "пусть", "пускай", "ка",
    "таки", "ещё", "да", "нет",
];

const RUSSIAN_INTERJECTIONS: &[&str] = &[
    "ах", "ох", "эх", "ой", "ай", "увы", "ура", "ого", "ага", "эй", "ну", "фу", "тьфу", "ух",
    "браво", "алло", "хм",
];

const ENGLISH_PREPOSITIONS: &[&str] = &[
    "about", "above", "across", "after", "against", "along", "among", "around", "at", "before",
    "behind", "below", "beneath", "beside", "between", "beyond", "by", "despite", "down",
    "during", "except", "for", "from", "in", "inside", "into", "near", "of", "off", "on",
    "onto", "out", "over", "past", "per", "since", "through", "throughout", "till", "to",
    "toward", "towards", "under", "until", "up", "upon", "via", "with", "within", "without",
];

const ENGLISH_CONJUNCTIONS: &[&str] = &[
    "and", "but", "or", "nor", "so", "yet", "because", "although", "though", "if", "unless",
    "whereas", "while", "whether", "than", "that", "once", "lest",
];

const ENGLISH_PARTICLES: &[&str] = &["not", "just", "only", "even"];

const ENGLISH_INTERJECTIONS: &[&str] = &[
    "oh", "ah", "wow", "hey", "oops", "ouch", "alas", "hooray", "hmm", "uh", "um", "yay",
];

static DEFAULT_FUNCTION_WORDS: LazyLock<HashMap<String, PartOfSpeech>> = LazyLock::new(|| {
    let groups: [(&[&str], PartOfSpeech); 8] = [
        (RUSSIAN_PREPOSITIONS, PartOfSpeech::Preposition),
        (RUSSIAN_CONJUNCTIONS, PartOfSpeech::Conjunction),
        (RUSSIAN_PARTICLES, PartOfSpeech::Particle),
        (RUSSIAN_INTERJECTIONS, PartOfSpeech::Interjection),
        (ENGLISH_PREPOSITIONS, PartOfSpeech::Preposition),
        (ENGLISH_CONJUNCTIONS, PartOfSpeech::Conjunction),
        (ENGLISH_PARTICLES, PartOfSpeech::Particle),
        (ENGLISH_INTERJECTIONS, PartOfSpeech::Interjection),
    ];

    let mut table = HashMap::new();
    for (words, pos) in groups {
        for word in words {
            // First listing wins for ambiguous forms.
            table.entry(word.to_string()).or_insert(pos);
        }
    }
    table
});

/// Morphological analyzer backed by built-in closed-class word lists.
///
/// Lookups are case-insensitive. Words outside the lists yield `None`.
#[derive(Clone, Debug, Default)]
pub struct FunctionWordAnalyzer {
    extra: HashMap<String, PartOfSpeech>,
}

impl FunctionWordAnalyzer {
    /// Create an analyzer over the default Russian and English lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add words to the built-in lists. Extra entries take precedence.
    pub fn with_words<I, S>(mut self, words: I, pos: PartOfSpeech) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.extra.insert(word.as_ref().to_lowercase(), pos);
        }
        self
    }

    /// Number of words this analyzer recognizes.
    pub fn len(&self) -> usize {
        DEFAULT_FUNCTION_WORDS.len()
            + self
                .extra
                .keys()
                .filter(|word| !DEFAULT_FUNCTION_WORDS.contains_key(*word))
                .count()
    }

    /// Check if the word table is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MorphAnalyzer for FunctionWordAnalyzer {
    fn part_of_speech(&self, word: &str) -> Result<Option<PartOfSpeech>> {
        let lowered = word.to_lowercase();
        Ok(self
            .extra
            .get(&lowered)
            .or_else(|| DEFAULT_FUNCTION_WORDS.get(&lowered))
            .copied())
    }

    fn name(&self) -> &'static str {
        "function_words"
    }
}
