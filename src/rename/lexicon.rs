//! Word lists and heuristics used to score keyword phrases.

use std::collections::HashSet;

/// English stopwords.
const STOPWORDS: [&str; 179] = [
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've", "you'll", "you'd",
    "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she", "she's", "her", "hers",
    "herself", "it", "it's", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if",
    "or", "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against", "between",
    "into", "through", "during", "before", "after", "above", "below", "to", "from", "up", "down", "in", "out",
    "on", "off", "over", "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don", "don't",
    "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn",
    "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't",
    "isn", "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Words that keep a phrase from being used as a folder name.
const PROFANITY: [&str; 24] = [
    "anal", "arse", "arsehole", "ass", "asshole", "bastard", "bitch", "bollocks", "bullshit", "cock", "crap",
    "cunt", "damn", "dick", "dickhead", "fag", "fuck", "fucking", "motherfucker", "piss", "pussy", "shit",
    "slut", "whore",
];

pub trait StopwordFilter: Send + Sync {
    fn is_stopword(&self, word: &str) -> bool;
}

pub trait ProfanityFilter: Send + Sync {
    fn is_profane(&self, phrase: &str) -> bool;
}

/// Decides if a phrase reads like a natural name instead of a slug, hash or code.
pub trait NameHeuristic: Send + Sync {
    fn looks_like_name(&self, text: &str) -> bool;
}

/// Built-in English stopword list with optional additions.
#[derive(Debug, Clone)]
pub struct EnglishStopwords {
    words: HashSet<String>,
}

/// Profanity check against a lowercase word list.
#[derive(Debug, Clone)]
pub struct WordListProfanity {
    words: HashSet<String>,
}

/// Default name heuristic.
///
/// Rejects text that is shorter than three characters, entirely uppercase,
/// mixes digits with underscores, or is a single lowercase word.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbableName;

impl EnglishStopwords {
    #[must_use]
    pub fn with_extra(extra: &[String]) -> Self {
        let words = STOPWORDS
            .iter()
            .map(|word| (*word).to_string())
            .chain(extra.iter().map(|word| word.trim().to_lowercase()))
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }
}

impl Default for EnglishStopwords {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}

impl StopwordFilter for EnglishStopwords {
    fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}

impl WordListProfanity {
    #[must_use]
    pub fn with_extra(extra: &[String]) -> Self {
        let words = PROFANITY
            .iter()
            .map(|word| (*word).to_string())
            .chain(extra.iter().map(|word| word.trim().to_lowercase()))
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }
}

impl Default for WordListProfanity {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}

impl ProfanityFilter for WordListProfanity {
    fn is_profane(&self, phrase: &str) -> bool {
        phrase
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| self.words.contains(&word.to_lowercase()))
    }
}

impl NameHeuristic for ProbableName {
    fn looks_like_name(&self, text: &str) -> bool {
        if text.chars().count() < 3 {
            return false;
        }
        if is_all_uppercase(text) {
            return false;
        }
        if text.contains('_') && text.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }
        !(text.split_whitespace().count() == 1 && is_all_lowercase(text))
    }
}

/// Has at least one cased character and all cased characters are uppercase.
fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}

/// Has at least one cased character and all cased characters are lowercase.
fn is_all_lowercase(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_uppercase)
}

#[cfg(test)]
mod lexicon_tests {
    use super::*;

    #[test]
    fn stopwords_are_case_insensitive() {
        let stopwords = EnglishStopwords::default();
        assert!(stopwords.is_stopword("the"));
        assert!(stopwords.is_stopword("The"));
        assert!(!stopwords.is_stopword("matrix"));
    }

    #[test]
    fn extra_stopwords_are_added() {
        let stopwords = EnglishStopwords::with_extra(&["1080p".to_string(), " WEB ".to_string()]);
        assert!(stopwords.is_stopword("1080p"));
        assert!(stopwords.is_stopword("web"));
        assert!(stopwords.is_stopword("and"));
    }

    #[test]
    fn profanity_matches_whole_words() {
        let profanity = WordListProfanity::default();
        assert!(profanity.is_profane("holy shit"));
        assert!(profanity.is_profane("Damn Yankees"));
        assert!(!profanity.is_profane("class assignment"));
        assert!(!profanity.is_profane("the matrix"));
    }

    #[test]
    fn probable_name_rules() {
        let heuristic = ProbableName;
        assert!(heuristic.looks_like_name("the matrix"));
        assert!(heuristic.looks_like_name("The Matrix"));
        assert!(heuristic.looks_like_name("Matrix"));
        assert!(!heuristic.looks_like_name(""));
        assert!(!heuristic.looks_like_name("ab"));
        assert!(!heuristic.looks_like_name("THE MATRIX"));
        assert!(!heuristic.looks_like_name("clip_2024"));
        assert!(!heuristic.looks_like_name("matrix"));
    }
}
