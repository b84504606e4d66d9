//! Ranked word list management
//!
//! Handles loading and querying the frequency-ranked dictionaries used by
//! the dictionary matchers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Word list file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read word list file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Word list is empty")]
    EmptyWordList,
}

/// A dictionary of words ranked by frequency.
///
/// Rank 1 is the most frequent word. Word lists are expected in decreasing
/// frequency order, one word per line; matching is always done against the
/// lowercased form.
#[derive(Debug, Clone)]
pub struct RankedDictionary {
    name: String,
    ranks: HashMap<String, usize>,
}

impl RankedDictionary {
    /// Builds a ranked dictionary from an ordered word sequence.
    ///
    /// Words are trimmed and lowercased; blank lines are skipped. A line may
    /// carry trailing whitespace-separated metadata (e.g. an occurrence
    /// count), in which case only the first token is used.
    pub fn from_words<I, S>(name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks = HashMap::new();
        let mut rank = 1;
        for line in words {
            let word = match line.as_ref().split_whitespace().next() {
                Some(w) => w.to_lowercase(),
                None => continue,
            };
            // First occurrence wins: keep the best (lowest) rank
            ranks.entry(word).or_insert_with(|| {
                let r = rank;
                rank += 1;
                r
            });
        }
        Self {
            name: name.into(),
            ranks,
        }
    }

    /// Loads a ranked dictionary from a word list file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File contains no words
    pub fn from_file(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, DictionaryError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Word list load FAILED: FileNotFound {}", path.display());
            return Err(DictionaryError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;

        if content.trim().is_empty() {
            #[cfg(feature = "tracing")]
            tracing::error!("Word list load FAILED: empty file {}", path.display());
            return Err(DictionaryError::EmptyWordList);
        }

        let dictionary = Self::from_words(name, content.lines());

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Word list loaded: {} words from {}",
            dictionary.len(),
            path.display()
        );

        Ok(dictionary)
    }

    /// The dictionary name reported on matches (e.g. `"passwords"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up the rank of a (lowercase) word. Rank 1 = most frequent.
    pub fn rank(&self, word: &str) -> Option<usize> {
        self.ranks.get(word).copied()
    }

    /// Number of distinct words in the dictionary.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// True if the dictionary contains no words.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// The built-in dictionaries, embedded at compile time.
pub(crate) fn built_in_dictionaries() -> Vec<RankedDictionary> {
    vec![
        RankedDictionary::from_words("passwords", include_str!("../assets/passwords.txt").lines()),
        RankedDictionary::from_words("english", include_str!("../assets/english.txt").lines()),
        RankedDictionary::from_words("names", include_str!("../assets/names.txt").lines()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_words_ranks_in_order() {
        let dict = RankedDictionary::from_words("test", ["alpha", "beta", "gamma"]);
        assert_eq!(dict.rank("alpha"), Some(1));
        assert_eq!(dict.rank("beta"), Some(2));
        assert_eq!(dict.rank("gamma"), Some(3));
        assert_eq!(dict.rank("delta"), None);
    }

    #[test]
    fn test_from_words_lowercases() {
        let dict = RankedDictionary::from_words("test", ["Alpha", "BETA"]);
        assert_eq!(dict.rank("alpha"), Some(1));
        assert_eq!(dict.rank("beta"), Some(2));
    }

    #[test]
    fn test_from_words_first_token_wins() {
        let dict = RankedDictionary::from_words("test", ["alpha 4021", "beta 377"]);
        assert_eq!(dict.rank("alpha"), Some(1));
        assert_eq!(dict.rank("beta"), Some(2));
    }

    #[test]
    fn test_from_words_skips_blank_lines_and_duplicates() {
        let dict = RankedDictionary::from_words("test", ["alpha", "", "  ", "alpha", "beta"]);
        assert_eq!(dict.rank("alpha"), Some(1));
        assert_eq!(dict.rank("beta"), Some(2));
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_from_file_success() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "hello").expect("Failed to write");
        writeln!(temp_file, "world").expect("Failed to write");

        let dict = RankedDictionary::from_file("custom", temp_file.path()).unwrap();
        assert_eq!(dict.name(), "custom");
        assert_eq!(dict.rank("hello"), Some(1));
        assert_eq!(dict.rank("world"), Some(2));
    }

    #[test]
    fn test_from_file_not_found() {
        let result = RankedDictionary::from_file("custom", "/nonexistent/path/words.txt");
        assert!(matches!(result, Err(DictionaryError::FileNotFound(_))));
    }

    #[test]
    fn test_from_file_empty() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(temp_file, "").expect("Failed to write empty content");

        let result = RankedDictionary::from_file("custom", temp_file.path());
        assert!(matches!(result, Err(DictionaryError::EmptyWordList)));
    }

    #[test]
    fn test_built_in_dictionaries() {
        let dicts = built_in_dictionaries();
        assert_eq!(dicts.len(), 3);

        let passwords = dicts.iter().find(|d| d.name() == "passwords").unwrap();
        assert!(passwords.rank("password").unwrap() <= 10);
        assert!(!passwords.is_empty());

        let english = dicts.iter().find(|d| d.name() == "english").unwrap();
        assert!(english.rank("mother").is_some());
    }
}
