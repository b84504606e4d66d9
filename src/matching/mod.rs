//! Pattern matchers
//!
//! Each matcher scans a password independently and produces zero or more
//! candidate matches of one pattern kind. Candidates may overlap freely; the
//! scoring layer decides which combination is cheapest for an attacker.

mod date;
mod dictionary;
pub mod keyboard;
mod l33t;
mod regex;
mod repeat;
mod sequence;
mod spatial;

use std::collections::BTreeMap;

use crate::scoring::estimate::ScoringContext;
use crate::scoring::ScoredMatch;
use crate::wordlists::RankedDictionary;
use keyboard::KeyboardGraph;

pub(crate) use self::regex::RECENT_YEAR;

/// A single candidate match against the password, with inclusive character
/// index bounds. `token` is always the exact password substring
/// `password[start..=end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub token: String,
    pub kind: MatchKind,
}

/// The pattern kind of a match, with its kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchKind {
    Dictionary(DictionaryDetail),
    Spatial(SpatialDetail),
    Sequence(SequenceDetail),
    Repeat(RepeatDetail),
    Date(DateDetail),
    Regex(RegexDetail),
    /// Synthesized by the scoring layer for unmatched residue; never
    /// produced by a matcher.
    BruteForce,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryDetail {
    /// Name of the dictionary the word was found in.
    pub dictionary: String,
    /// The matched word in its normalized (lowercase) dictionary form.
    pub word: String,
    /// Frequency rank of the word, 1 = most common.
    pub rank: usize,
    pub reversed: bool,
    pub l33t: bool,
    /// Substitutions actually used within the token (l33t char -> plain
    /// char). Empty unless `l33t` is set.
    pub substitutions: BTreeMap<char, char>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpatialDetail {
    /// Name of the keyboard graph the run was found on.
    pub graph: String,
    /// Number of direction changes along the run.
    pub turns: usize,
    /// Number of characters typed with the shift key held.
    pub shifted_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDetail {
    pub ascending: bool,
    /// Character class of the run: "lower", "upper", "digits" or "unicode".
    pub name: &'static str,
    /// Size of the character class.
    pub space: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatDetail {
    /// The repeated unit.
    pub base_token: String,
    /// Guesses for the base token's own optimal decomposition.
    pub base_guesses: f64,
    /// The base token's optimal match sequence.
    pub base_matches: Vec<ScoredMatch>,
    /// token length / base token length.
    pub repeat_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateDetail {
    pub day: u32,
    pub month: u32,
    /// Four-digit year (two-digit years are expanded at match time).
    pub year: i32,
    /// Separator between the fields, empty for run-of-digits dates.
    pub separator: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegexDetail {
    /// Name of the registered pattern, e.g. "recent_year".
    pub name: &'static str,
}

impl Match {
    pub(crate) fn new(start: usize, end: usize, token: String, kind: MatchKind) -> Self {
        debug_assert!(start <= end, "match bounds inverted: {start} > {end}");
        debug_assert_eq!(
            token.chars().count(),
            end - start + 1,
            "token {token:?} does not span [{start}, {end}]"
        );
        Self {
            start,
            end,
            token,
            kind,
        }
    }

    /// Token length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// A password prepared for matching: characters and their lowercase forms,
/// indexable by character position.
pub(crate) struct Password {
    chars: Vec<char>,
    lower: Vec<char>,
}

impl Password {
    pub(crate) fn new(password: &str) -> Self {
        let chars: Vec<char> = password.chars().collect();
        // Per-char lowering keeps indices aligned with the original
        let lower = chars
            .iter()
            .map(|c| c.to_lowercase().next().unwrap_or(*c))
            .collect();
        Self { chars, lower }
    }

    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }

    pub(crate) fn chars(&self) -> &[char] {
        &self.chars
    }

    pub(crate) fn lower(&self) -> &[char] {
        &self.lower
    }

    /// The original-case substring over inclusive bounds.
    pub(crate) fn token(&self, start: usize, end: usize) -> String {
        self.chars[start..=end].iter().collect()
    }

    /// The lowercased substring over inclusive bounds.
    pub(crate) fn token_lower(&self, start: usize, end: usize) -> String {
        self.lower[start..=end].iter().collect()
    }
}

type StageFn = fn(&MatcherSet, &Password) -> Vec<Match>;

/// The full matcher suite: ranked dictionaries, keyboard graphs and the
/// reference year, immutable after construction and shareable across
/// threads.
pub(crate) struct MatcherSet {
    dictionaries: Vec<RankedDictionary>,
    graphs: Vec<KeyboardGraph>,
    reference_year: i32,
    scoring: ScoringContext,
}

impl MatcherSet {
    /// Matcher stages, run in order. Each stage is independent of the
    /// others over a given password.
    const STAGES: [(&'static str, StageFn); 8] = [
        ("dictionary", |set, pw| {
            dictionary::matches(&set.dictionaries, pw)
        }),
        ("reverse_dictionary", |set, pw| {
            dictionary::reversed_matches(&set.dictionaries, pw)
        }),
        ("l33t", |set, pw| l33t::matches(&set.dictionaries, pw)),
        ("spatial", |set, pw| spatial::matches(&set.graphs, pw)),
        ("repeat", repeat::matches),
        ("sequence", |_, pw| sequence::matches(pw)),
        ("regex", |_, pw| regex::matches(&RECENT_YEAR, pw)),
        ("date", |set, pw| date::matches(pw, set.reference_year)),
    ];

    pub(crate) fn new(
        dictionaries: Vec<RankedDictionary>,
        graphs: Vec<KeyboardGraph>,
        reference_year: i32,
    ) -> Self {
        let scoring = ScoringContext::new(&graphs, reference_year);
        Self {
            dictionaries,
            graphs,
            reference_year,
            scoring,
        }
    }

    pub(crate) fn scoring(&self) -> &ScoringContext {
        &self.scoring
    }

    pub(crate) fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Runs every matcher and returns the combined candidates ordered by
    /// start then end index.
    pub(crate) fn matches(&self, password: &str) -> Vec<Match> {
        self.matches_inner(password, &|| false)
            .unwrap_or_default()
    }

    /// As [`Self::matches`] with an extra per-call user-input dictionary
    /// (rank = position in the slice).
    pub(crate) fn matches_with_user_inputs(
        &self,
        password: &str,
        user_inputs: &[&str],
    ) -> Vec<Match> {
        if user_inputs.is_empty() {
            return self.matches(password);
        }
        let user_dictionary = RankedDictionary::from_words("user_inputs", user_inputs);
        let augmented = MatcherSet::new(
            self.dictionaries
                .iter()
                .cloned()
                .chain(std::iter::once(user_dictionary))
                .collect(),
            self.graphs.clone(),
            self.reference_year,
        );
        augmented.matches(password)
    }

    /// Runs the matcher stages, checking `is_cancelled` before each one.
    /// Returns `None` when cancelled.
    pub(crate) fn matches_inner(
        &self,
        password: &str,
        is_cancelled: &dyn Fn() -> bool,
    ) -> Option<Vec<Match>> {
        let pw = Password::new(password);
        let mut all = Vec::new();

        for (stage_name, stage) in Self::STAGES {
            if is_cancelled() {
                #[cfg(feature = "tracing")]
                tracing::debug!("matching cancelled before stage: {}", stage_name);
                return None;
            }
            let _ = stage_name;

            all.extend(stage(self, &pw));
        }

        all.sort_by_key(|m| (m.start, m.end));
        Some(all)
    }
}
