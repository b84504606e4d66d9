//! Actionable feedback
//!
//! Derives a warning and suggestions from the weakest link of the optimal
//! match sequence. Feedback is only produced for passwords scoring 2 or
//! below; a strong password gets none.

use std::fmt;

use crate::matching::{DictionaryDetail, MatchKind};
use crate::scoring::ScoredMatch;

/// The single most important problem found with the password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    StraightRowsOfKeys,
    ShortKeyboardPatterns,
    RepeatsLikeAaa,
    RepeatsLikeAbcabc,
    SequencesLikeAbc,
    RecentYears,
    Dates,
    Top10Passwords,
    Top100Passwords,
    VeryCommonPassword,
    SimilarToCommonPassword,
    WordByItself,
    NamesByThemselves,
    CommonNames,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::StraightRowsOfKeys => "Straight rows of keys are easy to guess",
            Self::ShortKeyboardPatterns => "Short keyboard patterns are easy to guess",
            Self::RepeatsLikeAaa => "Repeats like \"aaa\" are easy to guess",
            Self::RepeatsLikeAbcabc => {
                "Repeats like \"abcabcabc\" are only slightly harder to guess than \"abc\""
            }
            Self::SequencesLikeAbc => "Sequences like abc or 6543 are easy to guess",
            Self::RecentYears => "Recent years are easy to guess",
            Self::Dates => "Dates are often easy to guess",
            Self::Top10Passwords => "This is a top-10 common password",
            Self::Top100Passwords => "This is a top-100 common password",
            Self::VeryCommonPassword => "This is a very common password",
            Self::SimilarToCommonPassword => "This is similar to a commonly used password",
            Self::WordByItself => "A word by itself is easy to guess",
            Self::NamesByThemselves => "Names and surnames by themselves are easy to guess",
            Self::CommonNames => "Common names and surnames are easy to guess",
        };
        f.write_str(text)
    }
}

/// A concrete way to make the password stronger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suggestion {
    UseAFewWordsAvoidCommonPhrases,
    NoNeedForSymbolsDigitsOrUppercase,
    AddAnotherWordOrTwo,
    UseALongerKeyboardPattern,
    AvoidRepeatedWordsAndCharacters,
    AvoidSequences,
    AvoidRecentYears,
    AvoidYearsAssociatedWithYou,
    AvoidDatesAndYearsAssociatedWithYou,
    CapitalizationDoesntHelp,
    AllUppercaseIsAlmostAsEasy,
    ReversedWordsArentMuchHarder,
    PredictableSubstitutionsDontHelp,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UseAFewWordsAvoidCommonPhrases => "Use a few words, avoid common phrases",
            Self::NoNeedForSymbolsDigitsOrUppercase => {
                "No need for symbols, digits, or uppercase letters"
            }
            Self::AddAnotherWordOrTwo => "Add another word or two. Uncommon words are better.",
            Self::UseALongerKeyboardPattern => {
                "Use a longer keyboard pattern with more turns"
            }
            Self::AvoidRepeatedWordsAndCharacters => "Avoid repeated words and characters",
            Self::AvoidSequences => "Avoid sequences",
            Self::AvoidRecentYears => "Avoid recent years",
            Self::AvoidYearsAssociatedWithYou => "Avoid years that are associated with you",
            Self::AvoidDatesAndYearsAssociatedWithYou => {
                "Avoid dates and years that are associated with you"
            }
            Self::CapitalizationDoesntHelp => "Capitalization doesn't help very much",
            Self::AllUppercaseIsAlmostAsEasy => {
                "All-uppercase is almost as easy to guess as all-lowercase"
            }
            Self::ReversedWordsArentMuchHarder => {
                "Reversed words aren't much harder to guess"
            }
            Self::PredictableSubstitutionsDontHelp => {
                "Predictable substitutions like '@' instead of 'a' don't help very much"
            }
        };
        f.write_str(text)
    }
}

/// Feedback for one evaluated password: at most one warning plus zero or
/// more suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub warning: Option<Warning>,
    pub suggestions: Vec<Suggestion>,
}

impl Feedback {
    fn empty() -> Self {
        Self {
            warning: None,
            suggestions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.warning.is_none() && self.suggestions.is_empty()
    }
}

pub(crate) fn get_feedback(score: u8, sequence: &[ScoredMatch]) -> Feedback {
    if sequence.is_empty() {
        return Feedback {
            warning: None,
            suggestions: vec![
                Suggestion::UseAFewWordsAvoidCommonPhrases,
                Suggestion::NoNeedForSymbolsDigitsOrUppercase,
            ],
        };
    }

    if score > 2 {
        return Feedback::empty();
    }

    // The longest token is the pattern most worth fixing
    let mut longest = &sequence[0];
    for sm in &sequence[1..] {
        if sm.inner.len() > longest.inner.len() {
            longest = sm;
        }
    }

    let mut feedback = match_feedback(longest, sequence.len() == 1);
    feedback
        .suggestions
        .insert(0, Suggestion::AddAnotherWordOrTwo);
    feedback
}

fn match_feedback(sm: &ScoredMatch, sole_match: bool) -> Feedback {
    match &sm.inner.kind {
        MatchKind::Dictionary(d) => dictionary_feedback(sm, d, sole_match),
        MatchKind::Spatial(d) => Feedback {
            warning: Some(if d.turns == 1 {
                Warning::StraightRowsOfKeys
            } else {
                Warning::ShortKeyboardPatterns
            }),
            suggestions: vec![Suggestion::UseALongerKeyboardPattern],
        },
        MatchKind::Repeat(d) => Feedback {
            warning: Some(if d.base_token.chars().count() == 1 {
                Warning::RepeatsLikeAaa
            } else {
                Warning::RepeatsLikeAbcabc
            }),
            suggestions: vec![Suggestion::AvoidRepeatedWordsAndCharacters],
        },
        MatchKind::Sequence(_) => Feedback {
            warning: Some(Warning::SequencesLikeAbc),
            suggestions: vec![Suggestion::AvoidSequences],
        },
        MatchKind::Regex(d) if d.name == "recent_year" => Feedback {
            warning: Some(Warning::RecentYears),
            suggestions: vec![
                Suggestion::AvoidRecentYears,
                Suggestion::AvoidYearsAssociatedWithYou,
            ],
        },
        MatchKind::Date(_) => Feedback {
            warning: Some(Warning::Dates),
            suggestions: vec![Suggestion::AvoidDatesAndYearsAssociatedWithYou],
        },
        MatchKind::Regex(_) | MatchKind::BruteForce => Feedback::empty(),
    }
}

fn dictionary_feedback(sm: &ScoredMatch, d: &DictionaryDetail, sole_match: bool) -> Feedback {
    let warning = match d.dictionary.as_str() {
        "passwords" => {
            if sole_match && !d.l33t && !d.reversed {
                if d.rank <= 10 {
                    Some(Warning::Top10Passwords)
                } else if d.rank <= 100 {
                    Some(Warning::Top100Passwords)
                } else {
                    Some(Warning::VeryCommonPassword)
                }
            } else if sm.guesses.log10() <= 4.0 {
                Some(Warning::SimilarToCommonPassword)
            } else {
                None
            }
        }
        "english" => sole_match.then_some(Warning::WordByItself),
        "names" => Some(if sole_match {
            Warning::NamesByThemselves
        } else {
            Warning::CommonNames
        }),
        _ => None,
    };

    let token = &sm.inner.token;
    let mut suggestions = Vec::new();
    if token.chars().next().is_some_and(|c| c.is_uppercase())
        && token.chars().skip(1).all(|c| !c.is_uppercase())
    {
        suggestions.push(Suggestion::CapitalizationDoesntHelp);
    }
    if token.chars().any(|c| c.is_uppercase()) && !token.chars().any(|c| c.is_lowercase()) {
        suggestions.push(Suggestion::AllUppercaseIsAlmostAsEasy);
    }
    if d.reversed && sm.inner.len() >= 4 {
        suggestions.push(Suggestion::ReversedWordsArentMuchHarder);
    }
    if d.l33t {
        suggestions.push(Suggestion::PredictableSubstitutionsDontHelp);
    }

    Feedback {
        warning,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{Match, MatchKind, SpatialDetail};
    use std::collections::BTreeMap;

    fn dictionary_match(
        token: &str,
        dictionary: &str,
        rank: usize,
        guesses: f64,
    ) -> ScoredMatch {
        ScoredMatch {
            inner: Match::new(
                0,
                token.chars().count() - 1,
                token.to_string(),
                MatchKind::Dictionary(DictionaryDetail {
                    dictionary: dictionary.to_string(),
                    word: token.to_lowercase(),
                    rank,
                    reversed: false,
                    l33t: false,
                    substitutions: BTreeMap::new(),
                }),
            ),
            guesses,
        }
    }

    #[test]
    fn test_empty_sequence_gets_default_advice() {
        let feedback = get_feedback(0, &[]);
        assert!(feedback.warning.is_none());
        assert_eq!(
            feedback.suggestions,
            vec![
                Suggestion::UseAFewWordsAvoidCommonPhrases,
                Suggestion::NoNeedForSymbolsDigitsOrUppercase,
            ]
        );
    }

    #[test]
    fn test_strong_password_gets_no_feedback() {
        let sm = dictionary_match("password", "passwords", 2, 2.0);
        let feedback = get_feedback(3, &[sm]);
        assert!(feedback.is_empty());
    }

    #[test]
    fn test_top10_password() {
        let sm = dictionary_match("password", "passwords", 2, 2.0);
        let feedback = get_feedback(0, &[sm]);
        assert_eq!(feedback.warning, Some(Warning::Top10Passwords));
        assert_eq!(feedback.suggestions, vec![Suggestion::AddAnotherWordOrTwo]);
    }

    #[test]
    fn test_top100_password() {
        let sm = dictionary_match("letmein", "passwords", 50, 50.0);
        let feedback = get_feedback(0, &[sm]);
        assert_eq!(feedback.warning, Some(Warning::Top100Passwords));
    }

    #[test]
    fn test_common_password_not_sole_match() {
        let a = dictionary_match("password", "passwords", 2, 2.0);
        let b = dictionary_match("qwerty", "passwords", 5, 5.0);
        let feedback = get_feedback(1, &[a, b]);
        // not a sole match, but cheap enough to resemble a common password
        assert_eq!(feedback.warning, Some(Warning::SimilarToCommonPassword));
    }

    #[test]
    fn test_word_by_itself() {
        let sm = dictionary_match("board", "english", 40, 40.0);
        let feedback = get_feedback(1, &[sm]);
        assert_eq!(feedback.warning, Some(Warning::WordByItself));
    }

    #[test]
    fn test_capitalization_suggestion() {
        let sm = dictionary_match("Password", "passwords", 2, 4.0);
        let feedback = get_feedback(0, &[sm]);
        assert!(feedback
            .suggestions
            .contains(&Suggestion::CapitalizationDoesntHelp));
    }

    #[test]
    fn test_all_uppercase_suggestion() {
        let sm = dictionary_match("PASSWORD", "passwords", 2, 4.0);
        let feedback = get_feedback(0, &[sm]);
        assert!(feedback
            .suggestions
            .contains(&Suggestion::AllUppercaseIsAlmostAsEasy));
    }

    #[test]
    fn test_spatial_feedback() {
        let sm = ScoredMatch {
            inner: Match::new(
                0,
                3,
                "asdf".to_string(),
                MatchKind::Spatial(SpatialDetail {
                    graph: "qwerty".to_string(),
                    turns: 1,
                    shifted_count: 0,
                }),
            ),
            guesses: 100.0,
        };
        let feedback = get_feedback(0, &[sm]);
        assert_eq!(feedback.warning, Some(Warning::StraightRowsOfKeys));
        assert!(feedback
            .suggestions
            .contains(&Suggestion::UseALongerKeyboardPattern));
    }

    #[test]
    fn test_brute_force_only_suggests_more_words() {
        let sm = ScoredMatch {
            inner: Match::new(0, 3, "zq!9".to_string(), MatchKind::BruteForce),
            guesses: 10_000.0,
        };
        let feedback = get_feedback(1, &[sm]);
        assert!(feedback.warning.is_none());
        assert_eq!(feedback.suggestions, vec![Suggestion::AddAnotherWordOrTwo]);
    }

    #[test]
    fn test_longest_match_drives_feedback() {
        let short = ScoredMatch {
            inner: Match::new(0, 2, "zq!".to_string(), MatchKind::BruteForce),
            guesses: 1000.0,
        };
        let long = dictionary_match("password", "passwords", 2, 2.0);
        let mut long = long;
        long.inner.start = 3;
        long.inner.end = 10;
        let feedback = get_feedback(1, &[short, long]);
        assert_eq!(feedback.warning, Some(Warning::SimilarToCommonPassword));
    }
}
