//! Per-match guess estimators
//!
//! Each estimator answers one question: how many guesses would an attacker
//! who knows about this pattern class need to reach this token? Estimates
//! are deliberately conservative lower bounds.

use crate::matching::keyboard::KeyboardGraph;
use crate::matching::{DictionaryDetail, Match, MatchKind, SpatialDetail};

const BRUTE_FORCE_CARDINALITY: f64 = 10.0;
const MIN_SUBMATCH_GUESSES_SINGLE_CHAR: f64 = 10.0;
const MIN_SUBMATCH_GUESSES_MULTI_CHAR: f64 = 50.0;
const MIN_YEAR_SPACE: i32 = 20;

// Fallbacks when a layout is not registered
const KEYBOARD_KEY_COUNT: f64 = 94.0;
const KEYBOARD_AVERAGE_DEGREE: f64 = 4.596;
const KEYPAD_KEY_COUNT: f64 = 15.0;
const KEYPAD_AVERAGE_DEGREE: f64 = 5.067;

/// Layout statistics and the reference year, captured once at meter build
/// time so estimators need no access to the graphs themselves.
#[derive(Debug, Clone)]
pub(crate) struct ScoringContext {
    keyboard_key_count: f64,
    keyboard_average_degree: f64,
    keypad_key_count: f64,
    keypad_average_degree: f64,
    reference_year: i32,
}

impl ScoringContext {
    pub(crate) fn new(graphs: &[KeyboardGraph], reference_year: i32) -> Self {
        let stats = |name: &str, fallback: (f64, f64)| {
            graphs
                .iter()
                .find(|g| g.name() == name)
                .map(|g| (g.key_count() as f64, g.average_degree()))
                .unwrap_or(fallback)
        };
        let (keyboard_key_count, keyboard_average_degree) =
            stats("qwerty", (KEYBOARD_KEY_COUNT, KEYBOARD_AVERAGE_DEGREE));
        let (keypad_key_count, keypad_average_degree) =
            stats("keypad", (KEYPAD_KEY_COUNT, KEYPAD_AVERAGE_DEGREE));
        Self {
            keyboard_key_count,
            keyboard_average_degree,
            keypad_key_count,
            keypad_average_degree,
            reference_year,
        }
    }

    pub(crate) fn reference_year(&self) -> i32 {
        self.reference_year
    }
}

/// Estimated guesses for a single match, floored so that a sub-match can
/// never be cheaper than the trivial effort of trying it directly.
pub(crate) fn estimate_guesses(m: &Match, password_len: usize, ctx: &ScoringContext) -> f64 {
    let guesses = match &m.kind {
        MatchKind::Dictionary(d) => dictionary_guesses(&m.token, d),
        MatchKind::Spatial(d) => spatial_guesses(m.len(), d, ctx),
        MatchKind::Sequence(d) => sequence_guesses(&m.token, d.ascending),
        MatchKind::Repeat(d) => d.base_guesses * d.repeat_count as f64,
        MatchKind::Date(d) => {
            let year_space = (d.year - ctx.reference_year).abs().max(MIN_YEAR_SPACE) as f64;
            let guesses = year_space * 365.0;
            if d.separator.is_empty() {
                guesses
            } else {
                guesses * 4.0
            }
        }
        MatchKind::Regex(d) => match d.name {
            "recent_year" => {
                let year: i32 = m.token.parse().unwrap_or(ctx.reference_year);
                (year - ctx.reference_year).abs().max(MIN_YEAR_SPACE) as f64
            }
            name => unreachable!("no estimator registered for regex pattern {name:?}"),
        },
        MatchKind::BruteForce => BRUTE_FORCE_CARDINALITY.powi(m.len() as i32),
    };

    let min_guesses = if m.len() < password_len {
        if m.len() == 1 {
            MIN_SUBMATCH_GUESSES_SINGLE_CHAR
        } else {
            MIN_SUBMATCH_GUESSES_MULTI_CHAR
        }
    } else {
        1.0
    };

    guesses.max(min_guesses)
}

fn dictionary_guesses(token: &str, d: &DictionaryDetail) -> f64 {
    let reversed_factor = if d.reversed { 2.0 } else { 1.0 };
    d.rank as f64 * uppercase_variations(token) * l33t_variations(token, d) * reversed_factor
}

/// Multiplier for the capitalizations an attacker must try. First-letter,
/// last-letter and all-caps forms are common enough to cost a single bit;
/// anything else costs the number of ways to place that many uppercase
/// letters among the cased positions.
fn uppercase_variations(token: &str) -> f64 {
    let upper = token.chars().filter(|c| c.is_uppercase()).count();
    if upper == 0 {
        return 1.0;
    }

    let chars: Vec<char> = token.chars().collect();
    let first_upper_rest_not =
        chars[0].is_uppercase() && chars[1..].iter().all(|c| !c.is_uppercase());
    let last_upper_rest_not = chars[chars.len() - 1].is_uppercase()
        && chars[..chars.len() - 1].iter().all(|c| !c.is_uppercase());
    let no_lowercase = chars.iter().all(|c| !c.is_lowercase());
    if (chars.len() > 1 && (first_upper_rest_not || last_upper_rest_not)) || no_lowercase {
        return 2.0;
    }

    let lower = token.chars().filter(|c| c.is_lowercase()).count();
    let mut variations = 0.0;
    for i in 1..=upper.min(lower) {
        variations += binomial(upper + lower, i);
    }
    variations.max(1.0)
}

/// Multiplier for the substitution patterns an attacker must try over the
/// token's substituted and unsubstituted positions.
fn l33t_variations(token: &str, d: &DictionaryDetail) -> f64 {
    if !d.l33t {
        return 1.0;
    }

    let lower: Vec<char> = token
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect();
    let mut variations = 1.0;
    for (&subbed, &unsubbed) in &d.substitutions {
        let subbed_count = lower.iter().filter(|&&c| c == subbed).count();
        let unsubbed_count = lower.iter().filter(|&&c| c == unsubbed).count();
        if subbed_count == 0 || unsubbed_count == 0 {
            // Fully substituted (or fully not): a single flip covers it
            variations *= 2.0;
        } else {
            let mut possibilities = 0.0;
            for i in 1..=subbed_count.min(unsubbed_count) {
                possibilities += binomial(subbed_count + unsubbed_count, i);
            }
            variations *= possibilities;
        }
    }
    variations
}

fn spatial_guesses(token_len: usize, d: &SpatialDetail, ctx: &ScoringContext) -> f64 {
    let (starts, degree) = if d.graph == "qwerty" || d.graph == "dvorak" {
        (ctx.keyboard_key_count, ctx.keyboard_average_degree)
    } else {
        (ctx.keypad_key_count, ctx.keypad_average_degree)
    };

    // Sum over run lengths and turn counts up to the observed ones
    let mut guesses = 0.0;
    for i in 2..=token_len {
        let possible_turns = d.turns.min(i - 1);
        for j in 1..=possible_turns {
            guesses += binomial(i - 1, j - 1) * starts * degree.powi(j as i32);
        }
    }

    if d.shifted_count > 0 {
        let shifted = d.shifted_count;
        let unshifted = token_len - shifted;
        if unshifted == 0 {
            guesses *= 2.0;
        } else {
            let mut variations = 0.0;
            for i in 1..=shifted.min(unshifted) {
                variations += binomial(shifted + unshifted, i);
            }
            guesses *= variations;
        }
    }

    guesses
}

fn sequence_guesses(token: &str, ascending: bool) -> f64 {
    let first = token.chars().next().unwrap_or('\0');

    // Obvious starting points are cheap; other starts cost the class size
    let base = if matches!(first, 'a' | 'A' | 'z' | 'Z' | '0' | '1' | '9') {
        4.0
    } else if first.is_ascii_digit() {
        10.0
    } else {
        26.0
    };

    let direction_factor = if ascending { 1.0 } else { 2.0 };
    base * token.chars().count() as f64 * direction_factor
}

pub(crate) fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0;
    for i in 0..k {
        result *= (n - i) as f64 / (i + 1) as f64;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::keyboard::built_in_graphs;
    use crate::matching::{DateDetail, RegexDetail, SequenceDetail};
    use std::collections::BTreeMap;

    fn ctx() -> ScoringContext {
        ScoringContext::new(&built_in_graphs(), 2026)
    }

    fn dictionary_detail(rank: usize) -> DictionaryDetail {
        DictionaryDetail {
            dictionary: "words".to_string(),
            word: String::new(),
            rank,
            reversed: false,
            l33t: false,
            substitutions: BTreeMap::new(),
        }
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(5, 0), 1.0);
        assert_eq!(binomial(5, 1), 5.0);
        assert_eq!(binomial(5, 2), 10.0);
        assert_eq!(binomial(5, 5), 1.0);
        assert_eq!(binomial(3, 5), 0.0);
    }

    #[test]
    fn test_uppercase_variations() {
        assert_eq!(uppercase_variations("password"), 1.0);
        assert_eq!(uppercase_variations("Password"), 2.0);
        assert_eq!(uppercase_variations("passworD"), 2.0);
        assert_eq!(uppercase_variations("PASSWORD"), 2.0);
        // two uppercase among eight letters: C(8,1) + C(8,2)
        assert_eq!(uppercase_variations("paSsWord"), 8.0 + 28.0);
    }

    #[test]
    fn test_l33t_variations() {
        let plain = dictionary_detail(1);
        assert_eq!(l33t_variations("password", &plain), 1.0);

        let detail = DictionaryDetail {
            l33t: true,
            substitutions: BTreeMap::from([('@', 'a')]),
            ..dictionary_detail(1)
        };
        // one '@' and no remaining 'a': single flip
        assert_eq!(l33t_variations("p@ssword", &detail), 2.0);

        let detail = DictionaryDetail {
            l33t: true,
            substitutions: BTreeMap::from([('4', 'a')]),
            ..dictionary_detail(1)
        };
        // one '4' and one 'a' both present: C(2,1)
        assert_eq!(l33t_variations("4batr", &detail), 2.0);
    }

    #[test]
    fn test_dictionary_guesses_rank_and_case() {
        let m = Match::new(
            0,
            7,
            "Password".to_string(),
            MatchKind::Dictionary(dictionary_detail(2)),
        );
        assert_eq!(estimate_guesses(&m, 8, &ctx()), 4.0);
    }

    #[test]
    fn test_reversed_doubles() {
        let detail = DictionaryDetail {
            reversed: true,
            ..dictionary_detail(5)
        };
        let m = Match::new(0, 7, "drowssap".to_string(), MatchKind::Dictionary(detail));
        assert_eq!(estimate_guesses(&m, 8, &ctx()), 10.0);
    }

    #[test]
    fn test_sequence_guesses() {
        let detail = SequenceDetail {
            ascending: true,
            name: "lower",
            space: 26,
        };
        let m = Match::new(0, 3, "abcd".to_string(), MatchKind::Sequence(detail));
        // obvious start: 4 * len
        assert_eq!(estimate_guesses(&m, 4, &ctx()), 16.0);

        let detail = SequenceDetail {
            ascending: false,
            name: "digits",
            space: 10,
        };
        let m = Match::new(0, 3, "8765".to_string(), MatchKind::Sequence(detail));
        // digit start, descending: 10 * len * 2
        assert_eq!(estimate_guesses(&m, 4, &ctx()), 80.0);
    }

    #[test]
    fn test_date_guesses() {
        let m = Match::new(
            0,
            7,
            "13051991".to_string(),
            MatchKind::Date(DateDetail {
                day: 13,
                month: 5,
                year: 1991,
                separator: String::new(),
            }),
        );
        assert_eq!(estimate_guesses(&m, 8, &ctx()), 35.0 * 365.0);

        let m = Match::new(
            0,
            9,
            "13/05/1991".to_string(),
            MatchKind::Date(DateDetail {
                day: 13,
                month: 5,
                year: 1991,
                separator: "/".to_string(),
            }),
        );
        assert_eq!(estimate_guesses(&m, 10, &ctx()), 35.0 * 365.0 * 4.0);
    }

    #[test]
    fn test_recent_year_guesses() {
        let m = Match::new(
            0,
            3,
            "2019".to_string(),
            MatchKind::Regex(RegexDetail {
                name: "recent_year",
            }),
        );
        // |2019 - 2026| below the minimum year space
        assert_eq!(estimate_guesses(&m, 4, &ctx()), 20.0);
    }

    #[test]
    fn test_brute_force_guesses() {
        let m = Match::new(0, 4, "zq!9x".to_string(), MatchKind::BruteForce);
        assert_eq!(estimate_guesses(&m, 5, &ctx()), 100_000.0);
    }

    #[test]
    fn test_submatch_floors() {
        // A rank-1 single char inside a longer password floors at 10
        let m = Match::new(
            0,
            0,
            "a".to_string(),
            MatchKind::Dictionary(dictionary_detail(1)),
        );
        assert_eq!(estimate_guesses(&m, 8, &ctx()), 10.0);

        // A rank-1 word inside a longer password floors at 50
        let m = Match::new(
            0,
            3,
            "word".to_string(),
            MatchKind::Dictionary(dictionary_detail(1)),
        );
        assert_eq!(estimate_guesses(&m, 8, &ctx()), 50.0);

        // The same word as the whole password keeps its rank
        assert_eq!(estimate_guesses(&m, 4, &ctx()), 1.0);
    }

    #[test]
    fn test_spatial_guesses_grow_with_turns() {
        let straight = Match::new(
            0,
            3,
            "asdf".to_string(),
            MatchKind::Spatial(SpatialDetail {
                graph: "qwerty".to_string(),
                turns: 1,
                shifted_count: 0,
            }),
        );
        let turned = Match::new(
            0,
            3,
            "asxc".to_string(),
            MatchKind::Spatial(SpatialDetail {
                graph: "qwerty".to_string(),
                turns: 3,
                shifted_count: 0,
            }),
        );
        let g_straight = estimate_guesses(&straight, 4, &ctx());
        let g_turned = estimate_guesses(&turned, 4, &ctx());
        assert!(g_turned > g_straight);
    }

    #[test]
    fn test_spatial_shift_multiplier() {
        let plain = Match::new(
            0,
            3,
            "asdf".to_string(),
            MatchKind::Spatial(SpatialDetail {
                graph: "qwerty".to_string(),
                turns: 1,
                shifted_count: 0,
            }),
        );
        let shifted = Match::new(
            0,
            3,
            "Asdf".to_string(),
            MatchKind::Spatial(SpatialDetail {
                graph: "qwerty".to_string(),
                turns: 1,
                shifted_count: 1,
            }),
        );
        let g_plain = estimate_guesses(&plain, 4, &ctx());
        let g_shifted = estimate_guesses(&shifted, 4, &ctx());
        // one shifted among four keys: C(4,1) = 4
        assert_eq!(g_shifted, g_plain * 4.0);
    }
}
