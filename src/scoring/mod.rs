//! Guess scoring
//!
//! Searches for the non-overlapping match sequence that covers the whole
//! password at the lowest total guess count, modelling an attacker who knows
//! every pattern class. Unmatched gaps are filled with brute-force segments.

pub(crate) mod estimate;

use std::collections::BTreeMap;

use crate::matching::{Match, MatchKind, Password};

use estimate::ScoringContext;

/// Total guesses for a fragmented attack grow with the number of pieces;
/// below this count the sequence length penalty is waived.
const MIN_GUESSES_BEFORE_GROWING_SEQUENCE: f64 = 10_000.0;

/// A match annotated with its estimated guess count.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub inner: Match,
    pub guesses: f64,
}

/// The optimal decomposition of a password: the cheapest full-coverage match
/// sequence and its total guess count.
#[derive(Debug, Clone)]
pub(crate) struct Decomposition {
    pub(crate) guesses: f64,
    pub(crate) sequence: Vec<ScoredMatch>,
}

#[derive(Clone)]
struct Candidate {
    scored: ScoredMatch,
    /// Product of the guess estimates along the sequence ending here.
    product: f64,
    /// Overall guesses including length penalties.
    total: f64,
}

/// Finds the cheapest sequence of non-overlapping matches covering every
/// character of the password.
///
/// Dynamic program over end positions: for each prefix and each sequence
/// length, the best candidate is kept in a sparse per-endpoint table, and
/// dominated entries (longer and costlier) are pruned. Total cost for a
/// sequence of length `l` with per-match estimates `g_i` is
/// `l! * Π g_i + 10000^(l - 1)`; `exclude_additive` drops the second term,
/// which repeat-base scoring uses to avoid double-counting the penalty.
pub(crate) fn most_guessable_match_sequence(
    password: &Password,
    matches: Vec<Match>,
    ctx: &ScoringContext,
    exclude_additive: bool,
) -> Decomposition {
    let n = password.len();
    if n == 0 {
        return Decomposition {
            guesses: 1.0,
            sequence: Vec::new(),
        };
    }

    let mut by_end: Vec<Vec<Match>> = vec![Vec::new(); n];
    for m in matches {
        by_end[m.end].push(m);
    }

    // optimal[k]: sequence length -> best candidate covering password[0..=k]
    let mut optimal: Vec<BTreeMap<usize, Candidate>> = vec![BTreeMap::new(); n];

    for k in 0..n {
        for m in &by_end[k] {
            let guesses = estimate::estimate_guesses(m, n, ctx);
            if m.start > 0 {
                let lengths: Vec<usize> = optimal[m.start - 1].keys().copied().collect();
                for l in lengths {
                    update(&mut optimal, &m, guesses, l + 1, exclude_additive);
                }
            } else {
                update(&mut optimal, &m, guesses, 1, exclude_additive);
            }
        }

        // Fill every remaining gap ending at k with a brute-force segment.
        // Chaining brute-force after brute-force is never cheaper than one
        // wider segment, so those extensions are skipped.
        let bf = brute_force_match(password, 0, k);
        let guesses = estimate::estimate_guesses(&bf, n, ctx);
        update(&mut optimal, &bf, guesses, 1, exclude_additive);

        for i in 1..=k {
            let bf = brute_force_match(password, i, k);
            let guesses = estimate::estimate_guesses(&bf, n, ctx);
            let lengths: Vec<usize> = optimal[i - 1]
                .iter()
                .filter(|(_, c)| !matches!(c.scored.inner.kind, MatchKind::BruteForce))
                .map(|(&l, _)| l)
                .collect();
            for l in lengths {
                update(&mut optimal, &bf, guesses, l + 1, exclude_additive);
            }
        }
    }

    unwind(&optimal, n)
}

fn update(
    optimal: &mut [BTreeMap<usize, Candidate>],
    m: &Match,
    guesses: f64,
    l: usize,
    exclude_additive: bool,
) {
    let mut product = guesses;
    if l > 1 {
        match optimal[m.start - 1].get(&(l - 1)) {
            Some(prev) => product *= prev.product,
            None => return,
        }
    }

    let mut total = factorial(l) * product;
    if !exclude_additive {
        total += MIN_GUESSES_BEFORE_GROWING_SEQUENCE.powi(l as i32 - 1);
    }

    // Dominated by a shorter-or-equal sequence that is also cheaper
    for (&competing_l, competing) in &optimal[m.end] {
        if competing_l > l {
            continue;
        }
        if competing.total <= total {
            return;
        }
    }

    optimal[m.end].insert(
        l,
        Candidate {
            scored: ScoredMatch {
                inner: m.clone(),
                guesses,
            },
            product,
            total,
        },
    );
}

fn unwind(optimal: &[BTreeMap<usize, Candidate>], n: usize) -> Decomposition {
    let mut sequence = Vec::new();

    // The brute-force fill guarantees at least one candidate per endpoint
    let Some((&best_l, best)) = optimal[n - 1]
        .iter()
        .min_by(|a, b| a.1.total.total_cmp(&b.1.total))
    else {
        return Decomposition {
            guesses: 1.0,
            sequence,
        };
    };
    let guesses = best.total;

    let mut k = n - 1;
    let mut l = best_l;
    while let Some(candidate) = optimal[k].get(&l) {
        sequence.push(candidate.scored.clone());
        if candidate.scored.inner.start == 0 || l == 1 {
            break;
        }
        k = candidate.scored.inner.start - 1;
        l -= 1;
    }
    sequence.reverse();

    Decomposition { guesses, sequence }
}

fn brute_force_match(password: &Password, start: usize, end: usize) -> Match {
    Match::new(
        start,
        end,
        password.token(start, end),
        MatchKind::BruteForce,
    )
}

fn factorial(n: usize) -> f64 {
    (2..=n).fold(1.0, |acc, i| acc * i as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::keyboard::built_in_graphs;
    use crate::matching::{DictionaryDetail, MatcherSet};
    use crate::wordlists::RankedDictionary;

    fn ctx() -> ScoringContext {
        ScoringContext::new(&built_in_graphs(), 2026)
    }

    fn decompose(password: &str, dictionaries: Vec<RankedDictionary>) -> Decomposition {
        let set = MatcherSet::new(dictionaries, built_in_graphs(), 2026);
        let matches = set.matches(password);
        most_guessable_match_sequence(&Password::new(password), matches, &ctx(), false)
    }

    fn assert_tiling(password: &str, decomposition: &Decomposition) {
        let n = password.chars().count();
        let mut expected_start = 0;
        for sm in &decomposition.sequence {
            assert_eq!(sm.inner.start, expected_start);
            expected_start = sm.inner.end + 1;
        }
        assert_eq!(expected_start, n);
    }

    #[test]
    fn test_empty_password() {
        let d = most_guessable_match_sequence(&Password::new(""), Vec::new(), &ctx(), false);
        assert_eq!(d.guesses, 1.0);
        assert!(d.sequence.is_empty());
    }

    #[test]
    fn test_no_matches_yields_single_brute_force() {
        let d = most_guessable_match_sequence(
            &Password::new("zq!9"),
            Vec::new(),
            &ctx(),
            false,
        );
        assert_eq!(d.sequence.len(), 1);
        assert!(matches!(d.sequence[0].inner.kind, MatchKind::BruteForce));
        // 10^4 plus the additive term 10000^0
        assert_eq!(d.guesses, 10_001.0);
        assert_tiling("zq!9", &d);
    }

    #[test]
    fn test_single_dictionary_word() {
        let d = decompose(
            "password",
            vec![RankedDictionary::from_words("words", ["password"])],
        );
        assert_eq!(d.sequence.len(), 1);
        match &d.sequence[0].inner.kind {
            MatchKind::Dictionary(DictionaryDetail { rank, .. }) => assert_eq!(*rank, 1),
            other => panic!("unexpected kind: {other:?}"),
        }
        // rank 1 plus the additive term 10000^0
        assert_eq!(d.guesses, 2.0);
        assert_tiling("password", &d);
    }

    #[test]
    fn test_word_with_brute_force_residue() {
        let d = decompose(
            "zq!password",
            vec![RankedDictionary::from_words("words", ["password"])],
        );
        assert_tiling("zq!password", &d);
        assert!(d
            .sequence
            .iter()
            .any(|sm| matches!(sm.inner.kind, MatchKind::BruteForce)));
        assert!(d
            .sequence
            .iter()
            .any(|sm| matches!(sm.inner.kind, MatchKind::Dictionary(_))));
    }

    #[test]
    fn test_prefers_single_match_over_fragments() {
        // "motherboard" should decompose as one word, not mother + board,
        // because fragmentation multiplies costs
        let d = decompose(
            "motherboard",
            vec![RankedDictionary::from_words(
                "words",
                ["motherboard", "mother", "board"],
            )],
        );
        assert_eq!(d.sequence.len(), 1);
        assert_eq!(d.sequence[0].inner.token, "motherboard");
        assert_tiling("motherboard", &d);
    }

    #[test]
    fn test_two_words_cheaper_than_brute_force() {
        let d = decompose(
            "correcthorse",
            vec![RankedDictionary::from_words("words", ["correct", "horse"])],
        );
        assert_eq!(d.sequence.len(), 2);
        assert_eq!(d.sequence[0].inner.token, "correct");
        assert_eq!(d.sequence[1].inner.token, "horse");
        // l=2: 2! * 50 * 50 + 10000
        assert_eq!(d.guesses, 15_000.0);
        assert_tiling("correcthorse", &d);
    }

    #[test]
    fn test_exclude_additive_drops_penalty() {
        let set = MatcherSet::new(
            vec![RankedDictionary::from_words("words", ["correct", "horse"])],
            built_in_graphs(),
            2026,
        );
        let matches = set.matches("correcthorse");
        let d = most_guessable_match_sequence(
            &Password::new("correcthorse"),
            matches,
            &ctx(),
            true,
        );
        assert_eq!(d.guesses, 5_000.0);
    }

    #[test]
    fn test_longer_passwords_not_cheaper() {
        let words = vec![RankedDictionary::from_words("words", ["password"])];
        let short = decompose("password", words.clone());
        let long = decompose("password1991", words);
        assert!(long.guesses >= short.guesses);
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0), 1.0);
        assert_eq!(factorial(1), 1.0);
        assert_eq!(factorial(4), 24.0);
    }
}
