//! Repeat matching
//!
//! Detects blocks made of a repeated base token ("aaa", "abcabcabc"). The
//! base token is itself decomposed through the full matcher suite so that
//! "passwordpassword" costs the word's guesses times two, not a brute-force
//! of the whole span.

use crate::scoring;

use super::{Match, MatchKind, MatcherSet, Password, RepeatDetail};

pub(crate) fn matches(set: &MatcherSet, password: &Password) -> Vec<Match> {
    let chars = password.chars();
    let n = chars.len();
    let mut result = Vec::new();

    let mut scan_from = 0;
    while scan_from < n {
        let Some((start, token_len, base_len)) = find_repeat(chars, scan_from) else {
            break;
        };
        let end = start + token_len - 1;
        let base_token: String = chars[start..start + base_len].iter().collect();

        // Decompose the base token on its own; the additive fragmentation
        // penalty is excluded so it is not double-counted when the repeat
        // estimator multiplies by the repeat count.
        let base_analysis = scoring::most_guessable_match_sequence(
            &Password::new(&base_token),
            set.matches(&base_token),
            set.scoring(),
            true,
        );

        result.push(Match::new(
            start,
            end,
            password.token(start, end),
            MatchKind::Repeat(RepeatDetail {
                base_token,
                base_guesses: base_analysis.guesses,
                base_matches: base_analysis.sequence,
                repeat_count: token_len / base_len,
            }),
        ));

        scan_from = end + 1;
    }

    result
}

/// Finds the leftmost repeated block at or after `from`, mirroring the
/// greedy-vs-lazy scan of `(.+)\1+` against `(.+?)\1+`: the lazy form takes
/// the shortest qualifying base, the greedy form the longest, and the greedy
/// result wins only when its overall span is strictly longer. Returns
/// `(start, span_length, base_length)`.
fn find_repeat(chars: &[char], from: usize) -> Option<(usize, usize, usize)> {
    let n = chars.len();
    for i in from..n {
        let remaining = n - i;
        if remaining < 2 {
            break;
        }

        let mut lazy: Option<(usize, usize)> = None;
        let mut greedy: Option<(usize, usize)> = None;

        for base_len in 1..=remaining / 2 {
            let reps = repetitions(chars, i, base_len);
            if reps >= 2 {
                let span = base_len * reps;
                if lazy.is_none() {
                    lazy = Some((base_len, span));
                }
                greedy = Some((base_len, span));
            }
        }

        if let (Some((lazy_base, lazy_span)), Some((_, greedy_span))) = (lazy, greedy) {
            if greedy_span > lazy_span {
                // The greedy span may repeat a longer unit; its true base is
                // the shortest prefix that exactly tiles it
                let base_len = shortest_tiling_prefix(&chars[i..i + greedy_span]);
                return Some((i, greedy_span, base_len));
            }
            return Some((i, lazy_span, lazy_base));
        }
    }
    None
}

/// Number of consecutive copies of `chars[i..i + base_len]` starting at `i`.
fn repetitions(chars: &[char], i: usize, base_len: usize) -> usize {
    let mut reps = 1;
    while i + (reps + 1) * base_len <= chars.len()
        && chars[i + reps * base_len..i + (reps + 1) * base_len] == chars[i..i + base_len]
    {
        reps += 1;
    }
    reps
}

/// Length of the shortest prefix whose repetition exactly composes `token`.
fn shortest_tiling_prefix(token: &[char]) -> usize {
    let n = token.len();
    for base_len in 1..=n / 2 {
        if n % base_len != 0 {
            continue;
        }
        if token.chunks(base_len).all(|chunk| chunk == &token[..base_len]) {
            return base_len;
        }
    }
    n
}
