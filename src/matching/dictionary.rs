//! Dictionary matching
//!
//! Finds every substring of the password that equals a ranked dictionary
//! entry, case-insensitively. Overlapping matches are intentionally kept: a
//! longer word and the shorter words inside it may all appear, and the
//! scoring layer decides which tiling is cheapest.

use std::collections::BTreeMap;

use crate::wordlists::RankedDictionary;

use super::{DictionaryDetail, Match, MatchKind, Password};

/// Matches every substring of the password against every dictionary.
/// O(n²) substring probes with O(1) average lookups.
pub(crate) fn matches(dictionaries: &[RankedDictionary], password: &Password) -> Vec<Match> {
    let mut result = Vec::new();
    let n = password.len();

    for i in 0..n {
        for j in i..n {
            let candidate = password.token_lower(i, j);
            for dictionary in dictionaries {
                if let Some(rank) = dictionary.rank(&candidate) {
                    result.push(Match::new(
                        i,
                        j,
                        password.token(i, j),
                        MatchKind::Dictionary(DictionaryDetail {
                            dictionary: dictionary.name().to_string(),
                            word: candidate.clone(),
                            rank,
                            reversed: false,
                            l33t: false,
                            substitutions: BTreeMap::new(),
                        }),
                    ));
                }
            }
        }
    }

    result.sort_by_key(|m| (m.start, m.end));
    result
}

/// Matches the reversed password against the dictionaries, then reflects the
/// resulting matches back into forward-password coordinates.
pub(crate) fn reversed_matches(
    dictionaries: &[RankedDictionary],
    password: &Password,
) -> Vec<Match> {
    let n = password.len();
    if n == 0 {
        return Vec::new();
    }

    let reversed: String = password.chars().iter().rev().collect();
    let reversed = Password::new(&reversed);

    let mut result: Vec<Match> = matches(dictionaries, &reversed)
        .into_iter()
        .map(|m| {
            let start = n - 1 - m.end;
            let end = n - 1 - m.start;
            let detail = match m.kind {
                MatchKind::Dictionary(d) => DictionaryDetail {
                    reversed: true,
                    ..d
                },
                _ => unreachable!("dictionary matcher emits dictionary matches"),
            };
            // Re-reverse the token so it reads in forward orientation
            Match::new(
                start,
                end,
                m.token.chars().rev().collect(),
                MatchKind::Dictionary(detail),
            )
        })
        .collect();

    result.sort_by_key(|m| (m.start, m.end));
    result
}
