//! L33t substitution matching
//!
//! Applies known character substitutions (e.g. '4' or '@' for 'a') and runs
//! the dictionary matcher against each substituted form of the password, so
//! that passwords like "p4ssw0rd" are matched as their plain words.

use std::collections::{BTreeMap, BTreeSet};

use crate::wordlists::RankedDictionary;

use super::{dictionary, DictionaryDetail, Match, MatchKind, Password};

/// The fixed substitution table: plain letter -> the l33t characters that
/// commonly stand in for it.
const L33T_TABLE: &[(char, &[char])] = &[
    ('a', &['4', '@']),
    ('b', &['8']),
    ('c', &['(', '{', '[', '<']),
    ('e', &['3']),
    ('g', &['6', '9']),
    ('i', &['1', '!', '|']),
    ('l', &['1', '|', '7']),
    ('o', &['0']),
    ('s', &['$', '5']),
    ('t', &['+', '7']),
    ('x', &['%']),
    ('z', &['2']),
];

pub(crate) fn matches(dictionaries: &[RankedDictionary], password: &Password) -> Vec<Match> {
    let mut result = Vec::new();
    let mut seen: BTreeSet<(usize, usize, String, Vec<(char, char)>)> = BTreeSet::new();

    for substitution in enumerate_substitutions(&relevant_subtable(password)) {
        if substitution.is_empty() {
            continue;
        }

        let substituted: String = password
            .lower()
            .iter()
            .map(|c| substitution.get(c).copied().unwrap_or(*c))
            .collect();
        let substituted = Password::new(&substituted);

        for m in dictionary::matches(dictionaries, &substituted) {
            let token = password.token(m.start, m.end);

            // Only keep matches that actually used a substitution
            let used: BTreeMap<char, char> = substitution
                .iter()
                .filter(|(l33t_chr, _)| token.chars().any(|c| c == **l33t_chr))
                .map(|(&l33t_chr, &plain)| (l33t_chr, plain))
                .collect();
            if used.is_empty() {
                continue;
            }

            // Single characters are too ambiguous to call l33t
            if m.len() <= 1 {
                continue;
            }

            let detail = match m.kind {
                MatchKind::Dictionary(d) => d,
                _ => unreachable!("dictionary matcher emits dictionary matches"),
            };

            let key = (
                m.start,
                m.end,
                detail.word.clone(),
                used.iter().map(|(&k, &v)| (k, v)).collect(),
            );
            if !seen.insert(key) {
                continue;
            }

            result.push(Match::new(
                m.start,
                m.end,
                token,
                MatchKind::Dictionary(DictionaryDetail {
                    l33t: true,
                    substitutions: used,
                    ..detail
                }),
            ));
        }
    }

    result.sort_by_key(|m| (m.start, m.end));
    result
}

/// Restricts the substitution table to plain letters whose l33t forms
/// actually occur in the password, avoiding a combinatorial blow-up.
fn relevant_subtable(password: &Password) -> Vec<(char, Vec<char>)> {
    L33T_TABLE
        .iter()
        .filter_map(|&(letter, l33t_chars)| {
            let present: Vec<char> = l33t_chars
                .iter()
                .copied()
                .filter(|sub| password.chars().contains(sub))
                .collect();
            if present.is_empty() {
                None
            } else {
                Some((letter, present))
            }
        })
        .collect()
}

/// Enumerates every consistent assignment of l33t character to plain letter.
/// Within one assignment an l33t character maps to a single letter, but
/// different assignments may give the same character to competing letters
/// (e.g. '1' as 'i' in one assignment and 'l' in another). Deduplicated by
/// content.
fn enumerate_substitutions(table: &[(char, Vec<char>)]) -> Vec<BTreeMap<char, char>> {
    let mut subs: Vec<Vec<(char, char)>> = vec![Vec::new()];

    for (letter, l33t_chars) in table {
        let mut next_subs: Vec<Vec<(char, char)>> = Vec::new();

        for &l33t_chr in l33t_chars {
            for sub in &subs {
                match sub.iter().position(|&(lc, _)| lc == l33t_chr) {
                    None => {
                        let mut extension = sub.clone();
                        extension.push((l33t_chr, *letter));
                        next_subs.push(extension);
                    }
                    Some(dup_index) => {
                        // The character is already spoken for: keep the
                        // existing assignment and branch an alternative
                        let mut alternative = sub.clone();
                        alternative.remove(dup_index);
                        alternative.push((l33t_chr, *letter));
                        next_subs.push(sub.clone());
                        next_subs.push(alternative);
                    }
                }
            }
        }

        subs = dedup(next_subs);
    }

    subs.into_iter()
        .map(|pairs| pairs.into_iter().collect())
        .collect()
}

fn dedup(subs: Vec<Vec<(char, char)>>) -> Vec<Vec<(char, char)>> {
    let mut seen = BTreeSet::new();
    let mut result = Vec::new();
    for sub in subs {
        let mut canonical = sub.clone();
        canonical.sort_unstable();
        if seen.insert(canonical) {
            result.push(sub);
        }
    }
    result
}
