//! Sequence matching
//!
//! Detects runs whose consecutive character codes differ by a constant delta
//! (abcd, 9753, zyxw). Small deltas up to 5 are considered; a two-character
//! run only counts when the delta is exactly 1.

use super::{Match, MatchKind, Password, SequenceDetail};

const MAX_DELTA: i64 = 5;

pub(crate) fn matches(password: &Password) -> Vec<Match> {
    let chars = password.chars();
    let n = chars.len();
    if n <= 1 {
        return Vec::new();
    }

    let mut result = Vec::new();

    let mut update = |i: usize, j: usize, delta: i64| {
        if j - i <= 1 && delta.abs() != 1 {
            return;
        }
        if delta == 0 || delta.abs() > MAX_DELTA {
            return;
        }

        let token = password.token(i, j);
        let (name, space) = classify(&token);

        result.push(Match::new(
            i,
            j,
            token,
            MatchKind::Sequence(SequenceDetail {
                ascending: delta > 0,
                name,
                space,
            }),
        ));
    };

    let mut i = 0;
    let mut last_delta: Option<i64> = None;

    for k in 1..n {
        let delta = chars[k] as i64 - chars[k - 1] as i64;
        let last = *last_delta.get_or_insert(delta);
        if delta == last {
            continue;
        }

        // Close the current run; the boundary character becomes the start of
        // the next one, so overlaps like "abcba" yield two runs
        let j = k - 1;
        update(i, j, last);
        i = j;
        last_delta = Some(delta);
    }

    if let Some(last) = last_delta {
        update(i, n - 1, last);
    }

    result
}

fn classify(token: &str) -> (&'static str, usize) {
    if token.chars().all(|c| c.is_ascii_lowercase()) {
        ("lower", 26)
    } else if token.chars().all(|c| c.is_ascii_uppercase()) {
        ("upper", 26)
    } else if token.chars().all(|c| c.is_ascii_digit()) {
        ("digits", 10)
    } else {
        ("unicode", 26)
    }
}
