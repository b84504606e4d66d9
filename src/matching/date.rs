//! Date matching
//!
//! Finds substrings that read as dates, with or without separators. Digit
//! runs are split into every plausible day/month/year arrangement; the
//! arrangement whose year lies closest to the reference year wins. Date
//! matches contained entirely inside a longer date match are discarded.

use std::sync::LazyLock;

use ::regex::Regex;

use super::{DateDetail, Match, MatchKind, Password};

const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 2050;

/// Candidate field arrangement for one digit-run length: `(k, l)` splits the
/// run into `[..k]`, `[k..l]`, `[l..]`.
fn splits(len: usize) -> &'static [(usize, usize)] {
    match len {
        4 => &[(1, 2), (2, 3)],
        5 => &[(1, 3), (2, 3)],
        6 => &[(1, 2), (2, 4), (4, 5)],
        7 => &[(1, 3), (2, 3), (4, 5), (4, 6)],
        8 => &[(2, 4), (4, 6)],
        _ => &[],
    }
}

// Both separator groups are captured and compared afterwards, since the
// regex engine has no backreferences.
static SEPARATED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,4})([\s/\\_.-])(\d{1,2})([\s/\\_.-])(\d{1,4})$")
        .expect("separated date pattern is valid")
});

struct Dmy {
    day: u32,
    month: u32,
    year: i32,
}

pub(crate) fn matches(password: &Password, reference_year: i32) -> Vec<Match> {
    let mut result = Vec::new();
    let chars = password.chars();
    let n = chars.len();

    // Pure digit runs, 4 to 8 characters
    for i in 0..n {
        for j in i + 3..n.min(i + 8) {
            if !chars[i..=j].iter().all(|c| c.is_ascii_digit()) {
                break;
            }
            let token = password.token(i, j);

            let mut best: Option<Dmy> = None;
            for &(k, l) in splits(token.len()) {
                let ints = [
                    parse_int(&token[..k]),
                    parse_int(&token[k..l]),
                    parse_int(&token[l..]),
                ];
                let (Some(a), Some(b), Some(c)) = (ints[0], ints[1], ints[2]) else {
                    continue;
                };
                let Some(candidate) = map_ints_to_dmy([a, b, c]) else {
                    continue;
                };
                let closer = best.as_ref().is_none_or(|current| {
                    (candidate.year - reference_year).abs() < (current.year - reference_year).abs()
                });
                if closer {
                    best = Some(candidate);
                }
            }

            if let Some(dmy) = best {
                result.push(date_match(i, j, token, dmy, String::new()));
            }
        }
    }

    // Separated dates, 6 to 10 characters
    for i in 0..n {
        for j in i + 5..n.min(i + 10) {
            let token = password.token(i, j);
            let Some(caps) = SEPARATED_DATE.captures(&token) else {
                continue;
            };
            if caps[2] != caps[4] {
                continue;
            }
            let ints = [
                parse_int(&caps[1]),
                parse_int(&caps[3]),
                parse_int(&caps[5]),
            ];
            let (Some(a), Some(b), Some(c)) = (ints[0], ints[1], ints[2]) else {
                continue;
            };
            if let Some(dmy) = map_ints_to_dmy([a, b, c]) {
                result.push(date_match(i, j, token.clone(), dmy, caps[2].to_string()));
            }
        }
    }

    // Drop date matches fully contained in a longer date match
    let mut filtered: Vec<Match> = result
        .iter()
        .filter(|m| {
            !result.iter().any(|other| {
                (other.start, other.end) != (m.start, m.end)
                    && other.start <= m.start
                    && other.end >= m.end
            })
        })
        .cloned()
        .collect();
    filtered.sort_by_key(|m| (m.start, m.end));
    filtered
}

fn date_match(start: usize, end: usize, token: String, dmy: Dmy, separator: String) -> Match {
    Match::new(
        start,
        end,
        token,
        MatchKind::Date(DateDetail {
            day: dmy.day,
            month: dmy.month,
            year: dmy.year,
            separator,
        }),
    )
}

fn parse_int(digits: &str) -> Option<i32> {
    digits.parse().ok()
}

/// Decides which of the three integers is the year and which pair is
/// day/month. Returns `None` when no reading forms a plausible date.
fn map_ints_to_dmy(ints: [i32; 3]) -> Option<Dmy> {
    // The middle field is a day or month in every split
    if ints[1] > 31 || ints[1] <= 0 {
        return None;
    }

    let mut over_12 = 0;
    let mut over_31 = 0;
    let mut under_1 = 0;
    for int in ints {
        if (100..MIN_YEAR).contains(&int) || int > MAX_YEAR {
            return None;
        }
        if int > 31 {
            over_31 += 1;
        }
        if int > 12 {
            over_12 += 1;
        }
        if int <= 0 {
            under_1 += 1;
        }
    }
    if over_31 >= 2 || over_12 == 3 || under_1 >= 2 {
        return None;
    }

    let year_splits = [(ints[2], [ints[0], ints[1]]), (ints[0], [ints[1], ints[2]])];

    // Prefer a field already in the four-digit year range; if it is the
    // year, the remaining pair must read as day/month or the whole token
    // is not a date
    for (year, rest) in year_splits {
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            return map_ints_to_dm(rest).map(|(day, month)| Dmy { day, month, year });
        }
    }

    for (year, rest) in year_splits {
        if let Some((day, month)) = map_ints_to_dm(rest) {
            return Some(Dmy {
                day,
                month,
                year: two_to_four_digit_year(year),
            });
        }
    }

    None
}

fn map_ints_to_dm(ints: [i32; 2]) -> Option<(u32, u32)> {
    for (day, month) in [(ints[0], ints[1]), (ints[1], ints[0])] {
        if (1..=31).contains(&day) && (1..=12).contains(&month) {
            return Some((day as u32, month as u32));
        }
    }
    None
}

fn two_to_four_digit_year(year: i32) -> i32 {
    if year > 99 {
        year
    } else if year > 50 {
        year + 1900
    } else {
        year + 2000
    }
}
