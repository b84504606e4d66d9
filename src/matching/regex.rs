//! Regex-driven matching
//!
//! Runs named regular expressions over the password. Currently the only
//! registered pattern is `recent_year`, which catches four-digit years on
//! their own; full dates are handled by the date matcher.

use std::sync::LazyLock;

use ::regex::Regex;

use super::{Match, MatchKind, Password, RegexDetail};

/// A regex with a stable name that estimators can dispatch on.
pub(crate) struct NamedPattern {
    pub(crate) name: &'static str,
    pub(crate) regex: Regex,
}

pub(crate) static RECENT_YEAR: LazyLock<NamedPattern> = LazyLock::new(|| NamedPattern {
    name: "recent_year",
    regex: Regex::new(r"19\d\d|20[0-2]\d").expect("recent_year pattern is valid"),
});

pub(crate) fn matches(pattern: &NamedPattern, password: &Password) -> Vec<Match> {
    let text: String = password.chars().iter().collect();
    let mut result = Vec::new();

    for found in pattern.regex.find_iter(&text) {
        // Regex offsets are byte positions; convert to character indices
        let start = text[..found.start()].chars().count();
        let end = start + found.as_str().chars().count() - 1;
        result.push(Match::new(
            start,
            end,
            found.as_str().to_string(),
            MatchKind::Regex(RegexDetail { name: pattern.name }),
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year_matches(password: &str) -> Vec<(usize, usize, String)> {
        matches(&RECENT_YEAR, &Password::new(password))
            .into_iter()
            .map(|m| (m.start, m.end, m.token))
            .collect()
    }

    #[test]
    fn test_bare_year() {
        assert_eq!(year_matches("1991"), vec![(0, 3, "1991".to_string())]);
        assert_eq!(year_matches("2024"), vec![(0, 3, "2024".to_string())]);
    }

    #[test]
    fn test_embedded_year() {
        assert_eq!(
            year_matches("abc2019xyz"),
            vec![(3, 6, "2019".to_string())]
        );
    }

    #[test]
    fn test_year_range_bounds() {
        assert_eq!(year_matches("1900").len(), 1);
        assert_eq!(year_matches("2029").len(), 1);
        assert!(year_matches("2030").is_empty());
        assert!(year_matches("1899").is_empty());
    }

    #[test]
    fn test_multibyte_prefix_offsets() {
        assert_eq!(year_matches("ü1999"), vec![(1, 4, "1999".to_string())]);
    }

    #[test]
    fn test_no_match() {
        assert!(year_matches("no digits here").is_empty());
        assert!(year_matches("").is_empty());
    }
}
