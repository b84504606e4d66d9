//! Spatial (keyboard run) matching
//!
//! Detects runs of adjacent keys on the known keyboard layouts (e.g. "zxcvbn"
//! or "78523" on a keypad), tracking direction changes and shifted
//! characters.

use super::keyboard::KeyboardGraph;
use super::{Match, MatchKind, Password, SpatialDetail};

// Characters that require shift on an ANSI layout. Only meaningful for the
// qwerty and dvorak graphs.
const SHIFTED_CHARS: &str = "~!@#$%^&*()_+QWERTYUIOP{}|ASDFGHJKL:\"ZXCVBNM<>?";

pub(crate) fn matches(graphs: &[KeyboardGraph], password: &Password) -> Vec<Match> {
    let mut result = Vec::new();
    for graph in graphs {
        result.extend(graph_matches(graph, password));
    }
    result.sort_by_key(|m| (m.start, m.end));
    result
}

fn graph_matches(graph: &KeyboardGraph, password: &Password) -> Vec<Match> {
    let mut result = Vec::new();
    let chars = password.chars();
    let n = chars.len();
    let tracks_shift = graph.name() == "qwerty" || graph.name() == "dvorak";

    let mut i = 0;
    while n > 0 && i < n - 1 {
        let mut turns = 0;
        let mut shifted_count = 0;
        let mut last_direction: Option<usize> = None;
        let mut j = i + 1;

        if tracks_shift && SHIFTED_CHARS.contains(chars[i]) {
            shifted_count = 1;
        }

        loop {
            let prev = chars[j - 1];
            let mut found = false;

            if j < n {
                let current = chars[j];
                if let Some(neighbors) = graph.neighbors(prev) {
                    for (direction, neighbor) in neighbors.iter().enumerate() {
                        let Some(cell) = neighbor else { continue };
                        if let Some(position) = cell.chars().position(|c| c == current) {
                            found = true;
                            // Second character of a cell is the shifted form
                            if position == 1 {
                                shifted_count += 1;
                            }
                            if last_direction != Some(direction) {
                                turns += 1;
                                last_direction = Some(direction);
                            }
                            break;
                        }
                    }
                }
            }

            if found {
                j += 1;
            } else {
                // Runs of length <= 2 are not meaningful spatial patterns
                if j - i > 2 {
                    result.push(Match::new(
                        i,
                        j - 1,
                        password.token(i, j - 1),
                        MatchKind::Spatial(SpatialDetail {
                            graph: graph.name().to_string(),
                            turns,
                            shifted_count,
                        }),
                    ));
                }
                i = j;
                break;
            }
        }
    }

    result
}
