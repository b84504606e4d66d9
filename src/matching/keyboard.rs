//! Keyboard adjacency graphs
//!
//! Builds, for every character of an ASCII-art keyboard layout, an ordered
//! list of its neighbors in 6 (slanted layouts, e.g. QWERTY) or 8 (aligned
//! layouts, e.g. keypads) compass directions. Direction indices are stable,
//! so two adjacent matched characters can be compared for "same direction as
//! the previous step" when counting turns.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Keyboard layout {name:?} is empty")]
    EmptyLayout { name: String },
    #[error("Keyboard layout {name:?} is malformed: token {token:?} is not {width} characters wide")]
    MalformedLayout {
        name: String,
        token: String,
        width: usize,
    },
}

// ANSI layouts. Cells hold the base character plus its shifted form where
// one exists.
const QWERTY: &str = r#"
`~ 1! 2@ 3# 4$ 5% 6^ 7& 8* 9( 0) -_ =+
    qQ wW eE rR tT yY uU iI oO pP [{ ]} \|
     aA sS dD fF gG hH jJ kK lL ;: '"
      zZ xX cC vV bB nN mM ,< .> /?
"#;

const DVORAK: &str = r#"
`~ 1! 2@ 3# 4$ 5% 6^ 7& 8* 9( 0) [{ ]}
    '" ,< .> pP yY fF gG cC rR lL /? =+ \|
     aA oO eE uU iI dD hH tT nN sS -_
      ;: qQ jJ kK xX bB mM wW vV zZ
"#;

const KEYPAD: &str = r#"
  / * -
7 8 9 +
4 5 6
1 2 3
  0 .
"#;

const MAC_KEYPAD: &str = r#"
  = / *
7 8 9 -
4 5 6 +
1 2 3
  0 .
"#;

// Neighbor offsets, index order is the stable direction index.
const SLANTED_DIRECTIONS: [(isize, isize); 6] =
    [(-1, 0), (0, -1), (1, -1), (1, 0), (0, 1), (-1, 1)];
const ALIGNED_DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Adjacency graph for one keyboard layout. Every character of a cell (base
/// and shifted form) resolves to the same ordered neighbor list; a `None`
/// entry means no key in that direction.
#[derive(Debug, Clone)]
pub struct KeyboardGraph {
    name: String,
    adjacency: HashMap<char, Vec<Option<String>>>,
}

impl KeyboardGraph {
    /// Builds a graph from an ASCII layout. `slanted` layouts have rows
    /// horizontally offset like a physical keyboard; aligned layouts are a
    /// plain grid.
    ///
    /// # Errors
    ///
    /// Fails when the layout is empty or its cell tokens are not all the
    /// same width.
    pub fn build(name: &str, layout: &str, slanted: bool) -> Result<Self, GraphError> {
        let token_width = layout
            .split_whitespace()
            .next()
            .map(|t| t.chars().count())
            .ok_or_else(|| GraphError::EmptyLayout {
                name: name.to_string(),
            })?;

        // Map each cell token to its grid coordinates
        let mut positions: HashMap<(isize, isize), String> = HashMap::new();
        for (y, line) in layout.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let slant = if slanted { y as isize - 1 } else { 0 };
            for (offset, token) in tokens_with_offsets(line) {
                if token.chars().count() != token_width {
                    return Err(GraphError::MalformedLayout {
                        name: name.to_string(),
                        token,
                        width: token_width,
                    });
                }
                let x = (offset as isize - slant) / (token_width as isize + 1);
                positions.insert((x, y as isize), token);
            }
        }

        let directions: &[(isize, isize)] = if slanted {
            &SLANTED_DIRECTIONS
        } else {
            &ALIGNED_DIRECTIONS
        };

        let mut adjacency = HashMap::new();
        for (&(x, y), token) in &positions {
            let neighbors: Vec<Option<String>> = directions
                .iter()
                .map(|&(dx, dy)| positions.get(&(x + dx, y + dy)).cloned())
                .collect();
            for c in token.chars() {
                adjacency.insert(c, neighbors.clone());
            }
        }

        Ok(Self {
            name: name.to_string(),
            adjacency,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered neighbor cells of a character, `None` where no key exists in
    /// that direction. Returns `None` for characters not on this layout.
    pub(crate) fn neighbors(&self, c: char) -> Option<&[Option<String>]> {
        self.adjacency.get(&c).map(|v| v.as_slice())
    }

    /// Number of distinct characters on the layout (starting keys for the
    /// spatial guess estimator).
    pub fn key_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Mean number of present neighbors per key.
    pub fn average_degree(&self) -> f64 {
        if self.adjacency.is_empty() {
            return 0.0;
        }
        let total: usize = self
            .adjacency
            .values()
            .map(|ns| ns.iter().filter(|n| n.is_some()).count())
            .sum();
        total as f64 / self.adjacency.len() as f64
    }
}

/// Whitespace-separated tokens of a line together with their character
/// offsets. Offsets are tracked directly so that repeated tokens land on
/// their own coordinates.
fn tokens_with_offsets(line: &str) -> Vec<(usize, String)> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut token_start = 0;
    for (i, c) in line.chars().enumerate() {
        if c.is_whitespace() {
            if !current.is_empty() {
                tokens.push((token_start, std::mem::take(&mut current)));
            }
        } else {
            if current.is_empty() {
                token_start = i;
            }
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push((token_start, current));
    }
    tokens
}

/// The four built-in keyboard graphs: qwerty, dvorak, keypad, mac_keypad.
pub(crate) fn built_in_graphs() -> Vec<KeyboardGraph> {
    [
        ("qwerty", QWERTY, true),
        ("dvorak", DVORAK, true),
        ("keypad", KEYPAD, false),
        ("mac_keypad", MAC_KEYPAD, false),
    ]
    .into_iter()
    .map(|(name, layout, slanted)| {
        KeyboardGraph::build(name, layout, slanted).expect("built-in layout is well formed")
    })
    .collect()
}
