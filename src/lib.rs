//! Password strength estimation library
//!
//! Estimates how hard a password is to crack by recognizing the patterns
//! people actually use: dictionary words (including reversed and l33t-speak
//! forms), keyboard runs, sequences, repeats, dates and years. The cheapest
//! way to assemble the password out of those patterns gives a realistic
//! guess count, a 0-4 score, crack time estimates for several attacker
//! profiles, and actionable feedback.
//!
//! # Features
//!
//! - `async` (default): Enables cancellable evaluation with
//!   `tokio_util::sync::CancellationToken` and a channel-based variant
//! - `tracing`: Enables logging via tracing crate
//!
//! # Example
//!
//! ```rust
//! use pwd_meter::Meter;
//!
//! let meter = Meter::new();
//! let evaluation = meter.evaluate("Tr0ub4dour&3");
//!
//! println!("Score: {}/4", evaluation.score);
//! println!(
//!     "Offline crack time: {}",
//!     evaluation.crack_times_display.offline_slow_hashing_1e4_per_second
//! );
//! for suggestion in &evaluation.feedback.suggestions {
//!     println!("Tip: {}", suggestion);
//! }
//! ```

// Internal modules
mod evaluator;
mod feedback;
mod matching;
mod scoring;
mod time_estimates;
mod wordlists;

// Public API
pub use evaluator::{Evaluation, Meter, MeterBuilder};
pub use feedback::{Feedback, Suggestion, Warning};
pub use matching::keyboard::{GraphError, KeyboardGraph};
pub use matching::{
    DateDetail, DictionaryDetail, Match, MatchKind, RegexDetail, RepeatDetail, SequenceDetail,
    SpatialDetail,
};
pub use scoring::ScoredMatch;
pub use time_estimates::{CrackTimesDisplay, CrackTimesSeconds};
pub use wordlists::{DictionaryError, RankedDictionary};
