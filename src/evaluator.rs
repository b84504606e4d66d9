//! Password strength evaluation - meter assembly and entry points.

use std::path::Path;
use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::feedback::{self, Feedback};
use crate::matching::keyboard::built_in_graphs;
use crate::matching::{Match, MatcherSet, Password};
use crate::scoring::{self, ScoredMatch};
use crate::time_estimates::{self, CrackTimesDisplay, CrackTimesSeconds};
use crate::wordlists::{built_in_dictionaries, DictionaryError, RankedDictionary};

/// The full result of evaluating one password.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The evaluated password, echoed back.
    pub password: String,
    /// Estimated guesses needed to crack the password.
    pub guesses: f64,
    pub guesses_log10: f64,
    /// Overall strength, 0 (weakest) to 4 (strongest).
    pub score: u8,
    pub crack_times_seconds: CrackTimesSeconds,
    pub crack_times_display: CrackTimesDisplay,
    /// The cheapest full-coverage match sequence the guess count is based on.
    pub sequence: Vec<ScoredMatch>,
    pub feedback: Feedback,
    /// Wall-clock time spent evaluating.
    pub calc_time: Duration,
}

/// A configured strength meter: ranked dictionaries, keyboard graphs and the
/// reference year. Immutable once built and shareable across threads;
/// construction is the expensive step, evaluation reuses everything.
pub struct Meter {
    set: MatcherSet,
}

impl Meter {
    /// A meter with the built-in word lists and the current year.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> MeterBuilder {
        MeterBuilder::default()
    }

    /// Evaluates a password through the full pipeline: pattern matching,
    /// cheapest-decomposition search, attack times and feedback.
    pub fn evaluate(&self, password: &str) -> Evaluation {
        let started = Instant::now();
        let matches = self.set.matches(password);
        self.finish(password, matches, started)
    }

    /// As [`Self::evaluate`] with extra context words (usernames, emails,
    /// site names) matched as a throwaway dictionary ranked by position.
    pub fn evaluate_with_user_inputs(&self, password: &str, user_inputs: &[&str]) -> Evaluation {
        let started = Instant::now();
        let matches = self.set.matches_with_user_inputs(password, user_inputs);
        self.finish(password, matches, started)
    }

    /// Evaluates a secrecy-wrapped password. The plaintext still appears in
    /// the returned [`Evaluation`].
    pub fn evaluate_secret(&self, password: &SecretString) -> Evaluation {
        self.evaluate(password.expose_secret())
    }

    /// Cancellable evaluation: the token is checked between matcher stages.
    /// Returns `None` when cancelled.
    #[cfg(feature = "async")]
    pub fn evaluate_cancellable(
        &self,
        password: &str,
        token: &CancellationToken,
    ) -> Option<Evaluation> {
        let started = Instant::now();
        let matches = self.set.matches_inner(password, &|| token.is_cancelled())?;
        Some(self.finish(password, matches, started))
    }

    /// Evaluates on the current task and sends the result over a channel,
    /// unless cancelled first.
    #[cfg(feature = "async")]
    pub async fn evaluate_tx(
        &self,
        password: &SecretString,
        token: CancellationToken,
        tx: mpsc::Sender<Evaluation>,
    ) {
        #[cfg(feature = "tracing")]
        tracing::info!("evaluation is about to start...");

        let Some(evaluation) = self.evaluate_cancellable(password.expose_secret(), &token) else {
            #[cfg(feature = "tracing")]
            tracing::debug!("evaluation cancelled");
            return;
        };

        if let Err(e) = tx.send(evaluation).await {
            #[cfg(feature = "tracing")]
            tracing::error!("Failed to send evaluation result: {}", e);
            #[cfg(not(feature = "tracing"))]
            let _ = e;
        }
    }

    fn finish(&self, password: &str, matches: Vec<Match>, started: Instant) -> Evaluation {
        let decomposition = scoring::most_guessable_match_sequence(
            &Password::new(password),
            matches,
            self.set.scoring(),
            false,
        );
        let attack = time_estimates::estimate_attack_times(decomposition.guesses);
        let feedback = feedback::get_feedback(attack.score, &decomposition.sequence);
        let calc_time = started.elapsed();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "evaluated {} chars: score {} in {:?}",
            password.chars().count(),
            attack.score,
            calc_time
        );

        Evaluation {
            password: password.to_string(),
            guesses: decomposition.guesses,
            guesses_log10: decomposition.guesses.log10(),
            score: attack.score,
            crack_times_seconds: attack.crack_times_seconds,
            crack_times_display: attack.crack_times_display,
            sequence: decomposition.sequence,
            feedback,
            calc_time,
        }
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

/// Configures and builds a [`Meter`].
pub struct MeterBuilder {
    dictionaries: Vec<RankedDictionary>,
    use_built_ins: bool,
    reference_year: Option<i32>,
}

impl Default for MeterBuilder {
    fn default() -> Self {
        Self {
            dictionaries: Vec::new(),
            use_built_ins: true,
            reference_year: None,
        }
    }
}

impl MeterBuilder {
    /// Adds a ranked dictionary from an ordered word sequence.
    pub fn dictionary_words<I, S>(mut self, name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dictionaries
            .push(RankedDictionary::from_words(name, words));
        self
    }

    /// Adds a ranked dictionary loaded from a word list file, one word per
    /// line in frequency order.
    pub fn dictionary_file(
        mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, DictionaryError> {
        self.dictionaries
            .push(RankedDictionary::from_file(name, path)?);
        Ok(self)
    }

    /// Drops the built-in word lists, leaving only the dictionaries added
    /// explicitly.
    pub fn without_built_ins(mut self) -> Self {
        self.use_built_ins = false;
        self
    }

    /// Pins the reference year used by date and year estimators; defaults to
    /// the current year.
    pub fn reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    pub fn build(self) -> Meter {
        let mut dictionaries = if self.use_built_ins {
            built_in_dictionaries()
        } else {
            Vec::new()
        };
        dictionaries.extend(self.dictionaries);

        let reference_year = self.reference_year.unwrap_or_else(current_year);

        #[cfg(feature = "tracing")]
        tracing::info!(
            "meter built: {} dictionaries, reference year {}",
            dictionaries.len(),
            reference_year
        );

        Meter {
            set: MatcherSet::new(dictionaries, built_in_graphs(), reference_year),
        }
    }
}

fn current_year() -> i32 {
    time::OffsetDateTime::now_utc().year()
}


#[cfg(all(test, feature = "async"))]
mod async_tests {
    use super::*;

    #[tokio::test]
    async fn test_evaluate_with_cancellation() {
        let meter = Meter::builder().reference_year(2026).build();
        let token = CancellationToken::new();
        token.cancel();

        assert!(meter
            .evaluate_cancellable("SomePassword123!", &token)
            .is_none());
    }

    #[tokio::test]
    async fn test_evaluate_without_cancellation() {
        let meter = Meter::builder().reference_year(2026).build();
        let token = CancellationToken::new();

        let evaluation = meter.evaluate_cancellable("TestPass123!", &token);
        assert!(evaluation.is_some());
    }

    #[tokio::test]
    async fn test_evaluate_tx() {
        let meter = Meter::builder().reference_year(2026).build();
        let (tx, mut rx) = mpsc::channel(1);
        let token = CancellationToken::new();

        let pwd = SecretString::new("TestPass123!".to_string().into());
        meter.evaluate_tx(&pwd, token, tx).await;

        let evaluation = rx.recv().await.expect("Should receive evaluation");
        assert_eq!(evaluation.password, "TestPass123!");
    }

    #[tokio::test]
    async fn test_evaluate_tx_cancelled_sends_nothing() {
        let meter = Meter::builder().reference_year(2026).build();
        let (tx, mut rx) = mpsc::channel(1);
        let token = CancellationToken::new();
        token.cancel();

        let pwd = SecretString::new("TestPass123!".to_string().into());
        meter.evaluate_tx(&pwd, token, tx).await;

        assert!(rx.try_recv().is_err());
    }
}
