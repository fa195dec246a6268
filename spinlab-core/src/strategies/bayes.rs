//! Bayesian strategy — Laplace-smoothed prior × transition likelihood.
//!
//! The prior is recent-window frequency with add-one smoothing; the
//! likelihood is the smoothed first-order transition row of the current last
//! outcome. Posterior ∝ likelihood × prior, normalized; the argmax posterior
//! is the prediction.

use crate::domain::{Outcome, OUTCOME_COUNT};
use crate::score::{self, ScoreBoard};
use rand::rngs::StdRng;

use super::markov::MarkovChain;
use super::Strategy;

/// Posterior-argmax strategy.
#[derive(Debug, Clone)]
pub struct BayesPosterior {
    pub prior_window: usize,
}

impl BayesPosterior {
    pub fn new(prior_window: usize) -> Self {
        assert!(prior_window >= 1, "prior_window must be >= 1");
        Self { prior_window }
    }

    pub fn default_params() -> Self {
        Self::new(50)
    }

    /// Normalized posterior over all outcomes. `None` when there is no last
    /// outcome to condition on.
    pub fn posterior(&self, history: &[Outcome]) -> Option<ScoreBoard> {
        let &last = history.first()?;

        let window = score::window(history, self.prior_window);
        let counts = score::frequencies(window);
        let prior_total = window.len() as f64 + OUTCOME_COUNT as f64;

        let transitions = MarkovChain::transition_counts(history);
        let row = &transitions[last.index()];
        let row_total: u32 = row.iter().sum();
        let likelihood_total = row_total as f64 + OUTCOME_COUNT as f64;

        let mut posterior = ScoreBoard::new();
        for outcome in Outcome::all() {
            let prior = (counts[outcome.index()] as f64 + 1.0) / prior_total;
            let likelihood = (row[outcome.index()] as f64 + 1.0) / likelihood_total;
            posterior.set(outcome, likelihood * prior);
        }
        posterior.normalize();
        Some(posterior)
    }
}

impl Strategy for BayesPosterior {
    fn name(&self) -> &str {
        "bayes_posterior"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        let Some(posterior) = self.posterior(history) else {
            return score::uniform_outcome(rng);
        };
        match posterior.sample_max(rng) {
            Some(outcome) => outcome,
            None => score::uniform_outcome(rng),
        }
    }
}
