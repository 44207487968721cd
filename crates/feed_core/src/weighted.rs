//! Weighted categorical sampling over a fixed outcome set.
//!
//! Status, traffic, vehicle and ride-type draws all go through [`WeightedTable`]:
//! the table is validated once at construction and then sampled with a
//! cumulative-weight lookup.

use rand::Rng;

use crate::error::{FeedError, FeedResult};

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTable<T> {
    outcomes: Vec<T>,
    cumulative: Vec<f64>,
}

impl<T: Clone> WeightedTable<T> {
    /// Build a table from parallel outcome and weight vectors.
    ///
    /// `name` identifies the table in error messages. Fails when the vectors
    /// differ in length, are empty, carry a negative or non-finite weight, or
    /// sum to zero or overflow.
    pub fn try_new(name: &'static str, outcomes: Vec<T>, weights: &[f64]) -> FeedResult<Self> {
        if outcomes.len() != weights.len() {
            return Err(FeedError::WeightMismatch {
                table: name,
                labels: outcomes.len(),
                weights: weights.len(),
            });
        }
        if outcomes.is_empty() {
            return Err(FeedError::Config(format!("{name}: table has no outcomes")));
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for &weight in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(FeedError::Config(format!(
                    "{name}: weight {weight} is not a finite non-negative number"
                )));
            }
            total += weight;
            cumulative.push(total);
        }
        if total <= 0.0 {
            return Err(FeedError::Config(format!("{name}: weights sum to zero")));
        }
        if !total.is_finite() {
            return Err(FeedError::Config(format!("{name}: weights overflow to {total}")));
        }

        Ok(Self {
            outcomes,
            cumulative,
        })
    }

    /// Build a table from `(outcome, weight)` pairs.
    pub fn from_pairs(name: &'static str, pairs: &[(T, f64)]) -> FeedResult<Self> {
        let outcomes = pairs.iter().map(|(outcome, _)| outcome.clone()).collect();
        let weights: Vec<f64> = pairs.iter().map(|(_, weight)| *weight).collect();
        Self::try_new(name, outcomes, &weights)
    }

    /// Uniform table over `outcomes`.
    pub fn uniform(name: &'static str, outcomes: Vec<T>) -> FeedResult<Self> {
        let weights = vec![1.0; outcomes.len()];
        Self::try_new(name, outcomes, &weights)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let total = self.cumulative[self.cumulative.len() - 1];
        let r: f64 = rng.gen_range(0.0..total);
        let idx = self
            .cumulative
            .partition_point(|&w| w <= r)
            .min(self.outcomes.len() - 1);
        self.outcomes[idx].clone()
    }

    pub fn outcomes(&self) -> &[T] {
        &self.outcomes
    }

    /// Probability of the outcome at `index`, normalised by the table total.
    pub fn probability(&self, index: usize) -> Option<f64> {
        let total = *self.cumulative.last()?;
        let upper = *self.cumulative.get(index)?;
        let lower = if index == 0 {
            0.0
        } else {
            self.cumulative[index - 1]
        };
        Some((upper - lower) / total)
    }
}
