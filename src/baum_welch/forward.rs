//!
//! Forward recursion with per-column scaling
//!

use ndarray::Array2;

use super::error::TrainingError;
use super::hmm::Hmm;
use super::scale_column;

pub struct Forward {
    alpha: Array2<f64>,
}

impl Forward {
    pub fn new(nstates: usize, n: usize) -> Self {
        let alpha = Array2::zeros((nstates, n));
        Self { alpha }
    }

    /// Fill the matrix with scaled forward probabilities for the sequence
    /// under the given parameters. Column i is proportional to
    /// P(observations 0..=i, state at i) and sums to 1.
    pub fn compute(&mut self, hmm: &Hmm, sequence: &[usize]) -> Result<(), TrainingError> {
        let nstates = hmm.nstates();
        let prior = 1.0 / nstates as f64;

        for k in 0..nstates {
            self.alpha[[k, 0]] = prior * hmm.emit_prob(k, sequence[0]);
        }
        scale_column(&mut self.alpha, 0, "forward")?;

        for i in 1..sequence.len() {
            for k in 0..nstates {
                let mut sum_prob = 0.0;
                for l in 0..nstates {
                    sum_prob += self.alpha[[l, i - 1]] * hmm.transition_prob(l, k);
                }
                self.alpha[[k, i]] = sum_prob * hmm.emit_prob(k, sequence[i]);
            }
            scale_column(&mut self.alpha, i, "forward")?;
        }
        Ok(())
    }

    pub fn probs(&self) -> &Array2<f64> {
        &self.alpha
    }
}
