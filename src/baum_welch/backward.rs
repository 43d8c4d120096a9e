//!
//! Backward recursion, symmetric to the forward pass
//!

use ndarray::Array2;

use super::error::TrainingError;
use super::hmm::Hmm;
use super::scale_column;

pub struct Backward {
    beta: Array2<f64>,
}

impl Backward {
    pub fn new(nstates: usize, n: usize) -> Self {
        let beta = Array2::zeros((nstates, n));
        Self { beta }
    }

    /// Fill the matrix with scaled backward probabilities. Column i is
    /// proportional to P(observations i+1..n-1 | state at i) and sums to 1.
    pub fn compute(&mut self, hmm: &Hmm, sequence: &[usize]) -> Result<(), TrainingError> {
        let nstates = hmm.nstates();
        let n = sequence.len();

        for k in 0..nstates {
            self.beta[[k, n - 1]] = 1.0;
        }
        scale_column(&mut self.beta, n - 1, "backward")?;

        for i in (0..n - 1).rev() {
            for k in 0..nstates {
                let mut sum_prob = 0.0;
                for l in 0..nstates {
                    sum_prob += self.beta[[l, i + 1]]
                        * hmm.transition_prob(k, l)
                        * hmm.emit_prob(l, sequence[i + 1]);
                }
                self.beta[[k, i]] = sum_prob;
            }
            scale_column(&mut self.beta, i, "backward")?;
        }
        Ok(())
    }

    pub fn probs(&self) -> &Array2<f64> {
        &self.beta
    }
}
