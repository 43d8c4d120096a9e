//!
//! State occupancy and state-pair posteriors from the forward and
//! backward matrices
//!

use ndarray::{s, Array2, Array3};

use super::error::TrainingError;
use super::hmm::Hmm;
use super::scale_column;

pub struct Posterior {
    gamma: Array2<f64>,
    xi: Array3<f64>,
}

impl Posterior {
    pub fn new(nstates: usize, n: usize) -> Self {
        let gamma = Array2::zeros((nstates, n));
        let xi = Array3::zeros((nstates, nstates, n.saturating_sub(1)));
        Self { gamma, xi }
    }

    /// Combine the forward and backward matrices into the per-position
    /// occupancy gamma and the per-pair transition posterior xi. The
    /// parameters must be the ones the forward/backward pass ran with.
    pub fn compute(
        &mut self,
        hmm: &Hmm,
        sequence: &[usize],
        alpha: &Array2<f64>,
        beta: &Array2<f64>,
    ) -> Result<(), TrainingError> {
        let nstates = hmm.nstates();
        let n = sequence.len();

        for i in 0..n {
            for k in 0..nstates {
                self.gamma[[k, i]] = alpha[[k, i]] * beta[[k, i]];
            }
            scale_column(&mut self.gamma, i, "occupancy")?;
        }

        for i in 0..n - 1 {
            let mut denom = 0.0;
            for l in 0..nstates {
                for k in 0..nstates {
                    let joint = alpha[[l, i]]
                        * hmm.transition_prob(l, k)
                        * hmm.emit_prob(k, sequence[i + 1])
                        * beta[[k, i + 1]];
                    self.xi[[l, k, i]] = joint;
                    denom += joint;
                }
            }
            if denom == 0.0 || !denom.is_finite() {
                return Err(TrainingError::DegenerateNormalization {
                    matrix: "pairwise",
                    index: i,
                    iteration: 0,
                });
            }
            self.xi
                .slice_mut(s![.., .., i])
                .mapv_inplace(|x| x / denom);
        }
        Ok(())
    }

    pub fn occupancy(&self) -> &Array2<f64> {
        &self.gamma
    }

    pub fn pairwise(&self) -> &Array3<f64> {
        &self.xi
    }
}
