//!
//! M-step: transition and emission updates from the posteriors
//!

use ndarray::{s, Array2};

use super::error::TrainingError;
use super::hmm::Hmm;
use super::posterior::Posterior;

/// Build updated parameters from the posteriors of the current E-step.
///
/// Both matrices are built from scratch; the expected transition counts are
/// normalized by the occupancy of the source state over all positions but
/// the last (which has no outgoing transition).
pub fn reestimate(
    posterior: &Posterior,
    sequence: &[usize],
    nsymbols: usize,
) -> Result<Hmm, TrainingError> {
    let gamma = posterior.occupancy();
    let xi = posterior.pairwise();
    let nstates = gamma.nrows();
    let n = sequence.len();

    let mut a = Array2::zeros((nstates, nstates));
    for l in 0..nstates {
        let denom = gamma.slice(s![l, ..n - 1]).sum();
        if denom == 0.0 || !denom.is_finite() {
            return Err(TrainingError::DegenerateNormalization {
                matrix: "transition",
                index: l,
                iteration: 0,
            });
        }
        for k in 0..nstates {
            a[[l, k]] = xi.slice(s![l, k, ..]).sum() / denom;
        }
    }

    let mut b = Array2::zeros((nstates, nsymbols));
    for k in 0..nstates {
        for (i, &symbol) in sequence.iter().enumerate() {
            b[[k, symbol]] += gamma[[k, i]];
        }
        let denom = gamma.row(k).sum();
        if denom == 0.0 || !denom.is_finite() {
            return Err(TrainingError::DegenerateNormalization {
                matrix: "emission",
                index: k,
                iteration: 0,
            });
        }
        b.row_mut(k).mapv_inplace(|x| x / denom);
    }

    Hmm::new(a, b)
}

#[cfg(test)]
mod tests {
    use super::super::backward::Backward;
    use super::super::forward::Forward;
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr2;

    fn default_hmm() -> Hmm {
        let a = arr2(&[[0.9, 0.1], [0.1, 0.9]]);
        let b = arr2(&[[0.1, 0.1, 0.1, 0.7], [0.25, 0.25, 0.4, 0.1]]);
        Hmm::new(a, b).unwrap()
    }

    fn posteriors_for(hmm: &Hmm, sequence: &[usize]) -> Posterior {
        let mut forward = Forward::new(hmm.nstates(), sequence.len());
        let mut backward = Backward::new(hmm.nstates(), sequence.len());
        forward.compute(hmm, sequence).unwrap();
        backward.compute(hmm, sequence).unwrap();
        let mut posterior = Posterior::new(hmm.nstates(), sequence.len());
        posterior
            .compute(hmm, sequence, forward.probs(), backward.probs())
            .unwrap();
        posterior
    }

    #[test]
    fn updated_rows_are_stochastic() {
        let hmm = default_hmm();
        let sequence = vec![0, 0, 0, 0, 3, 3, 3, 3, 1, 1, 1, 1];
        let posterior = posteriors_for(&hmm, &sequence);
        let updated = reestimate(&posterior, &sequence, hmm.nsymbols()).unwrap();

        for state in 0..2 {
            assert_abs_diff_eq!(updated.transitions().row(state).sum(), 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(updated.emissions().row(state).sum(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn unobserved_symbols_get_zero_emission() {
        let hmm = default_hmm();
        // never emits 'z' (symbol 2)
        let sequence = vec![0, 3, 3, 1, 0];
        let posterior = posteriors_for(&hmm, &sequence);
        let updated = reestimate(&posterior, &sequence, hmm.nsymbols()).unwrap();

        assert_abs_diff_eq!(updated.emit_prob(0, 2), 0.0);
        assert_abs_diff_eq!(updated.emit_prob(1, 2), 0.0);
    }

    #[test]
    fn single_position_sequence_is_degenerate() {
        let hmm = default_hmm();
        let sequence = vec![3];
        let posterior = posteriors_for(&hmm, &sequence);
        let err = reestimate(&posterior, &sequence, hmm.nsymbols()).unwrap_err();
        assert_eq!(
            err,
            TrainingError::DegenerateNormalization { matrix: "transition", index: 0, iteration: 0 }
        );
    }
}
