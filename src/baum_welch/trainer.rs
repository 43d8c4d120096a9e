use log::info;
use ndarray::Array2;

use super::backward::Backward;
use super::error::TrainingError;
use super::forward::Forward;
use super::hmm::Hmm;
use super::posterior::Posterior;
use super::reestimation::reestimate;

#[derive(Debug)]
pub struct TrainingOutcome {
    pub hmm: Hmm,
    /// Occupancy of the last E-step, i.e. the posteriors under the
    /// parameters entering the final M-step.
    pub occupancy: Array2<f64>,
}

/// Runs the E-step/M-step loop for a fixed number of iterations, reusing
/// the same forward/backward/posterior matrices throughout.
pub struct Trainer {
    forward: Forward,
    backward: Backward,
    posterior: Posterior,
}

impl Trainer {
    pub fn new(nstates: usize, n: usize) -> Self {
        let forward = Forward::new(nstates, n);
        let backward = Backward::new(nstates, n);
        let posterior = Posterior::new(nstates, n);
        Self { forward, backward, posterior }
    }

    pub fn train(
        &mut self,
        sequence: &[usize],
        mut hmm: Hmm,
        iterations: usize,
    ) -> Result<TrainingOutcome, TrainingError> {
        if sequence.len() != self.posterior.occupancy().ncols() {
            return Err(TrainingError::InvalidParameters(format!(
                "trainer allocated for {} positions, sequence has {}",
                self.posterior.occupancy().ncols(),
                sequence.len()
            )));
        }
        for iteration in 1..=iterations {
            self.forward
                .compute(&hmm, sequence)
                .map_err(|e| e.at_iteration(iteration))?;
            self.backward
                .compute(&hmm, sequence)
                .map_err(|e| e.at_iteration(iteration))?;
            self.posterior
                .compute(&hmm, sequence, self.forward.probs(), self.backward.probs())
                .map_err(|e| e.at_iteration(iteration))?;

            let updated = reestimate(&self.posterior, sequence, hmm.nsymbols())
                .map_err(|e| e.at_iteration(iteration))?;
            info!(
                "iteration {}/{} parameter delta {:.6}",
                iteration,
                iterations,
                updated.delta(&hmm)
            );
            hmm = updated;
        }

        Ok(TrainingOutcome {
            hmm,
            occupancy: self.posterior.occupancy().clone(),
        })
    }
}

/// Train on a full sequence after validating the preconditions.
pub fn train(
    sequence: &[usize],
    hmm: Hmm,
    iterations: usize,
) -> Result<TrainingOutcome, TrainingError> {
    if sequence.is_empty() {
        return Err(TrainingError::EmptySequence);
    }
    if iterations == 0 {
        return Err(TrainingError::InvalidParameters(String::from(
            "iterations must be >= 1",
        )));
    }
    for (position, &symbol) in sequence.iter().enumerate() {
        if symbol >= hmm.nsymbols() {
            return Err(TrainingError::InvalidParameters(format!(
                "symbol index {} at position {} out of range for {} symbols",
                symbol,
                position,
                hmm.nsymbols()
            )));
        }
    }
    Trainer::new(hmm.nstates(), sequence.len()).train(sequence, hmm, iterations)
}
