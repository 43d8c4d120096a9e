use ndarray::{Array2, ArrayView2};
use rand::prelude::*;
use serde::Serialize;

use super::error::TrainingError;

const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Transition and emission parameters of a discrete HMM.
///
/// Stored in probability space; the engines keep values in range by scaling
/// each column instead of working with logarithms.
#[derive(Debug, Clone, Serialize)]
pub struct Hmm {
    a: Array2<f64>,
    b: Array2<f64>,
}

impl Hmm {
    pub fn new(a: Array2<f64>, b: Array2<f64>) -> Result<Self, TrainingError> {
        if a.nrows() == 0 {
            return Err(TrainingError::InvalidParameters(String::from(
                "state count must be > 0",
            )));
        }
        if a.nrows() != a.ncols() {
            return Err(TrainingError::InvalidParameters(format!(
                "transition matrix is {}x{}, expected square",
                a.nrows(),
                a.ncols()
            )));
        }
        if b.nrows() != a.nrows() {
            return Err(TrainingError::InvalidParameters(format!(
                "emission matrix has {} rows for {} states",
                b.nrows(),
                a.nrows()
            )));
        }
        if b.ncols() == 0 {
            return Err(TrainingError::InvalidParameters(String::from(
                "symbol count must be > 0",
            )));
        }
        Hmm::check_stochastic(&a, "transition")?;
        Hmm::check_stochastic(&b, "emission")?;
        Ok(Self { a, b })
    }

    /// Random row-stochastic parameters, for runs without a configured model.
    pub fn random(nstates: usize, nsymbols: usize) -> Self {
        let mut rng = thread_rng();
        let mut a = Array2::from_shape_fn((nstates, nstates), |_| rng.gen::<f64>());
        let mut b = Array2::from_shape_fn((nstates, nsymbols), |_| rng.gen::<f64>());
        for state in 0..nstates {
            let mut row = a.row_mut(state);
            let s = row.sum();
            row /= s;
            let mut row = b.row_mut(state);
            let s = row.sum();
            row /= s;
        }
        Self { a, b }
    }

    fn check_stochastic(m: &Array2<f64>, name: &str) -> Result<(), TrainingError> {
        for (i, row) in m.rows().into_iter().enumerate() {
            if row.iter().any(|&x| x < 0.0 || !x.is_finite()) {
                return Err(TrainingError::InvalidParameters(format!(
                    "{} row {} has a negative or non-finite entry",
                    name, i
                )));
            }
            let sum = row.sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(TrainingError::InvalidParameters(format!(
                    "{} row {} sums to {}, expected 1",
                    name, i, sum
                )));
            }
        }
        Ok(())
    }

    pub fn nstates(&self) -> usize {
        self.a.nrows()
    }

    pub fn nsymbols(&self) -> usize {
        self.b.ncols()
    }

    pub fn transition_prob(&self, state_from: usize, state_to: usize) -> f64 {
        self.a[[state_from, state_to]]
    }

    pub fn emit_prob(&self, state: usize, obs: usize) -> f64 {
        self.b[[state, obs]]
    }

    pub fn transitions(&self) -> ArrayView2<f64> {
        self.a.view()
    }

    pub fn emissions(&self) -> ArrayView2<f64> {
        self.b.view()
    }

    /// Total absolute difference between the parameters of two models.
    pub fn delta(&self, other: &Hmm) -> f64 {
        let da = (&self.a - &other.a).map(|x| x.abs()).sum();
        let db = (&self.b - &other.b).map(|x| x.abs()).sum();
        da + db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr2;

    fn default_hmm() -> Hmm {
        let a = arr2(&[[0.9, 0.1], [0.1, 0.9]]);
        let b = arr2(&[[0.1, 0.1, 0.1, 0.7], [0.25, 0.25, 0.4, 0.1]]);
        Hmm::new(a, b).unwrap()
    }

    #[test]
    fn accepts_row_stochastic_matrices() {
        let hmm = default_hmm();
        assert_eq!(hmm.nstates(), 2);
        assert_eq!(hmm.nsymbols(), 4);
        assert_abs_diff_eq!(hmm.transition_prob(0, 1), 0.1);
        assert_abs_diff_eq!(hmm.emit_prob(1, 2), 0.4);
    }

    #[test]
    fn rejects_non_stochastic_rows() {
        let a = arr2(&[[0.9, 0.2], [0.1, 0.9]]);
        let b = arr2(&[[0.5, 0.5], [0.5, 0.5]]);
        match Hmm::new(a, b) {
            Err(TrainingError::InvalidParameters(_)) => (),
            other => panic!("expected InvalidParameters, got {:?}", other),
        }
    }

    #[test]
    fn rejects_shape_mismatch() {
        let a = arr2(&[[0.9, 0.1], [0.1, 0.9]]);
        let b = arr2(&[[0.5, 0.5]]);
        assert!(Hmm::new(a, b).is_err());

        let a = arr2(&[[0.5, 0.3, 0.2]]);
        let b = arr2(&[[1.0]]);
        assert!(Hmm::new(a, b).is_err());
    }

    #[test]
    fn rejects_negative_entries() {
        let a = arr2(&[[1.1, -0.1], [0.1, 0.9]]);
        let b = arr2(&[[0.5, 0.5], [0.5, 0.5]]);
        assert!(Hmm::new(a, b).is_err());
    }

    #[test]
    fn random_rows_are_stochastic() {
        let hmm = Hmm::random(2, 4);
        for state in 0..2 {
            assert_abs_diff_eq!(hmm.transitions().row(state).sum(), 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(hmm.emissions().row(state).sum(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn delta_is_zero_for_identical_models() {
        let hmm = default_hmm();
        assert_abs_diff_eq!(hmm.delta(&hmm.clone()), 0.0);
    }
}
