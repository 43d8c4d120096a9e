use ndarray::Array2;

pub mod alphabet;
pub mod backward;
pub mod error;
pub mod forward;
pub mod hmm;
pub mod posterior;
pub mod reestimation;
pub mod trainer;

use self::error::TrainingError;

/// Divide a column by its sum so it sums to 1. A zero or non-finite sum
/// means every state was assigned zero likelihood at that position.
pub(crate) fn scale_column(
    matrix: &mut Array2<f64>,
    column: usize,
    name: &'static str,
) -> Result<(), TrainingError> {
    let sum = matrix.column(column).sum();
    if sum == 0.0 || !sum.is_finite() {
        return Err(TrainingError::DegenerateNormalization {
            matrix: name,
            index: column,
            iteration: 0,
        });
    }
    matrix.column_mut(column).mapv_inplace(|x| x / sum);
    Ok(())
}
