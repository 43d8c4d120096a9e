use thiserror::Error;

/// Errors raised by training and the surrounding validation.
#[derive(Debug, Error, PartialEq)]
pub enum TrainingError {
    /// Initial matrices not row-stochastic, or shapes inconsistent with the
    /// state/symbol counts.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A sequence byte absent from the alphabet.
    #[error("unknown symbol {symbol:?} at position {position}")]
    UnknownSymbol { symbol: char, position: usize },

    /// Empty observation sequence.
    #[error("empty sequence")]
    EmptySequence,

    /// A normalization divisor was zero (or not finite) during forward,
    /// backward, posterior or re-estimation computation. Fatal for the run.
    #[error("degenerate normalization in {matrix} matrix at index {index} (iteration {iteration})")]
    DegenerateNormalization {
        matrix: &'static str,
        index: usize,
        iteration: usize,
    },
}

impl TrainingError {
    /// Attach the current iteration to a degeneracy raised inside an engine.
    pub fn at_iteration(self, iteration: usize) -> Self {
        match self {
            TrainingError::DegenerateNormalization { matrix, index, .. } => {
                TrainingError::DegenerateNormalization { matrix, index, iteration }
            }
            other => other,
        }
    }
}
