use std::error::Error as StdError;

/// Errors that can occur during Euler integration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("model failed at step {step}: {source}")]
    Model {
        step: usize,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("problem failed at step {step}: {source}")]
    Problem {
        step: usize,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    pub(crate) fn model<E: StdError + Send + Sync + 'static>(step: usize, err: E) -> Self {
        Self::Model {
            step,
            source: Box::new(err),
        }
    }

    pub(crate) fn problem<E: StdError + Send + Sync + 'static>(step: usize, err: E) -> Self {
        Self::Problem {
            step,
            source: Box::new(err),
        }
    }
}
