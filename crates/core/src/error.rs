use thiserror::Error;

use crate::model::{IdError, StepError, TourError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Step(#[from] StepError),
    #[error(transparent)]
    Tour(#[from] TourError),
}
