use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::StorageKey;
use crate::model::step::{Step, StepDraft, StepError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TourError {
    #[error("a walkthrough needs at least one step")]
    NoSteps,
    #[error("step {index} is invalid: {source}")]
    InvalidStep {
        index: usize,
        #[source]
        source: StepError,
    },
}

/// A fixed, ordered walkthrough bound to the key that records completion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TourRecord")]
pub struct Tour {
    storage_key: StorageKey,
    steps: Vec<Step>,
}

#[derive(Deserialize)]
struct TourRecord {
    storage_key: StorageKey,
    steps: Vec<Step>,
}

impl TryFrom<TourRecord> for Tour {
    type Error = TourError;

    fn try_from(value: TourRecord) -> Result<Self, Self::Error> {
        Self::new(value.storage_key, value.steps)
    }
}

impl Tour {
    /// Build a tour from validated steps.
    ///
    /// # Errors
    ///
    /// Returns `TourError::NoSteps` if `steps` is empty.
    pub fn new(storage_key: StorageKey, steps: Vec<Step>) -> Result<Self, TourError> {
        if steps.is_empty() {
            return Err(TourError::NoSteps);
        }
        Ok(Self { storage_key, steps })
    }

    /// Validate every draft and build a tour from them.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidStep` for the first draft that fails validation,
    /// or `TourError::NoSteps` if `drafts` is empty.
    pub fn from_drafts(
        storage_key: StorageKey,
        drafts: impl IntoIterator<Item = StepDraft>,
    ) -> Result<Self, TourError> {
        let steps = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate()
                    .map_err(|source| TourError::InvalidStep { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(storage_key, steps)
    }

    #[must_use]
    pub fn storage_key(&self) -> &StorageKey {
        &self.storage_key
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}
