mod ids;
mod step;
mod tour;

pub use ids::{IdError, PanelId, StorageKey, TargetId};
pub use step::{Step, StepDraft, StepError, TooltipPosition};
pub use tour::{Tour, TourError};
