use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::ids::{IdError, TargetId};

/// Screen-relative placement hint for a step's tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipPosition {
    Left,
    Right,
    Top,
    #[default]
    Bottom,
    Center,
}

impl TooltipPosition {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for TooltipPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TooltipPosition {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "center" => Ok(Self::Center),
            _ => Err(StepError::UnknownPosition(s.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepError {
    #[error(transparent)]
    InvalidTarget(#[from] IdError),
    #[error("step title cannot be empty")]
    EmptyTitle,
    #[error("unknown tooltip position: {0}")]
    UnknownPosition(String),
}

/// Unvalidated step input, typically built by page code.
#[derive(Clone, Debug, Default)]
pub struct StepDraft {
    pub target_id: String,
    pub title: String,
    pub content: String,
    pub position: TooltipPosition,
}

impl StepDraft {
    #[must_use]
    pub fn new(
        target_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        position: TooltipPosition,
    ) -> Self {
        Self {
            target_id: target_id.into(),
            title: title.into(),
            content: content.into(),
            position,
        }
    }

    /// Validate the draft into a `Step`.
    ///
    /// # Errors
    ///
    /// Returns `StepError` if the target id or title is blank.
    pub fn validate(self) -> Result<Step, StepError> {
        let target_id = TargetId::new(self.target_id)?;
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(StepError::EmptyTitle);
        }
        Ok(Step {
            target_id,
            title,
            content: self.content.trim().to_string(),
            position: self.position,
        })
    }
}

/// One page of a guided walkthrough, bound to a target element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    target_id: TargetId,
    title: String,
    content: String,
    position: TooltipPosition,
}

impl Step {
    #[must_use]
    pub fn target_id(&self) -> &TargetId {
        &self.target_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn position(&self) -> TooltipPosition {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_trims_text_but_keeps_target_verbatim() {
        let step = StepDraft::new(
            "kpi-revenue ",
            " Revenue ",
            " Monthly totals ",
            TooltipPosition::Right,
        )
        .validate()
        .unwrap();
        assert_eq!(step.target_id().as_str(), "kpi-revenue ");
        assert_eq!(step.title(), "Revenue");
        assert_eq!(step.content(), "Monthly totals");
        assert_eq!(step.position(), TooltipPosition::Right);
    }

    #[test]
    fn draft_rejects_blank_title() {
        let err = StepDraft::new("nav", "  ", "", TooltipPosition::Top)
            .validate()
            .unwrap_err();
        assert_eq!(err, StepError::EmptyTitle);
    }

    #[test]
    fn draft_rejects_blank_target() {
        let err = StepDraft::new("", "Title", "", TooltipPosition::Top)
            .validate()
            .unwrap_err();
        assert!(matches!(err, StepError::InvalidTarget(_)));
    }

    #[test]
    fn position_parses_case_insensitively() {
        assert_eq!("Center".parse::<TooltipPosition>().unwrap(), TooltipPosition::Center);
        assert_eq!(" left".parse::<TooltipPosition>().unwrap(), TooltipPosition::Left);
        assert!("diagonal".parse::<TooltipPosition>().is_err());
    }

    #[test]
    fn step_deserializes_from_page_json() {
        let json = r#"{"target_id":"campaign-list","title":"Campaigns","content":"Active sends","position":"top"}"#;
        let step: Step = serde_json::from_str(json).unwrap();
        assert_eq!(step.position(), TooltipPosition::Top);
        assert_eq!(step.target_id().as_str(), "campaign-list");
    }
}
