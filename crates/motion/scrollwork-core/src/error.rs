//! Error type shared by every fallible core API.

use thiserror::Error;

use crate::ids::{ElementId, ScopeId, SectionId, TimelineId, TriggerId};

/// Errors produced while registering or driving scroll effects.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MotionError {
    #[error("element {0:?} is not mounted")]
    MissingSubject(ElementId),
    #[error("unknown trigger {0:?}")]
    UnknownTrigger(TriggerId),
    #[error("unknown timeline {0:?}")]
    UnknownTimeline(TimelineId),
    #[error("unknown or closed scope {0:?}")]
    UnknownScope(ScopeId),
    #[error("unknown section {0:?}")]
    UnknownSection(SectionId),
    #[error("invalid position '{0}'")]
    InvalidPosition(String),
    #[error("invalid ease '{0}'")]
    InvalidEase(String),
    #[error("invalid toggle actions '{0}'")]
    InvalidToggleActions(String),
}

pub type Result<T> = std::result::Result<T, MotionError>;
