//! Output contracts from the core engine.
//!
//! Outputs carry the visual-state changes produced since the last update, keyed
//! by element, the pin/unpin instructions, and a list of semantic events. Hosts
//! apply changes as transforms/opacity and pins as fixed positioning.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::ids::{ElementId, SectionId, TimelineId, TriggerId};
use crate::props::VisualState;
use crate::section::SectionState;
use crate::trigger::ToggleCallback;

/// The latest visual state of one element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub element: ElementId,
    pub state: VisualState,
}

/// Take an element out of (or return it to) normal scroll flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinChange {
    pub element: ElementId,
    pub pinned: bool,
    /// Viewport offset (px) at which the element is held while pinned.
    pub top: f32,
    /// Extra space the host reserves after the element so following content
    /// doesn't slide under it.
    pub spacing: f32,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum CoreEvent {
    TriggerToggled {
        trigger: TriggerId,
        callback: ToggleCallback,
    },
    PinStarted {
        trigger: TriggerId,
        element: ElementId,
    },
    PinEnded {
        trigger: TriggerId,
        element: ElementId,
    },
    TimelineCompleted {
        timeline: TimelineId,
    },
    TimelineRewound {
        timeline: TimelineId,
    },
    BreakpointChanged {
        section: SectionId,
        from: Option<String>,
        to: Option<String>,
    },
    SectionStateChanged {
        section: SectionId,
        state: SectionState,
    },
    RegistrationDeferred {
        section: SectionId,
        missing: Vec<ElementId>,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub pins: Vec<PinChange>,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
    /// Events dropped because `max_events_per_tick` was reached.
    #[serde(default)]
    pub dropped_events: usize,
    /// Position of each element's entry in `changes`.
    #[serde(skip)]
    change_index: HashMap<ElementId, usize>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.change_index.clear();
        self.pins.clear();
        self.events.clear();
        self.dropped_events = 0;
    }

    /// Record a state; a later change for the same element replaces the earlier one.
    pub fn push_change(&mut self, element: ElementId, state: VisualState) {
        if let Some(existing) = self.slot(element) {
            existing.state = state;
            return;
        }
        self.change_index.insert(element, self.changes.len());
        self.changes.push(Change { element, state });
    }

    fn slot(&mut self, element: ElementId) -> Option<&mut Change> {
        let i = *self.change_index.get(&element)?;
        self.changes.get_mut(i).filter(|c| c.element == element)
    }

    #[inline]
    pub fn push_pin(&mut self, pin: PinChange) {
        self.pins.push(pin);
    }

    pub fn push_event(&mut self, event: CoreEvent, cap: usize) {
        if self.events.len() >= cap {
            self.dropped_events += 1;
            return;
        }
        self.events.push(event);
    }

    /// Latest state recorded for `element` in this batch.
    pub fn change_for(&self, element: ElementId) -> Option<&VisualState> {
        match self.change_index.get(&element).and_then(|i| self.changes.get(*i)) {
            Some(c) if c.element == element => Some(&c.state),
            _ => self
                .changes
                .iter()
                .find(|c| c.element == element)
                .map(|c| &c.state),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.pins.is_empty() && self.events.is_empty()
    }
}
