//! Mountable sections: the unit of effect registration.
//!
//! A section names its container, its ordered target elements, a breakpoint →
//! behavior map, and the static state its elements should show when motion is
//! reduced. The engine drives the lifecycle:
//!
//! `Pending` (elements not mounted yet) → `Active` (breakpoint-gated) → `Disposed`,
//! or `Pending` → `Static` when reduced motion is requested.

use serde::{Deserialize, Serialize};

use crate::ids::{ElementId, SectionId};
use crate::props::Props;
use crate::responsive::{BehaviorGroup, ResponsiveSwitch};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
    /// Registered, waiting for its elements to mount.
    Pending,
    /// Breakpoint groups are live.
    Active,
    /// Reduced motion: final state applied, nothing animates.
    Static,
    Disposed,
}

/// Element handles handed to behaviors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionTargets {
    pub container: ElementId,
    /// Ordered targets (e.g. one per content tile).
    pub targets: Vec<ElementId>,
}

impl SectionTargets {
    pub fn all(&self) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::once(self.container).chain(self.targets.iter().copied())
    }

    pub fn target(&self, idx: usize) -> Option<ElementId> {
        self.targets.get(idx).copied()
    }
}

pub struct SectionSpec {
    pub name: String,
    pub elements: SectionTargets,
    /// Extra elements that must be mounted before activation, beyond container
    /// and targets (e.g. a preceding section used as trigger subject).
    pub requires: Vec<ElementId>,
    pub groups: Vec<BehaviorGroup>,
    /// Applied instead of any animation when motion is reduced.
    pub final_state: Vec<(ElementId, Props)>,
}

impl SectionSpec {
    pub fn new(name: impl Into<String>, container: ElementId, targets: Vec<ElementId>) -> Self {
        Self {
            name: name.into(),
            elements: SectionTargets { container, targets },
            requires: Vec::new(),
            groups: Vec::new(),
            final_state: Vec::new(),
        }
    }

    pub fn group(mut self, group: BehaviorGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn requires(mut self, el: ElementId) -> Self {
        self.requires.push(el);
        self
    }

    pub fn final_state(mut self, el: ElementId, props: Props) -> Self {
        self.final_state.push((el, props));
        self
    }
}

impl std::fmt::Debug for SectionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionSpec")
            .field("name", &self.name)
            .field("elements", &self.elements)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub(crate) struct Section {
    pub id: SectionId,
    pub name: String,
    pub elements: SectionTargets,
    pub requires: Vec<ElementId>,
    /// Taken out while a behavior runs so the behavior can borrow the engine.
    pub switch: Option<ResponsiveSwitch>,
    pub final_state: Vec<(ElementId, Props)>,
    pub state: SectionState,
}

impl Section {
    pub fn new(id: SectionId, spec: SectionSpec) -> Self {
        Self {
            id,
            name: spec.name,
            elements: spec.elements,
            requires: spec.requires,
            switch: Some(ResponsiveSwitch::new(spec.groups)),
            final_state: spec.final_state,
            state: SectionState::Pending,
        }
    }

    /// Every element that must be mounted before the section can run.
    pub fn required(&self) -> Vec<ElementId> {
        self.elements
            .all()
            .chain(self.requires.iter().copied())
            .collect()
    }

    pub fn uses(&self, el: ElementId) -> bool {
        self.elements.all().any(|e| e == el) || self.requires.contains(&el)
    }
}
