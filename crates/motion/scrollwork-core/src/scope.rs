//! Disposal scopes.
//!
//! Every trigger and timeline is created against a scope; closing the scope
//! disposes all of them at once. Sections and breakpoint groups each own one.

use indexmap::IndexMap;

use crate::ids::{ScopeId, TimelineId, TriggerId};

#[derive(Debug, Default)]
pub struct ScopeEntry {
    pub label: String,
    pub triggers: Vec<TriggerId>,
    pub timelines: Vec<TimelineId>,
}

/// Arena of open scopes, in opening order.
#[derive(Debug, Default)]
pub struct Scopes {
    open: IndexMap<ScopeId, ScopeEntry>,
}

impl Scopes {
    pub fn insert(&mut self, id: ScopeId, label: impl Into<String>) {
        self.open.insert(
            id,
            ScopeEntry {
                label: label.into(),
                ..ScopeEntry::default()
            },
        );
    }

    pub fn get(&self, id: ScopeId) -> Option<&ScopeEntry> {
        self.open.get(&id)
    }

    pub fn contains(&self, id: ScopeId) -> bool {
        self.open.contains_key(&id)
    }

    pub fn track_trigger(&mut self, id: ScopeId, trigger: TriggerId) -> bool {
        match self.open.get_mut(&id) {
            Some(entry) => {
                entry.triggers.push(trigger);
                true
            }
            None => false,
        }
    }

    pub fn track_timeline(&mut self, id: ScopeId, timeline: TimelineId) -> bool {
        match self.open.get_mut(&id) {
            Some(entry) => {
                entry.timelines.push(timeline);
                true
            }
            None => false,
        }
    }

    pub fn forget_trigger(&mut self, id: ScopeId, trigger: TriggerId) {
        if let Some(entry) = self.open.get_mut(&id) {
            entry.triggers.retain(|t| *t != trigger);
        }
    }

    pub fn forget_timeline(&mut self, id: ScopeId, timeline: TimelineId) {
        if let Some(entry) = self.open.get_mut(&id) {
            entry.timelines.retain(|t| *t != timeline);
        }
    }

    /// Remove a scope and hand back what it owned.
    pub fn remove(&mut self, id: ScopeId) -> Option<ScopeEntry> {
        self.open.shift_remove(&id)
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
