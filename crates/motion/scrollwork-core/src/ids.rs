//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// Opaque handle for a host element. The host picks the numbers; the core never
/// allocates element ids.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimelineId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SectionId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

/// Monotonic allocator for engine-owned ids.
/// Ids are never reused within one engine, so a stale handle can't alias a new entity.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_trigger: u32,
    next_timeline: u32,
    next_scope: u32,
    next_section: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_trigger(&mut self) -> TriggerId {
        let id = TriggerId(self.next_trigger);
        self.next_trigger = self.next_trigger.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_timeline(&mut self) -> TimelineId {
        let id = TimelineId(self.next_timeline);
        self.next_timeline = self.next_timeline.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.next_scope);
        self.next_scope = self.next_scope.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_section(&mut self) -> SectionId {
        let id = SectionId(self.next_section);
        self.next_section = self.next_section.wrapping_add(1);
        id
    }
}
