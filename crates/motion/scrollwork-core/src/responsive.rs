//! Breakpoint-gated behavior groups.
//!
//! A switch holds an ordered breakpoint → behavior map for one section. At most
//! one group is active; moving to another group closes the previous group's
//! scope before the next behavior runs, so two groups never drive the same
//! elements at once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::{MotionError, Result};
use crate::ids::ScopeId;
use crate::section::SectionTargets;

/// Named predicate over viewport width: `min_width <= width < below`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    /// Inclusive lower bound.
    #[serde(default)]
    pub min_width: Option<f32>,
    /// Exclusive upper bound.
    #[serde(default)]
    pub below: Option<f32>,
}

impl Breakpoint {
    /// Matches every width.
    pub fn always() -> Self {
        Self {
            name: "all".into(),
            min_width: None,
            below: None,
        }
    }

    /// `(min-width: <min>px)`
    pub fn wide(min: f32) -> Self {
        Self {
            name: "wide".into(),
            min_width: Some(min),
            below: None,
        }
    }

    /// Everything narrower than `wide(min)`.
    pub fn narrow(min: f32) -> Self {
        Self {
            name: "narrow".into(),
            min_width: None,
            below: Some(min),
        }
    }

    pub fn matches(&self, width: f32) -> bool {
        self.min_width.map_or(true, |min| min <= width) && self.below.map_or(true, |b| width < b)
    }
}

/// Activates one breakpoint group inside the scope it is given.
pub type Behavior = Box<dyn FnMut(&mut Engine, ScopeId, &SectionTargets) -> Result<()>>;

pub struct BehaviorGroup {
    pub breakpoint: Breakpoint,
    pub activate: Behavior,
}

impl BehaviorGroup {
    pub fn new(
        breakpoint: Breakpoint,
        activate: impl FnMut(&mut Engine, ScopeId, &SectionTargets) -> Result<()> + 'static,
    ) -> Self {
        Self {
            breakpoint,
            activate: Box::new(activate),
        }
    }
}

impl fmt::Debug for BehaviorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorGroup")
            .field("breakpoint", &self.breakpoint)
            .finish_non_exhaustive()
    }
}

/// Outcome of a switch evaluation that changed the active group.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakpointSwitch {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Default)]
pub struct ResponsiveSwitch {
    groups: Vec<BehaviorGroup>,
    active: Option<(usize, ScopeId)>,
}

impl ResponsiveSwitch {
    pub fn new(groups: Vec<BehaviorGroup>) -> Self {
        Self {
            groups,
            active: None,
        }
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active
            .map(|(idx, _)| self.groups[idx].breakpoint.name.as_str())
    }

    pub fn active_scope(&self) -> Option<ScopeId> {
        self.active.map(|(_, scope)| scope)
    }

    /// First group whose breakpoint matches `width`.
    pub fn matching(&self, width: f32) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.breakpoint.matches(width))
    }

    /// Activate the group matching `width`, tearing down the current one first.
    /// An activator error closes the half-built scope and propagates.
    pub fn evaluate(
        &mut self,
        engine: &mut Engine,
        width: f32,
        targets: &SectionTargets,
    ) -> Result<Option<BreakpointSwitch>> {
        let next = self.matching(width);
        if next == self.active.map(|(idx, _)| idx) {
            return Ok(None);
        }
        let from = self.active_name().map(str::to_string);
        self.deactivate(engine)?;

        let Some(idx) = next else {
            return Ok(Some(BreakpointSwitch { from, to: None }));
        };
        let group = &mut self.groups[idx];
        let scope = engine.open_scope(format!("breakpoint:{}", group.breakpoint.name));
        if let Err(err) = (group.activate)(engine, scope, targets) {
            log::debug!(
                "breakpoint group '{}' failed to activate: {err}",
                group.breakpoint.name
            );
            if let Err(close_err) = close(engine, scope) {
                log::warn!("closing failed scope {scope:?}: {close_err}");
            }
            return Err(err);
        }
        self.active = Some((idx, scope));
        Ok(Some(BreakpointSwitch {
            from,
            to: Some(group.breakpoint.name.clone()),
        }))
    }

    /// Close the active group's scope, if any.
    pub fn deactivate(&mut self, engine: &mut Engine) -> Result<()> {
        match self.active.take() {
            Some((_, scope)) => close(engine, scope),
            None => Ok(()),
        }
    }
}

/// Close a group's scope. A behavior may already have closed it itself.
fn close(engine: &mut Engine, scope: ScopeId) -> Result<()> {
    match engine.close_scope(scope) {
        Err(MotionError::UnknownScope(_)) => {
            log::debug!("scope {scope:?} already closed");
            Ok(())
        }
        other => other,
    }
}
