//! Animatable visual properties.
//!
//! `Props` is what callers write (values may be layout-derived `Measure`s);
//! `ResolvedProps` is the same set after measuring; `VisualState` is the full,
//! resolved state of one element as the host should render it.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::ease::lerp_f32;
use crate::geometry::Measure;
use crate::ids::ElementId;
use crate::outputs::Outputs;
use crate::scene::Scene;

/// Complete visual state of an element. Defaults are the element's natural rendering.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub opacity: f32,
    /// Horizontal translation in px.
    pub x: f32,
    /// Vertical translation in px.
    pub y: f32,
    pub scale: f32,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

/// Partial property set. Unset fields are left untouched when applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Props {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Measure>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(mut self, v: impl Into<Measure>) -> Self {
        self.opacity = Some(v.into());
        self
    }

    pub fn x(mut self, v: impl Into<Measure>) -> Self {
        self.x = Some(v.into());
        self
    }

    pub fn y(mut self, v: impl Into<Measure>) -> Self {
        self.y = Some(v.into());
        self
    }

    pub fn scale(mut self, v: impl Into<Measure>) -> Self {
        self.scale = Some(v.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.opacity.is_none() && self.x.is_none() && self.y.is_none() && self.scale.is_none()
    }

    /// Measure every set field. A field whose measure can't resolve is dropped.
    pub fn resolve(&self, scene: &Scene) -> ResolvedProps {
        let r = |m: &Option<Measure>| m.as_ref().and_then(|m| m.resolve(scene));
        ResolvedProps {
            opacity: r(&self.opacity),
            x: r(&self.x),
            y: r(&self.y),
            scale: r(&self.scale),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedProps {
    pub opacity: Option<f32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub scale: Option<f32>,
}

impl ResolvedProps {
    /// Write the set fields onto `state`.
    pub fn apply_to(&self, state: &mut VisualState) {
        if let Some(v) = self.opacity {
            state.opacity = v;
        }
        if let Some(v) = self.x {
            state.x = v;
        }
        if let Some(v) = self.y {
            state.y = v;
        }
        if let Some(v) = self.scale {
            state.scale = v;
        }
    }

    /// Read from `state` every field that `shape` has set.
    pub fn capture(state: &VisualState, shape: &ResolvedProps) -> Self {
        Self {
            opacity: shape.opacity.map(|_| state.opacity),
            x: shape.x.map(|_| state.x),
            y: shape.y.map(|_| state.y),
            scale: shape.scale.map(|_| state.scale),
        }
    }

    /// Interpolate field-wise. Fields missing on either side take the `to` value.
    pub fn lerp(from: &ResolvedProps, to: &ResolvedProps, t: f32) -> Self {
        let mix = |a: Option<f32>, b: Option<f32>| match (a, b) {
            (Some(a), Some(b)) => Some(lerp_f32(a, b, t)),
            (_, b) => b,
        };
        Self {
            opacity: mix(from.opacity, to.opacity),
            x: mix(from.x, to.x),
            y: mix(from.y, to.y),
            scale: mix(from.scale, to.scale),
        }
    }
}

/// Current visual state of every element the engine has touched.
#[derive(Debug, Default)]
pub struct StyleStore {
    states: HashMap<ElementId, VisualState>,
}

impl StyleStore {
    /// State of `el`, or its natural state if nothing was applied yet.
    pub fn get(&self, el: ElementId) -> VisualState {
        self.states.get(&el).copied().unwrap_or_default()
    }

    /// Apply `props` onto `el`; records a change only when the state differs.
    pub fn write(&mut self, el: ElementId, props: &ResolvedProps, out: &mut Outputs) {
        let before = self.get(el);
        let mut next = before;
        props.apply_to(&mut next);
        if next != before || !self.states.contains_key(&el) {
            self.states.insert(el, next);
            out.push_change(el, next);
        }
    }
}
