//! Input contracts for the core engine.
//!
//! Hosts (wasm glue or tests) collect DOM events between frames and pass them into
//! `Engine::update()` in the order they happened.

use serde::{Deserialize, Serialize};

use crate::geometry::ElementBox;
use crate::ids::ElementId;

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    /// Host events applied in order before clocks advance.
    #[serde(default)]
    pub events: Vec<HostEvent>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, event: HostEvent) -> Self {
        self.events.push(event);
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// An element entered the document with the given layout box.
    Mount { element: ElementId, layout: ElementBox },
    /// A mounted element's layout changed (content reflow, images loaded).
    Layout { element: ElementId, layout: ElementBox },
    Unmount { element: ElementId },
    /// Viewport size changed.
    Resize { width: f32, height: f32 },
    Scroll { y: f32 },
    /// `prefers-reduced-motion` changed; `None` when the platform can't tell.
    ReducedMotion {
        #[serde(default)]
        reduced: Option<bool>,
    },
    /// Recompute every trigger boundary without a size change.
    Refresh,
}
