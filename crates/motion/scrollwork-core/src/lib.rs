//! Scrollwork Core (engine-agnostic)
//!
//! Scroll-synchronized animation orchestration: scroll triggers, clock and scrub
//! timelines, breakpoint-gated behavior groups, and the reduced-motion fallback.
//! The engine is headless. Hosts feed element layout and viewport events through
//! [`Inputs`] and apply the visual changes and pin instructions returned in
//! [`Outputs`].

pub mod config;
pub mod content;
pub mod ease;
pub mod effects;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod inputs;
pub mod motion;
pub mod outputs;
pub mod props;
pub mod responsive;
pub mod scene;
pub mod scope;
pub mod section;
pub mod timeline;
pub mod trigger;

// Re-exports for consumers (adapters)
pub use config::Config;
pub use content::ContentItem;
pub use ease::Ease;
pub use engine::Engine;
pub use error::{MotionError, Result};
pub use geometry::{Edge, ElementBox, EndPosition, Measure, Position, Rect, Viewport};
pub use ids::{ElementId, ScopeId, SectionId, SubscriptionId, TimelineId, TriggerId};
pub use inputs::{HostEvent, Inputs};
pub use motion::MotionPreference;
pub use outputs::{Change, CoreEvent, Outputs, PinChange};
pub use props::{Props, VisualState};
pub use responsive::{BehaviorGroup, Breakpoint};
pub use section::{SectionSpec, SectionState, SectionTargets};
pub use timeline::{Direction, Driver, Timeline, TimelineCfg, TweenCfg, TweenPosition};
pub use trigger::{
    Region, ToggleAction, ToggleActions, ToggleCallback, Trigger, TriggerCfg, TriggerMode,
};
