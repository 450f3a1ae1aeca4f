//! Curved section dividers.
//!
//! `reveal_section` lifts and fades a divider in while the section above it
//! scrolls away. `drift_section` lets a divider float up and swell slightly
//! while it crosses the viewport.

use serde::{Deserialize, Serialize};

use crate::ease::Ease;
use crate::geometry::{Edge, Position};
use crate::ids::ElementId;
use crate::props::Props;
use crate::responsive::{BehaviorGroup, Breakpoint};
use crate::section::SectionSpec;
use crate::timeline::{TimelineCfg, TweenCfg};
use crate::trigger::{TriggerCfg, TriggerMode};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividerCfg {
    /// Reveal start offset below rest (px).
    pub rise: f32,
    pub reveal_ease: Ease,
    pub reveal_smoothing: f32,
    /// Drift end offset (px, negative is up).
    pub drift_y: f32,
    pub drift_scale: f32,
    pub drift_ease: Ease,
    pub drift_smoothing: f32,
    pub duration: f32,
}

impl Default for DividerCfg {
    fn default() -> Self {
        Self {
            rise: 20.0,
            reveal_ease: Ease::Power2Out,
            reveal_smoothing: 0.5,
            drift_y: -12.0,
            drift_scale: 1.02,
            drift_ease: Ease::Power1Out,
            drift_smoothing: 0.5,
            duration: 0.8,
        }
    }
}

/// Divider revealed by the section above it (`bottom center` → `bottom top`).
pub fn reveal_section(cfg: DividerCfg, divider: ElementId, preceding: ElementId) -> SectionSpec {
    SectionSpec::new("divider-reveal", divider, Vec::new())
        .requires(preceding)
        .final_state(divider, Props::new().opacity(1.0).y(0.0))
        .group(BehaviorGroup::new(Breakpoint::always(), move |engine, scope, _| {
            let timeline = engine.create_timeline(scope, TimelineCfg::paused(0.0))?;
            engine.add_tween(
                timeline,
                TweenCfg::from_to(
                    divider,
                    Props::new().opacity(0.0).y(cfg.rise),
                    Props::new().opacity(1.0).y(0.0),
                )
                .duration(cfg.duration)
                .ease(cfg.reveal_ease),
            )?;
            engine.create_trigger(
                scope,
                TriggerCfg::new(
                    preceding,
                    Position::new(Edge::Bottom, Edge::Center),
                    Position::new(Edge::Bottom, Edge::Top),
                    TriggerMode::scrub(cfg.reveal_smoothing),
                )
                .drive(timeline),
            )?;
            Ok(())
        }))
}

/// Divider drifting over its own pass through the viewport (`top bottom` → `bottom top`).
pub fn drift_section(cfg: DividerCfg, divider: ElementId) -> SectionSpec {
    SectionSpec::new("divider-drift", divider, Vec::new())
        .final_state(divider, Props::new().y(0.0).scale(1.0))
        .group(BehaviorGroup::new(Breakpoint::always(), move |engine, scope, _| {
            let timeline = engine.create_timeline(scope, TimelineCfg::paused(0.0))?;
            engine.add_tween(
                timeline,
                TweenCfg::from_to(
                    divider,
                    Props::new().y(0.0).scale(1.0),
                    Props::new().y(cfg.drift_y).scale(cfg.drift_scale),
                )
                .duration(cfg.duration)
                .ease(cfg.drift_ease),
            )?;
            engine.create_trigger(
                scope,
                TriggerCfg::new(
                    divider,
                    Position::new(Edge::Top, Edge::Bottom),
                    Position::new(Edge::Bottom, Edge::Top),
                    TriggerMode::scrub(cfg.drift_smoothing),
                )
                .drive(timeline),
            )?;
            Ok(())
        }))
}
