//! One-shot fade-in-up for the RSVP block.
//!
//! The content rises into place the first time a tenth of it is on screen and
//! stays there; scrolling back up never hides it again.

use serde::{Deserialize, Serialize};

use crate::ease::Ease;
use crate::geometry::{Edge, Position};
use crate::ids::ElementId;
use crate::props::Props;
use crate::responsive::{BehaviorGroup, Breakpoint};
use crate::section::SectionSpec;
use crate::timeline::{TimelineCfg, TweenCfg};
use crate::trigger::{ToggleActions, TriggerCfg, TriggerMode};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsvpCfg {
    /// Start offset below rest (px).
    pub rise: f32,
    pub duration: f32,
    pub ease: Ease,
    /// Visible share of the content (0-100) that starts the reveal.
    pub threshold_percent: f32,
}

impl Default for RsvpCfg {
    fn default() -> Self {
        Self {
            rise: 32.0,
            duration: 0.5,
            ease: Ease::CubicBezier([0.0, 0.0, 0.2, 1.0]),
            threshold_percent: 10.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RsvpElements {
    pub container: ElementId,
    pub content: ElementId,
}

fn resting() -> Props {
    Props::new().opacity(1.0).y(0.0)
}

pub fn section(cfg: RsvpCfg, els: RsvpElements) -> SectionSpec {
    SectionSpec::new("rsvp", els.container, vec![els.content])
        .final_state(els.content, resting())
        .group(BehaviorGroup::new(Breakpoint::always(), move |engine, scope, _| {
            let timeline = engine.create_timeline(scope, TimelineCfg::paused(0.0))?;
            engine.add_tween(
                timeline,
                TweenCfg::from_to(
                    els.content,
                    Props::new().opacity(0.0).y(cfg.rise),
                    resting(),
                )
                .duration(cfg.duration)
                .ease(cfg.ease),
            )?;
            // `play none none none`
            engine.create_trigger(
                scope,
                TriggerCfg::new(
                    els.content,
                    Position::new(Edge::Percent(cfg.threshold_percent), Edge::Bottom),
                    Position::new(Edge::Bottom, Edge::Top),
                    TriggerMode::Toggle(ToggleActions::default()),
                )
                .once()
                .drive(timeline),
            )?;
            Ok(())
        }))
}
