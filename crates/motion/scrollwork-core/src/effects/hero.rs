//! Hero entrance and background parallax.
//!
//! The heading, subheading, and scroll indicator fade up in an overlapping
//! sequence after a short delay. The background shrinks slightly and drifts
//! down while the hero scrolls out of view.

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
pub struct HeroCfg {
    /// Seconds before the entrance starts.
    pub delay: f32,
    /// Entrance start offset below the resting position (px).
    pub rise: f32,
    pub duration: f32,
    pub ease: Ease,
    /// Subheading start relative to the heading's end (s).
    pub subheading_offset: f32,
    /// Indicator start relative to the subheading's end (s).
    pub indicator_offset: f32,
    /// Background scale once the hero has scrolled away.
    pub background_scale: f32,
    /// Background downward drift over the same range (px).
    pub background_drift: f32,
    pub background_ease: Ease,
    /// Scrub smoothing for the background (s).
    pub smoothing: f32,
}

impl Default for HeroCfg {
    fn default() -> Self {
        Self {
            delay: 0.2,
            rise: 10.0,
            duration: 0.6,
            ease: Ease::Power2Out,
            subheading_offset: -0.3,
            indicator_offset: -0.2,
            background_scale: 0.98,
            background_drift: 10.0,
            background_ease: Ease::Power2Out,
            smoothing: 0.3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeroElements {
    pub container: ElementId,
    pub background: ElementId,
    pub heading: ElementId,
    pub subheading: ElementId,
    #[serde(default)]
    pub indicator: Option<ElementId>,
}

impl HeroElements {
    fn texts(&self) -> impl Iterator<Item = ElementId> {
        [Some(self.heading), Some(self.subheading), self.indicator]
            .into_iter()
            .flatten()
    }
}

pub fn section(cfg: HeroCfg, els: HeroElements) -> SectionSpec {
    let mut targets = vec![els.background];
    targets.extend(els.texts());
    let mut spec = SectionSpec::new("hero", els.container, targets)
        .final_state(els.background, Props::new().scale(1.0).y(0.0));
    for text in els.texts() {
        spec = spec.final_state(text, Props::new().opacity(1.0).y(0.0));
    }
    spec.group(BehaviorGroup::new(Breakpoint::always(), move |engine, scope, _| {
        let hidden = Props::new().opacity(0.0).y(cfg.rise);
        let shown = Props::new().opacity(1.0).y(0.0);
        let entrance = engine.create_timeline(scope, TimelineCfg::autoplay(cfg.delay))?;
        let fade_up = |target| {
            TweenCfg::from_to(target, hidden.clone(), shown.clone())
                .duration(cfg.duration)
                .ease(cfg.ease)
        };
        engine.add_tween(entrance, fade_up(els.heading))?;
        engine.add_tween(entrance, fade_up(els.subheading).offset(cfg.subheading_offset))?;
        if let Some(indicator) = els.indicator {
            engine.add_tween(entrance, fade_up(indicator).offset(cfg.indicator_offset))?;
        }

        let parallax = engine.create_timeline(scope, TimelineCfg::paused(0.0))?;
        engine.add_tween(
            parallax,
            TweenCfg::from_to(
                els.background,
                Props::new().scale(1.0),
                Props::new().scale(cfg.background_scale),
            )
            .duration(1.0)
            .ease(cfg.background_ease)
            .at(0.0),
        )?;
        engine.add_tween(
            parallax,
            TweenCfg::from_to(
                els.background,
                Props::new().y(0.0),
                Props::new().y(cfg.background_drift),
            )
            .duration(1.0)
            .ease(Ease::None)
            .at(0.0),
        )?;
        engine.create_trigger(
            scope,
            TriggerCfg::new(
                els.container,
                Position::new(Edge::Top, Edge::Top),
                Position::new(Edge::Bottom, Edge::Top),
                TriggerMode::scrub(cfg.smoothing),
            )
            .drive(parallax),
        )?;
        Ok(())
    }))
}
