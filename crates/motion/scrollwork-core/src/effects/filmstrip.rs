//! Pinned horizontal filmstrip.
//!
//! On wide viewports the frame is pinned while the page scrolls a distance of
//! `D + 0.6 × viewport height`, where `D` is how far the strip overflows the
//! frame. Over that range the strip slides left by `D` and the background by a
//! fraction of it. While the strip fits its frame nothing pins or moves.
//! Narrow viewports scroll the strip natively, so nothing is pinned and both
//! layers sit at `x = 0`.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::ease::Ease;
use crate::geometry::{Edge, EndPosition, Measure, Position};
use crate::ids::ElementId;
use crate::props::Props;
use crate::responsive::BehaviorGroup;
use crate::section::SectionSpec;
use crate::timeline::{TimelineCfg, TweenCfg};
use crate::trigger::{TriggerCfg, TriggerMode};

use super::wide_and_narrow;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmstripCfg {
    /// Extra pinned scroll beyond the overflow, as a fraction of viewport height.
    pub extra_viewport: f32,
    /// Scrub smoothing (s).
    pub smoothing: f32,
    /// Background travel as a fraction of the strip's.
    pub background_ratio: f32,
}

impl Default for FilmstripCfg {
    fn default() -> Self {
        Self {
            extra_viewport: 0.6,
            smoothing: 0.6,
            background_ratio: 0.3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilmstripElements {
    pub container: ElementId,
    /// Visible window; pinned and used as trigger subject.
    pub frame: ElementId,
    /// Overflowing content row.
    pub strip: ElementId,
    #[serde(default)]
    pub background: Option<ElementId>,
}

impl FilmstripElements {
    /// `max(0, strip.scroll_width - frame.client_width)`
    pub fn overflow(&self) -> Measure {
        Measure::Overflow {
            content: self.strip,
            frame: self.frame,
        }
    }

    fn layers(&self) -> impl Iterator<Item = ElementId> {
        [Some(self.strip), self.background].into_iter().flatten()
    }
}

pub fn section(config: &Config, cfg: FilmstripCfg, els: FilmstripElements) -> SectionSpec {
    let mut targets = vec![els.frame];
    targets.extend(els.layers());
    let mut spec = SectionSpec::new("filmstrip", els.container, targets);
    for layer in els.layers() {
        spec = spec.final_state(layer, Props::new().x(0.0));
    }

    let (wide, narrow) = wide_and_narrow(config);
    spec.group(BehaviorGroup::new(wide, move |engine, scope, _| {
        let overflow = els.overflow();
        // A strip that fits leaves the trigger inert until a refresh measures overflow.
        match overflow.resolve(engine.scene()) {
            Some(d) if d > 0.0 => log::debug!("filmstrip overflow {d}px"),
            _ => log::debug!("filmstrip: strip fits its frame, pin stays inert"),
        }

        let slide = engine.create_timeline(scope, TimelineCfg::paused(0.0))?;
        engine.add_tween(
            slide,
            TweenCfg::from_to(
                els.strip,
                Props::new().x(0.0),
                Props::new().x(overflow.clone().scaled(-1.0)),
            )
            .duration(1.0)
            .ease(Ease::None)
            .at(0.0),
        )?;
        if let Some(background) = els.background {
            engine.add_tween(
                slide,
                TweenCfg::from_to(
                    background,
                    Props::new().x(0.0),
                    Props::new().x(overflow.clone().scaled(-cfg.background_ratio)),
                )
                .duration(1.0)
                .ease(Ease::None)
                .at(0.0),
            )?;
        }

        let distance = overflow
            .clone()
            .plus(Measure::ViewportHeight(cfg.extra_viewport));
        engine.create_trigger(
            scope,
            TriggerCfg::new(
                els.frame,
                Position::new(Edge::Top, Edge::Top),
                EndPosition::Distance(distance),
                TriggerMode::scrub(cfg.smoothing),
            )
            .pin(els.frame)
            .requires(overflow)
            .drive(slide),
        )?;
        Ok(())
    }))
    .group(BehaviorGroup::new(narrow, move |engine, _, _| {
        for layer in els.layers() {
            engine.set_props(layer, &Props::new().x(0.0));
        }
        Ok(())
    }))
}
