//! Staggered reveal for a featured-content block: a heading, an optional lead
//! card, and a row of tiles.
//!
//! On wide viewports each element fades up into place when it scrolls into view
//! and reverses when scrolled back above it. The heading and card also scale
//! in; tiles slide in from the right instead. Tile `i` waits `i × stagger`
//! seconds. Narrow viewports skip the animation and show everything at rest.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::content::ContentItem;
use crate::ease::Ease;
use crate::engine::Engine;
use crate::error::Result;
use crate::geometry::{Edge, Position};
use crate::ids::{ElementId, ScopeId};
use crate::props::Props;
use crate::responsive::BehaviorGroup;
use crate::section::SectionSpec;
use crate::timeline::{TimelineCfg, TweenCfg};
use crate::trigger::{ToggleAction, ToggleActions, TriggerCfg, TriggerMode};

use super::wide_and_narrow;

/// Hidden state an element enters from, and how long it takes to settle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entrance {
    /// Start offset below rest (px).
    pub rise: f32,
    /// Start offset right of rest (px).
    pub shift: f32,
    pub from_scale: f32,
    pub duration: f32,
}

impl Entrance {
    pub const fn new(rise: f32, shift: f32, from_scale: f32, duration: f32) -> Self {
        Self {
            rise,
            shift,
            from_scale,
            duration,
        }
    }

    fn hidden(&self) -> Props {
        Props::new()
            .opacity(0.0)
            .x(self.shift)
            .y(self.rise)
            .scale(self.from_scale)
    }
}

impl Default for Entrance {
    fn default() -> Self {
        Self::new(30.0, 0.0, 0.95, 0.6)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealCfg {
    pub heading: Entrance,
    pub card: Entrance,
    pub tile: Entrance,
    pub ease: Ease,
    /// Delay step between consecutive tiles (s).
    pub stagger: f32,
    pub heading_start: Position,
    pub heading_end: Position,
    pub tile_start: Position,
    pub tile_end: Position,
    pub toggle_actions: ToggleActions,
}

impl Default for RevealCfg {
    fn default() -> Self {
        Self {
            heading: Entrance::new(30.0, 0.0, 0.95, 0.6),
            card: Entrance::new(40.0, 0.0, 0.9, 0.8),
            tile: Entrance::new(30.0, 20.0, 1.0, 0.7),
            ease: Ease::Power2Out,
            stagger: 0.15,
            heading_start: Position::new(Edge::Top, Edge::Percent(80.0)),
            heading_end: Position::new(Edge::Bottom, Edge::Percent(20.0)),
            tile_start: Position::new(Edge::Top, Edge::Percent(85.0)),
            tile_end: Position::new(Edge::Bottom, Edge::Percent(15.0)),
            toggle_actions: ToggleActions {
                on_enter: ToggleAction::Play,
                on_leave: ToggleAction::None,
                on_enter_back: ToggleAction::None,
                on_leave_back: ToggleAction::Reverse,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealElements {
    pub container: ElementId,
    pub heading: ElementId,
    #[serde(default)]
    pub card: Option<ElementId>,
    #[serde(default)]
    pub tiles: Vec<ElementId>,
}

fn resting() -> Props {
    Props::new().opacity(1.0).x(0.0).y(0.0).scale(1.0)
}

/// One toggle-driven entrance on `target`, waiting `delay` seconds after each
/// fresh play.
fn reveal_one(
    engine: &mut Engine,
    scope: ScopeId,
    cfg: &RevealCfg,
    target: ElementId,
    entrance: Entrance,
    delay: f32,
    range: (Position, Position),
) -> Result<()> {
    let timeline = engine.create_timeline(scope, TimelineCfg::paused(delay))?;
    engine.add_tween(
        timeline,
        TweenCfg::from_to(target, entrance.hidden(), resting())
            .duration(entrance.duration)
            .ease(cfg.ease),
    )?;
    engine.create_trigger(
        scope,
        TriggerCfg::new(target, range.0, range.1, TriggerMode::Toggle(cfg.toggle_actions))
            .drive(timeline),
    )?;
    Ok(())
}

/// Build the reveal section. Only the first `min(items, tiles)` tiles are
/// staggered; any extra tile handles are shown at rest.
pub fn section(
    config: &Config,
    cfg: RevealCfg,
    els: RevealElements,
    items: &[ContentItem],
) -> SectionSpec {
    let staggered = items.len().min(els.tiles.len());
    let mut targets = vec![els.heading];
    targets.extend(els.card);
    targets.extend(els.tiles.iter().copied());

    let mut spec = SectionSpec::new("featured-content", els.container, targets.clone());
    for el in &targets {
        spec = spec.final_state(*el, resting());
    }

    let (wide, narrow) = wide_and_narrow(config);
    spec.group(BehaviorGroup::new(wide, move |engine, scope, _| {
        let heading_range = (cfg.heading_start, cfg.heading_end);
        let tile_range = (cfg.tile_start, cfg.tile_end);
        reveal_one(engine, scope, &cfg, els.heading, cfg.heading, 0.0, heading_range)?;
        if let Some(card) = els.card {
            reveal_one(engine, scope, &cfg, card, cfg.card, 0.0, tile_range)?;
        }
        for (i, tile) in els.tiles.iter().enumerate() {
            if i < staggered {
                let delay = i as f32 * cfg.stagger;
                reveal_one(engine, scope, &cfg, *tile, cfg.tile, delay, tile_range)?;
            } else {
                engine.set_props(*tile, &resting());
            }
        }
        Ok(())
    }))
    .group(BehaviorGroup::new(narrow, move |engine, _, _| {
        for el in &targets {
            engine.set_props(*el, &resting());
        }
        Ok(())
    }))
}
