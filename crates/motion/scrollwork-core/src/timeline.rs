//! Animation timelines: ordered tweens sampled either by a wall clock or by a
//! scrub trigger's progress.
//!
//! A timeline never owns elements. Rendering writes interpolated properties into
//! the engine's `StyleStore`, which records the resulting changes for the host.

use serde::{Deserialize, Serialize};

use crate::ease::Ease;
use crate::ids::{ElementId, ScopeId, TimelineId, TriggerId};
use crate::outputs::Outputs;
use crate::props::{Props, ResolvedProps, StyleStore};
use crate::scene::Scene;
use crate::trigger::ToggleAction;

/// Timeline-level options.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineCfg {
    /// Seconds to wait each time playback starts from the beginning.
    pub delay: f32,
    /// Created paused; something (usually a toggle trigger) must call play.
    pub paused: bool,
}

impl TimelineCfg {
    pub fn autoplay(delay: f32) -> Self {
        Self {
            delay,
            paused: false,
        }
    }

    pub fn paused(delay: f32) -> Self {
        Self {
            delay,
            paused: true,
        }
    }
}

/// Where a tween starts, in timeline seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenPosition {
    /// At the current end of the timeline.
    #[default]
    Sequential,
    /// Offset from the current end; negative values overlap the predecessor.
    Relative(f32),
    /// Absolute time from the timeline start.
    At(f32),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TweenCfg {
    pub target: ElementId,
    /// Explicit start state. `None` animates from whatever the element shows
    /// when the tween first renders.
    #[serde(default)]
    pub from: Option<Props>,
    pub to: Props,
    #[serde(default)]
    pub duration: Option<f32>,
    #[serde(default)]
    pub ease: Option<Ease>,
    #[serde(default)]
    pub position: TweenPosition,
}

impl TweenCfg {
    pub fn from_to(target: ElementId, from: Props, to: Props) -> Self {
        Self {
            target,
            from: Some(from),
            to,
            duration: None,
            ease: None,
            position: TweenPosition::Sequential,
        }
    }

    pub fn to(target: ElementId, to: Props) -> Self {
        Self {
            target,
            from: None,
            to,
            duration: None,
            ease: None,
            position: TweenPosition::Sequential,
        }
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn at(mut self, time: f32) -> Self {
        self.position = TweenPosition::At(time);
        self
    }

    pub fn offset(mut self, offset: f32) -> Self {
        self.position = TweenPosition::Relative(offset);
        self
    }
}

#[derive(Debug)]
struct Tween {
    target: ElementId,
    from: Option<Props>,
    to: Props,
    start: f32,
    duration: f32,
    ease: Ease,
    resolved_from: Option<ResolvedProps>,
    resolved_to: ResolvedProps,
    /// Render the from-state even before the tween starts.
    immediate: bool,
}

impl Tween {
    #[inline]
    fn end(&self) -> f32 {
        self.start + self.duration
    }

    fn render(&mut self, time: f32, styles: &mut StyleStore, out: &mut Outputs) {
        if time < self.start {
            if self.immediate {
                if let Some(from) = self.resolved_from {
                    styles.write(self.target, &from, out);
                }
            }
            return;
        }
        let linear = if self.duration > 0.0 {
            ((time - self.start) / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let from = match self.resolved_from {
            Some(from) => from,
            None => {
                let captured = ResolvedProps::capture(&styles.get(self.target), &self.resolved_to);
                self.resolved_from = Some(captured);
                captured
            }
        };
        let value = ResolvedProps::lerp(&from, &self.resolved_to, self.ease.apply(linear));
        styles.write(self.target, &value, out);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

/// What moves a timeline's playhead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Driver {
    Clock,
    /// Playhead mirrors a scrub trigger's progress.
    Trigger(TriggerId),
}

/// Clock milestones reported by [`Timeline::advance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockEvent {
    Completed,
    Rewound,
}

#[derive(Debug)]
pub struct Timeline {
    pub id: TimelineId,
    pub scope: ScopeId,
    delay: f32,
    pending_delay: f32,
    tweens: Vec<Tween>,
    duration: f32,
    time: f32,
    playing: bool,
    direction: Direction,
    driver: Driver,
}

impl Timeline {
    pub(crate) fn new(id: TimelineId, scope: ScopeId, cfg: &TimelineCfg) -> Self {
        let delay = cfg.delay.max(0.0);
        Self {
            id,
            scope,
            delay,
            pending_delay: delay,
            tweens: Vec::new(),
            duration: 0.0,
            time: 0.0,
            playing: !cfg.paused,
            direction: Direction::Forward,
            driver: Driver::Clock,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Seconds of delay left before the playhead moves.
    pub fn pending_delay(&self) -> f32 {
        self.pending_delay
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    pub fn targets(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.tweens.iter().map(|t| t.target)
    }

    pub(crate) fn set_driver(&mut self, driver: Driver) {
        self.driver = driver;
        if matches!(driver, Driver::Trigger(_)) {
            self.playing = false;
            self.pending_delay = 0.0;
        }
    }

    /// Append a tween. `defaults` supplies duration and ease when the cfg omits them.
    pub(crate) fn add(
        &mut self,
        cfg: TweenCfg,
        scene: &Scene,
        defaults: (f32, Ease),
        styles: &mut StyleStore,
        out: &mut Outputs,
    ) {
        let duration = cfg.duration.unwrap_or(defaults.0).max(0.0);
        let start = match cfg.position {
            TweenPosition::Sequential => self.duration,
            TweenPosition::Relative(offset) => (self.duration + offset).max(0.0),
            TweenPosition::At(at) => at.max(0.0),
        };
        let immediate =
            cfg.from.is_some() && !self.tweens.iter().any(|t| t.target == cfg.target);
        let mut tween = Tween {
            target: cfg.target,
            resolved_from: cfg.from.as_ref().map(|f| f.resolve(scene)),
            resolved_to: cfg.to.resolve(scene),
            from: cfg.from,
            to: cfg.to,
            start,
            duration,
            ease: cfg.ease.unwrap_or(defaults.1),
            immediate,
        };
        if immediate {
            if let Some(from) = tween.resolved_from {
                styles.write(tween.target, &from, out);
            }
        }
        self.duration = self.duration.max(tween.end());
        // Already past this tween's start (scrubbed or completed timelines).
        if self.time > 0.0 && self.time >= tween.start {
            tween.render(self.time, styles, out);
        }
        self.tweens.push(tween);
    }

    /// Re-measure layout-derived values after a refresh.
    pub(crate) fn invalidate(&mut self, scene: &Scene) {
        for tween in &mut self.tweens {
            if let Some(from) = &tween.from {
                tween.resolved_from = Some(from.resolve(scene));
            }
            tween.resolved_to = tween.to.resolve(scene);
        }
    }

    /// Sample every tween at the current playhead.
    pub(crate) fn render(&mut self, styles: &mut StyleStore, out: &mut Outputs) {
        let time = self.time;
        for tween in &mut self.tweens {
            tween.render(time, styles, out);
        }
    }

    /// Move the playhead to `progress` of the total duration (scrub driving).
    pub(crate) fn seek_progress(&mut self, progress: f32) {
        self.time = progress.clamp(0.0, 1.0) * self.duration;
    }

    /// Advance a clock-driven playhead. Returns whether the playhead moved and
    /// any milestone reached.
    pub(crate) fn advance(&mut self, dt: f32) -> (bool, Option<ClockEvent>) {
        if !self.playing || self.driver != Driver::Clock {
            return (false, None);
        }
        let before = self.time;
        match self.direction {
            Direction::Forward => {
                let mut dt = dt.max(0.0);
                if self.pending_delay > 0.0 {
                    if dt < self.pending_delay {
                        self.pending_delay -= dt;
                        return (false, None);
                    }
                    dt -= self.pending_delay;
                    self.pending_delay = 0.0;
                }
                self.time = (self.time + dt).min(self.duration);
                if self.time >= self.duration {
                    self.playing = false;
                    return (true, Some(ClockEvent::Completed));
                }
            }
            Direction::Reverse => {
                self.time = (self.time - dt.max(0.0)).max(0.0);
                if self.time <= 0.0 {
                    self.playing = false;
                    return (true, Some(ClockEvent::Rewound));
                }
            }
        }
        (self.time != before, None)
    }

    pub fn play(&mut self) {
        if self.time <= 0.0 {
            self.pending_delay = self.delay;
        }
        self.direction = Direction::Forward;
        self.playing = true;
    }

    pub fn reverse(&mut self) {
        self.direction = Direction::Reverse;
        self.pending_delay = 0.0;
        self.playing = self.time > 0.0;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        self.playing = true;
    }

    pub fn restart(&mut self) {
        self.time = 0.0;
        self.pending_delay = self.delay;
        self.direction = Direction::Forward;
        self.playing = true;
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
        self.pending_delay = self.delay;
        self.direction = Direction::Forward;
        self.playing = false;
    }

    pub fn complete(&mut self) {
        self.time = self.duration;
        self.pending_delay = 0.0;
        self.playing = false;
    }

    /// Apply a toggle-trigger action.
    pub fn apply(&mut self, action: ToggleAction) {
        match action {
            ToggleAction::Play => self.play(),
            ToggleAction::Pause => self.pause(),
            ToggleAction::Resume => self.resume(),
            ToggleAction::Reverse => self.reverse(),
            ToggleAction::Restart => self.restart(),
            ToggleAction::Reset => self.reset(),
            ToggleAction::Complete => self.complete(),
            ToggleAction::None => {}
        }
    }
}
