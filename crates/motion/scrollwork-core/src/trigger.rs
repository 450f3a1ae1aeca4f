//! Scroll triggers: map the viewport's scroll offset against a subject element
//! to a normalized progress, fire toggle callbacks on boundary crossings, and
//! hold pinned elements in place while the outer page scrolls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::geometry::{EndPosition, Measure, Position};
use crate::ids::{ElementId, ScopeId, TimelineId, TriggerId};
use crate::scene::Scene;

/// Smoothed progress reaches ~98% of its target after `smoothing` seconds.
const CATCH_UP_RATE: f32 = 4.0;

/// What a toggle trigger does to its timelines at a crossing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    None,
}

impl FromStr for ToggleAction {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "play" => ToggleAction::Play,
            "pause" => ToggleAction::Pause,
            "resume" => ToggleAction::Resume,
            "reverse" => ToggleAction::Reverse,
            "restart" => ToggleAction::Restart,
            "reset" => ToggleAction::Reset,
            "complete" => ToggleAction::Complete,
            "none" => ToggleAction::None,
            _ => return Err(MotionError::InvalidToggleActions(s.to_string())),
        })
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToggleAction::Play => "play",
            ToggleAction::Pause => "pause",
            ToggleAction::Resume => "resume",
            ToggleAction::Reverse => "reverse",
            ToggleAction::Restart => "restart",
            ToggleAction::Reset => "reset",
            ToggleAction::Complete => "complete",
            ToggleAction::None => "none",
        })
    }
}

/// Boundary crossings, in the order `onEnter onLeave onEnterBack onLeaveBack`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleCallback {
    /// Start boundary crossed scrolling forward.
    Enter,
    /// End boundary crossed scrolling forward.
    Leave,
    /// End boundary crossed scrolling back.
    EnterBack,
    /// Start boundary crossed scrolling back.
    LeaveBack,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl ToggleActions {
    pub fn action_for(&self, callback: ToggleCallback) -> ToggleAction {
        match callback {
            ToggleCallback::Enter => self.on_enter,
            ToggleCallback::Leave => self.on_leave,
            ToggleCallback::EnterBack => self.on_enter_back,
            ToggleCallback::LeaveBack => self.on_leave_back,
        }
    }
}

impl Default for ToggleActions {
    /// `play none none none`
    fn default() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::None,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [enter, leave, enter_back, leave_back] = parts.as_slice() else {
            return Err(MotionError::InvalidToggleActions(s.to_string()));
        };
        Ok(Self {
            on_enter: enter.parse()?,
            on_leave: leave.parse()?,
            on_enter_back: enter_back.parse()?,
            on_leave_back: leave_back.parse()?,
        })
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter, self.on_leave, self.on_enter_back, self.on_leave_back
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Fire callbacks at boundary crossings; bound timelines run on the clock.
    Toggle(ToggleActions),
    /// Bound timelines mirror progress. `smoothing` (seconds) low-pass filters
    /// the applied progress; `None` applies it synchronously.
    Scrub { smoothing: Option<f32> },
}

impl TriggerMode {
    pub fn scrub(smoothing: f32) -> Self {
        TriggerMode::Scrub {
            smoothing: (smoothing > 0.0).then_some(smoothing),
        }
    }

    pub fn is_scrub(&self) -> bool {
        matches!(self, TriggerMode::Scrub { .. })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TriggerCfg {
    pub subject: ElementId,
    pub start: Position,
    pub end: EndPosition,
    pub mode: TriggerMode,
    /// Element held fixed while the trigger is inside its range.
    #[serde(default)]
    pub pin: Option<ElementId>,
    /// Trigger stays inert unless this resolves to a positive length.
    #[serde(default)]
    pub requires: Option<Measure>,
    /// Timelines driven by this trigger.
    #[serde(default)]
    pub timelines: Vec<TimelineId>,
    /// Dispose the trigger after its first `Enter`; bound timelines keep running.
    #[serde(default)]
    pub once: bool,
}

impl TriggerCfg {
    pub fn new(
        subject: ElementId,
        start: Position,
        end: impl Into<EndPosition>,
        mode: TriggerMode,
    ) -> Self {
        Self {
            subject,
            start,
            end: end.into(),
            mode,
            pin: None,
            requires: None,
            timelines: Vec::new(),
            once: false,
        }
    }

    pub fn pin(mut self, el: ElementId) -> Self {
        self.pin = Some(el);
        self
    }

    pub fn requires(mut self, measure: Measure) -> Self {
        self.requires = Some(measure);
        self
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    pub fn drive(mut self, timeline: TimelineId) -> Self {
        self.timelines.push(timeline);
        self
    }
}

/// Where the scroll offset sits relative to the trigger range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Before,
    Active,
    After,
}

/// Result of re-evaluating one trigger against a scroll offset.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct TriggerStep {
    pub callbacks: Vec<ToggleCallback>,
    /// `Some(true)` to pin, `Some(false)` to release.
    pub pin: Option<bool>,
    /// Applied progress changed and scrub timelines must re-render.
    pub progress_changed: bool,
}

#[derive(Debug)]
pub struct Trigger {
    pub id: TriggerId,
    pub scope: ScopeId,
    cfg: TriggerCfg,
    start: f32,
    end: f32,
    degenerate: bool,
    inert: bool,
    /// Subject missing at the last refresh; evaluation is suspended.
    detached: bool,
    progress: f32,
    applied: f32,
    region: Option<Region>,
    pinned: bool,
}

impl Trigger {
    pub(crate) fn new(
        id: TriggerId,
        scope: ScopeId,
        cfg: TriggerCfg,
        scene: &Scene,
    ) -> Result<Self> {
        let mut trigger = Self {
            id,
            scope,
            cfg,
            start: 0.0,
            end: 0.0,
            degenerate: false,
            inert: false,
            detached: false,
            progress: 0.0,
            applied: 0.0,
            region: None,
            pinned: false,
        };
        trigger.measure(scene)?;
        Ok(trigger)
    }

    /// Resolve start/end offsets from the current layout.
    pub(crate) fn measure(&mut self, scene: &Scene) -> Result<()> {
        let subject = match scene.get(self.cfg.subject) {
            Some(b) => b.rect,
            None => {
                self.detached = true;
                return Err(MotionError::MissingSubject(self.cfg.subject));
            }
        };
        if let Some(pin) = self.cfg.pin {
            if !scene.is_mounted(pin) {
                self.detached = true;
                return Err(MotionError::MissingSubject(pin));
            }
        }
        let vh = scene.viewport().height;
        self.start = self.cfg.start.resolve(&subject, vh);
        self.end = match &self.cfg.end {
            EndPosition::Anchored(pos) => pos.resolve(&subject, vh),
            EndPosition::Distance(measure) => self.start + measure.resolve(scene).unwrap_or(0.0),
        };
        self.degenerate = subject.height <= 0.0 || self.end <= self.start;
        self.inert = match &self.cfg.requires {
            Some(measure) => !matches!(measure.resolve(scene), Some(v) if v > 0.0),
            None => false,
        };
        self.detached = false;
        if self.degenerate {
            log::debug!(
                "trigger {:?}: degenerate range {}..{} (subject height {}), progress pinned at 1",
                self.id,
                self.start,
                self.end,
                subject.height
            );
        }
        Ok(())
    }

    pub fn cfg(&self) -> &TriggerCfg {
        &self.cfg
    }

    pub fn range(&self) -> (f32, f32) {
        (self.start, self.end)
    }

    /// Raw progress at the last evaluation.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Progress currently fed to scrub timelines (after smoothing).
    pub fn applied_progress(&self) -> f32 {
        self.applied
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn timelines(&self) -> &[TimelineId] {
        &self.cfg.timelines
    }

    pub(crate) fn unbind(&mut self, timeline: TimelineId) {
        self.cfg.timelines.retain(|t| *t != timeline);
    }

    /// Progress for `scroll`, clamped to [0,1]. Degenerate ranges read as complete.
    pub fn progress_at(&self, scroll: f32) -> f32 {
        if self.degenerate {
            return 1.0;
        }
        ((scroll - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }

    fn region_at(&self, scroll: f32) -> Region {
        if self.degenerate || scroll > self.end {
            Region::After
        } else if scroll < self.start {
            Region::Before
        } else {
            Region::Active
        }
    }

    /// Pin element and the viewport offset it should be held at.
    pub(crate) fn pin_geometry(&self, scene: &Scene) -> Option<(ElementId, f32, f32)> {
        let pin = self.cfg.pin?;
        let rect = scene.get(pin)?.rect;
        Some((pin, rect.top - self.start, self.end - self.start))
    }

    /// Re-evaluate against `scroll`.
    pub(crate) fn evaluate(&mut self, scroll: f32) -> TriggerStep {
        let mut step = TriggerStep::default();
        if self.detached || self.inert {
            return step;
        }
        let first = self.region.is_none();
        let prev = self.region.unwrap_or(Region::Before);
        let next = self.region_at(scroll);
        self.region = Some(next);
        step.callbacks = crossings(prev, next);

        self.progress = self.progress_at(scroll);
        let smoothed = matches!(self.cfg.mode, TriggerMode::Scrub { smoothing: Some(_) });
        if (first || !smoothed) && (first || self.applied != self.progress) {
            self.applied = self.progress;
            step.progress_changed = true;
        }

        if self.cfg.pin.is_some() {
            let inside = !self.degenerate && self.progress > 0.0 && self.progress < 1.0;
            if inside != self.pinned {
                self.pinned = inside;
                step.pin = Some(inside);
            }
        }
        step
    }

    /// Move smoothed progress toward raw progress. Returns true if it moved.
    pub(crate) fn tick(&mut self, dt: f32, epsilon: f32) -> bool {
        let TriggerMode::Scrub {
            smoothing: Some(smoothing),
        } = self.cfg.mode
        else {
            return false;
        };
        if dt <= 0.0 || self.detached || self.inert || self.applied == self.progress {
            return false;
        }
        let alpha = 1.0 - (-CATCH_UP_RATE * dt / smoothing).exp();
        self.applied += (self.progress - self.applied) * alpha;
        if (self.progress - self.applied).abs() < epsilon {
            self.applied = self.progress;
        }
        true
    }

    /// Drop pin state without emitting anything; the caller reports the release.
    pub(crate) fn take_pin(&mut self) -> bool {
        std::mem::replace(&mut self.pinned, false)
    }
}

fn crossings(prev: Region, next: Region) -> Vec<ToggleCallback> {
    use Region::*;
    use ToggleCallback::*;
    match (prev, next) {
        (Before, Active) => vec![Enter],
        (Before, After) => vec![Enter, Leave],
        (Active, After) => vec![Leave],
        (After, Active) => vec![EnterBack],
        (After, Before) => vec![EnterBack, LeaveBack],
        (Active, Before) => vec![LeaveBack],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ElementBox, Rect, Viewport};

    fn scene_with(height: f32) -> Scene {
        let mut scene = Scene::new(Viewport {
            width: 1280.0,
            height: 1000.0,
            scroll_y: 0.0,
        });
        scene.mount(
            ElementId(7),
            ElementBox::from_rect(Rect::new(0.0, 2000.0, 1280.0, height)),
        );
        scene
    }

    fn scrub_cfg() -> TriggerCfg {
        TriggerCfg::new(
            ElementId(7),
            "top bottom".parse().unwrap(),
            "bottom top".parse::<Position>().unwrap(),
            TriggerMode::Scrub { smoothing: None },
        )
    }

    #[test]
    fn parse_toggle_actions() {
        let actions: ToggleActions = "play none none reverse".parse().unwrap();
        assert_eq!(actions.on_enter, ToggleAction::Play);
        assert_eq!(actions.on_leave_back, ToggleAction::Reverse);
        assert_eq!(actions.to_string(), "play none none reverse");
        assert!("play none".parse::<ToggleActions>().is_err());
        assert!("play none none bounce".parse::<ToggleActions>().is_err());
    }

    #[test]
    fn progress_is_clamped_for_any_offset() {
        let scene = scene_with(500.0);
        let mut t = Trigger::new(TriggerId(0), ScopeId(0), scrub_cfg(), &scene).unwrap();
        assert_eq!(t.range(), (1000.0, 2500.0));
        for scroll in [-1.0e6, -50.0, 0.0, 999.0, 1000.0, 1750.0, 2500.0, 9.0e6] {
            t.evaluate(scroll);
            let p = t.progress();
            assert!((0.0..=1.0).contains(&p), "scroll {scroll} gave {p}");
        }
        t.evaluate(1750.0);
        assert_eq!(t.progress(), 0.5);
    }

    #[test]
    fn zero_height_subject_reads_complete() {
        let scene = scene_with(0.0);
        let mut t = Trigger::new(TriggerId(0), ScopeId(0), scrub_cfg(), &scene).unwrap();
        assert!(t.is_degenerate());
        t.evaluate(0.0);
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn crossings_cover_jumps() {
        let scene = scene_with(500.0);
        let cfg = TriggerCfg::new(
            ElementId(7),
            "top bottom".parse().unwrap(),
            "bottom top".parse::<Position>().unwrap(),
            TriggerMode::Toggle(ToggleActions::default()),
        );
        let mut t = Trigger::new(TriggerId(0), ScopeId(0), cfg, &scene).unwrap();
        assert!(t.evaluate(0.0).callbacks.is_empty());
        assert_eq!(
            t.evaluate(5000.0).callbacks,
            vec![ToggleCallback::Enter, ToggleCallback::Leave]
        );
        assert_eq!(t.evaluate(2000.0).callbacks, vec![ToggleCallback::EnterBack]);
        assert_eq!(t.evaluate(10.0).callbacks, vec![ToggleCallback::LeaveBack]);
    }

    #[test]
    fn smoothing_converges_to_raw_progress() {
        let scene = scene_with(500.0);
        let cfg = TriggerCfg::new(
            ElementId(7),
            "top bottom".parse().unwrap(),
            "bottom top".parse::<Position>().unwrap(),
            TriggerMode::scrub(0.5),
        );
        let mut t = Trigger::new(TriggerId(0), ScopeId(0), cfg, &scene).unwrap();
        t.evaluate(1000.0);
        let step = t.evaluate(2500.0);
        assert!(!step.progress_changed);
        assert_eq!(t.applied_progress(), 0.0);
        assert!(t.tick(0.1, 1e-4));
        let mid = t.applied_progress();
        assert!(mid > 0.0 && mid < 1.0);
        for _ in 0..100 {
            t.tick(0.1, 1e-4);
        }
        assert_eq!(t.applied_progress(), 1.0);
    }

    #[test]
    fn missing_subject_is_rejected() {
        let scene = Scene::default();
        let err = Trigger::new(TriggerId(0), ScopeId(0), scrub_cfg(), &scene).unwrap_err();
        assert_eq!(err, MotionError::MissingSubject(ElementId(7)));
    }
}
