//! Engine: owns the scene, scopes, triggers, timelines, sections, and the
//! per-update outputs.
//!
//! Hosts construct one engine and feed it host events, either through
//! [`Engine::update`] (batched, like a frame callback) or through the individual
//! event methods. Effects receive `&mut Engine` and build triggers/timelines
//! inside the scope they are handed.

use indexmap::IndexMap;

use crate::config::Config;
use crate::error::{MotionError, Result};
use crate::geometry::{ElementBox, Viewport};
use crate::ids::{ElementId, IdAllocator, ScopeId, SectionId, SubscriptionId, TimelineId, TriggerId};
use crate::inputs::{HostEvent, Inputs};
use crate::motion::MotionPreference;
use crate::outputs::{CoreEvent, Outputs, PinChange};
use crate::props::{Props, StyleStore, VisualState};
use crate::scene::Scene;
use crate::scope::Scopes;
use crate::section::{Section, SectionSpec, SectionState};
use crate::timeline::{ClockEvent, Driver, Timeline, TimelineCfg, TweenCfg};
use crate::trigger::{ToggleCallback, Trigger, TriggerCfg, TriggerMode};

#[derive(Debug)]
pub struct Engine {
    cfg: Config,
    ids: IdAllocator,
    scene: Scene,
    motion: MotionPreference,
    scopes: Scopes,
    // Registration order is evaluation order.
    triggers: IndexMap<TriggerId, Trigger>,
    timelines: IndexMap<TimelineId, Timeline>,
    sections: IndexMap<SectionId, Section>,
    styles: StyleStore,
    outputs: Outputs,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    /// Create a new engine with the given config and an empty 0×0 viewport.
    pub fn new(cfg: Config) -> Self {
        Self::with_viewport(cfg, Viewport::default())
    }

    pub fn with_viewport(cfg: Config, viewport: Viewport) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            scene: Scene::new(viewport),
            motion: MotionPreference::default(),
            scopes: Scopes::default(),
            triggers: IndexMap::new(),
            timelines: IndexMap::new(),
            sections: IndexMap::new(),
            styles: StyleStore::default(),
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.scene.viewport()
    }

    // ---- host events -------------------------------------------------------

    /// Step the engine: apply host events in order, then advance clocks by `dt`
    /// seconds. Outputs cover everything that changed during this call.
    pub fn update(&mut self, dt: f32, inputs: Inputs) -> Result<&Outputs> {
        self.outputs.clear();
        for event in inputs.events {
            self.handle(event)?;
        }
        self.tick(dt);
        Ok(&self.outputs)
    }

    pub fn handle(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::Mount { element, layout } | HostEvent::Layout { element, layout } => {
                self.mount(element, layout)
            }
            HostEvent::Unmount { element } => self.unmount(element),
            HostEvent::Resize { width, height } => self.resize(width, height),
            HostEvent::Scroll { y } => {
                self.scroll_to(y);
                Ok(())
            }
            HostEvent::ReducedMotion { reduced } => self.set_reduced_motion(reduced),
            HostEvent::Refresh => {
                self.refresh();
                Ok(())
            }
        }
    }

    /// Mount an element or update its layout. Sections waiting on it activate.
    pub fn mount(&mut self, el: ElementId, layout: ElementBox) -> Result<()> {
        if self.scene.mount(el, layout) {
            log::debug!("mount {el:?}");
        }
        self.refresh();
        let waiting: Vec<SectionId> = self
            .sections
            .values()
            .filter(|s| s.state == SectionState::Pending && self.scene.all_mounted(&s.required()))
            .map(|s| s.id)
            .collect();
        for id in waiting {
            self.activate_section(id)?;
        }
        Ok(())
    }

    /// Unmount an element. Sections using it drop their animations and wait
    /// for it to come back.
    pub fn unmount(&mut self, el: ElementId) -> Result<()> {
        if self.scene.unmount(el).is_none() {
            log::warn!("unmount of unknown element {el:?}");
            return Ok(());
        }
        let affected: Vec<SectionId> = self
            .sections
            .values()
            .filter(|s| matches!(s.state, SectionState::Active | SectionState::Static) && s.uses(el))
            .map(|s| s.id)
            .collect();
        for id in affected {
            self.deactivate_groups(id)?;
            self.set_section_state(id, SectionState::Pending);
        }
        self.refresh();
        Ok(())
    }

    /// Viewport size changed: re-evaluate breakpoints, then re-measure triggers.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.scene.set_size(width, height);
        let active: Vec<SectionId> = self
            .sections
            .values()
            .filter(|s| s.state == SectionState::Active)
            .map(|s| s.id)
            .collect();
        for id in active {
            self.evaluate_section(id)?;
        }
        self.refresh();
        Ok(())
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.scene.set_scroll(y);
        self.evaluate_all();
    }

    /// Feed the platform reduced-motion signal (`None` = unsupported).
    pub fn set_reduced_motion(&mut self, platform: Option<bool>) -> Result<()> {
        if !self.motion.update(platform) {
            return Ok(());
        }
        let reduced = self.motion.current();
        log::debug!("reduced motion -> {reduced}");
        let ids: Vec<SectionId> = self.sections.keys().copied().collect();
        for id in ids {
            match self.section_state(id) {
                Some(SectionState::Active) if reduced => self.apply_static(id)?,
                Some(SectionState::Static) if !reduced => {
                    self.set_section_state(id, SectionState::Active);
                    self.evaluate_section(id)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn reduced_motion(&self) -> bool {
        self.motion.current()
    }

    pub fn subscribe_motion(&mut self, listener: impl FnMut(bool) + 'static) -> SubscriptionId {
        self.motion.subscribe(listener)
    }

    pub fn unsubscribe_motion(&mut self, id: SubscriptionId) -> bool {
        self.motion.unsubscribe(id)
    }

    pub fn motion_listener_count(&self) -> usize {
        self.motion.listener_count()
    }

    /// Re-measure every trigger and layout-derived tween value, then re-evaluate.
    pub fn refresh(&mut self) {
        let mut released = Vec::new();
        let mut parked = Vec::new();
        for (id, trigger) in self.triggers.iter_mut() {
            if let Err(err) = trigger.measure(&self.scene) {
                log::debug!("trigger {id:?} detached: {err}");
            }
            if (trigger.is_detached() || trigger.is_inert()) && trigger.take_pin() {
                released.push(*id);
            }
            if trigger.is_inert() {
                parked.extend(trigger.timelines().iter().copied());
            }
        }
        for id in released {
            self.emit_pin(id, false);
        }
        for timeline in self.timelines.values_mut() {
            timeline.invalidate(&self.scene);
        }
        // Inert scrub timelines rest at their start.
        for id in parked {
            if let Some(tl) = self.timelines.get_mut(&id) {
                tl.seek_progress(0.0);
                tl.render(&mut self.styles, &mut self.outputs);
            }
        }
        self.evaluate_all();
        let ids: Vec<TimelineId> = self.timelines.keys().copied().collect();
        for id in ids {
            self.sync_timeline(id);
        }
    }

    /// Advance clocks and scrub smoothing by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let ids: Vec<TimelineId> = self.timelines.keys().copied().collect();
        for id in ids {
            self.drive_timeline(id, dt, false);
        }
        let eps = self.cfg.smoothing_epsilon;
        let moved: Vec<TriggerId> = self
            .triggers
            .iter_mut()
            .filter_map(|(id, t)| t.tick(dt, eps).then_some(*id))
            .collect();
        for id in moved {
            self.push_scrub(id);
        }
    }

    /// Outputs accumulated since the last `update` (or `take_outputs`).
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn take_outputs(&mut self) -> Outputs {
        std::mem::take(&mut self.outputs)
    }

    // ---- scopes, timelines, triggers --------------------------------------

    pub fn open_scope(&mut self, label: impl Into<String>) -> ScopeId {
        let id = self.ids.alloc_scope();
        self.scopes.insert(id, label);
        id
    }

    /// Dispose everything created in `scope`. Targets keep their current state.
    pub fn close_scope(&mut self, scope: ScopeId) -> Result<()> {
        let entry = self
            .scopes
            .remove(scope)
            .ok_or(MotionError::UnknownScope(scope))?;
        log::debug!(
            "close scope {scope:?} '{}': {} triggers, {} timelines",
            entry.label,
            entry.triggers.len(),
            entry.timelines.len()
        );
        for id in entry.triggers {
            self.remove_trigger(id);
        }
        for id in entry.timelines {
            self.remove_timeline(id);
        }
        Ok(())
    }

    pub fn create_timeline(&mut self, scope: ScopeId, cfg: TimelineCfg) -> Result<TimelineId> {
        if !self.scopes.contains(scope) {
            return Err(MotionError::UnknownScope(scope));
        }
        let id = self.ids.alloc_timeline();
        self.timelines.insert(id, Timeline::new(id, scope, &cfg));
        self.scopes.track_timeline(scope, id);
        Ok(id)
    }

    pub fn add_tween(&mut self, timeline: TimelineId, cfg: TweenCfg) -> Result<()> {
        if !self.scene.is_mounted(cfg.target) {
            log::warn!("tween for unmounted element {:?}", cfg.target);
            return Err(MotionError::MissingSubject(cfg.target));
        }
        let defaults = (self.cfg.default_duration, self.cfg.default_ease);
        let tl = self
            .timelines
            .get_mut(&timeline)
            .ok_or(MotionError::UnknownTimeline(timeline))?;
        tl.add(cfg, &self.scene, defaults, &mut self.styles, &mut self.outputs);
        Ok(())
    }

    /// Create a trigger and evaluate it once against the current scroll offset.
    pub fn create_trigger(&mut self, scope: ScopeId, cfg: TriggerCfg) -> Result<TriggerId> {
        if !self.scopes.contains(scope) {
            return Err(MotionError::UnknownScope(scope));
        }
        if let Some(missing) = cfg.timelines.iter().find(|t| !self.timelines.contains_key(*t)) {
            return Err(MotionError::UnknownTimeline(*missing));
        }
        let id = self.ids.alloc_trigger();
        let trigger = Trigger::new(id, scope, cfg, &self.scene)?;
        if trigger.cfg().mode.is_scrub() {
            for tl in trigger.timelines() {
                if let Some(tl) = self.timelines.get_mut(tl) {
                    tl.set_driver(Driver::Trigger(id));
                }
            }
        }
        if trigger.is_inert() {
            log::debug!("trigger {id:?} inert: required length is not positive");
        }
        self.triggers.insert(id, trigger);
        self.scopes.track_trigger(scope, id);
        self.evaluate_trigger(id);
        Ok(id)
    }

    pub fn dispose_trigger(&mut self, id: TriggerId) -> Result<()> {
        let scope = self
            .triggers
            .get(&id)
            .map(|t| t.scope)
            .ok_or(MotionError::UnknownTrigger(id))?;
        self.scopes.forget_trigger(scope, id);
        self.remove_trigger(id);
        Ok(())
    }

    /// Halt a timeline immediately. Its targets keep whatever state they show now.
    pub fn dispose_timeline(&mut self, id: TimelineId) -> Result<()> {
        let scope = self
            .timelines
            .get(&id)
            .map(|t| t.scope)
            .ok_or(MotionError::UnknownTimeline(id))?;
        self.scopes.forget_timeline(scope, id);
        self.remove_timeline(id);
        Ok(())
    }

    /// Apply a state immediately, outside any timeline.
    pub fn set_props(&mut self, el: ElementId, props: &Props) {
        let resolved = props.resolve(&self.scene);
        self.styles.write(el, &resolved, &mut self.outputs);
    }

    // ---- sections ----------------------------------------------------------

    /// Register a section. It activates now if its elements are mounted, or
    /// waits for them otherwise. The returned id is the section's disposer.
    /// A failing behavior leaves nothing registered.
    pub fn register_section(&mut self, spec: SectionSpec) -> Result<SectionId> {
        let id = self.ids.alloc_section();
        log::debug!("register section {id:?} '{}'", spec.name);
        self.sections.insert(id, Section::new(id, spec));
        if let Err(err) = self.activate_section(id) {
            if let Err(teardown) = self.deactivate_groups(id) {
                log::warn!("section {id:?} teardown after failed activation: {teardown}");
            }
            self.sections.shift_remove(&id);
            return Err(err);
        }
        Ok(id)
    }

    /// Dispose every trigger and timeline the section owns and forget it.
    pub fn dispose_section(&mut self, id: SectionId) -> Result<()> {
        if !self.sections.contains_key(&id) {
            return Err(MotionError::UnknownSection(id));
        }
        self.deactivate_groups(id)?;
        self.sections.shift_remove(&id);
        self.emit(CoreEvent::SectionStateChanged {
            section: id,
            state: SectionState::Disposed,
        });
        Ok(())
    }

    pub fn section_state(&self, id: SectionId) -> Option<SectionState> {
        self.sections.get(&id).map(|s| s.state)
    }

    /// Name of the breakpoint group currently active for a section.
    pub fn active_breakpoint(&self, id: SectionId) -> Option<&str> {
        self.sections
            .get(&id)
            .and_then(|s| s.switch.as_ref())
            .and_then(|sw| sw.active_name())
    }

    // ---- introspection -----------------------------------------------------

    pub fn style(&self, el: ElementId) -> VisualState {
        self.styles.get(el)
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.get(&id)
    }

    pub fn timeline(&self, id: TimelineId) -> Option<&Timeline> {
        self.timelines.get(&id)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.values()
    }

    pub fn timelines(&self) -> impl Iterator<Item = &Timeline> {
        self.timelines.values()
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn pinned_count(&self) -> usize {
        self.triggers.values().filter(|t| t.is_pinned()).count()
    }

    // ---- internals ---------------------------------------------------------

    fn emit(&mut self, event: CoreEvent) {
        self.outputs.push_event(event, self.cfg.max_events_per_tick);
    }

    fn emit_pin(&mut self, id: TriggerId, pinned: bool) {
        let Some(trigger) = self.triggers.get(&id) else {
            return;
        };
        let Some(element) = trigger.cfg().pin else {
            return;
        };
        let (top, spacing) = trigger
            .pin_geometry(&self.scene)
            .map(|(_, top, spacing)| (top, spacing))
            .unwrap_or((0.0, 0.0));
        self.outputs.push_pin(PinChange {
            element,
            pinned,
            top,
            spacing,
        });
        self.emit(if pinned {
            CoreEvent::PinStarted { trigger: id, element }
        } else {
            CoreEvent::PinEnded { trigger: id, element }
        });
    }

    fn evaluate_all(&mut self) {
        let ids: Vec<TriggerId> = self.triggers.keys().copied().collect();
        for id in ids {
            self.evaluate_trigger(id);
        }
    }

    fn evaluate_trigger(&mut self, id: TriggerId) {
        let scroll = self.scene.viewport().scroll_y;
        let Some(trigger) = self.triggers.get_mut(&id) else {
            return;
        };
        let step = trigger.evaluate(scroll);
        let mode = trigger.cfg().mode.clone();
        let once = trigger.cfg().once;
        let bound: Vec<TimelineId> = trigger.timelines().to_vec();

        if let Some(pinned) = step.pin {
            self.emit_pin(id, pinned);
        }
        for callback in step.callbacks.iter().copied() {
            self.emit(CoreEvent::TriggerToggled {
                trigger: id,
                callback,
            });
            if let TriggerMode::Toggle(actions) = &mode {
                let action = actions.action_for(callback);
                for tl in &bound {
                    if let Some(timeline) = self.timelines.get_mut(tl) {
                        timeline.apply(action);
                    }
                    self.drive_timeline(*tl, 0.0, true);
                }
            }
        }
        if step.progress_changed && mode.is_scrub() {
            self.push_scrub(id);
        }
        if once && step.callbacks.contains(&ToggleCallback::Enter) {
            log::debug!("trigger {id:?} entered once, disposing");
            if let Some(scope) = self.triggers.get(&id).map(|t| t.scope) {
                self.scopes.forget_trigger(scope, id);
            }
            self.remove_trigger(id);
        }
    }

    /// Seek every timeline bound to a scrub trigger to its applied progress.
    fn push_scrub(&mut self, id: TriggerId) {
        let Some(trigger) = self.triggers.get(&id) else {
            return;
        };
        let progress = trigger.applied_progress();
        let bound: Vec<TimelineId> = trigger.timelines().to_vec();
        for tl in bound {
            if let Some(timeline) = self.timelines.get_mut(&tl) {
                timeline.seek_progress(progress);
                timeline.render(&mut self.styles, &mut self.outputs);
            }
        }
    }

    /// Re-render a timeline at its playhead after layout-derived values changed.
    fn sync_timeline(&mut self, id: TimelineId) {
        let Some(timeline) = self.timelines.get(&id) else {
            return;
        };
        match timeline.driver() {
            Driver::Trigger(trigger) => {
                let live = self
                    .triggers
                    .get(&trigger)
                    .is_some_and(|t| !t.is_inert() && !t.is_detached());
                if live {
                    self.push_scrub(trigger);
                }
            }
            Driver::Clock => self.drive_timeline(id, 0.0, true),
        }
    }

    fn drive_timeline(&mut self, id: TimelineId, dt: f32, force_render: bool) {
        let Some(timeline) = self.timelines.get_mut(&id) else {
            return;
        };
        let (moved, event) = timeline.advance(dt);
        if moved || force_render {
            timeline.render(&mut self.styles, &mut self.outputs);
        }
        match event {
            Some(ClockEvent::Completed) => self.emit(CoreEvent::TimelineCompleted { timeline: id }),
            Some(ClockEvent::Rewound) => self.emit(CoreEvent::TimelineRewound { timeline: id }),
            None => {}
        }
    }

    fn remove_trigger(&mut self, id: TriggerId) {
        let pinned = self
            .triggers
            .get_mut(&id)
            .is_some_and(|t| t.take_pin());
        if pinned {
            self.emit_pin(id, false);
        }
        self.triggers.shift_remove(&id);
    }

    fn remove_timeline(&mut self, id: TimelineId) {
        if self.timelines.shift_remove(&id).is_some() {
            for trigger in self.triggers.values_mut() {
                trigger.unbind(id);
            }
        }
    }

    fn set_section_state(&mut self, id: SectionId, state: SectionState) {
        let Some(section) = self.sections.get_mut(&id) else {
            return;
        };
        if section.state == state {
            return;
        }
        log::debug!("section {id:?} '{}': {:?} -> {:?}", section.name, section.state, state);
        section.state = state;
        self.emit(CoreEvent::SectionStateChanged { section: id, state });
    }

    fn activate_section(&mut self, id: SectionId) -> Result<()> {
        let section = self
            .sections
            .get(&id)
            .ok_or(MotionError::UnknownSection(id))?;
        let missing: Vec<ElementId> = section
            .required()
            .into_iter()
            .filter(|el| !self.scene.is_mounted(*el))
            .collect();
        if !missing.is_empty() {
            log::debug!("section {id:?} deferred until {missing:?} mount");
            self.emit(CoreEvent::RegistrationDeferred {
                section: id,
                missing,
            });
            return Ok(());
        }
        if self.motion.current() {
            return self.apply_static(id);
        }
        self.set_section_state(id, SectionState::Active);
        self.evaluate_section(id)
    }

    /// Pick the breakpoint group for the current width.
    fn evaluate_section(&mut self, id: SectionId) -> Result<()> {
        let width = self.scene.viewport().width;
        let Some(section) = self.sections.get_mut(&id) else {
            return Err(MotionError::UnknownSection(id));
        };
        let targets = section.elements.clone();
        let Some(mut switch) = section.switch.take() else {
            return Ok(());
        };
        let result = switch.evaluate(self, width, &targets);
        let teardown = match self.sections.get_mut(&id) {
            Some(section) => {
                section.switch = Some(switch);
                Ok(())
            }
            None => switch.deactivate(self),
        };
        let switched = result?;
        teardown?;
        if let Some(change) = switched {
            log::debug!("section {id:?}: breakpoint {:?} -> {:?}", change.from, change.to);
            self.emit(CoreEvent::BreakpointChanged {
                section: id,
                from: change.from,
                to: change.to,
            });
        }
        Ok(())
    }

    fn deactivate_groups(&mut self, id: SectionId) -> Result<()> {
        let Some(mut switch) = self.sections.get_mut(&id).and_then(|s| s.switch.take()) else {
            return Ok(());
        };
        let result = switch.deactivate(self);
        if let Some(section) = self.sections.get_mut(&id) {
            section.switch = Some(switch);
        }
        result
    }

    /// Reduced motion: no animation, elements land in their final state.
    fn apply_static(&mut self, id: SectionId) -> Result<()> {
        self.deactivate_groups(id)?;
        let finals = self
            .sections
            .get(&id)
            .map(|s| s.final_state.clone())
            .unwrap_or_default();
        for (el, props) in &finals {
            self.set_props(*el, props);
        }
        self.set_section_state(id, SectionState::Static);
        Ok(())
    }
}
