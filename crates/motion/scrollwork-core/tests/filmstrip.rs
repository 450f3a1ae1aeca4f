mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{approx, scroll, step, Page};
use scrollwork_core::effects::filmstrip::{self, FilmstripCfg, FilmstripElements};
use scrollwork_core::{
    BehaviorGroup, Breakpoint, CoreEvent, ElementBox, Engine, HostEvent, Props, Rect, SectionId,
    SectionState, Trigger,
};

fn elements(page: &Page) -> FilmstripElements {
    FilmstripElements {
        container: page.id("story"),
        frame: page.id("story_frame"),
        strip: page.id("story_strip"),
        background: Some(page.id("story_background")),
    }
}

fn register(engine: &mut Engine, page: &Page) -> SectionId {
    let spec = filmstrip::section(engine.config(), FilmstripCfg::default(), elements(page));
    engine.register_section(spec).expect("register filmstrip")
}

fn pin_trigger(engine: &Engine) -> &Trigger {
    engine
        .triggers()
        .find(|t| t.cfg().pin.is_some())
        .expect("filmstrip pin trigger")
}

/// Scroll, then let smoothing settle.
fn settle_at(engine: &mut Engine, y: f32) {
    scroll(engine, y);
    for _ in 0..4 {
        step(engine, 1.0, Vec::new());
    }
}

#[test]
fn pinned_range_is_overflow_plus_sixty_percent_of_viewport() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    register(&mut engine, &page);

    let (start, end) = pin_trigger(&engine).range();
    assert!(approx(start, 2280.0), "start {start}");
    // D = 2080 - 1280 = 800, H = 1000
    assert!(approx(end - start, 1400.0), "range {}", end - start);
}

#[test]
fn strip_translation_spans_zero_to_minus_overflow() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    register(&mut engine, &page);
    let strip = page.id("story_strip");
    let background = page.id("story_background");

    assert_eq!(engine.style(strip).x, 0.0);
    assert_eq!(engine.style(background).x, 0.0);

    settle_at(&mut engine, 3680.0);
    assert!(approx(engine.style(strip).x, -800.0), "{:?}", engine.style(strip));
    assert!(approx(engine.style(background).x, -240.0));

    settle_at(&mut engine, 2980.0);
    assert!(approx(engine.style(strip).x, -400.0));

    settle_at(&mut engine, 0.0);
    assert!(approx(engine.style(strip).x, 0.0));
}

#[test]
fn smoothing_lags_behind_raw_progress() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    register(&mut engine, &page);
    let strip = page.id("story_strip");

    scroll(&mut engine, 3680.0);
    assert_eq!(pin_trigger(&engine).progress(), 1.0);
    assert_eq!(engine.style(strip).x, 0.0);

    step(&mut engine, 0.1, Vec::new());
    let x = engine.style(strip).x;
    assert!(x < 0.0 && x > -800.0, "mid-smoothing x {x}");
}

#[test]
fn frame_pins_only_inside_the_range() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    register(&mut engine, &page);
    let frame = page.id("story_frame");

    let out = scroll(&mut engine, 2980.0);
    assert_eq!(engine.pinned_count(), 1);
    let pin = out.pins.iter().find(|p| p.element == frame).expect("pin change");
    assert!(pin.pinned);
    assert!(approx(pin.spacing, 1400.0));
    assert!(approx(pin.top, 0.0));

    let out = scroll(&mut engine, 5000.0);
    assert_eq!(engine.pinned_count(), 0);
    assert!(out.pins.iter().any(|p| p.element == frame && !p.pinned));
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, CoreEvent::PinEnded { element, .. } if *element == frame)));
}

#[test]
fn non_overflowing_strip_stays_inert() {
    let page = Page::load("strip-fits");
    let mut engine = page.engine();
    let id = register(&mut engine, &page);

    assert_eq!(engine.section_state(id), Some(SectionState::Active));
    assert_eq!(engine.active_breakpoint(id), Some("wide"));
    assert_eq!(engine.trigger_count(), 1);
    assert_eq!(engine.timeline_count(), 1);
    assert!(pin_trigger(&engine).is_inert());

    let out = scroll(&mut engine, 3000.0);
    assert!(out.pins.is_empty());
    settle_at(&mut engine, 3000.0);
    assert_eq!(engine.style(page.id("story_strip")).x, 0.0);
    assert_eq!(engine.pinned_count(), 0);
}

#[test]
fn strip_that_starts_overflowing_later_comes_alive() {
    let page = Page::load("strip-fits");
    let mut engine = page.engine();
    register(&mut engine, &page);
    let strip = page.id("story_strip");
    let frame = page.id("story_frame");

    // Images load and the strip grows past its frame: D = 2080 - 1280 = 800.
    let mut grown = page.layout("story_strip");
    grown.scroll_width = 2080.0;
    step(
        &mut engine,
        0.0,
        vec![HostEvent::Layout {
            element: strip,
            layout: grown,
        }],
    );
    let trigger = pin_trigger(&engine);
    assert!(!trigger.is_inert());
    let (start, end) = trigger.range();
    assert!(approx(end - start, 1400.0), "range {}", end - start);

    let out = scroll(&mut engine, 2980.0);
    assert!(out.pins.iter().any(|p| p.element == frame && p.pinned));

    settle_at(&mut engine, end);
    assert!(approx(engine.style(strip).x, -800.0));
    assert!(approx(engine.style(page.id("story_background")).x, -240.0));

    // Shrinking back parks everything at rest and releases the pin.
    scroll(&mut engine, 2980.0);
    assert_eq!(engine.pinned_count(), 1);
    let out = step(
        &mut engine,
        0.0,
        vec![HostEvent::Layout {
            element: strip,
            layout: page.layout("story_strip"),
        }],
    );
    assert!(pin_trigger(&engine).is_inert());
    assert_eq!(engine.pinned_count(), 0);
    assert!(out.pins.iter().any(|p| p.element == frame && !p.pinned));
    assert_eq!(engine.style(strip).x, 0.0);
}

#[test]
fn layout_change_recomputes_the_distance() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    register(&mut engine, &page);
    let strip = page.id("story_strip");

    let wider = ElementBox {
        rect: Rect::new(0.0, 2380.0, 2280.0, 600.0),
        scroll_width: 2280.0,
        client_width: 2280.0,
    };
    step(
        &mut engine,
        0.0,
        vec![HostEvent::Layout {
            element: strip,
            layout: wider,
        }],
    );
    let (start, end) = pin_trigger(&engine).range();
    assert!(approx(end - start, 1600.0), "range {}", end - start);

    settle_at(&mut engine, end);
    assert!(approx(engine.style(strip).x, -1000.0));
}

#[test]
fn narrowing_while_pinned_releases_the_pin_first() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    let els = elements(&page);

    let pins_seen = Rc::new(Cell::new(None));
    let seen = Rc::clone(&pins_seen);
    let mut spec = filmstrip::section(engine.config(), FilmstripCfg::default(), els);
    spec.groups[1] = BehaviorGroup::new(Breakpoint::narrow(768.0), move |engine, _, _| {
        seen.set(Some(engine.pinned_count()));
        engine.set_props(els.strip, &Props::new().x(0.0));
        Ok(())
    });
    let id = engine.register_section(spec).unwrap();

    scroll(&mut engine, 2980.0);
    step(&mut engine, 1.0, Vec::new());
    assert_eq!(engine.pinned_count(), 1);
    assert!(engine.style(els.strip).x < 0.0);

    let out = step(
        &mut engine,
        0.0,
        vec![HostEvent::Resize {
            width: 700.0,
            height: 1000.0,
        }],
    );
    assert_eq!(pins_seen.get(), Some(0));
    assert_eq!(engine.active_breakpoint(id), Some("narrow"));
    assert_eq!(engine.trigger_count(), 0);
    assert_eq!(engine.style(els.strip).x, 0.0);
    assert!(out.pins.iter().any(|p| p.element == els.frame && !p.pinned));

    let unpinned = out
        .events
        .iter()
        .position(|e| matches!(e, CoreEvent::PinEnded { .. }))
        .expect("pin ended");
    let switched = out
        .events
        .iter()
        .position(|e| matches!(e, CoreEvent::BreakpointChanged { .. }))
        .expect("breakpoint changed");
    assert!(unpinned < switched);
}

#[test]
fn narrow_layout_resets_both_layers() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    let id = register(&mut engine, &page);
    settle_at(&mut engine, 3680.0);

    step(
        &mut engine,
        0.0,
        vec![HostEvent::Resize {
            width: 375.0,
            height: 800.0,
        }],
    );
    assert_eq!(engine.active_breakpoint(id), Some("narrow"));
    assert_eq!(engine.style(page.id("story_strip")).x, 0.0);
    assert_eq!(engine.style(page.id("story_background")).x, 0.0);

    step(
        &mut engine,
        0.0,
        vec![HostEvent::Resize {
            width: 1280.0,
            height: 1000.0,
        }],
    );
    assert_eq!(engine.active_breakpoint(id), Some("wide"));
    assert_eq!(engine.trigger_count(), 1);
}
