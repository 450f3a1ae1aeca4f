mod common;

use common::{approx, scroll, step, Page};
use scrollwork_core::effects::rsvp::{self, RsvpCfg, RsvpElements};
use scrollwork_core::{CoreEvent, Engine, HostEvent, SectionId, SectionState};

fn register(engine: &mut Engine, page: &Page) -> SectionId {
    let els = RsvpElements {
        container: page.id("rsvp"),
        content: page.id("rsvp_content"),
    };
    engine
        .register_section(rsvp::section(RsvpCfg::default(), els))
        .expect("register rsvp")
}

#[test]
fn content_waits_below_until_a_tenth_is_visible() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    register(&mut engine, &page);
    let content = page.id("rsvp_content");

    let hidden = engine.style(content);
    assert_eq!(hidden.opacity, 0.0);
    assert!(approx(hidden.y, 32.0));
    // top 3500 + 10% of 500 meets the viewport bottom at 1000.
    let (start, _) = engine.triggers().next().unwrap().range();
    assert!(approx(start, 2550.0), "start {start}");

    scroll(&mut engine, 2500.0);
    step(&mut engine, 1.0, Vec::new());
    assert_eq!(engine.style(content).opacity, 0.0);
    assert_eq!(engine.trigger_count(), 1);
}

#[test]
fn reveal_plays_once_and_never_reverses() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    let id = register(&mut engine, &page);
    let content = page.id("rsvp_content");

    scroll(&mut engine, 2600.0);
    assert_eq!(engine.trigger_count(), 0);
    assert_eq!(engine.timeline_count(), 1);

    // Scrolling away mid-entrance doesn't interrupt it.
    step(&mut engine, 0.2, Vec::new());
    scroll(&mut engine, 0.0);
    let out = step(&mut engine, 1.0, Vec::new());
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, CoreEvent::TimelineCompleted { .. })));
    let shown = engine.style(content);
    assert_eq!(shown.opacity, 1.0);
    assert_eq!(shown.y, 0.0);

    for y in [2600.0, 0.0, 2600.0] {
        let out = step(&mut engine, 1.0, vec![HostEvent::Scroll { y }]);
        assert!(out.change_for(content).is_none(), "moved again at {y}");
        assert!(out.events.is_empty(), "{:?}", out.events);
    }
    assert_eq!(engine.section_state(id), Some(SectionState::Active));
    engine.dispose_section(id).unwrap();
    assert_eq!(engine.timeline_count(), 0);
}

#[test]
fn landing_past_the_block_still_reveals_it() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    register(&mut engine, &page);

    scroll(&mut engine, 6000.0);
    assert_eq!(engine.trigger_count(), 0);
    step(&mut engine, 1.0, Vec::new());
    assert_eq!(engine.style(page.id("rsvp_content")).opacity, 1.0);
}

#[test]
fn reduced_motion_shows_content_immediately() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    step(
        &mut engine,
        0.0,
        vec![HostEvent::ReducedMotion {
            reduced: Some(true),
        }],
    );
    let id = register(&mut engine, &page);

    assert_eq!(engine.section_state(id), Some(SectionState::Static));
    assert_eq!(engine.trigger_count(), 0);
    let state = engine.style(page.id("rsvp_content"));
    assert_eq!(state.opacity, 1.0);
    assert_eq!(state.y, 0.0);
}
