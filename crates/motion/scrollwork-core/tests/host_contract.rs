mod common;

use common::Page;
use scrollwork_core::effects::divider::{self, DividerCfg};
use scrollwork_core::{config::Config, Ease, Engine, HostEvent, Inputs};
use serde_json::{json, Value};

#[test]
fn inputs_parse_from_tagged_json() {
    let inputs: Inputs = serde_json::from_value(json!({
        "events": [
            {
                "type": "mount",
                "element": 7,
                "layout": {
                    "rect": { "left": 0.0, "top": 100.0, "width": 320.0, "height": 80.0 },
                    "scroll_width": 320.0,
                    "client_width": 320.0
                }
            },
            { "type": "resize", "width": 1024.0, "height": 768.0 },
            { "type": "scroll", "y": 250.0 },
            { "type": "reduced_motion" },
            { "type": "refresh" }
        ]
    }))
    .expect("inputs should parse");

    assert_eq!(inputs.events.len(), 5);
    assert_eq!(inputs.events[2], HostEvent::Scroll { y: 250.0 });
    assert_eq!(inputs.events[3], HostEvent::ReducedMotion { reduced: None });

    let mut engine = Engine::default();
    engine.update(0.0, inputs).unwrap();
    assert_eq!(engine.viewport().scroll_y, 250.0);
    assert_eq!(engine.viewport().width, 1024.0);
    assert_eq!(engine.scene().len(), 1);
}

#[test]
fn outputs_serialize_with_snake_case_tags() {
    let page = Page::load("site-wide");
    let mut engine = page.engine();
    engine
        .register_section(divider::drift_section(
            DividerCfg::default(),
            page.id("rsvp_divider"),
        ))
        .unwrap();

    let out = engine
        .update(0.1, Inputs::new().with(HostEvent::Scroll { y: 2820.0 }))
        .unwrap();
    let v: Value = serde_json::to_value(out).unwrap();
    let changes = v["changes"].as_array().expect("changes array");
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0]["element"], json!(page.id("rsvp_divider").0));
    assert!(changes[0]["state"]["y"].as_f64().unwrap() < 0.0);

    let events = v["events"].as_array().unwrap();
    assert_eq!(events[0]["type"], "trigger_toggled");
    assert_eq!(events[0]["callback"], "enter");
}

#[test]
fn config_fills_missing_fields_with_defaults() {
    let cfg: Config = serde_json::from_value(json!({
        "wide_min_width": 900.0,
        "default_ease": "power3.inOut"
    }))
    .unwrap();
    assert_eq!(cfg.wide_min_width, 900.0);
    assert_eq!(cfg.default_ease, Ease::Power3InOut);
    assert_eq!(cfg.default_duration, 0.5);
    assert_eq!(cfg.max_events_per_tick, 1024);

    assert!(serde_json::from_value::<Config>(json!({ "default_ease": "wobble" })).is_err());
}

#[test]
fn event_cap_counts_dropped_events() {
    let page = Page::load("site-wide");
    let cfg = Config {
        max_events_per_tick: 1,
        ..Config::default()
    };
    let mut engine = page.engine_with(cfg);
    for name in ["hero_divider", "rsvp_divider"] {
        engine
            .register_section(divider::drift_section(DividerCfg::default(), page.id(name)))
            .unwrap();
    }
    let out = engine
        .update(0.0, Inputs::new().with(HostEvent::Scroll { y: 1.0e5 }))
        .unwrap();
    assert_eq!(out.events.len(), 1);
    // Enter + Leave for each of the two triggers.
    assert_eq!(out.dropped_events, 3);
}
