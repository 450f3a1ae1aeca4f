#![allow(dead_code)]

use std::collections::BTreeMap;

use scrollwork_core::{
    config::Config, ContentItem, ElementBox, ElementId, Engine, HostEvent, Inputs, Outputs,
    Viewport,
};
use serde::Deserialize;

/// Page layout fixture: viewport plus named element boxes.
#[derive(Debug, Deserialize)]
pub struct Page {
    pub viewport: Viewport,
    pub elements: BTreeMap<String, Entry>,
}

#[derive(Copy, Clone, Debug, Deserialize)]
pub struct Entry {
    pub id: ElementId,
    pub layout: ElementBox,
}

impl Page {
    pub fn load(name: &str) -> Self {
        scrollwork_test_fixtures::layouts::load(name).expect("layout fixture should load")
    }

    pub fn id(&self, name: &str) -> ElementId {
        self.entry(name).id
    }

    pub fn layout(&self, name: &str) -> ElementBox {
        self.entry(name).layout
    }

    fn entry(&self, name: &str) -> &Entry {
        self.elements
            .get(name)
            .unwrap_or_else(|| panic!("fixture has no element '{name}'"))
    }

    pub fn mount_event(&self, name: &str) -> HostEvent {
        HostEvent::Mount {
            element: self.id(name),
            layout: self.layout(name),
        }
    }

    /// Engine with every fixture element mounted.
    pub fn engine(&self) -> Engine {
        self.engine_with(Config::default())
    }

    pub fn engine_with(&self, cfg: Config) -> Engine {
        let mut engine = Engine::with_viewport(cfg, self.viewport);
        let mut inputs = Inputs::new();
        for name in self.elements.keys() {
            inputs = inputs.with(self.mount_event(name));
        }
        engine.update(0.0, inputs).expect("mount should succeed");
        engine
    }
}

pub fn featured_items() -> Vec<ContentItem> {
    scrollwork_test_fixtures::content::load("featured").expect("content fixture should load")
}

pub fn scroll(engine: &mut Engine, y: f32) -> Outputs {
    step(engine, 0.0, vec![HostEvent::Scroll { y }])
}

pub fn step(engine: &mut Engine, dt: f32, events: Vec<HostEvent>) -> Outputs {
    engine
        .update(dt, Inputs { events })
        .expect("update should succeed")
        .clone()
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}
