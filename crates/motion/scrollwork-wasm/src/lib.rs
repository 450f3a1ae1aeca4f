use js_sys::Function;
use serde::Deserialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use scrollwork_core::effects::divider::{self, DividerCfg};
use scrollwork_core::effects::filmstrip::{self, FilmstripCfg, FilmstripElements};
use scrollwork_core::effects::hero::{self, HeroCfg, HeroElements};
use scrollwork_core::effects::reveal::{self, RevealCfg, RevealElements};
use scrollwork_core::effects::rsvp::{self, RsvpCfg, RsvpElements};
use scrollwork_core::{
    Config, ContentItem, ElementBox, ElementId, Engine, Inputs, MotionError, Outputs, SectionId,
    SectionSpec, SubscriptionId,
};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = warn)]
    fn console_warn(message: &str, error: &JsValue);
}

#[wasm_bindgen]
pub struct ScrollworkEngine {
    core: Engine,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn motion_err(context: &str, e: MotionError) -> JsError {
    JsError::new(&format!("{context}: {e}"))
}

fn parse<T: for<'de> Deserialize<'de>>(context: &str, value: JsValue) -> Result<T, JsError> {
    if jsvalue_is_undefined_or_null(&value) {
        return Err(JsError::new(&format!("{context}: payload is null/undefined")));
    }
    swb::from_value(value).map_err(|e| JsError::new(&format!("{context} parse error: {e}")))
}

#[derive(Deserialize)]
struct HeroRegistration {
    #[serde(default)]
    cfg: HeroCfg,
    elements: HeroElements,
}

#[derive(Deserialize)]
struct RevealRegistration {
    #[serde(default)]
    cfg: RevealCfg,
    elements: RevealElements,
    #[serde(default)]
    items: Vec<ContentItem>,
}

#[derive(Deserialize)]
struct FilmstripRegistration {
    #[serde(default)]
    cfg: FilmstripCfg,
    elements: FilmstripElements,
}

#[derive(Deserialize)]
struct RsvpRegistration {
    #[serde(default)]
    cfg: RsvpCfg,
    elements: RsvpElements,
}

/// `preceding` present: reveal driven by the section above. Absent: drift.
#[derive(Deserialize)]
struct DividerRegistration {
    #[serde(default)]
    cfg: DividerCfg,
    divider: ElementId,
    #[serde(default)]
    preceding: Option<ElementId>,
}

#[wasm_bindgen]
impl ScrollworkEngine {
    /// Create a new engine instance. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new ScrollworkEngine({ wide_min_width: 900 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ScrollworkEngine, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(ScrollworkEngine {
            core: Engine::new(cfg),
        })
    }

    /// Mount an element (or update its layout). `layout` matches
    /// `{ rect: { left, top, width, height }, scroll_width, client_width }`.
    #[wasm_bindgen]
    pub fn mount(&mut self, element: u32, layout: JsValue) -> Result<(), JsError> {
        let layout: ElementBox = parse("mount layout", layout)?;
        self.core
            .mount(ElementId(element), layout)
            .map_err(|e| motion_err("mount", e))
    }

    #[wasm_bindgen]
    pub fn unmount(&mut self, element: u32) -> Result<(), JsError> {
        self.core
            .unmount(ElementId(element))
            .map_err(|e| motion_err("unmount", e))
    }

    /// Step by dt (seconds) with inputs JSON (`{ events: [...] }`). Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32, inputs_json: JsValue) -> Result<JsValue, JsError> {
        let inputs: Inputs = if jsvalue_is_undefined_or_null(&inputs_json) {
            Inputs::default()
        } else {
            swb::from_value(inputs_json).map_err(|e| JsError::new(&format!("inputs error: {e}")))?
        };
        let out: &Outputs = self
            .core
            .update(dt, inputs)
            .map_err(|e| motion_err("update", e))?;
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Outputs produced outside `update` (registrations, direct mounts), drained.
    #[wasm_bindgen]
    pub fn take_outputs(&mut self) -> Result<JsValue, JsError> {
        let out = self.core.take_outputs();
        swb::to_value(&out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// `{ cfg?, elements: { container, background, heading, subheading, indicator? } }`
    #[wasm_bindgen(js_name = register_hero)]
    pub fn register_hero(&mut self, payload: JsValue) -> Result<u32, JsError> {
        let reg: HeroRegistration = parse("register_hero", payload)?;
        self.register(hero::section(reg.cfg, reg.elements))
    }

    /// `{ cfg?, elements: { container, heading, card?, tiles }, items: [{ id, label }] }`
    #[wasm_bindgen(js_name = register_reveal)]
    pub fn register_reveal(&mut self, payload: JsValue) -> Result<u32, JsError> {
        let reg: RevealRegistration = parse("register_reveal", payload)?;
        let spec = reveal::section(self.core.config(), reg.cfg, reg.elements, &reg.items);
        self.register(spec)
    }

    /// `{ cfg?, elements: { container, frame, strip, background? } }`
    #[wasm_bindgen(js_name = register_filmstrip)]
    pub fn register_filmstrip(&mut self, payload: JsValue) -> Result<u32, JsError> {
        let reg: FilmstripRegistration = parse("register_filmstrip", payload)?;
        let spec = filmstrip::section(self.core.config(), reg.cfg, reg.elements);
        self.register(spec)
    }

    /// `{ cfg?, divider, preceding? }`
    #[wasm_bindgen(js_name = register_divider)]
    pub fn register_divider(&mut self, payload: JsValue) -> Result<u32, JsError> {
        let reg: DividerRegistration = parse("register_divider", payload)?;
        let spec = match reg.preceding {
            Some(preceding) => divider::reveal_section(reg.cfg, reg.divider, preceding),
            None => divider::drift_section(reg.cfg, reg.divider),
        };
        self.register(spec)
    }

    /// `{ cfg?, elements: { container, content } }`
    #[wasm_bindgen(js_name = register_rsvp)]
    pub fn register_rsvp(&mut self, payload: JsValue) -> Result<u32, JsError> {
        let reg: RsvpRegistration = parse("register_rsvp", payload)?;
        self.register(rsvp::section(reg.cfg, reg.elements))
    }

    #[wasm_bindgen(js_name = dispose_section)]
    pub fn dispose_section(&mut self, section: u32) -> Result<(), JsError> {
        self.core
            .dispose_section(SectionId(section))
            .map_err(|e| motion_err("dispose_section", e))
    }

    /// Forward `prefers-reduced-motion`. Pass undefined when matchMedia is unavailable.
    #[wasm_bindgen(js_name = set_reduced_motion)]
    pub fn set_reduced_motion(&mut self, reduced: Option<bool>) -> Result<(), JsError> {
        self.core
            .set_reduced_motion(reduced)
            .map_err(|e| motion_err("set_reduced_motion", e))
    }

    #[wasm_bindgen(js_name = current_reduced_motion)]
    pub fn current_reduced_motion(&self) -> bool {
        self.core.reduced_motion()
    }

    /// Call `listener(reduced: boolean)` on every preference change. Returns a subscription id.
    /// A listener that throws is reported on `console.warn`; the remaining listeners still run.
    #[wasm_bindgen(js_name = on_reduced_motion)]
    pub fn on_reduced_motion(&mut self, listener: Function) -> u32 {
        let id = self.core.subscribe_motion(move |reduced| {
            if let Err(err) = listener.call1(&JsValue::UNDEFINED, &JsValue::from_bool(reduced)) {
                console_warn("scrollwork: reduced-motion listener threw", &err);
            }
        });
        id.0
    }

    #[wasm_bindgen(js_name = off_reduced_motion)]
    pub fn off_reduced_motion(&mut self, subscription: u32) -> bool {
        self.core.unsubscribe_motion(SubscriptionId(subscription))
    }

    #[wasm_bindgen(js_name = trigger_count)]
    pub fn trigger_count(&self) -> u32 {
        self.core.trigger_count() as u32
    }
}

impl ScrollworkEngine {
    fn register(&mut self, spec: SectionSpec) -> Result<u32, JsError> {
        self.core
            .register_section(spec)
            .map(|id| id.0)
            .map_err(|e| motion_err("register_section", e))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
