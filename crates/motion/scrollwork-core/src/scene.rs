//! Host-reported layout: mounted element boxes plus the shared viewport.
//!
//! The scene is read-only to effects; only host events (mount, layout, resize,
//! scroll) mutate it.

use hashbrown::HashMap;

use crate::geometry::{ElementBox, Viewport};
use crate::ids::ElementId;

#[derive(Debug, Default)]
pub struct Scene {
    viewport: Viewport,
    elements: HashMap<ElementId, ElementBox>,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            elements: HashMap::new(),
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn get(&self, el: ElementId) -> Option<&ElementBox> {
        self.elements.get(&el)
    }

    #[inline]
    pub fn is_mounted(&self, el: ElementId) -> bool {
        self.elements.contains_key(&el)
    }

    pub fn all_mounted(&self, els: &[ElementId]) -> bool {
        els.iter().all(|el| self.is_mounted(*el))
    }

    /// Insert or replace an element's box. Returns true when the element is new.
    pub fn mount(&mut self, el: ElementId, layout: ElementBox) -> bool {
        self.elements.insert(el, layout).is_none()
    }

    pub fn unmount(&mut self, el: ElementId) -> Option<ElementBox> {
        self.elements.remove(&el)
    }

    pub fn set_scroll(&mut self, scroll_y: f32) {
        self.viewport.scroll_y = scroll_y;
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
