//! Reduced-motion preference as a live boolean signal.
//!
//! The host forwards the platform's `prefers-reduced-motion` state through
//! [`MotionPreference::update`]. Hosts without platform support pass `None`,
//! which reads as "no reduction requested".

use std::fmt;

use crate::ids::SubscriptionId;

type Listener = Box<dyn FnMut(bool)>;

#[derive(Default)]
pub struct MotionPreference {
    reduced: bool,
    next_id: u32,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl fmt::Debug for MotionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionPreference")
            .field("reduced", &self.reduced)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl MotionPreference {
    pub fn new(reduced: bool) -> Self {
        Self {
            reduced,
            ..Self::default()
        }
    }

    #[inline]
    pub fn current(&self) -> bool {
        self.reduced
    }

    /// Register a callback invoked with the new value on every change.
    pub fn subscribe(&mut self, listener: impl FnMut(bool) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        before != self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Feed the platform signal. Returns true if the effective value changed.
    pub fn update(&mut self, platform: Option<bool>) -> bool {
        let next = platform.unwrap_or(false);
        if next == self.reduced {
            return false;
        }
        self.reduced = next;
        for (_, listener) in self.listeners.iter_mut() {
            listener(next);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_fire_only_on_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut pref = MotionPreference::default();
        let sink = seen.clone();
        let id = pref.subscribe(move |v| sink.borrow_mut().push(v));

        assert!(!pref.update(Some(false)));
        assert!(pref.update(Some(true)));
        assert!(!pref.update(Some(true)));
        assert!(pref.update(None));
        assert_eq!(*seen.borrow(), vec![true, false]);

        assert!(pref.unsubscribe(id));
        assert_eq!(pref.listener_count(), 0);
        pref.update(Some(true));
        assert_eq!(seen.borrow().len(), 2);
        assert!(!pref.unsubscribe(id));
    }

    #[test]
    fn missing_platform_support_reads_false() {
        let mut pref = MotionPreference::new(true);
        pref.update(None);
        assert!(!pref.current());
    }
}
