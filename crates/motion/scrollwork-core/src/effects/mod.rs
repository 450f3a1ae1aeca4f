//! Site effects expressed as registrable sections.
//!
//! Each constructor returns a [`SectionSpec`](crate::section::SectionSpec): the
//! elements involved, one behavior per breakpoint group, and the state elements
//! should rest in when motion is reduced. Pass it to
//! [`Engine::register_section`](crate::engine::Engine::register_section).

use crate::config::Config;
use crate::responsive::Breakpoint;

pub mod divider;
pub mod filmstrip;
pub mod hero;
pub mod reveal;
pub mod rsvp;

/// `(min-width: wide)` and everything narrower, in matching order.
pub(crate) fn wide_and_narrow(config: &Config) -> (Breakpoint, Breakpoint) {
    (
        Breakpoint::wide(config.wide_min_width),
        Breakpoint::narrow(config.wide_min_width),
    )
}
