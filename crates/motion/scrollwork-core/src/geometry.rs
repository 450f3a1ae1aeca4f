//! Layout geometry: boxes, viewport, trigger positions, and layout-derived measures.
//!
//! All coordinates are document coordinates in CSS pixels. Scroll offsets grow downward.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::ids::ElementId;
use crate::scene::Scene;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Layout box reported by the host for one element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementBox {
    pub rect: Rect,
    /// Full content width including horizontal overflow.
    #[serde(default)]
    pub scroll_width: f32,
    /// Visible inner width.
    #[serde(default)]
    pub client_width: f32,
}

impl ElementBox {
    /// Box whose content exactly fits its rect.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            rect,
            scroll_width: rect.width,
            client_width: rect.width,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

/// A point along an element or the viewport, measured from its top.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Center,
    Bottom,
    /// Percentage of the length (0-100).
    Percent(f32),
    /// Fixed pixel distance from the top.
    Px(f32),
}

impl Edge {
    /// Distance from the top for a box of `length`.
    #[inline]
    pub fn along(self, length: f32) -> f32 {
        match self {
            Edge::Top => 0.0,
            Edge::Center => length * 0.5,
            Edge::Bottom => length,
            Edge::Percent(p) => length * p / 100.0,
            Edge::Px(px) => px,
        }
    }
}

impl FromStr for Edge {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MotionError::InvalidPosition(s.to_string());
        match s {
            "top" => Ok(Edge::Top),
            "center" => Ok(Edge::Center),
            "bottom" => Ok(Edge::Bottom),
            _ => {
                if let Some(p) = s.strip_suffix('%') {
                    p.parse().map(Edge::Percent).map_err(|_| invalid())
                } else {
                    s.strip_suffix("px")
                        .unwrap_or(s)
                        .parse()
                        .map(Edge::Px)
                        .map_err(|_| invalid())
                }
            }
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Top => f.write_str("top"),
            Edge::Center => f.write_str("center"),
            Edge::Bottom => f.write_str("bottom"),
            Edge::Percent(p) => write!(f, "{p}%"),
            Edge::Px(px) => write!(f, "{px}px"),
        }
    }
}

/// "When `subject` edge meets `viewport` edge", e.g. `top 80%`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub subject: Edge,
    pub viewport: Edge,
}

impl Position {
    pub const fn new(subject: Edge, viewport: Edge) -> Self {
        Self { subject, viewport }
    }

    /// Scroll offset at which the two edges coincide.
    pub fn resolve(&self, subject: &Rect, viewport_height: f32) -> f32 {
        subject.top + self.subject.along(subject.height) - self.viewport.along(viewport_height)
    }
}

impl FromStr for Position {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(subject), Some(viewport), None) => Ok(Position {
                subject: subject.parse()?,
                viewport: viewport.parse()?,
            }),
            _ => Err(MotionError::InvalidPosition(s.to_string())),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.subject, self.viewport)
    }
}

/// End of a trigger range: either another edge pairing or a distance past the start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndPosition {
    Anchored(Position),
    /// `"+=<distance>"`
    Distance(Measure),
}

impl From<Position> for EndPosition {
    fn from(value: Position) -> Self {
        EndPosition::Anchored(value)
    }
}

impl FromStr for EndPosition {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.trim().strip_prefix("+=") {
            let px: f32 = rest
                .strip_suffix("px")
                .unwrap_or(rest)
                .parse()
                .map_err(|_| MotionError::InvalidPosition(s.to_string()))?;
            return Ok(EndPosition::Distance(Measure::Px(px)));
        }
        s.parse().map(EndPosition::Anchored)
    }
}

/// Layout-derived length, resolved against the scene whenever triggers refresh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Px(f32),
    /// Fraction of the viewport height.
    ViewportHeight(f32),
    /// Fraction of the viewport width.
    ViewportWidth(f32),
    ElementHeight { element: ElementId, fraction: f32 },
    /// `max(0, content.scroll_width - frame.client_width)`
    Overflow { content: ElementId, frame: ElementId },
    Scaled(Box<Measure>, f32),
    Sum(Vec<Measure>),
}

impl Measure {
    /// Resolve to pixels. `None` when a referenced element isn't mounted.
    pub fn resolve(&self, scene: &Scene) -> Option<f32> {
        let viewport = scene.viewport();
        match self {
            Measure::Px(v) => Some(*v),
            Measure::ViewportHeight(f) => Some(viewport.height * f),
            Measure::ViewportWidth(f) => Some(viewport.width * f),
            Measure::ElementHeight { element, fraction } => {
                scene.get(*element).map(|b| b.rect.height * fraction)
            }
            Measure::Overflow { content, frame } => {
                let content = scene.get(*content)?;
                let frame = scene.get(*frame)?;
                Some((content.scroll_width.max(0.0) - frame.client_width).max(0.0))
            }
            Measure::Scaled(inner, factor) => inner.resolve(scene).map(|v| v * factor),
            Measure::Sum(parts) => parts.iter().map(|m| m.resolve(scene)).sum(),
        }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Measure::Scaled(Box::new(self), factor)
    }

    pub fn plus(self, other: Measure) -> Self {
        match self {
            Measure::Sum(mut parts) => {
                parts.push(other);
                Measure::Sum(parts)
            }
            first => Measure::Sum(vec![first, other]),
        }
    }
}

impl From<f32> for Measure {
    fn from(value: f32) -> Self {
        Measure::Px(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_positions() {
        let p: Position = "top 80%".parse().unwrap();
        assert_eq!(p, Position::new(Edge::Top, Edge::Percent(80.0)));
        let p: Position = "bottom center".parse().unwrap();
        assert_eq!(p, Position::new(Edge::Bottom, Edge::Center));
        let p: Position = "top 120px".parse().unwrap();
        assert_eq!(p, Position::new(Edge::Top, Edge::Px(120.0)));
        assert!("top".parse::<Position>().is_err());
        assert!("middle top".parse::<Position>().is_err());
    }

    #[test]
    fn parse_relative_end() {
        let e: EndPosition = "+=400".parse().unwrap();
        assert_eq!(e, EndPosition::Distance(Measure::Px(400.0)));
        let e: EndPosition = "bottom top".parse().unwrap();
        assert_eq!(
            e,
            EndPosition::Anchored(Position::new(Edge::Bottom, Edge::Top))
        );
    }

    #[test]
    fn position_resolves_against_subject_and_viewport() {
        let subject = Rect::new(0.0, 2000.0, 800.0, 400.0);
        // top meets 80% of a 1000px viewport
        let start: Position = "top 80%".parse().unwrap();
        assert_eq!(start.resolve(&subject, 1000.0), 1200.0);
        // bottom meets center
        let mid: Position = "bottom center".parse().unwrap();
        assert_eq!(mid.resolve(&subject, 1000.0), 1900.0);
    }
}
