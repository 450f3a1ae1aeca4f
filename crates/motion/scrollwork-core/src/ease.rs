//! Easing curves and scalar interpolation helpers.
//!
//! Curves are named the way the site's animation presets name them
//! (`"power2.out"`, `"none"`, ...) and round-trip through those strings in JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    /// Linear.
    None,
    Power1In,
    Power1Out,
    Power1InOut,
    Power2In,
    Power2Out,
    Power2InOut,
    Power3In,
    Power3Out,
    Power3InOut,
    SineInOut,
    /// CSS-style cubic bezier with control points (x1, y1, x2, y2).
    CubicBezier([f32; 4]),
}

impl Ease {
    /// Map linear progress `t` in [0,1] to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::None => t,
            Ease::Power1In => power_in(t, 2),
            Ease::Power1Out => power_out(t, 2),
            Ease::Power1InOut => power_in_out(t, 2),
            Ease::Power2In => power_in(t, 3),
            Ease::Power2Out => power_out(t, 3),
            Ease::Power2InOut => power_in_out(t, 3),
            Ease::Power3In => power_in(t, 4),
            Ease::Power3Out => power_out(t, 4),
            Ease::Power3InOut => power_in_out(t, 4),
            Ease::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
            Ease::CubicBezier([x1, y1, x2, y2]) => bezier_ease_t(t, x1, y1, x2, y2),
        }
    }
}

#[inline]
fn power_in(t: f32, exp: i32) -> f32 {
    t.powi(exp)
}

#[inline]
fn power_out(t: f32, exp: i32) -> f32 {
    1.0 - (1.0 - t).powi(exp)
}

#[inline]
fn power_in_out(t: f32, exp: i32) -> f32 {
    if t < 0.5 {
        power_in(t * 2.0, exp) / 2.0
    } else {
        1.0 - power_in((1.0 - t) * 2.0, exp) / 2.0
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Invert the x curve by bisection, then evaluate y at the found parameter.
fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 || (x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0) {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ease::None => "none",
            Ease::Power1In => "power1.in",
            Ease::Power1Out => "power1.out",
            Ease::Power1InOut => "power1.inOut",
            Ease::Power2In => "power2.in",
            Ease::Power2Out => "power2.out",
            Ease::Power2InOut => "power2.inOut",
            Ease::Power3In => "power3.in",
            Ease::Power3Out => "power3.out",
            Ease::Power3InOut => "power3.inOut",
            Ease::SineInOut => "sine.inOut",
            Ease::CubicBezier([x1, y1, x2, y2]) => {
                return write!(f, "cubic-bezier({x1},{y1},{x2},{y2})");
            }
        };
        f.write_str(name)
    }
}

impl FromStr for Ease {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(args) = trimmed
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parsed: Vec<f32> = args
                .split(',')
                .map(|p| p.trim().parse::<f32>())
                .collect::<Result<_, _>>()
                .map_err(|_| MotionError::InvalidEase(s.to_string()))?;
            return match parsed.as_slice() {
                [x1, y1, x2, y2] => Ok(Ease::CubicBezier([*x1, *y1, *x2, *y2])),
                _ => Err(MotionError::InvalidEase(s.to_string())),
            };
        }
        // Bare family names ("power2") mean the ".out" variant.
        let ease = match trimmed {
            "none" | "linear" => Ease::None,
            "power1.in" => Ease::Power1In,
            "power1" | "power1.out" => Ease::Power1Out,
            "power1.inOut" => Ease::Power1InOut,
            "power2.in" => Ease::Power2In,
            "power2" | "power2.out" => Ease::Power2Out,
            "power2.inOut" => Ease::Power2InOut,
            "power3.in" => Ease::Power3In,
            "power3" | "power3.out" => Ease::Power3Out,
            "power3.inOut" => Ease::Power3InOut,
            "sine.inOut" => Ease::SineInOut,
            _ => return Err(MotionError::InvalidEase(s.to_string())),
        };
        Ok(ease)
    }
}

impl TryFrom<String> for Ease {
    type Error = MotionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(value: Ease) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed_for_every_curve() {
        let curves = [
            Ease::None,
            Ease::Power1Out,
            Ease::Power2Out,
            Ease::Power2InOut,
            Ease::Power3In,
            Ease::SineInOut,
            Ease::CubicBezier([0.4, 0.0, 0.2, 1.0]),
        ];
        for ease in curves {
            assert!(ease.apply(0.0).abs() < 1e-5, "{ease} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-5, "{ease} at 1");
        }
    }

    #[test]
    fn power2_out_is_cubic_out() {
        let t = 0.5;
        assert!((Ease::Power2Out.apply(t) - 0.875).abs() < 1e-6);
        assert!((Ease::Power1Out.apply(t) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn parse_names_and_bezier() {
        assert_eq!("power2.out".parse::<Ease>().unwrap(), Ease::Power2Out);
        assert_eq!("power2".parse::<Ease>().unwrap(), Ease::Power2Out);
        assert_eq!("none".parse::<Ease>().unwrap(), Ease::None);
        assert_eq!(
            "cubic-bezier(0.4, 0, 0.2, 1)".parse::<Ease>().unwrap(),
            Ease::CubicBezier([0.4, 0.0, 0.2, 1.0])
        );
        assert!("elastic.out".parse::<Ease>().is_err());
    }

    #[test]
    fn ease_serializes_as_name() {
        let json = serde_json::to_string(&Ease::Power2Out).unwrap();
        assert_eq!(json, "\"power2.out\"");
        let back: Ease = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Ease::Power2Out);
    }
}
