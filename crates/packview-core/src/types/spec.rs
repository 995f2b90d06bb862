//! Packing-space descriptors for boxes and their container.
//!
//! Packing space uses X along a box's width, Y along its length (depth) and
//! Z along its height. Offsets name the near-bottom-front corner of a box.

use super::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Packing-space dimension axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Length,
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length => write!(f, "length"),
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// A point in packing space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PackingPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PackingPoint {
    pub const ORIGIN: PackingPoint = PackingPoint {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Immutable descriptor of one packed box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    /// Display text, used as the face label and as an identifier
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub color: Color,
    /// Near-bottom-front corner
    #[serde(default)]
    pub offset: PackingPoint,
}

impl BoxSpec {
    pub fn new(name: impl Into<String>, length: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            length,
            width,
            height,
            color: Color::default(),
            offset: PackingPoint::ORIGIN,
        }
    }

    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.offset = PackingPoint::new(x, y, z);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Bounding volume drawn as a wireframe.
///
/// Sized independently of the boxes it surrounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub offset: PackingPoint,
}

impl ContainerSpec {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            offset: PackingPoint::ORIGIN,
        }
    }
}

impl Default for ContainerSpec {
    fn default() -> Self {
        Self::new(4.0, 4.0, 4.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_builder() {
        let spec = BoxSpec::new("Box JKL", 2.0, 3.0, 3.0)
            .at(1.0, 1.0, 0.0)
            .with_color(Color::from_hex(0xf1c232));
        assert_eq!(spec.offset, PackingPoint::new(1.0, 1.0, 0.0));
        assert_eq!(spec.color.hex(), 0xf1c232);
    }

    #[test]
    fn test_box_deserialize_defaults() {
        let spec: BoxSpec =
            serde_json::from_str(r#"{"name":"A","length":1,"width":2,"height":3}"#).unwrap();
        assert_eq!(spec.offset, PackingPoint::ORIGIN);
        assert_eq!(spec.color, Color::default());
    }

    #[test]
    fn test_axis_display() {
        assert_eq!(Axis::Length.to_string(), "length");
        assert_eq!(Axis::Width.to_string(), "width");
        assert_eq!(Axis::Height.to_string(), "height");
    }
}
