//! # Label Placement
//!
//! Fits a box's name onto one of two faces and computes where the text
//! sits relative to the box center. Text that is wider than its face is
//! silently omitted.

use glam::{DAffine3, DQuat, DVec3};
use packview_core::{Axis, Color, LayoutError};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

/// Label text size in packing-space units, shared by every label
pub const TEXT_SIZE: f64 = 0.2;

/// Gap between a label and the face it sits on (avoids z-fighting)
pub const LABEL_CLEARANCE: f64 = 0.01;

/// The two labeled faces of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceSelector {
    /// The -Z face, spanning the box width
    Front,
    /// The -X face, spanning the box length
    Side,
}

impl FaceSelector {
    pub const ALL: [FaceSelector; 2] = [FaceSelector::Front, FaceSelector::Side];

    /// Extent of the face along the text direction
    pub fn face_extent(self, box_length: f64, box_width: f64) -> f64 {
        match self {
            Self::Front => box_width,
            Self::Side => box_length,
        }
    }

    /// Rotation about render Y, in radians
    pub fn rotation(self) -> f64 {
        match self {
            Self::Front => PI,
            Self::Side => PI + FRAC_PI_2,
        }
    }

    pub fn text_color(self) -> Color {
        match self {
            Self::Front => Color::BLACK,
            Self::Side => Color::RED,
        }
    }

    /// Outward normal of the face in box-local render space
    pub fn normal(self) -> DVec3 {
        match self {
            Self::Front => DVec3::NEG_Z,
            Self::Side => DVec3::NEG_X,
        }
    }
}

impl fmt::Display for FaceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => write!(f, "front"),
            Self::Side => write!(f, "side"),
        }
    }
}

/// A fitted label, positioned relative to its box center
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLabel {
    pub text: String,
    pub face: FaceSelector,
    /// Local offset of the text origin from the box center
    pub offset: DVec3,
    /// Rotation about render Y, in radians
    pub rotation_y: f64,
    pub measured_width: f64,
}

impl FaceLabel {
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_y.to_degrees()
    }

    pub fn color(&self) -> Color {
        self.face.text_color()
    }

    /// Transform from label-local text space (x along the baseline, y up)
    /// into box-local render space.
    pub fn local_transform(&self) -> DAffine3 {
        DAffine3::from_rotation_translation(DQuat::from_rotation_y(self.rotation_y), self.offset)
    }
}

/// Fit `text` onto `face` and compute its placement.
///
/// Returns `Ok(None)` when the measured width exceeds the face extent.
/// A width equal to the extent fits.
pub fn place_label(
    text: &str,
    face: FaceSelector,
    box_length: f64,
    box_width: f64,
    measured_text_width: f64,
) -> Result<Option<FaceLabel>, LayoutError> {
    if text.is_empty() {
        return Err(LayoutError::EmptyLabel);
    }
    for (axis, value) in [(Axis::Length, box_length), (Axis::Width, box_width)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(LayoutError::invalid_dimension(text, axis, value));
        }
    }
    if !(measured_text_width.is_finite() && measured_text_width >= 0.0) {
        return Err(LayoutError::InvalidMeasurement {
            value: measured_text_width,
        });
    }

    if measured_text_width > face.face_extent(box_length, box_width) {
        return Ok(None);
    }

    let offset = match face {
        FaceSelector::Front => DVec3::new(
            measured_text_width / 2.0,
            -TEXT_SIZE / 2.0,
            -box_length / 2.0 - LABEL_CLEARANCE,
        ),
        FaceSelector::Side => DVec3::new(
            -box_width / 2.0 - LABEL_CLEARANCE,
            -TEXT_SIZE / 2.0,
            -measured_text_width / 2.0,
        ),
    };

    Ok(Some(FaceLabel {
        text: text.to_string(),
        face,
        offset,
        rotation_y: face.rotation(),
        measured_width: measured_text_width,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_too_wide_is_absent() {
        let label = place_label("Box ABC", FaceSelector::Front, 1.0, 1.0, 1.5).unwrap();
        assert!(label.is_none());
    }

    #[test]
    fn test_front_offset() {
        let label = place_label("Box ABC", FaceSelector::Front, 1.0, 2.0, 1.5)
            .unwrap()
            .unwrap();
        assert_eq!(label.offset.x, 0.75);
        assert_eq!(label.offset.y, -0.1);
        assert!((label.offset.z - (-0.51)).abs() < EPS);
        assert!((label.rotation_degrees() - 180.0).abs() < EPS);
    }

    #[test]
    fn test_side_offset() {
        let label = place_label("Box GHI", FaceSelector::Side, 3.0, 1.0, 1.0)
            .unwrap()
            .unwrap();
        assert!((label.offset.x - (-0.51)).abs() < EPS);
        assert_eq!(label.offset.z, -0.5);
        assert!((label.rotation_degrees() - 270.0).abs() < EPS);
    }

    #[test]
    fn test_side_uses_length_front_uses_width() {
        // A long thin box: fits on the side but not the front
        assert!(place_label("Box GHI", FaceSelector::Side, 3.0, 1.0, 1.2)
            .unwrap()
            .is_some());
        assert!(place_label("Box GHI", FaceSelector::Front, 3.0, 1.0, 1.2)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_input_validation() {
        assert_eq!(
            place_label("", FaceSelector::Front, 1.0, 1.0, 0.5),
            Err(LayoutError::EmptyLabel)
        );
        assert!(place_label("A", FaceSelector::Front, 0.0, 1.0, 0.5).is_err());
        assert!(place_label("A", FaceSelector::Front, 1.0, 1.0, -0.1).is_err());
        assert!(place_label("A", FaceSelector::Side, 1.0, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_local_transform_faces_outward() {
        let label = place_label("A", FaceSelector::Front, 2.0, 2.0, 1.0)
            .unwrap()
            .unwrap();
        let t = label.local_transform();
        // Text origin lands on the offset
        assert!(t.transform_point3(DVec3::ZERO).distance(label.offset) < EPS);
        // The text's +Z normal points out of the -Z face
        let n = t.transform_vector3(DVec3::Z);
        assert!(n.distance(FaceSelector::Front.normal()) < EPS);

        let side = place_label("A", FaceSelector::Side, 2.0, 2.0, 1.0)
            .unwrap()
            .unwrap();
        let n = side.local_transform().transform_vector3(DVec3::Z);
        assert!(n.distance(FaceSelector::Side.normal()) < EPS);
    }

    #[test]
    fn test_text_runs_across_face_centered() {
        let label = place_label("A", FaceSelector::Front, 2.0, 2.0, 1.0)
            .unwrap()
            .unwrap();
        let t = label.local_transform();
        let start = t.transform_point3(DVec3::ZERO);
        let end = t.transform_point3(DVec3::new(1.0, 0.0, 0.0));
        assert!((start.x - 0.5).abs() < EPS);
        assert!((end.x + 0.5).abs() < EPS);
    }
}
