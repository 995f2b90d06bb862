//! # Layout Engine
//!
//! Maps packing-space boxes into render space.
//!
//! Packing space: X = width axis, Y = depth (length) axis, Z = height axis.
//! Render space is Y-up, so packing Z becomes render Y and packing Y
//! becomes render Z. Every center is a pure function of the box's
//! dimensions and offset.

use glam::DVec3;
use packview_core::{Axis, BoxSpec, ContainerSpec, LayoutError};
use tracing::debug;

fn check_dimension(subject: &str, axis: Axis, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::invalid_dimension(subject, axis, value))
    }
}

fn check_dimensions(
    subject: &str,
    length: f64,
    width: f64,
    height: f64,
) -> Result<(), LayoutError> {
    check_dimension(subject, Axis::Length, length)?;
    check_dimension(subject, Axis::Width, width)?;
    check_dimension(subject, Axis::Height, height)
}

/// Compute a box's render-space center from its packing-space corner.
///
/// Fails with [`LayoutError::InvalidDimension`] when any dimension is not
/// strictly positive.
pub fn place_box(
    length: f64,
    width: f64,
    height: f64,
    offset_x: f64,
    offset_y: f64,
    offset_z: f64,
) -> Result<DVec3, LayoutError> {
    check_dimensions("box", length, width, height)?;
    Ok(render_center(length, width, height, offset_x, offset_y, offset_z))
}

#[inline]
fn render_center(
    length: f64,
    width: f64,
    height: f64,
    offset_x: f64,
    offset_y: f64,
    offset_z: f64,
) -> DVec3 {
    DVec3::new(
        offset_x + width / 2.0,
        offset_z + height / 2.0,
        offset_y + length / 2.0,
    )
}

/// A box descriptor together with its render-space center
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBox {
    pub spec: BoxSpec,
    pub center: DVec3,
}

impl PlacedBox {
    /// Place a box, naming it in any dimension error.
    pub fn place(spec: &BoxSpec) -> Result<Self, LayoutError> {
        check_dimensions(&spec.name, spec.length, spec.width, spec.height)?;
        let o = spec.offset;
        let center = render_center(spec.length, spec.width, spec.height, o.x, o.y, o.z);
        debug!(name = %spec.name, ?center, "placed box");
        Ok(Self {
            spec: spec.clone(),
            center,
        })
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Size along render X, Y, Z
    pub fn extents(&self) -> DVec3 {
        DVec3::new(self.spec.width, self.spec.height, self.spec.length)
    }

    pub fn min(&self) -> DVec3 {
        self.center - self.extents() / 2.0
    }

    pub fn max(&self) -> DVec3 {
        self.center + self.extents() / 2.0
    }
}

/// The container wireframe volume in render space
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedContainer {
    pub spec: ContainerSpec,
    pub center: DVec3,
    /// Size along render X, Y, Z
    pub extents: DVec3,
}

/// Place the container.
///
/// The container keeps its own axis convention: render X spans its length
/// and render Z its width, the transpose of the box convention. With a cubic
/// container the two agree.
pub fn place_container(spec: &ContainerSpec) -> Result<PlacedContainer, LayoutError> {
    check_dimensions("container", spec.length, spec.width, spec.height)?;
    let o = spec.offset;
    let center = DVec3::new(
        o.x + spec.length / 2.0,
        o.z + spec.height / 2.0,
        o.y + spec.width / 2.0,
    );
    Ok(PlacedContainer {
        spec: spec.clone(),
        center,
        extents: DVec3::new(spec.length, spec.height, spec.width),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_box_tall_box_at_origin() {
        let c = place_box(1.0, 1.0, 2.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(c, DVec3::new(0.5, 1.0, 0.5));
    }

    #[test]
    fn test_place_box_swaps_axes() {
        let c = place_box(2.0, 3.0, 3.0, 1.0, 1.0, 0.0).unwrap();
        assert_eq!(c, DVec3::new(2.5, 1.5, 2.0));
    }

    #[test]
    fn test_place_box_rejects_zero_and_nan() {
        let err = place_box(0.0, 1.0, 1.0, 0.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidDimension {
                axis: Axis::Length,
                ..
            }
        ));
        assert!(place_box(1.0, f64::NAN, 1.0, 0.0, 0.0, 0.0).is_err());
        assert!(place_box(1.0, 1.0, f64::INFINITY, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_placed_box_names_subject() {
        let spec = BoxSpec::new("Box XYZ", 1.0, -2.0, 1.0);
        match PlacedBox::place(&spec).unwrap_err() {
            LayoutError::InvalidDimension { subject, axis, value } => {
                assert_eq!(subject, "Box XYZ");
                assert_eq!(axis, Axis::Width);
                assert_eq!(value, -2.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_placed_box_corners() {
        let placed = PlacedBox::place(&BoxSpec::new("Box DEF", 1.0, 4.0, 1.0).at(1.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(placed.min(), DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(placed.max(), DVec3::new(5.0, 1.0, 1.0));
    }

    #[test]
    fn test_container_keeps_own_mapping() {
        let placed = place_container(&ContainerSpec::new(6.0, 2.0, 4.0)).unwrap();
        assert_eq!(placed.center, DVec3::new(3.0, 2.0, 1.0));
        assert_eq!(placed.extents, DVec3::new(6.0, 4.0, 2.0));
    }
}
