//! # 3D Scene
//!
//! Scene graph of placed boxes, their face labels and the container
//! wireframe. Boxes are added synchronously; labels arrive later, one per
//! face, in whatever order their requests complete.

use super::mesh_rendering::{CuboidFace, LineSet, RenderableMesh};
use glam::{DVec3, Vec3};
use packview_core::{Color, LayoutError, SceneConfig};
use packview_layout::{
    place_container, FaceLabel, FaceSelector, PlacedBox, PlacedContainer, ResolvedLabel,
};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Container wireframe opacity
pub const CONTAINER_OPACITY: f32 = 0.25;

/// Handle to a box added to a [`Scene3D`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fitted label ready to be drawn on its box
#[derive(Debug, Clone, PartialEq)]
pub struct LabelOverlay {
    pub label: FaceLabel,
    /// Glyph contours in label-local text space
    pub contours: Vec<Vec<glam::DVec2>>,
    pub color: Color,
}

impl LabelOverlay {
    pub fn from_resolved(resolved: ResolvedLabel) -> Self {
        let color = resolved.label.color();
        Self {
            label: resolved.label,
            contours: resolved.outline.contours,
            color,
        }
    }

    pub fn face(&self) -> FaceSelector {
        self.label.face
    }

    /// The box face the label is drawn on
    pub fn host_face(&self) -> CuboidFace {
        match self.label.face {
            FaceSelector::Front => CuboidFace::NegZ,
            FaceSelector::Side => CuboidFace::NegX,
        }
    }

    /// Contours in render space for a box centered at `box_center`
    pub fn world_contours(&self, box_center: DVec3) -> Vec<Vec<Vec3>> {
        let transform = self.label.local_transform();
        self.contours
            .iter()
            .map(|contour| {
                contour
                    .iter()
                    .map(|p| {
                        let local = transform.transform_point3(DVec3::new(p.x, p.y, 0.0));
                        (box_center + local).as_vec3()
                    })
                    .collect()
            })
            .collect()
    }
}

/// A box in the scene
#[derive(Debug, Clone)]
pub struct BoxNode {
    pub id: NodeId,
    pub placed: PlacedBox,
    pub mesh: RenderableMesh,
    labels: HashMap<FaceSelector, LabelOverlay>,
}

impl BoxNode {
    pub fn name(&self) -> &str {
        self.placed.name()
    }

    pub fn label(&self, face: FaceSelector) -> Option<&LabelOverlay> {
        self.labels.get(&face)
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelOverlay> {
        FaceSelector::ALL.iter().filter_map(|f| self.labels.get(f))
    }
}

/// The container wireframe
#[derive(Debug, Clone)]
pub struct ContainerNode {
    pub placed: PlacedContainer,
    pub wireframe: LineSet,
}

/// Scene lighting: white ambient plus a point light at the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub point_intensity: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 1.0,
            point_intensity: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene3DStats {
    pub box_count: usize,
    pub label_count: usize,
    pub container_segments: usize,
    pub bounds: (Vec3, Vec3),
}

/// Boxes rejected while building a scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneBuildReport {
    pub rejected: Vec<(String, LayoutError)>,
    pub container_rejected: Option<LayoutError>,
}

impl SceneBuildReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.container_rejected.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Scene3D {
    boxes: Vec<BoxNode>,
    container: Option<ContainerNode>,
    pub lighting: Lighting,
    pub background: Color,
}

impl Default for Scene3D {
    fn default() -> Self {
        Self {
            boxes: Vec::new(),
            container: None,
            lighting: Lighting::default(),
            background: Color::WHITE,
        }
    }
}

impl Scene3D {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placed box with its solid mesh
    pub fn add_box(&mut self, placed: PlacedBox) -> NodeId {
        let id = NodeId::new();
        let center = placed.center.as_vec3();
        let extents = placed.extents().as_vec3();
        let mesh = RenderableMesh::cuboid(center, extents, placed.spec.color);
        debug!(%id, name = %placed.name(), "box added to scene");
        self.boxes.push(BoxNode {
            id,
            placed,
            mesh,
            labels: HashMap::new(),
        });
        id
    }

    /// Attach a label to a box. A label already on the same face is
    /// replaced. Returns false when the box is unknown.
    pub fn attach_label(&mut self, id: NodeId, overlay: LabelOverlay) -> bool {
        match self.boxes.iter_mut().find(|b| b.id == id) {
            Some(node) => {
                debug!(name = %node.name(), face = %overlay.face(), "label attached");
                node.labels.insert(overlay.face(), overlay);
                true
            }
            None => {
                warn!(%id, "label for unknown box dropped");
                false
            }
        }
    }

    pub fn set_container(&mut self, placed: PlacedContainer, segments: u32) {
        let wireframe = LineSet::wireframe_grid(
            placed.center.as_vec3(),
            placed.extents.as_vec3(),
            segments,
            Color::BLACK,
            CONTAINER_OPACITY,
        );
        self.container = Some(ContainerNode { placed, wireframe });
    }

    pub fn container(&self) -> Option<&ContainerNode> {
        self.container.as_ref()
    }

    pub fn box_node(&self, id: NodeId) -> Option<&BoxNode> {
        self.boxes.iter().find(|b| b.id == id)
    }

    pub fn find_box(&self, name: &str) -> Option<&BoxNode> {
        self.boxes.iter().find(|b| b.name() == name)
    }

    /// Boxes in insertion order
    pub fn boxes(&self) -> &[BoxNode] {
        &self.boxes
    }

    pub fn label_count(&self) -> usize {
        self.boxes.iter().map(|b| b.labels.len()).sum()
    }

    /// Axis-aligned bounds of every box and the container
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let boxes = self
            .boxes
            .iter()
            .map(|b| (b.mesh.bounds_min, b.mesh.bounds_max));
        let container = self.container.iter().map(|c| {
            let center = c.placed.center.as_vec3();
            let half = c.placed.extents.as_vec3() / 2.0;
            (center - half, center + half)
        });
        boxes
            .chain(container)
            .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b)))
    }

    pub fn get_stats(&self) -> Scene3DStats {
        Scene3DStats {
            box_count: self.boxes.len(),
            label_count: self.label_count(),
            container_segments: self.container.as_ref().map_or(0, |c| c.wireframe.len()),
            bounds: self.bounds().unwrap_or((Vec3::ZERO, Vec3::ZERO)),
        }
    }
}

/// Place every box of `config` and assemble the scene.
///
/// A box with invalid dimensions is skipped and reported; the rest of the
/// scene is unaffected.
pub fn build_scene(config: &SceneConfig) -> (Scene3D, SceneBuildReport) {
    let mut scene = Scene3D::new();
    let mut report = SceneBuildReport::default();

    if let Some(container) = &config.container {
        match place_container(container) {
            Ok(placed) => scene.set_container(placed, config.container_segments),
            Err(e) => {
                warn!("container skipped: {}", e);
                report.container_rejected = Some(e);
            }
        }
    }

    for spec in &config.boxes {
        match PlacedBox::place(spec) {
            Ok(placed) => {
                scene.add_box(placed);
            }
            Err(e) => {
                warn!(name = %spec.name, "box skipped: {}", e);
                report.rejected.push((spec.name.clone(), e));
            }
        }
    }

    info!(
        boxes = scene.boxes().len(),
        rejected = report.rejected.len(),
        "scene built"
    );
    (scene, report)
}
