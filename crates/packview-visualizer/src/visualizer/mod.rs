//! Headless 3D visualization
//!
//! This module provides:
//! - Orbit camera and controls
//! - Viewport with resize notifications
//! - Cuboid meshes and wireframes
//! - The scene graph of boxes, labels and container
//! - SVG rendering and the per-frame session

pub mod camera;
pub mod controls;
pub mod mesh_rendering;
pub mod scene3d;
pub mod svg_renderer;
pub mod viewport;
pub mod visualizer;

pub use camera::Camera;
pub use controls::OrbitControls;
pub use mesh_rendering::{CuboidFace, LineSet, Quad, RenderableMesh};
pub use scene3d::{
    build_scene, BoxNode, ContainerNode, LabelOverlay, Lighting, NodeId, Scene3D, Scene3DStats,
    SceneBuildReport, CONTAINER_OPACITY,
};
pub use svg_renderer::SvgRenderer;
pub use viewport::{Viewport, ViewportEvent, MAX_PIXEL_RATIO};
pub use visualizer::{FrameInfo, Visualizer};
