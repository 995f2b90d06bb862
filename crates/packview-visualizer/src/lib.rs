//! # PackView Visualizer
//!
//! Scene graph, orbit camera and SVG rendering for packed boxes.

pub mod visualizer;

pub use visualizer::{
    build_scene, BoxNode, Camera, ContainerNode, CuboidFace, FrameInfo, LabelOverlay, Lighting,
    LineSet, NodeId, OrbitControls, Quad, RenderableMesh, Scene3D, Scene3DStats,
    SceneBuildReport, SvgRenderer, Viewport, ViewportEvent, Visualizer, CONTAINER_OPACITY,
    MAX_PIXEL_RATIO,
};
