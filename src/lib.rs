//! # PackView
//!
//! Static 3D visualization of packed boxes:
//! - Boxes mapped from packing space into a Y-up render space
//! - Front and side face labels, fitted to the face they sit on
//! - A subdivided container wireframe
//! - Orbit camera, rendered headlessly to SVG
//!
//! ## Architecture
//!
//! PackView is organized as a workspace with multiple crates:
//!
//! 1. **packview-core** - Box and container descriptors, colors, errors
//! 2. **packview-layout** - Box placement, label fitting, font metrics
//! 3. **packview-visualizer** - Scene graph, camera, controls, SVG output
//! 4. **packview-settings** - Configuration files
//! 5. **packview** - Main binary that integrates all crates

use glam::Vec3;
use packview_layout::{
    label_with_metrics, FaceSelector, FontLoader, FontSource, LabelOutcome, LabelRequest,
    MetricsLoader, PlacedBox, SharedMetrics,
};
use packview_settings::{Config, LabelSettings, ViewSettings};
use packview_visualizer::{
    build_scene, Camera, OrbitControls, SceneBuildReport, Viewport, Visualizer,
};
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub use packview_core::{BoxSpec, Color, ContainerSpec, LayoutError, SceneConfig};
pub use packview_settings::SettingsError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - RUST_LOG environment variable support, `info` by default
/// - Pretty console output on stderr, or JSON lines when `json` is set
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries command output
    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .json();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Where label glyphs come from; a font file wins over a family name
pub fn font_source(labels: &LabelSettings) -> FontSource {
    match &labels.font_path {
        Some(path) => FontSource::File(path.clone()),
        None => FontSource::System {
            family: labels.font_family.clone(),
        },
    }
}

pub fn font_metrics(labels: &LabelSettings) -> SharedMetrics<FontLoader> {
    SharedMetrics::new(FontLoader::new(font_source(labels)))
}

pub fn camera_from_settings(view: &ViewSettings) -> Camera {
    let c = &view.camera;
    let mut camera =
        Camera::from_position(Vec3::from_array(c.position), Vec3::from_array(c.target));
    camera.fov = c.fov;
    camera.near = c.near;
    camera.far = c.far;
    camera.max_distance = camera.max_distance.max(camera.distance);
    camera
}

pub fn controls_from_settings(view: &ViewSettings) -> OrbitControls {
    let c = &view.controls;
    let mut controls = OrbitControls::default();
    controls.auto_rotate = c.auto_rotate;
    controls.auto_rotate_speed = c.auto_rotate_speed;
    controls.enable_damping = c.enable_damping;
    controls.damping_factor = c.damping_factor;
    controls
}

pub fn viewport_from_settings(view: &ViewSettings) -> Viewport {
    Viewport::new(view.width, view.height).with_device_pixel_ratio(view.pixel_ratio)
}

/// Assemble a rendering session from `config` and issue its label
/// requests when labels are enabled.
///
/// Must be called from within a tokio runtime.
pub fn build_session<L: MetricsLoader>(
    config: &Config,
    metrics: SharedMetrics<L>,
) -> (Visualizer<L>, SceneBuildReport) {
    let (mut scene, report) = build_scene(&config.scene);
    scene.background = config.view.background;
    let stats = scene.get_stats();
    info!(
        boxes = stats.box_count,
        container_segments = stats.container_segments,
        rejected = report.rejected.len(),
        "scene built"
    );

    let mut vis = Visualizer::new(
        scene,
        camera_from_settings(&config.view),
        viewport_from_settings(&config.view),
        metrics,
    );
    vis.controls = controls_from_settings(&config.view);

    if config.labels.enabled {
        let issued = vis.request_labels();
        info!(issued, "label requests issued");
    }
    (vis, report)
}

/// Render the current frame and write it to `path`
pub fn write_frame<L: MetricsLoader>(
    vis: &Visualizer<L>,
    path: &Path,
) -> packview_core::Result<()> {
    std::fs::write(path, vis.render_svg())?;
    Ok(())
}

/// How one face label fits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelFit {
    pub face: String,
    pub face_extent: f64,
    /// `None` when no font metrics are available
    pub measured_width: Option<f64>,
    pub fits: Option<bool>,
    /// Set when the label itself cannot be placed
    pub error: Option<String>,
}

/// Placement of one configured box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlacement {
    pub name: String,
    /// Render-space center; absent when the box was rejected
    pub center: Option<[f64; 3]>,
    pub error: Option<String>,
    pub labels: Vec<LabelFit>,
}

/// Place every configured box and report how its labels fit
pub async fn placement_report<L: MetricsLoader>(
    scene: &SceneConfig,
    labels_enabled: bool,
    metrics: &SharedMetrics<L>,
) -> Vec<BoxPlacement> {
    let resolved = if labels_enabled {
        metrics.resolve().await
    } else {
        None
    };

    scene
        .boxes
        .iter()
        .map(|spec| match PlacedBox::place(spec) {
            Ok(placed) => {
                let labels = if labels_enabled {
                    FaceSelector::ALL
                        .iter()
                        .map(|&face| {
                            let face_extent = face.face_extent(spec.length, spec.width);
                            let outcome = resolved.as_deref().map(|m| {
                                label_with_metrics(m, &LabelRequest::for_box(&placed, face))
                            });
                            let (measured_width, fits, error) = match outcome {
                                Some(LabelOutcome::Attached(r)) => {
                                    (Some(r.label.measured_width), Some(true), None)
                                }
                                Some(LabelOutcome::Omitted { measured_width, .. }) => {
                                    (Some(measured_width), Some(false), None)
                                }
                                Some(LabelOutcome::Invalid { error, .. }) => {
                                    (None, None, Some(error.to_string()))
                                }
                                Some(LabelOutcome::MetricsUnavailable { .. }) | None => {
                                    (None, None, None)
                                }
                            };
                            LabelFit {
                                face: face.to_string(),
                                face_extent,
                                measured_width,
                                fits,
                                error,
                            }
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                BoxPlacement {
                    name: spec.name.clone(),
                    center: Some(placed.center.to_array()),
                    error: None,
                    labels,
                }
            }
            Err(e) => BoxPlacement {
                name: spec.name.clone(),
                center: None,
                error: Some(e.to_string()),
                labels: Vec::new(),
            },
        })
        .collect()
}
