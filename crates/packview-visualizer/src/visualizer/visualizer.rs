//! # Visualizer Session
//!
//! Owns the scene, camera, orbit controls and viewport of one rendering
//! session, plus the label requests still in flight. Each frame attaches
//! whatever labels have resolved, advances the controls and renders.

use super::camera::Camera;
use super::controls::OrbitControls;
use super::scene3d::{LabelOverlay, NodeId, Scene3D};
use super::svg_renderer::SvgRenderer;
use super::viewport::{Viewport, ViewportEvent};
use packview_layout::{
    FaceSelector, LabelOutcome, LabelRequest, LabelScheduler, MetricsLoader, SharedMetrics,
};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub frame: u64,
    pub labels_attached: usize,
    pub camera_moved: bool,
    pub resized: bool,
}

pub struct Visualizer<L: MetricsLoader> {
    scene: Scene3D,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub renderer: SvgRenderer,
    viewport: Viewport,
    viewport_events: broadcast::Receiver<ViewportEvent>,
    labels: LabelScheduler<NodeId, L>,
    frame: u64,
}

impl<L: MetricsLoader> Visualizer<L> {
    /// Must be called from within a tokio runtime.
    pub fn new(
        scene: Scene3D,
        mut camera: Camera,
        viewport: Viewport,
        metrics: SharedMetrics<L>,
    ) -> Self {
        camera.update_aspect_ratio(viewport.width() as f32, viewport.height() as f32);
        let viewport_events = viewport.subscribe();
        Self {
            scene,
            camera,
            controls: OrbitControls::default(),
            renderer: SvgRenderer::default(),
            viewport,
            viewport_events,
            labels: LabelScheduler::new(metrics),
            frame: 0,
        }
    }

    pub fn scene(&self) -> &Scene3D {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn pending_labels(&self) -> usize {
        self.labels.pending()
    }

    /// Issue a front and a side label request for every box in the scene.
    /// Returns the number of requests issued.
    pub fn request_labels(&mut self) -> usize {
        let mut issued = 0;
        for node in self.scene.boxes() {
            for face in FaceSelector::ALL {
                self.labels
                    .request(node.id, LabelRequest::for_box(&node.placed, face));
                issued += 1;
            }
        }
        debug!(issued, "label requests issued");
        issued
    }

    /// Attach the labels resolved so far, without waiting
    pub fn attach_ready_labels(&mut self) -> usize {
        let ready = self.labels.drain_ready();
        self.apply_outcomes(ready)
    }

    /// Wait for every outstanding label request and attach the results.
    ///
    /// Does not return while the font metrics are still loading.
    pub async fn attach_all_labels(&mut self) -> usize {
        let done = self.labels.wait_all().await;
        self.apply_outcomes(done)
    }

    fn apply_outcomes(&mut self, outcomes: Vec<(NodeId, LabelOutcome)>) -> usize {
        let mut attached = 0;
        for (id, outcome) in outcomes {
            match outcome {
                LabelOutcome::Attached(resolved) => {
                    if self
                        .scene
                        .attach_label(id, LabelOverlay::from_resolved(resolved))
                    {
                        attached += 1;
                    }
                }
                LabelOutcome::Omitted { face, .. } => {
                    debug!(%id, %face, "label does not fit its face");
                }
                LabelOutcome::MetricsUnavailable { face } => {
                    debug!(%id, %face, "label skipped, no font metrics");
                }
                LabelOutcome::Invalid { face, error } => {
                    warn!(%id, %face, "label rejected: {}", error);
                }
            }
        }
        attached
    }

    /// Apply pending viewport resizes to the camera
    pub fn handle_viewport_events(&mut self) -> bool {
        let mut resized = false;
        loop {
            match self.viewport_events.try_recv() {
                Ok(ViewportEvent::Resized { .. }) | Err(TryRecvError::Lagged(_)) => resized = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if resized {
            self.camera.update_aspect_ratio(
                self.viewport.width() as f32,
                self.viewport.height() as f32,
            );
        }
        resized
    }

    /// Advance one frame by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> FrameInfo {
        let resized = self.handle_viewport_events();
        let labels_attached = self.attach_ready_labels();
        let camera_moved = self.controls.update(&mut self.camera, dt);
        self.frame += 1;
        if labels_attached > 0 {
            info!(frame = self.frame, labels_attached, "labels attached");
        }
        FrameInfo {
            frame: self.frame,
            labels_attached,
            camera_moved,
            resized,
        }
    }

    pub fn render_svg(&self) -> String {
        self.renderer.render(&self.scene, &self.camera, &self.viewport)
    }
}
