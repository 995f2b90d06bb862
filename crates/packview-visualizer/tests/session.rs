//! Frame sequencing with asynchronously resolving labels

use async_trait::async_trait;
use packview_core::{BoxSpec, SceneConfig};
use packview_layout::{FaceSelector, MetricsLoader, SharedMetrics, TextMetrics};
use packview_visualizer::{build_scene, Camera, Viewport, Visualizer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

struct FixedAdvance(f64);

impl TextMetrics for FixedAdvance {
    fn measure(&self, text: &str, _size: f64) -> f64 {
        text.chars().count() as f64 * self.0
    }
}

/// Resolves once `gate` is notified
struct GatedLoader {
    gate: Arc<Notify>,
    loads: Arc<AtomicUsize>,
    available: bool,
}

#[async_trait]
impl MetricsLoader for GatedLoader {
    type Metrics = FixedAdvance;

    async fn load(&self) -> Option<FixedAdvance> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        self.available.then_some(FixedAdvance(0.1))
    }
}

fn session(available: bool) -> (Visualizer<GatedLoader>, Arc<Notify>, Arc<AtomicUsize>) {
    let gate = Arc::new(Notify::new());
    let loads = Arc::new(AtomicUsize::new(0));
    let loader = GatedLoader {
        gate: Arc::clone(&gate),
        loads: Arc::clone(&loads),
        available,
    };
    let (scene, _) = build_scene(&SceneConfig::demo());
    let vis = Visualizer::new(
        scene,
        Camera::default(),
        Viewport::new(800, 600),
        SharedMetrics::new(loader),
    );
    (vis, gate, loads)
}

#[tokio::test]
async fn test_frames_render_before_labels_resolve() {
    let (mut vis, gate, loads) = session(true);
    assert_eq!(vis.request_labels(), 12);

    let info = vis.tick(1.0 / 60.0);
    assert_eq!(info.frame, 1);
    assert_eq!(info.labels_attached, 0);
    assert_eq!(vis.scene().label_count(), 0);
    assert!(vis.render_svg().contains("<polygon"));

    gate.notify_one();
    let attached = vis.attach_all_labels().await;
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(vis.pending_labels(), 0);

    // 0.1 per char; a label needs a face at least as wide as its text
    let demo = SceneConfig::demo();
    let expected: usize = demo
        .boxes
        .iter()
        .map(|b| {
            let text = b.name.chars().count() as f64 * 0.1;
            usize::from(text <= b.width) + usize::from(text <= b.length)
        })
        .sum();
    assert_eq!(attached, expected);
    assert_eq!(vis.scene().label_count(), expected);
}

#[tokio::test]
async fn test_labels_attach_progressively_across_frames() {
    let (mut vis, gate, _) = session(true);
    vis.request_labels();
    vis.tick(0.016);
    assert_eq!(vis.scene().label_count(), 0);

    gate.notify_one();
    let mut total = 0;
    for _ in 0..100 {
        total += vis.tick(0.016).labels_attached;
        if vis.pending_labels() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(vis.pending_labels(), 0);
    assert_eq!(total, vis.scene().label_count());
    assert!(total > 0);
}

#[tokio::test]
async fn test_unavailable_metrics_leave_boxes_unlabeled() {
    let (mut vis, gate, _) = session(false);
    vis.request_labels();
    gate.notify_one();
    assert_eq!(vis.attach_all_labels().await, 0);
    assert_eq!(vis.scene().label_count(), 0);
    assert_eq!(vis.scene().boxes().len(), 6);
}

#[tokio::test]
async fn test_resize_updates_camera_aspect() {
    let (mut vis, _gate, _) = session(true);
    assert!((vis.camera.aspect_ratio - 800.0 / 600.0).abs() < 1e-6);

    vis.viewport_mut().resize(1000, 500);
    let info = vis.tick(0.016);
    assert!(info.resized);
    assert!((vis.camera.aspect_ratio - 2.0).abs() < 1e-6);

    assert!(!vis.tick(0.016).resized);
}

#[tokio::test]
async fn test_auto_rotate_moves_camera_each_frame() {
    let (mut vis, _gate, _) = session(true);
    vis.controls.auto_rotate = true;
    let yaw0 = vis.camera.yaw;
    let info = vis.tick(0.5);
    assert!(info.camera_moved);
    assert!(vis.camera.yaw > yaw0);
}

#[tokio::test]
async fn test_labels_follow_box_names() {
    let gate = Arc::new(Notify::new());
    let loader = GatedLoader {
        gate: Arc::clone(&gate),
        loads: Arc::new(AtomicUsize::new(0)),
        available: true,
    };
    let config = SceneConfig {
        boxes: vec![BoxSpec::new("LONGNAME", 0.5, 2.0, 1.0)],
        ..SceneConfig::empty()
    };
    let (scene, _) = build_scene(&config);
    let mut vis = Visualizer::new(
        scene,
        Camera::default(),
        Viewport::new(100, 100),
        SharedMetrics::new(loader),
    );
    vis.request_labels();
    gate.notify_one();
    assert_eq!(vis.attach_all_labels().await, 1);

    let node = &vis.scene().boxes()[0];
    // 0.8 wide: fits the 2.0 front face, not the 0.5 side face
    assert!(node.label(FaceSelector::Front).is_some());
    assert!(node.label(FaceSelector::Side).is_none());
    assert_eq!(node.label(FaceSelector::Front).unwrap().label.text, "LONGNAME");
}
