use glam::{DVec2, Vec3};
use packview_core::{BoxSpec, Color, ContainerSpec, SceneConfig};
use packview_layout::{
    label_with_metrics, FaceSelector, LabelOutcome, LabelRequest, TextMetrics, TextOutline,
};
use packview_visualizer::{build_scene, Camera, LabelOverlay, SvgRenderer, Viewport};

/// Every character is a 0.1 × 0.1 square
struct SquareGlyphs;

impl TextMetrics for SquareGlyphs {
    fn measure(&self, text: &str, _size: f64) -> f64 {
        text.chars().count() as f64 * 0.1
    }

    fn outline(&self, text: &str, _size: f64) -> TextOutline {
        let contours = (0..text.chars().count())
            .map(|i| {
                let x = i as f64 * 0.1;
                vec![
                    DVec2::new(x, 0.0),
                    DVec2::new(x + 0.1, 0.0),
                    DVec2::new(x + 0.1, 0.1),
                    DVec2::new(x, 0.1),
                ]
            })
            .collect();
        TextOutline { contours }
    }
}

#[test]
fn test_invalid_box_is_skipped_without_affecting_others() {
    let config = SceneConfig {
        container: Some(ContainerSpec::default()),
        container_segments: 4,
        boxes: vec![
            BoxSpec::new("Good A", 1.0, 1.0, 1.0),
            BoxSpec::new("Flat", 1.0, 0.0, 1.0).at(1.0, 0.0, 0.0),
            BoxSpec::new("Good B", 2.0, 1.0, 1.0).at(2.0, 0.0, 0.0),
        ],
    };
    let (scene, report) = build_scene(&config);

    let names: Vec<_> = scene.boxes().iter().map(|b| b.name().to_string()).collect();
    assert_eq!(names, vec!["Good A", "Good B"]);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].0, "Flat");
    assert!(report.container_rejected.is_none());

    let b = scene.find_box("Good B").unwrap();
    assert_eq!(b.placed.center.as_vec3(), Vec3::new(2.5, 0.5, 1.0));
}

#[test]
fn test_demo_scene_matches_known_centers() {
    let (scene, _) = build_scene(&SceneConfig::demo());
    let center = |name: &str| scene.find_box(name).unwrap().placed.center.as_vec3();
    assert_eq!(center("Box ABC"), Vec3::new(0.5, 1.0, 0.5));
    assert_eq!(center("Box JKL"), Vec3::new(2.5, 1.5, 2.0));
    assert!(scene.container().is_some());
}

#[test]
fn test_empty_scene_renders_background_only() {
    let (scene, _) = build_scene(&SceneConfig::empty());
    let svg = SvgRenderer::new().render(&scene, &Camera::default(), &Viewport::new(320, 200));
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains(r##"fill="#ffffff""##));
    assert!(!svg.contains("<polygon"));
    assert!(!svg.contains("<line"));
}

#[test]
fn test_svg_tags_visible_faces_and_draws_labels() {
    let config = SceneConfig {
        container: Some(ContainerSpec::default()),
        container_segments: 4,
        boxes: vec![BoxSpec::new("Box <1>", 2.0, 2.0, 1.0).with_color(Color::from_hex(0x2faf49))],
    };
    let (mut scene, _) = build_scene(&config);
    let node = &scene.boxes()[0];
    let id = node.id;
    let placed = node.placed.clone();

    for face in FaceSelector::ALL {
        match label_with_metrics(&SquareGlyphs, &LabelRequest::for_box(&placed, face)) {
            LabelOutcome::Attached(resolved) => {
                assert!(scene.attach_label(id, LabelOverlay::from_resolved(resolved)));
            }
            other => panic!("expected a label, got {:?}", other),
        }
    }

    let mut viewport = Viewport::new(640, 480);
    let mut camera = Camera::default();
    camera.update_aspect_ratio(640.0, 480.0);
    viewport.resize(640, 480);
    let svg = SvgRenderer::new().render(&scene, &camera, &viewport);

    // Camera at (8, 4, -8) sees the top, front (-Z) and right (+X) faces
    assert_eq!(svg.matches(r#"data-box="Box &lt;1&gt;""#).count(), 3 + 1);
    assert_eq!(svg.matches("data-label=").count(), 1);
    assert!(svg.contains(r#"data-label="front""#));
    assert!(svg.contains(r##"fill="#000000""##));
    assert_eq!(
        svg.matches("<line").count(),
        scene.container().unwrap().wireframe.len()
    );
}

#[test]
fn test_side_label_visible_from_negative_x() {
    let config = SceneConfig {
        container: None,
        container_segments: 4,
        boxes: vec![BoxSpec::new("SIDE", 2.0, 2.0, 1.0)],
    };
    let (mut scene, _) = build_scene(&config);
    let id = scene.boxes()[0].id;
    let placed = scene.boxes()[0].placed.clone();
    if let LabelOutcome::Attached(resolved) =
        label_with_metrics(&SquareGlyphs, &LabelRequest::for_box(&placed, FaceSelector::Side))
    {
        scene.attach_label(id, LabelOverlay::from_resolved(resolved));
    }

    let camera = Camera::from_position(Vec3::new(-8.0, 4.0, 1.0), Vec3::new(1.0, 0.5, 1.0));
    let svg = SvgRenderer::new().render(&scene, &camera, &Viewport::new(400, 400));
    assert!(svg.contains(r#"data-label="side""#));
    assert!(svg.contains(r##"fill="#ff0000""##));
}

#[test]
fn test_pixel_ratio_scales_document() {
    let (scene, _) = build_scene(&SceneConfig::demo());
    let viewport = Viewport::new(300, 200).with_device_pixel_ratio(4.0);
    let svg = SvgRenderer::new().render(&scene, &Camera::default(), &viewport);
    assert!(svg.contains(r#"width="600" height="400""#));
}
