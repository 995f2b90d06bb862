//! # SVG Renderer
//!
//! Projects the scene through the camera and writes one standalone SVG
//! document per frame. Faces and container lines are depth-sorted and
//! drawn back to front; back faces are culled. Labels are drawn right
//! after the face they sit on.

use super::camera::Camera;
use super::mesh_rendering::Quad;
use super::scene3d::{BoxNode, LabelOverlay, Lighting, Scene3D};
use super::viewport::Viewport;
use glam::{Mat4, Vec2, Vec3};
use packview_core::Color;
use std::fmt::Write;

/// Clip-space w below which a point counts as behind the camera
const MIN_CLIP_W: f32 = 1e-6;

/// Box outline stroke
const EDGE_COLOR: Color = Color::BLACK;

#[derive(Debug, Clone, PartialEq)]
pub struct SvgRenderer {
    /// Box outline width in CSS pixels
    pub edge_width: f32,
    /// Container line width in CSS pixels
    pub wire_width: f32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            edge_width: 1.5,
            wire_width: 1.0,
        }
    }
}

enum DrawItem<'a> {
    Face { node: &'a BoxNode, quad: &'a Quad },
    Wire { a: Vec3, b: Vec3, color: Color, opacity: f32 },
}

struct Projector<'v> {
    view_projection: Mat4,
    viewport: &'v Viewport,
}

impl<'v> Projector<'v> {
    fn new(camera: &Camera, viewport: &'v Viewport) -> Self {
        Self {
            view_projection: camera.view_projection(),
            viewport,
        }
    }

    fn project(&self, p: Vec3) -> Option<Vec2> {
        let clip = self.view_projection * p.extend(1.0);
        if clip.w < MIN_CLIP_W {
            return None;
        }
        Some(self.viewport.ndc_to_pixel(clip.truncate() / clip.w))
    }

    fn project_all<'a>(&self, points: impl IntoIterator<Item = &'a Vec3>) -> Option<Vec<Vec2>> {
        points.into_iter().map(|p| self.project(*p)).collect()
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, scene: &Scene3D, camera: &Camera, viewport: &Viewport) -> String {
        let (width, height) = viewport.drawing_buffer_size();
        let scale = viewport.pixel_ratio();
        let eye = camera.get_eye_position();
        let projector = Projector::new(camera, viewport);

        let mut items: Vec<(f32, DrawItem<'_>)> = Vec::new();
        for node in scene.boxes() {
            for quad in &node.mesh.quads {
                let centroid = quad.centroid();
                if quad.normal.dot(eye - centroid) <= 0.0 {
                    continue;
                }
                items.push((centroid.distance(eye), DrawItem::Face { node, quad }));
            }
        }
        if let Some(container) = scene.container() {
            let wire = &container.wireframe;
            for &(a, b) in &wire.segments {
                let depth = ((a + b) / 2.0).distance(eye);
                items.push((
                    depth,
                    DrawItem::Wire {
                        a,
                        b,
                        color: wire.color,
                        opacity: wire.opacity,
                    },
                ));
            }
        }
        // Farthest first
        items.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        );
        let _ = writeln!(
            svg,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            scene.background
        );

        for (_, item) in &items {
            match item {
                DrawItem::Face { node, quad } => {
                    let Some(points) = projector.project_all(&quad.corners) else {
                        continue;
                    };
                    let fill = shade(
                        node.mesh.color,
                        &scene.lighting,
                        quad.normal,
                        eye - quad.centroid(),
                    );
                    let _ = writeln!(
                        svg,
                        r#"<polygon data-box="{}" points="{}" fill="{}" stroke="{}" stroke-width="{:.2}" stroke-linejoin="round"/>"#,
                        escape_xml(node.name()),
                        format_points(&points),
                        fill,
                        EDGE_COLOR,
                        self.edge_width * scale
                    );
                    for overlay in node.labels().filter(|o| o.host_face() == quad.face) {
                        self.write_label(&mut svg, &projector, node, overlay);
                    }
                }
                DrawItem::Wire {
                    a,
                    b,
                    color,
                    opacity,
                } => {
                    let (Some(pa), Some(pb)) = (projector.project(*a), projector.project(*b))
                    else {
                        continue;
                    };
                    let _ = writeln!(
                        svg,
                        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-opacity="{}" stroke-width="{:.2}"/>"#,
                        pa.x,
                        pa.y,
                        pb.x,
                        pb.y,
                        color,
                        opacity,
                        self.wire_width * scale
                    );
                }
            }
        }

        svg.push_str("</svg>\n");
        svg
    }

    fn write_label(
        &self,
        svg: &mut String,
        projector: &Projector,
        node: &BoxNode,
        overlay: &LabelOverlay,
    ) {
        let mut d = String::new();
        for contour in overlay.world_contours(node.placed.center) {
            let Some(points) = projector.project_all(&contour) else {
                continue;
            };
            for (i, p) in points.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{}{:.2},{:.2} ", cmd, p.x, p.y);
            }
            d.push_str("Z ");
        }
        let _ = writeln!(
            svg,
            r#"<path data-box="{}" data-label="{}" d="{}" fill="{}"/>"#,
            escape_xml(node.name()),
            overlay.face(),
            d.trim_end(),
            overlay.color
        );
    }
}

/// Lambert shading: ambient plus the camera point light
fn shade(base: Color, lighting: &Lighting, normal: Vec3, to_light: Vec3) -> Color {
    let diffuse = normal.dot(to_light.normalize_or_zero()).max(0.0);
    base.scaled(lighting.ambient + lighting.point_intensity * diffuse)
}

fn format_points(points: &[Vec2]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
