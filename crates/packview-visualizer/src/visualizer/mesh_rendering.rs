//! # Mesh Rendering Module
//!
//! Cuboid meshes for packed boxes and the subdivided wireframe drawn for
//! the container.

use glam::Vec3;
use packview_core::Color;
use std::collections::HashSet;

/// The six faces of an axis-aligned cuboid, named by outward normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CuboidFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CuboidFace {
    pub const ALL: [CuboidFace; 6] = [
        CuboidFace::PosX,
        CuboidFace::NegX,
        CuboidFace::PosY,
        CuboidFace::NegY,
        CuboidFace::PosZ,
        CuboidFace::NegZ,
    ];

    pub fn normal(self) -> Vec3 {
        match self {
            Self::PosX => Vec3::X,
            Self::NegX => Vec3::NEG_X,
            Self::PosY => Vec3::Y,
            Self::NegY => Vec3::NEG_Y,
            Self::PosZ => Vec3::Z,
            Self::NegZ => Vec3::NEG_Z,
        }
    }

    /// Two in-plane axes; `u × v` points along the outward normal
    fn tangents(self) -> (Vec3, Vec3) {
        match self {
            Self::PosX => (Vec3::Y, Vec3::Z),
            Self::NegX => (Vec3::Z, Vec3::Y),
            Self::PosY => (Vec3::Z, Vec3::X),
            Self::NegY => (Vec3::X, Vec3::Z),
            Self::PosZ => (Vec3::X, Vec3::Y),
            Self::NegZ => (Vec3::Y, Vec3::X),
        }
    }
}

/// One planar face, corners in perimeter order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [Vec3; 4],
    pub normal: Vec3,
    pub face: CuboidFace,
}

impl Quad {
    pub fn centroid(&self) -> Vec3 {
        self.corners.iter().copied().sum::<Vec3>() / 4.0
    }
}

/// A renderable solid mesh
#[derive(Debug, Clone)]
pub struct RenderableMesh {
    pub quads: Vec<Quad>,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub color: Color,
}

impl RenderableMesh {
    /// Axis-aligned cuboid around `center`, `extents` being its full size
    pub fn cuboid(center: Vec3, extents: Vec3, color: Color) -> Self {
        let half = extents / 2.0;
        let quads = CuboidFace::ALL
            .iter()
            .map(|&face| {
                let n = face.normal();
                let (u, v) = face.tangents();
                let c = center + n * half;
                let du = u * half;
                let dv = v * half;
                Quad {
                    corners: [c - du - dv, c + du - dv, c + du + dv, c - du + dv],
                    normal: n,
                    face,
                }
            })
            .collect();

        Self {
            quads,
            bounds_min: center - half,
            bounds_max: center + half,
            color,
        }
    }

    pub fn face(&self, face: CuboidFace) -> Option<&Quad> {
        self.quads.iter().find(|q| q.face == face)
    }
}

/// A set of line segments sharing one color
#[derive(Debug, Clone)]
pub struct LineSet {
    pub segments: Vec<(Vec3, Vec3)>,
    pub color: Color,
    pub opacity: f32,
}

impl LineSet {
    /// Triangle wireframe of a cuboid whose faces are split into
    /// `segments × segments` cells, each cell cut along one diagonal.
    /// Edges shared between faces appear once.
    pub fn wireframe_grid(
        center: Vec3,
        extents: Vec3,
        segments: u32,
        color: Color,
        opacity: f32,
    ) -> Self {
        let n = segments.max(1);
        let half = extents / 2.0;
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for face in CuboidFace::ALL {
            let normal = face.normal();
            let (u, v) = face.tangents();
            let origin = center + normal * half - u * half - v * half;
            let step_u = u * extents / n as f32;
            let step_v = v * extents / n as f32;
            let point = |i: u32, j: u32| origin + step_u * i as f32 + step_v * j as f32;

            for i in 0..=n {
                for j in 0..=n {
                    if i < n {
                        push_unique(&mut seen, &mut out, point(i, j), point(i + 1, j));
                    }
                    if j < n {
                        push_unique(&mut seen, &mut out, point(i, j), point(i, j + 1));
                    }
                    if i < n && j < n {
                        push_unique(&mut seen, &mut out, point(i, j + 1), point(i + 1, j));
                    }
                }
            }
        }

        Self {
            segments: out,
            color,
            opacity,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

type PointKey = (i64, i64, i64);

fn point_key(p: Vec3) -> PointKey {
    const GRID: f32 = 1e4;
    (
        (p.x * GRID).round() as i64,
        (p.y * GRID).round() as i64,
        (p.z * GRID).round() as i64,
    )
}

fn push_unique(
    seen: &mut HashSet<(PointKey, PointKey)>,
    out: &mut Vec<(Vec3, Vec3)>,
    a: Vec3,
    b: Vec3,
) {
    let (ka, kb) = (point_key(a), point_key(b));
    let key = if ka <= kb { (ka, kb) } else { (kb, ka) };
    if seen.insert(key) {
        out.push((a, b));
    }
}
