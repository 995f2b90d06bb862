//! # Font Metrics
//!
//! Text measurement and glyph outlines for face labels, plus the shared,
//! load-once font resource every label request awaits.

use crate::font_manager::{self, FontSource};
use async_trait::async_trait;
use glam::DVec2;
use lyon::math::{point, Point};
use lyon::path::iterator::*;
use lyon::path::{path::Builder, Event, Path};
use rusttype::{point as rt_point, Font, OutlineBuilder, Scale};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Curve flattening tolerance as a fraction of the em size
const FLATTEN_TOLERANCE: f64 = 0.005;

/// Flattened glyph contours in label-local space.
///
/// x runs along the baseline, y is up, the baseline sits at y = 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOutline {
    pub contours: Vec<Vec<DVec2>>,
}

impl TextOutline {
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.contours.iter().map(Vec::len).sum()
    }
}

/// Text measurement capability
pub trait TextMetrics: Send + Sync {
    /// Rendered width of `text` at `size`: the right edge of its ink.
    fn measure(&self, text: &str, size: f64) -> f64;

    /// Glyph outlines of `text` at `size`. Metrics without glyph shapes
    /// return an empty outline.
    fn outline(&self, _text: &str, _size: f64) -> TextOutline {
        TextOutline::default()
    }
}

/// A loaded font measuring with rusttype
pub struct LabelFont {
    font: Font<'static>,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("glyphs", &self.font.glyph_count())
            .field("units_per_em", &self.font.units_per_em())
            .finish()
    }
}

impl LabelFont {
    pub fn new(font: Font<'static>) -> Self {
        Self { font }
    }

    /// rusttype scales by line height; labels are sized by em.
    fn scale(&self, size: f64) -> Scale {
        let v = self.font.v_metrics_unscaled();
        let units_per_em = f32::from(self.font.units_per_em().max(1));
        Scale::uniform(size as f32 * (v.ascent - v.descent) / units_per_em)
    }
}

impl TextMetrics for LabelFont {
    fn measure(&self, text: &str, size: f64) -> f64 {
        let scale = self.scale(size);
        let mut max_x = f32::MIN;
        for glyph in self.font.layout(text, scale, rt_point(0.0, 0.0)) {
            if let Some(bb) = glyph.unpositioned().exact_bounding_box() {
                max_x = max_x.max(glyph.position().x + bb.max.x);
            }
        }
        if max_x == f32::MIN {
            0.0
        } else {
            max_x as f64
        }
    }

    fn outline(&self, text: &str, size: f64) -> TextOutline {
        let scale = self.scale(size);
        let mut builder = ContourBuilder::new((size * FLATTEN_TOLERANCE) as f32);
        for glyph in self.font.layout(text, scale, rt_point(0.0, 0.0)) {
            builder.pen_x = glyph.position().x;
            glyph.unpositioned().build_outline(&mut builder);
        }
        builder.finish()
    }
}

/// Collects rusttype outline events into a y-up lyon path, flattened
/// into polylines on [`ContourBuilder::finish`]
struct ContourBuilder {
    pen_x: f32,
    tolerance: f32,
    path: Builder,
    subpath_active: bool,
}

impl ContourBuilder {
    fn new(tolerance: f32) -> Self {
        Self {
            pen_x: 0.0,
            tolerance,
            path: Path::builder(),
            subpath_active: false,
        }
    }

    fn to_local(&self, x: f32, y: f32) -> Point {
        point(self.pen_x + x, -y)
    }

    fn ensure_begun(&mut self) {
        if !self.subpath_active {
            self.path.begin(point(self.pen_x, 0.0));
            self.subpath_active = true;
        }
    }

    fn end_subpath(&mut self, close: bool) {
        if self.subpath_active {
            self.path.end(close);
            self.subpath_active = false;
        }
    }

    fn finish(mut self) -> TextOutline {
        self.end_subpath(false);
        let path: Path = self.path.build();

        let mut contours = Vec::new();
        let mut current: Vec<DVec2> = Vec::new();
        for event in path.iter().flattened(self.tolerance) {
            match event {
                Event::Begin { at } => {
                    current.clear();
                    current.push(DVec2::new(at.x as f64, at.y as f64));
                }
                Event::Line { to, .. } => {
                    current.push(DVec2::new(to.x as f64, to.y as f64));
                }
                Event::End { .. } => {
                    // A lone move has no ink
                    if current.len() > 1 {
                        contours.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            }
        }
        TextOutline { contours }
    }
}

impl OutlineBuilder for ContourBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.end_subpath(false);
        let p = self.to_local(x, y);
        self.path.begin(p);
        self.subpath_active = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ensure_begun();
        let p = self.to_local(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.ensure_begun();
        let ctrl = self.to_local(x1, y1);
        let to = self.to_local(x, y);
        self.path.quadratic_bezier_to(ctrl, to);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.ensure_begun();
        let ctrl1 = self.to_local(x1, y1);
        let ctrl2 = self.to_local(x2, y2);
        let to = self.to_local(x, y);
        self.path.cubic_bezier_to(ctrl1, ctrl2, to);
    }

    fn close(&mut self) {
        self.end_subpath(true);
    }
}

/// Produces the metrics resource; invoked at most once per [`SharedMetrics`]
#[async_trait]
pub trait MetricsLoader: Send + Sync + 'static {
    type Metrics: TextMetrics + 'static;

    /// `None` means metrics are unavailable; labels stay absent.
    async fn load(&self) -> Option<Self::Metrics>;
}

/// Loads a [`FontSource`] on the blocking thread pool
#[derive(Debug, Clone, Default)]
pub struct FontLoader {
    source: FontSource,
}

impl FontLoader {
    pub fn new(source: FontSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }
}

#[async_trait]
impl MetricsLoader for FontLoader {
    type Metrics = LabelFont;

    async fn load(&self) -> Option<LabelFont> {
        let source = self.source.clone();
        let loaded = tokio::task::spawn_blocking(move || font_manager::load_font(&source))
            .await
            .ok()
            .flatten();
        match loaded {
            Some(font) => {
                debug!(source = ?self.source, "label font loaded");
                Some(LabelFont::new(font))
            }
            None => {
                warn!(source = ?self.source, "no usable label font; labels will be omitted");
                None
            }
        }
    }
}

/// Single-resolution metrics resource shared by every label request
pub struct SharedMetrics<L: MetricsLoader> {
    loader: Arc<L>,
    cell: Arc<OnceCell<Option<Arc<L::Metrics>>>>,
}

impl<L: MetricsLoader> Clone for SharedMetrics<L> {
    fn clone(&self) -> Self {
        Self {
            loader: Arc::clone(&self.loader),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<L: MetricsLoader> SharedMetrics<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Await the metrics. The loader runs on the first call; concurrent
    /// and later callers share its result.
    pub async fn resolve(&self) -> Option<Arc<L::Metrics>> {
        let loader = Arc::clone(&self.loader);
        self.cell
            .get_or_init(|| async move { loader.load().await.map(Arc::new) })
            .await
            .clone()
    }

    /// The resolved value, if loading has finished
    pub fn peek(&self) -> Option<Option<Arc<L::Metrics>>> {
        self.cell.get().cloned()
    }
}
