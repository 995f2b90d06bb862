//! # PackView Layout
//!
//! Placement of packed boxes in render space and fitting of their face
//! labels, along with the font metrics the labels are measured with.

pub mod font_manager;
pub mod label;
pub mod layout;
pub mod metrics;
pub mod scheduler;

pub use font_manager::{bundled_font, list_font_families, load_font, FontSource};
pub use label::{place_label, FaceLabel, FaceSelector, LABEL_CLEARANCE, TEXT_SIZE};
pub use layout::{place_box, place_container, PlacedBox, PlacedContainer};
pub use metrics::{FontLoader, LabelFont, MetricsLoader, SharedMetrics, TextMetrics, TextOutline};
pub use scheduler::{
    label_with_metrics, resolve_label, LabelOutcome, LabelRequest, LabelScheduler, ResolvedLabel,
};
